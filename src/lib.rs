//! Chess engine core for an online playing bot: canonical position state,
//! full-rules move validation and generation, static evaluation and a
//! bounded-depth parallel tree search that picks the move to play.
//!
//! The crate is transport-agnostic: the match-service client drives it
//! through [`engine::GameDriver`] and [`engine::Engine`], and everything
//! else is internal machinery layered leaves-first:
//!
//! - [`chess`]: board primitives, bitboards, attack geometry, positions
//!   with FEN, the validator and the move generator;
//! - [`evaluation`]: static scoring of a position from a player's point of
//!   view;
//! - [`search`]: complexity-driven depth selection and the move tree;
//! - [`engine`]: the turn-playing adaptor.

// Rustc lints.
#![warn(
    missing_docs,
    absolute_paths_not_starting_with_crate,
    keyword_idents,
    macro_use_extern_crate,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_lifetimes,
    unused_qualifications
)]
// Rustdoc lints.
#![warn(
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rustdoc::invalid_codeblock_attributes,
    rustdoc::invalid_html_tags,
    rustdoc::invalid_rust_codeblocks,
    rustdoc::bare_urls
)]
// Clippy lints.
#![warn(
    clippy::correctness,
    clippy::suspicious,
    clippy::style,
    clippy::complexity,
    clippy::perf
)]

pub mod chess;
pub mod engine;
pub mod evaluation;
pub mod search;
