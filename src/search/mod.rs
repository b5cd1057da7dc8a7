//! Bounded-depth tree search: choose a depth from the position's branching
//! complexity, build the move tree (root subtrees in parallel) and read the
//! principal variation off it.

mod pool;
pub mod tree;

use itertools::Itertools;

use crate::chess::core::Move;
use crate::chess::position::Position;
use crate::evaluation::Weights;
use crate::search::tree::TreeBuilder;

pub use pool::default_pool_size;

/// Search depth in plies.
pub type Depth = u8;

/// Everything the driver can configure about the search.
#[derive(Clone, Copy, Debug)]
pub struct SearchParams {
    /// Upper bound on worker threads used for root-subtree builds.
    pub max_pool_size: usize,
    /// Evaluation weights handed to every rating call.
    pub weights: Weights,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_pool_size: default_pool_size(),
            weights: Weights::default(),
        }
    }
}

/// A proxy for the branching factor: the number of legal root moves times
/// the largest number of replies one ply below. Cheap to compute relative to
/// the search it parameterizes, and monotone in both factors.
#[must_use]
pub fn complexity(position: &Position) -> u32 {
    let moves = position.generate_moves();
    let widest_reply = moves
        .iter()
        .map(|next_move| {
            let mut next = position.clone();
            next.make_move(next_move);
            next.generate_moves().len() as u32
        })
        .max()
        .unwrap_or(0);
    moves.len() as u32 * widest_reply
}

/// Maps branching complexity to tree depth: quiet positions get searched
/// deeper, wild ones shallower to keep the node count in the same ballpark.
#[must_use]
pub const fn depth_for_complexity(complexity: u32) -> Depth {
    match complexity {
        0..=50 => 7,
        51..=100 => 6,
        101..=150 => 5,
        151..=500 => 4,
        _ => 3,
    }
}

/// Runs the full search on the position: pick a depth, build the tree, back
/// the values up and select the principal variation's first move. `None`
/// means there is no legal move at all and the caller should resign.
#[must_use]
pub fn select_move(position: &Position, params: &SearchParams) -> Option<Move> {
    let complexity = complexity(position);
    let depth = depth_for_complexity(complexity);
    log::debug!("complexity {complexity}, searching {depth} plies");

    let tree = TreeBuilder::new(&params.weights, params.max_pool_size).build(position, depth);
    let line = tree.principal_variation();
    if log::log_enabled!(log::Level::Debug) && !line.is_empty() {
        log::debug!(
            "principal variation: {}",
            line.iter()
                .map(|rated| format!("{}({})", rated.next_move, rated.score))
                .join(" ")
        );
    }
    tree.best_move()
}
