//! Static position evaluation: a signed score from a chosen player's point
//! of view, positive meaning the position favors them.
//!
//! The composite evaluation sums material, castling opportunity and a
//! dominating checkmate term, clamped into the checkmate range. It is a pure
//! function of the position and the point of view; the search calls it at
//! every node and depends on that purity for parallel tree builds.

mod material;

use crate::chess::attacks::is_attacked;
use crate::chess::core::{CastleRights, Move, PieceKind, Player};
use crate::chess::position::Position;

/// Tunable evaluation weights. The defaults are the values the bot has always
/// played with; the driver may override them through
/// [`crate::search::SearchParams`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Weights {
    #[allow(missing_docs)]
    pub pawn: i32,
    #[allow(missing_docs)]
    pub knight: i32,
    #[allow(missing_docs)]
    pub bishop: i32,
    #[allow(missing_docs)]
    pub rook: i32,
    #[allow(missing_docs)]
    pub queen: i32,
    #[allow(missing_docs)]
    pub king: i32,
    /// Bonus per remaining castling right.
    pub castle_right: i32,
    /// Dominates every other term; also the clamp bound for final scores.
    pub checkmate: i32,
}

impl Default for Weights {
    fn default() -> Self {
        Self {
            pawn: 5,
            knight: 15,
            bishop: 25,
            rook: 50,
            queen: 200,
            king: 100_000,
            castle_right: 1,
            checkmate: 1_000_000,
        }
    }
}

impl Weights {
    pub(crate) const fn piece_value(&self, kind: PieceKind) -> i32 {
        match kind {
            PieceKind::Pawn => self.pawn,
            PieceKind::Knight => self.knight,
            PieceKind::Bishop => self.bishop,
            PieceKind::Rook => self.rook,
            PieceKind::Queen => self.queen,
            PieceKind::King => self.king,
        }
    }
}

/// Checks whether the player is checkmated on this position: their king is
/// attacked and no legal move resolves it. A player with no king on the board
/// (possible in speculative search lines) counts as checkmated.
///
/// Stalemate is deliberately not detected here: a stalemated position scores
/// by material like any other.
#[must_use]
pub fn is_checkmate(position: &Position, player: Player) -> bool {
    let Some(king) = position.king_square(player) else {
        return true;
    };
    if !is_attacked(position, king, !player) {
        return false;
    }
    position.with_turn(player).generate_moves().is_empty()
}

fn castle_opportunity(position: &Position, pov: Player, weights: &Weights) -> i32 {
    let remaining = |player: Player| {
        i32::from(position.castling().contains(CastleRights::kingside(player)))
            + i32::from(position.castling().contains(CastleRights::queenside(player)))
    };
    (remaining(pov) - remaining(!pov)) * weights.castle_right
}

fn checkmate_term(position: &Position, pov: Player, weights: &Weights) -> i32 {
    if is_checkmate(position, pov) {
        -weights.checkmate
    } else if is_checkmate(position, !pov) {
        weights.checkmate
    } else {
        0
    }
}

/// Rates the position from the point of view of `pov`: positive favors them.
/// The result is clamped into `[-weights.checkmate, weights.checkmate]`.
#[must_use]
pub fn evaluate(position: &Position, pov: Player, weights: &Weights) -> i32 {
    let score = material::material_advantage(position, pov, weights)
        + castle_opportunity(position, pov, weights)
        + checkmate_term(position, pov, weights);
    score.clamp(-weights.checkmate, weights.checkmate)
}

/// A move annotated with the evaluation of the position it leads to, from the
/// mover's point of view.
#[derive(Clone, Copy, Debug)]
pub struct RatedMove {
    #[allow(missing_docs)]
    pub next_move: Move,
    /// Score of the position after the move for the player who made it.
    pub score: i32,
}

/// Applies the move on a clone of the position and evaluates the result from
/// the mover's point of view.
#[must_use]
pub fn rate_move(position: &Position, next_move: &Move, weights: &Weights) -> RatedMove {
    let mut next = position.clone();
    next.make_move(next_move);
    RatedMove {
        next_move: *next_move,
        score: evaluate(&next, position.us(), weights),
    }
}
