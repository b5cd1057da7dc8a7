//! Material counting using the engine's piece weights.
//!
//! While crude on its own, material is stable and deterministic, which makes
//! it the reliable backbone of the composite evaluation: the search tweaks
//! which positions get compared, not how a rook is priced.

use crate::chess::core::Player;
use crate::chess::position::Position;
use crate::evaluation::Weights;

fn player_material(position: &Position, player: Player, weights: &Weights) -> i32 {
    position
        .pieces_of(player)
        .map(|(_, piece)| weights.piece_value(piece.kind))
        .sum()
}

/// The point-of-view player's material minus the opponent's.
pub(crate) fn material_advantage(position: &Position, pov: Player, weights: &Weights) -> i32 {
    player_material(position, pov, weights) - player_material(position, !pov, weights)
}
