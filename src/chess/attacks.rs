//! Piece attack geometry: precomputed leaper tables, classification of the
//! line shared by two squares, path scanning for sliders and the threat query
//! the validator and the evaluator are built on.
//!
//! Everything in this module is a pure function of its inputs; the tables are
//! immutable and shared freely across search threads.

use crate::chess::bitboard::{files_between, ranks_between, Bitboard, FILE_MASKS, RANK_MASKS};
use crate::chess::core::{PieceKind, Player, Square, SquarePair, UnboundedPair, BOARD_SIZE};
use crate::chess::position::Position;

/// The eight L-shaped knight offsets as (file, rank) deltas.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (-1, -2),
    (-2, -1),
    (1, -2),
    (2, -1),
    (-1, 2),
    (-2, 1),
];

/// The eight king-step offsets as (file, rank) deltas.
pub(crate) const KING_OFFSETS: [(i8, i8); 8] = [
    (1, 1),
    (0, 1),
    (-1, 1),
    (1, 0),
    (-1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
];

const fn build_leaper_attacks(offsets: [(i8, i8); 8]) -> [Bitboard; BOARD_SIZE as usize] {
    let mut table = [Bitboard::empty(); BOARD_SIZE as usize];
    let mut square = 0;
    while square < BOARD_SIZE as usize {
        let file = (square % 8) as i8;
        let rank = (square / 8) as i8;
        let mut bits = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let (file_delta, rank_delta) = offsets[i];
            let (to_file, to_rank) = (file + file_delta, rank + rank_delta);
            if to_file >= 0 && to_file < 8 && to_rank >= 0 && to_rank < 8 {
                bits |= 1u64 << ((to_rank * 8 + to_file) as u32);
            }
            i += 1;
        }
        table[square] = Bitboard::from_bits(bits);
        square += 1;
    }
    table
}

/// Attacks of a knight from each square.
pub const KNIGHT_ATTACKS: [Bitboard; BOARD_SIZE as usize] = build_leaper_attacks(KNIGHT_OFFSETS);

/// Attacks of a king from each square.
pub const KING_ATTACKS: [Bitboard; BOARD_SIZE as usize] = build_leaper_attacks(KING_OFFSETS);

/// Squares attacked by a pawn of the given player standing on the square:
/// one rank forward-left and forward-right, regardless of occupancy. En
/// passant is not a threat relationship and does not appear here.
#[must_use]
pub fn pawn_attacks(square: Square, player: Player) -> Bitboard {
    let pair = SquarePair::from(square);
    let mut result = Bitboard::empty();
    for file_delta in [-1, 1] {
        if let Some(attacked) = pair.offset(file_delta, player.pawn_push()).bounded() {
            result.insert(attacked.into());
        }
    }
    result
}

/// The kind of straight line two distinct squares share.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Line {
    /// Same rank: horizontal movement.
    Rank,
    /// Same file: vertical movement.
    File,
    /// Equal file and rank distances.
    Diagonal,
}

/// Classifies the line between two squares, or `None` when they coincide or
/// share no rank, file or diagonal.
#[must_use]
pub fn classify_line(from: SquarePair, to: SquarePair) -> Option<Line> {
    if from == to {
        return None;
    }
    if from.rank() == to.rank() {
        Some(Line::Rank)
    } else if from.file() == to.file() {
        Some(Line::File)
    } else if from.file().distance(to.file()) == from.rank().distance(to.rank()) {
        Some(Line::Diagonal)
    } else {
        None
    }
}

/// The squares strictly between two squares sharing a rank or a file, as a
/// mask to intersect with the occupancy set. `None` for diagonals and
/// unrelated squares.
#[must_use]
pub fn straight_path_mask(from: SquarePair, to: SquarePair) -> Option<Bitboard> {
    match classify_line(from, to)? {
        Line::Rank => {
            Some(RANK_MASKS[from.rank() as usize] & files_between(from.file(), to.file()))
        },
        Line::File => {
            Some(FILE_MASKS[from.file() as usize] & ranks_between(from.rank(), to.rank()))
        },
        Line::Diagonal => None,
    }
}

/// Walks from `from` towards `to` and returns the first occupied square
/// strictly between them, or `None` when the path is clear. The squares must
/// share a rank, file or diagonal; otherwise there is no path to scan and the
/// result is `None`.
#[must_use]
pub fn first_blocker(
    position: &Position,
    from: SquarePair,
    to: SquarePair,
) -> Option<SquarePair> {
    classify_line(from, to)?;
    let file_step = to.file().signed_distance(from.file()).signum();
    let rank_step = to.rank().signed_distance(from.rank()).signum();
    let target = UnboundedPair::from(to);
    let mut at = from.offset(file_step, rank_step);
    while at != target {
        let pair = at
            .bounded()
            .expect("stepping between two on-board squares stays on the board");
        if position.at(pair.into()).is_some() {
            return Some(pair);
        }
        at = at.offset(file_step, rank_step);
    }
    None
}

/// Returns the square of some piece of `by` that attacks `target`, or `None`
/// when the square is safe from that player. "Attacks" is geometric: it
/// ignores whose turn it is and whether capturing would expose the attacker's
/// own king.
#[must_use]
pub fn attacker_of(position: &Position, target: SquarePair, by: Player) -> Option<SquarePair> {
    let target_square = Square::from(target);
    for (square, piece) in position.pieces_of(by) {
        let from = SquarePair::from(square);
        let attacks = match piece.kind {
            PieceKind::Rook => matches!(
                classify_line(from, target),
                Some(Line::Rank | Line::File)
            ) && first_blocker(position, from, target).is_none(),
            PieceKind::Bishop => classify_line(from, target) == Some(Line::Diagonal)
                && first_blocker(position, from, target).is_none(),
            PieceKind::Queen => classify_line(from, target).is_some()
                && first_blocker(position, from, target).is_none(),
            PieceKind::Knight => KNIGHT_ATTACKS[square as usize].contains(target_square),
            PieceKind::King => KING_ATTACKS[square as usize].contains(target_square),
            PieceKind::Pawn => pawn_attacks(square, by).contains(target_square),
        };
        if attacks {
            return Some(from);
        }
    }
    None
}

/// Convenience form of [`attacker_of`] for callers that only need the
/// boolean.
#[must_use]
pub fn is_attacked(position: &Position, square: Square, by: Player) -> bool {
    attacker_of(position, square.into(), by).is_some()
}
