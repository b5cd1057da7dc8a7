//! Full-move validation: piece-kind movement rules plus the condition that
//! the mover's king is not left in check.
//!
//! Rule violations are values, not errors: [`validate_move`] returns a
//! [`MoveValidity`] and never panics on garbage moves. The move generator is
//! defined in terms of this module: a move is legal iff it validates to
//! [`MoveValidity::Valid`].

use crate::chess::attacks::{
    classify_line, first_blocker, is_attacked, straight_path_mask, Line, KNIGHT_ATTACKS,
};
use crate::chess::bitboard::rook_reach;
use crate::chess::core::{CastleRights, File, Move, PieceKind, Player, Rank, Square, SquarePair};
use crate::chess::position::Position;

/// The outcome of checking a candidate move against the full rules of chess.
/// Everything except [`MoveValidity::Valid`] names the first rule the move
/// broke.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MoveValidity {
    Valid,
    /// The mover is not the player whose turn it is.
    NotYourTurn,
    /// There is no piece on the source square.
    FromIsEmpty,
    /// The piece on the source square belongs to the opponent.
    FromNotOwnedByMover,
    /// The destination holds a piece of the mover's own color.
    DestinationOccupiedByOwnPiece,
    /// The piece on the source square cannot geometrically make this move.
    IllegalForPieceKind,
    /// A sliding move (or pawn push) runs into an intervening occupant.
    PathBlocked,
    /// After the move the mover's own king would be attacked.
    LeavesKingInCheck,
}

/// Classifies a candidate move on the given position for the given mover.
///
/// The checks are ordered so that the cheapest failures are reported first;
/// the clone-and-apply king safety test runs only for moves that pass every
/// geometric rule.
#[must_use]
pub fn validate_move(position: &Position, candidate: &Move, mover: Player) -> MoveValidity {
    if position.us() != mover {
        return MoveValidity::NotYourTurn;
    }
    if candidate.from == candidate.to {
        // Standing still is not a move of any piece kind.
        return MoveValidity::IllegalForPieceKind;
    }

    let from = Square::from(candidate.from);
    let to = Square::from(candidate.to);
    let Some(piece) = position.at(from) else {
        return MoveValidity::FromIsEmpty;
    };
    if piece.player != mover {
        return MoveValidity::FromNotOwnedByMover;
    }
    if matches!(position.at(to), Some(occupant) if occupant.player == mover) {
        return MoveValidity::DestinationOccupiedByOwnPiece;
    }
    if candidate.promotion.is_some() && piece.kind != PieceKind::Pawn {
        return MoveValidity::IllegalForPieceKind;
    }

    let geometry = match piece.kind {
        PieceKind::Pawn => validate_pawn(position, candidate, mover),
        PieceKind::Knight => validate_knight(candidate),
        PieceKind::Bishop => validate_bishop(position, candidate),
        PieceKind::Rook => validate_rook(position, candidate),
        PieceKind::Queen => validate_queen(position, candidate),
        PieceKind::King => validate_king(position, candidate, mover),
    };
    if geometry != MoveValidity::Valid {
        return geometry;
    }

    // The king safety test works on the position after the move: castling
    // destinations are covered here a second time, which is harmless.
    let mut next = position.clone();
    next.make_move(candidate);
    if let Some(king) = next.king_square(mover) {
        if is_attacked(&next, king, !mover) {
            return MoveValidity::LeavesKingInCheck;
        }
    }
    MoveValidity::Valid
}

fn validate_pawn(position: &Position, candidate: &Move, mover: Player) -> MoveValidity {
    let (from, to) = (candidate.from, candidate.to);
    // Positive means towards the opponent regardless of color.
    let advance = to.rank().signed_distance(from.rank()) * mover.pawn_push();
    let sideways = from.file().distance(to.file());

    // Reaching the last rank forces a promotion; promoting anywhere else is
    // not a pawn move.
    if (to.rank() == Rank::promoting(mover)) != candidate.promotion.is_some() {
        return MoveValidity::IllegalForPieceKind;
    }
    if advance <= 0 {
        return MoveValidity::IllegalForPieceKind;
    }

    match (sideways, advance) {
        (0, 1) => {
            if position.at(to.into()).is_some() {
                return MoveValidity::PathBlocked;
            }
            MoveValidity::Valid
        },
        (0, 2) => {
            if from.rank() != Rank::pawns_starting(mover) {
                return MoveValidity::IllegalForPieceKind;
            }
            let crossed = from
                .offset(0, mover.pawn_push())
                .bounded()
                .expect("square in front of a starting-rank pawn is on the board");
            if position.at(crossed.into()).is_some() || position.at(to.into()).is_some() {
                return MoveValidity::PathBlocked;
            }
            MoveValidity::Valid
        },
        (1, 1) => {
            let target = Square::from(to);
            let captures_en_passant = position.en_passant_target() == Some(target);
            // The destination holding an enemy piece is the other way this is
            // a capture; own pieces were filtered out before.
            if position.at(target).is_some() || captures_en_passant {
                MoveValidity::Valid
            } else {
                MoveValidity::IllegalForPieceKind
            }
        },
        _ => MoveValidity::IllegalForPieceKind,
    }
}

fn validate_knight(candidate: &Move) -> MoveValidity {
    let from = Square::from(candidate.from);
    if KNIGHT_ATTACKS[from as usize].contains(candidate.to.into()) {
        MoveValidity::Valid
    } else {
        MoveValidity::IllegalForPieceKind
    }
}

fn validate_bishop(position: &Position, candidate: &Move) -> MoveValidity {
    if classify_line(candidate.from, candidate.to) != Some(Line::Diagonal) {
        return MoveValidity::IllegalForPieceKind;
    }
    if first_blocker(position, candidate.from, candidate.to).is_some() {
        return MoveValidity::PathBlocked;
    }
    MoveValidity::Valid
}

fn validate_rook(position: &Position, candidate: &Move) -> MoveValidity {
    if !rook_reach(candidate.from.into()).contains(candidate.to.into()) {
        return MoveValidity::IllegalForPieceKind;
    }
    let path = straight_path_mask(candidate.from, candidate.to)
        .expect("squares within rook reach share a rank or a file");
    if (path & position.occupied()).has_any() {
        MoveValidity::PathBlocked
    } else {
        MoveValidity::Valid
    }
}

fn validate_queen(position: &Position, candidate: &Move) -> MoveValidity {
    match classify_line(candidate.from, candidate.to) {
        Some(Line::Diagonal) => validate_bishop(position, candidate),
        Some(Line::Rank | Line::File) => validate_rook(position, candidate),
        None => MoveValidity::IllegalForPieceKind,
    }
}

fn validate_king(position: &Position, candidate: &Move, mover: Player) -> MoveValidity {
    let (from, to) = (candidate.from, candidate.to);
    if from.file().distance(to.file()) <= 1 && from.rank().distance(to.rank()) <= 1 {
        return MoveValidity::Valid;
    }
    validate_castle(position, candidate, mover)
}

/// The strict castling rule: the right must be held, every square between
/// king and rook must be empty, and none of the squares the king stands on,
/// passes over or lands on may be attacked by the opponent.
fn validate_castle(position: &Position, candidate: &Move, mover: Player) -> MoveValidity {
    let backrank = Rank::backrank(mover);
    if candidate.from != SquarePair::new(File::E, backrank) {
        return MoveValidity::IllegalForPieceKind;
    }
    let (right, rook_file, crossed_file) = match candidate.to.file() {
        File::G if candidate.to.rank() == backrank => {
            (CastleRights::kingside(mover), File::H, File::F)
        },
        File::C if candidate.to.rank() == backrank => {
            (CastleRights::queenside(mover), File::A, File::D)
        },
        _ => return MoveValidity::IllegalForPieceKind,
    };
    if !position.castling().contains(right) {
        return MoveValidity::IllegalForPieceKind;
    }

    let rook_home = SquarePair::new(rook_file, backrank);
    let between = straight_path_mask(candidate.from, rook_home)
        .expect("king and rook home squares share the backrank");
    if (between & position.occupied()).has_any() {
        return MoveValidity::PathBlocked;
    }

    // Not out of, through or into check.
    for file in [File::E, crossed_file, candidate.to.file()] {
        if is_attacked(position, Square::new(file, backrank), !mover) {
            return MoveValidity::LeavesKingInCheck;
        }
    }
    MoveValidity::Valid
}
