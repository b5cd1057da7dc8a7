//! Legal move enumeration: per-piece candidate sweeps filtered through the
//! validator. Correct rather than clever; the search depends on this list
//! being exactly the set of moves [`validate_move`] accepts.

use strum::IntoEnumIterator;

use crate::chess::attacks::{KING_OFFSETS, KNIGHT_OFFSETS};
use crate::chess::core::{File, Move, MoveList, PieceKind, Player, Promotion, Rank, SquarePair};
use crate::chess::position::Position;
use crate::chess::validation::{validate_move, MoveValidity};

const PROMOTIONS: [Promotion; 4] = [
    Promotion::Queen,
    Promotion::Rook,
    Promotion::Bishop,
    Promotion::Knight,
];

const DIAGONAL_STEPS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];

impl Position {
    /// Calculates the list of moves the side to move can legally play (i.e.
    /// the moves that do not leave its king in check).
    ///
    /// An empty result means the game is over on this position: checkmate if
    /// the king is attacked, stalemate otherwise.
    #[must_use]
    pub fn generate_moves(&self) -> MoveList {
        let mut moves = MoveList::new();
        let mover = self.us();
        for (square, piece) in self.pieces_of(mover) {
            let from = SquarePair::from(square);
            match piece.kind {
                PieceKind::Rook => self.straight_sweep(from, &mut moves),
                PieceKind::Bishop => self.diagonal_sweep(from, &mut moves),
                PieceKind::Queen => {
                    self.straight_sweep(from, &mut moves);
                    self.diagonal_sweep(from, &mut moves);
                },
                PieceKind::Knight => {
                    for (file_delta, rank_delta) in KNIGHT_OFFSETS {
                        if let Some(to) = from.offset(file_delta, rank_delta).bounded() {
                            self.add_if_valid(Move::new(from, to), &mut moves);
                        }
                    }
                },
                PieceKind::King => {
                    for (file_delta, rank_delta) in KING_OFFSETS {
                        if let Some(to) = from.offset(file_delta, rank_delta).bounded() {
                            self.add_if_valid(Move::new(from, to), &mut moves);
                        }
                    }
                    let backrank = Rank::backrank(mover);
                    for castle_file in [File::G, File::C] {
                        self.add_if_valid(
                            Move::new(from, SquarePair::new(castle_file, backrank)),
                            &mut moves,
                        );
                    }
                },
                PieceKind::Pawn => self.pawn_candidates(from, mover, &mut moves),
            }
        }
        moves
    }

    fn add_if_valid(&self, candidate: Move, moves: &mut MoveList) {
        if validate_move(self, &candidate, self.us()) == MoveValidity::Valid {
            moves.push(candidate);
        }
    }

    /// Candidate destinations along the full file and rank of the square.
    fn straight_sweep(&self, from: SquarePair, moves: &mut MoveList) {
        for file in File::iter() {
            if file != from.file() {
                self.add_if_valid(
                    Move::new(from, SquarePair::new(file, from.rank())),
                    moves,
                );
            }
        }
        for rank in Rank::iter() {
            if rank != from.rank() {
                self.add_if_valid(
                    Move::new(from, SquarePair::new(from.file(), rank)),
                    moves,
                );
            }
        }
    }

    /// Candidate destinations along the four diagonal rays of the square.
    fn diagonal_sweep(&self, from: SquarePair, moves: &mut MoveList) {
        for (file_step, rank_step) in DIAGONAL_STEPS {
            let mut at = from.offset(file_step, rank_step);
            while let Some(to) = at.bounded() {
                self.add_if_valid(Move::new(from, to), moves);
                at = at.offset(file_step, rank_step);
            }
        }
    }

    /// Single push, double push and the two diagonal captures, fanned out
    /// into the four promotion variants when the pawn lands on the last
    /// rank.
    fn pawn_candidates(&self, from: SquarePair, mover: Player, moves: &mut MoveList) {
        let forward = mover.pawn_push();
        let mut push_candidates = |to: SquarePair| {
            if to.rank() == Rank::promoting(mover) {
                for promotion in PROMOTIONS {
                    self.add_if_valid(Move::promoting(from, to, promotion), moves);
                }
            } else {
                self.add_if_valid(Move::new(from, to), moves);
            }
        };
        for (file_delta, rank_delta) in [(0, forward), (0, 2 * forward), (-1, forward), (1, forward)]
        {
            if let Some(to) = from.offset(file_delta, rank_delta).bounded() {
                push_candidates(to);
            }
        }
    }
}

/// Counts the leaves of the full legal-move tree of the given depth. The
/// classic correctness check for move generation: the counts for standard
/// positions are well known and any rule bug shifts them.
#[must_use]
pub fn perft(position: &Position, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = position.generate_moves();
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| {
            let mut next = position.clone();
            next.make_move(next_move);
            perft(&next, depth - 1)
        })
        .sum()
}
