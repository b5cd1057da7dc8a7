//! Provides fully-specified [Chess Position] implementation: stores
//! information about the board and tracks the state of castling, en passant
//! and move counters.
//!
//! [`Position::make_move`] is the only way to transition between positions;
//! it applies a move without validating it (validation is
//! [`crate::chess::validation`]'s job, and the search only feeds validated
//! moves back in).
//!
//! [Chess Position]: https://www.chessprogramming.org/Chess_Position

use std::fmt::{self, Write};

use anyhow::{bail, Context};
use strum::IntoEnumIterator;

use crate::chess::bitboard::Bitboard;
use crate::chess::core::{
    CastleRights, File, Move, Piece, PieceKind, Player, Rank, Square, BOARD_SIZE, BOARD_WIDTH,
};

/// Square-centric implementation of the chess position: the board is a total
/// mapping from square to piece-or-empty, accompanied by all state the rules
/// need (castling rights, en passant target, move clocks, side to move).
///
/// Positions are values: the search clones one before every speculative
/// mutation and nothing outside the engine holds onto them.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    board: [Option<Piece>; BOARD_SIZE as usize],
    side_to_move: Player,
    castling: CastleRights,
    /// The square a pawn would move *to* when capturing en passant. Set only
    /// on the half-move immediately after a double pawn push, cleared on
    /// every other half-move.
    en_passant_target: Option<Square>,
    /// Plies since the last capture or pawn move. Maintained but not
    /// consulted: draw adjudication belongs to the match service.
    halfmove_clock: u16,
    /// Starts at 1, increments after Black's move.
    fullmove_number: u16,
}

/// The four fixed castling king moves with the rook move and the right each
/// one requires.
const CASTLE_MOVES: [(Square, Square, Square, Square, CastleRights); 4] = [
    (
        Square::E1,
        Square::G1,
        Square::H1,
        Square::F1,
        CastleRights::WHITE_SHORT,
    ),
    (
        Square::E1,
        Square::C1,
        Square::A1,
        Square::D1,
        CastleRights::WHITE_LONG,
    ),
    (
        Square::E8,
        Square::G8,
        Square::H8,
        Square::F8,
        CastleRights::BLACK_SHORT,
    ),
    (
        Square::E8,
        Square::C8,
        Square::A8,
        Square::D8,
        CastleRights::BLACK_LONG,
    ),
];

impl Position {
    /// An empty board with White to move and no castling rights. Useful as a
    /// building block; not a legal position by itself.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            board: [None; BOARD_SIZE as usize],
            side_to_move: Player::White,
            castling: CastleRights::empty(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the starting position of standard chess.
    ///
    /// ```
    /// use tarrasch::chess::position::Position;
    ///
    /// assert_eq!(
    ///     &Position::starting().to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut position = Self::empty();
        position.castling = CastleRights::all();
        for (file, kind) in File::iter().zip(BACKRANK) {
            for player in [Player::White, Player::Black] {
                position.put(
                    Square::new(file, Rank::backrank(player)),
                    Piece::new(player, kind),
                );
                position.put(
                    Square::new(file, Rank::pawns_starting(player)),
                    Piece::new(player, PieceKind::Pawn),
                );
            }
        }
        position
    }

    /// The player to make the next move.
    #[must_use]
    pub const fn us(&self) -> Player {
        self.side_to_move
    }

    /// The player waiting for their turn.
    #[must_use]
    pub fn them(&self) -> Player {
        !self.us()
    }

    /// The piece standing on the square, if any.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<Piece> {
        self.board[square as usize]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u16 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_number(&self) -> u16 {
        self.fullmove_number
    }

    /// Places a piece on the square, replacing whatever stood there.
    pub(crate) fn put(&mut self, square: Square, piece: Piece) {
        self.board[square as usize] = Some(piece);
    }

    /// The square the player's king stands on, or `None` for a king that has
    /// been captured in a speculative line.
    #[must_use]
    pub fn king_square(&self, player: Player) -> Option<Square> {
        self.find(Piece::new(player, PieceKind::King))
    }

    /// The square of the first piece equal to the given one, scanning from
    /// a1 towards h8.
    #[must_use]
    pub fn find(&self, piece: Piece) -> Option<Square> {
        Square::iter().find(|square| self.at(*square) == Some(piece))
    }

    /// All squares occupied by any piece.
    #[must_use]
    pub fn occupied(&self) -> Bitboard {
        let mut result = Bitboard::empty();
        for square in Square::iter() {
            if self.at(square).is_some() {
                result.insert(square);
            }
        }
        result
    }

    /// Iterates over the player's pieces with their squares.
    pub(crate) fn pieces_of(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| {
            self.at(square)
                .filter(|piece| piece.player == player)
                .map(|piece| (square, piece))
        })
    }

    /// A copy of the position with the side to move overridden. Used by
    /// checkmate detection to ask "could this player move if it were their
    /// turn".
    #[must_use]
    pub(crate) fn with_turn(&self, player: Player) -> Self {
        let mut position = self.clone();
        position.side_to_move = player;
        position
    }

    /// Transitions to the next position by applying the move, without any
    /// validity checking.
    ///
    /// Feeding in a move the validator would reject leaves the position in a
    /// state that breaks the documented invariants; in debug builds some of
    /// those states are caught by assertions downstream.
    pub fn make_move(&mut self, next_move: &Move) {
        let mover = self.side_to_move;
        let from = Square::from(next_move.from);
        let to = Square::from(next_move.to);

        // Castling is described by the king's two-square move; the rook is
        // carried along and the path/check conditions have already been
        // validated.
        for (king_from, king_to, rook_from, rook_to, right) in CASTLE_MOVES {
            if from == king_from && to == king_to && self.castling.contains(right) {
                self.board[king_to as usize] = self.board[king_from as usize].take();
                self.board[rook_to as usize] = self.board[rook_from as usize].take();
                self.castling.remove(CastleRights::both(mover));
                // The target survives exactly one ply, a castle played in
                // reply to a double push still consumes it.
                self.en_passant_target = None;
                self.side_to_move = !mover;
                return;
            }
        }

        let moved = self.board[from as usize];
        let mut was_capture = self.board[to as usize].is_some();

        self.board[to as usize] = moved;
        self.board[from as usize] = None;

        // En passant: the captured pawn is not on the destination square but
        // directly behind it.
        if let (Some(piece), Some(target)) = (moved, self.en_passant_target) {
            if piece.kind == PieceKind::Pawn && to == target {
                let captured = Square::new(to.file(), from.rank());
                self.board[captured as usize] = None;
                was_capture = true;
            }
        }

        if let Some(promotion) = next_move.promotion {
            self.board[to as usize] = Some(Piece::new(mover, promotion.kind()));
        }

        // A double pawn push arms en passant for exactly one ply; any other
        // move disarms it.
        self.en_passant_target = match moved {
            Some(piece)
                if piece.kind == PieceKind::Pawn && from.rank().distance(to.rank()) == 2 =>
            {
                let behind = (from.rank() as u8 + to.rank() as u8) / 2;
                Some(Square::new(
                    to.file(),
                    Rank::try_from(behind).expect("midpoint of a double push is on the board"),
                ))
            },
            _ => None,
        };

        // Any touch of a home rook square (move away or capture on it) kills
        // that right; a king move kills both.
        for (king_home, _, rook_home, _, right) in CASTLE_MOVES {
            if from == king_home || from == rook_home || to == rook_home {
                self.castling.remove(right);
            }
        }

        if was_capture || matches!(moved, Some(piece) if piece.kind == PieceKind::Pawn) {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }

        if mover == Player::Black {
            self.fullmove_number += 1;
        }

        self.side_to_move = !mover;
    }

    /// Parses a position from Forsyth-Edwards Notation.
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The parser is permissive: it rejects malformed records (reporting the
    /// byte offset of the offending field) but does not re-check position
    /// invariants such as king counts. The match service is trusted to send
    /// positions that arose from legal play.
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut position = Self::empty();

        let mut cursor = 0usize;
        let mut fields = input.split(' ').map(|field| {
            let offset = cursor;
            cursor += field.len() + 1;
            (offset, field)
        });

        let (offset, placement) = fields.next().context("missing piece placement")?;
        let mut rank_id: u8 = BOARD_WIDTH;
        for rank_fen in placement.split('/') {
            if rank_id == 0 {
                bail!("at byte {offset}: expected 8 ranks, got more in '{placement}'");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: u8 = 0;
            for symbol in rank_fen.chars() {
                match symbol {
                    '0' => bail!("at byte {offset}: empty-square run can not be 0"),
                    '1'..='8' => {
                        file += symbol as u8 - b'0';
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)
                    .with_context(|| format!("at byte {offset}: bad piece placement"))?;
                if file >= BOARD_WIDTH {
                    bail!("at byte {offset}: rank '{rank_fen}' overflows the board");
                }
                position.put(Square::new(File::try_from(file)?, rank), piece);
                file += 1;
            }
            if file != BOARD_WIDTH {
                bail!(
                    "at byte {offset}: rank '{rank_fen}' describes {file} files, \
                     expected {BOARD_WIDTH}"
                );
            }
        }
        if rank_id != 0 {
            bail!("at byte {offset}: expected 8 ranks, got fewer in '{placement}'");
        }

        let (offset, side) = fields.next().context("missing side to move")?;
        position.side_to_move = side
            .try_into()
            .with_context(|| format!("at byte {offset}: bad side to move"))?;

        let (offset, castling) = fields.next().context("missing castling rights")?;
        position.castling = castling
            .try_into()
            .with_context(|| format!("at byte {offset}: bad castling rights"))?;

        let (offset, en_passant) = fields.next().context("missing en passant target")?;
        position.en_passant_target = match en_passant {
            "-" => None,
            square => Some(
                Square::try_from(square)
                    .with_context(|| format!("at byte {offset}: bad en passant target"))?,
            ),
        };

        let (offset, halfmove) = fields.next().context("missing halfmove clock")?;
        position.halfmove_clock = halfmove
            .parse::<u16>()
            .with_context(|| format!("at byte {offset}: bad halfmove clock '{halfmove}'"))?;

        let (offset, fullmove) = fields.next().context("missing fullmove number")?;
        position.fullmove_number = match fullmove.parse::<u16>() {
            Ok(0) => bail!("at byte {offset}: fullmove number can not be 0"),
            Ok(number) => number,
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("at byte {offset}: bad fullmove number '{fullmove}'"))
            },
        };

        if let Some((offset, _)) = fields.next() {
            bail!("at byte {offset}: trailing symbols after fullmove number");
        }

        Ok(position)
    }
}

impl TryFrom<&str> for Position {
    type Error = anyhow::Error;

    /// Parses a FEN record, cleaning up surrounding whitespace first.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        Self::from_fen(input.trim())
    }
}

impl fmt::Display for Position {
    /// Returns the position in Forsyth-Edwards Notation. The output parses
    /// back to an equal position: rendering is a fixed point of parsing.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for rank in Rank::iter().rev() {
            let mut empty_squares = 0;
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::R1 {
                f.write_char('/')?;
            }
        }
        write!(f, " {} ", self.side_to_move)?;
        write!(f, "{} ", self.castling)?;
        match self.en_passant_target {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} {}", self.halfmove_clock, self.fullmove_number)
    }
}

impl fmt::Debug for Position {
    /// Dumps the board in a human readable format ('.' for an empty square,
    /// FEN algebraic symbol for a piece) followed by the rules state.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::iter().rev() {
            for file in File::iter() {
                match self.at(Square::new(file, rank)) {
                    Some(piece) => write!(f, "{piece}"),
                    None => f.write_char('.'),
                }?;
                if file != File::H {
                    f.write_char(' ')?;
                }
            }
            f.write_char('\n')?;
        }
        writeln!(f, "Player to move: {:?}", self.side_to_move)?;
        writeln!(f, "Castling rights: {}", self.castling)?;
        writeln!(f, "En passant: {:?}", self.en_passant_target)?;
        writeln!(f, "FEN: {self}")
    }
}
