//! Board primitives commonly used within [`crate::chess`].

use std::ops::Not;
use std::{fmt, mem};

use anyhow::{bail, Context};
use arrayvec::ArrayVec;
use bitflags::bitflags;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A game of chess is played between two players: White (having the advantage
/// of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Forward" for this player's pawns: +1 rank for White, -1 for Black.
    #[must_use]
    pub const fn pawn_push(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("unknown player: expected 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::White => "w",
            Self::Black => "b",
        })
    }
}

/// Represents a column (vertical line) of the chessboard. In chess notation,
/// it is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl File {
    /// Absolute distance between two files.
    #[must_use]
    pub const fn distance(self, other: Self) -> u8 {
        (self as i8 - other as i8).unsigned_abs()
    }

    /// Distance that preserves direction: positive when `self` is closer to
    /// the h-file than `other`.
    #[must_use]
    pub const fn signed_distance(self, other: Self) -> i8 {
        self as i8 - other as i8
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(unsafe { mem::transmute::<u8, Self>(file as u8 - b'a') }),
            _ => bail!("unknown file: expected within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<u8> for File {
    type Error = anyhow::Error;

    fn try_from(column: u8) -> anyhow::Result<Self> {
        match column {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(column) }),
            _ => bail!("unknown file: expected within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", (b'a' + *self as u8) as char)
    }
}

/// Represents a horizontal line of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 is 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[allow(missing_docs)]
pub enum Rank {
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl Rank {
    /// Absolute distance between two ranks.
    #[must_use]
    pub const fn distance(self, other: Self) -> u8 {
        (self as i8 - other as i8).unsigned_abs()
    }

    /// Distance that preserves direction: positive when `self` is closer to
    /// the eighth rank than `other`.
    #[must_use]
    pub const fn signed_distance(self, other: Self) -> i8 {
        self as i8 - other as i8
    }

    /// The rank the player's pieces start on.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::R1,
            Player::Black => Self::R8,
        }
    }

    /// The rank the player's pawns start on.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::R2,
            Player::Black => Self::R7,
        }
    }

    /// The rank a player's pawn promotes on.
    #[must_use]
    pub const fn promoting(player: Player) -> Self {
        match player {
            Player::White => Self::R8,
            Player::Black => Self::R1,
        }
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(unsafe { mem::transmute::<u8, Self>(rank as u8 - b'1') }),
            _ => bail!("unknown rank: expected within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<u8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: u8) -> anyhow::Result<Self> {
        match row {
            0..=7 => Ok(unsafe { mem::transmute::<u8, Self>(row) }),
            _ => bail!("unknown rank: expected within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use tarrasch::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, strum::EnumIter)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        unsafe { mem::transmute(file as u8 + (rank as u8) * BOARD_WIDTH) }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self as u8 % BOARD_WIDTH) }
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self as u8 / BOARD_WIDTH) }
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its index on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        const MAX_INDEX: u8 = BOARD_SIZE - 1;
        match square_index {
            0..=MAX_INDEX => Ok(unsafe { mem::transmute::<u8, Self>(square_index) }),
            _ => bail!("unknown square index: needs to be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let mut chars = square.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Ok(Self::new(file.try_into()?, rank.try_into()?)),
            _ => bail!("unknown square: should be two chars, got '{square}'"),
        }
    }
}

impl From<SquarePair> for Square {
    fn from(pair: SquarePair) -> Self {
        Self::new(pair.file(), pair.rank())
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// A square as an explicit (file, rank) pair packed into one byte: file in
/// the low nibble, rank in the high one. Converts losslessly to and from
/// [`Square`]; both nibbles are always within 0..[`BOARD_WIDTH`].
///
/// Pair arithmetic that may leave the board goes through [`UnboundedPair`].
#[derive(Copy, Clone, PartialEq, Eq)]
pub struct SquarePair(u8);

impl SquarePair {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self(file as u8 | (rank as u8) << 4)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn file(self) -> File {
        unsafe { mem::transmute(self.0 & 0x0F) }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rank(self) -> Rank {
        unsafe { mem::transmute(self.0 >> 4) }
    }

    /// Offsets the pair by (file, rank) deltas without a bounds check; the
    /// result answers [`UnboundedPair::in_bounds`].
    #[must_use]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> UnboundedPair {
        UnboundedPair {
            file: (self.0 & 0x0F) as i8 + file_delta,
            rank: (self.0 >> 4) as i8 + rank_delta,
        }
    }
}

impl From<Square> for SquarePair {
    fn from(square: Square) -> Self {
        Self::new(square.file(), square.rank())
    }
}

impl fmt::Display for SquarePair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl fmt::Debug for SquarePair {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// A (file, rank) pair that may have wandered off the board during
/// arithmetic. Holds signed components; [`UnboundedPair::bounded`] returns to
/// the checked representation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UnboundedPair {
    #[allow(missing_docs)]
    pub file: i8,
    #[allow(missing_docs)]
    pub rank: i8,
}

impl UnboundedPair {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.file >= 0
            && self.file < BOARD_WIDTH as i8
            && self.rank >= 0
            && self.rank < BOARD_WIDTH as i8
    }

    /// The checked pair, or `None` if off the board.
    #[must_use]
    pub const fn bounded(self) -> Option<SquarePair> {
        if self.in_bounds() {
            Some(SquarePair(self.file as u8 | (self.rank as u8) << 4))
        } else {
            None
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn offset(self, file_delta: i8, rank_delta: i8) -> Self {
        Self {
            file: self.file + file_delta,
            rank: self.rank + rank_delta,
        }
    }
}

impl From<SquarePair> for UnboundedPair {
    fn from(pair: SquarePair) -> Self {
        Self {
            file: pair.file() as i8,
            rank: pair.rank() as i8,
        }
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PieceKind {
    King,
    Queen,
    Rook,
    Bishop,
    Knight,
    Pawn,
}

/// Represents a specific piece owned by a player. Empty squares hold no
/// `Piece` at all (`Option<Piece>` on the board).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    #[allow(missing_docs)]
    pub player: Player,
    #[allow(missing_docs)]
    pub kind: PieceKind,
}

impl Piece {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(player: Player, kind: PieceKind) -> Self {
        Self { player, kind }
    }

    /// Algebraic notation symbol used in FEN. Uppercase for White, lowercase
    /// for Black.
    #[must_use]
    pub const fn algebraic_symbol(self) -> char {
        let symbol = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        match self.player {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        }
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let player = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("unknown piece symbol: expected within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self { player, kind })
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.algebraic_symbol())
    }
}

/// A pawn reaching the last rank has to promote to one of these.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    /// The piece kind the pawn turns into.
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        match self {
            Self::Queen => PieceKind::Queen,
            Self::Rook => PieceKind::Rook,
            Self::Bishop => PieceKind::Bishop,
            Self::Knight => PieceKind::Knight,
        }
    }
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    /// Case-sensitive: only the lowercase letters appear in move text.
    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("unknown promotion: expected within \"qrbn\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            Self::Queen => "q",
            Self::Rook => "r",
            Self::Bishop => "b",
            Self::Knight => "n",
        })
    }
}

/// A chess move as communicated to and from the match service: source square,
/// destination square and an optional promotion. Castling is encoded as the
/// corresponding two-square king move.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: SquarePair,
    #[allow(missing_docs)]
    pub to: SquarePair,
    #[allow(missing_docs)]
    pub promotion: Option<Promotion>,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub fn new(from: impl Into<SquarePair>, to: impl Into<SquarePair>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: None,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn promoting(
        from: impl Into<SquarePair>,
        to: impl Into<SquarePair>,
        promotion: Promotion,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            promotion: Some(promotion),
        }
    }

    /// Parses a move from coordinate text: source square, destination square
    /// and an optional promotion letter, e.g. `e2e4` or `b7b8q`. Lowercase
    /// only, no separators.
    pub fn from_text(text: &str) -> anyhow::Result<Self> {
        if !text.is_ascii() {
            bail!("move text should be ASCII, got '{text}'");
        }
        if text.len() != 4 && text.len() != 5 {
            bail!(
                "move text should be 4 or 5 chars, got '{text}' with {}",
                text.len()
            );
        }
        let from = Square::try_from(&text[0..2])
            .with_context(|| format!("bad source square in '{text}'"))?;
        let to = Square::try_from(&text[2..4])
            .with_context(|| format!("bad destination square in '{text}'"))?;
        let promotion = match text[4..].chars().next() {
            Some(symbol) => Some(
                Promotion::try_from(symbol).with_context(|| format!("bad promotion in '{text}'"))?,
            ),
            None => None,
        };
        Ok(Self {
            from: from.into(),
            to: to.into(),
            promotion,
        })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// No legal chess position has more moves than this; the bound makes move
/// containers allocation-free.
pub const MAX_MOVES: usize = 256;

/// Moves are kept on the stack: move lists are created in huge numbers during
/// the search.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O, queenside as O-O-O). When the king moves, the player loses the
    /// ability to castle both sides; when a rook moves or is captured, the
    /// player loses the corresponding side. Loss is permanent for the game.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b0001;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0010;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0100;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b1000;
    }
}

impl CastleRights {
    /// The kingside right of the given player.
    #[must_use]
    pub const fn kingside(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT,
            Player::Black => Self::BLACK_SHORT,
        }
    }

    /// The queenside right of the given player.
    #[must_use]
    pub const fn queenside(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_LONG,
            Player::Black => Self::BLACK_LONG,
        }
    }

    /// Both rights of the given player.
    #[must_use]
    pub fn both(player: Player) -> Self {
        Self::kingside(player) | Self::queenside(player)
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses the castling field of a FEN record: a subset of "KQkq" or "-".
    fn try_from(fen: &str) -> anyhow::Result<Self> {
        if fen == "-" {
            return Ok(Self::empty());
        }
        if fen.is_empty() || fen.len() > 4 {
            bail!("unknown castling rights: expected 1..=4 symbols, got '{fen}'");
        }
        let mut rights = Self::empty();
        for symbol in fen.chars() {
            rights |= match symbol {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!("unknown castling rights symbol: '{symbol}' in '{fen}'"),
            };
        }
        Ok(rights)
    }
}

impl fmt::Display for CastleRights {
    /// Prints castling rights in FEN format.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_empty() {
            return f.write_str("-");
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                write!(f, "{symbol}")?;
            }
        }
        Ok(())
    }
}
