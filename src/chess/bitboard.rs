//! [`Bitboard`]-based representation of square sets. Bitboards utilize the
//! fact that modern processors operate on 64 bit integers, so set operations
//! over all 64 squares are single instructions. The move validator uses them
//! for straight-line path masks; the square-centric board in
//! [`crate::chess::position`] complements them for "what stands on this
//! square" queries.
//!
//! [Bitboard]: https://www.chessprogramming.org/Bitboards

use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, Not};

use itertools::Itertools;

use crate::chess::core::{File, Rank, Square, BOARD_SIZE, BOARD_WIDTH};

/// Represents a set of squares and provides common operations (e.g. AND, OR,
/// XOR) over these sets. Each bit corresponds to one of 64 squares of the
/// chess board.
///
/// Mirroring [`Square`] semantics, the least significant bit corresponds to
/// A1, and the most significant bit to H8.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Bitboard(u64);

impl Bitboard {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn full() -> Self {
        Self(u64::MAX)
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn from_squares(squares: &[Square]) -> Self {
        let mut result = Self::empty();
        for square in squares {
            result |= Self::from(*square);
        }
        result
    }

    /// Constant-time membership test.
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.0 >> square as u8) & 1 != 0
    }

    /// Adds the square to the set.
    pub fn insert(&mut self, square: Square) {
        self.0 |= 1u64 << square as u8;
    }

    /// Removes the square from the set.
    pub fn clear(&mut self, square: Square) {
        self.0 &= !(1u64 << square as u8);
    }

    /// Number of squares in the set.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_any(self) -> bool {
        self.0 != 0
    }
}

impl BitOr for Bitboard {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Bitboard {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl BitAndAssign for Bitboard {
    fn bitand_assign(&mut self, rhs: Self) {
        self.0 &= rhs.0;
    }
}

impl BitXor for Bitboard {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        Self(self.0 ^ rhs.0)
    }
}

impl Not for Bitboard {
    type Output = Self;

    fn not(self) -> Self::Output {
        Self(!self.0)
    }
}

impl From<Square> for Bitboard {
    fn from(square: Square) -> Self {
        Self(1u64 << square as u8)
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

impl fmt::Debug for Bitboard {
    /// Dumps the set as an 8x8 grid of '1'/'.' with rank 8 on top, the same
    /// orientation boards are printed in.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            format!("{:#066b}", self.0)
                .chars()
                .rev()
                .take(BOARD_SIZE as usize)
                .chunks(BOARD_WIDTH as usize)
                .into_iter()
                .map(|chunk| chunk
                    .map(|ch| match ch {
                        '1' => '1',
                        '0' => '.',
                        _ => unreachable!(),
                    })
                    .join(SQUARE_SEPARATOR))
                .collect::<Vec<String>>()
                .iter()
                .rev()
                .join(LINE_SEPARATOR)
        )
    }
}

const fn file_bits(file: u8) -> u64 {
    0x0101_0101_0101_0101 << file
}

const fn rank_bits(rank: u8) -> u64 {
    0xFF << (rank * BOARD_WIDTH)
}

const fn build_files() -> [Bitboard; BOARD_WIDTH as usize] {
    let mut masks = [Bitboard::empty(); BOARD_WIDTH as usize];
    let mut file = 0;
    while file < BOARD_WIDTH {
        masks[file as usize] = Bitboard::from_bits(file_bits(file));
        file += 1;
    }
    masks
}

const fn build_ranks() -> [Bitboard; BOARD_WIDTH as usize] {
    let mut masks = [Bitboard::empty(); BOARD_WIDTH as usize];
    let mut rank = 0;
    while rank < BOARD_WIDTH {
        masks[rank as usize] = Bitboard::from_bits(rank_bits(rank));
        rank += 1;
    }
    masks
}

const fn build_shade(parity: u8) -> Bitboard {
    let mut bits = 0u64;
    let mut square = 0;
    while square < BOARD_SIZE {
        if (square / BOARD_WIDTH + square % BOARD_WIDTH) % 2 == parity {
            bits |= 1 << square;
        }
        square += 1;
    }
    Bitboard::from_bits(bits)
}

type BetweenTable = [[Bitboard; BOARD_WIDTH as usize]; BOARD_WIDTH as usize];

const fn build_between_ranks() -> BetweenTable {
    let mut table = [[Bitboard::empty(); BOARD_WIDTH as usize]; BOARD_WIDTH as usize];
    let mut low = 0;
    while low < BOARD_WIDTH {
        let mut high = 0;
        while high < BOARD_WIDTH {
            let (min, max) = if low < high { (low, high) } else { (high, low) };
            let mut bits = 0u64;
            let mut line = min + 1;
            while line < max {
                bits |= rank_bits(line);
                line += 1;
            }
            table[low as usize][high as usize] = Bitboard::from_bits(bits);
            high += 1;
        }
        low += 1;
    }
    table
}

const fn build_between_files() -> BetweenTable {
    let mut table = [[Bitboard::empty(); BOARD_WIDTH as usize]; BOARD_WIDTH as usize];
    let mut low = 0;
    while low < BOARD_WIDTH {
        let mut high = 0;
        while high < BOARD_WIDTH {
            let (min, max) = if low < high { (low, high) } else { (high, low) };
            let mut bits = 0u64;
            let mut line = min + 1;
            while line < max {
                bits |= file_bits(line);
                line += 1;
            }
            table[low as usize][high as usize] = Bitboard::from_bits(bits);
            high += 1;
        }
        low += 1;
    }
    table
}

/// Mask of each file, a through h.
pub const FILE_MASKS: [Bitboard; BOARD_WIDTH as usize] = build_files();

/// Mask of each rank, 1 through 8.
pub const RANK_MASKS: [Bitboard; BOARD_WIDTH as usize] = build_ranks();

/// Squares of the light shade (h1 is light).
pub const LIGHT_SQUARES: Bitboard = build_shade(1);

/// Squares of the dark shade (a1 is dark).
pub const DARK_SQUARES: Bitboard = build_shade(0);

const BETWEEN_RANKS: BetweenTable = build_between_ranks();
const BETWEEN_FILES: BetweenTable = build_between_files();

/// Union of the ranks strictly between the two given ranks (empty for equal
/// or adjacent ranks). Order of arguments does not matter.
#[must_use]
pub const fn ranks_between(first: Rank, second: Rank) -> Bitboard {
    BETWEEN_RANKS[first as usize][second as usize]
}

/// Union of the files strictly between the two given files (empty for equal
/// or adjacent files). Order of arguments does not matter.
#[must_use]
pub const fn files_between(first: File, second: File) -> Bitboard {
    BETWEEN_FILES[first as usize][second as usize]
}

/// The raw reach of a rook standing on the square: its full file and rank,
/// excluding the square itself. Blockers are not taken into account.
#[must_use]
pub fn rook_reach(square: Square) -> Bitboard {
    FILE_MASKS[square.file() as usize] ^ RANK_MASKS[square.rank() as usize]
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{
        files_between, ranks_between, rook_reach, Bitboard, DARK_SQUARES, FILE_MASKS, LIGHT_SQUARES,
        RANK_MASKS,
    };
    use crate::chess::core::{File, Rank, Square};

    #[test]
    fn basics() {
        assert_eq!(std::mem::size_of::<Bitboard>(), 8);
        assert_eq!(Bitboard::full().bits(), u64::MAX);
        assert_eq!(Bitboard::empty().bits(), u64::MIN);

        assert_eq!(Bitboard::from(Square::A1).bits(), 1);
        assert_eq!(Bitboard::from(Square::B1).bits(), 2);
        assert_eq!(Bitboard::from(Square::D1).bits(), 8);
        assert_eq!(Bitboard::from(Square::H8).bits(), 1u64 << 63);

        assert_eq!(
            Bitboard::from(Square::D1) | Bitboard::from(Square::B1),
            Bitboard::from_bits(0b10 | 0b1000)
        );

        let mut set = Bitboard::empty();
        set.insert(Square::E4);
        assert!(set.contains(Square::E4));
        assert!(!set.contains(Square::E5));
        assert_eq!(set.count(), 1);
        set.clear(Square::E4);
        assert!(set.is_empty());
        assert!(!set.has_any());
        assert_eq!((!Bitboard::empty()).count(), 64);
    }

    #[test]
    fn file_and_rank_masks() {
        assert_eq!(FILE_MASKS[File::A as usize].bits(), 0x0101_0101_0101_0101);
        assert_eq!(RANK_MASKS[Rank::R1 as usize].bits(), 0xFF);
        for file in 0..8 {
            assert_eq!(FILE_MASKS[file].count(), 8);
        }
        for rank in 0..8 {
            assert_eq!(RANK_MASKS[rank].count(), 8);
        }
        assert!(FILE_MASKS[File::D as usize].contains(Square::D5));
        assert!(RANK_MASKS[Rank::R4 as usize].contains(Square::G4));
    }

    #[test]
    fn shades() {
        assert_eq!(LIGHT_SQUARES.count(), 32);
        assert_eq!(DARK_SQUARES.count(), 32);
        assert_eq!(LIGHT_SQUARES & DARK_SQUARES, Bitboard::empty());
        assert_eq!(LIGHT_SQUARES | DARK_SQUARES, Bitboard::full());
        assert!(DARK_SQUARES.contains(Square::A1));
        assert!(LIGHT_SQUARES.contains(Square::H1));
        assert!(LIGHT_SQUARES.contains(Square::A8));
    }

    #[test]
    fn between_masks() {
        assert_eq!(ranks_between(Rank::R1, Rank::R2), Bitboard::empty());
        assert_eq!(ranks_between(Rank::R4, Rank::R4), Bitboard::empty());
        assert_eq!(
            ranks_between(Rank::R1, Rank::R4),
            RANK_MASKS[Rank::R2 as usize] | RANK_MASKS[Rank::R3 as usize]
        );
        // Argument order does not matter.
        assert_eq!(
            ranks_between(Rank::R8, Rank::R5),
            ranks_between(Rank::R5, Rank::R8)
        );
        assert_eq!(
            files_between(File::C, File::F),
            FILE_MASKS[File::D as usize] | FILE_MASKS[File::E as usize]
        );
    }

    #[test]
    fn rook_reach_shape() {
        let reach = rook_reach(Square::E4);
        assert_eq!(reach.count(), 14);
        assert!(!reach.contains(Square::E4));
        assert!(reach.contains(Square::E8));
        assert!(reach.contains(Square::A4));
        assert!(!reach.contains(Square::D5));
    }

    #[test]
    fn grid_dump() {
        #[rustfmt::skip]
        assert_eq!(
            format!("{:?}", Bitboard::from(Square::G5) | Bitboard::from(Square::B8)),
            ". 1 . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . 1 .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . .\n\
             . . . . . . . ."
        );
    }
}
