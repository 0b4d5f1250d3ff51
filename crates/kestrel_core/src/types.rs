//! Basic chess vocabulary: colors, piece types and square helpers.
//!
//! Squares are plain `u8` indices with a8 = 0, b8 = 1, ..., h1 = 63, so the
//! rank can be read off the high three bits and the file off the low three.

/// Square index, 0..64 with a8 = 0 and h1 = 63.
pub type Square = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const ALL: [Color; 2] = [Color::White, Color::Black];

    #[inline(always)]
    pub fn other(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    #[inline(always)]
    pub fn idx(self) -> usize {
        self as usize
    }

    #[inline(always)]
    pub fn is_white(self) -> bool {
        self == Color::White
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl Piece {
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    #[inline(always)]
    pub fn idx(self) -> usize {
        self as usize
    }

    /// Inverse of [`Piece::idx`]; out-of-range values map to the king.
    #[inline(always)]
    pub fn from_idx(idx: usize) -> Piece {
        match idx {
            0 => Piece::Pawn,
            1 => Piece::Knight,
            2 => Piece::Bishop,
            3 => Piece::Rook,
            4 => Piece::Queen,
            _ => Piece::King,
        }
    }

    /// Victim term for most-valuable-victim ordering.
    #[inline(always)]
    pub fn mvv(self) -> i32 {
        self as i32 * 100_000
    }

    /// Attacker term for least-valuable-attacker ordering.
    #[inline(always)]
    pub fn lva(self) -> i32 {
        6 - self as i32
    }

    pub fn symbol(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    pub fn from_symbol(ch: char) -> Option<Piece> {
        match ch.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }
}

// Helpers
pub fn file_of(sq: Square) -> i8 {
    (sq & 7) as i8
}

/// Rank index where rank 1 is 0 and rank 8 is 7.
pub fn rank_of(sq: Square) -> i8 {
    7 - (sq >> 3) as i8
}

pub fn sq(file: i8, rank: i8) -> Option<Square> {
    if (0..8).contains(&file) && (0..8).contains(&rank) {
        Some(((7 - rank) as u8) * 8 + (file as u8))
    } else {
        None
    }
}

pub fn sq_to_coord(sq: Square) -> String {
    let f = (b'a' + (sq & 7)) as char;
    let r = (b'8' - (sq >> 3)) as char;
    format!("{f}{r}")
}

pub fn coord_to_sq(c: &str) -> Option<Square> {
    let b = c.as_bytes();
    if b.len() != 2 {
        return None;
    }
    let f = b[0];
    let r = b[1];
    if !(b'a'..=b'h').contains(&f) || !(b'1'..=b'8').contains(&r) {
        return None;
    }
    Some((b'8' - r) * 8 + (f - b'a'))
}

/// Named squares used by castling and the tests.
pub mod squares {
    use super::Square;

    pub const A8: Square = 0;
    pub const B8: Square = 1;
    pub const C8: Square = 2;
    pub const D8: Square = 3;
    pub const E8: Square = 4;
    pub const F8: Square = 5;
    pub const G8: Square = 6;
    pub const H8: Square = 7;
    pub const A1: Square = 56;
    pub const B1: Square = 57;
    pub const C1: Square = 58;
    pub const D1: Square = 59;
    pub const E1: Square = 60;
    pub const F1: Square = 61;
    pub const G1: Square = 62;
    pub const H1: Square = 63;
}
