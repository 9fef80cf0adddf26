use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize, Serializer};


pub const NUM_ROWS: u8 = 8;
pub const NUM_COLS: u8 = 8;
pub const NUM_SQUARES: u8 = NUM_ROWS * NUM_COLS;


const fn const_char_sub(a: char, b: char) -> u8 {
    let a_idx = a as u32;
    let b_idx = b as u32;
    assert!(a_idx >= b_idx);
    let diff = a_idx - b_idx;
    assert!(diff <= u8::MAX as u32);
    diff as u8
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Row {
    idx: u8, // 0-based
}

impl Row {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_ROWS);
        Self { idx }
    }
    pub fn try_from_zero_based(idx: u8) -> Option<Self> {
        (idx < NUM_ROWS).then_some(Self { idx })
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        if ('1'..='8').contains(&ch) {
            Some(Self::from_zero_based(const_char_sub(ch, '1')))
        } else {
            None
        }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'1') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_ROWS).map(Self::from_zero_based)
    }
}


#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct Col {
    idx: u8, // 0-based
}

impl Col {
    pub const fn from_zero_based(idx: u8) -> Self {
        assert!(idx < NUM_COLS);
        Self { idx }
    }
    pub fn try_from_zero_based(idx: u8) -> Option<Self> {
        (idx < NUM_COLS).then_some(Self { idx })
    }
    pub fn from_algebraic(ch: char) -> Option<Self> {
        if ('a'..='h').contains(&ch) {
            Some(Self::from_zero_based(const_char_sub(ch, 'a')))
        } else {
            None
        }
    }
    pub const fn to_zero_based(self) -> u8 { self.idx }
    pub const fn to_algebraic(self) -> char { (self.idx + b'a') as char }
    pub fn all() -> impl DoubleEndedIterator<Item = Self> + Clone {
        (0..NUM_COLS).map(Self::from_zero_based)
    }
}


// A board square. On the wire squares travel as indices: `col + 8 * row`, so that a1 = 0,
// h1 = 7, a2 = 8 and h8 = 63.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Coord {
    pub row: Row,
    pub col: Col,
}

impl Coord {
    pub const fn new(row: Row, col: Col) -> Self { Self { row, col } }

    pub fn from_index(idx: u8) -> Option<Self> {
        (idx < NUM_SQUARES).then(|| Coord {
            row: Row::from_zero_based(idx / NUM_COLS),
            col: Col::from_zero_based(idx % NUM_COLS),
        })
    }
    pub const fn to_index(self) -> u8 { self.col.to_zero_based() + NUM_COLS * self.row.to_zero_based() }

    pub fn from_algebraic(s: &str) -> Option<Self> {
        let (col, row) = s.chars().collect_tuple()?;
        Some(Coord {
            row: Row::from_algebraic(row)?,
            col: Col::from_algebraic(col)?,
        })
    }
    pub fn to_algebraic(self) -> String {
        format!("{}{}", self.col.to_algebraic(), self.row.to_algebraic())
    }

    // Row-major, starting from a1.
    pub fn all() -> impl Iterator<Item = Coord> + Clone {
        Row::all().cartesian_product(Col::all()).map(|(row, col)| Coord { row, col })
    }

    // Dark squares are the ones where row and column have the same parity, e.g. "a1" and "h8".
    pub fn is_dark_square(self) -> bool {
        (self.row.to_zero_based() + self.col.to_zero_based()) % 2 == 0
    }
}

impl fmt::Debug for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Coord({})", self.to_algebraic())
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.to_algebraic()) }
}

impl Serialize for Coord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.to_index())
    }
}

impl<'de> Deserialize<'de> for Coord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let idx = u8::deserialize(deserializer)?;
        Coord::from_index(idx).ok_or_else(|| {
            serde::de::Error::custom(format!("square index {} is out of range", idx))
        })
    }
}


impl Row {
    #![allow(dead_code)]
    pub const _1: Row = Row::from_zero_based(0);
    pub const _2: Row = Row::from_zero_based(1);
    pub const _3: Row = Row::from_zero_based(2);
    pub const _4: Row = Row::from_zero_based(3);
    pub const _5: Row = Row::from_zero_based(4);
    pub const _6: Row = Row::from_zero_based(5);
    pub const _7: Row = Row::from_zero_based(6);
    pub const _8: Row = Row::from_zero_based(7);
}

impl Col {
    #![allow(dead_code)]
    pub const A: Col = Col::from_zero_based(0);
    pub const B: Col = Col::from_zero_based(1);
    pub const C: Col = Col::from_zero_based(2);
    pub const D: Col = Col::from_zero_based(3);
    pub const E: Col = Col::from_zero_based(4);
    pub const F: Col = Col::from_zero_based(5);
    pub const G: Col = Col::from_zero_based(6);
    pub const H: Col = Col::from_zero_based(7);
}

macro_rules! coord_consts {
    ($($name:ident = $col:ident $row:ident,)*) => {
        impl Coord {
            #![allow(dead_code)]
            $(pub const $name: Coord = Coord::new(Row::$row, Col::$col);)*
        }
    };
}

coord_consts! {
    A1 = A _1, A2 = A _2, A3 = A _3, A4 = A _4, A5 = A _5, A6 = A _6, A7 = A _7, A8 = A _8,
    B1 = B _1, B2 = B _2, B3 = B _3, B4 = B _4, B5 = B _5, B6 = B _6, B7 = B _7, B8 = B _8,
    C1 = C _1, C2 = C _2, C3 = C _3, C4 = C _4, C5 = C _5, C6 = C _6, C7 = C _7, C8 = C _8,
    D1 = D _1, D2 = D _2, D3 = D _3, D4 = D _4, D5 = D _5, D6 = D _6, D7 = D _7, D8 = D _8,
    E1 = E _1, E2 = E _2, E3 = E _3, E4 = E _4, E5 = E _5, E6 = E _6, E7 = E _7, E8 = E _8,
    F1 = F _1, F2 = F _2, F3 = F _3, F4 = F _4, F5 = F _5, F6 = F _6, F7 = F _7, F8 = F _8,
    G1 = G _1, G2 = G _2, G3 = G _3, G4 = G _4, G5 = G _5, G6 = G _6, G7 = G _7, G8 = G _8,
    H1 = H _1, H2 = H _2, H3 = H _3, H4 = H _4, H5 = H _5, H6 = H _6, H7 = H _7, H8 = H _8,
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_index() {
        assert_eq!(Coord::A1.to_index(), 0);
        assert_eq!(Coord::B1.to_index(), 1);
        assert_eq!(Coord::A2.to_index(), 8);
        assert_eq!(Coord::H8.to_index(), 63);
        assert_eq!(Coord::from_index(9), Some(Coord::B2));
        assert_eq!(Coord::from_index(64), None);
        for coord in Coord::all() {
            assert_eq!(Coord::from_index(coord.to_index()), Some(coord));
        }
    }

    #[test]
    fn algebraic() {
        assert_eq!(Coord::from_algebraic("a1"), Some(Coord::A1));
        assert_eq!(Coord::from_algebraic("e4"), Some(Coord::E4));
        assert_eq!(Coord::E4.to_algebraic(), "e4");
        assert_eq!(Coord::from_algebraic("i1"), None);
        assert_eq!(Coord::from_algebraic("a0"), None);
        assert_eq!(Coord::from_algebraic("a10"), None);
        assert_eq!(Coord::from_algebraic(""), None);
    }

    #[test]
    fn square_color() {
        assert!(Coord::A1.is_dark_square());
        assert!(Coord::H8.is_dark_square());
        assert!(!Coord::H1.is_dark_square());
        assert!(!Coord::E4.is_dark_square());
    }

    #[test]
    fn serde_as_index() {
        assert_eq!(serde_json::to_string(&Coord::E2).unwrap(), "12");
        assert_eq!(serde_json::from_str::<Coord>("28").unwrap(), Coord::E4);
        assert!(serde_json::from_str::<Coord>("64").is_err());
    }
}
