use std::collections::BTreeMap;
use std::{fmt, ops};

use ndarray::{Array, Array2};

use crate::coord::{Col, Coord, Row, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::piece::{PieceKind, PieceOnBoard};


// Full board as sent by the server: only occupied squares are listed.
pub type BoardSnapshot = BTreeMap<Coord, PieceOnBoard>;

#[derive(Clone, PartialEq, Eq)]
pub struct Grid {
    data: Array2<Option<PieceOnBoard>>,
}

impl Grid {
    pub fn new() -> Self {
        Grid {
            data: Array::from_elem((NUM_ROWS as usize, NUM_COLS as usize), None),
        }
    }

    pub fn starting_position() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        let mut grid = Grid::new();
        for (force, back_row, pawn_row) in [(Force::White, 0, 1), (Force::Black, 7, 6)] {
            for (col, kind) in BACK_RANK.into_iter().enumerate() {
                let col = col as u8;
                grid[square(back_row, col)] = Some(PieceOnBoard::new(kind, force));
                grid[square(pawn_row, col)] = Some(PieceOnBoard::new(Pawn, force));
            }
        }
        grid
    }

    pub fn from_snapshot(snapshot: &BoardSnapshot) -> Self {
        let mut grid = Grid::new();
        for (&coord, &piece) in snapshot {
            grid[coord] = Some(piece);
        }
        grid
    }

    pub fn to_snapshot(&self) -> BoardSnapshot { self.pieces().collect() }

    pub fn pieces(&self) -> impl Iterator<Item = (Coord, PieceOnBoard)> + '_ {
        Coord::all().filter_map(|coord| self[coord].map(|piece| (coord, piece)))
    }

    pub fn find_king(&self, force: Force) -> Option<Coord> {
        self.pieces()
            .find(|(_, piece)| piece.kind == PieceKind::King && piece.force == force)
            .map(|(coord, _)| coord)
    }

    // Moves the piece at `from` to `to`, returns the piece that was captured (if any).
    // Returns `None` without changes if `from` is empty.
    pub fn relocate(&mut self, from: Coord, to: Coord) -> Option<Option<PieceOnBoard>> {
        let piece = self[from].take()?;
        Some(self[to].replace(piece))
    }
}

impl ops::Index<Coord> for Grid {
    type Output = Option<PieceOnBoard>;
    fn index(&self, pos: Coord) -> &Self::Output { &self.data[coord_to_index(pos)] }
}

impl ops::IndexMut<Coord> for Grid {
    fn index_mut(&mut self, pos: Coord) -> &mut Self::Output { &mut self.data[coord_to_index(pos)] }
}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Grid ")?;
        f.debug_map()
            .entries(self.pieces().map(|(coord, piece)| {
                (coord.to_algebraic(), format!("{:?}-{:?}", piece.force, piece.kind))
            }))
            .finish()
    }
}

fn square(row: u8, col: u8) -> Coord {
    Coord::new(Row::from_zero_based(row), Col::from_zero_based(col))
}

fn coord_to_index(pos: Coord) -> [usize; 2] {
    [
        pos.row.to_zero_based() as usize,
        pos.col.to_zero_based() as usize,
    ]
}
