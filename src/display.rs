// Board geometry as seen on screen. Both front ends go through these helpers, so the browser
// and the terminal agree on which way the board is turned.

use std::ops;

use crate::coord::{Col, Coord, Row, NUM_COLS, NUM_ROWS};
use crate::force::Force;
use crate::grid::Grid;
use crate::piece::PieceOnBoard;


// Lens through which to view the game: pieces of this force are rendered at the bottom.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Perspective {
    pub force: Force,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BoardOrientation {
    Normal,  // White at bottom
    Rotated, // Black at bottom
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SquareColor {
    Light,
    Dark,
}

// These coords describe board squares, like `Coord`. Both `x` and `y` are integers between
// 0 and 7, but row 0 corresponds to the top-most row, which could be row '1' or row '8'.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DisplayCoord {
    pub x: i8,
    pub y: i8,
}

// Point (0., 0.) corresponds to the top left corner of the top left square, while
// point (8., 8.) corresponds to the bottom right corner of the bottom right square.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct DisplayFCoord {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Field {
    pub coord: Coord,
    pub piece: Option<PieceOnBoard>,
    pub color: SquareColor,
}


impl Perspective {
    // Observers see the board from white's side.
    pub fn for_participant(my_force: Option<Force>) -> Self {
        Perspective { force: my_force.unwrap_or(Force::White) }
    }

    pub fn orientation(self) -> BoardOrientation {
        match self.force {
            Force::White => BoardOrientation::Normal,
            Force::Black => BoardOrientation::Rotated,
        }
    }
}

impl SquareColor {
    pub fn of(coord: Coord) -> Self {
        if coord.is_dark_square() { SquareColor::Dark } else { SquareColor::Light }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            SquareColor::Light => "light-square",
            SquareColor::Dark => "dark-square",
        }
    }
}

pub fn to_display_coord(coord: Coord, orientation: BoardOrientation) -> DisplayCoord {
    let row = coord.row.to_zero_based() as i8;
    let col = coord.col.to_zero_based() as i8;
    match orientation {
        BoardOrientation::Normal => DisplayCoord { x: col, y: NUM_ROWS as i8 - row - 1 },
        BoardOrientation::Rotated => DisplayCoord { x: NUM_COLS as i8 - col - 1, y: row },
    }
}

pub fn from_display_row(y: i8, orientation: BoardOrientation) -> Option<Row> {
    let idx = match orientation {
        BoardOrientation::Normal => NUM_ROWS as i8 - y - 1,
        BoardOrientation::Rotated => y,
    };
    Row::try_from_zero_based(u8::try_from(idx).ok()?)
}

pub fn from_display_col(x: i8, orientation: BoardOrientation) -> Option<Col> {
    let idx = match orientation {
        BoardOrientation::Normal => x,
        BoardOrientation::Rotated => NUM_COLS as i8 - x - 1,
    };
    Col::try_from_zero_based(u8::try_from(idx).ok()?)
}

pub fn from_display_coord(q: DisplayCoord, orientation: BoardOrientation) -> Option<Coord> {
    Some(Coord {
        row: from_display_row(q.y, orientation)?,
        col: from_display_col(q.x, orientation)?,
    })
}

// Rows top to bottom, each row left to right, as seen from `perspective`. For black the first
// row is white's back rank read from h to a.
pub fn board_rows(grid: &Grid, perspective: Perspective) -> Vec<Vec<Field>> {
    let orientation = perspective.orientation();
    (0..NUM_ROWS as i8)
        .map(|y| {
            (0..NUM_COLS as i8)
                .filter_map(|x| from_display_coord(DisplayCoord { x, y }, orientation))
                .map(|coord| Field {
                    coord,
                    piece: grid[coord],
                    color: SquareColor::of(coord),
                })
                .collect()
        })
        .collect()
}

impl DisplayFCoord {
    // Position of the top-left corner of a square.
    pub fn square_pivot(coord: DisplayCoord) -> Self {
        DisplayFCoord {
            x: f64::from(coord.x),
            y: f64::from(coord.y),
        }
    }

    pub fn square_center(coord: DisplayCoord) -> Self {
        DisplayFCoord {
            x: f64::from(coord.x) + 0.5,
            y: f64::from(coord.y) + 0.5,
        }
    }

    pub fn to_square(self) -> Option<DisplayCoord> {
        if self.x < 0. || self.y < 0. {
            return None;
        }
        let x = self.x as i32;
        let y = self.y as i32;
        if x < NUM_COLS as i32 && y < NUM_ROWS as i32 {
            Some(DisplayCoord {
                x: i8::try_from(x).ok()?,
                y: i8::try_from(y).ok()?,
            })
        } else {
            None
        }
    }
}

impl ops::Add<(f64, f64)> for DisplayFCoord {
    type Output = Self;
    fn add(self, (x, y): (f64, f64)) -> Self::Output {
        DisplayFCoord { x: self.x + x, y: self.y + y }
    }
}

impl ops::Sub for DisplayFCoord {
    type Output = (f64, f64);
    fn sub(self, rhs: DisplayFCoord) -> Self::Output { (self.x - rhs.x, self.y - rhs.y) }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceKind;

    #[test]
    fn display_coord_is_inverse() {
        for orientation in [BoardOrientation::Normal, BoardOrientation::Rotated] {
            for coord in Coord::all() {
                let q = to_display_coord(coord, orientation);
                assert_eq!(from_display_coord(q, orientation), Some(coord));
            }
        }
    }

    #[test]
    fn corners() {
        use BoardOrientation::*;
        assert_eq!(to_display_coord(Coord::A8, Normal), DisplayCoord { x: 0, y: 0 });
        assert_eq!(to_display_coord(Coord::A1, Normal), DisplayCoord { x: 0, y: 7 });
        assert_eq!(to_display_coord(Coord::H1, Rotated), DisplayCoord { x: 0, y: 0 });
        assert_eq!(to_display_coord(Coord::A8, Rotated), DisplayCoord { x: 7, y: 7 });
        assert_eq!(from_display_coord(DisplayCoord { x: 8, y: 0 }, Normal), None);
        assert_eq!(from_display_coord(DisplayCoord { x: -1, y: 0 }, Rotated), None);
    }

    #[test]
    fn pointer_to_square() {
        assert_eq!(DisplayFCoord { x: 0.2, y: 7.9 }.to_square(), Some(DisplayCoord { x: 0, y: 7 }));
        assert_eq!(DisplayFCoord { x: 8.0, y: 1.0 }.to_square(), None);
        assert_eq!(DisplayFCoord { x: -0.3, y: 1.0 }.to_square(), None);
        let center = DisplayFCoord::square_center(DisplayCoord { x: 2, y: 3 });
        assert_eq!(center.to_square(), Some(DisplayCoord { x: 2, y: 3 }));
        assert_eq!(center - DisplayFCoord::square_pivot(DisplayCoord { x: 2, y: 3 }), (0.5, 0.5));
    }

    #[test]
    fn rows_for_black() {
        let grid = Grid::starting_position();
        let rows = board_rows(&grid, Perspective::for_participant(Some(Force::Black)));
        assert_eq!(rows.len(), 8);
        let top = &rows[0];
        assert_eq!(top.iter().map(|f| f.coord).collect::<Vec<_>>(), vec![
            Coord::H1,
            Coord::G1,
            Coord::F1,
            Coord::E1,
            Coord::D1,
            Coord::C1,
            Coord::B1,
            Coord::A1
        ]);
        assert_eq!(top[3].piece, Some(PieceOnBoard::new(PieceKind::King, Force::White)));
        assert_eq!(top[0].color, SquareColor::Light);
        assert_eq!(top[7].color, SquareColor::Dark);
    }

    #[test]
    fn rows_for_observer() {
        let grid = Grid::starting_position();
        let rows = board_rows(&grid, Perspective::for_participant(None));
        assert_eq!(rows[0][0].coord, Coord::A8);
        assert_eq!(rows[7][7].coord, Coord::H1);
        assert_eq!(rows[7][4].piece, Some(PieceOnBoard::new(PieceKind::King, Force::White)));
    }
}
