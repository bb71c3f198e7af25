//! Board geometry and piece layout.
//!
//! Cells are numbered 0..=63 in row-major order. Only dark cells hold
//! pieces: on even rows the even columns are dark, on odd rows the odd
//! columns.

use super::MoveError;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Lowest cell index.
pub const MIN_CELL: i32 = 0;

/// Highest cell index.
pub const MAX_CELL: i32 = 63;

/// Width and height of the board.
pub const BOARD_SIZE: usize = 8;

/// Starting cells of the four cats (the top row).
pub const CAT_START: [Cell; 4] = [Cell(0), Cell(2), Cell(4), Cell(6)];

/// Starting cell of the mouse.
pub const MOUSE_START: Cell = Cell(59);

/// Rendered board: 0 empty, 1..=4 cat number, -1 mouse.
pub type Board = [[i8; BOARD_SIZE]; BOARD_SIZE];

/// Returns true if `cell` is on the board and on a dark square.
pub fn is_dark_cell(cell: i32) -> bool {
    if !(MIN_CELL..=MAX_CELL).contains(&cell) {
        return false;
    }
    if (cell / 8) % 2 == 0 {
        cell % 2 == 0
    } else {
        cell % 2 == 1
    }
}

/// Validates a piece placement.
///
/// # Errors
///
/// Returns [`MoveError::InvalidCell`] if the cell is off the board or light.
pub fn validate_position(cell: i32) -> Result<Cell, MoveError> {
    if is_dark_cell(cell) {
        Ok(Cell(cell as u8))
    } else {
        Err(MoveError::InvalidCell(cell))
    }
}

/// 1-based row of a raw cell index.
///
/// Uses floor division so that indices just off either edge land on
/// row 0 or row 9.
pub fn row_of(cell: i32) -> i32 {
    cell.div_euclid(8) + 1
}

/// 1-based column of a raw cell index.
pub fn col_of(cell: i32) -> i32 {
    cell.rem_euclid(8) + 1
}

/// A dark cell holding (or able to hold) a piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Cell(u8);

impl Cell {
    /// Creates a cell, validating that it is a dark square.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidCell`] for off-board or light squares.
    pub fn new(cell: i32) -> Result<Self, MoveError> {
        validate_position(cell)
    }

    /// Raw index in 0..=63.
    pub fn index(self) -> i32 {
        i32::from(self.0)
    }

    /// 1-based row.
    pub fn row(self) -> i32 {
        row_of(self.index())
    }

    /// 1-based column.
    pub fn col(self) -> i32 {
        col_of(self.index())
    }

    /// True if `other` is one diagonal step away.
    pub fn is_diagonal_neighbor(self, other: Cell) -> bool {
        (self.row() - other.row()).abs() == 1 && (self.col() - other.col()).abs() == 1
    }
}

impl TryFrom<i32> for Cell {
    type Error = MoveError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Cell::new(value)
    }
}

impl From<Cell> for i32 {
    fn from(cell: Cell) -> Self {
        cell.index()
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Positions of all five pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pieces {
    cats: [Cell; 4],
    mouse: Cell,
}

impl Pieces {
    /// The canonical starting layout.
    pub const INITIAL: Pieces = Pieces {
        cats: CAT_START,
        mouse: MOUSE_START,
    };

    /// Builds a layout from raw indices, validating each one.
    ///
    /// Overlap is not checked here; see
    /// [`NoOverlapInvariant`](crate::NoOverlapInvariant).
    ///
    /// # Errors
    ///
    /// Returns [`MoveError::InvalidCell`] for the first invalid position.
    #[instrument]
    pub fn new(cats: [i32; 4], mouse: i32) -> Result<Self, MoveError> {
        Ok(Self {
            cats: [
                Cell::new(cats[0])?,
                Cell::new(cats[1])?,
                Cell::new(cats[2])?,
                Cell::new(cats[3])?,
            ],
            mouse: Cell::new(mouse)?,
        })
    }

    /// Cat positions, in cat-number order.
    pub fn cats(&self) -> &[Cell; 4] {
        &self.cats
    }

    /// Mouse position.
    pub fn mouse(&self) -> Cell {
        self.mouse
    }

    /// All occupied cells: the four cats then the mouse.
    pub fn occupied(&self) -> [Cell; 5] {
        [
            self.cats[0],
            self.cats[1],
            self.cats[2],
            self.cats[3],
            self.mouse,
        ]
    }

    /// Index of the cat standing on `cell`, if any.
    pub fn cat_at(&self, cell: i32) -> Option<usize> {
        self.cats.iter().position(|c| c.index() == cell)
    }

    /// True if the mouse stands on `cell`.
    pub fn mouse_at(&self, cell: i32) -> bool {
        self.mouse.index() == cell
    }

    pub(crate) fn set_cat(&mut self, index: usize, cell: Cell) {
        self.cats[index] = cell;
    }

    pub(crate) fn set_mouse(&mut self, cell: Cell) {
        self.mouse = cell;
    }
}

impl Default for Pieces {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Renders a layout as 8 rows of 8 cells.
///
/// Cells are bucketed row-major: cell `c` lands at `[c / 8][c % 8]`.
#[instrument]
pub fn render_board(pieces: &Pieces) -> Board {
    let mut flat = [0i8; 64];
    for (number, cat) in pieces.cats().iter().enumerate() {
        flat[cat.index() as usize] = number as i8 + 1;
    }
    flat[pieces.mouse().index() as usize] = -1;

    let mut board: Board = [[0; BOARD_SIZE]; BOARD_SIZE];
    for (row, chunk) in flat.chunks(BOARD_SIZE).enumerate() {
        board[row].copy_from_slice(chunk);
    }
    board
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dark_cells_follow_checkerboard() {
        assert!(is_dark_cell(0));
        assert!(!is_dark_cell(1));
        assert!(is_dark_cell(9));
        assert!(!is_dark_cell(8));
        assert!(is_dark_cell(59));
        assert!(is_dark_cell(63));
        assert!(!is_dark_cell(62));
    }

    #[test]
    fn test_dark_cell_count() {
        let dark = (MIN_CELL..=MAX_CELL).filter(|c| is_dark_cell(*c)).count();
        assert_eq!(dark, 32);
    }

    #[test]
    fn test_out_of_range_cells_rejected() {
        assert_eq!(validate_position(-1), Err(MoveError::InvalidCell(-1)));
        assert_eq!(validate_position(64), Err(MoveError::InvalidCell(64)));
        assert_eq!(validate_position(3), Err(MoveError::InvalidCell(3)));
    }

    #[test]
    fn test_row_col_decomposition() {
        assert_eq!((row_of(0), col_of(0)), (1, 1));
        assert_eq!((row_of(7), col_of(7)), (1, 8));
        assert_eq!((row_of(59), col_of(59)), (8, 4));
        assert_eq!((row_of(-1), col_of(-1)), (0, 8));
        assert_eq!((row_of(64), col_of(64)), (9, 1));
    }

    #[test]
    fn test_diagonal_neighbors() {
        let a = Cell::new(9).unwrap();
        assert!(a.is_diagonal_neighbor(Cell::new(0).unwrap()));
        assert!(a.is_diagonal_neighbor(Cell::new(18).unwrap()));
        assert!(!a.is_diagonal_neighbor(Cell::new(27).unwrap()));
    }

    #[test]
    fn test_initial_board_rendering() {
        let board = render_board(&Pieces::INITIAL);
        assert_eq!(board[0], [1, 0, 2, 0, 3, 0, 4, 0]);
        assert_eq!(board[7], [0, 0, 0, -1, 0, 0, 0, 0]);
        for row in &board[1..7] {
            assert_eq!(*row, [0; 8]);
        }
    }

    #[test]
    fn test_cell_serializes_as_integer() {
        let json = serde_json::to_string(&Cell::new(27).unwrap()).unwrap();
        assert_eq!(json, "27");
        assert!(serde_json::from_str::<Cell>("28").is_err());
    }

    #[test]
    fn test_pieces_rejects_light_square() {
        assert_eq!(
            Pieces::new([0, 2, 4, 5], 59),
            Err(MoveError::InvalidCell(5))
        );
    }
}
