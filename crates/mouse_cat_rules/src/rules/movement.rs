//! Move validation.

use super::super::{Cell, MAX_CELL, MIN_CELL, MoveError, Role, col_of, row_of};
use tracing::instrument;

/// Checks whether `role` may move the piece on `origin` to `target`.
///
/// Rules are applied in order:
/// 1. the target is not occupied by any piece;
/// 2. cats step one row down, the mouse one row up or down, and both
///    shift exactly one column;
/// 3. steps that leave the board over an edge are refused;
/// 4. the target index must be on the board.
///
/// Returns the target as a [`Cell`] on success. Does not look at whose
/// turn it is or who owns `origin`.
///
/// # Errors
///
/// [`MoveError::InvalidMove`] for rules 1–3, [`MoveError::InvalidCell`]
/// for rule 4.
#[instrument(level = "trace")]
pub fn validate_move(
    occupied: &[Cell],
    role: Role,
    origin: Cell,
    target: i32,
) -> Result<Cell, MoveError> {
    let refuse = || MoveError::InvalidMove {
        origin: origin.index(),
        target,
    };

    if occupied.iter().any(|cell| cell.index() == target) {
        return Err(refuse());
    }

    let (row_ori, col_ori) = (origin.row(), origin.col());
    let (row_tar, col_tar) = (row_of(target), col_of(target));

    let row_ok = match role {
        Role::Cat => row_tar == row_ori + 1,
        Role::Mouse => (row_tar - row_ori).abs() == 1,
    };
    if !row_ok || (col_tar - col_ori).abs() != 1 {
        return Err(refuse());
    }

    let over_edge = (col_ori == 8 && col_tar == 9)
        || (col_ori == 1 && col_tar == 0)
        || (row_ori == 1 && row_tar == 0)
        || (row_ori == 8 && row_tar == 9);
    if over_edge {
        return Err(refuse());
    }

    if !(MIN_CELL..=MAX_CELL).contains(&target) {
        return Err(MoveError::InvalidCell(target));
    }

    Cell::new(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Pieces;

    fn cell(i: i32) -> Cell {
        Cell::new(i).unwrap()
    }

    #[test]
    fn test_cat_moves_forward_diagonally() {
        let occupied = Pieces::INITIAL.occupied();
        assert_eq!(validate_move(&occupied, Role::Cat, cell(0), 9), Ok(cell(9)));
        assert_eq!(validate_move(&occupied, Role::Cat, cell(2), 9), Ok(cell(9)));
        assert_eq!(validate_move(&occupied, Role::Cat, cell(2), 11), Ok(cell(11)));
    }

    #[test]
    fn test_cat_cannot_move_backwards() {
        let occupied = [cell(27), cell(59)];
        assert_eq!(
            validate_move(&occupied, Role::Cat, cell(27), 18),
            Err(MoveError::InvalidMove { origin: 27, target: 18 })
        );
        assert!(validate_move(&occupied, Role::Cat, cell(27), 36).is_ok());
    }

    #[test]
    fn test_mouse_moves_both_directions() {
        let occupied = [cell(0), cell(27)];
        for target in [18, 20, 34, 36] {
            assert!(validate_move(&occupied, Role::Mouse, cell(27), target).is_ok());
        }
    }

    #[test]
    fn test_occupied_target_rejected() {
        let occupied = Pieces::INITIAL.occupied();
        assert!(matches!(
            validate_move(&occupied, Role::Mouse, cell(59), 59),
            Err(MoveError::InvalidMove { .. })
        ));
        let occupied = [cell(9), cell(50), cell(59)];
        assert!(matches!(
            validate_move(&occupied, Role::Mouse, cell(59), 50),
            Err(MoveError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_straight_and_long_moves_rejected() {
        let occupied = [cell(27)];
        for target in [19, 35, 26, 28, 45, 9] {
            assert!(matches!(
                validate_move(&occupied, Role::Mouse, cell(27), target),
                Err(MoveError::InvalidMove { .. })
            ));
        }
    }

    #[test]
    fn test_wraparound_rejected() {
        // Cell 15 is the right edge of row 2; 24 is the left edge of row 4.
        let occupied = [cell(15)];
        assert!(matches!(
            validate_move(&occupied, Role::Cat, cell(15), 24),
            Err(MoveError::InvalidMove { .. })
        ));
        // Cell 31 is column 8: 40 would be "column 9" of row 4 if indices wrapped.
        let occupied = [cell(31)];
        assert!(matches!(
            validate_move(&occupied, Role::Mouse, cell(31), 40),
            Err(MoveError::InvalidMove { .. })
        ));
        assert!(validate_move(&occupied, Role::Cat, cell(15), 22).is_ok());
    }

    #[test]
    fn test_off_board_steps_rejected_as_moves() {
        let occupied = [cell(57)];
        assert!(matches!(
            validate_move(&occupied, Role::Mouse, cell(57), 64),
            Err(MoveError::InvalidMove { .. })
        ));
        assert!(matches!(
            validate_move(&occupied, Role::Mouse, cell(57), 66),
            Err(MoveError::InvalidMove { .. })
        ));
        let occupied = [cell(6)];
        assert!(matches!(
            validate_move(&occupied, Role::Mouse, cell(6), -1),
            Err(MoveError::InvalidMove { .. })
        ));
    }

    #[test]
    fn test_validation_is_repeatable() {
        let occupied = Pieces::INITIAL.occupied();
        let first = validate_move(&occupied, Role::Mouse, cell(59), 50);
        for _ in 0..10 {
            assert_eq!(validate_move(&occupied, Role::Mouse, cell(59), 50), first);
        }
        assert_eq!(occupied, Pieces::INITIAL.occupied());
    }
}
