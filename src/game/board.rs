use std::fmt;

use super::Player;
use crate::error::GameError;

pub const HEIGHT: usize = 6;
pub const WIDTH: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Player),
}

impl Cell {
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn owner(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::Taken(player) => Some(player),
        }
    }
}

/// The playing grid, indexed `[row][col]`.
/// Row 0 is the bottom row; pieces stack upward from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    cells: [[Cell; WIDTH]; HEIGHT],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Board {
            cells: [[Cell::Empty; WIDTH]; HEIGHT],
        }
    }

    /// Get the cell at a specific position
    pub fn get(&self, row: usize, col: usize) -> Result<Cell, GameError> {
        Self::check_bounds(row, col)?;
        Ok(self.cells[row][col])
    }

    /// Claim an empty cell for `player`. Occupied cells are never overwritten.
    pub fn set(&mut self, row: usize, col: usize, player: Player) -> Result<(), GameError> {
        Self::check_bounds(row, col)?;
        let cell = &mut self.cells[row][col];
        if !cell.is_empty() {
            return Err(GameError::IllegalMove { row, col });
        }
        *cell = player.to_cell();
        Ok(())
    }

    /// Whether `player` owns the cell at signed coordinates; off-board is `false`.
    pub(crate) fn owned_by(&self, row: isize, col: isize, player: Player) -> bool {
        if row < 0 || col < 0 {
            return false;
        }
        let (row, col) = (row as usize, col as usize);
        row < HEIGHT && col < WIDTH && self.cells[row][col] == Cell::Taken(player)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().flatten().all(|cell| !cell.is_empty())
    }

    /// Number of occupied cells
    pub fn filled(&self) -> usize {
        self.cells.iter().flatten().filter(|cell| !cell.is_empty()).count()
    }

    fn check_bounds(row: usize, col: usize) -> Result<(), GameError> {
        if row < HEIGHT && col < WIDTH {
            Ok(())
        } else {
            Err(GameError::OutOfBounds { row, col })
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders top row first, so the output reads like the physical board.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter().rev() {
            let line: String = row
                .iter()
                .map(|cell| cell.owner().map_or('.', Player::symbol))
                .collect();
            writeln!(f, "{line}")?;
        }
        let footer: String = (1..=WIDTH).map(|n| char::from(b'0' + n as u8)).collect();
        write!(f, "{footer}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                assert_eq!(board.get(row, col), Ok(Cell::Empty));
            }
        }
        assert_eq!(board.filled(), 0);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let board = Board::new();
        assert_eq!(
            board.get(HEIGHT, 0),
            Err(GameError::OutOfBounds { row: HEIGHT, col: 0 })
        );
        assert_eq!(
            board.get(0, WIDTH),
            Err(GameError::OutOfBounds { row: 0, col: WIDTH })
        );
    }

    #[test]
    fn test_set_rejects_occupied_cell() {
        let mut board = Board::new();
        board.set(0, 3, Player::One).unwrap();
        assert_eq!(
            board.set(0, 3, Player::Two),
            Err(GameError::IllegalMove { row: 0, col: 3 })
        );
        // Owner is unchanged
        assert_eq!(board.get(0, 3), Ok(Cell::Taken(Player::One)));
    }

    #[test]
    fn test_owned_by_off_board_is_false() {
        let mut board = Board::new();
        board.set(0, 0, Player::One).unwrap();
        assert!(board.owned_by(0, 0, Player::One));
        assert!(!board.owned_by(0, 0, Player::Two));
        assert!(!board.owned_by(-1, 0, Player::One));
        assert!(!board.owned_by(0, WIDTH as isize, Player::One));
        assert!(!board.owned_by(HEIGHT as isize, 0, Player::One));
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for row in 0..HEIGHT {
            for col in 0..WIDTH {
                assert!(!board.is_full());
                board.set(row, col, Player::One).unwrap();
            }
        }
        assert!(board.is_full());
        assert_eq!(board.filled(), HEIGHT * WIDTH);
    }

    #[test]
    fn test_display_puts_bottom_row_last() {
        let mut board = Board::new();
        board.set(0, 0, Player::One).unwrap();
        board.set(1, 0, Player::Two).unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), HEIGHT + 1);
        assert_eq!(lines[HEIGHT - 1], "X......");
        assert_eq!(lines[HEIGHT - 2], "O......");
        assert_eq!(lines[HEIGHT], "1234567");
    }
}
