use log::{debug, info, warn};

use super::{Cell, GameState, Player, HEIGHT, WIDTH};
use crate::error::GameError;

/// Pieces in a line needed to win.
pub const CONNECT: usize = 4;

/// Outward ray directions as (row step, col step): right, up, up-right, up-left.
/// Every line of four is found as an outward ray from one of its cells.
const DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

/// Result of a single drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropResult {
    /// Column had no empty cell; nothing changed.
    ColumnFull,
    Continue,
    Win(Player),
    Tie,
}

impl DropResult {
    pub fn is_terminal(self) -> bool {
        matches!(self, DropResult::Win(_) | DropResult::Tie)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    #[default]
    InProgress,
    Won(Player),
    Tied,
}

impl GameStatus {
    pub fn is_finished(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    /// Message announced when the game ends; `None` while in progress.
    pub fn message(self) -> Option<String> {
        match self {
            GameStatus::InProgress => None,
            GameStatus::Won(player) => Some(format!("{player} won!")),
            GameStatus::Tied => Some("IT IS A TIE".to_string()),
        }
    }
}

/// A piece that has landed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub row: usize,
    pub column: usize,
    pub player: Player,
}

/// Drop resolution, win/tie detection and turn sequencing over one [`GameState`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameEngine {
    state: GameState,
    status: GameStatus,
    last_move: Option<Move>,
}

impl GameEngine {
    pub fn new() -> Self {
        GameEngine {
            state: GameState::new(),
            status: GameStatus::InProgress,
            last_move: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn active_player(&self) -> Player {
        self.state.active_player()
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.last_move
    }

    /// Lowest empty row in `column`, or `None` when the column is full.
    pub fn find_drop_row(&self, column: usize) -> Result<Option<usize>, GameError> {
        if column >= WIDTH {
            return Err(GameError::ColumnOutOfBounds(column));
        }
        for row in 0..HEIGHT {
            if self.state.cell_at(row, column)? == Cell::Empty {
                return Ok(Some(row));
            }
        }
        Ok(None)
    }

    /// Drop a piece for `player` into `column`.
    ///
    /// On `Continue` the active player is flipped. On `Win` or `Tie` the game is
    /// marked over and the active player stays put. `ColumnFull` leaves
    /// everything untouched. Fails with [`GameError::GameAlreadyOver`] once the
    /// game has ended.
    pub fn apply_drop(&mut self, column: usize, player: Player) -> Result<DropResult, GameError> {
        if self.state.is_game_over() {
            return Err(GameError::GameAlreadyOver);
        }

        let Some(row) = self.find_drop_row(column)? else {
            debug!("column {column} is full, drop by {player} ignored");
            return Ok(DropResult::ColumnFull);
        };

        self.state.set_cell(row, column, player).inspect_err(|err| {
            warn!("drop resolution hit an occupied cell: {err}");
        })?;
        self.last_move = Some(Move {
            row,
            column,
            player,
        });
        debug!("{player} dropped into column {column}, landed on row {row}");

        // Win takes precedence over a full board.
        let result = if self.check_win(player) {
            DropResult::Win(player)
        } else if self.check_full() {
            DropResult::Tie
        } else {
            DropResult::Continue
        };

        match result {
            DropResult::Win(winner) => self.finish(GameStatus::Won(winner)),
            DropResult::Tie => self.finish(GameStatus::Tied),
            _ => self.state.flip_active_player(),
        }

        Ok(result)
    }

    /// Whether `player` has four in a line anywhere on the board.
    pub fn check_win(&self, player: Player) -> bool {
        let board = self.state.board();
        (0..HEIGHT as isize).any(|y| {
            (0..WIDTH as isize).any(|x| {
                DIRECTIONS.iter().any(|&(dy, dx)| {
                    (0..CONNECT as isize).all(|i| board.owned_by(y + i * dy, x + i * dx, player))
                })
            })
        })
    }

    pub fn check_full(&self) -> bool {
        self.state.board().is_full()
    }

    fn finish(&mut self, status: GameStatus) {
        self.state.mark_game_over();
        self.status = status;
        if let Some(message) = status.message() {
            info!("game over after {} moves: {message}", self.state.board().filled());
        }
    }
}
