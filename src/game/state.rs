use super::{Board, Cell, Player};
use crate::error::GameError;

/// Grid contents plus turn order. Mutated only through the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    board: Board,
    active_player: Player,
    game_over: bool,
}

impl GameState {
    /// Create initial game state
    pub fn new() -> Self {
        GameState {
            board: Board::new(),
            active_player: Player::One, // Player 1 starts
            game_over: false,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_player(&self) -> Player {
        self.active_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn cell_at(&self, row: usize, col: usize) -> Result<Cell, GameError> {
        self.board.get(row, col)
    }

    pub fn set_cell(&mut self, row: usize, col: usize, owner: Player) -> Result<(), GameError> {
        self.board.set(row, col, owner)
    }

    pub fn flip_active_player(&mut self) {
        self.active_player = self.active_player.other();
    }

    pub fn mark_game_over(&mut self) {
        self.game_over = true;
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
