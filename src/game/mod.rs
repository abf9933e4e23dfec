//! Core Connect Four game logic: board, players, game state, the engine that
//! resolves drops and detects wins, and the session that reports to a UI.

mod board;
mod engine;
mod player;
mod session;
mod state;

pub use board::{Board, Cell, HEIGHT, WIDTH};
pub use engine::{DropResult, GameEngine, GameStatus, Move, CONNECT};
pub use player::Player;
pub use session::{EventLog, GameEvent, GameObserver, GameSession};
pub use state::GameState;
