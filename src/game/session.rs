use std::sync::mpsc::Sender;

use log::trace;

use super::{DropResult, GameEngine, GameStatus, Player};
use crate::error::GameError;

/// Notifications produced for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    CellFilled {
        row: usize,
        column: usize,
        player: Player,
    },
    GameEnded {
        outcome: GameStatus,
        message: String,
    },
}

/// Receives events from a [`GameSession`].
pub trait GameObserver {
    fn on_event(&mut self, event: GameEvent);
}

/// Forwards events over a channel. A hung-up receiver is not an error.
impl GameObserver for Sender<GameEvent> {
    fn on_event(&mut self, event: GameEvent) {
        let _ = self.send(event);
    }
}

/// Records every event in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    pub events: Vec<GameEvent>,
}

impl GameObserver for EventLog {
    fn on_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// One game wired to an observer: column selections in, events out.
pub struct GameSession<O: GameObserver> {
    engine: GameEngine,
    observer: O,
}

impl<O: GameObserver> GameSession<O> {
    pub fn new(observer: O) -> Self {
        Self::with_engine(GameEngine::new(), observer)
    }

    pub fn with_engine(engine: GameEngine, observer: O) -> Self {
        GameSession { engine, observer }
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Play `column` for the active player.
    ///
    /// Returns `Ok(None)` without emitting anything once the game is over. A full
    /// column yields `Ok(Some(DropResult::ColumnFull))` and no event.
    pub fn on_column_selected(&mut self, column: usize) -> Result<Option<DropResult>, GameError> {
        let player = self.engine.active_player();
        let result = match self.engine.apply_drop(column, player) {
            Ok(result) => result,
            Err(GameError::GameAlreadyOver) => {
                trace!("column {column} selected after game end, ignoring");
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        if result != DropResult::ColumnFull {
            if let Some(last) = self.engine.last_move() {
                self.observer.on_event(GameEvent::CellFilled {
                    row: last.row,
                    column: last.column,
                    player: last.player,
                });
            }
        }

        let outcome = self.engine.status();
        if result.is_terminal() {
            if let Some(message) = outcome.message() {
                self.observer
                    .on_event(GameEvent::GameEnded { outcome, message });
            }
        }

        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{HEIGHT, WIDTH};
    use std::sync::mpsc;

    fn session() -> GameSession<EventLog> {
        GameSession::new(EventLog::default())
    }

    #[test]
    fn test_cell_filled_event_per_drop() {
        let mut session = session();
        session.on_column_selected(3).unwrap();
        session.on_column_selected(3).unwrap();

        assert_eq!(
            session.observer().events,
            vec![
                GameEvent::CellFilled {
                    row: 0,
                    column: 3,
                    player: Player::One
                },
                GameEvent::CellFilled {
                    row: 1,
                    column: 3,
                    player: Player::Two
                },
            ]
        );
    }

    #[test]
    fn test_win_emits_game_ended_once() {
        let mut session = session();
        for col in [0, 6, 0, 6, 0, 6, 0] {
            session.on_column_selected(col).unwrap();
        }
        // Further clicks are ignored
        assert_eq!(session.on_column_selected(1), Ok(None));
        assert_eq!(session.on_column_selected(0), Ok(None));

        let events = session.into_observer().events;
        assert_eq!(events.len(), 8);
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameEnded {
                outcome: GameStatus::Won(Player::One),
                message: "Player 1 won!".to_string(),
            })
        );
        let ended = events
            .iter()
            .filter(|e| matches!(e, GameEvent::GameEnded { .. }))
            .count();
        assert_eq!(ended, 1);
    }

    #[test]
    fn test_ignored_clicks_leave_board_alone() {
        let mut session = session();
        for col in [0, 6, 0, 6, 0, 6, 0] {
            session.on_column_selected(col).unwrap();
        }
        let before = session.engine().clone();
        for col in 0..WIDTH {
            assert_eq!(session.on_column_selected(col), Ok(None));
        }
        assert_eq!(session.engine(), &before);
    }

    #[test]
    fn test_full_column_emits_nothing() {
        let mut session = session();
        for _ in 0..HEIGHT {
            session.on_column_selected(2).unwrap();
        }
        let emitted = session.observer().events.len();
        assert_eq!(
            session.on_column_selected(2),
            Ok(Some(DropResult::ColumnFull))
        );
        assert_eq!(session.observer().events.len(), emitted);
        assert_eq!(session.engine().active_player(), Player::One);
    }

    #[test]
    fn test_out_of_range_column_surfaces_error() {
        let mut session = session();
        assert_eq!(
            session.on_column_selected(WIDTH),
            Err(GameError::ColumnOutOfBounds(WIDTH))
        );
        assert!(session.observer().events.is_empty());
    }

    #[test]
    fn test_tie_message() {
        let mut session = session();
        let columns = [
            5, 4, 5, 0, 6, 2, 4, 5, 5, 0, 4, 1, 1, 0, 4, 5, 6, 5, 3, 1, 1, 2, 2, 6, 2, 6, 6, 3,
            6, 2, 0, 3, 0, 3, 3, 4, 3, 1, 4, 2, 1, 0,
        ];
        let mut last = None;
        for col in columns {
            last = session.on_column_selected(col).unwrap();
        }
        assert_eq!(last, Some(DropResult::Tie));
        assert_eq!(
            session.observer().events.last(),
            Some(&GameEvent::GameEnded {
                outcome: GameStatus::Tied,
                message: "IT IS A TIE".to_string(),
            })
        );

        // Clicks after the tie are dropped silently
        let before = session.engine().clone();
        let emitted = session.observer().events.len();
        for col in 0..WIDTH {
            assert_eq!(session.on_column_selected(col), Ok(None));
        }
        assert_eq!(session.engine(), &before);
        assert_eq!(session.observer().events.len(), emitted);
    }

    #[test]
    fn test_channel_observer() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        let mut session = GameSession::new(tx);
        session.on_column_selected(4).unwrap();
        assert_eq!(
            rx.try_recv(),
            Ok(GameEvent::CellFilled {
                row: 0,
                column: 4,
                player: Player::One
            })
        );
        assert!(rx.try_recv().is_err());
    }
}
