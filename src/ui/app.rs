use crate::config::UiConfig;
use crate::game::{GameEvent, GameSession, WIDTH};
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{backend::Backend, layout::Rect, Terminal};
use std::io;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use super::game_view::{self, ViewModel};

pub struct App {
    config: UiConfig,
    session: GameSession<Sender<GameEvent>>,
    events: Receiver<GameEvent>,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    last_drop: Option<(usize, usize)>,
    board_area: Rect,
}

impl App {
    pub fn new(config: UiConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        App {
            selected_column: config.initial_column.min(WIDTH - 1),
            config,
            session: GameSession::new(tx),
            events: rx,
            should_quit: false,
            message: None,
            last_drop: None,
            board_area: Rect::default(),
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.handle_events()?;
        }
        Ok(())
    }

    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(self.config.poll_interval_ms))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key),
                Event::Mouse(mouse) if self.config.mouse => self.handle_mouse(mouse),
                _ => {}
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column + 1 < WIDTH {
                    self.selected_column += 1;
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.select_column(self.selected_column);
            }
            KeyCode::Char(c @ '1'..='9') => {
                let col = (c as u8 - b'1') as usize;
                if col < WIDTH {
                    self.selected_column = col;
                    self.select_column(col);
                }
            }
            KeyCode::Char('n') | KeyCode::Char('r') => self.new_game(),
            _ => {}
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        let Some(col) = game_view::column_at(self.board_area, mouse.column, mouse.row) else {
            return;
        };
        match mouse.kind {
            MouseEventKind::Moved => self.selected_column = col,
            MouseEventKind::Down(MouseButton::Left) => {
                log::trace!("click at ({}, {}) -> column {col}", mouse.column, mouse.row);
                self.selected_column = col;
                self.select_column(col);
            }
            _ => {}
        }
    }

    /// Forward a column choice to the game and pick up whatever it reports.
    fn select_column(&mut self, column: usize) {
        if let Err(err) = self.session.on_column_selected(column) {
            log::error!("column selection rejected: {err}");
        }
        self.drain_events();
    }

    fn drain_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            match event {
                GameEvent::CellFilled {
                    row,
                    column,
                    player,
                } => {
                    log::debug!("render {player} at ({row}, {column})");
                    self.last_drop = Some((row, column));
                }
                GameEvent::GameEnded { message, .. } => {
                    self.message = Some(message);
                }
            }
        }
    }

    /// Start over with a fresh session; the old game state is dropped.
    fn new_game(&mut self) {
        let (tx, rx) = mpsc::channel();
        self.session = GameSession::new(tx);
        self.events = rx;
        self.selected_column = self.config.initial_column.min(WIDTH - 1);
        self.message = None;
        self.last_drop = None;
        log::info!("new game started");
    }

    fn render(&mut self, frame: &mut ratatui::Frame) {
        let view = ViewModel {
            engine: self.session.engine(),
            selected_column: self.selected_column,
            last_drop: self.last_drop,
            message: self.message.as_deref(),
            show_column_numbers: self.config.show_column_numbers,
        };
        self.board_area = game_view::render(frame, &view);
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(UiConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, GameStatus, Player, HEIGHT};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_enter_drops_in_selected_column() {
        let mut app = App::default();
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.session.engine().state().cell_at(0, 2),
            Ok(Cell::Taken(Player::One))
        );
    }

    #[test]
    fn test_selector_stays_on_board() {
        let mut app = App::default();
        for _ in 0..10 {
            press(&mut app, KeyCode::Right);
        }
        assert_eq!(app.selected_column, WIDTH - 1);
        for _ in 0..10 {
            press(&mut app, KeyCode::Left);
        }
        assert_eq!(app.selected_column, 0);
    }

    #[test]
    fn test_win_shows_message_and_new_game_clears_it() {
        let mut app = App::default();
        for code in ['1', '7', '1', '7', '1', '7', '1'] {
            press(&mut app, KeyCode::Char(code));
        }
        assert_eq!(app.message.as_deref(), Some("Player 1 won!"));
        assert_eq!(app.session.engine().status(), GameStatus::Won(Player::One));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.message, None);
        assert_eq!(app.session.engine().status(), GameStatus::InProgress);
        assert_eq!(app.session.engine().state().board().filled(), 0);
    }

    #[test]
    fn test_click_drops_piece() {
        let mut app = App::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let x = app.board_area.x + 3 + 3 * 5 + 1;
        app.handle_mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: x,
            row: app.board_area.y + 2,
            modifiers: KeyModifiers::NONE,
        });
        assert_eq!(app.selected_column, 5);
        assert_eq!(
            app.session.engine().state().cell_at(0, 5),
            Ok(Cell::Taken(Player::One))
        );
    }

    #[test]
    fn test_clicks_outside_board_are_ignored() {
        let mut app = App::default();
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let x = app.board_area.x + 3 + 3 * 5 + 1;
        // Header, top border, bottom border, message bar, controls
        let border = app.board_area.y + 1;
        let bottom = app.board_area.y + 2 + HEIGHT as u16;
        for row in [0, border, bottom, 26, 29] {
            app.handle_mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: x,
                row,
                modifiers: KeyModifiers::NONE,
            });
        }
        assert_eq!(app.session.engine().state().board().filled(), 0);
        assert_eq!(app.session.engine().active_player(), Player::One);
    }

    #[test]
    fn test_last_drop_follows_cell_filled_events() {
        let mut app = App::default();
        assert_eq!(app.last_drop, None);
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.last_drop, Some((0, 1)));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.last_drop, Some((1, 1)));

        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.last_drop, None);
    }

    #[test]
    fn test_quit() {
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
