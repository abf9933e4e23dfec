use crate::game::{Cell, GameEngine, Player, HEIGHT, WIDTH};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Left margin before the first column: "  ║".
const BOARD_MARGIN: u16 = 3;
/// Terminal cells per board column.
const CELL_WIDTH: u16 = 3;
/// Full width of every board line, margins included.
pub const BOARD_WIDTH: u16 = BOARD_MARGIN + CELL_WIDTH * WIDTH as u16 + 2;

pub struct ViewModel<'a> {
    pub engine: &'a GameEngine,
    pub selected_column: usize,
    /// Cell of the most recent `CellFilled` event, as (row, column).
    pub last_drop: Option<(usize, usize)>,
    pub message: Option<&'a str>,
    pub show_column_numbers: bool,
}

/// Draws the game screen and returns the area the board occupies.
pub fn render(frame: &mut Frame, view: &ViewModel) -> Rect {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(HEIGHT as u16 + 4), // Board
            Constraint::Length(3), // Message
            Constraint::Length(4), // Controls
        ])
        .split(frame.area());

    render_header(frame, view.engine, chunks[0]);
    let board_area = board_rect(chunks[1]);
    render_board(frame, view, board_area);
    render_message(frame, view.message, chunks[2]);
    render_controls(frame, chunks[3]);
    board_area
}

pub fn player_color(player: Player) -> Color {
    match player {
        Player::One => Color::Red,
        Player::Two => Color::Yellow,
    }
}

/// Horizontally centred, fixed-width slot for the board.
pub fn board_rect(area: Rect) -> Rect {
    let width = BOARD_WIDTH.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

/// Column under the terminal position `(x, y)`. Only the column-top line and
/// the playing rows are click targets; borders and the indicator line are not.
pub fn column_at(board_area: Rect, x: u16, y: u16) -> Option<usize> {
    let top = board_area.y;
    let rows = top + 2..top + 2 + HEIGHT as u16;
    if y != top && !rows.contains(&y) {
        return None;
    }
    let left = board_area.x + BOARD_MARGIN;
    if x < left {
        return None;
    }
    let col = ((x - left) / CELL_WIDTH) as usize;
    (col < WIDTH).then_some(col)
}

fn render_header(frame: &mut Frame, engine: &GameEngine, area: Rect) {
    let status = engine.status();
    let (text, color) = if status.is_finished() {
        let message = status.message().unwrap_or_default();
        (format!("Game Over  |  {message}"), Color::White)
    } else {
        let player = engine.active_player();
        (format!("{player}'s turn"), player_color(player))
    };

    let header = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Connect Four"),
        );

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, view: &ViewModel, area: Rect) {
    let state = view.engine.state();
    let mut lines = Vec::new();

    // Column tops: the click target row
    let mut col_line = vec![Span::raw("   ")];
    for col in 0..WIDTH {
        let label = if view.show_column_numbers {
            format!(" {} ", col + 1)
        } else {
            " ▼ ".to_string()
        };
        if col == view.selected_column {
            col_line.push(Span::styled(
                label,
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(label));
        }
    }
    col_line.push(Span::raw("  "));
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    // Row 0 is the bottom of the board, so draw from the top row down.
    for row in (0..HEIGHT).rev() {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..WIDTH {
            let cell = state.cell_at(row, col).unwrap_or_default();
            let span = match cell {
                Cell::Empty => Span::styled(" . ", Style::default().fg(Color::DarkGray)),
                Cell::Taken(player) => {
                    let mut style = Style::default().fg(player_color(player));
                    if view.last_drop == Some((row, col)) {
                        style = style.add_modifier(Modifier::BOLD);
                    }
                    Span::styled(" ● ", style)
                }
            };
            row_spans.push(span);
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    // Selection indicator
    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..WIDTH {
        if col == view.selected_column && !view.engine.is_game_over() {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_message(frame: &mut Frame, message: Option<&str>, area: Rect) {
    let msg_widget = Paragraph::new(message.unwrap_or(""))
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line1 = Line::from("←/→: Move  |  Enter: Drop  |  1-7: Drop in column");
    let line2 = Line::from("Click: Drop  |  N: New game  |  Q: Quit");

    let controls = Paragraph::new(vec![line1, line2])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Controls"),
        );

    frame.render_widget(controls, area);
}
