//! Stateless UI rendering for the omok board.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use crate::games::omok::{Cell, GameStatus, Move, Player};

use super::app::App;

const HELP: &str = "arrows/hjkl move  enter place  r restart  m mode  t retry  q quit";

/// Renders the whole screen.
pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(5),    // Board
            Constraint::Length(3), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    draw_title(frame, chunks[0], app);
    draw_board(frame, chunks[1], app);

    let status = Paragraph::new(app.status_message())
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(status, chunks[2]);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(help, chunks[3]);
}

fn draw_title(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let turn = match view.status {
        GameStatus::InProgress if view.oracle_thinking => "oracle thinking".to_string(),
        GameStatus::InProgress => format!("{} to move", view.to_move),
        GameStatus::Won(player) => format!("{} won", player),
        GameStatus::Draw => "draw".to_string(),
    };
    let title = Paragraph::new(format!("Omok ({}) - {}", app.mode().name(), turn))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(title, area);
}

fn draw_board(frame: &mut Frame, area: Rect, app: &App) {
    let view = app.view();
    let size = view.rules.size;
    let width = (size as u16).saturating_mul(2).saturating_add(2);
    let height = (size as u16).saturating_add(2);
    let board_area = center_rect(area, width, height);

    let lines: Vec<Line> = view
        .board
        .rows()
        .enumerate()
        .map(|(row, cells)| {
            let spans: Vec<Span> = cells
                .iter()
                .enumerate()
                .map(|(col, cell)| cell_span(app, Move::new(row, col), *cell))
                .collect();
            Line::from(spans)
        })
        .collect();

    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL));
    frame.render_widget(board, board_area);
}

fn cell_span(app: &App, mv: Move, cell: Cell) -> Span<'static> {
    let view = app.view();
    let (symbol, mut style) = match cell {
        Cell::Empty => ("· ", Style::default().fg(Color::DarkGray)),
        Cell::Occupied(Player::Black) => ("● ", Style::default().fg(Color::Blue)),
        Cell::Occupied(Player::White) => ("○ ", Style::default().fg(Color::White)),
    };

    if view.winning_run.contains(&mv) {
        style = style.fg(Color::Green).add_modifier(Modifier::BOLD);
    } else if view.last_move == Some(mv) {
        style = style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if mv == app.cursor() {
        style = style.bg(Color::White).fg(Color::Black);
    }

    Span::styled(symbol, style)
}

fn center_rect(area: Rect, width: u16, height: u16) -> Rect {
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vert[1])[1]
}
