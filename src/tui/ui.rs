//! UI rendering

use crate::model::User;
use crate::tui::app::App;
use crate::tui::colors;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};
use unicode_width::UnicodeWidthStr;

const SEARCH_PREFIX: &str = " \u{1F50D} ";

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search box
            Constraint::Min(4),    // Dropdown / hint
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_search_box(frame, app, chunks[0]);

    // The dropdown exists only while open and populated.
    if app.widget.is_open() && !app.widget.users().is_empty() {
        draw_dropdown(frame, app, chunks[1]);
    } else {
        draw_hint(frame, app, chunks[1]);
    }

    draw_status_bar(frame, app, chunks[2]);

    if app.widget.is_focused() {
        let typed = &app.widget.value()[..app.cursor_pos];
        let cursor_x = chunks[0].x
            + 1
            + SEARCH_PREFIX.width() as u16
            + typed.width() as u16;
        let cursor_y = chunks[0].y + 1;
        frame.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}

fn draw_search_box(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors::border_color(app.widget.is_focused())))
        .title(" Search ");

    let text = format!("{}{}", SEARCH_PREFIX, app.widget.value());
    let paragraph = Paragraph::new(text)
        .block(block)
        .style(Style::default().fg(Color::White));

    frame.render_widget(paragraph, area);
}

fn result_row(user: &User, selected: bool) -> ListItem<'static> {
    let (marker, row_style) = if selected {
        ("\u{25B8} ", Style::default().bg(colors::BAR_BG))
    } else {
        ("  ", Style::default())
    };

    let mut spans = vec![
        Span::raw(marker),
        Span::styled(
            user.name.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];

    match user.thumbnail() {
        Some(thumb) => {
            spans.push(Span::styled(
                format!("  {}", thumb),
                Style::default().fg(Color::DarkGray),
            ));
        }
        None => {
            spans.push(Span::styled(
                "  (no photo)",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ));
        }
    }

    ListItem::new(Line::from(spans).style(row_style))
}

fn draw_dropdown(frame: &mut Frame, app: &mut App, area: Rect) {
    let users = app.widget.users();
    let selected = app.list_state.selected();
    let items: Vec<ListItem> = users
        .iter()
        .enumerate()
        .map(|(i, user)| result_row(user, selected == Some(i)))
        .collect();

    let title = format!(" Results [{}] ", users.len());
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(title),
    );

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_hint(frame: &mut Frame, app: &App, area: Rect) {
    let text = if app.is_fetching() || app.widget.has_pending() {
        " \u{23F3} Searching...".to_string()
    } else if !app.widget.is_focused() && !app.widget.users().is_empty() {
        " Results hidden - press Tab to focus the search box".to_string()
    } else if app.widget.value().trim().is_empty() {
        " Start typing to search the user directory".to_string()
    } else {
        format!(" Nothing to show for '{}'", app.widget.value())
    };

    let hint = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(hint, area);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let left_text = if app.is_fetching() {
        format!(" \u{23F3} {}", app.status_message)
    } else if let Some(duration) = app.last_duration {
        format!(" {} | {} ms", app.status_message, duration.as_millis())
    } else {
        format!(" {}", app.status_message)
    };

    let right_text = " Tab:Focus  \u{2191}\u{2193}:Select  Esc:Clear/Quit  Ctrl+Q:Quit ";

    // Left-aligned text + padding + right-aligned hints
    let available_width = area.width as usize;
    let left_len = left_text.width();
    let right_len = right_text.width();

    let status_str = if left_len + right_len < available_width {
        let padding = available_width - left_len - right_len;
        format!("{}{:padding$}{}", left_text, "", right_text, padding = padding)
    } else {
        format!("{:width$}", left_text, width = available_width)
    };

    let status = Paragraph::new(status_str)
        .style(Style::default().fg(Color::White).bg(colors::BAR_BG));

    frame.render_widget(status, area);
}
