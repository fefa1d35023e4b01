use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::format::{format_rating, format_timestamp};
use crate::location::Location;

use super::pagination::pagination_line;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let state = app.ratings.state();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(area);

    frame.render_widget(Paragraph::new(pagination_line(state)), chunks[1]);

    let title = match (&app.location, app.detail.value()) {
        (Location::Ratings { id, .. }, Some(detail)) if detail.movie.id == *id => {
            format!("All ratings: {}", detail.movie.title)
        }
        (Location::Ratings { id, .. }, _) => format!("All ratings: movie #{}", id),
        _ => "All ratings".to_string(),
    };

    if state.items.is_empty() && !state.loading {
        let block = Block::default().borders(Borders::ALL).title(title);
        let empty = Paragraph::new("No ratings found")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, chunks[0]);
        return;
    }

    let items: Vec<ListItem> = state
        .items
        .iter()
        .enumerate()
        .map(|(i, rating)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("user {:<10}", rating.user_id), style),
                Span::raw(" "),
                Span::styled(
                    format!("★ {:<4}", format_rating(rating.rating)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(" "),
                Span::styled(
                    format_timestamp(&rating.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", title, state.total_count)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut list_state = ListState::default();
    list_state.select(Some(app.selected.min(state.items.len().saturating_sub(1))));

    frame.render_stateful_widget(list, chunks[0], &mut list_state);
}
