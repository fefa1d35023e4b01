use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::format::{format_count, format_rating, truncate};
use crate::sync::PageState;
use crate::types::Movie;

use super::pagination::pagination_line;

pub fn render(
    frame: &mut Frame,
    app: &App,
    area: Rect,
    title: &str,
    movies: &[Movie],
    pages: Option<&PageState<Movie>>,
) {
    let (list_area, pager_area) = match pages {
        Some(_) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            (chunks[0], Some(chunks[1]))
        }
        None => (area, None),
    };

    if let (Some(state), Some(pager_area)) = (pages, pager_area) {
        frame.render_widget(Paragraph::new(pagination_line(state)), pager_area);
    }

    if movies.is_empty() && !app.loading() {
        let block = Block::default().borders(Borders::ALL).title(title.to_string());
        let empty = Paragraph::new("No movies found")
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, list_area);
        return;
    }

    let w = list_area.width.saturating_sub(2) as usize;
    let fixed = 46; // id(8) + space(1) + genres(24) + space(1) + rating(5) + space(1) + count(6)
    let flex = w.saturating_sub(fixed).max(10);

    let items: Vec<ListItem> = movies
        .iter()
        .enumerate()
        .map(|(i, movie)| {
            let style = if i == app.selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            let genres = truncate(&movie.genre_list().join(", "), 24);

            let line = Line::from(vec![
                Span::styled(
                    format!("{:>7} ", format!("#{}", movie.id)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(format!("{:<flex$}", truncate(&movie.title, flex)), style),
                Span::raw(" "),
                Span::styled(format!("{:<24}", genres), Style::default().fg(Color::Gray)),
                Span::raw(" "),
                Span::styled(
                    format!("★{:>4}", format_rating(movie.avg_rating)),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(" "),
                Span::styled(
                    format!("{:>6}", format_count(movie.rating_count)),
                    Style::default().fg(Color::DarkGray),
                ),
            ]);

            ListItem::new(line)
        })
        .collect();

    let count = match pages {
        Some(state) => format_count(state.total_count),
        None => movies.len().to_string(),
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("{} ({})", title, count)),
        )
        .highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = ListState::default();
    state.select(Some(app.selected.min(movies.len().saturating_sub(1))));

    frame.render_stateful_widget(list, list_area, &mut state);
}
