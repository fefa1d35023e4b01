use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::app::App;
use crate::format::{format_count, format_percent, format_rating, format_timestamp, percent};
use crate::types::{MovieDetail, RatingStats};

const BAR_WIDTH: usize = 30;

pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let Some(detail) = app.detail.value() else {
        let message = if app.loading() {
            "Loading movie..."
        } else {
            "Movie not found"
        };
        let block = Block::default().borders(Borders::ALL).title("Movie");
        let empty = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::Gray));
        frame.render_widget(empty, area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(0)])
        .split(area);

    render_header(frame, detail, chunks[0]);
    render_body(frame, app, detail, chunks[1]);
}

fn render_header(frame: &mut Frame, detail: &MovieDetail, area: Rect) {
    let movie = &detail.movie;
    let genres = movie.genre_list().join(" · ");

    let lines = vec![
        Line::from(vec![
            Span::styled(
                format!("#{} ", movie.id),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(&movie.title, Style::default().add_modifier(Modifier::BOLD)),
        ]),
        Line::from(Span::styled(genres, Style::default().fg(Color::Gray))),
        Line::from(vec![
            Span::styled(
                format!("★ {}", format_rating(movie.avg_rating)),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | "),
            Span::raw(format!("{} ratings", format_count(movie.rating_count))),
        ]),
    ];

    let header =
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Details"));

    frame.render_widget(header, area);
}

fn render_body(frame: &mut Frame, app: &App, detail: &MovieDetail, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    lines.push(section_title("Rating distribution"));
    match &detail.rating_stats {
        Some(stats) if stats.total_count > 0 => lines.extend(distribution_lines(stats)),
        _ => lines.push(Line::from(Span::styled(
            "  No ratings yet",
            Style::default().fg(Color::Gray),
        ))),
    }

    lines.push(Line::from(""));
    lines.push(section_title("Recent ratings"));
    if detail.recent_ratings.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No ratings yet",
            Style::default().fg(Color::Gray),
        )));
    }
    for rating in &detail.recent_ratings {
        lines.push(Line::from(vec![
            Span::styled(
                format!("  user {:<8}", rating.user_id),
                Style::default().fg(Color::Cyan),
            ),
            Span::styled(
                format!("★ {:<4}", format_rating(rating.rating)),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                format_timestamp(&rating.timestamp),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let inner_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(inner_height);
    app.detail_max_scroll.set(max_scroll);
    let scroll_offset = app.scroll_offset.min(max_scroll);

    let visible_lines: Vec<Line> = lines
        .into_iter()
        .skip(scroll_offset)
        .take(inner_height)
        .collect();

    frame.render_widget(Clear, area);

    let body = Paragraph::new(Text::from(visible_lines))
        .block(Block::default().borders(Borders::ALL).title("Ratings"));

    frame.render_widget(body, area);
}

fn section_title(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn distribution_lines(stats: &RatingStats) -> Vec<Line<'static>> {
    stats
        .distribution_rows()
        .into_iter()
        .map(|row| {
            let share = percent(row.count, stats.total_count);
            let filled = ((share / 100.0) * BAR_WIDTH as f64).round() as usize;
            Line::from(vec![
                Span::raw(format!("  {:>3}★ ", row.bucket)),
                Span::styled("█".repeat(filled), Style::default().fg(Color::Yellow)),
                Span::styled(
                    "░".repeat(BAR_WIDTH.saturating_sub(filled)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(format!(
                    " {:>6}  ({})",
                    format_percent(row.count, stats.total_count),
                    format_count(row.count)
                )),
            ])
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn distribution_bars_scale_with_share() {
        let stats = RatingStats {
            avg_rating: 4.5,
            total_count: 4,
            rating_distribution: BTreeMap::from([("5".to_string(), 2), ("4".to_string(), 2)]),
        };
        let lines: Vec<String> = distribution_lines(&stats)
            .iter()
            .map(|l| l.to_string())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0].matches('█').count(), BAR_WIDTH / 2);
        assert!(lines[0].contains("50.0%"));
        assert_eq!(lines[4].matches('█').count(), 0);
        assert!(lines[4].contains("0.0%"));
    }
}
