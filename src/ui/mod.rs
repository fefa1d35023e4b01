mod movie_detail;
mod movie_list;
mod pagination;
mod ratings;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::action::Prompt;
use crate::app::App;
use crate::format::truncate;
use crate::location::Location;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(frame, app, chunks[0]);

    match &app.location {
        Location::Movies { .. } => movie_list::render(
            frame,
            app,
            chunks[1],
            "Movies",
            &app.movies.state().items,
            Some(app.movies.state()),
        ),
        Location::Search { query } => movie_list::render(
            frame,
            app,
            chunks[1],
            &format!("Search: {}", query),
            app.listed_movies(),
            None,
        ),
        Location::Movie { .. } => movie_detail::render(frame, app, chunks[1]),
        Location::Ratings { .. } => ratings::render(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let title = match &app.location {
        Location::Movie { id } | Location::Ratings { id, .. } => match app.detail.value() {
            Some(detail) if detail.movie.id == *id => format!(
                "reel - {}  {}",
                truncate(&detail.movie.title, 50),
                app.location
            ),
            _ => format!("reel - {}", app.location),
        },
        location => format!("reel - {}", location),
    };

    let header = Paragraph::new(Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )]))
    .style(Style::default().bg(Color::DarkGray));

    frame.render_widget(header, area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = if let Some(prompt) = &app.prompt {
        let label = match prompt {
            Prompt::Search(_) => "Search: ",
            Prompt::GoToPage(_) => "Go to page: ",
        };
        Line::from(vec![
            Span::styled(label, Style::default().fg(Color::Yellow)),
            Span::raw(prompt.text().to_string()),
            Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ])
    } else if app.loading() {
        Line::from(vec![Span::styled(
            "Loading...",
            Style::default().fg(Color::Yellow),
        )])
    } else {
        let help = match app.location {
            Location::Movies { .. } => {
                "j/k: nav | h/l: page | g/G: first/last | :: go to | Enter: open | /: search | q: back | Q: quit"
            }
            Location::Search { .. } => "j/k: nav | Enter: open | /: search | m: movies | q: back",
            Location::Movie { .. } => "j/k: scroll | r: all ratings | R: refresh | m: movies | q: back",
            Location::Ratings { .. } => "j/k: nav | h/l: page | g/G: first/last | :: go to | q: back",
        };
        Line::from(vec![Span::styled(help, Style::default().fg(Color::Gray))])
    };

    let status_bar = Paragraph::new(status).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status_bar, area);
}
