use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::format::format_count;
use crate::sync::PageState;

/// `‹ 2 3 [4] 5 6 7 8 ›  page 4 of 10 · 183 total`
pub fn pagination_line<T>(state: &PageState<T>) -> Line<'static> {
    let enabled = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = Vec::new();
    spans.push(Span::styled(
        "‹ ",
        if state.current_page > 1 { enabled } else { disabled },
    ));

    for page in state.window() {
        if page == state.current_page {
            spans.push(Span::styled(
                format!("[{}] ", page),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ));
        } else {
            spans.push(Span::styled(
                format!("{} ", page),
                Style::default().fg(Color::Gray),
            ));
        }
    }

    spans.push(Span::styled(
        "›",
        if state.current_page < state.total_pages {
            enabled
        } else {
            disabled
        },
    ));
    spans.push(Span::styled(
        format!(
            "  page {} of {} · {} total",
            state.current_page,
            state.total_pages,
            format_count(state.total_count)
        ),
        Style::default().fg(Color::DarkGray),
    ));

    Line::from(spans)
}
