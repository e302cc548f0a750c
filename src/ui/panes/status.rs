//! Status bar rendering with keybindings and the validation badge

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Result of comparing the translation with the expected text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validation {
    Pass,
    Fail,
    NoExpected,
}

impl Validation {
    fn badge(self) -> (&'static str, Color) {
        match self {
            Validation::Pass => (" PASS ", DEFAULT_THEME.success),
            Validation::Fail => (" FAIL ", DEFAULT_THEME.error),
            Validation::NoExpected => (" NO EXPECTED ", DEFAULT_THEME.comment),
        }
    }
}

/// Render the status bar at the bottom.
///
/// `browsing` adds the sample keys (`↵` load, `s` store) to the hints.
pub fn render_status_bar(
    frame: &mut Frame,
    area: Rect,
    message: &str,
    validation: Validation,
    is_error: bool,
    browsing: bool,
) {
    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let (badge, badge_color) = validation.badge();
    let left_spans = vec![
        Span::styled(
            badge,
            Style::default()
                .bg(badge_color)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            " | ",
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(DEFAULT_THEME.comment),
        ),
        Span::styled(
            format!(" {} ", message),
            Style::default()
                .bg(DEFAULT_THEME.current_line_bg)
                .fg(if is_error { DEFAULT_THEME.error } else { DEFAULT_THEME.fg }),
        ),
    ];

    let left_paragraph = Paragraph::new(Line::from(left_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Left);
    frame.render_widget(left_paragraph, layout[0]);

    // Right side: Keybinds with visual grouping
    let key_style = Style::default().bg(DEFAULT_THEME.comment).fg(Color::Black);
    let desc_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.fg);
    let sep_style = Style::default()
        .bg(DEFAULT_THEME.current_line_bg)
        .fg(DEFAULT_THEME.comment);

    let mut hints: Vec<(&str, &str)> = vec![(" ⇥ ", " focus "), (" ↑/↓ ", " scroll ")];
    if browsing {
        hints.push((" ↵ ", " load "));
        hints.push((" s ", " store "));
    }
    hints.push((" r ", " reload "));
    hints.push(("q", " quit "));

    let mut right_spans = Vec::new();
    for (index, (key, desc)) in hints.into_iter().enumerate() {
        if index > 0 {
            right_spans.push(Span::styled("│", sep_style));
            right_spans.push(Span::styled(" ", desc_style));
        }
        right_spans.push(Span::styled(key, key_style));
        right_spans.push(Span::styled(desc, desc_style));
    }

    let right_paragraph = Paragraph::new(Line::from(right_spans))
        .style(Style::default().bg(DEFAULT_THEME.current_line_bg))
        .alignment(Alignment::Right);
    frame.render_widget(right_paragraph, layout[1]);
}
