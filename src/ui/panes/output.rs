//! Translation and expected-output panes

use super::source::{border_style, render_code_pane, Language};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// What the translation pane shows
pub enum OutputView<'a> {
    Translated { text: &'a str, gaps: usize },
    Failed { message: &'a str },
}

/// Render the C# translation, or the error that stopped it
pub fn render_translation_pane(
    frame: &mut Frame,
    area: Rect,
    view: OutputView,
    is_focused: bool,
    scroll: &mut usize,
) {
    match view {
        OutputView::Translated { text, gaps } => {
            let title = match gaps {
                0 => "Translation".to_string(),
                1 => "Translation (1 untranslated)".to_string(),
                n => format!("Translation ({} untranslated)", n),
            };
            render_code_pane(frame, area, &title, text, Language::CSharp, is_focused, scroll);
        }
        OutputView::Failed { message } => {
            *scroll = 0;
            let block = Block::default()
                .title(" Translation ")
                .borders(Borders::ALL)
                .border_style(border_style(is_focused));
            let text = vec![
                Line::from(Span::styled(
                    "Translation failed",
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(message.to_string(), Style::default().fg(DEFAULT_THEME.error))),
            ];
            let paragraph = Paragraph::new(text).block(block).wrap(Wrap { trim: false });
            frame.render_widget(paragraph, area);
        }
    }
}

/// Render the expected C# text of a sample
pub fn render_expected_pane(
    frame: &mut Frame,
    area: Rect,
    expected: Option<&str>,
    is_focused: bool,
    scroll: &mut usize,
) {
    match expected {
        Some(text) if !text.trim().is_empty() => {
            render_code_pane(frame, area, "Expected", text, Language::CSharp, is_focused, scroll);
        }
        _ => {
            *scroll = 0;
            let block = Block::default()
                .title(" Expected ")
                .borders(Borders::ALL)
                .border_style(border_style(is_focused));
            let paragraph = Paragraph::new("(no expected output; press s to store the translation)")
                .block(block)
                .style(Style::default().fg(DEFAULT_THEME.comment));
            frame.render_widget(paragraph, area);
        }
    }
}
