//! Sample list pane

use super::source::{border_style, clamp_scroll};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the sample names with the selection and the loaded sample marked
pub fn render_samples_pane(
    frame: &mut Frame,
    area: Rect,
    names: &[String],
    selected: usize,
    loaded: Option<&str>,
    is_focused: bool,
    scroll: &mut usize,
) {
    let block = Block::default()
        .title(" Samples ")
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    if names.is_empty() {
        let paragraph = Paragraph::new("(no samples)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    // Keep the selection on screen
    if selected < *scroll {
        *scroll = selected;
    } else if selected >= *scroll + visible_height {
        *scroll = selected + 1 - visible_height;
    }
    clamp_scroll(scroll, names.len(), visible_height);

    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(idx, name)| {
            let marker = if loaded == Some(name.as_str()) { "● " } else { "  " };
            let style = if idx == selected {
                Style::default()
                    .bg(DEFAULT_THEME.current_line_bg)
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.fg)
            };
            ListItem::new(format!("{}{}", marker, name)).style(style)
        })
        .collect();

    let list = List::new(items).block(block.padding(Padding::new(1, 0, 0, 0)));
    frame.render_widget(list, area);
}
