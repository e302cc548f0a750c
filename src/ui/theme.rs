//! Viewer palette shared by the code, sample and status panes

use ratatui::style::Color;

pub struct Theme {
    /// Plain code and list text
    pub fg: Color,
    /// Brackets and braces in both languages
    pub primary: Color,
    /// Selected sample name
    pub secondary: Color,
    /// Line numbers, comments, hints and placeholders
    pub comment: Color,
    /// `PASS` badge
    pub success: Color,
    /// `FAIL` badge and translation errors
    pub error: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    /// Status bar and sample selection background
    pub current_line_bg: Color,
    /// Identifiers followed by `(` or `!`
    pub function: Color,
    /// Built-in type names of either language
    pub type_name: Color,
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    keyword: Color::Rgb(137, 180, 250),
    string: Color::Rgb(250, 179, 135),
    number: Color::Rgb(250, 179, 135),
    border_focused: Color::Rgb(249, 226, 175),
    border_normal: Color::Rgb(108, 112, 134),
    current_line_bg: Color::Rgb(50, 50, 70),
    function: Color::Rgb(249, 226, 175),
    type_name: Color::Rgb(148, 226, 213),
};
