//! Code pane rendering with syntax highlighting
//!
//! One renderer serves every code view: the Rust source, the C# translation
//! and the expected C# text. Only the keyword tables differ between the two
//! languages.
//!
//! # Rendering
//!
//! The pane uses a simple character-by-character tokenizer to apply syntax
//! highlighting styles without requiring a full lexer.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Keyword tables used for highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Rust,
    CSharp,
}

impl Language {
    fn is_type(self, word: &str) -> bool {
        match self {
            Language::Rust => matches!(
                word,
                "i8" | "i16"
                    | "i32"
                    | "i64"
                    | "isize"
                    | "u8"
                    | "u16"
                    | "u32"
                    | "u64"
                    | "usize"
                    | "f32"
                    | "f64"
                    | "bool"
                    | "char"
                    | "str"
                    | "String"
                    | "Vec"
                    | "Option"
                    | "Result"
                    | "Self"
            ),
            Language::CSharp => matches!(
                word,
                "int"
                    | "uint"
                    | "long"
                    | "ulong"
                    | "short"
                    | "ushort"
                    | "byte"
                    | "sbyte"
                    | "nint"
                    | "nunt"
                    | "float"
                    | "double"
                    | "bool"
                    | "char"
                    | "string"
                    | "void"
                    | "var"
                    | "dynamic"
                    | "object"
                    | "List"
                    | "Func"
                    | "Action"
            ),
        }
    }

    fn is_keyword(self, word: &str) -> bool {
        match self {
            Language::Rust => matches!(
                word,
                "fn" | "let"
                    | "mut"
                    | "if"
                    | "else"
                    | "match"
                    | "loop"
                    | "while"
                    | "for"
                    | "in"
                    | "return"
                    | "break"
                    | "continue"
                    | "struct"
                    | "enum"
                    | "impl"
                    | "trait"
                    | "mod"
                    | "use"
                    | "pub"
                    | "const"
                    | "static"
                    | "type"
                    | "where"
                    | "as"
                    | "ref"
                    | "move"
                    | "self"
                    | "crate"
                    | "super"
                    | "extern"
                    | "unsafe"
                    | "dyn"
            ),
            Language::CSharp => matches!(
                word,
                "public"
                    | "private"
                    | "static"
                    | "class"
                    | "partial"
                    | "abstract"
                    | "interface"
                    | "using"
                    | "new"
                    | "return"
                    | "if"
                    | "else"
                    | "switch"
                    | "case"
                    | "default"
                    | "break"
                    | "continue"
                    | "goto"
                    | "while"
                    | "for"
                    | "foreach"
                    | "in"
                    | "is"
                    | "and"
                    | "or"
                    | "not"
                    | "when"
                    | "with"
                    | "this"
                    | "ref"
                    | "const"
                    | "throw"
            ),
        }
    }

    fn is_constant(self, word: &str) -> bool {
        match self {
            Language::Rust => matches!(word, "true" | "false" | "None"),
            Language::CSharp => matches!(word, "true" | "false" | "null"),
        }
    }
}

/// Simple syntax highlighting for one line of code
pub fn highlight_line(line: &str, language: Language) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    // Simple tokenizer over (byte offset, char) pairs so slices stay on char boundaries
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (offset, c) = chars[i];

        // Handle comments
        if c == '/' && matches!(chars.get(i + 1), Some((_, '/' | '*'))) {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            spans.push(Span::styled(
                line[offset..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // Handle strings
        if c == '"' {
            if !current_word.is_empty() {
                spans.push(Span::raw(std::mem::take(&mut current_word)));
            }
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != '"' {
                if chars[end].1 == '\\' {
                    end += 2;
                } else {
                    end += 1;
                }
            }
            end = (end + 1).min(chars.len());
            let end_offset = chars.get(end).map_or(line.len(), |(offset, _)| *offset);
            spans.push(Span::styled(
                line[offset..end_offset].to_string(),
                Style::default().fg(DEFAULT_THEME.string), // Strings
            ));
            i = end;
            continue;
        }

        // Handle non-alphanumeric (delimiters)
        if !c.is_alphanumeric() && c != '_' {
            if !current_word.is_empty() {
                let is_func = c == '(' || c == '!';
                let style = keyword_style(&current_word, language, is_func);
                spans.push(Span::styled(std::mem::take(&mut current_word), style));
            }

            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary), // Brackets
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };

            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    if !current_word.is_empty() {
        let style = keyword_style(&current_word, language, false);
        spans.push(Span::styled(current_word, style));
    }

    Line::from(spans)
}

fn keyword_style(word: &str, language: Language, is_function: bool) -> Style {
    if language.is_type(word) {
        Style::default().fg(DEFAULT_THEME.type_name)
    } else if language.is_keyword(word) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if language.is_constant(word) || word.starts_with(|c: char| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else if is_function {
        Style::default().fg(DEFAULT_THEME.function)
    } else {
        Style::default().fg(DEFAULT_THEME.fg) // Variables/Identifiers
    }
}

/// Border style shared by all panes
pub fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}

/// Clamp a scroll offset so the last page stays filled
pub fn clamp_scroll(scroll: &mut usize, total_lines: usize, visible_height: usize) {
    if total_lines > visible_height {
        *scroll = (*scroll).min(total_lines - visible_height);
    } else {
        *scroll = 0;
    }
}

/// Render a line-numbered, highlighted code pane
pub fn render_code_pane(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    code: &str,
    language: Language,
    is_focused: bool,
    scroll: &mut usize,
) {
    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style(is_focused));

    let lines: Vec<&str> = code.lines().collect();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1
    clamp_scroll(scroll, lines.len(), visible_height);

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(*scroll)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = Span::styled(format!("{:4} ", idx + 1), Style::default().fg(DEFAULT_THEME.comment));
            let mut spans = vec![line_num];
            spans.extend(highlight_line(line, language).spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(line: &Line) -> Vec<String> {
        line.spans.iter().map(|span| span.content.to_string()).collect()
    }

    #[test]
    fn test_highlight_splits_words_strings_and_comments() {
        let line = highlight_line("let s = \"a \\\" b\"; // done", Language::Rust);
        assert_eq!(
            words(&line),
            vec!["let", " ", "s", " ", "=", " ", "\"a \\\" b\"", ";", " ", "// done"]
        );
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(line.spans[6].style.fg, Some(DEFAULT_THEME.string));
        assert_eq!(line.spans[9].style.fg, Some(DEFAULT_THEME.comment));
    }

    #[test]
    fn test_keyword_tables_follow_language() {
        let rust = highlight_line("fn", Language::Rust);
        let csharp = highlight_line("fn", Language::CSharp);
        assert_eq!(rust.spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(csharp.spans[0].style.fg, Some(DEFAULT_THEME.fg));

        let line = highlight_line("int Add(", Language::CSharp);
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.type_name));
        assert_eq!(line.spans[2].style.fg, Some(DEFAULT_THEME.function));
    }

    #[test]
    fn test_non_ascii_text_is_sliced_on_char_boundaries() {
        let line = highlight_line("\"é\" // ü", Language::CSharp);
        assert_eq!(words(&line), vec!["\"é\"", " ", "// ü"]);
    }

    #[test]
    fn test_clamp_scroll() {
        let mut scroll = 50;
        clamp_scroll(&mut scroll, 30, 10);
        assert_eq!(scroll, 20);
        clamp_scroll(&mut scroll, 5, 10);
        assert_eq!(scroll, 0);
    }
}
