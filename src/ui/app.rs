//! Main TUI application state and logic

use crate::codegen::Translation;
use crate::config::TranslatorConfig;
use crate::samples::{validate, Sample, SampleError, SampleStore};
use crate::ui::panes::{self, OutputView, Validation};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    Frame, Terminal,
};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Samples,
    Source,
    Translation,
    Expected,
}

/// Where the viewed source comes from
enum Origin {
    File(PathBuf),
    Samples {
        store: SampleStore,
        names: Vec<String>,
        selected: usize,
        loaded: Option<String>,
    },
}

/// Translation result as shown in the viewer
pub enum Outcome {
    Translated(Translation),
    Failed(String),
}

/// The main application state
pub struct App {
    config: TranslatorConfig,
    origin: Origin,

    /// Source text being translated
    pub source: String,

    /// Expected translation, if one is known
    pub expected: Option<String>,

    pub outcome: Outcome,
    pub validation: Validation,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub samples_scroll: usize,
    pub source_scroll: usize,
    pub translation_scroll: usize,
    pub expected_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
    pub status_is_error: bool,
}

impl App {
    /// Viewer for a single source file, optionally checked against an expected text
    pub fn for_file(path: impl Into<PathBuf>, expected: Option<String>, config: TranslatorConfig) -> io::Result<Self> {
        let path = path.into();
        let source = fs::read_to_string(&path)?;
        let mut app = App::new(Origin::File(path), config);
        app.source = source;
        app.expected = expected;
        app.focused_pane = FocusedPane::Source;
        app.retranslate();
        Ok(app)
    }

    /// Sample browser over a directory; the first sample is loaded right away
    pub fn for_samples(store: SampleStore, config: TranslatorConfig) -> Result<Self, SampleError> {
        let names = store.list()?;
        let first = names.first().cloned();
        let mut app = App::new(
            Origin::Samples {
                store,
                names,
                selected: 0,
                loaded: None,
            },
            config,
        );
        match first {
            Some(name) => app.load_sample(&name),
            None => {
                app.retranslate();
                app.status_message = "No samples found".to_string();
            }
        }
        Ok(app)
    }

    fn new(origin: Origin, config: TranslatorConfig) -> Self {
        App {
            config,
            origin,
            source: String::new(),
            expected: None,
            outcome: Outcome::Failed(String::new()),
            validation: Validation::NoExpected,
            focused_pane: FocusedPane::Samples,
            samples_scroll: 0,
            source_scroll: 0,
            translation_scroll: 0,
            expected_scroll: 0,
            should_quit: false,
            status_message: String::from("Ready!"),
            status_is_error: false,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    fn is_browsing(&self) -> bool {
        matches!(self.origin, Origin::Samples { .. })
    }

    /// Focusable panes in on-screen order
    fn panes(&self) -> Vec<FocusedPane> {
        let mut panes = Vec::with_capacity(4);
        if self.is_browsing() {
            panes.push(FocusedPane::Samples);
        }
        panes.push(FocusedPane::Source);
        panes.push(FocusedPane::Translation);
        if self.shows_expected() {
            panes.push(FocusedPane::Expected);
        }
        panes
    }

    fn shows_expected(&self) -> bool {
        self.is_browsing() || self.expected.is_some()
    }

    fn cycle_focus(&mut self, forward: bool) {
        let panes = self.panes();
        let current = panes.iter().position(|pane| *pane == self.focused_pane).unwrap_or(0);
        let next = if forward {
            (current + 1) % panes.len()
        } else {
            (current + panes.len() - 1) % panes.len()
        };
        self.focused_pane = panes[next];
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());
        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let code_area = match &self.origin {
            Origin::Samples {
                names,
                selected,
                loaded,
                ..
            } => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(24), Constraint::Min(0)])
                    .split(pane_area);
                panes::render_samples_pane(
                    frame,
                    columns[0],
                    names,
                    *selected,
                    loaded.as_deref(),
                    self.focused_pane == FocusedPane::Samples,
                    &mut self.samples_scroll,
                );
                columns[1]
            }
            Origin::File(_) => pane_area,
        };
        self.render_code_panes(frame, code_area);

        panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.validation,
            self.status_is_error,
            self.is_browsing(),
        );
    }

    fn render_code_panes(&mut self, frame: &mut Frame, area: Rect) {
        let constraints = if self.shows_expected() {
            vec![
                Constraint::Percentage(34),
                Constraint::Percentage(33),
                Constraint::Percentage(33),
            ]
        } else {
            vec![Constraint::Percentage(50), Constraint::Percentage(50)]
        };
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        panes::render_code_pane(
            frame,
            columns[0],
            "Source",
            &self.source,
            panes::Language::Rust,
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        let view = match &self.outcome {
            Outcome::Translated(translation) => OutputView::Translated {
                text: &translation.text,
                gaps: translation.gaps.len(),
            },
            Outcome::Failed(message) => OutputView::Failed { message },
        };
        panes::render_translation_pane(
            frame,
            columns[1],
            view,
            self.focused_pane == FocusedPane::Translation,
            &mut self.translation_scroll,
        );

        if let Some(area) = columns.get(2) {
            panes::render_expected_pane(
                frame,
                *area,
                self.expected.as_deref(),
                self.focused_pane == FocusedPane::Expected,
                &mut self.expected_scroll,
            );
        }
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => {
                self.should_quit = true;
            }
            KeyCode::Tab => self.cycle_focus(true),
            KeyCode::BackTab => self.cycle_focus(false),
            KeyCode::Up => self.scroll(false),
            KeyCode::Down => self.scroll(true),
            KeyCode::Enter => {
                if let Some(name) = self.selected_name() {
                    self.load_sample(&name);
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.reload(),
            KeyCode::Char('s') | KeyCode::Char('S') => self.store_expected(),
            _ => {}
        }
    }

    fn scroll(&mut self, down: bool) {
        let step = |offset: &mut usize| {
            *offset = if down {
                offset.saturating_add(1)
            } else {
                offset.saturating_sub(1)
            };
        };
        match self.focused_pane {
            FocusedPane::Samples => {
                if let Origin::Samples { names, selected, .. } = &mut self.origin {
                    if down && *selected + 1 < names.len() {
                        *selected += 1;
                    } else if !down && *selected > 0 {
                        *selected -= 1;
                    }
                }
            }
            FocusedPane::Source => step(&mut self.source_scroll),
            FocusedPane::Translation => step(&mut self.translation_scroll),
            FocusedPane::Expected => step(&mut self.expected_scroll),
        }
    }

    fn selected_name(&self) -> Option<String> {
        match &self.origin {
            Origin::Samples { names, selected, .. } => names.get(*selected).cloned(),
            Origin::File(_) => None,
        }
    }

    fn load_sample(&mut self, name: &str) {
        let Origin::Samples { store, loaded, .. } = &mut self.origin else {
            return;
        };
        match store.load(name) {
            Ok(Sample { source, expected }) => {
                *loaded = Some(name.to_string());
                self.source = source;
                self.expected = Some(expected);
                self.source_scroll = 0;
                self.translation_scroll = 0;
                self.expected_scroll = 0;
                self.retranslate();
                self.set_status(format!("Loaded sample '{}'", name), false);
            }
            Err(err) => self.set_status(format!("Cannot load sample: {}", err), true),
        }
    }

    fn reload(&mut self) {
        match &mut self.origin {
            Origin::File(path) => match fs::read_to_string(&*path) {
                Ok(source) => {
                    self.source = source;
                    self.retranslate();
                    self.set_status("Reloaded".to_string(), false);
                }
                Err(err) => {
                    let message = format!("Cannot read {}: {}", path.display(), err);
                    self.set_status(message, true);
                }
            },
            Origin::Samples {
                store,
                names,
                selected,
                loaded,
            } => {
                match store.list() {
                    Ok(list) => {
                        *names = list;
                        *selected = (*selected).min(names.len().saturating_sub(1));
                    }
                    Err(err) => {
                        self.set_status(format!("Cannot list samples: {}", err), true);
                        return;
                    }
                }
                match loaded.clone() {
                    Some(name) => self.load_sample(&name),
                    None => {
                        self.retranslate();
                        self.set_status("Reloaded".to_string(), false);
                    }
                }
            }
        }
    }

    /// Save the current translation as the loaded sample's expected output
    fn store_expected(&mut self) {
        let Outcome::Translated(translation) = &self.outcome else {
            self.set_status("Nothing to store: translation failed".to_string(), true);
            return;
        };
        let sample = Sample {
            source: self.source.clone(),
            expected: translation.text.clone(),
        };
        let Origin::Samples {
            store,
            loaded: Some(name),
            ..
        } = &self.origin
        else {
            self.set_status("No sample loaded".to_string(), true);
            return;
        };

        let name = name.clone();
        match store.save(&name, &sample) {
            Ok(()) => {
                self.expected = Some(sample.expected);
                self.retranslate();
                self.set_status(format!("Stored expected output for '{}'", name), false);
            }
            Err(err) => self.set_status(format!("Cannot store sample: {}", err), true),
        }
    }

    /// Translate the current source and compare it with the expected text
    fn retranslate(&mut self) {
        self.outcome = match crate::translate_with(&self.source, &self.config) {
            Ok(translation) => Outcome::Translated(translation),
            Err(err) => Outcome::Failed(err.to_string()),
        };

        let expected = self.expected.as_deref().filter(|text| !text.trim().is_empty());
        self.validation = match (&self.outcome, expected) {
            (_, None) => Validation::NoExpected,
            (Outcome::Translated(translation), Some(expected)) if validate(&translation.text, expected) => {
                Validation::Pass
            }
            _ => Validation::Fail,
        };
    }

    fn set_status(&mut self, message: String, is_error: bool) {
        self.status_message = message;
        self.status_is_error = is_error;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(KeyEvent::from(code));
    }

    fn store_with(samples: &[(&str, &str, &str)]) -> (tempfile::TempDir, SampleStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SampleStore::new(dir.path());
        for (name, source, expected) in samples {
            let sample = Sample {
                source: source.to_string(),
                expected: expected.to_string(),
            };
            store.save(name, &sample).unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_browser_loads_first_sample_and_validates() {
        let (_dir, store) = store_with(&[
            ("a_unit", "fn f() {}", "public static class Crate { public static void F() { } }"),
            ("b_wrong", "fn g() {}", "public static class Crate { }"),
        ]);
        let mut app = App::for_samples(store, TranslatorConfig::default()).unwrap();
        assert_eq!(app.validation, Validation::Pass);
        assert_eq!(app.status_message, "Loaded sample 'a_unit'");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.source, "fn g() {}");
        assert_eq!(app.validation, Validation::Fail);
    }

    #[test]
    fn test_store_expected_turns_fail_into_pass() {
        let (dir, store) = store_with(&[("only", "fn h() {}", "")]);
        let mut app = App::for_samples(store, TranslatorConfig::default()).unwrap();
        assert_eq!(app.validation, Validation::NoExpected);

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.validation, Validation::Pass);
        let saved = SampleStore::new(dir.path()).load("only").unwrap();
        assert!(saved.expected.contains("public static void H()"));
    }

    #[test]
    fn test_focus_cycles_through_visible_panes() {
        let (_dir, store) = store_with(&[]);
        let mut app = App::for_samples(store, TranslatorConfig::default()).unwrap();
        assert_eq!(app.status_message, "No samples found");
        assert_eq!(app.focused_pane, FocusedPane::Samples);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focused_pane, FocusedPane::Expected);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_file_viewer_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.rs");
        fs::write(&path, "fn broken( {").unwrap();
        let mut app = App::for_file(&path, None, TranslatorConfig::default()).unwrap();
        assert!(matches!(app.outcome, Outcome::Failed(ref message) if message.starts_with("Parse error")));

        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focused_pane, FocusedPane::Source);

        press(&mut app, KeyCode::Char('s'));
        assert!(app.status_is_error);

        fs::write(&path, "fn fixed() {}").unwrap();
        press(&mut app, KeyCode::Char('r'));
        assert!(matches!(app.outcome, Outcome::Translated(_)));
        assert_eq!(app.status_message, "Reloaded");
    }

    #[test]
    fn test_render_draws_every_pane() {
        let (_dir, store) = store_with(&[("point", "struct Point { x: i32 }", "")]);
        let mut app = App::for_samples(store, TranslatorConfig::default()).unwrap();
        let mut terminal = Terminal::new(TestBackend::new(200, 20)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = buffer.content().iter().map(|cell| cell.symbol()).collect();
        assert!(screen.contains("Samples"));
        assert!(screen.contains("public partial class Point"));
        assert!(screen.contains("NO EXPECTED"));
    }
}
