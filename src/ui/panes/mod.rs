//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`source`]: Highlighted, line-numbered code display shared by every code view
//! - [`output`]: Translation pane (or the fatal error) and the expected-output pane
//! - [`samples`]: Sample list for the browser mode
//! - [`status`]: Status bar with keybindings and the validation badge
//!
//! Each pane module exports a stateless `render_*` function; scroll offsets
//! live in [`App`](crate::ui::App) and are clamped while rendering.

pub mod output;
pub mod samples;
pub mod source;
pub mod status;

pub use output::{render_expected_pane, render_translation_pane, OutputView};
pub use samples::render_samples_pane;
pub use source::{highlight_line, render_code_pane, Language};
pub use status::{render_status_bar, Validation};
