// rustsharp: structural Rust to C# translator

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use rustsharp::config::{parse_type_override, validate_identifier, TranslatorConfig};
use rustsharp::samples::{check, SampleStore};
use rustsharp::ui::App;

/// Exit code for unusable input: missing arguments, IO failures, syntax errors
const EXIT_FAILURE: i32 = -1;
/// Exit code for a translation that does not match `--expect`
const EXIT_MISMATCH: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "rustsharp", version)]
#[command(about = "Translate Rust source into structurally equivalent C#")]
struct Cli {
    /// Rust source file to translate
    input: Option<PathBuf>,

    /// Write the translation here instead of stdout
    output: Option<PathBuf>,

    /// Override a type name mapping (repeatable), e.g. usize=nuint
    #[arg(long = "type-map", value_name = "NAME=TARGET", value_parser = parse_type_override)]
    type_map: Vec<(String, String)>,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    indent: usize,

    /// Name of the static class wrapping the translation
    #[arg(long, default_value = "Crate", value_parser = validate_identifier)]
    root_class: String,

    /// Compare the translation with this expected C# file
    #[arg(long, value_name = "FILE")]
    expect: Option<PathBuf>,

    /// Open the input in the terminal viewer
    #[arg(long)]
    view: bool,

    /// Browse the samples in this directory in the terminal viewer
    #[arg(long, value_name = "DIR")]
    samples: Option<PathBuf>,

    /// Log generation details to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn config(&self) -> TranslatorConfig {
        let mut config = TranslatorConfig::default()
            .with_indent_width(self.indent)
            .with_root_class(self.root_class.clone());
        for (name, target) in &self.type_map {
            config = config.with_type_override(name.clone(), target.clone());
        }
        config
    }
}

/// Logs go to stderr; stdout carries only the translation
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let code = match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_FAILURE
        }
    };
    std::process::exit(code);
}

fn run(cli: &Cli) -> Result<i32> {
    let config = cli.config();

    if let Some(dir) = &cli.samples {
        let app = App::for_samples(SampleStore::new(dir), config)
            .with_context(|| format!("Cannot open samples in {}", dir.display()))?;
        run_viewer(app)?;
        return Ok(0);
    }

    let Some(input) = &cli.input else {
        eprintln!("Error: No input file provided");
        eprintln!();
        eprintln!("{}", Cli::command().render_usage());
        return Ok(EXIT_FAILURE);
    };

    let expected = match &cli.expect {
        Some(path) => Some(read_file(path, "expected file")?),
        None => None,
    };

    if cli.view {
        let app = App::for_file(input, expected, config)
            .with_context(|| format!("Cannot read input file {}", input.display()))?;
        run_viewer(app)?;
        return Ok(0);
    }

    let source = read_file(input, "input file")?;
    let translation =
        rustsharp::translate_with(&source, &config).with_context(|| input.display().to_string())?;
    for gap in &translation.gaps {
        warn!("{}", gap);
    }

    match &cli.output {
        Some(path) => {
            fs::write(path, &translation.text)
                .with_context(|| format!("Cannot write output file {}", path.display()))?;
            info!("translation written to {}", path.display());
        }
        None => print!("{}", translation.text),
    }

    if let (Some(expected), Some(path)) = (expected, &cli.expect) {
        if let Err(mismatch) = check(&translation.text, &expected) {
            eprintln!("Translation does not match {}: {}", path.display(), mismatch);
            return Ok(EXIT_MISMATCH);
        }
        info!("translation matches {}", path.display());
    }

    Ok(0)
}

fn read_file(path: &Path, what: &str) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Cannot read {} {}", what, path.display()))
}

fn run_viewer(mut app: App) -> Result<()> {
    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res.context("Viewer failed")
}
