//! # Output Sinks and Terminal Configuration
//!
//! Every command accumulates its human-readable results in a [`Sink`] and
//! renders them once, at the end. The batch dispatcher and the actions only
//! see the trait, so adding a format means adding an implementation here and
//! nothing else.
//!
//! - [`TextSink`] prints one line per message, decorating outcomes with a
//!   status marker (emoji when colours are on, `[OK]`/`[FAIL]` otherwise).
//! - [`JsonSink`] prints a single `{"messages": [...]}` object.
//!
//! Sinks are shared by reference between the dispatcher's worker threads.
//! `add_line` takes `&self`, appends under a mutex and never fails.
//!
//! ## Respecting User Preferences
//!
//! Colour detection follows:
//! - `--color=never|always|auto` - CLI flag for color control
//! - `NO_COLOR` - Disables colors when set (per https://no-color.org/)
//! - `CLICOLOR=0` - Disables colors
//! - `CLICOLOR_FORCE=1` - Forces colors even in non-TTY
//! - `TERM=dumb` - Disables colors for dumb terminals

use std::env;
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard};

use console::style;

use crate::dispatch::Outcome;

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Whether colors and emojis should be used in output.
    pub use_color: bool,
}

impl OutputConfig {
    /// Create an output configuration from environment and CLI flag.
    ///
    /// `always` forces colours on (overriding `NO_COLOR`), `never` forces them
    /// off, anything else detects from the environment and the terminal.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // Presence alone disables, even when empty.
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}

/// Returns `emoji_str` when colours are enabled, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}

/// Which sink a command should render through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_json_flag(json: bool) -> Self {
        if json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// Build the sink for this format.
    pub fn sink(self, config: OutputConfig) -> Box<dyn Sink> {
        match self {
            OutputFormat::Text => Box::new(TextSink::new(config)),
            OutputFormat::Json => Box::new(JsonSink::new()),
        }
    }
}

/// An append-only collection of result lines, rendered once at the end.
pub trait Sink: Send + Sync {
    /// Append one message.
    fn add_line(&self, line: &str);

    /// Append the message for a repository outcome.
    fn add_outcome(&self, outcome: &Outcome) {
        self.add_line(&outcome.to_string());
    }

    /// Snapshot of the buffered messages, in insertion order.
    fn lines(&self) -> Vec<String>;

    /// The full rendered output.
    fn render(&self) -> String;

    /// Write the rendered output to stdout. Calling it again re-renders the
    /// same buffered state.
    fn output(&self) -> io::Result<()> {
        let rendered = self.render();
        let mut out = io::stdout().lock();
        out.write_all(rendered.as_bytes())?;
        out.flush()
    }
}

fn lock(lines: &Mutex<Vec<String>>) -> MutexGuard<'_, Vec<String>> {
    // A panicking writer cannot leave a half-pushed String behind.
    lines.lock().unwrap_or_else(|e| e.into_inner())
}

/// Plain text, one message per line.
#[derive(Debug)]
pub struct TextSink {
    lines: Mutex<Vec<String>>,
    config: OutputConfig,
}

impl TextSink {
    pub fn new(config: OutputConfig) -> Self {
        Self {
            lines: Mutex::new(Vec::new()),
            config,
        }
    }
}

impl Sink for TextSink {
    fn add_line(&self, line: &str) {
        lock(&self.lines).push(line.to_string());
    }

    fn add_outcome(&self, outcome: &Outcome) {
        let line = if outcome.success {
            format!("{} {}", emoji(&self.config, "✅", "[OK]"), outcome)
        } else if self.config.use_color {
            format!("❌ {}", style(outcome).red())
        } else {
            format!("[FAIL] {}", outcome)
        };
        self.add_line(&line);
    }

    fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    fn render(&self) -> String {
        let lines = lock(&self.lines);
        let mut rendered = String::new();
        for line in lines.iter() {
            rendered.push_str(line);
            rendered.push('\n');
        }
        rendered
    }
}

/// A single JSON object: `{"messages": [...]}`.
#[derive(Debug, Default)]
pub struct JsonSink {
    lines: Mutex<Vec<String>>,
}

impl JsonSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Sink for JsonSink {
    fn add_line(&self, line: &str) {
        lock(&self.lines).push(line.to_string());
    }

    fn lines(&self) -> Vec<String> {
        lock(&self.lines).clone()
    }

    fn render(&self) -> String {
        let value = serde_json::json!({ "messages": *lock(&self.lines) });
        format!("{:#}\n", value)
    }
}
