//! Terminal presentation layer
//!
//! This module handles:
//! - Leveled console output through [`Logger`]
//! - Spinners for long-running downloads and extractions
//! - The operator input source used by device selection (see [`input`])
//!
//! Debug output is controlled by the `debug` value the logger is built with,
//! there is no process-wide logging state.

pub mod input;

use console::Style;
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Debug;
use std::time::Duration;

/// Console logger shared by every stage of the wizard
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger {
    debug: bool,
}

impl Logger {
    /// Create a logger, printing debug output only when `debug` is set
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    /// Whether debug output is enabled
    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    /// Write text as-is, without a trailing newline
    pub fn out(&self, text: &str) {
        print!("{text}");
    }

    pub fn info(&self, text: &str) {
        println!("{text}");
    }

    pub fn warn(&self, text: &str) {
        println!("{}", Style::new().bold().yellow().apply_to(text));
    }

    pub fn error(&self, text: &str) {
        println!("{}", Style::new().bold().red().apply_to(text));
    }

    pub fn debug(&self, text: &str) {
        if self.debug {
            println!("{}", Style::new().dim().apply_to(text));
        }
    }

    /// Pretty-print a labelled value when debug output is enabled
    pub fn debug_value(&self, label: &str, value: &impl Debug) {
        if self.debug {
            println!("{}", Style::new().dim().apply_to(format!("{label}: {value:#?}")));
        }
    }

    /// Start a spinner for a step with no measurable progress
    ///
    /// Hidden when stdout is not a terminal so piped output stays clean.
    pub fn spinner(&self, message: &str) -> ProgressBar {
        let pb = if console::user_attended() {
            ProgressBar::new_spinner()
        } else {
            ProgressBar::hidden()
        };
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

/// Emphasize a value inside a message
pub fn highlight(text: &str) -> String {
    Style::new().bold().magenta().apply_to(text).to_string()
}

/// Underline a heading
pub fn underline(text: &str) -> String {
    Style::new().underlined().apply_to(text).to_string()
}

/// Format a byte count for device listings
#[allow(clippy::cast_precision_loss)]
pub fn human_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1000.0 && unit < UNITS.len() - 1 {
        size /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{size:.1} {}", UNITS[unit])
    }
}
