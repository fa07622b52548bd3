//! Formatter for human-readable output
//!
//! Ensures consistent status messages across the run.

use console::style;

use super::OutputConfig;

/// Formatter for CLI output
#[derive(Debug, Clone)]
pub struct Formatter {
    config: OutputConfig,
}

impl Formatter {
    /// Create a new formatter with the given configuration
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> OutputConfig {
        self.config
    }

    /// Check if colors are enabled
    pub fn colors_enabled(&self) -> bool {
        !self.config.no_color
    }

    /// Output a success message
    pub fn success(&self, message: &str) {
        if self.colors_enabled() {
            println!("{} {message}", style("✓").green());
        } else {
            println!("✓ {message}");
        }
    }

    /// Output an error message
    ///
    /// A blank line separates the error from any prompt or spinner above it.
    pub fn error(&self, message: &str) {
        eprintln!();
        if self.colors_enabled() {
            eprintln!("{} {}", style("✗").red(), style(message).red());
        } else {
            eprintln!("✗ {message}");
        }
    }

    /// Output a warning message
    pub fn warning(&self, message: &str) {
        if self.colors_enabled() {
            eprintln!("{} {message}", style("⚠").yellow());
        } else {
            eprintln!("⚠ {message}");
        }
    }

    /// Highlight a path or URL inside a message
    pub fn highlight(&self, text: &str) -> String {
        if self.colors_enabled() {
            style(text).blue().to_string()
        } else {
            text.to_string()
        }
    }
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(OutputConfig::default())
    }
}
