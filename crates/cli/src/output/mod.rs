//! Output formatting utilities
//!
//! This module provides the terminal formatter for status messages and the
//! spinners and progress bars shown while a run is in flight.

mod formatter;
mod progress;

pub use formatter::Formatter;
pub use progress::ProgressBar;

/// Output configuration derived from the terminal
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputConfig {
    /// Disable colored output
    pub no_color: bool,
    /// Disable spinners and progress bars
    pub no_progress: bool,
}

impl OutputConfig {
    /// Colors and progress only when stderr is a terminal
    pub fn detect() -> Self {
        let term = console::Term::stderr();
        Self {
            no_color: !console::colors_enabled_stderr(),
            no_progress: !term.is_term(),
        }
    }
}
