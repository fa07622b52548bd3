//! Progress bar utilities
//!
//! Spinners for the fetch stages and a counting bar for the upload fan-out.

use std::time::Duration;

use super::OutputConfig;

/// Progress bar wrapper
///
/// When progress is disabled every method is a no-op.
#[derive(Debug)]
pub struct ProgressBar {
    bar: Option<indicatif::ProgressBar>,
}

impl ProgressBar {
    /// Create a bar counting `total` objects
    pub fn new(config: OutputConfig, total: u64, message: &str) -> Self {
        let bar = if config.no_progress {
            None
        } else {
            let bar = indicatif::ProgressBar::new(total);
            if let Ok(style) = indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len}")
            {
                bar.set_style(style.progress_chars("#>-"));
            }
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(100));
            Some(bar)
        };

        Self { bar }
    }

    /// Create a spinner for indeterminate progress
    pub fn spinner(config: OutputConfig, message: &str) -> Self {
        let bar = if config.no_progress {
            None
        } else {
            let bar = indicatif::ProgressBar::new_spinner();
            if let Ok(style) =
                indicatif::ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
            {
                bar.set_style(style);
            }
            bar.set_message(message.to_string());
            bar.enable_steady_tick(Duration::from_millis(100));
            Some(bar)
        };

        Self { bar }
    }

    /// Increment progress
    pub fn inc(&self, delta: u64) {
        if let Some(bar) = &self.bar {
            bar.inc(delta);
        }
    }

    /// Finish with a message
    pub fn finish_with_message(&self, message: &str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message.to_string());
        }
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
    }

    /// Check if progress bar is visible
    pub fn is_visible(&self) -> bool {
        self.bar.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_bar_no_progress() {
        let config = OutputConfig {
            no_progress: true,
            ..Default::default()
        };
        let bar = ProgressBar::new(config, 100, "uploading");
        assert!(!bar.is_visible());
        bar.inc(1);
        bar.finish_and_clear();
    }

    #[test]
    fn test_spinner_normal() {
        let bar = ProgressBar::spinner(OutputConfig::default(), "fetching");
        assert!(bar.is_visible());
        bar.finish_with_message("done");
    }
}
