//! Spinner shown while the interactive mode scans logs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Indeterminate progress for a blocking step
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    /// Start spinning with `message`
    pub fn start(message: impl Into<String>) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
            pb.set_style(
                style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✔"]),
            );
        }
        pb.set_message(message.into());
        pb.enable_steady_tick(Duration::from_millis(80));
        Self { pb }
    }

    /// Run `f` with the spinner hidden, so sink lines are not overdrawn
    pub fn suspend<R>(&self, f: impl FnOnce() -> R) -> R {
        self.pb.suspend(f)
    }

    /// Stop and leave `message` behind
    pub fn finish(self, message: impl Into<String>) {
        self.pb.finish_with_message(message.into());
    }
}
