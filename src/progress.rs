//! Progress display for uploads and installs

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Byte progress bar for a single file transfer
pub struct TransferProgress {
    bar: ProgressBar,
}

impl TransferProgress {
    /// Create a bar for `total_bytes`, labelled with the file name
    pub fn new(file_name: &str, total_bytes: u64) -> Self {
        let style = ProgressStyle::default_bar()
            .template("{msg} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");

        let bar = ProgressBar::new(total_bytes);
        bar.set_style(style);
        bar.set_message(format!("Uploading {file_name}"));
        Self { bar }
    }

    /// Record `bytes` as read
    pub fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    pub fn finish(&self) {
        self.bar.finish();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

/// Spinner shown while an installer subprocess runs
pub struct Spinner {
    bar: Option<ProgressBar>,
}

impl Spinner {
    /// Start a spinner with `message`, or a no-op one when `enabled` is false
    pub fn start(message: impl Into<String>, enabled: bool) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar: Some(bar) }
    }
}

impl Drop for Spinner {
    fn drop(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish_and_clear();
        }
    }
}
