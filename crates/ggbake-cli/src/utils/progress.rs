//! Download progress rendering.
//!
//! Starts as a spinner and upgrades to a byte-accurate bar the first time
//! the server reports a total length; with no length the spinner keeps
//! showing the running byte count (indeterminate, never a fake percentage).

use indicatif::{HumanBytes, ProgressBar, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Terminal progress display fed from the pipeline's progress callback.
pub struct DownloadProgress {
    bar: ProgressBar,
    length_known: AtomicBool,
}

impl DownloadProgress {
    /// Create a spinner-style display for a named artifact.
    pub fn new(file_name: &str) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_message(format!("Downloading {file_name}"));
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            length_known: AtomicBool::new(false),
        }
    }

    /// Record a progress point. Safe to call from the download callback.
    pub fn update(&self, downloaded: u64, total: Option<u64>) {
        if let Some(total) = total {
            if !self.length_known.swap(true, Ordering::Relaxed) {
                self.bar.set_style(
                    ProgressStyle::with_template(
                        "{msg} [{bar:40}] {bytes}/{total_bytes} ({eta})",
                    )
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
                );
                self.bar.set_length(total);
            }
            self.bar.set_position(downloaded);
        } else {
            self.bar
                .set_message(format!("Downloading... {}", HumanBytes(downloaded)));
        }
    }

    /// Finish and clear the display.
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
