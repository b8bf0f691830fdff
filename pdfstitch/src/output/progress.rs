//! Progress bar and indicators.
//!
//! Renders [`ProgressEvent`]s from a merge run on the terminal.
//!
//! # Examples
//!
//! ```
//! use pdfstitch::merge::ProgressEvent;
//! use pdfstitch::output::progress::{ProgressBar, ProgressStyle};
//!
//! let mut progress = ProgressBar::new(2, ProgressStyle::Bar);
//! progress.observe(&ProgressEvent {
//!     completed: 1,
//!     total: 2,
//!     current_name: "intro.pdf".to_string(),
//! });
//! progress.finish_with_message("Merge complete");
//! ```

use std::io::{self, Write};
use std::time::{Duration, Instant};

use crate::merge::ProgressEvent;

/// Shown while the merged document is serialized.
const FINALIZING_MESSAGE: &str = "Finalizing PDF...";

/// Style of progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStyle {
    /// Classic progress bar: [=====>    ]
    Bar,
    /// Simple counter: 2/5
    Counter,
}

/// Progress bar for visual feedback during a merge.
#[derive(Debug)]
pub struct ProgressBar {
    /// Total number of entries.
    total: usize,
    /// Entries processed.
    current: usize,
    /// Progress bar style.
    style: ProgressStyle,
    /// Optional message to display.
    message: Option<String>,
    /// Start time of the operation.
    start_time: Instant,
    /// Whether the progress bar is enabled.
    enabled: bool,
}

impl ProgressBar {
    /// Create a new progress bar.
    ///
    /// Disabled automatically when stdout is not a terminal.
    pub fn new(total: usize, style: ProgressStyle) -> Self {
        Self {
            total,
            current: 0,
            style,
            message: None,
            start_time: Instant::now(),
            enabled: Self::is_terminal(),
        }
    }

    /// Create a disabled progress bar (no output).
    pub fn disabled() -> Self {
        let mut pb = Self::new(0, ProgressStyle::Counter);
        pb.enabled = false;
        pb
    }

    fn is_terminal() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal()
    }

    /// Set the message to display with the progress bar.
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    /// Update the progress bar to a specific value.
    pub fn update(&mut self, current: usize) {
        self.current = current;
        self.render();
    }

    /// Update from a merge progress event.
    ///
    /// After the last entry the message switches to the serialization step.
    pub fn observe(&mut self, event: &ProgressEvent) {
        self.total = event.total;
        if event.is_last() {
            self.set_message(FINALIZING_MESSAGE);
        } else {
            self.set_message(format!(
                "Processing {}... ({}/{})",
                event.current_name, event.completed, event.total
            ));
        }
        self.update(event.completed);
    }

    /// Mark the progress bar as finished with a final message.
    pub fn finish_with_message(&mut self, message: impl Into<String>) {
        self.set_message(message);
        self.current = self.total;
        if self.enabled {
            self.render();
            println!();
        }
    }

    /// Clear the progress bar from the terminal.
    pub fn clear(&self) {
        if self.enabled {
            print!("\r\x1b[K");
            io::stdout().flush().ok();
        }
    }

    fn render(&self) {
        if !self.enabled {
            return;
        }

        print!("\r\x1b[K{}", self.line());
        io::stdout().flush().ok();
    }

    /// The line the bar currently shows.
    fn line(&self) -> String {
        let mut parts = Vec::new();

        if let Some(ref msg) = self.message {
            parts.push(msg.clone());
        }

        if self.style == ProgressStyle::Bar {
            parts.push(self.bar(30));
            parts.push(format!("{:.0}%", self.percent()));
        } else {
            parts.push(format!("{}/{}", self.current, self.total));
        }

        parts.push(format_duration(self.start_time.elapsed()));
        parts.join(" ")
    }

    fn bar(&self, width: usize) -> String {
        let filled = (width * self.current) / self.total.max(1);
        let filled = filled.min(width);
        let head = if filled > 0 && filled < width { ">" } else { "" };
        let body = filled.saturating_sub(head.len());

        format!(
            "[{}{}{}]",
            "=".repeat(body),
            head,
            " ".repeat(width - filled)
        )
    }

    /// Get the current progress percentage.
    pub fn percent(&self) -> f64 {
        if self.total > 0 {
            (self.current as f64 / self.total as f64) * 100.0
        } else {
            0.0
        }
    }

    /// Get the elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Format a duration as a human-readable string.
fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();

    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else {
        format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
    }
}
