//! Message formatting and display.
//!
//! This module provides formatted output for different message types
//! with support for quiet and verbose modes.
//!
//! # Examples
//!
//! ```
//! use pdfstitch::output::formatter::OutputFormatter;
//!
//! let formatter = OutputFormatter::new(false, false);
//! formatter.info("Collecting files...");
//! formatter.success("Merge completed");
//! formatter.error("Something went wrong");
//! ```

use crate::collection::FileEntry;
use crate::config::Config;
use crate::output::{Notification, NotificationLevel};
use crate::utils::format_file_size;
use std::io;

/// Level of output message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    /// Informational message.
    Info,
    /// Success message.
    Success,
    /// Warning message.
    Warning,
    /// Error message.
    Error,
    /// Debug/verbose message.
    Debug,
}

impl From<NotificationLevel> for MessageLevel {
    fn from(level: NotificationLevel) -> Self {
        match level {
            NotificationLevel::Success => Self::Success,
            NotificationLevel::Error => Self::Error,
            NotificationLevel::Info => Self::Info,
        }
    }
}

/// Output formatter with configurable verbosity.
#[derive(Debug, Clone)]
pub struct OutputFormatter {
    /// Whether to suppress non-error output.
    quiet: bool,
    /// Whether to show verbose output.
    verbose: bool,
    /// Whether to use colored output.
    colored: bool,
}

impl OutputFormatter {
    /// Create a new output formatter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - Suppress non-error output
    /// * `verbose` - Show verbose output
    pub fn new(quiet: bool, verbose: bool) -> Self {
        Self {
            quiet,
            verbose,
            colored: Self::should_use_color(),
        }
    }

    /// Create a formatter from configuration.
    ///
    /// A JSON report replaces human-readable output, so JSON mode is quiet.
    pub fn from_config(config: &Config) -> Self {
        Self::new(!config.should_print(), config.verbose)
    }

    /// Create a quiet formatter (only errors).
    pub fn quiet() -> Self {
        Self::new(true, false)
    }

    /// Create a verbose formatter.
    pub fn verbose() -> Self {
        Self::new(false, true)
    }

    /// Returns true if stdout is a TTY and TERM is set.
    fn should_use_color() -> bool {
        use std::io::IsTerminal;
        io::stdout().is_terminal() && std::env::var("TERM").is_ok()
    }

    /// Print an informational message.
    ///
    /// Suppressed in quiet mode.
    pub fn info(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Info, message);
        }
    }

    /// Print a success message.
    ///
    /// Suppressed in quiet mode.
    pub fn success(&self, message: &str) {
        if !self.quiet {
            self.print_message(MessageLevel::Success, message);
        }
    }

    /// Print a warning message.
    ///
    /// Always displayed (even in quiet mode).
    pub fn warning(&self, message: &str) {
        self.print_message(MessageLevel::Warning, message);
    }

    /// Print an error message.
    ///
    /// Always displayed, on stderr.
    pub fn error(&self, message: &str) {
        self.print_message(MessageLevel::Error, message);
    }

    /// Print a debug/verbose message.
    ///
    /// Only displayed in verbose mode.
    pub fn debug(&self, message: &str) {
        if self.verbose {
            self.print_message(MessageLevel::Debug, message);
        }
    }

    /// Show a notification at its own level.
    pub fn notify(&self, notification: &Notification) {
        match notification.level {
            NotificationLevel::Success => self.success(&notification.message),
            NotificationLevel::Error => self.error(&notification.message),
            NotificationLevel::Info => self.info(&notification.message),
        }
    }

    /// Print a message with level-appropriate formatting.
    fn print_message(&self, level: MessageLevel, message: &str) {
        let line = self.format_message(level, message);
        if level == MessageLevel::Error {
            eprintln!("{line}");
        } else {
            println!("{line}");
        }
    }

    fn format_message(&self, level: MessageLevel, message: &str) -> String {
        let (prefix, color_code) = match level {
            MessageLevel::Info => ("", ""),
            MessageLevel::Success => ("✓ ", "\x1b[32m"), // Green
            MessageLevel::Warning => ("⚠ ", "\x1b[33m"), // Yellow
            MessageLevel::Error => ("✗ ", "\x1b[31m"),   // Red
            MessageLevel::Debug => ("→ ", "\x1b[36m"),   // Cyan
        };

        if self.colored && !color_code.is_empty() {
            format!("{color_code}{prefix}{message}\x1b[0m")
        } else {
            format!("{prefix}{message}")
        }
    }

    /// Print a section header.
    ///
    /// Suppressed in quiet mode.
    pub fn section(&self, title: &str) {
        if !self.quiet {
            println!("\n{title}");
        }
    }

    /// Print detailed information.
    ///
    /// Only shown in verbose mode.
    pub fn detail(&self, label: &str, value: &str) {
        if self.verbose {
            println!("  {label}: {value}");
        }
    }

    /// Print a numbered list item.
    ///
    /// Suppressed in quiet mode.
    ///
    /// # Arguments
    ///
    /// * `index` - Item index (1-based)
    /// * `message` - Item message
    pub fn list_item(&self, index: usize, message: &str) {
        if !self.quiet {
            println!("  {index}. {message}");
        }
    }

    /// Print the collection as numbered rows.
    ///
    /// Rows are 1-based and follow merge order.
    pub fn entry_list(&self, entries: &[FileEntry]) {
        if entries.is_empty() {
            self.info("No files selected");
            return;
        }

        for (index, entry) in entries.iter().enumerate() {
            self.list_item(index + 1, &entry_row(entry, self.verbose));
        }
    }

    /// Check if output should be shown.
    pub fn should_print(&self) -> bool {
        !self.quiet
    }

    /// Check if verbose output should be shown.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if quiet mode is enabled.
    pub fn is_quiet(&self) -> bool {
        self.quiet
    }
}

impl Default for OutputFormatter {
    fn default() -> Self {
        Self::new(false, false)
    }
}

/// One display row for an entry.
fn entry_row(entry: &FileEntry, verbose: bool) -> String {
    let size = format_file_size(entry.size_bytes);
    if verbose {
        format!("{} ({size}) [{}]", entry.name, entry.id)
    } else {
        format!("{} ({size})", entry.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::FileCollection;
    use crate::io::RawFile;

    fn plain(quiet: bool, verbose: bool) -> OutputFormatter {
        OutputFormatter {
            quiet,
            verbose,
            colored: false,
        }
    }

    #[test]
    fn test_new_formatter() {
        let formatter = OutputFormatter::new(false, false);
        assert!(!formatter.is_quiet());
        assert!(!formatter.is_verbose());
        assert!(formatter.should_print());
    }

    #[test]
    fn test_quiet_formatter() {
        let formatter = OutputFormatter::quiet();
        assert!(formatter.is_quiet());
        assert!(!formatter.should_print());
    }

    #[test]
    fn test_from_config_json_is_quiet() {
        let config = Config {
            json: true,
            ..Default::default()
        };
        assert!(OutputFormatter::from_config(&config).is_quiet());
    }

    #[test]
    fn test_format_message_prefixes() {
        let formatter = plain(false, false);
        assert_eq!(formatter.format_message(MessageLevel::Info, "hi"), "hi");
        assert_eq!(formatter.format_message(MessageLevel::Success, "ok"), "✓ ok");
        assert_eq!(formatter.format_message(MessageLevel::Error, "bad"), "✗ bad");
    }

    #[test]
    fn test_format_message_colored() {
        let formatter = OutputFormatter {
            colored: true,
            ..plain(false, false)
        };
        let line = formatter.format_message(MessageLevel::Warning, "careful");
        assert!(line.starts_with("\x1b[33m"));
        assert!(line.ends_with("\x1b[0m"));
    }

    #[test]
    fn test_notification_level_mapping() {
        assert_eq!(
            MessageLevel::from(NotificationLevel::Success),
            MessageLevel::Success
        );
        assert_eq!(MessageLevel::from(NotificationLevel::Error), MessageLevel::Error);
        assert_eq!(MessageLevel::from(NotificationLevel::Info), MessageLevel::Info);
    }

    #[test]
    fn test_entry_row() {
        let mut files = FileCollection::new();
        files.add(vec![RawFile::pdf("a.pdf", vec![0u8; 2048])]);
        let entry = &files.entries()[0];

        assert_eq!(entry_row(entry, false), "a.pdf (2.00 KB)");
        assert!(entry_row(entry, true).contains(&entry.id.to_string()));
    }

    #[test]
    fn test_notify_and_lists_do_not_panic() {
        let formatter = plain(true, false);
        formatter.notify(&Notification::merged());
        formatter.entry_list(&[]);
    }
}
