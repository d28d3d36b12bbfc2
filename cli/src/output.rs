//! Terminal output utilities for styled CLI output.

use std::fmt::Display;

use chaos_business::{Notice, NoticeLevel};
use console::{Term, style};

/// Terminal output helper for consistent styled output.
pub struct Output {
    term: Term,
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}

impl Output {
    /// Create a new output helper writing to stdout.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
        }
    }

    fn line(&self, text: &str) {
        // A closed stdout is not worth failing a command over.
        drop(self.term.write_line(text));
    }

    pub fn success(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✓").green().bold()));
    }

    pub fn error(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("✗").red().bold()));
    }

    pub fn warning(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("⚠").yellow().bold()));
    }

    pub fn info(&self, message: impl Display) {
        self.line(&format!("{} {message}", style("ℹ").blue().bold()));
    }

    /// Print a plain message without any prefix.
    pub fn print(&self, message: impl Display) {
        self.line(&message.to_string());
    }

    pub fn newline(&self) {
        self.line("");
    }

    pub fn header(&self, message: impl Display) {
        self.line(&style(message).bold().cyan().to_string());
    }

    pub fn dim(&self, message: impl Display) {
        self.line(&style(message).dim().to_string());
    }

    /// Prints a core notice with the matching prefix.
    pub fn notice(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => self.success(&notice.message),
            NoticeLevel::Error => self.error(&notice.message),
            NoticeLevel::Info => self.info(&notice.message),
        }
    }

    /// Print the paging summary under a table.
    pub fn page_summary(&self, page: u32, pages: u64, total: u64, fresh: bool) {
        let total = if fresh {
            style(format!("{total} user(s)")).cyan()
        } else {
            style(format!("~{total} user(s)")).dim()
        };
        self.line(&format!(
            "\n{} {} of {} · {total}",
            style("Page").bold(),
            style(page).cyan().bold(),
            pages.max(1)
        ));
    }
}
