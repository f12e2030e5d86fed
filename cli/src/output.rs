//! Terminal writer for the admin screens.
//!
//! Screen content (title, table, footer) goes to stdout. Warnings and
//! failures go to stderr, so `kong-admin users > users.txt` captures only
//! the screen.

use console::{Term, style};
use std::fmt::Display;

pub struct Output {
    screen: Term,
    diagnostics: Term,
}

impl Output {
    pub fn new() -> Self {
        Self {
            screen: Term::stdout(),
            diagnostics: Term::stderr(),
        }
    }

    /// Screen title, bold cyan.
    pub fn title(&self, title: impl Display) {
        drop(
            self.screen
                .write_line(&style(title).bold().cyan().to_string()),
        );
    }

    /// Screen body, written as-is.
    pub fn body(&self, body: impl Display) {
        drop(self.screen.write_line(&body.to_string()));
    }

    /// Secondary screen text such as the footer or an empty-state hint.
    pub fn note(&self, note: impl Display) {
        drop(self.screen.write_line(&style(note).dim().to_string()));
    }

    pub fn warning(&self, message: impl Display) {
        drop(
            self.diagnostics
                .write_line(&format!("{} {message}", style("⚠").yellow().bold())),
        );
    }

    /// A failure headline followed by an optional dimmed detail line.
    pub fn failure(&self, headline: impl Display, detail: Option<&str>) {
        drop(
            self.diagnostics
                .write_line(&format!("{} {headline}", style("✗").red().bold())),
        );
        if let Some(detail) = detail {
            drop(
                self.diagnostics
                    .write_line(&format!("  {}", style(detail).dim())),
            );
        }
    }
}
