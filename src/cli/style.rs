//! Terminal styling helpers
//!
//! Thin extension trait over `owo-colors`; output goes through `anstream`
//! so colors are stripped automatically when not writing to a terminal.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Success glyph
pub const CHECK: &str = "✓";

/// Semantic styling shortcuts used across the CLI
pub trait Stylize: Display {
    /// Bold, for headings and key names
    fn emphasis(&self) -> String {
        format!("{}", self.bold())
    }

    /// Dimmed, for secondary detail
    fn muted(&self) -> String {
        format!("{}", self.dimmed())
    }

    /// Cyan, for branch and alias names
    fn accent(&self) -> String {
        format!("{}", self.cyan())
    }

    /// Green, for success summaries
    fn success(&self) -> String {
        format!("{}", self.green())
    }

    /// Yellow, for recoverable conditions
    fn warn(&self) -> String {
        format!("{}", self.yellow())
    }

    /// Red, for failures
    fn error(&self) -> String {
        format!("{}", self.red())
    }
}

impl<T: Display> Stylize for T {}

/// Green check glyph
pub fn check() -> String {
    format!("{}", CHECK.green())
}
