//! Terminal styling helpers

use owo_colors::{OwoColorize, Style};

/// Semantic styles for CLI output
pub trait Stylize {
    /// Positive outcome
    fn success(&self) -> String;
    /// Negative outcome
    fn failure(&self) -> String;
    /// Outcome that could not be determined
    fn warning(&self) -> String;
    /// Secondary text
    fn muted(&self) -> String;
    /// Emphasized text
    fn emphasis(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn success(&self) -> String {
        self.style(Style::new().green().bold()).to_string()
    }

    fn failure(&self) -> String {
        self.style(Style::new().red().bold()).to_string()
    }

    fn warning(&self) -> String {
        self.style(Style::new().yellow()).to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }
}
