//! Terminal styling.
//!
//! Styling is off when `NO_COLOR` is set or either output stream is not a
//! terminal.

use std::env;
use std::io::{self, IsTerminal};

/// Styles used by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Success,
    Warning,
    Error,
    Muted,
}

impl Style {
    fn code(self) -> &'static str {
        match self {
            Style::Success => "32",
            Style::Warning => "33",
            Style::Error => "31",
            Style::Muted => "2",
        }
    }
}

/// Applies styles when the terminal supports them
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    /// Detect color support from the environment
    pub fn detect() -> Self {
        let enabled = env::var_os("NO_COLOR").is_none()
            && io::stderr().is_terminal()
            && io::stdout().is_terminal();
        Self { enabled }
    }

    pub fn plain() -> Self {
        Self { enabled: false }
    }

    pub fn paint(&self, style: Style, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{}m{}\x1b[0m", style.code(), text)
        } else {
            text.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_palette_leaves_text_alone() {
        assert_eq!(Palette::plain().paint(Style::Error, "boom"), "boom");
    }

    #[test]
    fn test_ansi_palette_wraps_text() {
        assert_eq!(
            Palette { enabled: true }.paint(Style::Success, "ok"),
            "\x1b[32mok\x1b[0m"
        );
    }
}
