//! Terminal output formatting.
//!
//! Status lines go to stderr so that stdout only carries command results
//! (values, tokens and keys) and can be piped.

pub mod colors;
pub mod errors;

use colors::{Palette, Style};

/// Output handler for consistent terminal formatting
pub struct OutputHandler {
    palette: Palette,
}

impl OutputHandler {
    /// Create a new output handler
    pub fn new() -> Self {
        Self {
            palette: Palette::detect(),
        }
    }

    /// Print a command result
    pub fn data(&self, text: &str) {
        println!("{}", text);
    }

    /// Print an info message
    pub fn info(&self, message: &str) {
        eprintln!("{}", self.palette.paint(Style::Muted, message));
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        eprintln!("{} {}", self.palette.paint(Style::Success, "✓"), message);
    }

    /// Print a warning message
    pub fn warn(&self, message: &str) {
        eprintln!("{} {}", self.palette.paint(Style::Warning, "⚠"), message);
    }
}

impl Default for OutputHandler {
    fn default() -> Self {
        Self::new()
    }
}
