//! Error message formatting with actionable suggestions.

use std::error::Error;

use s3store_core::error::StoreError;

use super::colors::{Palette, Style};

/// Error formatter with suggestions
pub struct ErrorFormatter {
    palette: Palette,
}

impl ErrorFormatter {
    /// Create a new error formatter
    pub fn new() -> Self {
        Self::with_palette(Palette::detect())
    }

    pub fn with_palette(palette: Palette) -> Self {
        Self { palette }
    }

    /// Format an error with context and suggestions
    pub fn format_error(&self, error: &StoreError) -> String {
        let mut output = String::new();

        output.push_str(&self.palette.paint(Style::Error, "error"));
        output.push_str(": ");
        output.push_str(&error.to_string());
        output.push('\n');

        if let StoreError::ConfigParse { line, column, .. } = error {
            if *line > 0 {
                output.push_str(&format!(
                    "{} line {}, column {}\n",
                    self.palette.paint(Style::Muted, "-->"),
                    line,
                    column
                ));
            }
        }

        if let Some(suggestion) = error.suggestion() {
            output.push('\n');
            output.push_str(&self.palette.paint(Style::Muted, "help"));
            output.push_str(": ");
            output.push_str(suggestion);
            output.push('\n');
        }

        if error.is_recoverable() {
            output.push_str(&self.palette.paint(Style::Muted, "note"));
            output.push_str(": this failure may be temporary, retrying can succeed\n");
        }

        let mut source = error.source();
        while let Some(err) = source {
            output.push('\n');
            output.push_str(&self.palette.paint(Style::Muted, "caused by"));
            output.push_str(": ");
            output.push_str(&err.to_string());
            source = err.source();
        }

        output
    }
}

impl Default for ErrorFormatter {
    fn default() -> Self {
        Self::new()
    }
}
