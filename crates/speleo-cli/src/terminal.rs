//! Terminal styling and color utilities.
//!
//! ANSI escape code definitions and capability detection used by the
//! enhanced output format.

use speleo_lib::Color;

/// ANSI escape codes for text styling and colors.
pub mod colors {
    /// Reset all styling.
    pub const RESET: &str = "\x1b[0m";

    /// Bright bold white for station names.
    pub const WHITE_BOLD: &str = "\x1b[1;97m";
    /// Gray for survey names and decorations.
    pub const GRAY: &str = "\x1b[90m";
    /// Cyan for distances and coordinates.
    pub const CYAN: &str = "\x1b[36m";
    /// Green for fully resolved surveys.
    pub const GREEN: &str = "\x1b[32m";
    /// Orange (256-color) for orphaned shots.
    pub const ORANGE: &str = "\x1b[38;5;208m";
    /// Red for isolated surveys.
    pub const RED: &str = "\x1b[31m";
}

/// A collection of resolved color codes, either actual ANSI sequences
/// or empty strings when color is disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorPalette {
    pub reset: &'static str,
    pub white_bold: &'static str,
    pub gray: &'static str,
    pub cyan: &'static str,
    pub green: &'static str,
    pub orange: &'static str,
    pub red: &'static str,
    /// Whether 24-bit swatches may be emitted for segment colors.
    pub truecolor: bool,
}

impl ColorPalette {
    /// Create a palette with actual ANSI color codes.
    #[must_use]
    pub const fn colored() -> Self {
        Self {
            reset: colors::RESET,
            white_bold: colors::WHITE_BOLD,
            gray: colors::GRAY,
            cyan: colors::CYAN,
            green: colors::GREEN,
            orange: colors::ORANGE,
            red: colors::RED,
            truecolor: true,
        }
    }

    /// Create a palette with no colors (empty strings).
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            reset: "",
            white_bold: "",
            gray: "",
            cyan: "",
            green: "",
            orange: "",
            red: "",
            truecolor: false,
        }
    }

    /// Create a palette based on terminal capabilities.
    #[must_use]
    pub fn detect() -> Self {
        if supports_color() {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    /// Two-cell swatch previewing `color`, or its hex literal when the
    /// terminal cannot show it.
    #[must_use]
    pub fn swatch(&self, color: Color) -> String {
        if !self.truecolor {
            return color.to_hex();
        }
        let channel = |v: f64| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let block = if supports_unicode() { "██" } else { "##" };
        format!(
            "\x1b[38;2;{};{};{}m{block}{} {}",
            channel(color.r),
            channel(color.g),
            channel(color.b),
            self.reset,
            color.to_hex()
        )
    }
}

impl Default for ColorPalette {
    fn default() -> Self {
        Self::detect()
    }
}

/// Check if the terminal supports ANSI color codes.
///
/// Respects `NO_COLOR` (https://no-color.org/) and `TERM=dumb`.
#[must_use]
pub fn supports_color() -> bool {
    if std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if let Ok(term) = std::env::var("TERM") {
        if term.eq_ignore_ascii_case("dumb") {
            return false;
        }
    }
    true
}

/// Check for explicit Unicode support hints in `LANG` / `LC_ALL`.
#[must_use]
pub fn supports_unicode() -> bool {
    ["LC_ALL", "LANG"].iter().any(|key| {
        std::env::var(key)
            .map(|value| value.to_uppercase().contains("UTF"))
            .unwrap_or(false)
    })
}
