//! Color palettes and ANSI escape sequence generation.
//!
//! Each persisted [`Theme`] maps to a fixed [`Palette`] of hex colors. The
//! helpers turn hex colors into 24-bit ANSI sequences.
//!
//! # Example
//!
//! ```rust
//! use bookfinder::storage::Theme;
//! use bookfinder::ui::Palette;
//!
//! let palette = Palette::for_theme(Theme::Dark);
//! let line = format!("{}{}Title{}", Palette::bold(), Palette::fg(palette.header), Palette::reset());
//! assert!(line.ends_with("\u{1b}[0m"));
//! ```

use crate::storage::Theme;

/// Colors for every styled element of a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub header: &'static str,
    pub text: &'static str,
    pub dim: &'static str,
    pub border: &'static str,
    pub accent: &'static str,
    pub chip_fg: &'static str,
    pub chip_bg: &'static str,
    pub error: &'static str,
    pub favorite: &'static str,
}

const DARK: Palette = Palette {
    header: "#cdd6f4",
    text: "#cdd6f4",
    dim: "#6c7086",
    border: "#45475a",
    accent: "#89b4fa",
    chip_fg: "#1e1e2e",
    chip_bg: "#f9e2af",
    error: "#f38ba8",
    favorite: "#f5c2e7",
};

const LIGHT: Palette = Palette {
    header: "#4c4f69",
    text: "#4c4f69",
    dim: "#8c8fa1",
    border: "#bcc0cc",
    accent: "#1e66f5",
    chip_fg: "#eff1f5",
    chip_bg: "#df8e1d",
    error: "#d20f39",
    favorite: "#ea76cb",
};

impl Palette {
    /// Palette for a persisted theme preference.
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }

    /// Parses `#rrggbb`; anything malformed renders white.
    fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
        let hex = hex.trim_start_matches('#').trim();

        if hex.len() != 6 || !hex.is_ascii() {
            return (255, 255, 255);
        }

        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);

        (r, g, b)
    }

    /// 24-bit foreground color sequence.
    #[must_use]
    pub fn fg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[38;2;{r};{g};{b}m")
    }

    /// 24-bit background color sequence.
    #[must_use]
    pub fn bg(hex: &str) -> String {
        let (r, g, b) = Self::hex_to_rgb(hex);
        format!("\u{001b}[48;2;{r};{g};{b}m")
    }

    #[must_use]
    pub const fn bold() -> &'static str {
        "\u{001b}[1m"
    }

    #[must_use]
    pub const fn reset() -> &'static str {
        "\u{001b}[0m"
    }
}
