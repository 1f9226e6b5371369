//! Theme support for the wizard
//!
//! Provides Catppuccin and Nord color themes.

use ratatui::style::Color;

use crate::config::TuiTheme;

/// A complete color theme for the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub name: &'static str,
    // Base colors
    pub base: Color,     // Main background
    pub surface0: Color, // Slightly elevated surface
    pub surface1: Color, // Borders, separators
    // Text colors
    pub text: Color,     // Primary text
    pub subtext0: Color, // Secondary/dimmed text
    // Accent colors
    pub blue: Color,   // Status lines, highlights
    pub green: Color,  // Success
    pub yellow: Color, // Warnings, prompts
    pub red: Color,    // Errors
    pub mauve: Color,  // Titles
}

impl TuiTheme {
    /// Get the theme for this variant
    pub fn theme(&self) -> Theme {
        match self {
            Self::CatppuccinMocha => CATPPUCCIN_MOCHA,
            Self::CatppuccinLatte => CATPPUCCIN_LATTE,
            Self::Nord => NORD,
        }
    }

    /// Cycle to the next theme
    pub fn next(&self) -> Self {
        match self {
            Self::CatppuccinMocha => Self::CatppuccinLatte,
            Self::CatppuccinLatte => Self::Nord,
            Self::Nord => Self::CatppuccinMocha,
        }
    }
}

// ============================================================================
// Theme Definitions
// ============================================================================

/// Catppuccin Mocha - Dark theme with warm pastels
pub const CATPPUCCIN_MOCHA: Theme = Theme {
    name: "Catppuccin Mocha",
    base: Color::Rgb(30, 30, 46),
    surface0: Color::Rgb(49, 50, 68),
    surface1: Color::Rgb(69, 71, 90),
    text: Color::Rgb(205, 214, 244),
    subtext0: Color::Rgb(166, 173, 200),
    blue: Color::Rgb(137, 180, 250),
    green: Color::Rgb(166, 227, 161),
    yellow: Color::Rgb(249, 226, 175),
    red: Color::Rgb(243, 139, 168),
    mauve: Color::Rgb(203, 166, 247),
};

/// Catppuccin Latte - Light theme with warm pastels
pub const CATPPUCCIN_LATTE: Theme = Theme {
    name: "Catppuccin Latte",
    base: Color::Rgb(239, 241, 245),
    surface0: Color::Rgb(220, 224, 232),
    surface1: Color::Rgb(188, 192, 204),
    text: Color::Rgb(76, 79, 105),
    subtext0: Color::Rgb(108, 111, 133),
    blue: Color::Rgb(30, 102, 245),
    green: Color::Rgb(64, 160, 43),
    yellow: Color::Rgb(223, 142, 29),
    red: Color::Rgb(210, 15, 57),
    mauve: Color::Rgb(136, 57, 239),
};

/// Nord - Arctic, bluish color palette
pub const NORD: Theme = Theme {
    name: "Nord",
    base: Color::Rgb(46, 52, 64),
    surface0: Color::Rgb(59, 66, 82),
    surface1: Color::Rgb(76, 86, 106),
    text: Color::Rgb(236, 239, 244),
    subtext0: Color::Rgb(216, 222, 233),
    blue: Color::Rgb(136, 192, 208),
    green: Color::Rgb(163, 190, 140),
    yellow: Color::Rgb(235, 203, 139),
    red: Color::Rgb(191, 97, 106),
    mauve: Color::Rgb(180, 142, 173),
};
