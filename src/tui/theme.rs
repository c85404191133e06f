//! Form Theme - Visual Design System
//!
//! Slate/amber palette for the two-form client.

use ratatui::style::{Color, Modifier, Style};

/// Form color palette
pub struct FormTheme {
    pub slate_blue: Color,
    pub amber_gold: Color,
    pub fog_white: Color,
    pub dim_gray: Color,

    // Status colors
    pub success_green: Color,
    pub error_red: Color,
}

impl Default for FormTheme {
    fn default() -> Self {
        Self {
            slate_blue: Color::Rgb(94, 129, 172),  // #5E81AC
            amber_gold: Color::Rgb(235, 203, 139), // #EBCB8B
            fog_white: Color::Rgb(229, 233, 240),  // #E5E9F0
            dim_gray: Color::Rgb(120, 120, 120),

            success_green: Color::Rgb(163, 190, 140), // #A3BE8C
            error_red: Color::Rgb(191, 97, 106),      // #BF616A
        }
    }
}

impl FormTheme {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default text style
    pub fn text(&self) -> Style {
        Style::default().fg(self.fog_white)
    }

    /// Dimmed text style (placeholders, hints, inactive tabs)
    pub fn dimmed(&self) -> Style {
        Style::default().fg(self.dim_gray)
    }

    /// Bold header style
    pub fn header(&self) -> Style {
        Style::default()
            .fg(self.slate_blue)
            .add_modifier(Modifier::BOLD)
    }

    /// Accent style (amber)
    pub fn accent(&self) -> Style {
        Style::default().fg(self.amber_gold)
    }

    /// Focused-field style
    pub fn focused(&self) -> Style {
        Style::default()
            .fg(self.amber_gold)
            .add_modifier(Modifier::BOLD)
    }

    /// Success style
    pub fn success(&self) -> Style {
        Style::default().fg(self.success_green)
    }

    /// Error style
    pub fn error(&self) -> Style {
        Style::default()
            .fg(self.error_red)
            .add_modifier(Modifier::BOLD)
    }

    /// Border style for a block, highlighted while its field has focus.
    pub fn border(&self, focused: bool) -> Style {
        if focused {
            Style::default()
                .fg(self.amber_gold)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim_gray)
        }
    }
}

/// UI glyphs used throughout the forms
pub mod glyphs {
    /// Trails the focused field so an empty input stays visible.
    pub const CURSOR: &str = "▏";
    pub const VALID: &str = "✓";
    pub const INVALID: &str = "✗";
    pub const PENDING: &str = "…";
}
