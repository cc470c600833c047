//! Catppuccin Mocha color palette for the TUI.

use ratatui::style::Color;

/// Theme color palette.
#[derive(Debug, Clone)]
pub struct Theme {
    // Backgrounds
    pub base: Color,
    pub surface: Color,

    // Foregrounds
    pub text: Color,
    pub muted: Color,

    // Accents
    pub primary: Color,
    pub success: Color,

    // Message attribution
    pub app: Color,
    pub user: Color,

    // Borders
    pub border: Color,
    pub border_focused: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

impl Theme {
    /// Catppuccin Mocha theme (default dark theme).
    pub fn mocha() -> Self {
        Self {
            base: Color::Rgb(30, 30, 46),
            surface: Color::Rgb(49, 50, 68),
            text: Color::Rgb(205, 214, 244),
            muted: Color::Rgb(108, 112, 134),
            primary: Color::Rgb(137, 180, 250),
            success: Color::Rgb(166, 227, 161),
            app: Color::Rgb(137, 180, 250),
            user: Color::Rgb(166, 227, 161),
            border: Color::Rgb(69, 71, 90),
            border_focused: Color::Rgb(137, 180, 250),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_mocha() {
        let theme = Theme::default();
        assert_eq!(theme.base, Color::Rgb(30, 30, 46));
        assert_ne!(theme.text, theme.muted);
    }
}
