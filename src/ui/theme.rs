use crate::snapshot::ElementStatus;
use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub variable: Color, // Cyan for narrative variable names
    pub value: Color,    // Orange for narrative values
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),   // Blue
    secondary: Color::Rgb(250, 179, 135), // Orange
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for status bar
    variable: Color::Rgb(148, 226, 213),
    value: Color::Rgb(250, 179, 135),
};

/// Bar colour for an element status
pub fn status_color(status: ElementStatus) -> Color {
    match status {
        ElementStatus::Default => DEFAULT_THEME.primary,
        ElementStatus::Comparing => Color::Rgb(249, 226, 175), // Yellow
        ElementStatus::Swapping => DEFAULT_THEME.error,
        ElementStatus::Sorted => DEFAULT_THEME.success,
        ElementStatus::Pivot => Color::Rgb(203, 166, 247), // Mauve
        ElementStatus::Visiting => Color::Rgb(148, 226, 213), // Teal
        ElementStatus::Found => DEFAULT_THEME.success,
        ElementStatus::OutOfBounds => DEFAULT_THEME.comment,
        ElementStatus::Modified => DEFAULT_THEME.secondary,
        ElementStatus::NotFound => DEFAULT_THEME.error,
    }
}
