use ratatui::style::Color;

pub struct Theme {
    pub fg: Color,
    pub primary: Color,   // Blue
    pub secondary: Color, // Orange
    pub comment: Color,   // Grey
    pub success: Color,   // Green
    pub error: Color,     // Red
    pub warning: Color,   // Yellow
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub border_focused: Color,
    pub border_normal: Color,
    pub current_line_bg: Color,
    pub type_name: Color, // Cyan for owners and kinds
    pub garbage: Color,   // Mauve for gc-marked blocks
}

pub const DEFAULT_THEME: Theme = Theme {
    fg: Color::Rgb(205, 214, 244),
    primary: Color::Rgb(137, 180, 250),
    secondary: Color::Rgb(250, 179, 135),
    comment: Color::Rgb(108, 112, 134),
    success: Color::Rgb(166, 227, 161),
    error: Color::Rgb(243, 139, 168),
    warning: Color::Rgb(249, 226, 175),
    keyword: Color::Rgb(137, 180, 250),  // Blue for keywords
    string: Color::Rgb(250, 179, 135),   // Orange for strings
    number: Color::Rgb(250, 179, 135),   // Orange for numbers
    function: Color::Rgb(249, 226, 175), // Yellow for functions
    border_focused: Color::Rgb(249, 226, 175), // Yellow border for focus
    border_normal: Color::Rgb(108, 112, 134),  // Grey border for normal
    current_line_bg: Color::Rgb(50, 50, 70),   // Slightly lighter BG for current line
    type_name: Color::Rgb(148, 226, 213),
    garbage: Color::Rgb(203, 166, 247),
};
