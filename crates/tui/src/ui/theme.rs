use ratatui::style::Color;

pub struct Theme {
    pub text: Color,
    pub text_muted: Color,
    pub accent: Color,
    pub positive: Color,
    pub error: Color,
    pub border: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            text: Color::Gray,
            text_muted: Color::DarkGray,
            accent: Color::Cyan,
            positive: Color::Green,
            error: Color::Red,
            border: Color::DarkGray,
        }
    }
}
