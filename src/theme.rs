use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,
    pub accent: Color,

    // Score tiers, shared by the bar fill and the score label
    pub score_high: Color,
    pub score_medium: Color,
    pub score_low: Color,

    // Specific components
    pub block_title: Style,
    pub list_bullet: Style,
    pub field_label: Style,
    pub placeholder: Style,
    pub error: Style,
    pub history_type: Style,
    pub history_time: Style,
    pub tab_active: Style,
    pub footer: Style,
    pub popup_title: Style,
    pub popup_border: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            focus_border: Color::Cyan,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,
            accent: Color::Rgb(99, 102, 241),

            score_high: Color::Rgb(16, 185, 129),
            score_medium: Color::Rgb(245, 158, 11),
            score_low: Color::Rgb(239, 68, 68),

            block_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            list_bullet: Style::default().fg(Color::Rgb(99, 102, 241)),
            field_label: Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
            placeholder: Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            error: Style::default().fg(Color::Rgb(239, 68, 68)).add_modifier(Modifier::BOLD),
            history_type: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            history_time: Style::default().fg(Color::Magenta),
            tab_active: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            popup_title: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
        }
    }
}
