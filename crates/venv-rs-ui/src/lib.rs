/// Design System Constants - Dark Slate Glass Theme
pub mod colors {
    use iced::Color;

    pub const GLASS_BASE: Color = Color::from_rgba(0.07, 0.07, 0.08, 0.96);

    pub const BG_CARD: Color = Color::from_rgba(0.14, 0.15, 0.17, 0.92);
    pub const BG_CARD_HOVER: Color = Color::from_rgba(0.55, 0.60, 0.70, 0.18);
    pub const BG_INPUT: Color = Color::from_rgba(0.10, 0.11, 0.13, 0.75);
    pub const BG_SELECTED: Color = Color::from_rgba(0.65, 0.70, 0.80, 0.28);

    pub const ACCENT_PRIMARY: Color = Color::from_rgb(0.65, 0.70, 0.80);
    pub const ACCENT_GLOW: Color = Color::from_rgba(0.65, 0.70, 0.80, 0.35);

    pub const DANGER: Color = Color::from_rgb(0.9, 0.35, 0.35);
    pub const DANGER_GLOW: Color = Color::from_rgba(0.9, 0.35, 0.35, 0.35);

    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.95, 0.95, 0.95);
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.72, 0.74, 0.78);
    pub const TEXT_DISABLED: Color = Color::from_rgb(0.45, 0.46, 0.50);

    pub const GLASS_BORDER: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.20);
}

/// Custom Styles for Iced Widgets
pub mod styles {
    use super::colors;
    use iced::widget::{button, container, text_input};
    use iced::{Background, Border, Color, Shadow, Vector};

    /// Window background
    pub fn glass_base(_theme: &iced::Theme) -> container::Style {
        container::Style {
            background: Some(Background::Color(colors::GLASS_BASE)),
            text_color: Some(colors::TEXT_PRIMARY),
            ..Default::default()
        }
    }

    /// Framed section inside the window
    pub fn section(_theme: &iced::Theme) -> container::Style {
        container::Style {
            background: Some(Background::Color(colors::BG_CARD)),
            border: Border {
                color: colors::GLASS_BORDER,
                width: 1.0,
                radius: 14.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.3),
                offset: Vector::new(0.0, 6.0),
                blur_radius: 18.0,
            },
            ..Default::default()
        }
    }

    pub fn name_input(_theme: &iced::Theme, status: text_input::Status) -> text_input::Style {
        let base = text_input::Style {
            background: Background::Color(colors::BG_INPUT),
            border: Border {
                color: colors::GLASS_BORDER,
                width: 1.0,
                radius: 10.0.into(),
            },
            icon: colors::TEXT_SECONDARY,
            placeholder: colors::TEXT_SECONDARY,
            value: colors::TEXT_PRIMARY,
            selection: colors::ACCENT_PRIMARY,
        };

        match status {
            text_input::Status::Focused { .. } => text_input::Style {
                border: Border {
                    color: colors::ACCENT_PRIMARY,
                    width: 1.5,
                    radius: 10.0.into(),
                },
                ..base
            },
            _ => base,
        }
    }

    pub fn action_button(theme: &iced::Theme, status: button::Status) -> button::Style {
        tinted_button(theme, status, colors::ACCENT_PRIMARY, colors::ACCENT_GLOW)
    }

    pub fn danger_button(theme: &iced::Theme, status: button::Status) -> button::Style {
        tinted_button(theme, status, colors::DANGER, colors::DANGER_GLOW)
    }

    fn tinted_button(
        _theme: &iced::Theme,
        status: button::Status,
        accent: Color,
        glow: Color,
    ) -> button::Style {
        let active = button::Style {
            background: Some(Background::Color(colors::BG_CARD)),
            text_color: colors::TEXT_PRIMARY,
            border: Border {
                color: colors::GLASS_BORDER,
                width: 1.0,
                radius: 10.0.into(),
            },
            shadow: Shadow {
                color: Color::from_rgba(0.0, 0.0, 0.0, 0.2),
                offset: Vector::new(0.0, 3.0),
                blur_radius: 6.0,
            },
            ..Default::default()
        };

        match status {
            button::Status::Active => active,
            button::Status::Hovered => button::Style {
                background: Some(Background::Color(colors::BG_CARD_HOVER)),
                border: Border {
                    color: accent,
                    ..active.border
                },
                shadow: Shadow {
                    color: glow,
                    offset: Vector::new(0.0, 0.0),
                    blur_radius: 14.0,
                },
                ..active
            },
            button::Status::Pressed => button::Style {
                border: Border {
                    color: accent,
                    ..active.border
                },
                shadow: Shadow::default(),
                ..active
            },
            button::Status::Disabled => button::Style {
                text_color: colors::TEXT_DISABLED,
                shadow: Shadow::default(),
                ..active
            },
        }
    }

    /// One row of the environment list
    pub fn list_item(_theme: &iced::Theme, status: button::Status, selected: bool) -> button::Style {
        let background = match (selected, status) {
            (true, _) => Some(Background::Color(colors::BG_SELECTED)),
            (false, button::Status::Hovered) => Some(Background::Color(colors::BG_CARD_HOVER)),
            (false, _) => None,
        };

        button::Style {
            background,
            text_color: if selected {
                colors::TEXT_PRIMARY
            } else {
                colors::TEXT_SECONDARY
            },
            border: Border {
                color: if selected {
                    colors::ACCENT_PRIMARY
                } else {
                    Color::TRANSPARENT
                },
                width: 1.0,
                radius: 8.0.into(),
            },
            ..Default::default()
        }
    }
}
