// src/ui.rs
use iced::widget::{button, container};
use iced::{Background, Color, Theme, Vector};
use once_cell::sync::Lazy;

pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub panel_bg: Color,
    pub item_bg: Color,
    pub item_border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub accent: Color,
    pub accent_hover: Color,
    pub on_accent: Color,
    pub success: Color,
    pub error: Color,
    pub note_bg: Color,
    pub note_fg: Color,
}

pub static DARK_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(0.07, 0.07, 0.08),
    fg: Color::from_rgb(0.95, 0.95, 0.95),
    muted: Color::from_rgb(0.6, 0.6, 0.62),
    panel_bg: Color::from_rgb(0.13, 0.13, 0.15),
    item_bg: Color::from_rgb(0.2, 0.09, 0.09),
    item_border: Color::from_rgb(0.45, 0.15, 0.15),
    header_bg: Color::from_rgb(0.2, 0.2, 0.2),
    header_fg: Color::from_rgb(1.0, 1.0, 1.0),
    accent: Color::from_rgb(0.863, 0.149, 0.149), // #dc2626
    accent_hover: Color::from_rgb(0.725, 0.11, 0.11), // #b91c1c
    on_accent: Color::WHITE,
    success: Color::from_rgb(0.2, 0.75, 0.4),
    error: Color::from_rgb(0.97, 0.44, 0.44),
    note_bg: Color::from_rgb(0.25, 0.22, 0.08),
    note_fg: Color::from_rgb(0.98, 0.86, 0.45),
});

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb(1.0, 0.969, 0.929), // #fff7ed
    fg: Color::from_rgb(0.122, 0.161, 0.216), // #1f2937
    muted: Color::from_rgb(0.42, 0.447, 0.502),
    panel_bg: Color::WHITE,
    item_bg: Color::from_rgb(0.996, 0.949, 0.949), // #fef2f2
    item_border: Color::from_rgb(0.996, 0.792, 0.792), // #fecaca
    header_bg: Color::from_rgb(0.8784, 0.8784, 0.8784), // #e0e0e0
    header_fg: Color::from_rgb(0.0, 0.0, 0.0),
    accent: Color::from_rgb(0.863, 0.149, 0.149),
    accent_hover: Color::from_rgb(0.725, 0.11, 0.11),
    on_accent: Color::WHITE,
    success: Color::from_rgb(0.086, 0.639, 0.29),
    error: Color::from_rgb(0.863, 0.149, 0.149),
    note_bg: Color::from_rgb(0.996, 0.988, 0.91), // #fefce8
    note_fg: Color::from_rgb(0.522, 0.302, 0.055), // #854d0e
});

pub fn styles(dark: bool) -> &'static Styles {
    if dark {
        &DARK_THEME
    } else {
        &LIGHT_THEME
    }
}

pub struct ContainerStyle {
    pub bg: Color,
    pub fg: Color,
    pub border: Color,
    pub radius: f32,
}

impl ContainerStyle {
    pub fn flat(bg: Color, fg: Color) -> iced::theme::Container {
        iced::theme::Container::Custom(Box::new(ContainerStyle {
            bg,
            fg,
            border: Color::TRANSPARENT,
            radius: 0.0,
        }))
    }

    pub fn card(bg: Color, fg: Color, border: Color) -> iced::theme::Container {
        iced::theme::Container::Custom(Box::new(ContainerStyle {
            bg,
            fg,
            border,
            radius: 8.0,
        }))
    }
}

impl container::StyleSheet for ContainerStyle {
    type Style = Theme;

    fn appearance(&self, _style: &Self::Style) -> container::Appearance {
        container::Appearance {
            text_color: Some(self.fg),
            background: Some(Background::Color(self.bg)),
            border_radius: self.radius.into(),
            border_width: if self.border == Color::TRANSPARENT { 0.0 } else { 1.0 },
            border_color: self.border,
        }
    }
}

pub struct ButtonStyle {
    pub bg: Color,
    pub fg: Color,
    pub hover_bg: Color,
}

impl ButtonStyle {
    pub fn custom(bg: Color, fg: Color, hover_bg: Color) -> iced::theme::Button {
        iced::theme::Button::Custom(Box::new(ButtonStyle { bg, fg, hover_bg }))
    }
}

impl button::StyleSheet for ButtonStyle {
    type Style = Theme;

    fn active(&self, _style: &Self::Style) -> button::Appearance {
        button::Appearance {
            shadow_offset: Vector::new(0.0, 0.0),
            background: Some(Background::Color(self.bg)),
            border_radius: 4.0.into(),
            text_color: self.fg,
            ..button::Appearance::default()
        }
    }

    fn hovered(&self, style: &Self::Style) -> button::Appearance {
        button::Appearance {
            background: Some(Background::Color(self.hover_bg)),
            ..self.active(style)
        }
    }

    fn disabled(&self, style: &Self::Style) -> button::Appearance {
        let active = self.active(style);
        button::Appearance {
            background: Some(Background::Color(Color { a: 0.5, ..self.bg })),
            text_color: Color { a: 0.7, ..self.fg },
            ..active
        }
    }
}
