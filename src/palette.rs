//! Sales-assistant color palette and semantic roles.

use ratatui::style::Color;

pub const BRAND_BLUE_RGB: (u8, u8, u8) = (53, 120, 229); // #3578E5
pub const BRAND_SKY_RGB: (u8, u8, u8) = (106, 174, 242);
pub const BRAND_INK_RGB: (u8, u8, u8) = (11, 21, 38);
pub const BRAND_SLATE_RGB: (u8, u8, u8) = (18, 28, 46);
pub const BRAND_RED_RGB: (u8, u8, u8) = (226, 80, 96);
pub const BRAND_AMBER_RGB: (u8, u8, u8) = (240, 180, 80);

pub const BRAND_BLUE: Color = Color::Rgb(BRAND_BLUE_RGB.0, BRAND_BLUE_RGB.1, BRAND_BLUE_RGB.2);
pub const BRAND_SKY: Color = Color::Rgb(BRAND_SKY_RGB.0, BRAND_SKY_RGB.1, BRAND_SKY_RGB.2);
pub const BRAND_INK: Color = Color::Rgb(BRAND_INK_RGB.0, BRAND_INK_RGB.1, BRAND_INK_RGB.2);
pub const BRAND_SLATE: Color =
    Color::Rgb(BRAND_SLATE_RGB.0, BRAND_SLATE_RGB.1, BRAND_SLATE_RGB.2);
pub const BRAND_RED: Color = Color::Rgb(BRAND_RED_RGB.0, BRAND_RED_RGB.1, BRAND_RED_RGB.2);
pub const BRAND_AMBER: Color =
    Color::Rgb(BRAND_AMBER_RGB.0, BRAND_AMBER_RGB.1, BRAND_AMBER_RGB.2);

pub const TEXT_PRIMARY: Color = Color::White;
pub const TEXT_BODY: Color = Color::Rgb(226, 232, 240);
pub const TEXT_SECONDARY: Color = Color::Rgb(176, 190, 210);
pub const TEXT_HINT: Color = Color::Rgb(140, 158, 184);
pub const TEXT_MUTED: Color = Color::DarkGray;
pub const TEXT_DIM: Color = Color::Gray;

pub const STATUS_SUCCESS: Color = BRAND_SKY;
pub const STATUS_WARNING: Color = BRAND_AMBER;
pub const STATUS_ERROR: Color = BRAND_RED;

pub const BORDER_COLOR: Color = BRAND_BLUE;
pub const FOOTER_HINT: Color = TEXT_HINT;

pub const SELECTION_BG: Color = Color::Rgb(26, 44, 74);
pub const SELECTION_TEXT: Color = Color::White;
pub const COMPOSER_BG: Color = BRAND_SLATE;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiTheme {
    pub name: &'static str,
    pub composer_bg: Color,
    pub selection_bg: Color,
    pub header_bg: Color,
}

pub fn ui_theme(name: &str) -> UiTheme {
    match name.to_ascii_lowercase().as_str() {
        "dark" => UiTheme {
            name: "dark",
            composer_bg: BRAND_INK,
            selection_bg: Color::Rgb(30, 52, 92),
            header_bg: BRAND_INK,
        },
        "light" => UiTheme {
            name: "light",
            composer_bg: Color::Rgb(26, 38, 58),
            selection_bg: Color::Rgb(38, 64, 112),
            header_bg: BRAND_SLATE,
        },
        _ => UiTheme {
            name: "default",
            composer_bg: COMPOSER_BG,
            selection_bg: SELECTION_BG,
            header_bg: BRAND_INK,
        },
    }
}
