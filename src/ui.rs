// src/ui.rs
use iced::Color;
use once_cell::sync::Lazy;

pub struct Styles {
    pub bg: Color,
    pub fg: Color,
    pub muted_fg: Color,
    pub card_bg: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub table_header_bg: Color,
    pub grid: Color,
    pub positive: Color,
    pub negative: Color,
    pub error_bg: Color,
    pub error_fg: Color,
}

pub static LIGHT_THEME: Lazy<Styles> = Lazy::new(|| Styles {
    bg: Color::from_rgb8(0xee, 0xf2, 0xff),
    fg: Color::from_rgb8(0x1f, 0x29, 0x37),
    muted_fg: Color::from_rgb8(0x4b, 0x55, 0x63),
    card_bg: Color::WHITE,
    header_bg: Color::WHITE,
    header_fg: Color::from_rgb8(0x4f, 0x46, 0xe5), // indigo
    table_header_bg: Color::from_rgb8(0xf3, 0xf4, 0xf6),
    grid: Color::from_rgb8(0xd1, 0xd5, 0xdb),
    positive: Color::from_rgb8(0x16, 0xa3, 0x4a),
    negative: Color::from_rgb8(0xdc, 0x26, 0x26),
    error_bg: Color::from_rgb8(0xfe, 0xe2, 0xe2),
    error_fg: Color::from_rgb8(0x99, 0x1b, 0x1b),
});

/// Series and slice colours, cycled by position.
pub static SERIES_COLORS: Lazy<[Color; 8]> = Lazy::new(|| {
    [
        Color::from_rgb8(0x00, 0x88, 0xfe),
        Color::from_rgb8(0x00, 0xc4, 0x9f),
        Color::from_rgb8(0xff, 0xbb, 0x28),
        Color::from_rgb8(0xff, 0x80, 0x42),
        Color::from_rgb8(0x88, 0x84, 0xd8),
        Color::from_rgb8(0x82, 0xca, 0x9d),
        Color::from_rgb8(0xff, 0xc6, 0x58),
        Color::from_rgb8(0xff, 0x6b, 0x6b),
    ]
});

pub fn series_color(index: usize) -> Color {
    SERIES_COLORS[index % SERIES_COLORS.len()]
}
