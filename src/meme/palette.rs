use crate::meme::model::Color;

pub const TEXT_PALETTE: [Color; 6] = [
    Color::rgb(0xFF, 0xFF, 0xFF),
    Color::rgb(0xFF, 0xD2, 0x3F),
    Color::rgb(0x00, 0xF5, 0xD4),
    Color::rgb(0xFF, 0x5D, 0x8F),
    Color::rgb(0x0B, 0x0F, 0x1F),
    Color::rgb(0xF9, 0xF5, 0xE3),
];

pub const STROKE_PALETTE: [Color; 3] = [
    Color::rgb(0x00, 0x00, 0x00),
    Color::rgb(0x20, 0x21, 0x24),
    Color::rgb(0xFF, 0xFF, 0xFF),
];

pub const BACKGROUND_PALETTE: [Color; 6] = [
    Color::rgb(0xF8, 0xF4, 0xF0),
    Color::rgb(0x0E, 0x0F, 0x12),
    Color::rgb(0xFF, 0xED, 0xE4),
    Color::rgb(0xE7, 0xF0, 0xFF),
    Color::rgb(0xFE, 0xF6, 0xC9),
    Color::rgb(0xEA, 0xF8, 0xF3),
];

pub const SHAPE_PALETTE: [Color; 6] = [
    Color::rgb(0xFF, 0xFF, 0xFF),
    Color::rgb(0x0B, 0x0F, 0x1F),
    Color::rgb(0xFF, 0x6B, 0x35),
    Color::rgb(0xFF, 0xD2, 0x3F),
    Color::rgb(0x00, 0xF5, 0xD4),
    Color::rgb(0x9B, 0x5D, 0xE5),
];

pub const WHITE: Color = Color::rgb(0xFF, 0xFF, 0xFF);
pub const BLACK: Color = Color::rgb(0x00, 0x00, 0x00);
pub const INK: Color = Color::rgb(0x0B, 0x0F, 0x1F);
