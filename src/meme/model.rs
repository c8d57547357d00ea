use crate::meme::ids::LayerId;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_SCALE: f32 = 0.3;
pub const MAX_SCALE: f32 = 6.0;

/// Placement of a layer relative to the canvas anchor (its centre).
///
/// `x`/`y` are pixel offsets from the anchor, `scale` is a multiplier kept in
/// `[MIN_SCALE, MAX_SCALE]` and `rotation` is in radians with no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
        rotation: 0.0,
    };

    pub const fn offset(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            scale: 1.0,
            rotation: 0.0,
        }
    }

    /// Infinite scales saturate at the bounds; NaN falls back to 1.
    pub fn clamp_scale(scale: f32) -> f32 {
        if scale.is_nan() {
            1.0
        } else {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        }
    }

    /// Replaces non-finite fields and clamps the scale.
    pub fn sanitized(self) -> Self {
        let finite_or_zero = |v: f32| if v.is_finite() { v } else { 0.0 };
        Self {
            x: finite_or_zero(self.x),
            y: finite_or_zero(self.y),
            scale: Self::clamp_scale(self.scale),
            rotation: finite_or_zero(self.rotation),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Parses `#RRGGBB`, `#RRGGBBAA` or `transparent`.
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        if value.eq_ignore_ascii_case("transparent") {
            return Some(Self::TRANSPARENT);
        }
        let hex = value.strip_prefix('#')?;
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::TRANSPARENT {
            f.write_str("transparent")
        } else if self.a == 255 {
            write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02X}{:02X}{:02X}{:02X}",
                self.r, self.g, self.b, self.a
            )
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorParseError(String);

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid color '{}'", self.0)
    }
}

impl std::error::Error for ColorParseError {}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or(ColorParseError(value))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn is_measured(self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemeFont {
    Impact,
    Bold,
    Comic,
}

impl MemeFont {
    pub const ALL: [Self; 3] = [Self::Impact, Self::Bold, Self::Comic];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    pub text: String,
    pub font: MemeFont,
    pub font_size: u32,
    pub color: Color,
    pub stroke_color: Color,
    pub stroke_width: u32,
    pub align: TextAlign,
    pub opacity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Bubble,
    Arrow,
    Box,
}

impl ShapeKind {
    pub fn default_size(self) -> Size {
        match self {
            Self::Bubble => Size::new(200.0, 140.0),
            Self::Arrow => Size::new(180.0, 64.0),
            Self::Box => Size::new(200.0, 120.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapePattern {
    Solid,
    Dots,
    Stripes,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeLayer {
    pub shape: ShapeKind,
    pub pattern: ShapePattern,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: u32,
    pub opacity: f32,
    pub size: Size,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    Confetti,
    Blur,
    Pixelate,
}

/// One particle of a confetti effect, in the effect's local pixel space.
/// `rotation` is in degrees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfettiPiece {
    pub id: String,
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub rotation: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectLayer {
    pub effect: EffectKind,
    pub opacity: f32,
    pub size: u32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub confetti: Vec<ConfettiPiece>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerKind {
    Text(TextLayer),
    Sticker(TextLayer),
    Shape(ShapeLayer),
    Effect(EffectLayer),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Text,
    Sticker,
    Shape,
    Effect,
}

impl LayerKind {
    pub fn layer_type(&self) -> LayerType {
        match self {
            Self::Text(_) => LayerType::Text,
            Self::Sticker(_) => LayerType::Sticker,
            Self::Shape(_) => LayerType::Shape,
            Self::Effect(_) => LayerType::Effect,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub transform: Transform,
    #[serde(flatten)]
    pub kind: LayerKind,
}

impl Layer {
    pub fn layer_type(&self) -> LayerType {
        self.kind.layer_type()
    }

    pub fn opacity(&self) -> f32 {
        match &self.kind {
            LayerKind::Text(text) | LayerKind::Sticker(text) => text.opacity,
            LayerKind::Shape(shape) => shape.opacity,
            LayerKind::Effect(effect) => effect.opacity,
        }
    }

    pub fn opacity_mut(&mut self) -> &mut f32 {
        match &mut self.kind {
            LayerKind::Text(text) | LayerKind::Sticker(text) => &mut text.opacity,
            LayerKind::Shape(shape) => &mut shape.opacity,
            LayerKind::Effect(effect) => &mut effect.opacity,
        }
    }

    pub fn as_text(&self) -> Option<&TextLayer> {
        match &self.kind {
            LayerKind::Text(text) | LayerKind::Sticker(text) => Some(text),
            _ => None,
        }
    }
}

/// Custom image background. The `original_*` fields survive crops so the
/// crop can be reverted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBackground {
    pub uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub original_uri: String,
    pub original_width: Option<u32>,
    pub original_height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Background {
    Color { color: Color },
    Template {
        #[serde(rename = "templateId")]
        template_id: String,
    },
    Image(ImageBackground),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitized_clamps_scale_and_drops_non_finite_fields() {
        let t = Transform {
            x: f32::NAN,
            y: 12.0,
            scale: 40.0,
            rotation: f32::INFINITY,
        }
        .sanitized();
        assert_eq!(
            t,
            Transform {
                x: 0.0,
                y: 12.0,
                scale: MAX_SCALE,
                rotation: 0.0
            }
        );
        assert_eq!(Transform::clamp_scale(0.01), MIN_SCALE);
        assert_eq!(Transform::clamp_scale(f32::NAN), 1.0);
    }

    #[test]
    fn infinite_scale_saturates_at_bounds() {
        assert_eq!(Transform::clamp_scale(f32::INFINITY), MAX_SCALE);
        assert_eq!(Transform::clamp_scale(f32::NEG_INFINITY), MIN_SCALE);
        assert_eq!(Transform::clamp_scale(2.0 * f32::MAX), MAX_SCALE);
        let t = Transform {
            scale: f32::INFINITY,
            ..Transform::IDENTITY
        }
        .sanitized();
        assert_eq!(t.scale, MAX_SCALE);
    }

    #[test]
    fn rotation_is_not_wrapped() {
        let t = Transform {
            rotation: 9.5,
            ..Transform::IDENTITY
        }
        .sanitized();
        assert_eq!(t.rotation, 9.5);
    }

    #[test]
    fn color_parses_and_formats_hex_and_keyword() {
        assert_eq!(Color::parse("#FF6B35"), Some(Color::rgb(255, 107, 53)));
        assert_eq!(Color::parse("#ff6b3580"), Some(Color::rgba(255, 107, 53, 128)));
        assert_eq!(Color::parse("transparent"), Some(Color::TRANSPARENT));
        assert_eq!(Color::parse("#FFF"), None);
        assert_eq!(Color::parse("red"), None);

        assert_eq!(Color::rgb(11, 15, 31).to_string(), "#0B0F1F");
        assert_eq!(Color::rgba(1, 2, 3, 4).to_string(), "#01020304");
        assert_eq!(Color::TRANSPARENT.to_string(), "transparent");
    }

    #[test]
    fn layer_serializes_with_type_discriminant() {
        let layer = Layer {
            id: LayerId::new("abc"),
            transform: Transform::offset(0.0, -140.0),
            kind: LayerKind::Shape(ShapeLayer {
                shape: ShapeKind::Bubble,
                pattern: ShapePattern::Dots,
                fill: Color::rgb(255, 255, 255),
                stroke: Color::rgb(0, 0, 0),
                stroke_width: 2,
                opacity: 1.0,
                size: ShapeKind::Bubble.default_size(),
            }),
        };

        let value = serde_json::to_value(&layer).expect("serialize layer");
        assert_eq!(value["type"], "shape");
        assert_eq!(value["shape"], "bubble");
        assert_eq!(value["pattern"], "dots");
        assert_eq!(value["fill"], "#FFFFFF");
        assert_eq!(value["strokeWidth"], 2);
        assert_eq!(value["id"], "abc");

        let back: Layer = serde_json::from_value(value).expect("deserialize layer");
        assert_eq!(back, layer);
    }

    #[test]
    fn background_uses_kind_tag() {
        let bg = Background::Template {
            template_id: "classic-01".into(),
        };
        let value = serde_json::to_value(&bg).expect("serialize background");
        assert_eq!(value["kind"], "template");
        assert_eq!(value["templateId"], "classic-01");
    }
}
