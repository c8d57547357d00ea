//! Default layers. Every builder starts at the anchor except where a
//! vertical offset is passed in explicitly.

use crate::meme::ids::IdSource;
use crate::meme::model::{
    Color, ConfettiPiece, EffectKind, EffectLayer, Layer, LayerKind, MemeFont, ShapeKind, ShapeLayer,
    ShapePattern, TextAlign, TextLayer, Transform,
};
use crate::meme::palette::{BLACK, INK, TEXT_PALETTE, WHITE};
use rand::Rng;

pub const CONFETTI_PIECES: usize = 28;
pub const CONFETTI_SPREAD: f32 = 140.0;
pub const EFFECT_SIZE: u32 = 180;
pub const EFFECT_OPACITY: f32 = 0.8;

fn text_style(text: String, sticker: bool) -> TextLayer {
    if sticker {
        TextLayer {
            text,
            font: MemeFont::Bold,
            font_size: 64,
            color: WHITE,
            stroke_color: Color::TRANSPARENT,
            stroke_width: 0,
            align: TextAlign::Center,
            opacity: 1.0,
        }
    } else {
        TextLayer {
            text,
            font: MemeFont::Impact,
            font_size: 44,
            color: WHITE,
            stroke_color: BLACK,
            stroke_width: 4,
            align: TextAlign::Center,
            opacity: 1.0,
        }
    }
}

pub fn text_layer(ids: &mut dyn IdSource, text: impl Into<String>, y_offset: f32) -> Layer {
    Layer {
        id: ids.next_layer_id(),
        transform: Transform::offset(0.0, y_offset),
        kind: LayerKind::Text(text_style(text.into(), false)),
    }
}

pub fn sticker_layer(ids: &mut dyn IdSource, emoji: impl Into<String>) -> Layer {
    Layer {
        id: ids.next_layer_id(),
        transform: Transform::IDENTITY,
        kind: LayerKind::Sticker(text_style(emoji.into(), true)),
    }
}

pub fn shape_layer(ids: &mut dyn IdSource, shape: ShapeKind) -> Layer {
    Layer {
        id: ids.next_layer_id(),
        transform: Transform::IDENTITY,
        kind: LayerKind::Shape(ShapeLayer {
            shape,
            pattern: ShapePattern::Solid,
            fill: WHITE,
            stroke: INK,
            stroke_width: 2,
            opacity: 1.0,
            size: shape.default_size(),
        }),
    }
}

pub fn effect_layer<R: Rng + ?Sized>(
    ids: &mut dyn IdSource,
    effect: EffectKind,
    rng: &mut R,
) -> Layer {
    let id = ids.next_layer_id();
    let confetti = match effect {
        EffectKind::Confetti => confetti(ids, rng),
        EffectKind::Blur | EffectKind::Pixelate => Vec::new(),
    };
    Layer {
        id,
        transform: Transform::IDENTITY,
        kind: LayerKind::Effect(EffectLayer {
            effect,
            opacity: EFFECT_OPACITY,
            size: EFFECT_SIZE,
            confetti,
        }),
    }
}

pub fn confetti<R: Rng + ?Sized>(ids: &mut dyn IdSource, rng: &mut R) -> Vec<ConfettiPiece> {
    (0..CONFETTI_PIECES)
        .map(|_| ConfettiPiece {
            id: ids.next_id(),
            x: rng.gen_range(0.0..CONFETTI_SPREAD),
            y: rng.gen_range(0.0..CONFETTI_SPREAD),
            size: rng.gen_range(6.0..16.0),
            rotation: rng.gen_range(0.0..90.0),
            color: TEXT_PALETTE[rng.gen_range(0..TEXT_PALETTE.len())],
        })
        .collect()
}
