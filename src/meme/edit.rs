//! Partial layer updates. Patches are split per payload so an edit can never
//! change what kind of layer it touches.

use crate::meme::model::{
    Color, EffectLayer, Layer, LayerKind, MemeFont, ShapeLayer, ShapePattern, Size, TextAlign,
    TextLayer,
};
use crate::meme::palette::{STROKE_PALETTE, TEXT_PALETTE};
use rand::Rng;

pub const FONT_SIZE_STEP: u32 = 4;
pub const FONT_SIZE_RANGE: (u32, u32) = (18, 96);
pub const STROKE_WIDTH_MAX: u32 = 12;
pub const OPACITY_STEP: f32 = 0.1;
pub const OPACITY_FLOOR: f32 = 0.2;
pub const EFFECT_SIZE_STEP: u32 = 20;
pub const EFFECT_SIZE_RANGE: (u32, u32) = (80, 320);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Applied,
    NotFound,
    KindMismatch,
}

impl UpdateOutcome {
    pub fn applied(self) -> bool {
        matches!(self, Self::Applied)
    }
}

/// Applies to both text and sticker layers.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextPatch {
    pub text: Option<String>,
    pub font: Option<MemeFont>,
    pub font_size: Option<u32>,
    pub color: Option<Color>,
    pub stroke_color: Option<Color>,
    pub stroke_width: Option<u32>,
    pub align: Option<TextAlign>,
    pub opacity: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ShapePatch {
    pub pattern: Option<ShapePattern>,
    pub fill: Option<Color>,
    pub stroke: Option<Color>,
    pub stroke_width: Option<u32>,
    pub opacity: Option<f32>,
    pub size: Option<Size>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EffectPatch {
    pub opacity: Option<f32>,
    pub size: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayerPatch {
    Text(TextPatch),
    Shape(ShapePatch),
    Effect(EffectPatch),
}

impl From<TextPatch> for LayerPatch {
    fn from(patch: TextPatch) -> Self {
        Self::Text(patch)
    }
}

impl From<ShapePatch> for LayerPatch {
    fn from(patch: ShapePatch) -> Self {
        Self::Shape(patch)
    }
}

impl From<EffectPatch> for LayerPatch {
    fn from(patch: EffectPatch) -> Self {
        Self::Effect(patch)
    }
}

fn clamp_opacity(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

impl TextPatch {
    fn merge_into(&self, layer: &mut TextLayer) {
        if let Some(text) = &self.text {
            layer.text.clone_from(text);
        }
        if let Some(font) = self.font {
            layer.font = font;
        }
        if let Some(font_size) = self.font_size {
            layer.font_size = font_size;
        }
        if let Some(color) = self.color {
            layer.color = color;
        }
        if let Some(stroke_color) = self.stroke_color {
            layer.stroke_color = stroke_color;
        }
        if let Some(stroke_width) = self.stroke_width {
            layer.stroke_width = stroke_width;
        }
        if let Some(align) = self.align {
            layer.align = align;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = clamp_opacity(opacity);
        }
    }
}

impl ShapePatch {
    fn merge_into(&self, layer: &mut ShapeLayer) {
        if let Some(pattern) = self.pattern {
            layer.pattern = pattern;
        }
        if let Some(fill) = self.fill {
            layer.fill = fill;
        }
        if let Some(stroke) = self.stroke {
            layer.stroke = stroke;
        }
        if let Some(stroke_width) = self.stroke_width {
            layer.stroke_width = stroke_width;
        }
        if let Some(opacity) = self.opacity {
            layer.opacity = clamp_opacity(opacity);
        }
        if let Some(size) = self.size {
            layer.size = size;
        }
    }
}

impl EffectPatch {
    fn merge_into(&self, layer: &mut EffectLayer) {
        if let Some(opacity) = self.opacity {
            layer.opacity = clamp_opacity(opacity);
        }
        if let Some(size) = self.size {
            layer.size = size;
        }
    }
}

impl LayerPatch {
    /// Merges the patch into `layer` when the payload kinds line up.
    pub fn apply(&self, layer: &mut Layer) -> UpdateOutcome {
        match (self, &mut layer.kind) {
            (Self::Text(patch), LayerKind::Text(text) | LayerKind::Sticker(text)) => {
                patch.merge_into(text);
            }
            (Self::Shape(patch), LayerKind::Shape(shape)) => patch.merge_into(shape),
            (Self::Effect(patch), LayerKind::Effect(effect)) => patch.merge_into(effect),
            _ => return UpdateOutcome::KindMismatch,
        }
        UpdateOutcome::Applied
    }
}

/// Bounded one-tap adjustments offered by the style panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleStep {
    FontSmaller,
    FontLarger,
    StrokeThinner,
    StrokeThicker,
    Fade,
    Boost,
    EffectShrink,
    EffectGrow,
}

/// Returns `false` when the step has no meaning for the layer kind.
pub fn apply_step(layer: &mut Layer, step: StyleStep) -> bool {
    match step {
        StyleStep::Fade => {
            let opacity = layer.opacity_mut();
            *opacity = (*opacity - OPACITY_STEP).max(OPACITY_FLOOR);
            true
        }
        StyleStep::Boost => {
            let opacity = layer.opacity_mut();
            *opacity = (*opacity + OPACITY_STEP).min(1.0);
            true
        }
        StyleStep::FontSmaller | StyleStep::FontLarger => {
            let (LayerKind::Text(text) | LayerKind::Sticker(text)) = &mut layer.kind else {
                return false;
            };
            let (min, max) = FONT_SIZE_RANGE;
            text.font_size = if step == StyleStep::FontSmaller {
                text.font_size.saturating_sub(FONT_SIZE_STEP).max(min)
            } else {
                (text.font_size + FONT_SIZE_STEP).min(max)
            };
            true
        }
        StyleStep::StrokeThinner | StyleStep::StrokeThicker => {
            let width = match &mut layer.kind {
                LayerKind::Text(text) | LayerKind::Sticker(text) => &mut text.stroke_width,
                LayerKind::Shape(shape) => &mut shape.stroke_width,
                LayerKind::Effect(_) => return false,
            };
            *width = if step == StyleStep::StrokeThinner {
                width.saturating_sub(1)
            } else {
                (*width + 1).min(STROKE_WIDTH_MAX)
            };
            true
        }
        StyleStep::EffectShrink | StyleStep::EffectGrow => {
            let LayerKind::Effect(effect) = &mut layer.kind else {
                return false;
            };
            let (min, max) = EFFECT_SIZE_RANGE;
            effect.size = if step == StyleStep::EffectShrink {
                effect.size.saturating_sub(EFFECT_SIZE_STEP).max(min)
            } else {
                (effect.size + EFFECT_SIZE_STEP).min(max)
            };
            true
        }
    }
}

/// Random font, fill and stroke for text and sticker layers.
pub fn shuffle_text_style<R: Rng + ?Sized>(layer: &mut Layer, rng: &mut R) -> bool {
    let (LayerKind::Text(text) | LayerKind::Sticker(text)) = &mut layer.kind else {
        return false;
    };
    text.font = MemeFont::ALL[rng.gen_range(0..MemeFont::ALL.len())];
    text.color = TEXT_PALETTE[rng.gen_range(0..TEXT_PALETTE.len())];
    text.stroke_color = STROKE_PALETTE[rng.gen_range(0..STROKE_PALETTE.len())];
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meme::factory::{effect_layer, shape_layer, text_layer};
    use crate::meme::ids::SequentialIds;
    use crate::meme::model::{EffectKind, LayerType, ShapeKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn color_patch_preserves_other_text_fields() {
        let mut ids = SequentialIds::default();
        let mut layer = text_layer(&mut ids, "TOP TEXT", -140.0);
        let before = layer.clone();

        let outcome = LayerPatch::from(TextPatch {
            color: Some(Color::rgb(0xFF, 0xD2, 0x3F)),
            ..TextPatch::default()
        })
        .apply(&mut layer);

        assert_eq!(outcome, UpdateOutcome::Applied);
        assert_eq!(layer.layer_type(), LayerType::Text);
        let mut expected = before;
        if let LayerKind::Text(text) = &mut expected.kind {
            text.color = Color::rgb(0xFF, 0xD2, 0x3F);
        }
        assert_eq!(layer, expected);
    }

    #[test]
    fn mismatched_patch_leaves_layer_untouched() {
        let mut ids = SequentialIds::default();
        let mut layer = text_layer(&mut ids, "hello", 0.0);
        let before = layer.clone();

        let outcome = LayerPatch::from(ShapePatch {
            pattern: Some(ShapePattern::Stripes),
            ..ShapePatch::default()
        })
        .apply(&mut layer);

        assert_eq!(outcome, UpdateOutcome::KindMismatch);
        assert_eq!(layer, before);
    }

    #[test]
    fn patch_opacity_is_clamped() {
        let mut ids = SequentialIds::default();
        let mut layer = shape_layer(&mut ids, ShapeKind::Box);
        LayerPatch::from(ShapePatch {
            opacity: Some(3.0),
            ..ShapePatch::default()
        })
        .apply(&mut layer);
        assert_eq!(layer.opacity(), 1.0);
    }

    #[test]
    fn steps_stay_within_bounds() {
        let mut ids = SequentialIds::default();
        let mut text = text_layer(&mut ids, "a", 0.0);
        for _ in 0..40 {
            assert!(apply_step(&mut text, StyleStep::FontLarger));
            assert!(apply_step(&mut text, StyleStep::StrokeThicker));
            assert!(apply_step(&mut text, StyleStep::Boost));
        }
        let style = text.as_text().expect("text payload");
        assert_eq!(style.font_size, FONT_SIZE_RANGE.1);
        assert_eq!(style.stroke_width, STROKE_WIDTH_MAX);
        assert_eq!(style.opacity, 1.0);

        for _ in 0..40 {
            apply_step(&mut text, StyleStep::FontSmaller);
            apply_step(&mut text, StyleStep::StrokeThinner);
            apply_step(&mut text, StyleStep::Fade);
        }
        let style = text.as_text().expect("text payload");
        assert_eq!(style.font_size, FONT_SIZE_RANGE.0);
        assert_eq!(style.stroke_width, 0);
        assert!((style.opacity - OPACITY_FLOOR).abs() < f32::EPSILON);
    }

    #[test]
    fn effect_steps_only_apply_to_effects() {
        let mut ids = SequentialIds::default();
        let mut rng = StdRng::seed_from_u64(1);
        let mut effect = effect_layer(&mut ids, EffectKind::Pixelate, &mut rng);
        let mut text = text_layer(&mut ids, "a", 0.0);

        assert!(!apply_step(&mut text, StyleStep::EffectGrow));
        assert!(!apply_step(&mut effect, StyleStep::FontLarger));
        assert!(!apply_step(&mut effect, StyleStep::StrokeThicker));

        for _ in 0..20 {
            apply_step(&mut effect, StyleStep::EffectGrow);
        }
        let LayerKind::Effect(payload) = &effect.kind else {
            panic!("expected effect");
        };
        assert_eq!(payload.size, EFFECT_SIZE_RANGE.1);

        for _ in 0..20 {
            apply_step(&mut effect, StyleStep::EffectShrink);
        }
        let LayerKind::Effect(payload) = &effect.kind else {
            panic!("expected effect");
        };
        assert_eq!(payload.size, EFFECT_SIZE_RANGE.0);
    }

    #[test]
    fn shuffle_picks_from_palettes_and_skips_shapes() {
        let mut ids = SequentialIds::default();
        let mut rng = StdRng::seed_from_u64(9);
        let mut text = text_layer(&mut ids, "a", 0.0);
        let mut shape = shape_layer(&mut ids, ShapeKind::Arrow);
        let shape_before = shape.clone();

        assert!(shuffle_text_style(&mut text, &mut rng));
        let style = text.as_text().expect("text payload");
        assert!(TEXT_PALETTE.contains(&style.color));
        assert!(STROKE_PALETTE.contains(&style.stroke_color));
        assert_eq!(style.text, "a");

        assert!(!shuffle_text_style(&mut shape, &mut rng));
        assert_eq!(shape, shape_before);
    }
}
