//! Scene State: the single owner of the background, the ordered layer list
//! and the selection pointer for one editing session.

use crate::meme::catalog::CaptionPair;
use crate::meme::edit::{apply_step, shuffle_text_style, LayerPatch, StyleStep, UpdateOutcome};
use crate::meme::factory;
use crate::meme::gesture::Anchor;
use crate::meme::ids::{IdSource, LayerId, RandomIds};
use crate::meme::model::{Background, EffectKind, Layer, ShapeKind, Size, Transform};
use crate::meme::settings::EditorSettings;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct SceneConfig {
    pub seed_captions: CaptionPair,
    pub seed_offset: f32,
    pub recent_sticker_limit: usize,
    pub default_background: Background,
    pub default_text: String,
}

impl Default for SceneConfig {
    fn default() -> Self {
        EditorSettings::default().scene_config()
    }
}

/// Serializable view of the scene handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneSnapshot {
    pub background: Background,
    pub flip_x: bool,
    pub flip_y: bool,
    pub layers: Vec<Layer>,
    pub selected: Option<LayerId>,
    pub canvas: Size,
}

pub struct SceneState {
    config: SceneConfig,
    background: Background,
    flip_x: bool,
    flip_y: bool,
    layers: Vec<Layer>,
    selected: Option<LayerId>,
    canvas: Size,
    recent_stickers: Vec<String>,
    seeded: bool,
    ids: Box<dyn IdSource>,
    rng: StdRng,
}

impl fmt::Debug for SceneState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneState")
            .field("background", &self.background)
            .field("flip_x", &self.flip_x)
            .field("flip_y", &self.flip_y)
            .field("layers", &self.layers)
            .field("selected", &self.selected)
            .field("canvas", &self.canvas)
            .field("recent_stickers", &self.recent_stickers)
            .field("seeded", &self.seeded)
            .finish_non_exhaustive()
    }
}

impl Default for SceneState {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl SceneState {
    pub fn new(config: SceneConfig) -> Self {
        Self::with_sources(config, RandomIds::new(), StdRng::from_entropy())
    }

    /// Scene with injected id generation and randomness, for deterministic
    /// sessions and tests.
    pub fn with_sources(config: SceneConfig, ids: impl IdSource + 'static, rng: StdRng) -> Self {
        Self {
            background: config.default_background.clone(),
            config,
            flip_x: false,
            flip_y: false,
            layers: Vec::new(),
            selected: None,
            canvas: Size::default(),
            recent_stickers: Vec::new(),
            seeded: false,
            ids: Box::new(ids),
            rng,
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn background(&self) -> &Background {
        &self.background
    }

    pub fn flips(&self) -> (bool, bool) {
        (self.flip_x, self.flip_y)
    }

    /// Back to front.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, id: &LayerId) -> Option<&Layer> {
        self.layers.iter().find(|layer| &layer.id == id)
    }

    pub fn selected_id(&self) -> Option<&LayerId> {
        self.selected.as_ref()
    }

    pub fn selected_layer(&self) -> Option<&Layer> {
        self.selected.as_ref().and_then(|id| self.layer(id))
    }

    pub fn canvas_size(&self) -> Size {
        self.canvas
    }

    pub fn anchor(&self) -> Anchor {
        Anchor::from_canvas(self.canvas)
    }

    /// Most recent first.
    pub fn recent_stickers(&self) -> &[String] {
        &self.recent_stickers
    }

    pub fn rng(&mut self) -> &mut StdRng {
        &mut self.rng
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            background: self.background.clone(),
            flip_x: self.flip_x,
            flip_y: self.flip_y,
            layers: self.layers.clone(),
            selected: self.selected.clone(),
            canvas: self.canvas,
        }
    }

    /// Records the measured canvas and seeds the default captions the first
    /// time a measured canvas meets an empty layer list. Returns `true` when
    /// layers were seeded.
    pub fn set_canvas_size(&mut self, size: Size) -> bool {
        self.canvas = size;
        self.seed_defaults_if_needed()
    }

    pub fn seed_defaults_if_needed(&mut self) -> bool {
        if self.seeded || !self.canvas.is_measured() {
            return false;
        }
        self.seeded = true;
        if !self.layers.is_empty() {
            return false;
        }
        let captions = self.config.seed_captions.clone();
        self.layers = self.caption_layers(&captions);
        tracing::debug!(
            width = self.canvas.width,
            height = self.canvas.height,
            "seeded default caption layers"
        );
        true
    }

    fn caption_layers(&mut self, captions: &CaptionPair) -> Vec<Layer> {
        let offset = self.config.seed_offset;
        vec![
            factory::text_layer(self.ids.as_mut(), captions.top.clone(), -offset),
            factory::text_layer(self.ids.as_mut(), captions.bottom.clone(), offset),
        ]
    }

    /// Appends on top of the z-order and selects the new layer.
    pub fn add_layer(&mut self, mut layer: Layer) -> LayerId {
        if self.layer(&layer.id).is_some() {
            let fresh = self.ids.next_layer_id();
            tracing::warn!(duplicate = %layer.id, replacement = %fresh, "layer id already in scene");
            layer.id = fresh;
        }
        layer.transform = layer.transform.sanitized();
        let id = layer.id.clone();
        tracing::info!(layer = %id, kind = ?layer.layer_type(), "layer added");
        self.layers.push(layer);
        self.selected = Some(id.clone());
        id
    }

    pub fn add_text_layer(&mut self, text: Option<&str>) -> LayerId {
        let text = text.unwrap_or(&self.config.default_text).to_string();
        let layer = factory::text_layer(self.ids.as_mut(), text, 0.0);
        self.add_layer(layer)
    }

    pub fn add_sticker_layer(&mut self, emoji: &str) -> LayerId {
        let layer = factory::sticker_layer(self.ids.as_mut(), emoji);
        self.remember_sticker(emoji);
        self.add_layer(layer)
    }

    pub fn add_shape_layer(&mut self, shape: ShapeKind) -> LayerId {
        let layer = factory::shape_layer(self.ids.as_mut(), shape);
        self.add_layer(layer)
    }

    pub fn add_effect_layer(&mut self, effect: EffectKind) -> LayerId {
        let layer = factory::effect_layer(self.ids.as_mut(), effect, &mut self.rng);
        self.add_layer(layer)
    }

    fn remember_sticker(&mut self, emoji: &str) {
        self.recent_stickers.retain(|existing| existing != emoji);
        self.recent_stickers.insert(0, emoji.to_string());
        self.recent_stickers
            .truncate(self.config.recent_sticker_limit.max(1));
    }

    fn layer_mut(&mut self, id: &LayerId) -> Option<&mut Layer> {
        self.layers.iter_mut().find(|layer| &layer.id == id)
    }

    pub fn update_layer(&mut self, id: &LayerId, patch: &LayerPatch) -> UpdateOutcome {
        let Some(layer) = self.layer_mut(id) else {
            tracing::debug!(layer = %id, "update ignored for unknown layer");
            return UpdateOutcome::NotFound;
        };
        let outcome = patch.apply(layer);
        if outcome == UpdateOutcome::KindMismatch {
            tracing::debug!(layer = %id, "update ignored: patch does not match layer kind");
        }
        outcome
    }

    pub fn step_layer(&mut self, id: &LayerId, step: StyleStep) -> UpdateOutcome {
        let Some(layer) = self.layer_mut(id) else {
            tracing::debug!(layer = %id, "style step ignored for unknown layer");
            return UpdateOutcome::NotFound;
        };
        if apply_step(layer, step) {
            UpdateOutcome::Applied
        } else {
            UpdateOutcome::KindMismatch
        }
    }

    pub fn shuffle_layer_style(&mut self, id: &LayerId) -> UpdateOutcome {
        let Some(index) = self.layers.iter().position(|layer| &layer.id == id) else {
            tracing::debug!(layer = %id, "shuffle ignored for unknown layer");
            return UpdateOutcome::NotFound;
        };
        if shuffle_text_style(&mut self.layers[index], &mut self.rng) {
            UpdateOutcome::Applied
        } else {
            UpdateOutcome::KindMismatch
        }
    }

    /// Replaces the transform wholesale. Unknown ids are ignored.
    pub fn commit_transform(&mut self, id: &LayerId, transform: Transform) -> bool {
        let Some(layer) = self.layer_mut(id) else {
            tracing::debug!(layer = %id, "transform commit ignored for unknown layer");
            return false;
        };
        layer.transform = transform.sanitized();
        true
    }

    pub fn remove_layer(&mut self, id: &LayerId) -> Option<Layer> {
        let Some(index) = self.layers.iter().position(|layer| &layer.id == id) else {
            tracing::debug!(layer = %id, "remove ignored for unknown layer");
            return None;
        };
        let removed = self.layers.remove(index);
        if self.selected.as_ref() == Some(id) {
            self.selected = None;
        }
        tracing::info!(layer = %id, "layer removed");
        Some(removed)
    }

    pub fn remove_selected(&mut self) -> Option<Layer> {
        let id = self.selected.clone()?;
        self.remove_layer(&id)
    }

    /// Selecting an id that is not in the scene clears the selection and
    /// returns `false`.
    pub fn set_selected(&mut self, id: Option<&LayerId>) -> bool {
        match id {
            None => {
                self.selected = None;
                true
            }
            Some(id) if self.layer(id).is_some() => {
                self.selected = Some(id.clone());
                true
            }
            Some(id) => {
                tracing::debug!(layer = %id, "selection of unknown layer cleared");
                self.selected = None;
                false
            }
        }
    }

    /// Changing the background also drops any flips.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
        self.flip_x = false;
        self.flip_y = false;
    }

    pub fn toggle_flip_x(&mut self) -> bool {
        self.flip_x = !self.flip_x;
        self.flip_x
    }

    pub fn toggle_flip_y(&mut self) -> bool {
        self.flip_y = !self.flip_y;
        self.flip_y
    }

    /// Clears layers and selection and restores the default background.
    /// Seeding is re-armed but not run; see [`Self::seed_defaults_if_needed`].
    pub fn reset(&mut self) {
        self.layers.clear();
        self.selected = None;
        self.set_background(self.config.default_background.clone());
        self.seeded = false;
        tracing::info!("scene reset");
    }

    /// Template background plus a fresh pair of caption layers.
    pub fn randomize(&mut self, template_id: &str, captions: &CaptionPair) {
        self.set_background(Background::Template {
            template_id: template_id.to_string(),
        });
        self.layers = self.caption_layers(captions);
        self.selected = None;
        self.seeded = true;
        tracing::info!(template = template_id, "scene randomized");
    }
}
