//! Screen-level coordinator. Owns the scene and one transform controller per
//! layer, feeds gesture commits back into the scene and pushes every other
//! scene change into the controllers.

use crate::meme::background;
use crate::meme::catalog::{random_caption_pair, random_template, MemeCategory};
use crate::meme::edit::{LayerPatch, StyleStep, UpdateOutcome};
use crate::meme::export::{self, ExportOutcome, ExportTarget};
use crate::meme::gesture::{ControllerEvent, GestureInput, Placement, TransformController};
use crate::meme::ids::LayerId;
use crate::meme::model::{Background, EffectKind, ShapeKind, Size};
use crate::meme::platform::{
    ImageManipulator, ImagePicker, MediaLibrary, PickOutcome, SceneCapture, Sharing,
};
use crate::meme::scene::SceneState;
use crate::meme::settings::EditorSettings;
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    PermissionDenied,
    Canceled,
}

/// Toolbar and panel commands.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    AddText(Option<String>),
    AddSticker(String),
    AddShape(ShapeKind),
    AddEffect(EffectKind),
    Update { id: LayerId, patch: LayerPatch },
    Step { id: LayerId, step: StyleStep },
    ShuffleSelectedStyle,
    Select(Option<LayerId>),
    Remove(LayerId),
    RemoveSelected,
    ApplyTemplate(String),
    Randomize(Option<MemeCategory>),
    FlipX,
    FlipY,
    ResetCrop,
    Reset,
}

pub struct EditorSession {
    scene: SceneState,
    controllers: HashMap<LayerId, TransformController>,
    staging_dir: PathBuf,
}

impl EditorSession {
    pub fn new(settings: &EditorSettings) -> Self {
        Self::with_scene(SceneState::new(settings.scene_config()))
    }

    pub fn with_scene(scene: SceneState) -> Self {
        let mut session = Self {
            scene,
            controllers: HashMap::new(),
            staging_dir: std::env::temp_dir().join("memely"),
        };
        session.sync_controllers();
        session
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = dir.into();
        self
    }

    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    pub fn staging_dir(&self) -> &Path {
        &self.staging_dir
    }

    pub fn controller(&self, id: &LayerId) -> Option<&TransformController> {
        self.controllers.get(id)
    }

    /// Canvas measured or re-measured by the host.
    pub fn layout(&mut self, canvas: Size) {
        if self.scene.set_canvas_size(canvas) {
            tracing::info!(layers = self.scene.layers().len(), "default captions seeded");
        }
        self.sync_controllers();
    }

    /// Routes one gesture input to the layer's controller and applies the
    /// resulting commit or selection to the scene.
    pub fn gesture(&mut self, id: &LayerId, input: GestureInput) -> Option<ControllerEvent> {
        let Some(controller) = self.controllers.get_mut(id) else {
            tracing::debug!(layer = %id, ?input, "gesture for unknown layer ignored");
            return None;
        };
        let event = controller.handle(input)?;
        match &event {
            ControllerEvent::Commit { id, transform } => {
                self.scene.commit_transform(id, *transform);
            }
            ControllerEvent::Select { id } => {
                self.scene.set_selected(Some(id));
            }
        }
        Some(event)
    }

    /// Live on-screen placement of one layer.
    pub fn placement(&self, id: &LayerId) -> Option<Placement> {
        let anchor = self.scene.anchor();
        self.controllers.get(id).map(|c| c.placement(anchor))
    }

    /// Placements in z-order, back to front.
    pub fn placements(&self) -> Vec<(LayerId, Placement)> {
        let anchor = self.scene.anchor();
        self.scene
            .layers()
            .iter()
            .filter_map(|layer| {
                self.controllers
                    .get(&layer.id)
                    .map(|c| (layer.id.clone(), c.placement(anchor)))
            })
            .collect()
    }

    /// Drops controllers of removed layers, creates controllers for new ones
    /// and pushes committed transforms into the rest.
    fn sync_controllers(&mut self) {
        let layers = self.scene.layers();
        self.controllers
            .retain(|id, _| layers.iter().any(|layer| &layer.id == id));
        for layer in layers {
            match self.controllers.get_mut(&layer.id) {
                Some(controller) => controller.sync_in(layer.transform),
                None => {
                    self.controllers.insert(
                        layer.id.clone(),
                        TransformController::new(layer.id.clone(), layer.transform),
                    );
                }
            }
        }
    }

    /// Applies one command. Returns `true` when the scene changed.
    pub fn apply(&mut self, action: EditorAction) -> bool {
        let changed = match action {
            EditorAction::AddText(text) => {
                self.scene.add_text_layer(text.as_deref());
                true
            }
            EditorAction::AddSticker(emoji) => {
                self.scene.add_sticker_layer(&emoji);
                true
            }
            EditorAction::AddShape(shape) => {
                self.scene.add_shape_layer(shape);
                true
            }
            EditorAction::AddEffect(effect) => {
                self.scene.add_effect_layer(effect);
                true
            }
            EditorAction::Update { id, patch } => self.scene.update_layer(&id, &patch).applied(),
            EditorAction::Step { id, step } => self.scene.step_layer(&id, step).applied(),
            EditorAction::ShuffleSelectedStyle => self.shuffle_selected_style().applied(),
            EditorAction::Select(id) => self.scene.set_selected(id.as_ref()),
            EditorAction::Remove(id) => self.scene.remove_layer(&id).is_some(),
            EditorAction::RemoveSelected => self.scene.remove_selected().is_some(),
            EditorAction::ApplyTemplate(id) => self.apply_template(&id),
            EditorAction::Randomize(category) => {
                self.randomize(category);
                true
            }
            EditorAction::FlipX => {
                self.scene.toggle_flip_x();
                true
            }
            EditorAction::FlipY => {
                self.scene.toggle_flip_y();
                true
            }
            EditorAction::ResetCrop => self.reset_crop(),
            EditorAction::Reset => {
                self.reset();
                true
            }
        };
        self.sync_controllers();
        changed
    }

    fn shuffle_selected_style(&mut self) -> UpdateOutcome {
        match self.scene.selected_id().cloned() {
            Some(id) => self.scene.shuffle_layer_style(&id),
            None => UpdateOutcome::NotFound,
        }
    }

    /// Unknown template ids leave the scene untouched.
    pub fn apply_template(&mut self, template_id: &str) -> bool {
        let Some(background) = background::template_background(template_id) else {
            tracing::debug!(template = template_id, "unknown template ignored");
            return false;
        };
        self.scene.set_background(background);
        true
    }

    pub fn randomize(&mut self, category: Option<MemeCategory>) {
        let template = random_template(category, self.scene.rng());
        let captions = random_caption_pair(self.scene.rng());
        self.scene.randomize(template.id, &captions);
        self.sync_controllers();
    }

    /// Clears the scene and seeds the default captions again when the
    /// canvas is already measured.
    pub fn reset(&mut self) {
        self.scene.reset();
        self.scene.seed_defaults_if_needed();
        self.sync_controllers();
    }

    pub fn import_background(&mut self, picker: &mut dyn ImagePicker) -> Result<ImportOutcome> {
        if !picker.request_permission().is_granted() {
            tracing::warn!("gallery permission denied; background not imported");
            return Ok(ImportOutcome::PermissionDenied);
        }
        match picker.pick_image().context("pick background image")? {
            PickOutcome::Canceled => Ok(ImportOutcome::Canceled),
            PickOutcome::Picked(asset) => {
                tracing::info!(uri = %asset.uri, "background imported");
                self.scene.set_background(background::image_background(asset));
                Ok(ImportOutcome::Imported)
            }
        }
    }

    /// Returns `false` when the background is not a custom image of known size.
    pub fn crop_to_square(&mut self, manipulator: &mut dyn ImageManipulator) -> Result<bool> {
        match background::crop_to_square(self.scene.background(), manipulator)? {
            Some(cropped) => {
                self.set_background_keeping_flips(cropped);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn reset_crop(&mut self) -> bool {
        match background::reset_crop(self.scene.background()) {
            Some(original) => {
                self.set_background_keeping_flips(original);
                true
            }
            None => false,
        }
    }

    // Cropping edits the same image, so the mirror state stays.
    fn set_background_keeping_flips(&mut self, background: Background) {
        let (flip_x, flip_y) = self.scene.flips();
        self.scene.set_background(background);
        if flip_x {
            self.scene.toggle_flip_x();
        }
        if flip_y {
            self.scene.toggle_flip_y();
        }
    }

    fn export_target(&self) -> ExportTarget {
        ExportTarget::new(self.scene.canvas_size(), self.staging_dir.clone())
    }

    pub fn save(
        &mut self,
        capture: &mut dyn SceneCapture,
        library: &mut dyn MediaLibrary,
    ) -> Result<ExportOutcome> {
        export::save_to_library(capture, library, &self.export_target())
    }

    pub fn share(
        &mut self,
        capture: &mut dyn SceneCapture,
        sharing: &mut dyn Sharing,
    ) -> Result<ExportOutcome> {
        export::share(capture, sharing, &self.export_target())
    }
}
