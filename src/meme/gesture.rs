//! Per-layer gesture handling.
//!
//! A [`TransformController`] keeps a *live* transform that follows the user's
//! fingers and a *committed* transform that mirrors the scene. Live values are
//! never written back to the scene while a gesture is running; only the end
//! of a pan, pinch or rotate channel produces a [`ControllerEvent::Commit`]
//! carrying the full transform.

use crate::meme::ids::LayerId;
use crate::meme::model::{Size, Transform};

/// Recognized gesture input for one layer.
///
/// Pan translation and rotation are cumulative since the channel began, the
/// pinch scale is the cumulative factor since the channel began.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureInput {
    PanBegin,
    PanUpdate { translation_x: f32, translation_y: f32 },
    PanEnd,
    PinchBegin,
    PinchUpdate { scale: f32 },
    PinchEnd,
    RotateBegin,
    RotateUpdate { rotation: f32 },
    RotateEnd,
    Tap,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    Commit { id: LayerId, transform: Transform },
    Select { id: LayerId },
}

/// Canvas centre in canvas pixels. Every layer offset is relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Anchor {
    pub x: f32,
    pub y: f32,
}

impl Anchor {
    pub fn from_canvas(size: Size) -> Self {
        Self {
            x: size.width / 2.0,
            y: size.height / 2.0,
        }
    }
}

/// Where the host should draw a layer: absolute canvas position of the
/// layer's origin plus the scale and rotation to apply around it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub x: f32,
    pub y: f32,
    pub scale: f32,
    pub rotation: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
struct ChannelOrigins {
    pan: Option<(f32, f32)>,
    pinch: Option<f32>,
    rotate: Option<f32>,
}

impl ChannelOrigins {
    fn any_active(&self) -> bool {
        self.pan.is_some() || self.pinch.is_some() || self.rotate.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransformController {
    id: LayerId,
    committed: Transform,
    live: Transform,
    origins: ChannelOrigins,
}

impl TransformController {
    pub fn new(id: LayerId, transform: Transform) -> Self {
        let transform = transform.sanitized();
        Self {
            id,
            committed: transform,
            live: transform,
            origins: ChannelOrigins::default(),
        }
    }

    pub fn id(&self) -> &LayerId {
        &self.id
    }

    pub fn live(&self) -> Transform {
        self.live
    }

    pub fn committed(&self) -> Transform {
        self.committed
    }

    /// True while any of pan, pinch or rotate is between begin and end.
    pub fn is_manipulating(&self) -> bool {
        self.origins.any_active()
    }

    pub fn handle(&mut self, input: GestureInput) -> Option<ControllerEvent> {
        match input {
            GestureInput::PanBegin => {
                self.origins.pan = Some((self.live.x, self.live.y));
                None
            }
            GestureInput::PanUpdate {
                translation_x,
                translation_y,
            } => {
                let (x, y) = self.origins.pan?;
                if translation_x.is_finite() && translation_y.is_finite() {
                    self.live.x = x + translation_x;
                    self.live.y = y + translation_y;
                }
                None
            }
            GestureInput::PanEnd => {
                self.origins.pan.take()?;
                Some(self.commit())
            }
            GestureInput::PinchBegin => {
                self.origins.pinch = Some(self.live.scale);
                None
            }
            GestureInput::PinchUpdate { scale } => {
                let origin = self.origins.pinch?;
                if !scale.is_nan() {
                    self.live.scale = Transform::clamp_scale(origin * scale);
                }
                None
            }
            GestureInput::PinchEnd => {
                self.origins.pinch.take()?;
                Some(self.commit())
            }
            GestureInput::RotateBegin => {
                self.origins.rotate = Some(self.live.rotation);
                None
            }
            GestureInput::RotateUpdate { rotation } => {
                let origin = self.origins.rotate?;
                if rotation.is_finite() {
                    self.live.rotation = origin + rotation;
                }
                None
            }
            GestureInput::RotateEnd => {
                self.origins.rotate.take()?;
                Some(self.commit())
            }
            GestureInput::Tap => {
                // The manipulation group owns the touch sequence once it started.
                if self.origins.any_active() {
                    tracing::debug!(layer = %self.id, "tap ignored during active manipulation");
                    return None;
                }
                Some(ControllerEvent::Select {
                    id: self.id.clone(),
                })
            }
        }
    }

    /// Re-seeds the controller from an externally committed transform.
    ///
    /// Unchanged values are ignored so unrelated scene edits do not disturb a
    /// running gesture. A real change wins over in-flight channels.
    pub fn sync_in(&mut self, transform: Transform) {
        let transform = transform.sanitized();
        if transform == self.committed {
            return;
        }
        if self.origins.any_active() {
            tracing::debug!(layer = %self.id, "external transform change cancels active gesture");
            self.origins = ChannelOrigins::default();
        }
        self.committed = transform;
        self.live = transform;
    }

    pub fn placement(&self, anchor: Anchor) -> Placement {
        Placement {
            x: anchor.x + self.live.x,
            y: anchor.y + self.live.y,
            scale: self.live.scale,
            rotation: self.live.rotation,
        }
    }

    fn commit(&mut self) -> ControllerEvent {
        self.committed = self.live;
        ControllerEvent::Commit {
            id: self.id.clone(),
            transform: self.live,
        }
    }
}
