//! Host services the editor talks to. Hosts implement these traits over the
//! OS media picker, photo library, share sheet and view snapshotting.

use crate::meme::composite::RgbaBuffer;
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Granted,
    Denied,
}

impl Permission {
    pub fn is_granted(self) -> bool {
        matches!(self, Permission::Granted)
    }
}

/// A picked image. Dimensions are optional because some pickers do not
/// report them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAsset {
    pub uri: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickOutcome {
    Canceled,
    Picked(ImageAsset),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub origin_x: u32,
    pub origin_y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManipulatedImage {
    pub uri: String,
    pub width: u32,
    pub height: u32,
}

pub trait ImagePicker {
    fn request_permission(&mut self) -> Permission;
    fn pick_image(&mut self) -> Result<PickOutcome>;
}

pub trait ImageManipulator {
    fn crop(&mut self, uri: &str, rect: CropRect) -> Result<ManipulatedImage>;
}

pub trait MediaLibrary {
    fn request_permission(&mut self) -> Permission;
    /// Stores the file and returns where the library put it.
    fn save(&mut self, file: &Path) -> Result<PathBuf>;
}

pub trait Sharing {
    fn is_available(&self) -> bool;
    fn share(&mut self, file: &Path) -> Result<()>;
}

/// Snapshot of the canvas view exactly as shown on screen. `None` means
/// there is no mounted canvas to capture.
pub trait SceneCapture {
    fn capture(&mut self) -> Result<Option<RgbaBuffer>>;
}
