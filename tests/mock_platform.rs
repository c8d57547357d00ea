#![allow(dead_code)]

use anyhow::Result;
use memely::meme::composite::{Rgba, RgbaBuffer};
use memely::meme::platform::{
    CropRect, ImageAsset, ImageManipulator, ImagePicker, ManipulatedImage, MediaLibrary,
    Permission, PickOutcome, SceneCapture, Sharing,
};
use std::path::{Path, PathBuf};

pub struct MockPicker {
    pub permission: Permission,
    pub outcome: PickOutcome,
    pub picks: usize,
}

impl MockPicker {
    pub fn picking(uri: &str, width: u32, height: u32) -> Self {
        Self {
            permission: Permission::Granted,
            outcome: PickOutcome::Picked(ImageAsset {
                uri: uri.to_string(),
                width: Some(width),
                height: Some(height),
            }),
            picks: 0,
        }
    }

    pub fn canceled() -> Self {
        Self {
            permission: Permission::Granted,
            outcome: PickOutcome::Canceled,
            picks: 0,
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            ..Self::canceled()
        }
    }
}

impl ImagePicker for MockPicker {
    fn request_permission(&mut self) -> Permission {
        self.permission
    }

    fn pick_image(&mut self) -> Result<PickOutcome> {
        self.picks += 1;
        Ok(self.outcome.clone())
    }
}

#[derive(Default)]
pub struct MockManipulator {
    pub crops: Vec<(String, CropRect)>,
}

impl ImageManipulator for MockManipulator {
    fn crop(&mut self, uri: &str, rect: CropRect) -> Result<ManipulatedImage> {
        self.crops.push((uri.to_string(), rect));
        Ok(ManipulatedImage {
            uri: format!("{uri}.square.jpg"),
            width: rect.width,
            height: rect.height,
        })
    }
}

pub struct MockLibrary {
    pub permission: Permission,
    /// PNG bytes of every saved file, in save order.
    pub saved: Vec<Vec<u8>>,
}

impl MockLibrary {
    pub fn granted() -> Self {
        Self {
            permission: Permission::Granted,
            saved: Vec::new(),
        }
    }

    pub fn denied() -> Self {
        Self {
            permission: Permission::Denied,
            saved: Vec::new(),
        }
    }
}

impl MediaLibrary for MockLibrary {
    fn request_permission(&mut self) -> Permission {
        self.permission
    }

    fn save(&mut self, file: &Path) -> Result<PathBuf> {
        self.saved.push(std::fs::read(file)?);
        Ok(PathBuf::from(format!("library/{}.png", self.saved.len())))
    }
}

pub struct MockSharing {
    pub available: bool,
    pub shared: Vec<PathBuf>,
}

impl MockSharing {
    pub fn new(available: bool) -> Self {
        Self {
            available,
            shared: Vec::new(),
        }
    }
}

impl Sharing for MockSharing {
    fn is_available(&self) -> bool {
        self.available
    }

    fn share(&mut self, file: &Path) -> Result<()> {
        self.shared.push(file.to_path_buf());
        Ok(())
    }
}

pub struct MockCapture {
    pub frame: Option<RgbaBuffer>,
    pub captures: usize,
}

impl MockCapture {
    pub fn solid(width: u32, height: u32, fill: Rgba) -> Self {
        Self {
            frame: Some(RgbaBuffer::new(width, height, fill)),
            captures: 0,
        }
    }

    pub fn unmounted() -> Self {
        Self {
            frame: None,
            captures: 0,
        }
    }
}

impl SceneCapture for MockCapture {
    fn capture(&mut self) -> Result<Option<RgbaBuffer>> {
        self.captures += 1;
        Ok(self.frame.clone())
    }
}
