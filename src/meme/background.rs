//! Background selection and square cropping of custom images.

use crate::meme::catalog::template_by_id;
use crate::meme::model::{Background, ImageBackground};
use crate::meme::platform::{CropRect, ImageAsset, ImageManipulator};
use anyhow::{Context, Result};

/// Largest centred square inside a `width` x `height` image. Half pixel
/// offsets round up.
pub fn square_crop_rect(width: u32, height: u32) -> CropRect {
    let side = width.min(height);
    CropRect {
        origin_x: (width - side).div_ceil(2),
        origin_y: (height - side).div_ceil(2),
        width: side,
        height: side,
    }
}

/// Unknown template ids yield `None`.
pub fn template_background(template_id: &str) -> Option<Background> {
    template_by_id(template_id).map(|template| Background::Template {
        template_id: template.id.to_string(),
    })
}

pub fn image_background(asset: ImageAsset) -> Background {
    Background::Image(ImageBackground {
        original_uri: asset.uri.clone(),
        original_width: asset.width,
        original_height: asset.height,
        uri: asset.uri,
        width: asset.width,
        height: asset.height,
    })
}

/// Crops a custom image background to a centred square.
///
/// Returns `Ok(None)` for template and color backgrounds and for images
/// whose dimensions are unknown.
pub fn crop_to_square(
    background: &Background,
    manipulator: &mut dyn ImageManipulator,
) -> Result<Option<Background>> {
    let Background::Image(image) = background else {
        return Ok(None);
    };
    let (Some(width), Some(height)) = (image.width, image.height) else {
        tracing::debug!(uri = %image.uri, "square crop skipped: image size unknown");
        return Ok(None);
    };
    if width == 0 || height == 0 {
        return Ok(None);
    }

    let rect = square_crop_rect(width, height);
    let cropped = manipulator
        .crop(&image.uri, rect)
        .with_context(|| format!("crop background {}", image.uri))?;
    tracing::info!(uri = %cropped.uri, side = rect.width, "background cropped to square");

    Ok(Some(Background::Image(ImageBackground {
        uri: cropped.uri,
        width: Some(cropped.width),
        height: Some(cropped.height),
        ..image.clone()
    })))
}

/// Restores the pre-crop image. `None` for non-image backgrounds.
pub fn reset_crop(background: &Background) -> Option<Background> {
    let Background::Image(image) = background else {
        return None;
    };
    Some(Background::Image(ImageBackground {
        uri: image.original_uri.clone(),
        width: image.original_width,
        height: image.original_height,
        ..image.clone()
    }))
}
