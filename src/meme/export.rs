//! Turning a canvas capture into a PNG and handing it to the photo library
//! or the share sheet.

use crate::meme::composite::{clip_to_canvas, RgbaBuffer};
use crate::meme::model::Size;
use crate::meme::platform::{MediaLibrary, Permission, SceneCapture, Sharing};
use anyhow::{anyhow, Context, Result};
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};

pub const EXPORT_SUBDIR: &str = "memely_exports";
pub const EXPORT_PREFIX: &str = "memely";
pub const STAGING_PREFIX: &str = "capture";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    Saved(PathBuf),
    Shared,
    PermissionDenied,
    SharingUnavailable,
    NothingToCapture,
}

pub fn timestamped_stem(now: chrono::DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M%S").to_string()
}

pub fn build_filename(prefix: &str, stem: &str, attempt: u32) -> String {
    if attempt <= 1 {
        format!("{prefix}_{stem}.png")
    } else {
        format!("{prefix}_{stem}_{attempt}.png")
    }
}

/// First `<prefix>_<stem>[_n].png` in `dir` that does not exist yet.
pub fn unique_path(dir: &Path, prefix: &str, stem: &str) -> PathBuf {
    let mut attempt = 1;
    loop {
        let candidate = dir.join(build_filename(prefix, stem, attempt));
        if !candidate.exists() {
            return candidate;
        }
        attempt += 1;
    }
}

pub fn exe_relative_export_folder_from_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(EXPORT_SUBDIR))
}

pub fn default_export_folder() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    exe_relative_export_folder_from_path(&exe_path)
}

pub fn write_png(buffer: &RgbaBuffer, path: &Path) -> Result<()> {
    if buffer.is_empty() {
        return Err(anyhow!("refusing to write an empty capture to {}", path.display()));
    }
    let image = buffer.clone().into_image()?;
    image
        .save_with_format(path, image::ImageFormat::Png)
        .with_context(|| format!("write png {}", path.display()))
}

/// Clips the capture to the canvas and writes it into `staging_dir`.
pub fn stage_capture(
    capture: &RgbaBuffer,
    canvas: Size,
    staging_dir: &Path,
    now: chrono::DateTime<Local>,
) -> Result<PathBuf> {
    fs::create_dir_all(staging_dir)
        .with_context(|| format!("create staging folder {}", staging_dir.display()))?;
    let clipped = clip_to_canvas(capture, canvas);
    let path = unique_path(staging_dir, STAGING_PREFIX, &timestamped_stem(now));
    write_png(&clipped, &path)?;
    tracing::debug!(path = %path.display(), width = clipped.width, height = clipped.height, "capture staged");
    Ok(path)
}

/// Where staged captures go before the library or share sheet picks them up.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportTarget {
    pub canvas: Size,
    pub staging_dir: PathBuf,
}

impl ExportTarget {
    pub fn new(canvas: Size, staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            canvas,
            staging_dir: staging_dir.into(),
        }
    }
}

pub fn save_to_library(
    capture: &mut dyn SceneCapture,
    library: &mut dyn MediaLibrary,
    target: &ExportTarget,
) -> Result<ExportOutcome> {
    let Some(frame) = capture.capture().context("capture canvas")? else {
        return Ok(ExportOutcome::NothingToCapture);
    };
    if !library.request_permission().is_granted() {
        tracing::warn!("photo library permission denied; meme not saved");
        return Ok(ExportOutcome::PermissionDenied);
    }
    let staged = stage_capture(&frame, target.canvas, &target.staging_dir, Local::now())?;
    let saved = library
        .save(&staged)
        .with_context(|| format!("save {} to library", staged.display()))?;
    if let Err(err) = fs::remove_file(&staged) {
        tracing::warn!(path = %staged.display(), error = %err, "failed to remove staged capture");
    }
    tracing::info!(path = %saved.display(), "meme saved");
    Ok(ExportOutcome::Saved(saved))
}

/// The staged PNG outlives the call because the share target may still be
/// reading it. Clearing `staging_dir` is up to the host.
pub fn share(
    capture: &mut dyn SceneCapture,
    sharing: &mut dyn Sharing,
    target: &ExportTarget,
) -> Result<ExportOutcome> {
    let Some(frame) = capture.capture().context("capture canvas")? else {
        return Ok(ExportOutcome::NothingToCapture);
    };
    if !sharing.is_available() {
        tracing::warn!("sharing is not available on this device");
        return Ok(ExportOutcome::SharingUnavailable);
    }
    let staged = stage_capture(&frame, target.canvas, &target.staging_dir, Local::now())?;
    sharing
        .share(&staged)
        .with_context(|| format!("share {}", staged.display()))?;
    tracing::info!(path = %staged.display(), "meme shared");
    Ok(ExportOutcome::Shared)
}

/// Media library backed by a plain folder. Write access is always granted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryLibrary {
    folder: PathBuf,
}

impl DirectoryLibrary {
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    /// Library in the exe-relative export folder.
    pub fn beside_executable() -> Result<Self> {
        Ok(Self::new(default_export_folder()?))
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn save_at(&self, file: &Path, now: chrono::DateTime<Local>) -> Result<PathBuf> {
        fs::create_dir_all(&self.folder)
            .with_context(|| format!("create export folder {}", self.folder.display()))?;
        let destination = unique_path(&self.folder, EXPORT_PREFIX, &timestamped_stem(now));
        fs::copy(file, &destination).with_context(|| {
            format!("copy {} to {}", file.display(), destination.display())
        })?;
        Ok(destination)
    }
}

impl MediaLibrary for DirectoryLibrary {
    fn request_permission(&mut self) -> Permission {
        Permission::Granted
    }

    fn save(&mut self, file: &Path) -> Result<PathBuf> {
        self.save_at(file, Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meme::composite::Rgba;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn fixed_time() -> chrono::DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("date time")
    }

    #[test]
    fn filenames_carry_timestamp_and_attempt() {
        let stem = timestamped_stem(fixed_time());
        assert_eq!(stem, "20260102_030405");
        assert_eq!(build_filename("memely", &stem, 1), "memely_20260102_030405.png");
        assert_eq!(build_filename("memely", &stem, 3), "memely_20260102_030405_3.png");
    }

    #[test]
    fn export_folder_is_sibling_of_exe() {
        let exe = Path::new("/tmp/memely/bin/memely");
        let output = exe_relative_export_folder_from_path(exe).expect("output path");
        assert_eq!(output, Path::new("/tmp/memely/bin").join(EXPORT_SUBDIR));
    }

    #[test]
    fn directory_library_suffixes_same_second_saves() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("staged.png");
        write_png(&RgbaBuffer::new(2, 2, Rgba::TRANSPARENT), &source).expect("write png");

        let library = DirectoryLibrary::new(dir.path().join("library"));
        let first = library.save_at(&source, fixed_time()).expect("first save");
        let second = library.save_at(&source, fixed_time()).expect("second save");

        assert!(first.ends_with("memely_20260102_030405.png"));
        assert!(second.ends_with("memely_20260102_030405_2.png"));
        assert!(first.exists() && second.exists());
    }

    #[test]
    fn staged_png_is_clipped_to_canvas() {
        let dir = tempdir().expect("tempdir");
        let capture = RgbaBuffer::new(10, 8, Rgba { r: 9, g: 8, b: 7, a: 255 });
        let path = stage_capture(&capture, Size::new(4.0, 3.0), dir.path(), fixed_time())
            .expect("stage");

        let decoded = image::open(&path).expect("decode").to_rgba8();
        assert_eq!(decoded.dimensions(), (4, 3));
        assert_eq!(decoded.get_pixel(3, 2).0, [9, 8, 7, 255]);
    }

    #[test]
    fn empty_capture_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let capture = RgbaBuffer::new(4, 4, Rgba::TRANSPARENT);
        assert!(stage_capture(&capture, Size::default(), dir.path(), fixed_time()).is_err());
    }
}
