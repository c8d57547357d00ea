use crate::meme::catalog::CaptionPair;
use crate::meme::export::DirectoryLibrary;
use crate::meme::model::{Background, Color};
use crate::meme::palette::BACKGROUND_PALETTE;
use crate::meme::scene::SceneConfig;
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE_NAME: &str = "memely_settings.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorSettings {
    #[serde(default)]
    pub debug_logging: bool,
    #[serde(default)]
    pub log_file: Option<PathBuf>,
    #[serde(default = "default_seed_captions")]
    pub seed_captions: CaptionPair,
    #[serde(default = "default_seed_offset")]
    pub seed_offset: f32,
    #[serde(default = "default_recent_sticker_limit")]
    pub recent_sticker_limit: usize,
    #[serde(default = "default_background_color")]
    pub default_background: Color,
    #[serde(default)]
    pub export_folder: Option<PathBuf>,
    #[serde(default = "default_text")]
    pub default_text: String,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            debug_logging: false,
            log_file: None,
            seed_captions: default_seed_captions(),
            seed_offset: default_seed_offset(),
            recent_sticker_limit: default_recent_sticker_limit(),
            default_background: default_background_color(),
            export_folder: None,
            default_text: default_text(),
        }
    }
}

fn default_seed_captions() -> CaptionPair {
    CaptionPair::new("TOP TEXT", "BOTTOM TEXT")
}

fn default_seed_offset() -> f32 {
    140.0
}

fn default_recent_sticker_limit() -> usize {
    8
}

fn default_background_color() -> Color {
    BACKGROUND_PALETTE[0]
}

fn default_text() -> String {
    "TYPE YOUR CHAOS".to_string()
}

impl EditorSettings {
    pub fn sanitize(&mut self) {
        if !self.seed_offset.is_finite() {
            self.seed_offset = default_seed_offset();
        }
        self.recent_sticker_limit = self.recent_sticker_limit.max(1);
        if self.default_text.trim().is_empty() {
            self.default_text = default_text();
        }
    }

    pub fn scene_config(&self) -> SceneConfig {
        SceneConfig {
            seed_captions: self.seed_captions.clone(),
            seed_offset: self.seed_offset,
            recent_sticker_limit: self.recent_sticker_limit,
            default_background: Background::Color {
                color: self.default_background,
            },
            default_text: self.default_text.clone(),
        }
    }

    /// Library for saved memes: `export_folder` when set, otherwise the
    /// folder next to the executable.
    pub fn media_library(&self) -> Result<DirectoryLibrary> {
        match &self.export_folder {
            Some(folder) => Ok(DirectoryLibrary::new(folder.clone())),
            None => DirectoryLibrary::beside_executable(),
        }
    }

    pub fn init_logging(&self) {
        crate::logging::init(self.debug_logging, self.log_file.clone());
    }
}

pub fn settings_path_from_exe_path(exe_path: &Path) -> Result<PathBuf> {
    let parent = exe_path
        .parent()
        .ok_or_else(|| anyhow!("executable path has no parent: {}", exe_path.display()))?;
    Ok(parent.join(SETTINGS_FILE_NAME))
}

pub fn resolve_settings_path() -> Result<PathBuf> {
    let exe_path = std::env::current_exe().context("resolve current executable")?;
    settings_path_from_exe_path(&exe_path)
}

pub fn load() -> Result<EditorSettings> {
    load_from_path(&resolve_settings_path()?)
}

pub fn save(settings: &EditorSettings) -> Result<PathBuf> {
    let path = resolve_settings_path()?;
    save_to_path(&path, settings)?;
    Ok(path)
}

/// Missing or blank files yield the defaults.
pub fn load_from_path(path: &Path) -> Result<EditorSettings> {
    if !path.exists() {
        return Ok(EditorSettings::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("read editor settings file {}", path.display()))?;

    if content.trim().is_empty() {
        return Ok(EditorSettings::default());
    }

    let mut loaded: EditorSettings = serde_json::from_str(&content)
        .with_context(|| format!("deserialize editor settings file {}", path.display()))?;
    loaded.sanitize();
    Ok(loaded)
}

pub fn save_to_path(path: &Path, settings: &EditorSettings) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create editor settings parent folder {}", parent.display()))?;
    }

    let mut sanitized = settings.clone();
    sanitized.sanitize();
    let json = serde_json::to_string_pretty(&sanitized).context("serialize editor settings")?;
    std::fs::write(path, json)
        .with_context(|| format!("write editor settings file {}", path.display()))
}
