pub mod logging;
pub mod meme;

pub use meme::{
    DirectoryLibrary, EditorAction, EditorSession, EditorSettings, ExportOutcome, ImportOutcome,
    SceneState,
};
