pub mod background;
pub mod catalog;
pub mod composite;
pub mod edit;
pub mod editor;
pub mod export;
pub mod factory;
pub mod gesture;
pub mod ids;
pub mod model;
pub mod palette;
pub mod platform;
pub mod scene;
pub mod settings;

pub use editor::{EditorAction, EditorSession, ImportOutcome};
pub use export::{DirectoryLibrary, ExportOutcome};
pub use gesture::{Anchor, ControllerEvent, GestureInput, Placement, TransformController};
pub use ids::{IdSource, LayerId, RandomIds, SequentialIds};
pub use model::{Background, Color, Layer, LayerKind, LayerType, Size, Transform};
pub use scene::{SceneConfig, SceneState};
pub use settings::EditorSettings;
