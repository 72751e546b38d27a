pub mod scene;
pub mod selection;
pub mod settings;
pub mod sketch;

pub use scene::{ImportReport, SceneObject, SceneState};
pub use selection::{Selection, SelectionContext, SelectionState};
pub use settings::EditorSettings;
pub use sketch::{SketchMode, SketchRelease, SketchShape, SketchState, SketchTool};
