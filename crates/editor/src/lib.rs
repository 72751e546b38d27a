// Library crate: scene model, picking, selection and sketch tooling.
// The binary only wires logging and the JSON command loop around it.

pub mod build;
pub mod command;
pub mod editor;
pub mod error;
pub mod extrude;
pub mod fixtures;
pub mod harness;
pub mod render;
pub mod state;
pub mod validation;
pub mod viewport;

pub use editor::{Editor, PointerOutcome};
pub use error::{EditorError, EditorResult};
