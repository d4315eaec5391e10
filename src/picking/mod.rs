//! Block picking and editing

pub mod editor;
pub mod picker;

pub use editor::{BlockEditor, EditError};
pub use picker::{BlockPicker, Face, FixedStepPicker, RayHit};
