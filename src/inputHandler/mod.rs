// Input handler module for pointer-driven window interaction
// Handles drag/resize gestures, edge and window-to-window snapping

pub mod gesture;
pub mod spatial;
pub mod types;

pub use gesture::{GestureController, PointerOutcome};
pub use types::*;
