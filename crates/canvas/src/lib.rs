//! In-memory diagram canvas.
//!
//! Stores topology nodes in insertion order, owns the parent/child
//! hierarchy and records every mutation as a [`CanvasEvent`]. Callers
//! drain the event queue and react to it; the canvas itself never calls
//! back into anything.

mod canvas;
mod event;

pub use canvas::Canvas;
pub use event::{CanvasEvent, Origin};
// Re-export coordinate types from node for convenience
pub use node::{Bounds, CanvasDelta, CanvasPoint, CanvasSize, LocalPoint, Node, NodeId};
