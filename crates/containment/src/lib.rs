//! Containment core for the topology editor.
//!
//! Keeps containers wrapped around their children while the user drags
//! things about:
//!
//! - [`z_order`]: children always stack above their ancestors
//! - [`auto_expand`]: containers grow (never shrink) to fit their children
//! - [`preview`]: empty containers show the size they would need on drop
//! - [`transition`]: position-preserving attach/detach and automatic exit
//! - [`session`]: the drag/resize state machine and its suspension flags
//!
//! [`Editor`] ties these together and is what callers normally use.
//! Nothing in here reads a clock; every time-dependent call takes `now`.

pub mod align;
pub mod auto_expand;
pub mod config;
mod editor;
pub mod keyboard;
pub mod preview;
pub mod session;
pub mod timer;
pub mod transition;
pub mod visual;
pub mod z_order;

pub use align::{AlignMode, DistributeMode};
pub use config::{DropConfig, EditorConfig, ExitConfig, ExpandConfig, PreviewConfig, VisualConfig};
pub use editor::{Editor, Engine};
pub use keyboard::ModifierKey;
pub use session::SessionState;
