//! Command and query interface for the topology editor.
//!
//! This crate defines the typed command language a UI layer (or a script)
//! uses to drive [`containment::Editor`]. Commands describe user intent:
//! - Serializable (for recording, replay and scripting)
//! - Intent-based (drag this node, not "resize that container")
//! - Time-stamped by the caller, since the engines are clock-free
//!
//! # Example
//! ```ignore
//! use api::{execute_command, Command};
//!
//! let cmd = Command::DragMove {
//!     id: router,
//!     position: Vec2::new(240.0, 130.0),
//! };
//! let result = execute_command(&mut editor, cmd, Instant::now());
//! ```

mod command;
mod executor;
mod query;
mod target;

pub use command::*;
pub use executor::{execute_command, execute_query};
pub use query::*;
pub use target::*;
