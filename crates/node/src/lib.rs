//! Node types for the topology canvas.
//!
//! Devices are leaf shapes; containers own children. Every position and
//! size in this crate is an absolute canvas coordinate, whatever the
//! nesting depth of the node.

pub mod bounds;
pub mod coords;
pub mod factory;
mod node;
mod node_id;

pub use bounds::Bounds;
pub use coords::{to_global, to_local, CanvasDelta, CanvasPoint, CanvasSize, LocalPoint};
pub use factory::{create_container, create_device, ContainerSpec, DeviceSpec};
pub use node::{
    ContainerData, DeviceData, DeviceType, Highlight, Node, NodeKind, NodePayload, NodeStatus,
    NodeStyle, ZLayer,
};
pub use node_id::NodeId;
