//! Editor queries - read-only access to editor state.
//!
//! Queries let a script or a UI panel inspect the diagram and the
//! interaction session before issuing commands.

use containment::SessionState;
use glam::Vec2;
use node::{DeviceType, Node, NodeId, NodeKind, NodePayload, NodeStatus};
use serde::{Deserialize, Serialize};

/// A query for editor state (read-only).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Query {
    /// Get a specific node by ID.
    GetNode { id: NodeId },

    /// Get all nodes in canvas order.
    GetAllNodes,

    /// Get the direct children of a container.
    GetChildren { id: NodeId },

    /// Get the interaction session and its suspension flags.
    GetSession,

    /// Get the container a drop would embed `id` into.
    GetDropTarget { id: NodeId },

    /// Get node count.
    GetNodeCount,

    /// Get the time until the next pending timer.
    GetNextDeadline,
}

/// Response to a query.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QueryResult {
    /// Single node result.
    Node { node: Option<NodeInfo> },

    /// Node list result.
    Nodes { nodes: Vec<NodeInfo> },

    /// Session result.
    Session {
        state: SessionState,
        locked: bool,
        modifier_held: bool,
        expand_paused: bool,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        previewing: Option<NodeId>,
    },

    /// Drop target result.
    DropTarget { container: Option<NodeId> },

    /// Count result.
    Count { count: usize },

    /// Milliseconds until the next timer fires, zero when overdue.
    Deadline { in_ms: Option<u64> },
}

/// Serializable node information.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub position: Vec2,
    pub size: Vec2,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<DeviceType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<NodeStatus>,
}

impl From<&Node> for NodeInfo {
    fn from(node: &Node) -> Self {
        let (device_type, status) = match &node.payload {
            NodePayload::Device(data) => (Some(data.device_type), Some(data.status)),
            NodePayload::Container(_) => (None, None),
        };
        Self {
            id: node.id,
            kind: node.kind(),
            name: node.name().to_string(),
            position: node.position.0,
            size: node.size.0,
            parent: node.parent,
            children: node.children.clone(),
            z_index: node.z_index,
            device_type,
            status,
        }
    }
}
