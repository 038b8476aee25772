use crate::bounds::Bounds;
use crate::coords::{CanvasPoint, CanvasSize};
use crate::NodeId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// The kind of node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeKind {
    Device,
    Container,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DeviceType {
    #[default]
    Server,
    Switch,
    Router,
    Firewall,
    Storage,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Normal,
    Warning,
    Error,
    Offline,
}

/// Metadata carried by a device node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceData {
    pub device_type: DeviceType,
    pub name: String,
    pub status: NodeStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Placed by hand rather than imported from a template.
    #[serde(default)]
    pub is_manual: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Metadata carried by a container (zone, data center, ...).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContainerData {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub min_width: f32,
    pub min_height: f32,
    pub padding: f32,
    pub auto_expand: bool,
    /// Children as last recorded for persistence. The canvas hierarchy is
    /// authoritative; this list is kept in step by containment transitions.
    #[serde(default)]
    pub children_ids: Vec<NodeId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ContainerData {
    pub fn min_size(&self) -> CanvasSize {
        CanvasSize::new(self.min_width, self.min_height)
    }

    /// Records `child`, returns false when it was already listed.
    pub fn record_child(&mut self, child: NodeId) -> bool {
        if self.children_ids.contains(&child) {
            return false;
        }
        self.children_ids.push(child);
        self.touch();
        true
    }

    /// Forgets `child`, returns false when it was not listed.
    pub fn forget_child(&mut self, child: NodeId) -> bool {
        let before = self.children_ids.len();
        self.children_ids.retain(|id| *id != child);
        let removed = self.children_ids.len() != before;
        if removed {
            self.touch();
        }
        removed
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodePayload {
    Device(DeviceData),
    Container(ContainerData),
}

/// Highlight drawn around a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Highlight {
    #[default]
    None,
    /// The node would receive the dragged shape if it were dropped now.
    EmbedTarget,
}

/// Transient visual state used for drag feedback.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct NodeStyle {
    pub opacity: f32,
    pub shadow: bool,
    pub highlight: Highlight,
}

impl Default for NodeStyle {
    fn default() -> Self {
        Self {
            opacity: 1.0,
            shadow: false,
            highlight: Highlight::None,
        }
    }
}

/// Z-index layers.
pub struct ZLayer;

impl ZLayer {
    pub const CONTAINER: i32 = 0;
    pub const DEVICE: i32 = 10;
    /// Added per nesting level.
    pub const NESTING_STEP: i32 = 10;
    pub const DRAGGING: i32 = 1000;
}

/// A node on the canvas.
///
/// Position and size are absolute canvas coordinates at every nesting
/// depth. Attaching a node to a container never changes them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub position: CanvasPoint,
    pub size: CanvasSize,
    /// Parent container (None for root-level nodes)
    pub parent: Option<NodeId>,
    /// Child node IDs (only containers have children)
    pub children: Vec<NodeId>,
    /// Unset means "use the default layer for the kind".
    pub z_index: Option<i32>,
    pub payload: NodePayload,
    #[serde(default)]
    pub style: NodeStyle,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self.payload {
            NodePayload::Device(_) => NodeKind::Device,
            NodePayload::Container(_) => NodeKind::Container,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind() == NodeKind::Container
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::from_origin_size(self.position, self.size)
    }

    pub fn name(&self) -> &str {
        match &self.payload {
            NodePayload::Device(data) => &data.name,
            NodePayload::Container(data) => &data.name,
        }
    }

    pub fn device_data(&self) -> Option<&DeviceData> {
        match &self.payload {
            NodePayload::Device(data) => Some(data),
            _ => None,
        }
    }

    pub fn container_data(&self) -> Option<&ContainerData> {
        match &self.payload {
            NodePayload::Container(data) => Some(data),
            _ => None,
        }
    }

    pub fn container_data_mut(&mut self) -> Option<&mut ContainerData> {
        match &mut self.payload {
            NodePayload::Container(data) => Some(data),
            _ => None,
        }
    }

    /// Minimum size for containers, zero for devices.
    pub fn min_size(&self) -> CanvasSize {
        self.container_data()
            .map(ContainerData::min_size)
            .unwrap_or_default()
    }
}
