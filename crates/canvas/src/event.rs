use node::NodeId;
use serde::{Deserialize, Serialize};

/// Who caused a geometry change.
///
/// Engines write through the canvas like anyone else. Tagging their writes
/// lets listeners ignore changes they produced themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// Pointer, keyboard or API driven.
    #[default]
    User,
    /// Written by auto-expand.
    Expand,
    /// Speculative resize shown while dragging.
    Preview,
    /// Position restore around attach/detach.
    Transition,
}

/// Events recorded by the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CanvasEvent {
    NodeAdded {
        id: NodeId,
    },
    NodeRemoved {
        id: NodeId,
        parent: Option<NodeId>,
    },
    NodeMoved {
        id: NodeId,
        origin: Origin,
    },
    NodeResized {
        id: NodeId,
        origin: Origin,
    },
    Embedded {
        child: NodeId,
        parent: NodeId,
    },
    Unembedded {
        child: NodeId,
        parent: NodeId,
    },
    /// Payload changed (names, cached children, ...).
    DataChanged {
        id: NodeId,
    },
}

impl CanvasEvent {
    /// The node the event is about.
    pub fn node(&self) -> NodeId {
        match self {
            CanvasEvent::NodeAdded { id }
            | CanvasEvent::NodeRemoved { id, .. }
            | CanvasEvent::NodeMoved { id, .. }
            | CanvasEvent::NodeResized { id, .. }
            | CanvasEvent::DataChanged { id } => *id,
            CanvasEvent::Embedded { child, .. } | CanvasEvent::Unembedded { child, .. } => *child,
        }
    }

    pub fn origin(&self) -> Option<Origin> {
        match self {
            CanvasEvent::NodeMoved { origin, .. } | CanvasEvent::NodeResized { origin, .. } => {
                Some(*origin)
            }
            _ => None,
        }
    }
}
