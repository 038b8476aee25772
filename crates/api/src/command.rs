//! Editor commands - every operation that changes editor state.
//!
//! Commands are intent-based: they describe what the user did (pressed
//! a key, dragged a node, dropped it), not how the containers should
//! react. The editor's engines handle:
//! - Growing parents around moved children
//! - Previewing and committing embeds
//! - Automatic exits and restacking

use crate::Target;
use containment::{AlignMode, DistributeMode, Engine, ModifierKey};
use glam::Vec2;
use node::{ContainerSpec, DeviceSpec, NodeId};
use serde::{Deserialize, Serialize};

/// A command that modifies editor state.
///
/// Commands are serializable for:
/// - Recording interaction sessions
/// - Replaying them against a fresh editor
/// - Scripting
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // === Structure ===
    /// Create a device, optionally inside a container.
    CreateDevice {
        position: Vec2,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<NodeId>,
        #[serde(flatten)]
        spec: DeviceSpec,
    },

    /// Create a container. Without a size it starts at its minimum.
    CreateContainer {
        position: Vec2,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        size: Option<Vec2>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        parent: Option<NodeId>,
        #[serde(flatten)]
        spec: ContainerSpec,
    },

    /// Move a node (and its subtree) to an absolute position.
    Move { id: NodeId, position: Vec2 },

    /// Remove nodes together with their subtrees.
    Remove { target: Target },

    // === Containment ===
    AddToContainer { child: NodeId, container: NodeId },

    RemoveFromContainer { child: NodeId, container: NodeId },

    /// Detach every child of a container.
    ClearContainer { container: NodeId },

    /// Commit an embed outside of a drop, e.g. from a context menu.
    EmbedCommit { child: NodeId, parent: NodeId },

    // === Pointer ===
    DragStart { id: NodeId },

    DragMove { id: NodeId, position: Vec2 },

    DragEnd { id: NodeId },

    ResizeStart { id: NodeId },

    Resize { id: NodeId, size: Vec2 },

    ResizeEnd { id: NodeId },

    // === Keyboard and window ===
    ModifierPress { key: ModifierKey },

    ModifierRelease { key: ModifierKey },

    WindowBlur,

    /// Lock or unlock the canvas.
    SetLocked { locked: bool },

    // === Engine controls ===
    SetEngine { engine: Engine, enabled: bool },

    PauseAutoExpand,

    ResumeAutoExpand,

    /// Grow a container to fit its children right now.
    ManualExpand { container: NodeId },

    // === Arrange ===
    Align { target: Target, mode: AlignMode },

    Distribute { target: Target, mode: DistributeMode },

    // === Time ===
    /// Run every timer due at the command's timestamp.
    Advance,

    // === Batch ===
    /// Execute multiple commands in sequence.
    Batch { commands: Vec<Command> },
}

/// Result of executing a command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandResult {
    /// Command succeeded.
    Success {
        /// IDs of nodes created, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        created: Vec<NodeId>,
        /// IDs of nodes modified, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        modified: Vec<NodeId>,
        /// IDs of nodes deleted, if any.
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        deleted: Vec<NodeId>,
    },
    /// Command was rejected; the editor is unchanged.
    Error { message: String },
}

impl CommandResult {
    pub fn success() -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn created(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: ids,
            modified: vec![],
            deleted: vec![],
        }
    }

    pub fn modified(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: ids,
            deleted: vec![],
        }
    }

    pub fn deleted(ids: Vec<NodeId>) -> Self {
        Self::Success {
            created: vec![],
            modified: vec![],
            deleted: ids,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use node::DeviceType;

    #[test]
    fn drag_move_serializes_with_type_field() {
        let cmd = Command::DragMove {
            id: NodeId::named("router"),
            position: Vec2::new(240.0, 130.0),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "drag_move");
        assert_eq!(json["position"], serde_json::json!([240.0, 130.0]));
    }

    #[test]
    fn create_device_flattens_spec_fields() {
        let json = r#"{
            "type": "create_device",
            "position": [100, 200],
            "parent": "zone-a",
            "name": "core-router",
            "device_type": "router",
            "ip": "10.0.0.1"
        }"#;
        let cmd: Command = serde_json::from_str(json).unwrap();

        match cmd {
            Command::CreateDevice {
                position,
                parent,
                spec,
            } => {
                assert_eq!(position, Vec2::new(100.0, 200.0));
                assert_eq!(parent, Some(NodeId::named("zone-a")));
                assert_eq!(spec.name.as_deref(), Some("core-router"));
                assert_eq!(spec.device_type, DeviceType::Router);
                assert_eq!(spec.ip.as_deref(), Some("10.0.0.1"));
                assert_eq!(spec.id, None);
            }
            _ => panic!("Expected CreateDevice command"),
        }
    }

    #[test]
    fn create_container_omits_unset_optionals() {
        let cmd = Command::CreateContainer {
            position: Vec2::ZERO,
            size: None,
            parent: None,
            spec: ContainerSpec::default(),
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "create_container");
        assert!(json.get("size").is_none());
        assert!(json.get("parent").is_none());
    }

    #[test]
    fn keyboard_and_engine_commands_use_snake_case() {
        let cmd: Command =
            serde_json::from_str(r#"{"type": "modifier_press", "key": "meta"}"#).unwrap();
        assert!(matches!(
            cmd,
            Command::ModifierPress {
                key: ModifierKey::Meta
            }
        ));

        let cmd: Command = serde_json::from_str(
            r#"{"type": "set_engine", "engine": "auto_exit", "enabled": false}"#,
        )
        .unwrap();
        assert!(matches!(
            cmd,
            Command::SetEngine {
                engine: Engine::AutoExit,
                enabled: false
            }
        ));
    }

    #[test]
    fn batch_command_contains_nested_commands() {
        let cmd = Command::Batch {
            commands: vec![Command::PauseAutoExpand, Command::Advance],
        };
        let json: serde_json::Value = serde_json::to_value(&cmd).unwrap();

        assert_eq!(json["type"], "batch");
        let commands = json["commands"].as_array().unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0]["type"], "pause_auto_expand");
        assert_eq!(commands[1]["type"], "advance");
    }

    #[test]
    fn result_omits_empty_lists() {
        let json = serde_json::to_value(CommandResult::created(vec![NodeId::named("a")])).unwrap();
        assert_eq!(json["status"], "success");
        assert!(json.get("modified").is_none());

        let json = serde_json::to_value(CommandResult::error("nope")).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "nope");
    }
}
