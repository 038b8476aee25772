//! Pointer interaction state and the suspension flags it owns.

use crate::keyboard::{ModifierKey, ModifierState};
use node::NodeId;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    #[default]
    Idle,
    Dragging {
        node: NodeId,
    },
    /// Dragging with a container ready to receive the node.
    Embedding {
        node: NodeId,
        target: NodeId,
    },
    Resizing {
        node: NodeId,
    },
}

/// The single active interaction.
#[derive(Debug, Default)]
pub struct InteractionSession {
    state: SessionState,
    modifier: ModifierState,
    locked: bool,
    /// Paused from the UI.
    expand_paused: bool,
}

impl InteractionSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_idle(&self) -> bool {
        self.state == SessionState::Idle
    }

    /// Node being dragged, whether or not a target is lined up.
    pub fn dragged(&self) -> Option<NodeId> {
        match self.state {
            SessionState::Dragging { node } | SessionState::Embedding { node, .. } => Some(node),
            _ => None,
        }
    }

    pub fn embed_target(&self) -> Option<NodeId> {
        match self.state {
            SessionState::Embedding { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn resizing(&self) -> Option<NodeId> {
        match self.state {
            SessionState::Resizing { node } => Some(node),
            _ => None,
        }
    }

    /// Idle -> Dragging. Any other state is left as is.
    pub fn begin_drag(&mut self, node: NodeId) -> bool {
        if !self.is_idle() {
            log::debug!("drag of {} ignored in {:?}", node, self.state);
            return false;
        }
        self.state = SessionState::Dragging { node };
        true
    }

    /// Switches between Dragging and Embedding as the candidate changes.
    pub fn set_embed_target(&mut self, target: Option<NodeId>) {
        if let Some(node) = self.dragged() {
            self.state = match target {
                Some(target) => SessionState::Embedding { node, target },
                None => SessionState::Dragging { node },
            };
        }
    }

    /// Back to Idle. Returns the dragged node and its last target.
    pub fn end_drag(&mut self) -> Option<(NodeId, Option<NodeId>)> {
        let ended = self.dragged().map(|node| (node, self.embed_target()));
        if ended.is_some() {
            self.state = SessionState::Idle;
        }
        ended
    }

    pub fn begin_resize(&mut self, node: NodeId) -> bool {
        if !self.is_idle() {
            return false;
        }
        self.state = SessionState::Resizing { node };
        true
    }

    pub fn end_resize(&mut self) -> Option<NodeId> {
        let node = self.resizing();
        if node.is_some() {
            self.state = SessionState::Idle;
        }
        node
    }

    /// Forgets a removed node if it is the one being interacted with.
    pub fn forget(&mut self, id: NodeId) {
        let involved = match self.state {
            SessionState::Idle => false,
            SessionState::Dragging { node } | SessionState::Resizing { node } => node == id,
            SessionState::Embedding { node, target } => node == id || target == id,
        };
        if involved {
            self.state = match self.state {
                SessionState::Embedding { node, .. } if node != id => {
                    SessionState::Dragging { node }
                }
                _ => SessionState::Idle,
            };
        }
    }

    pub fn modifier_pressed(&mut self, key: ModifierKey) -> bool {
        self.modifier.press(key)
    }

    pub fn modifier_released(&mut self, key: ModifierKey) -> bool {
        self.modifier.release(key)
    }

    pub fn window_blurred(&mut self) -> bool {
        self.modifier.blur()
    }

    pub fn modifier_held(&self) -> bool {
        self.modifier.is_held()
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn pause_expand(&mut self) {
        self.expand_paused = true;
    }

    pub fn resume_expand(&mut self) {
        self.expand_paused = false;
    }

    pub fn is_expand_paused(&self) -> bool {
        self.expand_paused
    }

    /// Auto-expand must not run.
    pub fn expand_suspended(&self) -> bool {
        self.locked
            || self.modifier.is_held()
            || self.expand_paused
            || self.resizing().is_some()
    }

    /// Automatic exit must not run.
    pub fn exit_suppressed(&self) -> bool {
        self.locked || self.modifier.is_held()
    }

    pub fn preview_suppressed(&self) -> bool {
        self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drag_lifecycle() {
        let node = NodeId::from_u128(1);
        let target = NodeId::from_u128(2);
        let mut session = InteractionSession::new();

        assert!(session.begin_drag(node));
        assert!(!session.begin_drag(target));
        session.set_embed_target(Some(target));
        assert_eq!(session.state(), SessionState::Embedding { node, target });
        session.set_embed_target(None);
        assert_eq!(session.state(), SessionState::Dragging { node });
        session.set_embed_target(Some(target));

        assert_eq!(session.end_drag(), Some((node, Some(target))));
        assert!(session.is_idle());
        assert_eq!(session.end_drag(), None);
    }

    #[test]
    fn resize_suspends_expand() {
        let node = NodeId::from_u128(1);
        let mut session = InteractionSession::new();
        assert!(session.begin_resize(node));
        assert!(session.expand_suspended());
        assert!(!session.exit_suppressed());
        assert_eq!(session.end_resize(), Some(node));
        assert!(!session.expand_suspended());
    }

    #[test]
    fn lock_overrides_modifier() {
        let mut session = InteractionSession::new();
        session.set_locked(true);
        session.modifier_pressed(ModifierKey::Control);
        session.window_blurred();
        assert!(!session.modifier_held());
        assert!(session.expand_suspended());
        assert!(session.exit_suppressed());
        assert!(session.preview_suppressed());

        session.set_locked(false);
        assert!(!session.expand_suspended());
    }

    #[test]
    fn session_state_serializes_with_tag() {
        let json = serde_json::to_value(SessionState::Resizing {
            node: NodeId::from_u128(3),
        })
        .unwrap();
        assert_eq!(json["state"], "resizing");
    }
}
