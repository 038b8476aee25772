use serde::{Deserialize, Serialize};

/// Keys that count as the "free move" modifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModifierKey {
    Control,
    Meta,
}

/// Whether the free-move modifier is held.
///
/// Either key sets it and releasing either clears it. Losing focus always
/// clears it: a key released while another window had focus never
/// reaches us, and a stuck modifier would silently disable containment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ModifierState {
    held: bool,
}

impl ModifierState {
    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Returns true when this press changed the state.
    pub fn press(&mut self, _key: ModifierKey) -> bool {
        !std::mem::replace(&mut self.held, true)
    }

    /// Returns true when this release changed the state.
    pub fn release(&mut self, _key: ModifierKey) -> bool {
        std::mem::replace(&mut self.held, false)
    }

    pub fn blur(&mut self) -> bool {
        std::mem::replace(&mut self.held, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_release_report_transitions() {
        let mut state = ModifierState::default();
        assert!(state.press(ModifierKey::Control));
        assert!(!state.press(ModifierKey::Meta));
        assert!(state.is_held());
        assert!(state.release(ModifierKey::Meta));
        assert!(!state.release(ModifierKey::Control));
    }

    #[test]
    fn blur_releases() {
        let mut state = ModifierState::default();
        state.press(ModifierKey::Meta);
        assert!(state.blur());
        assert!(!state.is_held());
        assert!(!state.blur());
    }
}
