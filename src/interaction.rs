//! Hover state machine, keyed by region name.
//!
//! Each mounted region is either `Normal` or `Highlighted`. Pointer-enter moves it to
//! `Highlighted`, pointer-leave back to `Normal`; anything else is a no-op. The machine
//! does not enforce a single highlighted region: during fast pointer movement two
//! regions may briefly both be highlighted.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HoverState {
    #[default]
    Normal,
    Highlighted,
}

/// Result of feeding one pointer event to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The region's state changed to the contained state.
    Changed(HoverState),
    /// Already in the target state, or unknown region.
    Unchanged,
}

#[derive(Debug, Default)]
pub struct HoverMachine {
    states: HashMap<String, HoverState>,
}

impl HoverMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a region in `Normal`.
    pub fn register(&mut self, name: &str) {
        self.states.insert(name.to_string(), HoverState::Normal);
    }

    pub fn state(&self, name: &str) -> Option<HoverState> {
        self.states.get(name).copied()
    }

    pub fn enter(&mut self, name: &str) -> Transition {
        self.set(name, HoverState::Highlighted)
    }

    pub fn leave(&mut self, name: &str) -> Transition {
        self.set(name, HoverState::Normal)
    }

    fn set(&mut self, name: &str, target: HoverState) -> Transition {
        match self.states.get_mut(name) {
            Some(state) if *state != target => {
                *state = target;
                Transition::Changed(target)
            }
            _ => Transition::Unchanged,
        }
    }

    /// Names currently highlighted, sorted.
    pub fn highlighted(&self) -> Vec<&str> {
        let mut out: Vec<&str> = self
            .states
            .iter()
            .filter(|(_, s)| **s == HoverState::Highlighted)
            .map(|(n, _)| n.as_str())
            .collect();
        out.sort_unstable();
        out
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Forget every region (unmount).
    pub fn clear(&mut self) {
        self.states.clear();
    }
}
