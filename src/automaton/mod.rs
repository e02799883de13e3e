//! Generic storage core shared by every automaton family.
//!
//! Owns the state table and the start/current bookkeeping, and implements
//! the cross-cutting pieces of the mutation API: duplicate detection,
//! rename cascades, strict and non-strict removal, and transition
//! re-keying with ownership transfer. Families layer their alphabets,
//! validation and executors on top.

pub(crate) mod state;
pub(crate) mod transition;

pub use state::State;
pub use transition::{TransitionRecord, KEY_DELIMITER};

use indexmap::IndexMap;

use crate::common::format_list;
use crate::errors::{AutomatonError, Result};

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AutomatonCore<T> {
    states: IndexMap<String, State<T>>,
    start_state: Option<String>,
    current_state: Option<String>,
}

impl<T: TransitionRecord> AutomatonCore<T> {
    pub(crate) fn new() -> Self {
        AutomatonCore {
            states: IndexMap::new(),
            start_state: None,
            current_state: None,
        }
    }

    // ---- states ----

    pub(crate) fn state_exists(&self, label: &str) -> bool {
        self.states.contains_key(label)
    }

    pub(crate) fn state_count(&self) -> usize {
        self.states.len()
    }

    pub(crate) fn add_state(&mut self, label: &str, is_accept: bool) -> Result<()> {
        if self.state_exists(label) {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "state with label {} already exists",
                label
            )));
        }
        self.states
            .insert(label.to_string(), State::new(label, is_accept));
        Ok(())
    }

    pub(crate) fn state(&self, label: &str) -> Result<&State<T>> {
        self.states
            .get(label)
            .ok_or_else(|| AutomatonError::StateNotFound(label.to_string()))
    }

    pub(crate) fn state_mut(&mut self, label: &str) -> Result<&mut State<T>> {
        self.states
            .get_mut(label)
            .ok_or_else(|| AutomatonError::StateNotFound(label.to_string()))
    }

    pub(crate) fn states(&self) -> impl Iterator<Item = &State<T>> {
        self.states.values()
    }

    /// Relabels a state and chases down every reference to the old label:
    /// owned transitions, incoming transitions, start and current state.
    pub(crate) fn update_state_label(&mut self, label: &str, new_label: &str) -> Result<()> {
        if self.state_exists(new_label) {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "state with label {} already exists",
                new_label
            )));
        }
        let mut state = self
            .states
            .shift_remove(label)
            .ok_or_else(|| AutomatonError::StateNotFound(label.to_string()))?;
        state.set_label(new_label);
        self.states.insert(new_label.to_string(), state);

        for state in self.states.values_mut() {
            state.retarget_transitions(label, new_label);
        }
        if self.start_state.as_deref() == Some(label) {
            self.start_state = Some(new_label.to_string());
        }
        if self.current_state.as_deref() == Some(label) {
            self.current_state = Some(new_label.to_string());
        }
        Ok(())
    }

    /// Keys of transitions entering any of `targets`, paired with their
    /// owner's label.
    fn incoming_transitions(&self, targets: &[&str]) -> Vec<(String, String)> {
        let mut found = Vec::new();
        for state in self.states.values() {
            for t in state.iter_transitions() {
                if targets.contains(&t.to_state()) {
                    found.push((state.label().to_string(), t.key()));
                }
            }
        }
        found
    }

    pub(crate) fn remove_state(&mut self, label: &str, strict: bool) -> Result<()> {
        if !self.state_exists(label) {
            return Err(AutomatonError::StateNotFound(label.to_string()));
        }
        let incoming = self.incoming_transitions(&[label]);
        if strict && !incoming.is_empty() {
            let keys: Vec<&str> = incoming.iter().map(|(_, k)| k.as_str()).collect();
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "cannot remove state {} because it is used in transitions: {}",
                label,
                format_list(&keys)
            )));
        }
        for (owner, key) in incoming {
            if let Some(state) = self.states.get_mut(&owner) {
                let _ = state.remove_transition(&key);
            }
        }
        self.states.shift_remove(label);
        if self.start_state.as_deref() == Some(label) {
            self.start_state = None;
        }
        if self.current_state.as_deref() == Some(label) {
            self.current_state = None;
        }
        Ok(())
    }

    /// Batched removal. Both prechecks (existence, strict references) run
    /// before any mutation, so a failure leaves the core untouched.
    pub(crate) fn remove_states(&mut self, labels: &[String], strict: bool) -> Result<()> {
        let missing: Vec<&str> = labels
            .iter()
            .filter(|l| !self.state_exists(l))
            .map(|l| l.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AutomatonError::StateNotFound(format!(
                "states not found: {}",
                format_list(&missing)
            )));
        }
        let targets: Vec<&str> = labels.iter().map(|l| l.as_str()).collect();
        let incoming = self.incoming_transitions(&targets);
        if strict && !incoming.is_empty() {
            let keys: Vec<&str> = incoming.iter().map(|(_, k)| k.as_str()).collect();
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "cannot remove states because they are used in transitions: {}",
                format_list(&keys)
            )));
        }
        for (owner, key) in incoming {
            if let Some(state) = self.states.get_mut(&owner) {
                let _ = state.remove_transition(&key);
            }
        }
        for label in labels {
            self.states.shift_remove(label);
            if self.start_state.as_deref() == Some(label.as_str()) {
                self.start_state = None;
            }
            if self.current_state.as_deref() == Some(label.as_str()) {
                self.current_state = None;
            }
        }
        Ok(())
    }

    pub(crate) fn clear_states(&mut self) {
        self.states.clear();
        self.start_state = None;
        self.current_state = None;
    }

    // ---- accept states ----

    pub(crate) fn set_accept(&mut self, label: &str, is_accept: bool) -> Result<()> {
        self.state_mut(label)?.set_is_accept(is_accept);
        Ok(())
    }

    pub(crate) fn set_accept_batch(&mut self, labels: &[String], is_accept: bool) -> Result<()> {
        let missing: Vec<&str> = labels
            .iter()
            .filter(|l| !self.state_exists(l))
            .map(|l| l.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AutomatonError::StateNotFound(format!(
                "states not found: {}",
                format_list(&missing)
            )));
        }
        for label in labels {
            if let Some(state) = self.states.get_mut(label) {
                state.set_is_accept(is_accept);
            }
        }
        Ok(())
    }

    pub(crate) fn clear_accept_states(&mut self) {
        for state in self.states.values_mut() {
            state.set_is_accept(false);
        }
    }

    pub(crate) fn accept_states(&self) -> Vec<State<T>> {
        self.states
            .values()
            .filter(|s| s.is_accept())
            .cloned()
            .collect()
    }

    // ---- start / current ----

    pub(crate) fn set_start_state(&mut self, label: &str) -> Result<()> {
        if !self.state_exists(label) {
            return Err(AutomatonError::StateNotFound(label.to_string()));
        }
        self.start_state = Some(label.to_string());
        if self.current_state.is_none() {
            self.current_state = Some(label.to_string());
        }
        Ok(())
    }

    pub(crate) fn start_state(&self) -> Result<&str> {
        self.start_state
            .as_deref()
            .ok_or_else(|| AutomatonError::InvalidStartState("start state is not set".to_string()))
    }

    pub(crate) fn set_current_state(&mut self, label: &str) -> Result<()> {
        if !self.state_exists(label) {
            return Err(AutomatonError::StateNotFound(label.to_string()));
        }
        self.current_state = Some(label.to_string());
        Ok(())
    }

    /// The live state, falling back to the start state when no step has
    /// been taken yet.
    pub(crate) fn current_state(&self) -> Result<&str> {
        self.current_state
            .as_deref()
            .or_else(|| self.start_state.as_deref())
            .ok_or_else(|| {
                AutomatonError::InvalidAutomatonDefinition(
                    "current state and start state are not set".to_string(),
                )
            })
    }

    pub(crate) fn reset_current(&mut self) {
        self.current_state = self.start_state.clone();
    }

    // ---- transitions ----

    pub(crate) fn add_transition_record(&mut self, record: T) -> Result<()> {
        let from = record.from_state().to_string();
        self.state_mut(&from)?.add_transition(record)
    }

    /// Re-keys a transition after a field update. `old_from` is the owner
    /// parsed from the old key; when the update moves the transition to a
    /// different owner this is an ownership transfer, not a copy.
    pub(crate) fn rekey_transition(&mut self, old_key: &str, old_from: &str, record: T) -> Result<()> {
        if record.key() == old_key {
            return Ok(());
        }
        if record.from_state() == old_from {
            return self.state_mut(old_from)?.replace_transition(old_key, record);
        }
        if !self.state(old_from)?.transition_exists(old_key) {
            return Err(AutomatonError::TransitionNotFound(old_key.to_string()));
        }
        let new_key = record.key();
        if self.state(record.from_state())?.transition_exists(&new_key) {
            return Err(AutomatonError::InvalidTransition(format!(
                "transition already exists: {}",
                new_key
            )));
        }
        let new_from = record.from_state().to_string();
        self.state_mut(old_from)?.remove_transition(old_key)?;
        self.state_mut(&new_from)?.add_transition(record)
    }

    pub(crate) fn remove_transition_in(&mut self, from: &str, key: &str) -> Result<()> {
        self.state_mut(from)?.remove_transition(key)
    }

    pub(crate) fn clear_transitions_between(&mut self, from: &str, to: &str) -> Result<()> {
        if !self.state_exists(to) {
            return Err(AutomatonError::StateNotFound(to.to_string()));
        }
        self.state_mut(from)?.remove_transitions_to(to);
        Ok(())
    }

    pub(crate) fn clear_state_transitions(&mut self, label: &str) -> Result<()> {
        self.state_mut(label)?.clear_transitions();
        Ok(())
    }

    pub(crate) fn clear_transitions(&mut self) {
        for state in self.states.values_mut() {
            state.clear_transitions();
        }
    }

    pub(crate) fn all_transitions(&self) -> Vec<T> {
        self.states
            .values()
            .flat_map(|s| s.transitions())
            .collect()
    }

    /// Keys of every transition matching `pred`, used by the strict-mode
    /// alphabet checks.
    pub(crate) fn find_transition_keys<F: Fn(&T) -> bool>(&self, pred: F) -> Vec<String> {
        self.states
            .values()
            .flat_map(|s| s.iter_transitions())
            .filter(|t| pred(t))
            .map(|t| t.key())
            .collect()
    }

    pub(crate) fn remove_transitions_where<F: Fn(&T) -> bool>(&mut self, pred: F) {
        for state in self.states.values_mut() {
            state.remove_transitions_where(&pred);
        }
    }
}
