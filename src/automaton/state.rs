//! A named state and the transitions it owns.

use indexmap::IndexMap;

use crate::automaton::transition::TransitionRecord;
use crate::errors::{AutomatonError, Result};

/// One state of an automaton: a label, an accept flag and the transitions
/// leaving it, indexed by canonical key.
///
/// Invariant: every owned record's `from_state` equals this state's label.
/// Relabeling rewrites the owned records and re-indexes them.
#[derive(Debug, Clone, PartialEq)]
pub struct State<T> {
    label: String,
    is_accept: bool,
    transitions: IndexMap<String, T>,
}

impl<T: TransitionRecord> State<T> {
    pub(crate) fn new(label: &str, is_accept: bool) -> Self {
        State {
            label: label.to_string(),
            is_accept,
            transitions: IndexMap::new(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_accept(&self) -> bool {
        self.is_accept
    }

    pub(crate) fn set_is_accept(&mut self, is_accept: bool) {
        self.is_accept = is_accept;
    }

    /// Relabels the state, rewriting every owned transition's `from_state`
    /// and re-indexing under the regenerated keys.
    pub(crate) fn set_label(&mut self, label: &str) {
        self.label = label.to_string();
        let old = std::mem::take(&mut self.transitions);
        for (_, mut record) in old {
            record.set_from_state(label);
            self.transitions.insert(record.key(), record);
        }
    }

    pub fn transition_exists(&self, key: &str) -> bool {
        self.transitions.contains_key(key)
    }

    /// Returns a copy of the transition stored under `key`.
    pub fn transition(&self, key: &str) -> Result<T> {
        self.transitions
            .get(key)
            .cloned()
            .ok_or_else(|| AutomatonError::TransitionNotFound(key.to_string()))
    }

    /// Materialises copies of every owned transition, in insertion order.
    pub fn transitions(&self) -> Vec<T> {
        self.transitions.values().cloned().collect()
    }

    pub(crate) fn iter_transitions(&self) -> impl Iterator<Item = &T> {
        self.transitions.values()
    }

    pub(crate) fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    pub(crate) fn add_transition(&mut self, record: T) -> Result<()> {
        let key = record.key();
        if self.transitions.contains_key(&key) {
            return Err(AutomatonError::InvalidTransition(format!(
                "transition already exists: {}",
                key
            )));
        }
        self.transitions.insert(key, record);
        Ok(())
    }

    /// Swaps the record stored under `old_key` for `record`, which carries
    /// the updated fields. Updating a field to its current value yields the
    /// same key and is a no-op, not a duplicate.
    pub(crate) fn replace_transition(&mut self, old_key: &str, record: T) -> Result<()> {
        if !self.transitions.contains_key(old_key) {
            return Err(AutomatonError::TransitionNotFound(old_key.to_string()));
        }
        let new_key = record.key();
        if new_key == old_key {
            return Ok(());
        }
        if self.transitions.contains_key(&new_key) {
            return Err(AutomatonError::InvalidTransition(format!(
                "transition already exists: {}",
                new_key
            )));
        }
        self.transitions.shift_remove(old_key);
        self.transitions.insert(new_key, record);
        Ok(())
    }

    pub(crate) fn remove_transition(&mut self, key: &str) -> Result<()> {
        self.transitions
            .shift_remove(key)
            .map(|_| ())
            .ok_or_else(|| AutomatonError::TransitionNotFound(key.to_string()))
    }

    /// Drops every transition entering `to_state`.
    pub(crate) fn remove_transitions_to(&mut self, to_state: &str) {
        self.transitions.retain(|_, t| t.to_state() != to_state);
    }

    /// Drops every transition matching `pred`.
    pub(crate) fn remove_transitions_where<F: Fn(&T) -> bool>(&mut self, pred: F) {
        self.transitions.retain(|_, t| !pred(t));
    }

    /// Rewrites owned transitions entering `old_to` to enter `new_to`,
    /// re-indexing them. Records that become identical under the new target
    /// collapse into one.
    pub(crate) fn retarget_transitions(&mut self, old_to: &str, new_to: &str) {
        let keys: Vec<String> = self
            .transitions
            .iter()
            .filter(|(_, t)| t.to_state() == old_to)
            .map(|(k, _)| k.clone())
            .collect();
        for key in keys {
            if let Some(mut record) = self.transitions.shift_remove(&key) {
                record.set_to_state(new_to);
                let new_key = record.key();
                self.transitions.entry(new_key).or_insert(record);
            }
        }
    }

    pub(crate) fn clear_transitions(&mut self) {
        self.transitions.clear();
    }
}
