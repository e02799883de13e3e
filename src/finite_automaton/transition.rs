//! Finite automaton transitions: `(fromState, toState, input)`.

use crate::automaton::transition::{join_key, split_key, TransitionRecord};
use crate::errors::Result;

/// One finite automaton rule. Identity is the canonical key
/// `from-to-input`; mutating a field changes the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaTransition {
    from_state: String,
    to_state: String,
    input: String,
}

impl FaTransition {
    pub fn new(from_state: &str, to_state: &str, input: &str) -> Self {
        FaTransition {
            from_state: from_state.to_string(),
            to_state: to_state.to_string(),
            input: input.to_string(),
        }
    }

    /// Input symbol consumed by this transition; empty means epsilon.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Builds the canonical key for the given fields.
    pub fn generate_key(from_state: &str, to_state: &str, input: &str) -> String {
        join_key(&[from_state, to_state, input])
    }

    pub fn from_state_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 3)?[0].to_string())
    }

    pub fn to_state_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 3)?[1].to_string())
    }

    pub fn input_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 3)?[2].to_string())
    }

    /// Parses a well-formed key back into its fields.
    pub(crate) fn parse_key(key: &str) -> Result<FaTransition> {
        let fields = split_key(key, 3)?;
        Ok(FaTransition::new(fields[0], fields[1], fields[2]))
    }
}

impl TransitionRecord for FaTransition {
    fn key(&self) -> String {
        FaTransition::generate_key(&self.from_state, &self.to_state, &self.input)
    }

    fn from_state(&self) -> &str {
        &self.from_state
    }

    fn to_state(&self) -> &str {
        &self.to_state
    }

    fn set_from_state(&mut self, label: &str) {
        self.from_state = label.to_string();
    }

    fn set_to_state(&mut self, label: &str) {
        self.to_state = label.to_string();
    }
}
