//! Finite automata over text symbols, in deterministic ([`dfa`]) and
//! nondeterministic ([`nfa`]) flavours.
//!
//! Both flavours share one storage and mutation surface; the mode marker
//! decides whether the determinism predicate runs and which executor is
//! available.

pub mod dfa;
pub mod nfa;
mod transition;

pub use dfa::DeterministicFiniteAutomaton;
pub use nfa::NonDeterministicFiniteAutomaton;
pub use transition::FaTransition;

use std::fmt::Debug;

use indexmap::IndexSet;

use crate::automaton::{AutomatonCore, State, TransitionRecord};
use crate::common::{format_list, Deterministic, NonDeterministic};
use crate::errors::{AutomatonError, Result};
use crate::finite_automaton::nfa::FaFrontier;

/// A finite automaton state.
pub type FaState = State<FaTransition>;

/// Execution mode of a finite automaton: decides whether the determinism
/// predicate guards mutations and what runtime data the executor keeps.
pub trait FaMode {
    const DETERMINISTIC: bool;
    type Runtime: Debug + Clone + Default + PartialEq;
}

impl FaMode for Deterministic {
    const DETERMINISTIC: bool = true;
    type Runtime = ();
}

impl FaMode for NonDeterministic {
    const DETERMINISTIC: bool = false;
    type Runtime = FaFrontier;
}

/// A finite automaton: states, an input alphabet, a pending input sequence
/// and (for the nondeterministic flavour) the frontier of possible current
/// states.
///
/// State labels and symbols must not contain `-`, the canonical key
/// delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct FiniteAutomaton<M: FaMode> {
    core: AutomatonCore<FaTransition>,
    input_alphabet: IndexSet<String>,
    input: Vec<String>,
    input_head: usize,
    runtime: M::Runtime,
}

impl<M: FaMode> FiniteAutomaton<M> {
    pub fn new() -> Self {
        FiniteAutomaton {
            core: AutomatonCore::new(),
            input_alphabet: IndexSet::new(),
            input: Vec::new(),
            input_head: 0,
            runtime: M::Runtime::default(),
        }
    }

    // ---- input sequence ----

    /// Replaces the pending input and rewinds the head. Every symbol must
    /// be an input alphabet member.
    pub fn set_input(&mut self, input: &[String]) -> Result<()> {
        self.check_input_symbols(input)?;
        self.input = input.to_vec();
        self.input_head = 0;
        Ok(())
    }

    /// Appends to the pending input without moving the head.
    pub fn add_input(&mut self, input: &[String]) -> Result<()> {
        self.check_input_symbols(input)?;
        self.input.extend_from_slice(input);
        Ok(())
    }

    pub fn input(&self) -> &[String] {
        &self.input
    }

    pub fn input_head(&self) -> usize {
        self.input_head
    }

    pub fn set_input_head(&mut self, head: usize) {
        self.input_head = head;
    }

    fn check_input_symbols(&self, input: &[String]) -> Result<()> {
        for symbol in input {
            if !self.input_alphabet.contains(symbol) {
                return Err(AutomatonError::InputAlphabetSymbolNotFound(symbol.clone()));
            }
        }
        Ok(())
    }

    // ---- states ----

    pub fn state_exists(&self, label: &str) -> bool {
        self.core.state_exists(label)
    }

    pub fn add_state(&mut self, label: &str, is_accept: bool) -> Result<()> {
        self.core.add_state(label, is_accept)
    }

    /// Returns a copy of the state; mutating it does not affect the
    /// automaton.
    pub fn get_state(&self, label: &str) -> Result<FaState> {
        self.core.state(label).map(|s| s.clone())
    }

    pub fn states(&self) -> Vec<FaState> {
        self.core.states().cloned().collect()
    }

    /// Relabels a state, rewriting every owned and incoming transition and
    /// the start/current references.
    pub fn update_state_label(&mut self, label: &str, new_label: &str) -> Result<()> {
        self.core.update_state_label(label, new_label)
    }

    /// Removes a state. With `strict` set, fails while transitions still
    /// enter it; otherwise those transitions are deleted with it.
    pub fn remove_state(&mut self, label: &str, strict: bool) -> Result<()> {
        self.core.remove_state(label, strict)
    }

    /// Batched removal with all-or-nothing semantics.
    pub fn remove_states(&mut self, labels: &[String], strict: bool) -> Result<()> {
        self.core.remove_states(labels, strict)
    }

    pub fn clear_states(&mut self) {
        self.core.clear_states();
    }

    // ---- accept states ----

    pub fn add_accept_state(&mut self, label: &str) -> Result<()> {
        self.core.set_accept(label, true)
    }

    pub fn add_accept_states(&mut self, labels: &[String]) -> Result<()> {
        self.core.set_accept_batch(labels, true)
    }

    pub fn remove_accept_state(&mut self, label: &str) -> Result<()> {
        self.core.set_accept(label, false)
    }

    pub fn remove_accept_states(&mut self, labels: &[String]) -> Result<()> {
        self.core.set_accept_batch(labels, false)
    }

    pub fn clear_accept_states(&mut self) {
        self.core.clear_accept_states();
    }

    pub fn accept_states(&self) -> Vec<FaState> {
        self.core.accept_states()
    }

    // ---- start / current ----

    pub fn set_start_state(&mut self, label: &str) -> Result<()> {
        self.core.set_start_state(label)
    }

    pub fn start_state(&self) -> Result<String> {
        self.core.start_state().map(|s| s.to_string())
    }

    pub fn set_current_state(&mut self, label: &str) -> Result<()> {
        self.core.set_current_state(label)
    }

    /// The live state, falling back to the start state when unset.
    pub fn current_state(&self) -> Result<String> {
        self.core.current_state().map(|s| s.to_string())
    }

    /// Accept flag of the current state.
    pub fn is_accepting(&self) -> Result<bool> {
        let current = self.core.current_state()?;
        Ok(self.core.state(current)?.is_accept())
    }

    // ---- input alphabet ----

    pub fn input_alphabet(&self) -> Vec<String> {
        self.input_alphabet.iter().cloned().collect()
    }

    pub fn input_alphabet_symbol_exists(&self, symbol: &str) -> bool {
        self.input_alphabet.contains(symbol)
    }

    /// Replaces the alphabet. Epsilon is silently skipped. With `strict`
    /// set, fails if a transition still consumes a dropped symbol;
    /// otherwise those transitions are deleted.
    pub fn set_input_alphabet(&mut self, symbols: &[String], strict: bool) -> Result<()> {
        let new_set: IndexSet<String> = symbols
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        let dropped: IndexSet<String> = self
            .input_alphabet
            .iter()
            .filter(|s| !new_set.contains(*s))
            .cloned()
            .collect();
        self.drop_input_symbols(&dropped, strict)?;
        self.input_alphabet = new_set;
        Ok(())
    }

    /// Adds symbols to the alphabet; epsilon is silently skipped.
    pub fn add_input_alphabet(&mut self, symbols: &[String]) {
        for symbol in symbols {
            if !symbol.is_empty() {
                self.input_alphabet.insert(symbol.clone());
            }
        }
    }

    pub fn remove_input_alphabet_symbol(&mut self, symbol: &str, strict: bool) -> Result<()> {
        if !self.input_alphabet.contains(symbol) {
            return Err(AutomatonError::InputAlphabetSymbolNotFound(
                symbol.to_string(),
            ));
        }
        let mut dropped = IndexSet::new();
        dropped.insert(symbol.to_string());
        self.drop_input_symbols(&dropped, strict)?;
        self.input_alphabet.shift_remove(symbol);
        Ok(())
    }

    pub fn remove_input_alphabet_symbols(&mut self, symbols: &[String], strict: bool) -> Result<()> {
        let missing: Vec<&str> = symbols
            .iter()
            .filter(|s| !self.input_alphabet.contains(*s))
            .map(|s| s.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AutomatonError::InputAlphabetSymbolNotFound(format!(
                "symbols not found: {}",
                format_list(&missing)
            )));
        }
        let dropped: IndexSet<String> = symbols.iter().cloned().collect();
        self.drop_input_symbols(&dropped, strict)?;
        for symbol in symbols {
            self.input_alphabet.shift_remove(symbol);
        }
        Ok(())
    }

    pub fn clear_input_alphabet(&mut self, strict: bool) -> Result<()> {
        let dropped = self.input_alphabet.clone();
        self.drop_input_symbols(&dropped, strict)?;
        self.input_alphabet.clear();
        Ok(())
    }

    /// Strict mode refuses while transitions consume any dropped symbol;
    /// non-strict deletes those transitions.
    fn drop_input_symbols(&mut self, dropped: &IndexSet<String>, strict: bool) -> Result<()> {
        if dropped.is_empty() {
            return Ok(());
        }
        let in_use = self
            .core
            .find_transition_keys(|t| dropped.contains(t.input()));
        if strict && !in_use.is_empty() {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "cannot drop symbols still used in transitions: {}",
                format_list(&in_use)
            )));
        }
        self.core
            .remove_transitions_where(|t| dropped.contains(t.input()));
        Ok(())
    }

    // ---- transitions ----

    /// Adds a transition after validating referential integrity, alphabet
    /// membership and (for the deterministic flavour) the determinism
    /// predicate.
    pub fn add_transition(&mut self, from_state: &str, to_state: &str, input: &str) -> Result<()> {
        if !self.core.state_exists(from_state) {
            return Err(AutomatonError::StateNotFound(from_state.to_string()));
        }
        if !self.core.state_exists(to_state) {
            return Err(AutomatonError::StateNotFound(to_state.to_string()));
        }
        self.check_input_symbol(input)?;
        if M::DETERMINISTIC {
            self.check_determinism(from_state, input, None)?;
        }
        self.core
            .add_transition_record(FaTransition::new(from_state, to_state, input))
    }

    fn check_input_symbol(&self, input: &str) -> Result<()> {
        if !input.is_empty() && !self.input_alphabet.contains(input) {
            return Err(AutomatonError::InvalidTransition(format!(
                "input not in alphabet: {}",
                input
            )));
        }
        Ok(())
    }

    /// No two transitions out of one state may share an input symbol, and
    /// epsilon is never allowed. `exclude` names the key of a transition
    /// being updated, which must not conflict with itself.
    fn check_determinism(&self, from_state: &str, input: &str, exclude: Option<&str>) -> Result<()> {
        if input.is_empty() {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "transition is not deterministic: epsilon transition from {}",
                from_state
            )));
        }
        let state = self.core.state(from_state)?;
        for t in state.iter_transitions() {
            if exclude == Some(t.key().as_str()) {
                continue;
            }
            if t.input() == input {
                return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                    "transition is not deterministic: {} already transitions on {}",
                    from_state, input
                )));
            }
        }
        Ok(())
    }

    /// Shared tail of the `update_transition_*` operations: `record`
    /// carries the post-update fields, `old_key` identifies the original.
    fn apply_transition_update(&mut self, old_key: &str, record: FaTransition) -> Result<()> {
        if record.key() == old_key {
            return Ok(());
        }
        let old_from = FaTransition::from_state_of_key(old_key)?;
        let old_to = FaTransition::to_state_of_key(old_key)?;
        if !self.core.state_exists(&old_from) || !self.core.state_exists(&old_to) {
            return Err(AutomatonError::TransitionNotFound(old_key.to_string()));
        }
        if !self.core.state(&old_from)?.transition_exists(old_key) {
            return Err(AutomatonError::TransitionNotFound(old_key.to_string()));
        }
        self.check_input_symbol(record.input())?;
        if M::DETERMINISTIC {
            let exclude = if record.from_state() == old_from {
                Some(old_key)
            } else {
                None
            };
            self.check_determinism(record.from_state(), record.input(), exclude)?;
        }
        self.core.rekey_transition(old_key, &old_from, record)
    }

    /// Changes the input symbol of the transition stored under `key`.
    /// Generating the identical key is a no-op, not a duplicate.
    pub fn update_transition_input(&mut self, key: &str, input: &str) -> Result<()> {
        let mut record = FaTransition::parse_key(key)?;
        record.set_input(input);
        self.apply_transition_update(key, record)
    }

    /// Moves the transition to a different owning state.
    pub fn update_transition_from_state(&mut self, key: &str, from_state: &str) -> Result<()> {
        if !self.core.state_exists(from_state) {
            return Err(AutomatonError::StateNotFound(from_state.to_string()));
        }
        let mut record = FaTransition::parse_key(key)?;
        record.set_from_state(from_state);
        self.apply_transition_update(key, record)
    }

    /// Redirects the transition to a different target state.
    pub fn update_transition_to_state(&mut self, key: &str, to_state: &str) -> Result<()> {
        if !self.core.state_exists(to_state) {
            return Err(AutomatonError::StateNotFound(to_state.to_string()));
        }
        let mut record = FaTransition::parse_key(key)?;
        record.set_to_state(to_state);
        self.apply_transition_update(key, record)
    }

    pub fn transition_exists(&self, key: &str) -> bool {
        match FaTransition::from_state_of_key(key) {
            Ok(from) => self
                .core
                .state(&from)
                .map(|s| s.transition_exists(key))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    /// Returns a copy of the transition stored under `key`.
    pub fn get_transition(&self, key: &str) -> Result<FaTransition> {
        let from = FaTransition::from_state_of_key(key)?;
        self.core.state(&from)?.transition(key)
    }

    /// Every transition of the automaton, in state order.
    pub fn transitions(&self) -> Vec<FaTransition> {
        self.core.all_transitions()
    }

    pub fn remove_transition(&mut self, key: &str) -> Result<()> {
        let from = FaTransition::from_state_of_key(key)?;
        if !self.core.state_exists(&from) {
            return Err(AutomatonError::StateNotFound(from));
        }
        self.core.remove_transition_in(&from, key)
    }

    pub fn clear_transitions_between(&mut self, from_state: &str, to_state: &str) -> Result<()> {
        self.core.clear_transitions_between(from_state, to_state)
    }

    pub fn clear_state_transitions(&mut self, label: &str) -> Result<()> {
        self.core.clear_state_transitions(label)
    }

    pub fn clear_transitions(&mut self) {
        self.core.clear_transitions();
    }
}

impl<M: FaMode> Default for FiniteAutomaton<M> {
    fn default() -> Self {
        Self::new()
    }
}
