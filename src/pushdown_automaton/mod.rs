//! Pushdown automata over text symbols, in deterministic ([`dpda`]) and
//! nondeterministic ([`npda`]) flavours.
//!
//! The stack holds text symbols with the top at the end of the vector and
//! is seeded with the initial stack symbol `Z` on construction and reset.

pub mod dpda;
pub mod npda;
mod transition;

pub use dpda::DeterministicPushdownAutomaton;
pub use npda::{NonDeterministicPushdownAutomaton, PdaConfiguration};
pub use transition::PdaTransition;

use std::fmt::Debug;

use indexmap::IndexSet;

use crate::automaton::{AutomatonCore, State, TransitionRecord};
use crate::common::{format_list, Deterministic, NonDeterministic, INITIAL_STACK_SYMBOL};
use crate::errors::{AutomatonError, Result};
use crate::pushdown_automaton::npda::PdaFrontier;

/// A pushdown automaton state.
pub type PdaState = State<PdaTransition>;

/// Execution mode of a pushdown automaton.
pub trait PdaMode {
    const DETERMINISTIC: bool;
    type Runtime: Debug + Clone + Default + PartialEq;
}

impl PdaMode for Deterministic {
    const DETERMINISTIC: bool = true;
    type Runtime = ();
}

impl PdaMode for NonDeterministic {
    const DETERMINISTIC: bool = false;
    type Runtime = PdaFrontier;
}

/// A pushdown automaton: states, input and stack alphabets, a pending
/// input sequence and the live stack.
///
/// State labels and symbols must not contain `-` (the key delimiter) or
/// `,` (the push-string separator).
#[derive(Debug, Clone, PartialEq)]
pub struct PushdownAutomaton<M: PdaMode> {
    core: AutomatonCore<PdaTransition>,
    input_alphabet: IndexSet<String>,
    stack_alphabet: IndexSet<String>,
    input: Vec<String>,
    input_head: usize,
    stack: Vec<String>,
    runtime: M::Runtime,
}

impl<M: PdaMode> PushdownAutomaton<M> {
    pub fn new() -> Self {
        PushdownAutomaton {
            core: AutomatonCore::new(),
            input_alphabet: IndexSet::new(),
            stack_alphabet: IndexSet::new(),
            input: Vec::new(),
            input_head: 0,
            stack: vec![INITIAL_STACK_SYMBOL.to_string()],
            runtime: M::Runtime::default(),
        }
    }

    // ---- input sequence ----

    pub fn set_input(&mut self, input: &[String]) -> Result<()> {
        self.check_input_symbols(input)?;
        self.input = input.to_vec();
        self.input_head = 0;
        Ok(())
    }

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

    // ---- stack ----

    /// A copy of the stack, bottom first.
    pub fn stack(&self) -> Vec<String> {
        self.stack.clone()
    }

    pub fn stack_top(&self) -> Option<String> {
        self.stack.last().cloned()
    }

    // ---- states ----

    pub fn state_exists(&self, label: &str) -> bool {
        self.core.state_exists(label)
    }

    pub fn add_state(&mut self, label: &str, is_accept: bool) -> Result<()> {
        self.core.add_state(label, is_accept)
    }

    pub fn get_state(&self, label: &str) -> Result<PdaState> {
        self.core.state(label).map(|s| s.clone())
    }

    pub fn states(&self) -> Vec<PdaState> {
        self.core.states().cloned().collect()
    }

    pub fn update_state_label(&mut self, label: &str, new_label: &str) -> Result<()> {
        self.core.update_state_label(label, new_label)
    }

    pub fn remove_state(&mut self, label: &str, strict: bool) -> Result<()> {
        self.core.remove_state(label, strict)
    }

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

    pub fn accept_states(&self) -> Vec<PdaState> {
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

    pub fn current_state(&self) -> Result<String> {
        self.core.current_state().map(|s| s.to_string())
    }

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

    // ---- stack alphabet ----

    pub fn stack_alphabet(&self) -> Vec<String> {
        self.stack_alphabet.iter().cloned().collect()
    }

    pub fn stack_alphabet_symbol_exists(&self, symbol: &str) -> bool {
        self.stack_alphabet.contains(symbol)
    }

    pub fn set_stack_alphabet(&mut self, symbols: &[String], strict: bool) -> Result<()> {
        let new_set: IndexSet<String> = symbols
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        let dropped: IndexSet<String> = self
            .stack_alphabet
            .iter()
            .filter(|s| !new_set.contains(*s))
            .cloned()
            .collect();
        self.drop_stack_symbols(&dropped, strict)?;
        self.stack_alphabet = new_set;
        Ok(())
    }

    pub fn add_stack_alphabet(&mut self, symbols: &[String]) {
        for symbol in symbols {
            if !symbol.is_empty() {
                self.stack_alphabet.insert(symbol.clone());
            }
        }
    }

    pub fn remove_stack_alphabet_symbol(&mut self, symbol: &str, strict: bool) -> Result<()> {
        if !self.stack_alphabet.contains(symbol) {
            return Err(AutomatonError::StackAlphabetSymbolNotFound(
                symbol.to_string(),
            ));
        }
        let mut dropped = IndexSet::new();
        dropped.insert(symbol.to_string());
        self.drop_stack_symbols(&dropped, strict)?;
        self.stack_alphabet.shift_remove(symbol);
        Ok(())
    }

    pub fn remove_stack_alphabet_symbols(&mut self, symbols: &[String], strict: bool) -> Result<()> {
        let missing: Vec<&str> = symbols
            .iter()
            .filter(|s| !self.stack_alphabet.contains(*s))
            .map(|s| s.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AutomatonError::StackAlphabetSymbolNotFound(format!(
                "symbols not found: {}",
                format_list(&missing)
            )));
        }
        let dropped: IndexSet<String> = symbols.iter().cloned().collect();
        self.drop_stack_symbols(&dropped, strict)?;
        for symbol in symbols {
            self.stack_alphabet.shift_remove(symbol);
        }
        Ok(())
    }

    pub fn clear_stack_alphabet(&mut self, strict: bool) -> Result<()> {
        let dropped = self.stack_alphabet.clone();
        self.drop_stack_symbols(&dropped, strict)?;
        self.stack_alphabet.clear();
        Ok(())
    }

    fn drop_stack_symbols(&mut self, dropped: &IndexSet<String>, strict: bool) -> Result<()> {
        if dropped.is_empty() {
            return Ok(());
        }
        let uses = |t: &PdaTransition| {
            dropped.contains(t.stack_symbol())
                || t.push_symbols().iter().any(|s| dropped.contains(s))
        };
        let in_use = self.core.find_transition_keys(&uses);
        if strict && !in_use.is_empty() {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "cannot drop symbols still used in transitions: {}",
                format_list(&in_use)
            )));
        }
        self.core.remove_transitions_where(&uses);
        Ok(())
    }

    // ---- transitions ----

    /// Adds a transition after validating referential integrity, alphabet
    /// membership of the input, stack and push symbols, and (for the
    /// deterministic flavour) the determinism predicate.
    pub fn add_transition(
        &mut self,
        from_state: &str,
        to_state: &str,
        input: &str,
        stack_symbol: &str,
        push_symbol: &str,
    ) -> Result<()> {
        if !self.core.state_exists(from_state) {
            return Err(AutomatonError::StateNotFound(from_state.to_string()));
        }
        if !self.core.state_exists(to_state) {
            return Err(AutomatonError::StateNotFound(to_state.to_string()));
        }
        let record = PdaTransition::new(from_state, to_state, input, stack_symbol, push_symbol);
        self.check_trigger_symbols(&record)?;
        if M::DETERMINISTIC {
            self.check_determinism(&record, None)?;
        }
        self.core.add_transition_record(record)
    }

    fn check_trigger_symbols(&self, record: &PdaTransition) -> Result<()> {
        let input = record.input();
        if !input.is_empty() && !self.input_alphabet.contains(input) {
            return Err(AutomatonError::InvalidTransition(format!(
                "input not in alphabet: {}",
                input
            )));
        }
        if !self.stack_alphabet.contains(record.stack_symbol()) {
            return Err(AutomatonError::InvalidTransition(format!(
                "stack symbol not in stack alphabet: {}",
                record.stack_symbol()
            )));
        }
        for symbol in record.push_symbols() {
            if !self.stack_alphabet.contains(&symbol) {
                return Err(AutomatonError::InvalidTransition(format!(
                    "push symbol not in stack alphabet: {}",
                    symbol
                )));
            }
        }
        Ok(())
    }

    /// For one `(input, stackTop)` pair at most one transition may fire,
    /// and for a given stack top an epsilon transition excludes every
    /// non-epsilon transition and vice versa.
    fn check_determinism(&self, record: &PdaTransition, exclude: Option<&str>) -> Result<()> {
        let state = self.core.state(record.from_state())?;
        for t in state.iter_transitions() {
            if exclude == Some(t.key().as_str()) {
                continue;
            }
            if t.stack_symbol() != record.stack_symbol() {
                continue;
            }
            if t.input() == record.input()
                || t.input().is_empty() != record.input().is_empty()
            {
                return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                    "transition is not deterministic: {} on input {} with stack symbol {}",
                    record.from_state(),
                    record.input(),
                    record.stack_symbol()
                )));
            }
        }
        Ok(())
    }

    fn apply_transition_update(&mut self, old_key: &str, record: PdaTransition) -> Result<()> {
        if record.key() == old_key {
            return Ok(());
        }
        let old_from = PdaTransition::from_state_of_key(old_key)?;
        let old_to = PdaTransition::to_state_of_key(old_key)?;
        if !self.core.state_exists(&old_from) || !self.core.state_exists(&old_to) {
            return Err(AutomatonError::TransitionNotFound(old_key.to_string()));
        }
        if !self.core.state(&old_from)?.transition_exists(old_key) {
            return Err(AutomatonError::TransitionNotFound(old_key.to_string()));
        }
        self.check_trigger_symbols(&record)?;
        if M::DETERMINISTIC {
            let exclude = if record.from_state() == old_from {
                Some(old_key)
            } else {
                None
            };
            self.check_determinism(&record, exclude)?;
        }
        self.core.rekey_transition(old_key, &old_from, record)
    }

    pub fn update_transition_input(&mut self, key: &str, input: &str) -> Result<()> {
        let mut record = PdaTransition::parse_key(key)?;
        record.set_input(input);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_from_state(&mut self, key: &str, from_state: &str) -> Result<()> {
        if !self.core.state_exists(from_state) {
            return Err(AutomatonError::StateNotFound(from_state.to_string()));
        }
        let mut record = PdaTransition::parse_key(key)?;
        record.set_from_state(from_state);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_to_state(&mut self, key: &str, to_state: &str) -> Result<()> {
        if !self.core.state_exists(to_state) {
            return Err(AutomatonError::StateNotFound(to_state.to_string()));
        }
        let mut record = PdaTransition::parse_key(key)?;
        record.set_to_state(to_state);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_stack_symbol(&mut self, key: &str, stack_symbol: &str) -> Result<()> {
        let mut record = PdaTransition::parse_key(key)?;
        record.set_stack_symbol(stack_symbol);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_push_symbol(&mut self, key: &str, push_symbol: &str) -> Result<()> {
        let mut record = PdaTransition::parse_key(key)?;
        record.set_push_symbol(push_symbol);
        self.apply_transition_update(key, record)
    }

    pub fn transition_exists(&self, key: &str) -> bool {
        match PdaTransition::from_state_of_key(key) {
            Ok(from) => self
                .core
                .state(&from)
                .map(|s| s.transition_exists(key))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    pub fn get_transition(&self, key: &str) -> Result<PdaTransition> {
        let from = PdaTransition::from_state_of_key(key)?;
        self.core.state(&from)?.transition(key)
    }

    pub fn transitions(&self) -> Vec<PdaTransition> {
        self.core.all_transitions()
    }

    pub fn remove_transition(&mut self, key: &str) -> Result<()> {
        let from = PdaTransition::from_state_of_key(key)?;
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

    /// Applies `record` to `stack`: pops the matched top, then pushes the
    /// push string left to right so its rightmost symbol ends on top.
    fn apply_to_stack(record: &PdaTransition, stack: &mut Vec<String>) {
        stack.pop();
        for symbol in record.push_symbols() {
            stack.push(symbol);
        }
    }
}

impl<M: PdaMode> Default for PushdownAutomaton<M> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn sample() -> NonDeterministicPushdownAutomaton {
        let mut pda = NonDeterministicPushdownAutomaton::new();
        pda.add_input_alphabet(&symbols(&["a"]));
        pda.add_stack_alphabet(&symbols(&["Z", "A"]));
        pda.add_state("q0", false).unwrap();
        pda.add_state("q1", true).unwrap();
        pda.set_start_state("q0").unwrap();
        pda.add_transition("q0", "q1", "a", "Z", "Z,A").unwrap();
        pda
    }

    #[test]
    fn the_stack_is_seeded_with_z() {
        let pda = sample();
        assert_eq!(pda.stack(), symbols(&["Z"]));
        assert_eq!(pda.stack_top().unwrap(), "Z");
    }

    #[test]
    fn trigger_symbols_must_be_members() {
        let mut pda = sample();
        assert!(matches!(
            pda.add_transition("q0", "q1", "b", "Z", ""),
            Err(AutomatonError::InvalidTransition(_))
        ));
        assert!(matches!(
            pda.add_transition("q0", "q1", "a", "B", ""),
            Err(AutomatonError::InvalidTransition(_))
        ));
        assert!(matches!(
            pda.add_transition("q0", "q1", "a", "A", "Z,B"),
            Err(AutomatonError::InvalidTransition(_))
        ));
    }

    #[test]
    fn strict_stack_alphabet_removal_blocks_on_push_strings() {
        let mut pda = sample();
        let err = pda.remove_stack_alphabet_symbol("A", true).unwrap_err();
        assert!(matches!(
            err,
            AutomatonError::InvalidAutomatonDefinition(_)
        ));
        pda.remove_stack_alphabet_symbol("A", false).unwrap();
        assert!(pda.transitions().is_empty());
    }

    #[test]
    fn missing_stack_symbols_are_reported_in_batch() {
        let mut pda = sample();
        let err = pda
            .remove_stack_alphabet_symbols(&symbols(&["A", "B", "C"]), false)
            .unwrap_err();
        assert_eq!(
            err,
            AutomatonError::StackAlphabetSymbolNotFound(
                "symbols not found: [B, C]".to_string()
            )
        );
    }

    #[test]
    fn update_rewrites_the_push_string() {
        let mut pda = sample();
        pda.update_transition_push_symbol("q0-q1-a-Z-Z,A", "A")
            .unwrap();
        assert!(pda.transition_exists("q0-q1-a-Z-A"));
        assert!(!pda.transition_exists("q0-q1-a-Z-Z,A"));
    }

    #[test]
    fn stack_rewrite_pushes_rightmost_on_top() {
        let record = PdaTransition::new("q0", "q0", "(", "Z", "Z,A");
        let mut stack = vec!["Z".to_string()];
        PushdownAutomaton::<NonDeterministic>::apply_to_stack(&record, &mut stack);
        assert_eq!(stack, symbols(&["Z", "A"]));
    }
}
