//! Turing machines over text symbols, in deterministic ([`dtm`]) and
//! nondeterministic ([`ntm`]) flavours.
//!
//! A machine cycle reads the tape under the head, writes, moves and
//! switches state; input reaches the machine by being loaded onto the
//! tape. The input alphabet is always a subset of the tape alphabet, and
//! the blank symbol is always a tape alphabet member.

pub mod dtm;
pub mod ntm;
mod tape;
mod transition;

pub use dtm::DeterministicTuringMachine;
pub use ntm::{NonDeterministicTuringMachine, TmConfiguration};
pub use tape::Tape;
pub use transition::TmTransition;

use std::fmt::Debug;

use indexmap::IndexSet;

use crate::automaton::{AutomatonCore, State, TransitionRecord};
use crate::common::{
    format_list, Deterministic, Direction, NonDeterministic, DEFAULT_BLANK_SYMBOL,
};
use crate::errors::{AutomatonError, Result};
use crate::turing_machine::ntm::TmFrontier;

/// A Turing machine state.
pub type TmState = State<TmTransition>;

/// Execution mode of a Turing machine.
pub trait TmMode {
    const DETERMINISTIC: bool;
    type Runtime: Debug + Clone + Default + PartialEq;
}

impl TmMode for Deterministic {
    const DETERMINISTIC: bool = true;
    type Runtime = ();
}

impl TmMode for NonDeterministic {
    const DETERMINISTIC: bool = false;
    type Runtime = TmFrontier;
}

/// A Turing machine: states, input and tape alphabets, and the live tape.
///
/// State labels and symbols must not contain `-`, the key delimiter.
#[derive(Debug, Clone, PartialEq)]
pub struct TuringMachine<M: TmMode> {
    core: AutomatonCore<TmTransition>,
    input_alphabet: IndexSet<String>,
    tape_alphabet: IndexSet<String>,
    tape: Tape,
    runtime: M::Runtime,
}

impl<M: TmMode> TuringMachine<M> {
    /// A machine with the default blank symbol `_`.
    pub fn new() -> Self {
        Self::with_blank_symbol(DEFAULT_BLANK_SYMBOL)
    }

    /// A machine whose tape uses `blank_symbol`; the symbol becomes a tape
    /// alphabet member immediately.
    pub fn with_blank_symbol(blank_symbol: &str) -> Self {
        let mut tape_alphabet = IndexSet::new();
        tape_alphabet.insert(blank_symbol.to_string());
        TuringMachine {
            core: AutomatonCore::new(),
            input_alphabet: IndexSet::new(),
            tape_alphabet,
            tape: Tape::new(blank_symbol),
            runtime: M::Runtime::default(),
        }
    }

    // ---- tape ----

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Replaces the live tape. Every written cell must hold a tape
    /// alphabet member.
    pub fn set_tape(&mut self, tape: Tape) -> Result<()> {
        for symbol in tape.contents() {
            if !self.tape_alphabet.contains(&symbol) {
                return Err(AutomatonError::TapeAlphabetSymbolNotFound(symbol));
            }
        }
        self.tape = tape;
        Ok(())
    }

    pub fn blank_symbol(&self) -> String {
        self.tape.blank_symbol().to_string()
    }

    /// Changes the blank symbol, rewriting old blanks on the tape; the new
    /// symbol joins the tape alphabet.
    pub fn set_blank_symbol(&mut self, blank_symbol: &str) {
        self.tape.set_blank_symbol(blank_symbol);
        self.tape_alphabet.insert(blank_symbol.to_string());
    }

    /// Loads `input` onto a cleared tape, head at the left end. Every
    /// symbol must be an input alphabet member.
    pub fn set_input(&mut self, input: &[String]) -> Result<()> {
        self.check_input_symbols(input)?;
        self.tape.load_input(input);
        Ok(())
    }

    /// Appends `input` to the tape after the last written cell.
    pub fn add_input(&mut self, input: &[String]) -> Result<()> {
        self.check_input_symbols(input)?;
        self.tape.append(input);
        Ok(())
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

    pub fn get_state(&self, label: &str) -> Result<TmState> {
        self.core.state(label).map(|s| s.clone())
    }

    pub fn states(&self) -> Vec<TmState> {
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

    pub fn accept_states(&self) -> Vec<TmState> {
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

    /// Replaces the input alphabet. New symbols implicitly join the tape
    /// alphabet; dropped symbols stay tape members.
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
        self.drop_read_symbols(&dropped, strict)?;
        for symbol in &new_set {
            self.tape_alphabet.insert(symbol.clone());
        }
        self.input_alphabet = new_set;
        Ok(())
    }

    /// Adds symbols to the input alphabet, and implicitly to the tape
    /// alphabet.
    pub fn add_input_alphabet(&mut self, symbols: &[String]) {
        for symbol in symbols {
            if !symbol.is_empty() {
                self.input_alphabet.insert(symbol.clone());
                self.tape_alphabet.insert(symbol.clone());
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
        self.drop_read_symbols(&dropped, strict)?;
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
        self.drop_read_symbols(&dropped, strict)?;
        for symbol in symbols {
            self.input_alphabet.shift_remove(symbol);
        }
        Ok(())
    }

    pub fn clear_input_alphabet(&mut self, strict: bool) -> Result<()> {
        let dropped = self.input_alphabet.clone();
        self.drop_read_symbols(&dropped, strict)?;
        self.input_alphabet.clear();
        Ok(())
    }

    /// Strict mode refuses while transitions read any dropped symbol;
    /// non-strict deletes those transitions.
    fn drop_read_symbols(&mut self, dropped: &IndexSet<String>, strict: bool) -> Result<()> {
        if dropped.is_empty() {
            return Ok(());
        }
        let in_use = self
            .core
            .find_transition_keys(|t| dropped.contains(t.read_symbol()));
        if strict && !in_use.is_empty() {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "cannot drop symbols still used in transitions: {}",
                format_list(&in_use)
            )));
        }
        self.core
            .remove_transitions_where(|t| dropped.contains(t.read_symbol()));
        Ok(())
    }

    // ---- tape alphabet ----

    pub fn tape_alphabet(&self) -> Vec<String> {
        self.tape_alphabet.iter().cloned().collect()
    }

    pub fn tape_alphabet_symbol_exists(&self, symbol: &str) -> bool {
        self.tape_alphabet.contains(symbol)
    }

    /// Replaces the tape alphabet; the blank symbol is always retained.
    /// Symbols dropped here leave the input alphabet too.
    pub fn set_tape_alphabet(&mut self, symbols: &[String], strict: bool) -> Result<()> {
        let mut new_set: IndexSet<String> = symbols
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        new_set.insert(self.tape.blank_symbol().to_string());
        let dropped: IndexSet<String> = self
            .tape_alphabet
            .iter()
            .filter(|s| !new_set.contains(*s))
            .cloned()
            .collect();
        self.drop_tape_symbols(&dropped, strict)?;
        self.tape_alphabet = new_set;
        Ok(())
    }

    pub fn add_tape_alphabet(&mut self, symbols: &[String]) {
        for symbol in symbols {
            if !symbol.is_empty() {
                self.tape_alphabet.insert(symbol.clone());
            }
        }
    }

    pub fn remove_tape_alphabet_symbol(&mut self, symbol: &str, strict: bool) -> Result<()> {
        if !self.tape_alphabet.contains(symbol) {
            return Err(AutomatonError::TapeAlphabetSymbolNotFound(
                symbol.to_string(),
            ));
        }
        if symbol == self.tape.blank_symbol() {
            return Err(AutomatonError::InvalidAutomatonDefinition(
                "cannot remove the blank symbol from the tape alphabet".to_string(),
            ));
        }
        let mut dropped = IndexSet::new();
        dropped.insert(symbol.to_string());
        self.drop_tape_symbols(&dropped, strict)?;
        self.tape_alphabet.shift_remove(symbol);
        self.input_alphabet.shift_remove(symbol);
        Ok(())
    }

    pub fn remove_tape_alphabet_symbols(&mut self, symbols: &[String], strict: bool) -> Result<()> {
        let missing: Vec<&str> = symbols
            .iter()
            .filter(|s| !self.tape_alphabet.contains(*s))
            .map(|s| s.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(AutomatonError::TapeAlphabetSymbolNotFound(format!(
                "symbols not found: {}",
                format_list(&missing)
            )));
        }
        if symbols.iter().any(|s| s == self.tape.blank_symbol()) {
            return Err(AutomatonError::InvalidAutomatonDefinition(
                "cannot remove the blank symbol from the tape alphabet".to_string(),
            ));
        }
        let dropped: IndexSet<String> = symbols.iter().cloned().collect();
        self.drop_tape_symbols(&dropped, strict)?;
        for symbol in symbols {
            self.tape_alphabet.shift_remove(symbol);
            self.input_alphabet.shift_remove(symbol);
        }
        Ok(())
    }

    /// Empties the tape alphabet down to the blank symbol; the input
    /// alphabet empties with it.
    pub fn clear_tape_alphabet(&mut self, strict: bool) -> Result<()> {
        let blank = self.tape.blank_symbol().to_string();
        let dropped: IndexSet<String> = self
            .tape_alphabet
            .iter()
            .filter(|s| **s != blank)
            .cloned()
            .collect();
        self.drop_tape_symbols(&dropped, strict)?;
        self.tape_alphabet.retain(|s| *s == blank);
        self.input_alphabet.retain(|s| !dropped.contains(s));
        Ok(())
    }

    fn drop_tape_symbols(&mut self, dropped: &IndexSet<String>, strict: bool) -> Result<()> {
        if dropped.is_empty() {
            return Ok(());
        }
        let uses = |t: &TmTransition| {
            dropped.contains(t.read_symbol()) || dropped.contains(t.write_symbol())
        };
        let in_use = self.core.find_transition_keys(&uses);
        if strict && !in_use.is_empty() {
            return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                "cannot drop symbols still used in transitions: {}",
                format_list(&in_use)
            )));
        }
        self.core.remove_transitions_where(&uses);
        self.input_alphabet.retain(|s| !dropped.contains(s));
        Ok(())
    }

    // ---- transitions ----

    /// Adds a transition after validating referential integrity, tape
    /// alphabet membership of the read and write symbols, and (for the
    /// deterministic flavour) the determinism predicate.
    pub fn add_transition(
        &mut self,
        from_state: &str,
        to_state: &str,
        read_symbol: &str,
        write_symbol: &str,
        direction: Direction,
    ) -> Result<()> {
        if !self.core.state_exists(from_state) {
            return Err(AutomatonError::StateNotFound(from_state.to_string()));
        }
        if !self.core.state_exists(to_state) {
            return Err(AutomatonError::StateNotFound(to_state.to_string()));
        }
        let record = TmTransition::new(from_state, to_state, read_symbol, write_symbol, direction);
        self.check_trigger_symbols(&record)?;
        if M::DETERMINISTIC {
            self.check_determinism(&record, None)?;
        }
        self.core.add_transition_record(record)
    }

    fn check_trigger_symbols(&self, record: &TmTransition) -> Result<()> {
        let read = record.read_symbol();
        if !read.is_empty() && !self.tape_alphabet.contains(read) {
            return Err(AutomatonError::InvalidTransition(format!(
                "read symbol not in tape alphabet: {}",
                read
            )));
        }
        let write = record.write_symbol();
        if !write.is_empty() && !self.tape_alphabet.contains(write) {
            return Err(AutomatonError::InvalidTransition(format!(
                "write symbol not in tape alphabet: {}",
                write
            )));
        }
        Ok(())
    }

    /// Per state the read symbol must be unique, and a wildcard (empty)
    /// read excludes every concrete read and vice versa.
    fn check_determinism(&self, record: &TmTransition, exclude: Option<&str>) -> Result<()> {
        let state = self.core.state(record.from_state())?;
        for t in state.iter_transitions() {
            if exclude == Some(t.key().as_str()) {
                continue;
            }
            if t.read_symbol() == record.read_symbol()
                || t.read_symbol().is_empty() != record.read_symbol().is_empty()
            {
                return Err(AutomatonError::InvalidAutomatonDefinition(format!(
                    "transition is not deterministic: {} already reads {}",
                    record.from_state(),
                    t.read_symbol()
                )));
            }
        }
        Ok(())
    }

    fn apply_transition_update(&mut self, old_key: &str, record: TmTransition) -> Result<()> {
        if record.key() == old_key {
            return Ok(());
        }
        let old_from = TmTransition::from_state_of_key(old_key)?;
        let old_to = TmTransition::to_state_of_key(old_key)?;
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

    pub fn update_transition_from_state(&mut self, key: &str, from_state: &str) -> Result<()> {
        if !self.core.state_exists(from_state) {
            return Err(AutomatonError::StateNotFound(from_state.to_string()));
        }
        let mut record = TmTransition::parse_key(key)?;
        record.set_from_state(from_state);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_to_state(&mut self, key: &str, to_state: &str) -> Result<()> {
        if !self.core.state_exists(to_state) {
            return Err(AutomatonError::StateNotFound(to_state.to_string()));
        }
        let mut record = TmTransition::parse_key(key)?;
        record.set_to_state(to_state);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_read_symbol(&mut self, key: &str, read_symbol: &str) -> Result<()> {
        let mut record = TmTransition::parse_key(key)?;
        record.set_read_symbol(read_symbol);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_write_symbol(&mut self, key: &str, write_symbol: &str) -> Result<()> {
        let mut record = TmTransition::parse_key(key)?;
        record.set_write_symbol(write_symbol);
        self.apply_transition_update(key, record)
    }

    pub fn update_transition_direction(&mut self, key: &str, direction: Direction) -> Result<()> {
        let mut record = TmTransition::parse_key(key)?;
        record.set_direction(direction);
        self.apply_transition_update(key, record)
    }

    pub fn transition_exists(&self, key: &str) -> bool {
        match TmTransition::from_state_of_key(key) {
            Ok(from) => self
                .core
                .state(&from)
                .map(|s| s.transition_exists(key))
                .unwrap_or(false),
            Err(_) => false,
        }
    }

    pub fn get_transition(&self, key: &str) -> Result<TmTransition> {
        let from = TmTransition::from_state_of_key(key)?;
        self.core.state(&from)?.transition(key)
    }

    pub fn transitions(&self) -> Vec<TmTransition> {
        self.core.all_transitions()
    }

    pub fn remove_transition(&mut self, key: &str) -> Result<()> {
        let from = TmTransition::from_state_of_key(key)?;
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

    /// One machine cycle for `record` against `tape`: write (an empty
    /// write symbol leaves the cell alone), then move.
    fn apply_to_tape(record: &TmTransition, tape: &mut Tape) {
        if !record.write_symbol().is_empty() {
            tape.write(record.write_symbol());
        }
        tape.move_head(record.direction());
    }
}

impl<M: TmMode> Default for TuringMachine<M> {
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

    fn sample() -> NonDeterministicTuringMachine {
        let mut tm = NonDeterministicTuringMachine::new();
        tm.add_input_alphabet(&symbols(&["1"]));
        tm.add_state("q0", false).unwrap();
        tm.add_state("qa", true).unwrap();
        tm.set_start_state("q0").unwrap();
        tm.add_transition("q0", "qa", "1", "1", Direction::Right)
            .unwrap();
        tm
    }

    #[test]
    fn the_blank_symbol_is_a_tape_alphabet_member() {
        let tm = sample();
        assert!(tm.tape_alphabet_symbol_exists("_"));
        let custom: NonDeterministicTuringMachine =
            TuringMachine::with_blank_symbol("#");
        assert!(custom.tape_alphabet_symbol_exists("#"));
        assert_eq!(custom.blank_symbol(), "#");
    }

    #[test]
    fn input_symbols_implicitly_join_the_tape_alphabet() {
        let tm = sample();
        assert!(tm.tape_alphabet_symbol_exists("1"));
        assert_eq!(tm.input_alphabet(), symbols(&["1"]));
    }

    #[test]
    fn removing_a_tape_symbol_removes_it_from_the_input_alphabet() {
        let mut tm = sample();
        tm.remove_tape_alphabet_symbol("1", false).unwrap();
        assert!(!tm.tape_alphabet_symbol_exists("1"));
        assert!(!tm.input_alphabet_symbol_exists("1"));
        assert!(tm.transitions().is_empty());
    }

    #[test]
    fn the_blank_symbol_cannot_leave_the_tape_alphabet() {
        let mut tm = sample();
        assert!(matches!(
            tm.remove_tape_alphabet_symbol("_", false),
            Err(AutomatonError::InvalidAutomatonDefinition(_))
        ));
    }

    #[test]
    fn removing_an_input_symbol_keeps_it_on_the_tape_side() {
        let mut tm = sample();
        tm.remove_input_alphabet_symbol("1", false).unwrap();
        assert!(!tm.input_alphabet_symbol_exists("1"));
        assert!(tm.tape_alphabet_symbol_exists("1"));
    }

    #[test]
    fn trigger_symbols_must_be_tape_members() {
        let mut tm = sample();
        assert!(matches!(
            tm.add_transition("q0", "qa", "7", "1", Direction::Stay),
            Err(AutomatonError::InvalidTransition(_))
        ));
        assert!(matches!(
            tm.add_transition("q0", "qa", "_", "7", Direction::Stay),
            Err(AutomatonError::InvalidTransition(_))
        ));
        // blank and epsilon are both fine
        tm.add_transition("q0", "qa", "_", "", Direction::Stay)
            .unwrap();
    }

    #[test]
    fn set_tape_validates_cells() {
        let mut tm = sample();
        let mut tape = Tape::default();
        tape.write("9");
        assert!(matches!(
            tm.set_tape(tape),
            Err(AutomatonError::TapeAlphabetSymbolNotFound(_))
        ));
        let mut good = Tape::default();
        good.write("1");
        tm.set_tape(good).unwrap();
        assert_eq!(tm.tape().read(), "1");
    }

    #[test]
    fn changing_the_blank_symbol_updates_tape_and_alphabet() {
        let mut tm = sample();
        tm.set_input(&symbols(&["1"])).unwrap();
        tm.set_blank_symbol("#");
        assert!(tm.tape_alphabet_symbol_exists("#"));
        assert_eq!(tm.blank_symbol(), "#");
        let mut probe = tm.tape().clone();
        probe.set_head_position(5);
        assert_eq!(probe.read(), "#");
    }

    #[test]
    fn update_rewrites_the_direction() {
        let mut tm = sample();
        tm.update_transition_direction("q0-qa-1-1-R", Direction::Stay)
            .unwrap();
        assert!(tm.transition_exists("q0-qa-1-1-S"));
        assert!(!tm.transition_exists("q0-qa-1-1-R"));
    }
}
