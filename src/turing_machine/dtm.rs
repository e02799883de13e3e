//! Deterministic Turing machine executor.

use log::debug;

use crate::automaton::TransitionRecord;
use crate::common::Deterministic;
use crate::errors::{AutomatonError, Result};
use crate::turing_machine::{Tape, TmTransition, TuringMachine};

/// A deterministic Turing machine: per state at most one transition per
/// read symbol, and a wildcard read excludes concrete reads.
pub type DeterministicTuringMachine = TuringMachine<Deterministic>;

impl TuringMachine<Deterministic> {
    /// Restores the current state to the start state and clears the tape.
    pub fn reset(&mut self) {
        self.core.reset_current();
        self.tape.reset();
    }

    /// The transition allowed to fire from `state` on `read`: a concrete
    /// match wins, otherwise a wildcard (empty) read applies.
    fn choose_transition(&self, state: &str, read: &str) -> Result<Option<TmTransition>> {
        let state = self.core.state(state)?;
        let concrete = state
            .iter_transitions()
            .find(|t| t.read_symbol() == read);
        if let Some(t) = concrete {
            return Ok(Some(t.clone()));
        }
        Ok(state
            .iter_transitions()
            .find(|t| t.read_symbol().is_empty())
            .cloned())
    }

    /// One machine cycle on the live tape: read under the head, write,
    /// move, switch state. Returns the accept flag of the resulting state;
    /// a halted machine is left untouched.
    pub fn process_input(&mut self) -> Result<bool> {
        let current = self.core.current_state()?.to_string();
        let read = self.tape.read();
        debug!("dtm: reading {} in state {}", read, current);
        match self.choose_transition(&current, &read)? {
            Some(record) => {
                Self::apply_to_tape(&record, &mut self.tape);
                let to = record.to_state().to_string();
                self.core.set_current_state(&to)?;
                Ok(self.core.state(&to)?.is_accept())
            }
            None => Ok(self.core.state(&current)?.is_accept()),
        }
    }

    /// Runs the machine on a fresh tape loaded with `input` until it
    /// halts, leaving the live configuration untouched.
    ///
    /// Accepts iff the machine halts in an accept state. Raises
    /// [`AutomatonError::SimulationDepthExceeded`] when more than
    /// `max_depth` cycles run.
    pub fn simulate(&self, input: &[String], max_depth: usize) -> Result<bool> {
        let mut current = self.core.start_state()?.to_string();
        self.check_input_symbols(input)?;
        let mut tape = Tape::new(self.tape.blank_symbol());
        tape.load_input(input);
        let mut steps = 0usize;
        loop {
            let read = tape.read();
            match self.choose_transition(&current, &read)? {
                Some(record) => {
                    Self::apply_to_tape(&record, &mut tape);
                    current = record.to_state().to_string();
                    steps += 1;
                    if steps > max_depth {
                        return Err(AutomatonError::SimulationDepthExceeded(max_depth));
                    }
                }
                None => break,
            }
        }
        Ok(self.core.state(&current)?.is_accept())
    }
}
