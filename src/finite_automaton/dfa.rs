//! Deterministic finite automaton executor.

use log::debug;

use crate::automaton::TransitionRecord;
use crate::common::Deterministic;
use crate::errors::{AutomatonError, Result};
use crate::finite_automaton::FiniteAutomaton;

/// A deterministic finite automaton: at most one transition per state and
/// input symbol, no epsilon transitions.
pub type DeterministicFiniteAutomaton = FiniteAutomaton<Deterministic>;

impl FiniteAutomaton<Deterministic> {
    /// Restores the current state to the start state and rewinds the input
    /// head.
    pub fn reset(&mut self) {
        self.core.reset_current();
        self.input_head = 0;
    }

    /// Consumes the input symbol at the head, if one applies.
    ///
    /// On a match the automaton advances and the head moves; otherwise the
    /// configuration is left untouched. Either way the accept flag of the
    /// resulting state is returned.
    pub fn process_input(&mut self) -> Result<bool> {
        let current = self.core.current_state()?.to_string();
        let symbol = match self.input.get(self.input_head) {
            Some(symbol) => symbol.clone(),
            None => return Ok(self.core.state(&current)?.is_accept()),
        };
        debug!("dfa: reading {} in state {}", symbol, current);
        let target = self
            .core
            .state(&current)?
            .iter_transitions()
            .find(|t| t.input() == symbol)
            .map(|t| t.to_state().to_string());
        match target {
            Some(to) => {
                self.core.set_current_state(&to)?;
                self.input_head += 1;
                Ok(self.core.state(&to)?.is_accept())
            }
            None => Ok(self.core.state(&current)?.is_accept()),
        }
    }

    /// Runs the whole input on a fresh configuration, leaving the live
    /// configuration untouched.
    ///
    /// Accepts iff every symbol was consumed and the final state is an
    /// accept state. Raises [`AutomatonError::SimulationDepthExceeded`]
    /// when more than `max_depth` transitions fire.
    pub fn simulate(&self, input: &[String], max_depth: usize) -> Result<bool> {
        let mut current = self.core.start_state()?.to_string();
        let mut steps = 0usize;
        for symbol in input {
            let target = self
                .core
                .state(&current)?
                .iter_transitions()
                .find(|t| t.input() == symbol.as_str())
                .map(|t| t.to_state().to_string());
            match target {
                Some(to) => {
                    current = to;
                    steps += 1;
                    if steps > max_depth {
                        return Err(AutomatonError::SimulationDepthExceeded(max_depth));
                    }
                }
                // stuck with input left over
                None => return Ok(false),
            }
        }
        Ok(self.core.state(&current)?.is_accept())
    }
}
