//! Nondeterministic Turing machine executor.
//!
//! The frontier is a set of full configurations (state plus tape), one per
//! branch of the computation tree.

use std::fmt;

use indexmap::IndexSet;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::automaton::TransitionRecord;
use crate::common::{NonDeterministic, StepBudget, DEFAULT_RNG_SEED, DEFAULT_SIMULATION_DEPTH};
use crate::errors::Result;
use crate::turing_machine::{Tape, TuringMachine};

/// A nondeterministic Turing machine.
pub type NonDeterministicTuringMachine = TuringMachine<NonDeterministic>;

/// One branch of a nondeterministic Turing run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TmConfiguration {
    pub state: String,
    pub tape: Tape,
}

/// Runtime data of a nondeterministic Turing machine.
#[derive(Clone)]
pub struct TmFrontier {
    configurations: IndexSet<TmConfiguration>,
    rng: SmallRng,
}

impl Default for TmFrontier {
    fn default() -> Self {
        TmFrontier {
            configurations: IndexSet::new(),
            rng: SmallRng::seed_from_u64(DEFAULT_RNG_SEED),
        }
    }
}

impl fmt::Debug for TmFrontier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TmFrontier")
            .field("configurations", &self.configurations)
            .finish()
    }
}

// The RNG is not part of the automaton's logical value.
impl PartialEq for TmFrontier {
    fn eq(&self, other: &Self) -> bool {
        self.configurations == other.configurations
    }
}

impl TuringMachine<NonDeterministic> {
    /// The distinct states reachable by some branch right now.
    pub fn possible_current_states(&self) -> Vec<String> {
        let mut labels = IndexSet::new();
        for config in &self.runtime.configurations {
            labels.insert(config.state.clone());
        }
        labels.into_iter().collect()
    }

    /// The full frontier, one configuration per live branch.
    pub fn configurations(&self) -> Vec<TmConfiguration> {
        self.runtime.configurations.iter().cloned().collect()
    }

    /// Reseeds the RNG behind random-branch stepping.
    pub fn reseed(&mut self, seed: u64) {
        self.runtime.rng = SmallRng::seed_from_u64(seed);
    }

    /// Restores the frontier to the start configuration over a cleared
    /// tape.
    pub fn reset(&mut self) {
        self.core.reset_current();
        self.tape.reset();
        self.runtime.configurations.clear();
        if let Ok(start) = self.core.start_state() {
            self.runtime.configurations.insert(TmConfiguration {
                state: start.to_string(),
                tape: self.tape.clone(),
            });
        }
    }

    /// Advances every branch one machine cycle; a branch with no
    /// applicable transition dies here.
    fn step_configurations(
        &self,
        frontier: &IndexSet<TmConfiguration>,
        budget: &mut StepBudget,
    ) -> Result<IndexSet<TmConfiguration>> {
        let mut next = IndexSet::new();
        for config in frontier {
            let read = config.tape.read();
            if let Ok(state) = self.core.state(&config.state) {
                for t in state.iter_transitions() {
                    if t.read_symbol() == read || t.read_symbol().is_empty() {
                        let mut tape = config.tape.clone();
                        Self::apply_to_tape(t, &mut tape);
                        let candidate = TmConfiguration {
                            state: t.to_state().to_string(),
                            tape,
                        };
                        if next.insert(candidate) {
                            budget.charge()?;
                        }
                    }
                }
            }
        }
        Ok(next)
    }

    /// Advances every branch one machine cycle, then picks one branch
    /// uniformly at random; its state and tape become the live
    /// configuration and its accept flag is returned.
    pub fn process_input(&mut self) -> Result<bool> {
        let current = self.core.current_state()?.to_string();
        let mut budget = StepBudget::new(DEFAULT_SIMULATION_DEPTH, self.core.state_count());
        if self.runtime.configurations.is_empty() {
            self.runtime.configurations.insert(TmConfiguration {
                state: current.clone(),
                tape: self.tape.clone(),
            });
        }
        debug!(
            "ntm: stepping {} configurations",
            self.runtime.configurations.len()
        );
        let next = self.step_configurations(&self.runtime.configurations, &mut budget)?;
        if next.is_empty() {
            return Ok(self.core.state(&current)?.is_accept());
        }
        self.runtime.configurations = next;
        let index = self
            .runtime
            .rng
            .gen_range(0..self.runtime.configurations.len());
        let representative = match self.runtime.configurations.get_index(index) {
            Some(config) => config.clone(),
            None => TmConfiguration {
                state: current,
                tape: self.tape.clone(),
            },
        };
        self.core.set_current_state(&representative.state)?;
        self.tape = representative.tape;
        Ok(self.core.state(&representative.state)?.is_accept())
    }

    /// Explores the computation tree breadth-first from a fresh tape
    /// loaded with `input`, leaving the live configuration untouched.
    /// Deterministic: the RNG is never consulted.
    ///
    /// Accepts as soon as any branch reaches an accept state; rejects when
    /// every branch has died. Raises
    /// [`crate::errors::AutomatonError::SimulationDepthExceeded`] once
    /// configuration expansions exceed `max_depth * |states|`.
    pub fn simulate(&self, input: &[String], max_depth: usize) -> Result<bool> {
        let start = self.core.start_state()?.to_string();
        self.check_input_symbols(input)?;
        let mut budget = StepBudget::new(max_depth, self.core.state_count());
        let mut tape = Tape::new(self.tape.blank_symbol());
        tape.load_input(input);
        let mut frontier = IndexSet::new();
        frontier.insert(TmConfiguration { state: start, tape });
        loop {
            for config in &frontier {
                if self.core.state(&config.state)?.is_accept() {
                    return Ok(true);
                }
            }
            frontier = self.step_configurations(&frontier, &mut budget)?;
            if frontier.is_empty() {
                return Ok(false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Direction;
    use crate::errors::AutomatonError;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Guesses whether to mark the first cell with `a` or `b`; only the
    /// `b` branch runs into the accept state.
    fn guessing_machine() -> NonDeterministicTuringMachine {
        let mut tm = NonDeterministicTuringMachine::new();
        tm.add_input_alphabet(&symbols(&["1"]));
        tm.add_tape_alphabet(&symbols(&["a", "b"]));
        tm.add_state("q0", false).unwrap();
        tm.add_state("wrong", false).unwrap();
        tm.add_state("right", true).unwrap();
        tm.set_start_state("q0").unwrap();
        tm.add_transition("q0", "wrong", "1", "a", Direction::Stay)
            .unwrap();
        tm.add_transition("q0", "right", "1", "b", Direction::Stay)
            .unwrap();
        tm
    }

    #[test]
    fn accepts_when_some_branch_accepts() {
        let tm = guessing_machine();
        assert!(tm.simulate(&symbols(&["1"]), 5).unwrap());
    }

    #[test]
    fn rejects_when_every_branch_dies() {
        let tm = guessing_machine();
        // a blank under the head matches no transition
        assert!(!tm.simulate(&[], 5).unwrap());
    }

    #[test]
    fn accepts_immediately_when_the_start_state_accepts() {
        let mut tm = NonDeterministicTuringMachine::new();
        tm.add_state("q0", true).unwrap();
        tm.set_start_state("q0").unwrap();
        assert!(tm.simulate(&[], 5).unwrap());
    }

    #[test]
    fn runaway_branching_hits_the_depth_guard() {
        let mut tm = NonDeterministicTuringMachine::new();
        tm.add_input_alphabet(&symbols(&["1"]));
        tm.add_state("q0", false).unwrap();
        tm.set_start_state("q0").unwrap();
        tm.add_transition("q0", "q0", "", "", Direction::Right)
            .unwrap();
        assert_eq!(
            tm.simulate(&symbols(&["1"]), 3),
            Err(AutomatonError::SimulationDepthExceeded(3))
        );
    }

    #[test]
    fn stepping_mirrors_the_chosen_branch() {
        let mut tm = guessing_machine();
        tm.set_input(&symbols(&["1"])).unwrap();
        let accepted = tm.process_input().unwrap();
        assert_eq!(accepted, tm.is_accepting().unwrap());
        assert_eq!(
            tm.possible_current_states(),
            symbols(&["wrong", "right"])
        );
        let written = tm.tape().read();
        assert!(written == "a" || written == "b");
        let current = tm.current_state().unwrap();
        assert_eq!(current == "right", written == "b");
    }

    #[test]
    fn branch_selection_is_reproducible_under_a_seed() {
        let mut left = guessing_machine();
        let mut right = guessing_machine();
        left.set_input(&symbols(&["1"])).unwrap();
        right.set_input(&symbols(&["1"])).unwrap();
        left.reseed(42);
        right.reseed(42);
        left.process_input().unwrap();
        right.process_input().unwrap();
        assert_eq!(
            left.current_state().unwrap(),
            right.current_state().unwrap()
        );
    }

    #[test]
    fn a_stuck_frontier_leaves_the_configuration_untouched() {
        let mut tm = guessing_machine();
        tm.reset();
        // blank under the head: no branch can move
        assert!(!tm.process_input().unwrap());
        assert_eq!(tm.current_state().unwrap(), "q0");
        assert_eq!(tm.possible_current_states(), symbols(&["q0"]));
    }
}
