//! Nondeterministic finite automaton executor: epsilon closure, frontier
//! expansion and random-branch stepping.

use std::fmt;

use indexmap::IndexSet;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::automaton::TransitionRecord;
use crate::common::{NonDeterministic, StepBudget, DEFAULT_RNG_SEED, DEFAULT_SIMULATION_DEPTH};
use crate::errors::Result;
use crate::finite_automaton::FiniteAutomaton;

/// A nondeterministic finite automaton with epsilon transitions.
pub type NonDeterministicFiniteAutomaton = FiniteAutomaton<NonDeterministic>;

/// Runtime data of a nondeterministic finite automaton: the set of states
/// its executions could currently be in, and the randomness source used to
/// pick the representative current state.
#[derive(Clone)]
pub struct FaFrontier {
    possible: IndexSet<String>,
    rng: SmallRng,
}

impl Default for FaFrontier {
    fn default() -> Self {
        FaFrontier {
            possible: IndexSet::new(),
            rng: SmallRng::seed_from_u64(DEFAULT_RNG_SEED),
        }
    }
}

impl fmt::Debug for FaFrontier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FaFrontier")
            .field("possible", &self.possible)
            .finish()
    }
}

// The RNG is not part of the automaton's logical value.
impl PartialEq for FaFrontier {
    fn eq(&self, other: &Self) -> bool {
        self.possible == other.possible
    }
}

impl FiniteAutomaton<NonDeterministic> {
    /// The states any execution of the automaton could currently be in.
    pub fn possible_current_states(&self) -> Vec<String> {
        self.runtime.possible.iter().cloned().collect()
    }

    /// Reseeds the RNG behind random-branch stepping.
    pub fn reseed(&mut self, seed: u64) {
        self.runtime.rng = SmallRng::seed_from_u64(seed);
    }

    /// Restores the frontier to the epsilon closure of the start state and
    /// rewinds the input head.
    pub fn reset(&mut self) {
        self.core.reset_current();
        self.input_head = 0;
        self.runtime.possible.clear();
        if let Ok(start) = self.core.start_state() {
            let mut seed = IndexSet::new();
            seed.insert(start.to_string());
            let mut budget = StepBudget::new(DEFAULT_SIMULATION_DEPTH, self.core.state_count());
            // closure over existing states cannot exhaust this budget
            let _ = self.epsilon_closure(&mut seed, &mut budget);
            self.runtime.possible = seed;
        }
    }

    /// Grows `frontier` with every state reachable over epsilon
    /// transitions, to a fixed point. Applying it to an already closed
    /// frontier changes nothing.
    fn epsilon_closure(&self, frontier: &mut IndexSet<String>, budget: &mut StepBudget) -> Result<()> {
        let mut index = 0;
        while index < frontier.len() {
            let label = match frontier.get_index(index) {
                Some(label) => label.clone(),
                None => break,
            };
            index += 1;
            if let Ok(state) = self.core.state(&label) {
                for t in state.iter_transitions() {
                    if t.input().is_empty() && frontier.insert(t.to_state().to_string()) {
                        budget.charge()?;
                    }
                }
            }
        }
        Ok(())
    }

    /// States reachable from `frontier` by consuming `symbol`. The frontier
    /// is kept epsilon-closed between steps, so a single move covers both
    /// the direct and the epsilon-then-input cases.
    fn move_on(
        &self,
        frontier: &IndexSet<String>,
        symbol: &str,
        budget: &mut StepBudget,
    ) -> Result<IndexSet<String>> {
        let mut next = IndexSet::new();
        for label in frontier {
            if let Ok(state) = self.core.state(label) {
                for t in state.iter_transitions() {
                    if t.input() == symbol && next.insert(t.to_state().to_string()) {
                        budget.charge()?;
                    }
                }
            }
        }
        Ok(next)
    }

    /// Consumes the input symbol at the head across the whole frontier,
    /// then picks one member uniformly at random as the representative
    /// current state and returns its accept flag.
    ///
    /// When no transition applies the configuration is left untouched.
    pub fn process_input(&mut self) -> Result<bool> {
        let current = self.core.current_state()?.to_string();
        let mut budget = StepBudget::new(DEFAULT_SIMULATION_DEPTH, self.core.state_count());
        if self.runtime.possible.is_empty() {
            let mut seed = IndexSet::new();
            seed.insert(current.clone());
            self.epsilon_closure(&mut seed, &mut budget)?;
            self.runtime.possible = seed;
        }
        let symbol = self.input.get(self.input_head).cloned();
        let next = match &symbol {
            Some(symbol) => {
                debug!("nfa: reading {} across {} states", symbol, self.runtime.possible.len());
                let mut next = self.move_on(&self.runtime.possible, symbol, &mut budget)?;
                self.epsilon_closure(&mut next, &mut budget)?;
                next
            }
            // input exhausted: the frontier is already closed
            None => self.runtime.possible.clone(),
        };
        if next.is_empty() {
            return Ok(self.core.state(&current)?.is_accept());
        }
        if symbol.is_some() {
            self.input_head += 1;
        }
        self.runtime.possible = next;
        let index = self.runtime.rng.gen_range(0..self.runtime.possible.len());
        let representative = self
            .runtime
            .possible
            .get_index(index)
            .cloned()
            .unwrap_or(current);
        self.core.set_current_state(&representative)?;
        Ok(self.core.state(&representative)?.is_accept())
    }

    /// Runs the whole input breadth-first over a fresh frontier, leaving
    /// the live configuration untouched. Deterministic: the RNG is never
    /// consulted.
    ///
    /// Accepts iff after consuming every symbol some frontier member is an
    /// accept state. Raises [`crate::errors::AutomatonError::SimulationDepthExceeded`]
    /// once expansions exceed `max_depth * |states|`.
    pub fn simulate(&self, input: &[String], max_depth: usize) -> Result<bool> {
        let start = self.core.start_state()?.to_string();
        let mut budget = StepBudget::new(max_depth, self.core.state_count());
        let mut frontier = IndexSet::new();
        frontier.insert(start);
        self.epsilon_closure(&mut frontier, &mut budget)?;
        for symbol in input {
            let mut next = self.move_on(&frontier, symbol, &mut budget)?;
            self.epsilon_closure(&mut next, &mut budget)?;
            if next.is_empty() {
                return Ok(false);
            }
            frontier = next;
        }
        for label in &frontier {
            if self.core.state(label)?.is_accept() {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::AutomatonError;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Accepts exactly "0", reached over a leading epsilon transition.
    fn epsilon_then_zero() -> NonDeterministicFiniteAutomaton {
        let mut nfa = NonDeterministicFiniteAutomaton::new();
        nfa.add_input_alphabet(&symbols(&["0"]));
        nfa.add_state("q0", false).unwrap();
        nfa.add_state("q1", false).unwrap();
        nfa.add_state("q2", true).unwrap();
        nfa.set_start_state("q0").unwrap();
        nfa.add_transition("q0", "q1", "").unwrap();
        nfa.add_transition("q1", "q2", "0").unwrap();
        nfa
    }

    #[test]
    fn matches_zero_through_epsilon() {
        let nfa = epsilon_then_zero();
        assert!(!nfa
            .simulate(&[], DEFAULT_SIMULATION_DEPTH)
            .unwrap());
        assert!(nfa
            .simulate(&symbols(&["0"]), DEFAULT_SIMULATION_DEPTH)
            .unwrap());
        assert!(!nfa
            .simulate(&symbols(&["0", "0"]), DEFAULT_SIMULATION_DEPTH)
            .unwrap());
    }

    #[test]
    fn epsilon_closure_is_idempotent() {
        let nfa = epsilon_then_zero();
        let mut budget = StepBudget::new(DEFAULT_SIMULATION_DEPTH, 3);
        let mut frontier = IndexSet::new();
        frontier.insert("q0".to_string());
        nfa.epsilon_closure(&mut frontier, &mut budget).unwrap();
        let closed = frontier.clone();
        nfa.epsilon_closure(&mut frontier, &mut budget).unwrap();
        assert_eq!(frontier, closed);
        assert_eq!(frontier.len(), 2);
        assert!(frontier.contains("q1"));
    }

    #[test]
    fn reset_seeds_the_closed_frontier() {
        let mut nfa = epsilon_then_zero();
        nfa.reset();
        assert_eq!(nfa.possible_current_states(), symbols(&["q0", "q1"]));
    }

    #[test]
    fn stepping_tracks_the_frontier_and_a_representative() {
        let mut nfa = epsilon_then_zero();
        nfa.set_input(&symbols(&["0"])).unwrap();
        nfa.reset();
        assert!(nfa.process_input().unwrap());
        assert_eq!(nfa.possible_current_states(), symbols(&["q2"]));
        assert_eq!(nfa.current_state().unwrap(), "q2");
        assert_eq!(nfa.input_head(), 1);
    }

    #[test]
    fn a_dead_symbol_leaves_the_configuration_untouched() {
        let mut nfa = epsilon_then_zero();
        nfa.add_input_alphabet(&symbols(&["1"]));
        nfa.set_input(&symbols(&["1"])).unwrap();
        nfa.reset();
        assert!(!nfa.process_input().unwrap());
        assert_eq!(nfa.possible_current_states(), symbols(&["q0", "q1"]));
        assert_eq!(nfa.input_head(), 0);
    }

    #[test]
    fn branch_selection_is_reproducible_under_a_seed() {
        let build = || {
            let mut nfa = NonDeterministicFiniteAutomaton::new();
            nfa.add_input_alphabet(&symbols(&["a"]));
            nfa.add_state("q0", false).unwrap();
            for label in &["q1", "q2", "q3", "q4"] {
                nfa.add_state(label, true).unwrap();
                nfa.add_transition("q0", label, "a").unwrap();
            }
            nfa.set_start_state("q0").unwrap();
            nfa.set_input(&symbols(&["a"])).unwrap();
            nfa
        };
        let mut left = build();
        let mut right = build();
        left.reseed(7);
        right.reseed(7);
        left.process_input().unwrap();
        right.process_input().unwrap();
        assert_eq!(left.current_state().unwrap(), right.current_state().unwrap());
        assert_eq!(
            left.possible_current_states(),
            symbols(&["q1", "q2", "q3", "q4"])
        );
    }

    #[test]
    fn simulation_depth_catches_nothing_on_finite_frontiers() {
        let nfa = epsilon_then_zero();
        // plenty of budget: the frontier is bounded by the state count
        assert!(nfa.simulate(&symbols(&["0"]), 1).unwrap());
    }

    #[test]
    fn deeper_budgets_preserve_acceptance() {
        let nfa = epsilon_then_zero();
        for depth in &[1usize, 10, 1000] {
            assert!(nfa.simulate(&symbols(&["0"]), *depth).unwrap());
        }
    }

    #[test]
    fn simulate_requires_a_start_state() {
        let mut nfa = NonDeterministicFiniteAutomaton::new();
        nfa.add_input_alphabet(&symbols(&["0"]));
        nfa.add_state("q0", true).unwrap();
        assert!(matches!(
            nfa.simulate(&symbols(&["0"]), DEFAULT_SIMULATION_DEPTH),
            Err(AutomatonError::InvalidStartState(_))
        ));
    }
}
