//! Nondeterministic pushdown automaton executor.
//!
//! The frontier is a set of full configurations (state plus stack), since
//! two branches that agree on the state may disagree on the stack.

use std::fmt;

use indexmap::IndexSet;
use log::debug;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::automaton::TransitionRecord;
use crate::common::{
    NonDeterministic, StepBudget, DEFAULT_RNG_SEED, DEFAULT_SIMULATION_DEPTH,
    INITIAL_STACK_SYMBOL,
};
use crate::errors::Result;
use crate::pushdown_automaton::PushdownAutomaton;

/// A nondeterministic pushdown automaton.
pub type NonDeterministicPushdownAutomaton = PushdownAutomaton<NonDeterministic>;

/// One branch of a nondeterministic pushdown run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PdaConfiguration {
    pub state: String,
    /// The branch's stack, bottom first.
    pub stack: Vec<String>,
}

/// Runtime data of a nondeterministic pushdown automaton.
#[derive(Clone)]
pub struct PdaFrontier {
    configurations: IndexSet<PdaConfiguration>,
    rng: SmallRng,
}

impl Default for PdaFrontier {
    fn default() -> Self {
        PdaFrontier {
            configurations: IndexSet::new(),
            rng: SmallRng::seed_from_u64(DEFAULT_RNG_SEED),
        }
    }
}

impl fmt::Debug for PdaFrontier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("PdaFrontier")
            .field("configurations", &self.configurations)
            .finish()
    }
}

// The RNG is not part of the automaton's logical value.
impl PartialEq for PdaFrontier {
    fn eq(&self, other: &Self) -> bool {
        self.configurations == other.configurations
    }
}

impl PushdownAutomaton<NonDeterministic> {
    /// The distinct states reachable by some branch right now.
    pub fn possible_current_states(&self) -> Vec<String> {
        let mut labels = IndexSet::new();
        for config in &self.runtime.configurations {
            labels.insert(config.state.clone());
        }
        labels.into_iter().collect()
    }

    /// The full frontier, one configuration per live branch.
    pub fn configurations(&self) -> Vec<PdaConfiguration> {
        self.runtime.configurations.iter().cloned().collect()
    }

    /// Reseeds the RNG behind random-branch stepping.
    pub fn reseed(&mut self, seed: u64) {
        self.runtime.rng = SmallRng::seed_from_u64(seed);
    }

    /// Restores the frontier to the epsilon closure of the start
    /// configuration, rewinds the input head and reseeds the stack.
    pub fn reset(&mut self) {
        self.core.reset_current();
        self.input_head = 0;
        self.stack = vec![INITIAL_STACK_SYMBOL.to_string()];
        self.runtime.configurations.clear();
        if let Ok(start) = self.core.start_state() {
            let mut seed = IndexSet::new();
            seed.insert(PdaConfiguration {
                state: start.to_string(),
                stack: self.stack.clone(),
            });
            let mut budget = StepBudget::new(DEFAULT_SIMULATION_DEPTH, self.core.state_count());
            let _ = self.epsilon_closure(&mut seed, &mut budget);
            self.runtime.configurations = seed;
        }
    }

    /// Grows `frontier` with every configuration reachable over epsilon
    /// transitions whose stack precondition holds, to a fixed point.
    fn epsilon_closure(
        &self,
        frontier: &mut IndexSet<PdaConfiguration>,
        budget: &mut StepBudget,
    ) -> Result<()> {
        let mut index = 0;
        while index < frontier.len() {
            let config = match frontier.get_index(index) {
                Some(config) => config.clone(),
                None => break,
            };
            index += 1;
            let top = match config.stack.last() {
                Some(top) => top.clone(),
                None => continue,
            };
            if let Ok(state) = self.core.state(&config.state) {
                for t in state.iter_transitions() {
                    if t.input().is_empty() && t.stack_symbol() == top {
                        let mut stack = config.stack.clone();
                        Self::apply_to_stack(t, &mut stack);
                        let next = PdaConfiguration {
                            state: t.to_state().to_string(),
                            stack,
                        };
                        if frontier.insert(next) {
                            budget.charge()?;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Configurations reachable by consuming `symbol`.
    fn move_on(
        &self,
        frontier: &IndexSet<PdaConfiguration>,
        symbol: &str,
        budget: &mut StepBudget,
    ) -> Result<IndexSet<PdaConfiguration>> {
        let mut next = IndexSet::new();
        for config in frontier {
            let top = match config.stack.last() {
                Some(top) => top.clone(),
                None => continue,
            };
            if let Ok(state) = self.core.state(&config.state) {
                for t in state.iter_transitions() {
                    if t.input() == symbol && t.stack_symbol() == top {
                        let mut stack = config.stack.clone();
                        Self::apply_to_stack(t, &mut stack);
                        let candidate = PdaConfiguration {
                            state: t.to_state().to_string(),
                            stack,
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

    /// Consumes the input symbol at the head across the whole frontier,
    /// then picks one configuration uniformly at random; its state and
    /// stack become the live configuration and its accept flag is
    /// returned.
    pub fn process_input(&mut self) -> Result<bool> {
        let current = self.core.current_state()?.to_string();
        let mut budget = StepBudget::new(DEFAULT_SIMULATION_DEPTH, self.core.state_count());
        if self.runtime.configurations.is_empty() {
            let mut seed = IndexSet::new();
            seed.insert(PdaConfiguration {
                state: current.clone(),
                stack: self.stack.clone(),
            });
            self.epsilon_closure(&mut seed, &mut budget)?;
            self.runtime.configurations = seed;
        }
        let symbol = self.input.get(self.input_head).cloned();
        let next = match &symbol {
            Some(symbol) => {
                debug!(
                    "npda: reading {} across {} configurations",
                    symbol,
                    self.runtime.configurations.len()
                );
                let mut next = self.move_on(&self.runtime.configurations, symbol, &mut budget)?;
                self.epsilon_closure(&mut next, &mut budget)?;
                next
            }
            None => self.runtime.configurations.clone(),
        };
        if next.is_empty() {
            return Ok(self.core.state(&current)?.is_accept());
        }
        if symbol.is_some() {
            self.input_head += 1;
        }
        self.runtime.configurations = next;
        let index = self
            .runtime
            .rng
            .gen_range(0..self.runtime.configurations.len());
        let representative = match self.runtime.configurations.get_index(index) {
            Some(config) => config.clone(),
            None => PdaConfiguration {
                state: current,
                stack: self.stack.clone(),
            },
        };
        self.core.set_current_state(&representative.state)?;
        self.stack = representative.stack;
        Ok(self.core.state(&representative.state)?.is_accept())
    }

    /// Runs the whole input breadth-first over a fresh frontier, leaving
    /// the live configuration untouched. Deterministic: the RNG is never
    /// consulted.
    ///
    /// Accepts iff after consuming every symbol some branch sits in an
    /// accept state. Raises
    /// [`crate::errors::AutomatonError::SimulationDepthExceeded`] once
    /// configuration expansions exceed `max_depth * |states|`, which
    /// catches stack-growing epsilon cycles.
    pub fn simulate(&self, input: &[String], max_depth: usize) -> Result<bool> {
        let start = self.core.start_state()?.to_string();
        let mut budget = StepBudget::new(max_depth, self.core.state_count());
        let mut frontier = IndexSet::new();
        frontier.insert(PdaConfiguration {
            state: start,
            stack: vec![INITIAL_STACK_SYMBOL.to_string()],
        });
        self.epsilon_closure(&mut frontier, &mut budget)?;
        for symbol in input {
            let mut next = self.move_on(&frontier, symbol, &mut budget)?;
            self.epsilon_closure(&mut next, &mut budget)?;
            if next.is_empty() {
                return Ok(false);
            }
            frontier = next;
        }
        for config in &frontier {
            if self.core.state(&config.state)?.is_accept() {
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

    /// Guesses nondeterministically whether the input ends in "01" or
    /// "10"; the stack carries only `Z`.
    fn ends_in_01_or_10() -> NonDeterministicPushdownAutomaton {
        let mut pda = NonDeterministicPushdownAutomaton::new();
        pda.add_input_alphabet(&symbols(&["0", "1"]));
        pda.add_stack_alphabet(&symbols(&["Z"]));
        pda.add_state("scan", false).unwrap();
        pda.add_state("saw0", false).unwrap();
        pda.add_state("saw1", false).unwrap();
        pda.add_state("done", true).unwrap();
        pda.set_start_state("scan").unwrap();
        pda.add_transition("scan", "scan", "0", "Z", "Z").unwrap();
        pda.add_transition("scan", "scan", "1", "Z", "Z").unwrap();
        pda.add_transition("scan", "saw0", "0", "Z", "Z").unwrap();
        pda.add_transition("saw0", "done", "1", "Z", "Z").unwrap();
        pda.add_transition("scan", "saw1", "1", "Z", "Z").unwrap();
        pda.add_transition("saw1", "done", "0", "Z", "Z").unwrap();
        pda
    }

    fn run(pda: &NonDeterministicPushdownAutomaton, input: &[&str]) -> bool {
        pda.simulate(&symbols(input), DEFAULT_SIMULATION_DEPTH)
            .unwrap()
    }

    #[test]
    fn guesses_the_final_two_symbols() {
        let pda = ends_in_01_or_10();
        assert!(run(&pda, &["0", "1", "0"]));
        assert!(!run(&pda, &["1", "1", "1"]));
        assert!(run(&pda, &["0", "1"]));
        assert!(run(&pda, &["1", "0"]));
        assert!(!run(&pda, &["0"]));
        assert!(!run(&pda, &[]));
    }

    #[test]
    fn branches_keep_independent_stacks() {
        let mut pda = NonDeterministicPushdownAutomaton::new();
        pda.add_input_alphabet(&symbols(&["a", "b"]));
        pda.add_stack_alphabet(&symbols(&["Z", "A"]));
        pda.add_state("q0", false).unwrap();
        pda.add_state("grow", false).unwrap();
        pda.add_state("keep", false).unwrap();
        pda.add_state("fin", true).unwrap();
        pda.set_start_state("q0").unwrap();
        // one branch pushes, the other leaves the stack alone
        pda.add_transition("q0", "grow", "a", "Z", "Z,A").unwrap();
        pda.add_transition("q0", "keep", "a", "Z", "Z").unwrap();
        // only the branch that pushed can pop its way to the accept state
        pda.add_transition("grow", "fin", "b", "A", "").unwrap();
        pda.add_transition("keep", "fin", "b", "A", "").unwrap();
        assert!(run(&pda, &["a", "b"]));
    }

    #[test]
    fn stack_growing_epsilon_cycles_hit_the_depth_guard() {
        let mut pda = NonDeterministicPushdownAutomaton::new();
        pda.add_input_alphabet(&symbols(&["1"]));
        pda.add_stack_alphabet(&symbols(&["Z"]));
        pda.add_state("q0", false).unwrap();
        pda.set_start_state("q0").unwrap();
        pda.add_transition("q0", "q0", "", "Z", "Z,Z").unwrap();
        assert_eq!(
            pda.simulate(&symbols(&["1"]), 3),
            Err(AutomatonError::SimulationDepthExceeded(3))
        );
    }

    #[test]
    fn stepping_mirrors_the_chosen_branch() {
        let mut pda = ends_in_01_or_10();
        pda.set_input(&symbols(&["0", "1"])).unwrap();
        pda.reset();
        pda.process_input().unwrap();
        let possible = pda.possible_current_states();
        assert_eq!(possible, symbols(&["scan", "saw0"]));
        assert!(possible.contains(&pda.current_state().unwrap()));
        assert_eq!(pda.stack(), symbols(&["Z"]));
        let accepted = pda.process_input().unwrap();
        assert_eq!(accepted, pda.is_accepting().unwrap());
        assert!(pda
            .possible_current_states()
            .contains(&"done".to_string()));
    }

    #[test]
    fn a_dead_symbol_leaves_the_frontier_untouched() {
        let mut pda = ends_in_01_or_10();
        pda.add_input_alphabet(&symbols(&["x"]));
        pda.set_input(&symbols(&["x"])).unwrap();
        pda.reset();
        assert!(!pda.process_input().unwrap());
        assert_eq!(pda.possible_current_states(), symbols(&["scan"]));
        assert_eq!(pda.input_head(), 0);
    }

    #[test]
    fn simulate_requires_a_start_state() {
        let mut pda = NonDeterministicPushdownAutomaton::new();
        pda.add_state("q0", true).unwrap();
        assert!(matches!(
            pda.simulate(&[], DEFAULT_SIMULATION_DEPTH),
            Err(AutomatonError::InvalidStartState(_))
        ));
    }
}
