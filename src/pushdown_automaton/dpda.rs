//! Deterministic pushdown automaton executor.

use log::debug;

use crate::automaton::TransitionRecord;
use crate::common::{Deterministic, INITIAL_STACK_SYMBOL};
use crate::errors::{AutomatonError, Result};
use crate::pushdown_automaton::{PdaTransition, PushdownAutomaton};

/// A deterministic pushdown automaton: per state, at most one transition
/// may fire for any `(input, stackTop)` pair, and epsilon transitions are
/// exclusive with input transitions on the same stack top.
pub type DeterministicPushdownAutomaton = PushdownAutomaton<Deterministic>;

impl PushdownAutomaton<Deterministic> {
    /// Restores the current state to the start state, rewinds the input
    /// head and reseeds the stack with `Z`.
    pub fn reset(&mut self) {
        self.core.reset_current();
        self.input_head = 0;
        self.stack = vec![INITIAL_STACK_SYMBOL.to_string()];
    }

    /// Finds the one transition allowed to fire from `state` given the
    /// symbol under the input head (if any) and the stack top. Input
    /// transitions win; an epsilon transition fires only when no symbol
    /// matches.
    fn choose_transition(
        &self,
        state: &str,
        symbol: Option<&str>,
        stack_top: Option<&str>,
    ) -> Result<Option<(PdaTransition, bool)>> {
        let state = self.core.state(state)?;
        let top = match stack_top {
            Some(top) => top,
            None => return Ok(None),
        };
        if let Some(symbol) = symbol {
            let direct = state
                .iter_transitions()
                .find(|t| t.input() == symbol && t.stack_symbol() == top);
            if let Some(t) = direct {
                return Ok(Some((t.clone(), true)));
            }
        }
        let epsilon = state
            .iter_transitions()
            .find(|t| t.input().is_empty() && t.stack_symbol() == top);
        Ok(epsilon.map(|t| (t.clone(), false)))
    }

    /// Advances the live configuration by one transition, if one applies,
    /// and returns the accept flag of the resulting state.
    pub fn process_input(&mut self) -> Result<bool> {
        let current = self.core.current_state()?.to_string();
        let symbol = self.input.get(self.input_head).cloned();
        let chosen = self.choose_transition(
            &current,
            symbol.as_deref(),
            self.stack.last().map(|s| s.as_str()),
        )?;
        match chosen {
            Some((record, consumed)) => {
                debug!(
                    "dpda: firing {} in state {}",
                    record.key(),
                    current
                );
                Self::apply_to_stack(&record, &mut self.stack);
                if consumed {
                    self.input_head += 1;
                }
                let to = record.to_state().to_string();
                self.core.set_current_state(&to)?;
                Ok(self.core.state(&to)?.is_accept())
            }
            None => Ok(self.core.state(&current)?.is_accept()),
        }
    }

    /// Runs the whole input on a fresh configuration (start state, stack
    /// seeded with `Z`), leaving the live configuration untouched.
    ///
    /// Accepts iff the machine halts with every symbol consumed in an
    /// accept state. Raises
    /// [`AutomatonError::SimulationDepthExceeded`] when more than
    /// `max_depth` transitions fire, which also catches epsilon cycles.
    pub fn simulate(&self, input: &[String], max_depth: usize) -> Result<bool> {
        let mut current = self.core.start_state()?.to_string();
        let mut stack = vec![INITIAL_STACK_SYMBOL.to_string()];
        let mut index = 0usize;
        let mut steps = 0usize;
        loop {
            let symbol = input.get(index).map(|s| s.as_str());
            let chosen =
                self.choose_transition(&current, symbol, stack.last().map(|s| s.as_str()))?;
            match chosen {
                Some((record, consumed)) => {
                    Self::apply_to_stack(&record, &mut stack);
                    if consumed {
                        index += 1;
                    }
                    current = record.to_state().to_string();
                    steps += 1;
                    if steps > max_depth {
                        return Err(AutomatonError::SimulationDepthExceeded(max_depth));
                    }
                }
                None => break,
            }
        }
        Ok(index == input.len() && self.core.state(&current)?.is_accept())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::DEFAULT_SIMULATION_DEPTH;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    /// Accepts balanced parenthesis strings.
    fn balanced_parens() -> DeterministicPushdownAutomaton {
        let mut pda = DeterministicPushdownAutomaton::new();
        pda.add_input_alphabet(&symbols(&["(", ")"]));
        pda.add_stack_alphabet(&symbols(&["A", "Z"]));
        pda.add_state("q0", false).unwrap();
        pda.add_state("q1", true).unwrap();
        pda.set_start_state("q0").unwrap();
        pda.add_transition("q0", "q0", "(", "Z", "Z,A").unwrap();
        pda.add_transition("q0", "q0", "(", "A", "A,A").unwrap();
        pda.add_transition("q0", "q0", ")", "A", "").unwrap();
        pda.add_transition("q0", "q1", "", "Z", "Z").unwrap();
        pda
    }

    fn run(pda: &DeterministicPushdownAutomaton, input: &[&str]) -> bool {
        pda.simulate(&symbols(input), DEFAULT_SIMULATION_DEPTH)
            .unwrap()
    }

    #[test]
    fn recognises_balanced_parentheses() {
        let pda = balanced_parens();
        assert!(run(&pda, &["(", ")"]));
        assert!(run(&pda, &["(", "(", ")", ")"]));
        assert!(!run(&pda, &["(", "(", ")"]));
        assert!(!run(&pda, &["(", ")", ")"]));
        assert!(run(&pda, &[]));
    }

    #[test]
    fn epsilon_loops_hit_the_depth_guard() {
        let mut pda = DeterministicPushdownAutomaton::new();
        pda.add_input_alphabet(&symbols(&["1"]));
        pda.add_stack_alphabet(&symbols(&["Z"]));
        pda.add_state("q0", false).unwrap();
        pda.set_start_state("q0").unwrap();
        pda.add_transition("q0", "q0", "", "Z", "Z").unwrap();
        assert_eq!(
            pda.simulate(&symbols(&["1"]), 5),
            Err(AutomatonError::SimulationDepthExceeded(5))
        );
    }

    #[test]
    fn determinism_rejects_competing_triggers() {
        let mut pda = balanced_parens();
        // same (input, stackTop) pair
        assert!(matches!(
            pda.add_transition("q0", "q1", "(", "Z", "Z"),
            Err(AutomatonError::InvalidAutomatonDefinition(_))
        ));
        // epsilon already fires on stack top Z
        assert!(matches!(
            pda.add_transition("q0", "q1", ")", "Z", "Z"),
            Err(AutomatonError::InvalidAutomatonDefinition(_))
        ));
        // a different stack top is fine
        pda.add_transition("q1", "q0", ")", "A", "A").unwrap();
    }

    #[test]
    fn stepping_tracks_the_stack() {
        let mut pda = balanced_parens();
        pda.set_input(&symbols(&["(", ")"])).unwrap();
        assert!(!pda.process_input().unwrap());
        assert_eq!(pda.stack(), symbols(&["Z", "A"]));
        assert!(!pda.process_input().unwrap());
        assert_eq!(pda.stack(), symbols(&["Z"]));
        // input exhausted: the epsilon transition into q1 may still fire
        assert!(pda.process_input().unwrap());
        assert_eq!(pda.current_state().unwrap(), "q1");
    }

    #[test]
    fn reset_reseeds_the_stack() {
        let mut pda = balanced_parens();
        pda.set_input(&symbols(&["("])).unwrap();
        pda.process_input().unwrap();
        pda.reset();
        assert_eq!(pda.stack(), symbols(&["Z"]));
        assert_eq!(pda.current_state().unwrap(), "q0");
        assert_eq!(pda.input_head(), 0);
    }

    #[test]
    fn simulate_leaves_the_live_configuration_untouched() {
        let mut pda = balanced_parens();
        pda.set_input(&symbols(&["("])).unwrap();
        pda.process_input().unwrap();
        let stack_before = pda.stack();
        run(&pda, &["(", ")"]);
        assert_eq!(pda.stack(), stack_before);
        assert_eq!(pda.input_head(), 1);
    }

    #[test]
    fn deeper_budgets_preserve_acceptance() {
        let pda = balanced_parens();
        let input = symbols(&["(", "(", ")", ")"]);
        assert!(pda.simulate(&input, 5).unwrap());
        assert!(pda.simulate(&input, 500).unwrap());
    }
}
