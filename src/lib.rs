//! Construction and simulation of the canonical automaton families:
//! deterministic and nondeterministic finite automata, pushdown automata
//! and Turing machines.
//!
//! Each family offers the same two execution modes: [`process_input`]
//! advances a live configuration by one step, while [`simulate`] runs a
//! whole input against a fresh configuration under a bounded exploration
//! budget. Nondeterministic stepping tracks the full frontier of possible
//! configurations and exposes a randomly chosen representative.
//!
//! [`process_input`]: finite_automaton::DeterministicFiniteAutomaton::process_input
//! [`simulate`]: finite_automaton::DeterministicFiniteAutomaton::simulate
//!
//! ```
//! use automata_simulator::{DeterministicFiniteAutomaton, DEFAULT_SIMULATION_DEPTH};
//!
//! // strings over {0, 1} with an even number of 1s
//! let mut dfa = DeterministicFiniteAutomaton::new();
//! dfa.add_input_alphabet(&["0".to_string(), "1".to_string()]);
//! dfa.add_state("even", true).unwrap();
//! dfa.add_state("odd", false).unwrap();
//! dfa.set_start_state("even").unwrap();
//! dfa.add_transition("even", "even", "0").unwrap();
//! dfa.add_transition("even", "odd", "1").unwrap();
//! dfa.add_transition("odd", "odd", "0").unwrap();
//! dfa.add_transition("odd", "even", "1").unwrap();
//!
//! let input = vec!["1".to_string(), "0".to_string(), "1".to_string()];
//! assert!(dfa.simulate(&input, DEFAULT_SIMULATION_DEPTH).unwrap());
//! ```

pub mod automaton;
pub mod common;
pub mod errors;
pub mod finite_automaton;
pub mod pushdown_automaton;
pub mod turing_machine;

pub use crate::automaton::{State, TransitionRecord, KEY_DELIMITER};
pub use crate::common::{
    Deterministic, Direction, NonDeterministic, DEFAULT_BLANK_SYMBOL, DEFAULT_SIMULATION_DEPTH,
    EPSILON, INITIAL_STACK_SYMBOL,
};
pub use crate::errors::{AutomatonError, Result};
pub use crate::finite_automaton::{
    DeterministicFiniteAutomaton, FaState, FaTransition, FiniteAutomaton,
    NonDeterministicFiniteAutomaton,
};
pub use crate::pushdown_automaton::{
    DeterministicPushdownAutomaton, NonDeterministicPushdownAutomaton, PdaState, PdaTransition,
    PushdownAutomaton,
};
pub use crate::turing_machine::{
    DeterministicTuringMachine, NonDeterministicTuringMachine, Tape, TmState, TmTransition,
    TuringMachine,
};
