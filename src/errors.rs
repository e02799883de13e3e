//! The error taxonomy shared by all six automaton families.
//!
//! Every fallible operation reports one of these kinds at the API boundary.
//! Validation always precedes mutation, so an `Err` return means the
//! automaton is exactly as it was before the call; batched operations are
//! all-or-nothing.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, AutomatonError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AutomatonError {
    /// An operation named a state that is not in the state table. Batched
    /// operations report every missing label at once.
    #[error("State not found: {0}")]
    StateNotFound(String),

    /// An operation named an input alphabet symbol that is absent.
    #[error("Input alphabet symbol not found: {0}")]
    InputAlphabetSymbolNotFound(String),

    /// A pushdown operation named a stack alphabet symbol that is absent.
    #[error("Stack alphabet symbol not found: {0}")]
    StackAlphabetSymbolNotFound(String),

    /// A Turing operation named a tape alphabet symbol that is absent.
    #[error("Tape alphabet symbol not found: {0}")]
    TapeAlphabetSymbolNotFound(String),

    /// A transition key has no backing transition, or the key itself is
    /// malformed.
    #[error("Transition not found: {0}")]
    TransitionNotFound(String),

    /// The start state was read while unset, or set to a missing state.
    #[error("Invalid start state: {0}")]
    InvalidStartState(String),

    /// A transition's trigger fields are outside their alphabets, or an
    /// update would duplicate an existing transition.
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    /// A structural violation: duplicate state label, strict removal of a
    /// referenced entity, a determinism violation, or start and current
    /// state both unset.
    #[error("Invalid automaton definition: {0}")]
    InvalidAutomatonDefinition(String),

    /// A bounded simulation exhausted its step budget.
    #[error("Simulation depth of {0} exceeded")]
    SimulationDepthExceeded(usize),
}
