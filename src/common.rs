//! Vocabulary shared by every automaton family: the epsilon symbol, tape
//! directions, execution-mode markers and the default simulation budget.

use crate::errors::{AutomatonError, Result};

/// The empty symbol. A transition whose input equals [`EPSILON`] fires
/// without consuming input; alphabets never contain it.
pub const EPSILON: &str = "";

/// Step budget used when a caller does not provide one.
pub const DEFAULT_SIMULATION_DEPTH: usize = 50;

/// The symbol seeded at the bottom of every pushdown stack.
pub const INITIAL_STACK_SYMBOL: &str = "Z";

/// The blank symbol a Turing tape starts with unless configured otherwise.
pub const DEFAULT_BLANK_SYMBOL: &str = "_";

/// Head movement of a Turing machine on a single transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Stay,
}

impl Direction {
    /// Single-letter encoding used inside canonical transition keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Left => "L",
            Direction::Right => "R",
            Direction::Stay => "S",
        }
    }

    /// Parses the key encoding back; a token outside `L`/`R`/`S` means the
    /// key is malformed.
    pub fn from_key_token(token: &str) -> Result<Self> {
        match token {
            "L" => Ok(Direction::Left),
            "R" => Ok(Direction::Right),
            "S" => Ok(Direction::Stay),
            _ => Err(AutomatonError::TransitionNotFound(format!(
                "invalid direction token: {}",
                token
            ))),
        }
    }
}

impl Default for Direction {
    fn default() -> Self {
        Direction::Stay
    }
}

/// Marker for the deterministic variant of a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Deterministic;

/// Marker for the nondeterministic variant of a family.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NonDeterministic;

/// Seed the branch-selection RNG starts from, so nondeterministic stepping
/// is reproducible until a caller reseeds.
pub(crate) const DEFAULT_RNG_SEED: u64 = 0;

/// Tracks expansions of a nondeterministic frontier against the budget
/// `depth * |states|`; exceeding it means an epsilon cycle or a runaway
/// branching run.
#[derive(Debug, Clone)]
pub(crate) struct StepBudget {
    used: usize,
    limit: usize,
    depth: usize,
}

impl StepBudget {
    pub(crate) fn new(depth: usize, state_count: usize) -> Self {
        StepBudget {
            used: 0,
            limit: depth.saturating_mul(state_count.max(1)),
            depth,
        }
    }

    pub(crate) fn charge(&mut self) -> Result<()> {
        self.used += 1;
        if self.used > self.limit {
            Err(AutomatonError::SimulationDepthExceeded(self.depth))
        } else {
            Ok(())
        }
    }
}

/// Renders a batch of offending keys the way batched error messages expect,
/// e.g. `[q1, q2]`.
pub(crate) fn format_list<S: AsRef<str>>(items: &[S]) -> String {
    let joined = items
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", joined)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_key_tokens_round_trip() {
        for &dir in &[Direction::Left, Direction::Right, Direction::Stay] {
            assert_eq!(Direction::from_key_token(dir.as_str()).unwrap(), dir);
        }
        assert!(Direction::from_key_token("UP").is_err());
    }

    #[test]
    fn list_formatting() {
        assert_eq!(format_list(&["a", "b"]), "[a, b]");
        assert_eq!(format_list::<&str>(&[]), "[]");
    }
}
