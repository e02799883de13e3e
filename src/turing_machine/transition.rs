//! Turing machine transitions:
//! `(fromState, toState, readSymbol, writeSymbol, direction)`.

use crate::automaton::transition::{join_key, split_key, TransitionRecord};
use crate::common::Direction;
use crate::errors::Result;

/// One Turing rule. An empty `read_symbol` matches any tape symbol; an
/// empty `write_symbol` leaves the cell unchanged.
///
/// Identity is the canonical key `from-to-read-write-direction`, with the
/// direction encoded as `L`, `R` or `S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmTransition {
    from_state: String,
    to_state: String,
    read_symbol: String,
    write_symbol: String,
    direction: Direction,
}

impl TmTransition {
    pub fn new(
        from_state: &str,
        to_state: &str,
        read_symbol: &str,
        write_symbol: &str,
        direction: Direction,
    ) -> Self {
        TmTransition {
            from_state: from_state.to_string(),
            to_state: to_state.to_string(),
            read_symbol: read_symbol.to_string(),
            write_symbol: write_symbol.to_string(),
            direction,
        }
    }

    /// Tape symbol this transition requires under the head; empty matches
    /// anything.
    pub fn read_symbol(&self) -> &str {
        &self.read_symbol
    }

    pub fn set_read_symbol(&mut self, read_symbol: &str) {
        self.read_symbol = read_symbol.to_string();
    }

    /// Symbol written before moving; empty leaves the cell unchanged.
    pub fn write_symbol(&self) -> &str {
        &self.write_symbol
    }

    pub fn set_write_symbol(&mut self, write_symbol: &str) {
        self.write_symbol = write_symbol.to_string();
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    pub fn generate_key(
        from_state: &str,
        to_state: &str,
        read_symbol: &str,
        write_symbol: &str,
        direction: Direction,
    ) -> String {
        join_key(&[
            from_state,
            to_state,
            read_symbol,
            write_symbol,
            direction.as_str(),
        ])
    }

    pub fn from_state_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[0].to_string())
    }

    pub fn to_state_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[1].to_string())
    }

    pub fn read_symbol_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[2].to_string())
    }

    pub fn write_symbol_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[3].to_string())
    }

    pub fn direction_of_key(key: &str) -> Result<Direction> {
        Direction::from_key_token(split_key(key, 5)?[4])
    }

    pub(crate) fn parse_key(key: &str) -> Result<TmTransition> {
        let fields = split_key(key, 5)?;
        let direction = Direction::from_key_token(fields[4])?;
        Ok(TmTransition::new(
            fields[0], fields[1], fields[2], fields[3], direction,
        ))
    }
}

impl TransitionRecord for TmTransition {
    fn key(&self) -> String {
        TmTransition::generate_key(
            &self.from_state,
            &self.to_state,
            &self.read_symbol,
            &self.write_symbol,
            self.direction,
        )
    }

    fn from_state(&self) -> &str {
        &self.from_state
    }

    fn to_state(&self) -> &str {
        &self.to_state
    }

    fn set_from_state(&mut self, label: &str) {
        self.from_state = label.to_string();
    }

    fn set_to_state(&mut self, label: &str) {
        self.to_state = label.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_round_trip() {
        let t = TmTransition::new("q0", "q1", "1", "_", Direction::Right);
        let key = t.key();
        assert_eq!(key, "q0-q1-1-_-R");
        assert_eq!(TmTransition::from_state_of_key(&key).unwrap(), "q0");
        assert_eq!(TmTransition::to_state_of_key(&key).unwrap(), "q1");
        assert_eq!(TmTransition::read_symbol_of_key(&key).unwrap(), "1");
        assert_eq!(TmTransition::write_symbol_of_key(&key).unwrap(), "_");
        assert_eq!(
            TmTransition::direction_of_key(&key).unwrap(),
            Direction::Right
        );
        assert_eq!(TmTransition::parse_key(&key).unwrap(), t);
    }

    #[test]
    fn malformed_keys_are_missing_transitions() {
        assert!(TmTransition::parse_key("q0-q1-1-_").is_err());
        assert!(TmTransition::parse_key("q0-q1-1-_-X").is_err());
    }

    #[test]
    fn epsilon_read_and_write_keep_their_segments() {
        let t = TmTransition::new("q0", "q1", "", "", Direction::Stay);
        assert_eq!(t.key(), "q0-q1---S");
        let parsed = TmTransition::parse_key(&t.key()).unwrap();
        assert_eq!(parsed.read_symbol(), "");
        assert_eq!(parsed.write_symbol(), "");
    }
}
