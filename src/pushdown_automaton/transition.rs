//! Pushdown automaton transitions:
//! `(fromState, toState, input, stackSymbol, pushSymbol)`.

use crate::automaton::transition::{join_key, split_key, TransitionRecord};
use crate::errors::Result;

/// One pushdown rule. Firing pops `stack_symbol` and pushes the symbols of
/// `push_symbol` left to right, so the rightmost symbol ends on top; an
/// empty push string is a pure pop.
///
/// Identity is the canonical key `from-to-input-stackSymbol-pushSymbol`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PdaTransition {
    from_state: String,
    to_state: String,
    input: String,
    stack_symbol: String,
    push_symbol: String,
}

impl PdaTransition {
    pub fn new(
        from_state: &str,
        to_state: &str,
        input: &str,
        stack_symbol: &str,
        push_symbol: &str,
    ) -> Self {
        PdaTransition {
            from_state: from_state.to_string(),
            to_state: to_state.to_string(),
            input: input.to_string(),
            stack_symbol: stack_symbol.to_string(),
            push_symbol: push_symbol.to_string(),
        }
    }

    /// Input symbol consumed by this transition; empty means epsilon.
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, input: &str) {
        self.input = input.to_string();
    }

    /// Stack symbol popped when the transition fires.
    pub fn stack_symbol(&self) -> &str {
        &self.stack_symbol
    }

    pub fn set_stack_symbol(&mut self, stack_symbol: &str) {
        self.stack_symbol = stack_symbol.to_string();
    }

    /// The raw comma-separated push string.
    pub fn push_symbol(&self) -> &str {
        &self.push_symbol
    }

    pub fn set_push_symbol(&mut self, push_symbol: &str) {
        self.push_symbol = push_symbol.to_string();
    }

    /// The push string split into individual stack symbols, in push order.
    pub fn push_symbols(&self) -> Vec<String> {
        if self.push_symbol.is_empty() {
            return Vec::new();
        }
        self.push_symbol.split(',').map(|s| s.to_string()).collect()
    }

    pub fn generate_key(
        from_state: &str,
        to_state: &str,
        input: &str,
        stack_symbol: &str,
        push_symbol: &str,
    ) -> String {
        join_key(&[from_state, to_state, input, stack_symbol, push_symbol])
    }

    pub fn from_state_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[0].to_string())
    }

    pub fn to_state_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[1].to_string())
    }

    pub fn input_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[2].to_string())
    }

    pub fn stack_symbol_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[3].to_string())
    }

    pub fn push_symbol_of_key(key: &str) -> Result<String> {
        Ok(split_key(key, 5)?[4].to_string())
    }

    pub(crate) fn parse_key(key: &str) -> Result<PdaTransition> {
        let fields = split_key(key, 5)?;
        Ok(PdaTransition::new(
            fields[0], fields[1], fields[2], fields[3], fields[4],
        ))
    }
}

impl TransitionRecord for PdaTransition {
    fn key(&self) -> String {
        PdaTransition::generate_key(
            &self.from_state,
            &self.to_state,
            &self.input,
            &self.stack_symbol,
            &self.push_symbol,
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
        let t = PdaTransition::new("q0", "q1", "(", "Z", "Z,A");
        let key = t.key();
        assert_eq!(key, "q0-q1-(-Z-Z,A");
        assert_eq!(PdaTransition::from_state_of_key(&key).unwrap(), "q0");
        assert_eq!(PdaTransition::to_state_of_key(&key).unwrap(), "q1");
        assert_eq!(PdaTransition::input_of_key(&key).unwrap(), "(");
        assert_eq!(PdaTransition::stack_symbol_of_key(&key).unwrap(), "Z");
        assert_eq!(PdaTransition::push_symbol_of_key(&key).unwrap(), "Z,A");
        assert_eq!(PdaTransition::parse_key(&key).unwrap(), t);
    }

    #[test]
    fn malformed_keys_are_missing_transitions() {
        assert!(PdaTransition::parse_key("q0-q1-a").is_err());
        assert!(PdaTransition::input_of_key("q0-q1-a-Z-A-extra").is_err());
    }

    #[test]
    fn push_string_splits_in_push_order() {
        let t = PdaTransition::new("q0", "q0", "(", "Z", "Z,A");
        assert_eq!(t.push_symbols(), vec!["Z".to_string(), "A".to_string()]);
        let pop = PdaTransition::new("q0", "q0", ")", "A", "");
        assert!(pop.push_symbols().is_empty());
    }
}
