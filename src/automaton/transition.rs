//! Canonical transition keys and the record interface the storage core
//! works against.

use std::fmt::Debug;

use crate::errors::{AutomatonError, Result};

/// Delimiter joining the fields of a canonical key. Legal state labels and
/// symbols must never contain it, otherwise keys stop being parseable.
pub const KEY_DELIMITER: char = '-';

/// What the generic storage core needs to know about a family's transition
/// record.
///
/// A record's identity is its canonical key, derived from its fields in a
/// fixed order; two records with equal keys are the same transition. Field
/// setters therefore change the identity, and the owning state re-indexes
/// the record under the fresh key.
pub trait TransitionRecord: Clone + Debug + PartialEq {
    /// Canonical key derived from the record's current fields.
    fn key(&self) -> String;

    /// Label of the state owning this transition.
    fn from_state(&self) -> &str;

    /// Label of the state this transition enters.
    fn to_state(&self) -> &str;

    fn set_from_state(&mut self, label: &str);

    fn set_to_state(&mut self, label: &str);
}

/// Joins fields into a canonical key.
pub(crate) fn join_key(fields: &[&str]) -> String {
    fields.join("-")
}

/// Splits a key into exactly `expected` fields.
///
/// A key with the wrong number of delimiter segments is malformed and is
/// reported as a missing transition, since no transition can carry it.
pub(crate) fn split_key(key: &str, expected: usize) -> Result<Vec<&str>> {
    let fields: Vec<&str> = key.split(KEY_DELIMITER).collect();
    if fields.len() != expected {
        return Err(AutomatonError::TransitionNotFound(format!(
            "invalid transition key format: {}",
            key
        )));
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_rejects_wrong_segment_count() {
        assert_eq!(split_key("q0-q1-a", 3).unwrap(), vec!["q0", "q1", "a"]);
        assert!(split_key("q0-q1", 3).is_err());
        assert!(split_key("q0-q1-a-b", 3).is_err());
    }

    #[test]
    fn epsilon_fields_survive_the_round_trip() {
        let key = join_key(&["q0", "q1", ""]);
        assert_eq!(key, "q0-q1-");
        assert_eq!(split_key(&key, 3).unwrap(), vec!["q0", "q1", ""]);
    }
}
