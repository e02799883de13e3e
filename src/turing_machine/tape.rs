//! The Turing machine tape.

use std::collections::BTreeMap;

use crate::common::{Direction, DEFAULT_BLANK_SYMBOL};

/// A semi-infinite tape of text symbols with a movable head.
///
/// Cells are stored sparsely; a cell never written reads as the blank
/// symbol. Position 0 is the left end, and moving left there is a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tape {
    cells: BTreeMap<usize, String>,
    head: usize,
    blank_symbol: String,
}

impl Tape {
    pub fn new(blank_symbol: &str) -> Self {
        Tape {
            cells: BTreeMap::new(),
            head: 0,
            blank_symbol: blank_symbol.to_string(),
        }
    }

    /// Clears the tape, writes `input` starting at position 0 and returns
    /// the head to the left end.
    pub fn load_input(&mut self, input: &[String]) {
        self.cells.clear();
        self.head = 0;
        for (index, symbol) in input.iter().enumerate() {
            self.cells.insert(index, symbol.clone());
        }
    }

    /// Writes `input` after the last written cell, leaving the head where
    /// it is.
    pub fn append(&mut self, input: &[String]) {
        let mut next = self
            .cells
            .keys()
            .next_back()
            .map(|last| last + 1)
            .unwrap_or(0);
        for symbol in input {
            self.cells.insert(next, symbol.clone());
            next += 1;
        }
    }

    /// The symbol under the head; blank if that cell was never written.
    pub fn read(&self) -> String {
        self.cells
            .get(&self.head)
            .cloned()
            .unwrap_or_else(|| self.blank_symbol.clone())
    }

    pub fn write(&mut self, symbol: &str) {
        self.cells.insert(self.head, symbol.to_string());
    }

    pub fn move_head(&mut self, direction: Direction) {
        match direction {
            Direction::Left => {
                if self.head > 0 {
                    self.head -= 1;
                }
            }
            Direction::Right => self.head += 1,
            Direction::Stay => {}
        }
    }

    pub fn head_position(&self) -> usize {
        self.head
    }

    pub fn set_head_position(&mut self, position: usize) {
        self.head = position;
    }

    pub fn is_at_left_end(&self) -> bool {
        self.head == 0
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn blank_symbol(&self) -> &str {
        &self.blank_symbol
    }

    /// Changes the blank symbol and rewrites every cell currently holding
    /// the old blank, so old physical blanks remain logical blanks.
    pub fn set_blank_symbol(&mut self, blank_symbol: &str) {
        for symbol in self.cells.values_mut() {
            if *symbol == self.blank_symbol {
                *symbol = blank_symbol.to_string();
            }
        }
        self.blank_symbol = blank_symbol.to_string();
    }

    /// Clears every cell and returns the head to the left end.
    pub fn reset(&mut self) {
        self.cells.clear();
        self.head = 0;
    }

    /// The dense region of the tape, from position 0 through the last
    /// written cell; gaps read as the blank symbol.
    pub fn contents(&self) -> Vec<String> {
        let last = match self.cells.keys().next_back() {
            Some(last) => *last,
            None => return Vec::new(),
        };
        (0..=last)
            .map(|index| {
                self.cells
                    .get(&index)
                    .cloned()
                    .unwrap_or_else(|| self.blank_symbol.clone())
            })
            .collect()
    }
}

impl Default for Tape {
    fn default() -> Self {
        Tape::new(DEFAULT_BLANK_SYMBOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn unwritten_cells_read_blank() {
        let tape = Tape::default();
        assert_eq!(tape.read(), "_");
        assert!(tape.is_empty());
    }

    #[test]
    fn load_input_rewinds_the_head() {
        let mut tape = Tape::default();
        tape.write("x");
        tape.move_head(Direction::Right);
        tape.load_input(&symbols(&["1", "0"]));
        assert_eq!(tape.head_position(), 0);
        assert_eq!(tape.read(), "1");
        assert_eq!(tape.contents(), symbols(&["1", "0"]));
    }

    #[test]
    fn the_left_end_is_a_wall() {
        let mut tape = Tape::default();
        assert!(tape.is_at_left_end());
        tape.move_head(Direction::Left);
        assert_eq!(tape.head_position(), 0);
        tape.move_head(Direction::Right);
        tape.move_head(Direction::Left);
        assert!(tape.is_at_left_end());
    }

    #[test]
    fn stay_keeps_the_head_in_place() {
        let mut tape = Tape::default();
        tape.move_head(Direction::Right);
        tape.move_head(Direction::Stay);
        assert_eq!(tape.head_position(), 1);
    }

    #[test]
    fn changing_the_blank_symbol_rewrites_old_blanks() {
        let mut tape = Tape::default();
        tape.write("_");
        tape.move_head(Direction::Right);
        tape.write("1");
        tape.set_blank_symbol("#");
        tape.set_head_position(0);
        assert_eq!(tape.read(), "#");
        assert_eq!(tape.contents(), symbols(&["#", "1"]));
        // cells never written follow the new blank too
        tape.set_head_position(9);
        assert_eq!(tape.read(), "#");
    }

    #[test]
    fn contents_fill_gaps_with_blanks() {
        let mut tape = Tape::default();
        tape.set_head_position(2);
        tape.write("1");
        assert_eq!(tape.contents(), symbols(&["_", "_", "1"]));
    }

    #[test]
    fn reset_clears_cells_and_head() {
        let mut tape = Tape::default();
        tape.write("1");
        tape.move_head(Direction::Right);
        tape.reset();
        assert!(tape.is_empty());
        assert!(tape.is_at_left_end());
    }
}
