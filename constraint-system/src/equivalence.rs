use std::collections::HashMap;

use crate::variable::Variable;

/// A row index relative to either the synthesized public-input block or the
/// user-supplied gate stream. Kept as two variants rather than a single
/// absolute `u32` until finalization, because the public input size isn't
/// known while constraints are still being accepted (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Row {
    PublicInput(u32),
    AfterPublicInput(u32),
}

impl Row {
    /// Resolves this row to its absolute index once the public input size is
    /// fixed: `PublicInput(i) -> i`, `AfterPublicInput(i) -> i + n`.
    pub fn to_absolute(self, public_input_size: u32) -> u64 {
        match self {
            Row::PublicInput(i) => i as u64,
            Row::AfterPublicInput(i) => i as u64 + public_input_size as u64,
        }
    }
}

/// A single wire: a row and one of its three columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: Row,
    pub col: u8,
}

impl Position {
    pub fn new(row: Row, col: u8) -> Self {
        debug_assert!(col < 3, "gate rows only have three columns");
        Position { row, col }
    }

    /// Builds a position with no column bound check, for the one gate shape
    /// that needs it: `EC_endoscale` kind-8 rows only carry two real wires,
    /// and the unused third slot's back-pointer is conventionally "column 3"
    /// rather than a self-loop at a real column (§9, open question).
    pub(crate) fn new_unchecked(row: Row, col: u8) -> Self {
        Position { row, col }
    }
}

/// Tracks, for every variable ever wired into the circuit, the list of
/// positions it occupies with the most recent occurrence at the head.
///
/// This is the raw material for PLONK's copy-permutation argument: each gate
/// records a back-pointer to the *previous* occurrence of the same variable
/// (§4.3), and a downstream prover closes each variable's list into a cycle
/// by linking the last entry back to the head.
#[derive(Debug, Default)]
pub struct EquivalenceClasses {
    classes: HashMap<Variable, Vec<Position>>,
}

impl EquivalenceClasses {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `v` now occupies `position`, returning the position it
    /// previously occupied (or `position` itself, a self-loop, on first
    /// occurrence).
    pub fn wire(&mut self, v: Variable, position: Position) -> Position {
        let entry = self.classes.entry(v).or_default();
        let prev = entry.first().copied().unwrap_or(position);
        entry.insert(0, position);
        prev
    }

    pub fn occurrences(&self, v: Variable) -> usize {
        self.classes.get(&v).map_or(0, Vec::len)
    }

    pub fn contains(&self, v: Variable) -> bool {
        self.classes.contains_key(&v)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_occurrence_self_loops() {
        let mut classes = EquivalenceClasses::new();
        let pos = Position::new(Row::AfterPublicInput(0), 0);
        let prev = classes.wire(Variable::External(1), pos);
        assert_eq!(prev, pos);
        assert_eq!(classes.occurrences(Variable::External(1)), 1);
    }

    #[test]
    fn second_occurrence_points_back_at_first() {
        let mut classes = EquivalenceClasses::new();
        let first = Position::new(Row::AfterPublicInput(0), 0);
        let second = Position::new(Row::AfterPublicInput(1), 2);
        classes.wire(Variable::External(1), first);
        let prev = classes.wire(Variable::External(1), second);
        assert_eq!(prev, first);
        assert_eq!(classes.occurrences(Variable::External(1)), 2);
    }

    #[test]
    fn unseen_variable_has_no_class() {
        let classes = EquivalenceClasses::new();
        assert!(!classes.contains(Variable::External(9)));
        assert_eq!(classes.occurrences(Variable::External(9)), 0);
    }
}
