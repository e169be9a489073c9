use std::cmp::Ordering;

/// A wire-carrying value: either supplied by the caller (`External`, 1-based)
/// or introduced by the builder while lowering a constraint (`Internal`).
///
/// Ordered first by tag (external before internal) and then by id, which is
/// the order the digest and the linear-combination canonicalizer rely on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variable {
    External(u32),
    Internal(u64),
}

impl Variable {
    pub fn is_external(self) -> bool {
        matches!(self, Variable::External(_))
    }

    pub fn is_internal(self) -> bool {
        matches!(self, Variable::Internal(_))
    }
}

impl PartialOrd for Variable {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Variable {
    fn cmp(&self, other: &Self) -> Ordering {
        use Variable::*;
        match (self, other) {
            (External(a), External(b)) => a.cmp(b),
            (Internal(a), Internal(b)) => a.cmp(b),
            (External(_), Internal(_)) => Ordering::Less,
            (Internal(_), External(_)) => Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_sorts_before_internal() {
        assert!(Variable::External(5) < Variable::Internal(0));
    }

    #[test]
    fn ordering_within_tag_follows_id() {
        assert!(Variable::External(1) < Variable::External(2));
        assert!(Variable::Internal(10) < Variable::Internal(11));
    }
}
