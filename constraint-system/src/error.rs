use thiserror::Error;

/// Which eager constant check tripped. Kept separate from
/// [`ConstraintSystemError`] so callers can match on the failing constraint
/// family without destructuring a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertKind {
    Boolean,
    Equal,
    Square,
    R1cs,
}

impl std::fmt::Display for AssertKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            AssertKind::Boolean => "boolean",
            AssertKind::Equal => "equal",
            AssertKind::Square => "square",
            AssertKind::R1cs => "r1cs",
        };
        write!(f, "{name}")
    }
}

/// Reportable failures from [`crate::system::ConstraintSystem::add_constraint`].
///
/// Usage errors (finalizing twice, adding a constraint after finalization,
/// double-setting the public input size, an undefined internal variable
/// turning up during witness generation) are *not* represented here: the
/// design doc treats those as programmer bugs and the builder panics on them
/// the same way the reference workspace's `CircuitBuilder` panics on
/// malformed wiring requests, rather than threading a `Result` through every
/// call site for conditions a caller cannot recover from.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintSystemError {
    #[error("generic constraint requires a non-constant operand when m != 0")]
    NonConstantRequired,
    #[error("unsupported constraint kind: {0}")]
    UnsupportedConstraint(&'static str),
    #[error("constraint is unsatisfiable over its constant operands ({0})")]
    AssertFailure(AssertKind),
}
