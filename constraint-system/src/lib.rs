//! A PLONK constraint system builder.
//!
//! A small compiler from a high-level algebraic constraint language
//! (equalities, booleans, R1CS, generic arithmetic gates, and the gadget
//! families for Poseidon and elliptic-curve arithmetic) into a fixed-arity
//! three-wire gate table, with linear-combination reduction, a
//! copy-permutation argument, and a deterministic digest of the compiled
//! circuit. No proof is ever generated here; see the crate-level design
//! doc for the full non-goal list.

mod canonical;
mod config;
mod constraint;
mod digest;
mod equivalence;
mod error;
mod expr;
mod gate;
mod internal;
mod poseidon;
mod row;
mod system;
mod variable;
mod witness;

pub use canonical::{canonicalize, Canonical};
pub use config::SystemConfig;
pub use constraint::{Constraint, EndoRound, GenericConstraint, Point, ScaleRound};
pub use error::{AssertKind, ConstraintSystemError};
pub use expr::Expr;
pub use gate::{GateKind, GateSpec, GateVectorSink, RawGate, VecSink};
pub use poseidon::PoseidonParams;
pub use system::ConstraintSystem;
pub use variable::Variable;
