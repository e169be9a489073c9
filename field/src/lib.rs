//! Prime field arithmetic for the PLONK constraint system builder.
//!
//! This crate intentionally exposes a much smaller surface than a general
//! purpose field library: constant-time-shaped arithmetic, equality, and a
//! fixed-width little-endian byte encoding used only for hashing. There is no
//! FFT, no field extension, and no polynomial support here; those concerns
//! belong to a prover backend that is out of scope for this crate.

mod goldilocks;
mod ops;
mod types;

pub use goldilocks::GoldilocksField;
pub use ops::Square;
pub use types::Field;
