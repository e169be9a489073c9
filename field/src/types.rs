use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use crate::ops::Square;

/// The byte width of the canonical little-endian encoding fed to the
/// circuit digest. Every coefficient hashed by the constraint system feeds
/// exactly this many bytes (§6.2 of the design doc): a field whose modulus
/// needs more than 64 bits would have to widen this constant.
pub const CANONICAL_BYTE_LEN: usize = 8;

/// A prime field element, abstracted just enough to drive gate lowering and
/// witness evaluation.
///
/// This mirrors the shape of the reference workspace's `Field` trait, pared
/// down to the handful of operations the constraint system builder actually
/// calls: there is no FFT, no extension field, and no serialization beyond
/// the fixed-width byte encoding used for hashing.
pub trait Field:
    'static
    + Copy
    + Clone
    + Debug
    + Default
    + Eq
    + Hash
    + Send
    + Sync
    + Square
    + Neg<Output = Self>
    + Add<Self, Output = Self>
    + AddAssign<Self>
    + Sub<Self, Output = Self>
    + SubAssign<Self>
    + Mul<Self, Output = Self>
    + MulAssign<Self>
{
    const ZERO: Self;
    const ONE: Self;

    #[inline]
    fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[inline]
    fn is_one(&self) -> bool {
        *self == Self::ONE
    }

    /// Builds a field element from a small non-negative integer, used
    /// throughout gate lowering to materialize selector constants like `-1`.
    fn from_canonical_u64(n: u64) -> Self;

    /// The fixed-width little-endian encoding used exclusively by the
    /// digest accumulator (§4.9). Not guaranteed to be the most compact
    /// representation of the field's order, only a stable one.
    fn to_bytes_le(&self) -> [u8; CANONICAL_BYTE_LEN];
}
