use std::fmt::{self, Debug, Display, Formatter};
use std::hash::{Hash, Hasher};
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Serialize};

use crate::types::{Field, CANONICAL_BYTE_LEN};

/// `EPSILON = 2^64 - ORDER`, the trick constant that makes reduction modulo
/// `ORDER` a couple of wrapping adds instead of a division.
const EPSILON: u64 = (1 << 32) - 1;

/// An element of the 64-bit Goldilocks-shaped field `GF(2^64 - 2^32 + 1)`.
///
/// The representation is non-canonical: a value may sit anywhere in
/// `[0, 2^64)`, and is only reduced into `[0, ORDER)` on demand (equality,
/// hashing, and byte encoding all canonicalize first). This matches the
/// reference workspace's `GoldilocksField`, with the unsafe, architecture
/// specific fast paths dropped since this crate has no performance budget
/// that would justify them.
#[derive(Copy, Clone, Serialize, Deserialize)]
#[repr(transparent)]
pub struct GoldilocksField(pub u64);

impl GoldilocksField {
    pub const ORDER: u64 = 0xFFFF_FFFF_0000_0001;

    #[inline]
    fn to_canonical_u64(self) -> u64 {
        let mut c = self.0;
        if c >= Self::ORDER {
            c -= Self::ORDER;
        }
        c
    }
}

impl Default for GoldilocksField {
    fn default() -> Self {
        Self::ZERO
    }
}

impl PartialEq for GoldilocksField {
    fn eq(&self, other: &Self) -> bool {
        self.to_canonical_u64() == other.to_canonical_u64()
    }
}

impl Eq for GoldilocksField {}

impl Hash for GoldilocksField {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.to_canonical_u64())
    }
}

impl Display for GoldilocksField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_canonical_u64(), f)
    }
}

impl Debug for GoldilocksField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(&self.to_canonical_u64(), f)
    }
}

impl Field for GoldilocksField {
    const ZERO: Self = Self(0);
    const ONE: Self = Self(1);

    fn from_canonical_u64(n: u64) -> Self {
        debug_assert!(n < Self::ORDER, "{n} is not in canonical range");
        Self(n)
    }

    fn to_bytes_le(&self) -> [u8; CANONICAL_BYTE_LEN] {
        self.to_canonical_u64().to_le_bytes()
    }
}

impl Neg for GoldilocksField {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        if self.is_zero() {
            Self::ZERO
        } else {
            Self(Self::ORDER - self.to_canonical_u64())
        }
    }
}

impl Add for GoldilocksField {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let (sum, over) = self.0.overflowing_add(rhs.0);
        let (mut sum, over) = sum.overflowing_add((over as u64) * EPSILON);
        if over {
            sum += EPSILON;
        }
        Self(sum)
    }
}

impl AddAssign for GoldilocksField {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for GoldilocksField {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        let (diff, under) = self.0.overflowing_sub(rhs.0);
        let (mut diff, under) = diff.overflowing_sub((under as u64) * EPSILON);
        if under {
            diff -= EPSILON;
        }
        Self(diff)
    }
}

impl SubAssign for GoldilocksField {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl Mul for GoldilocksField {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        reduce128((self.0 as u128) * (rhs.0 as u128))
    }
}

impl MulAssign for GoldilocksField {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

/// Reduces a 128-bit product modulo `ORDER`, following the split-and-fold
/// trick used throughout the reference workspace's field implementation.
/// The result may be non-canonical (in `[0, 2^64)` rather than `[0, ORDER)`),
/// same as every other arithmetic op here.
#[inline]
fn reduce128(x: u128) -> GoldilocksField {
    let x_lo = x as u64;
    let x_hi = (x >> 64) as u64;
    let x_hi_hi = x_hi >> 32;
    let x_hi_lo = x_hi & EPSILON;

    let (mut t0, borrow) = x_lo.overflowing_sub(x_hi_hi);
    if borrow {
        t0 -= EPSILON;
    }
    let t1 = x_hi_lo * EPSILON;
    let (t2, over) = t0.overflowing_add(t1);
    let t2 = if over { t2 + EPSILON } else { t2 };
    GoldilocksField(t2)
}
