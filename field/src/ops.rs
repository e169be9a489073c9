use std::ops::Mul;

/// Squaring, broken out into its own trait the way the reference workspace
/// separates it from the core `Field` trait, so gate selectors that only ever
/// need `x * x` don't have to name the whole arithmetic bundle.
pub trait Square {
    fn square(&self) -> Self;
}

impl<F: Mul<F, Output = Self> + Copy> Square for F {
    fn square(&self) -> Self {
        *self * *self
    }
}
