use std::ops::{Add, Mul};

use plonk_cs_field::Field;

/// A symbolic expression over external variables: constants, variable
/// references, sums, and scalar multiples. Built up by callers and flattened
/// by [`crate::canonical::canonicalize`] before it ever touches a gate.
///
/// This is deliberately a closed, four-variant tree rather than an
/// extensible trait-object graph: the design doc's "open constructor
/// pattern" note (§9) calls out that a closed-world reimplementation should
/// use one tagged union, which is what this is.
#[derive(Debug, Clone)]
pub enum Expr<F> {
    Const(F),
    Var(u32),
    Add(Box<Expr<F>>, Box<Expr<F>>),
    Scale(F, Box<Expr<F>>),
}

impl<F: Field> Expr<F> {
    pub fn constant(value: F) -> Self {
        Expr::Const(value)
    }

    pub fn var(id: u32) -> Self {
        assert!(id >= 1, "external variable ids are 1-based");
        Expr::Var(id)
    }

    pub fn scale(self, factor: F) -> Self {
        Expr::Scale(factor, Box::new(self))
    }
}

impl<F: Field> Add for Expr<F> {
    type Output = Expr<F>;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(Box::new(self), Box::new(rhs))
    }
}

impl<F: Field> Mul<F> for Expr<F> {
    type Output = Expr<F>;

    fn mul(self, scalar: F) -> Self::Output {
        Expr::Scale(scalar, Box::new(self))
    }
}
