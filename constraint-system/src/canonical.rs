use itertools::Itertools;
use plonk_cs_field::Field;

use crate::expr::Expr;

/// The result of flattening and canonicalizing an [`Expr`]: a constant term
/// plus a list of `(coefficient, external_var_id)` pairs, sorted by id with
/// duplicate ids fused by summing coefficients left to right.
///
/// Per §4.1 of the design doc, fused coefficients that happen to sum to zero
/// are *kept*, not dropped: the digest must stay sensitive to the original
/// multiset of terms, not just their cancelled sum. Only the `constant`
/// field collapses multiple `Const` nodes into one, since there is no
/// equivalent "identity" to preserve for a scalar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canonical<F> {
    pub constant: Option<F>,
    pub terms: Vec<(F, u32)>,
}

impl<F: Field> Canonical<F> {
    /// The term list with the constant (if any) prepended as a synthetic
    /// term with id `0`, used only by the digest accumulator (§4.9).
    /// External variable ids are 1-based so id `0` can never collide.
    pub fn terms_with_constant_prefix(&self) -> Vec<(F, u32)> {
        let mut out = Vec::with_capacity(self.terms.len() + 1);
        if let Some(c) = self.constant {
            out.push((c, 0));
        }
        out.extend_from_slice(&self.terms);
        out
    }

    pub fn had_constant(&self) -> bool {
        self.constant.is_some()
    }

    pub fn num_terms(&self) -> usize {
        self.terms.len()
    }
}

/// Walks an [`Expr`] tree, summing constants and collecting every
/// `(coefficient, var_id)` leaf without sorting or fusing. `Add` merges both
/// sides; `Scale` distributes the factor over whatever the inner expression
/// flattened to.
fn flatten<F: Field>(expr: &Expr<F>) -> (Option<F>, Vec<(F, u32)>) {
    match expr {
        Expr::Const(c) => (Some(*c), Vec::new()),
        Expr::Var(id) => (None, vec![(F::ONE, *id)]),
        Expr::Add(lhs, rhs) => {
            let (lc, mut lt) = flatten(lhs);
            let (rc, rt) = flatten(rhs);
            let constant = match (lc, rc) {
                (Some(a), Some(b)) => Some(a + b),
                (Some(a), None) => Some(a),
                (None, Some(b)) => Some(b),
                (None, None) => None,
            };
            lt.extend(rt);
            (constant, lt)
        }
        Expr::Scale(factor, inner) => {
            let (c, terms) = flatten(inner);
            let constant = c.map(|c| c * *factor);
            let terms = terms.into_iter().map(|(coeff, id)| (coeff * *factor, id)).collect();
            (constant, terms)
        }
    }
}

/// Canonicalizes an expression: sorts terms by variable id and fuses runs of
/// equal id by summing coefficients left to right, in the order they appear
/// after the sort. See [`Canonical`] for why zero-sum fusions are retained.
pub fn canonicalize<F: Field>(expr: &Expr<F>) -> Canonical<F> {
    let (constant, mut terms) = flatten(expr);
    terms.sort_by_key(|(_, id)| *id);

    let fused = terms
        .into_iter()
        .coalesce(|(c1, id1), (c2, id2)| {
            if id1 == id2 {
                Ok((c1 + c2, id1))
            } else {
                Err(((c1, id1), (c2, id2)))
            }
        })
        .collect();

    Canonical { constant, terms: fused }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plonk_cs_field::GoldilocksField as F;

    fn c(n: u64) -> Expr<F> {
        Expr::constant(F::from_canonical_u64(n))
    }

    fn v(id: u32) -> Expr<F> {
        Expr::var(id)
    }

    #[test]
    fn canonicalize_is_commutative_in_addition_order() {
        let a = v(1) + v(2);
        let b = v(2) + v(1);
        assert_eq!(canonicalize(&a), canonicalize(&b));
    }

    #[test]
    fn duplicate_vars_are_fused_by_summing() {
        let e = v(3) + v(3);
        let canon = canonicalize(&e);
        assert_eq!(canon.terms, vec![(F::from_canonical_u64(2), 3)]);
    }

    #[test]
    fn constant_is_summed_and_kept_separate() {
        let e = c(2) + v(1) + c(3);
        let canon = canonicalize(&e);
        assert_eq!(canon.constant, Some(F::from_canonical_u64(5)));
        assert_eq!(canon.terms, vec![(F::ONE, 1)]);
    }

    #[test]
    fn scale_distributes_over_sum() {
        let e = (v(1) + v(2)).scale(F::from_canonical_u64(3));
        let canon = canonicalize(&e);
        assert_eq!(
            canon.terms,
            vec![(F::from_canonical_u64(3), 1), (F::from_canonical_u64(3), 2)]
        );
    }

    #[test]
    fn zero_sum_fusion_is_not_dropped() {
        let e = v(1).scale(F::ONE) + v(1).scale(-F::ONE);
        let canon = canonicalize(&e);
        assert_eq!(canon.terms, vec![(F::ZERO, 1)]);
    }

    #[test]
    fn constant_prefix_uses_id_zero() {
        let e = c(7) + v(2);
        let canon = canonicalize(&e);
        assert_eq!(
            canon.terms_with_constant_prefix(),
            vec![(F::from_canonical_u64(7), 0), (F::ONE, 2)]
        );
    }
}
