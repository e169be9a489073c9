use std::collections::HashMap;

use plonk_cs_field::Field;

use crate::system::ConstraintSystem;
use crate::variable::Variable;

/// Produces the dense `row x 3` witness assignment for `system` given a
/// lookup from external variable index to value (§4.10).
///
/// Public-input rows are filled directly from `f`; every later row is
/// filled by walking the row buffer in insertion order, resolving each
/// `Internal` slot lazily and memoizing the result -- the internal-variable
/// dependency graph is a DAG by construction (§3, invariant 5), so a single
/// pass with memoization is enough, no topological sort required.
pub fn compute_witness<F: Field>(system: &ConstraintSystem<F>, f: impl Fn(u32) -> F) -> Vec<[F; 3]> {
    if system.is_finalized() {
        log::warn!("compute_witness invoked on an already finalized system");
    }
    let n = system
        .get_public_input_size()
        .expect("public_input_size must be set before computing a witness");

    let mut result = vec![[F::ZERO; 3]; n as usize + system.rows().len()];
    for i in 0..n as usize {
        result[i][0] = f(i as u32 + 1);
    }

    let mut memo = HashMap::new();
    for (j, slots) in system.rows().iter().enumerate() {
        let abs = j + n as usize;
        for (k, slot) in slots.iter().enumerate() {
            if let Some(var) = slot {
                result[abs][k] = eval_variable(system, *var, &f, &mut memo);
            }
        }
    }
    result
}

fn eval_variable<F: Field>(
    system: &ConstraintSystem<F>,
    var: Variable,
    f: &impl Fn(u32) -> F,
    memo: &mut HashMap<u64, F>,
) -> F {
    match var {
        Variable::External(e) => f(e),
        Variable::Internal(id) => {
            if let Some(&cached) = memo.get(&id) {
                return cached;
            }
            let record = system
                .internal_vars()
                .get(id)
                .expect("internal variable referenced with no recorded formula");
            let value = record.eval(|dep| eval_variable(system, dep, f, memo));
            memo.insert(id, value);
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constraint::Constraint;
    use crate::expr::Expr;
    use plonk_cs_field::GoldilocksField as Fg;

    #[test]
    fn public_input_rows_are_filled_directly() {
        let mut sys = ConstraintSystem::<Fg>::new();
        sys.set_public_input_size(2);
        let w = sys.compute_witness(|i| Fg::from_canonical_u64(i as u64 * 10));
        assert_eq!(w[0], [Fg::from_canonical_u64(10), Fg::ZERO, Fg::ZERO]);
        assert_eq!(w[1], [Fg::from_canonical_u64(20), Fg::ZERO, Fg::ZERO]);
    }

    #[test]
    fn three_term_sum_witness_satisfies_every_row() {
        let mut sys = ConstraintSystem::<Fg>::new();
        sys.set_public_input_size(3);
        let v = |id: u32| Expr::<Fg>::var(id);
        sys.add_constraint(Constraint::Equal(v(1) + v(2) + v(3), Expr::constant(Fg::ZERO)))
            .unwrap();

        let values = [2i64, 3, -5];
        let w = sys.compute_witness(|i| {
            let n = values[(i - 1) as usize];
            if n >= 0 {
                Fg::from_canonical_u64(n as u64)
            } else {
                -Fg::from_canonical_u64((-n) as u64)
            }
        });

        // row 3 (right after the 3 public-input rows) pins external(2)+external(3)
        // into an internal var; row 4 pins external(1) plus that into the full sum,
        // which the equality gate requires to be zero.
        let three_plus_neg_five = w[3][2];
        assert_eq!(three_plus_neg_five, Fg::from_canonical_u64(3) + -Fg::from_canonical_u64(5));
        let total = w[4][2];
        assert_eq!(total, Fg::ZERO);
    }
}
