use std::collections::HashMap;

use plonk_cs_field::Field;

use crate::variable::Variable;

/// How an internal variable's value is derived from other, already-defined
/// variables: `Σ coeff * value(var) + constant`.
#[derive(Debug, Clone)]
pub struct InternalVarRecord<F> {
    pub terms: Vec<(F, Variable)>,
    pub constant: Option<F>,
}

impl<F: Field> InternalVarRecord<F> {
    /// Evaluates the formula given a lookup for the value of any referenced
    /// variable. The caller is responsible for the DAG invariant (§3,
    /// invariant 5): every referenced variable must already be resolvable.
    pub fn eval(&self, mut value_of: impl FnMut(Variable) -> F) -> F {
        let mut acc = self.constant.unwrap_or(F::ZERO);
        for &(coeff, var) in &self.terms {
            acc += coeff * value_of(var);
        }
        acc
    }
}

/// Allocates fresh intermediate variable ids and records how each is
/// computed, the way the reference workspace's `CircuitBuilder` hands out
/// fresh `Target`s for virtual wires -- except here the definition travels
/// with the id instead of being recovered from a generator.
#[derive(Debug, Default)]
pub struct InternalVarTable<F> {
    vars: HashMap<u64, InternalVarRecord<F>>,
    next_id: u64,
}

impl<F: Field> InternalVarTable<F> {
    pub fn new() -> Self {
        Self { vars: HashMap::new(), next_id: 0 }
    }

    /// Allocates a fresh internal variable defined as
    /// `Σ coeff * var + constant` and records its formula.
    ///
    /// Panics only on `next_id` overflow when `check_overflow` is set, which
    /// the design doc treats as practically unreachable (§4.2); with it
    /// unset the counter wraps, which is only sound for tests that want to
    /// exercise the overflow path deliberately (§4.11).
    pub fn create(&mut self, terms: Vec<(F, Variable)>, constant: Option<F>, check_overflow: bool) -> Variable {
        let id = self.next_id;
        self.next_id = if check_overflow {
            self.next_id
                .checked_add(1)
                .expect("internal variable id counter overflowed")
        } else {
            self.next_id.wrapping_add(1)
        };
        self.vars.insert(id, InternalVarRecord { terms, constant });
        Variable::Internal(id)
    }

    pub fn get(&self, id: u64) -> Option<&InternalVarRecord<F>> {
        self.vars.get(&id)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn next_id(&self) -> u64 {
        self.next_id
    }
}
