use plonk_cs_field::Field;

/// Round constants for the Poseidon permutation gate family.
///
/// `round_constants` has length `R + 1`, matching the `state: [[V; 3]; R+1]`
/// shape a `Poseidon` constraint carries (§6.3): index `0` is unused by the
/// round gates (the first transition consumes `round_constants[1]`) and
/// exists only so indexing lines up with the 1-based scheme in §4.7.
///
/// This crate does not implement the Poseidon permutation itself -- no
/// proof is ever generated here (§1, Non-goals) -- so the constants only
/// need to be *some* fixed, reproducible table, not a cryptographically
/// vetted one.
#[derive(Debug, Clone)]
pub struct PoseidonParams<F> {
    round_constants: Vec<[F; 3]>,
}

impl<F: Field> PoseidonParams<F> {
    pub fn new(round_constants: Vec<[F; 3]>) -> Self {
        assert!(!round_constants.is_empty(), "round_constants must include the index-0 placeholder");
        PoseidonParams { round_constants }
    }

    /// A deterministic constants table with `rounds + 1` entries, suitable
    /// for tests and for callers that don't care about the specific values
    /// (only that they're fixed and reproducible).
    pub fn standard(rounds: usize) -> Self {
        let round_constants = (0..=rounds)
            .map(|i| {
                [
                    F::from_canonical_u64((3 * i + 1) as u64),
                    F::from_canonical_u64((3 * i + 2) as u64),
                    F::from_canonical_u64((3 * i + 3) as u64),
                ]
            })
            .collect();
        PoseidonParams { round_constants }
    }

    /// `R`, the number of round transitions this table supports.
    pub fn rounds(&self) -> usize {
        self.round_constants.len() - 1
    }

    /// The selectors for the transition from `state[i]` to `state[i+1]`,
    /// i.e. `round_constants[i + 1]` (§4.7).
    pub fn constants_for_round(&self, i: usize) -> [F; 3] {
        self.round_constants[i + 1]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plonk_cs_field::GoldilocksField as F;

    #[test]
    fn standard_table_has_rounds_plus_one_entries() {
        let params = PoseidonParams::<F>::standard(4);
        assert_eq!(params.rounds(), 4);
        // constants_for_round(3) should not panic (index 4 into a 5-entry table).
        let _ = params.constants_for_round(3);
    }
}
