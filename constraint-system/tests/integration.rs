use anyhow::Result;
use plonk_cs::{AssertKind, Constraint, ConstraintSystem, ConstraintSystemError, Expr, GateKind, GenericConstraint, VecSink};
use plonk_cs_field::{Field, GoldilocksField as Fg};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn c(n: i64) -> Expr<Fg> {
    if n >= 0 {
        Expr::constant(Fg::from_canonical_u64(n as u64))
    } else {
        Expr::constant(-Fg::from_canonical_u64((-n) as u64))
    }
}

fn v(id: u32) -> Expr<Fg> {
    Expr::var(id)
}

/// S1 -- constant equality succeeds, contributes no gates, and the sink sees
/// nothing once `public_input_size` is zero.
#[test]
fn s1_constant_equality_contributes_nothing() -> Result<()> {
    let mut sys = ConstraintSystem::<Fg>::new();
    sys.add_constraint(Constraint::Equal(c(3), c(3)))?;
    assert_eq!(sys.num_constraints(), 1);
    sys.set_public_input_size(0);
    let mut sink = VecSink::new();
    sys.finalize_and_emit(&mut sink);
    assert!(sink.gates.is_empty());
    Ok(())
}

/// S5 -- two independently built systems fed the same ordered sequence of
/// random Equal/R1cs/Boolean constraints agree on the digest at every prefix.
#[test]
fn s5_digest_stability_across_random_constraints() -> Result<()> {
    let _ = env_logger::try_init();
    let mut rng = StdRng::seed_from_u64(0xC15C0);
    let mut recipe = Vec::new();
    for _ in 0..100 {
        let choice: u8 = rng.gen_range(0..3);
        let a = rng.gen_range(1..50u32);
        let b = rng.gen_range(1..50u32);
        recipe.push(match choice {
            0 => Constraint::Equal(v(a), v(b)),
            1 => {
                let c3 = rng.gen_range(1..50u32);
                Constraint::R1cs(v(a), v(b), v(c3))
            }
            _ => Constraint::Boolean(v(a)),
        });
    }

    let mut sys_a = ConstraintSystem::<Fg>::new();
    let mut sys_b = ConstraintSystem::<Fg>::new();
    for constraint in &recipe {
        sys_a.add_constraint(constraint.clone())?;
        sys_b.add_constraint(constraint.clone())?;
        assert_eq!(sys_a.digest(), sys_b.digest());
    }
    Ok(())
}

/// Property 5 -- every gate row of a Generic/Equal/Boolean/R1CS-only witness
/// satisfies `c0*w[l] + c1*w[r] + c2*w[o] + c3*w[l]*w[r] + c4 = 0`.
#[test]
fn property_witness_satisfies_every_gate_equation() -> Result<()> {
    let mut sys = ConstraintSystem::<Fg>::new();
    sys.set_public_input_size(2);
    sys.add_constraint(Constraint::R1cs(v(1), v(2), v(1) + v(2)))?;
    sys.add_constraint(Constraint::Generic(GenericConstraint {
        l: (Fg::from_canonical_u64(2), v(1)),
        r: (Fg::ONE, v(2)),
        o: (-Fg::ONE, v(1) + v(2)),
        m: Fg::ZERO,
        c: Fg::ZERO,
    }))?;

    let values = [Fg::from_canonical_u64(3), Fg::from_canonical_u64(4)];
    let w = sys.compute_witness(|i| values[i as usize - 1]);

    let mut sink = VecSink::new();
    sys.finalize_and_emit(&mut sink);

    for gate in &sink.gates {
        if gate.coeffs.len() != 5 {
            continue;
        }
        let l = w[gate.row as usize][0];
        let r = w[gate.row as usize][1];
        let o = w[gate.row as usize][2];
        let lhs = gate.coeffs[0] * l + gate.coeffs[1] * r + gate.coeffs[2] * o + gate.coeffs[3] * l * r + gate.coeffs[4];
        assert_eq!(lhs, Fg::ZERO, "gate at row {} is unsatisfied", gate.row);
    }
    Ok(())
}

/// Property 3 -- after finalization the sink sees exactly `n + next_row`
/// calls, and the first `n` are kind-1 public-input gates in ascending row.
#[test]
fn property_finalization_prefix_is_public_input_gates() -> Result<()> {
    let mut sys = ConstraintSystem::<Fg>::new();
    sys.set_public_input_size(3);
    sys.add_constraint(Constraint::Boolean(v(1)))?;
    let mut sink = VecSink::new();
    sys.finalize_and_emit(&mut sink);

    assert_eq!(sink.gates.len(), 3 + 1);
    for (i, gate) in sink.gates.iter().take(3).enumerate() {
        assert_eq!(gate.gate_kind, GateKind::Generic.as_u8());
        assert_eq!(gate.row, i as u64);
    }
    Ok(())
}

/// Property 7 -- reducing a sum of `k` distinct-coefficient externals
/// produces exactly `k - 1` internal variables and `k - 1` Generic gates.
#[test]
fn property_reduce_lincom_of_k_externals() -> Result<()> {
    for k in 2..6u32 {
        let mut sys = ConstraintSystem::<Fg>::new();
        sys.set_public_input_size(k);
        let mut expr = v(1).scale(Fg::from_canonical_u64(2));
        for i in 2..=k {
            expr = expr + v(i).scale(Fg::from_canonical_u64(i as u64 + 1));
        }
        sys.add_constraint(Constraint::Equal(expr, c(0)))?;
        let mut sink = VecSink::new();
        sys.finalize_and_emit(&mut sink);
        // k public-input gates + (k-1) reduction gates + 1 equality gate
        assert_eq!(sink.gates.len() as u32, k + (k - 1) + 1);
    }
    Ok(())
}

/// Generic with both operands constant and `m != 0` is rejected eagerly.
#[test]
fn generic_rejects_constant_product_with_nonzero_m() {
    let mut sys = ConstraintSystem::<Fg>::new();
    let err = sys
        .add_constraint(Constraint::Generic(GenericConstraint {
            l: (Fg::ONE, c(2)),
            r: (Fg::ONE, c(3)),
            o: (Fg::ZERO, c(0)),
            m: Fg::ONE,
            c: Fg::ZERO,
        }))
        .unwrap_err();
    assert_eq!(err, ConstraintSystemError::NonConstantRequired);
}

/// R1cs over all-constant operands fails eagerly with the right assert kind.
#[test]
fn r1cs_constant_mismatch_is_an_eager_assert_failure() {
    let mut sys = ConstraintSystem::<Fg>::new();
    let err = sys.add_constraint(Constraint::R1cs(c(2), c(3), c(7))).unwrap_err();
    assert_eq!(err, ConstraintSystemError::AssertFailure(AssertKind::R1cs));
}

/// Poseidon lowering: a state of length R+1 emits R rows, the last tagged
/// `PoseidonFinal` and every earlier one `PoseidonRound`.
#[test]
fn poseidon_emits_one_row_per_transition() -> Result<()> {
    let mut sys = ConstraintSystem::<Fg>::new();
    sys.set_public_input_size(3);
    let state = vec![[v(1), v(2), v(3)], [v(1), v(2), v(3)], [v(1), v(2), v(3)]];
    sys.add_constraint(Constraint::Poseidon { state })?;
    let mut sink = VecSink::new();
    sys.finalize_and_emit(&mut sink);

    let poseidon_gates: Vec<_> = sink.gates.iter().skip(3).collect();
    assert_eq!(poseidon_gates.len(), 2);
    assert_eq!(poseidon_gates[0].gate_kind, GateKind::PoseidonRound.as_u8());
    assert_eq!(poseidon_gates[1].gate_kind, GateKind::PoseidonFinal.as_u8());
    assert!(poseidon_gates[1].coeffs.iter().all(|x| *x == Fg::ZERO));
    Ok(())
}
