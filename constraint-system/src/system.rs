use plonk_cs_field::Field;

use crate::canonical::canonicalize;
use crate::config::SystemConfig;
use crate::constraint::{Constraint, EndoRound, GenericConstraint, Point, ScaleRound};
use crate::digest::DigestAccumulator;
use crate::equivalence::{EquivalenceClasses, Position, Row};
use crate::error::{AssertKind, ConstraintSystemError};
use crate::expr::Expr;
use crate::gate::{GateKind, GateSpec, GateVectorSink};
use crate::internal::InternalVarTable;
use crate::poseidon::PoseidonParams;
use crate::row::RowBuffer;
use crate::variable::Variable;
use crate::witness;

/// The result of [`ConstraintSystem::reduce_lincom`]: a linear combination
/// collapsed to either a bare constant or a single scaled variable. Every
/// higher-level constraint lowers by reducing its operands to this shape
/// first, since a PLONK generic gate only has three wire slots.
#[derive(Debug, Clone, Copy)]
enum Reduced<F> {
    Constant(F),
    Var(F, Variable),
}

#[derive(Debug)]
enum GateStore<F> {
    Unfinalized(Vec<GateSpec<F>>),
    Finalized,
}

/// The constraint system builder: accepts constraints incrementally, lowers
/// each into gates and internal variables, and produces either a finalized
/// gate table or a witness assignment.
///
/// Mirrors the reference workspace's `CircuitBuilder` in spirit -- a single
/// `&mut` value that owns all of its storage, with no hidden global state.
#[derive(Debug)]
pub struct ConstraintSystem<F> {
    config: SystemConfig,
    equivalence: EquivalenceClasses,
    internal_vars: InternalVarTable<F>,
    rows: RowBuffer,
    gates: GateStore<F>,
    next_row: u32,
    digest: DigestAccumulator,
    constraints: u32,
    public_input_size: Option<u32>,
    auxiliary_input_size: u32,
}

impl<F: Field> ConstraintSystem<F> {
    pub fn new() -> Self {
        Self::with_config(SystemConfig::standard())
    }

    pub fn with_config(config: SystemConfig) -> Self {
        ConstraintSystem {
            config,
            equivalence: EquivalenceClasses::new(),
            internal_vars: InternalVarTable::new(),
            rows: RowBuffer::new(),
            gates: GateStore::Unfinalized(Vec::new()),
            next_row: 0,
            digest: DigestAccumulator::new(),
            constraints: 0,
            public_input_size: None,
            auxiliary_input_size: 0,
        }
    }

    pub fn num_constraints(&self) -> u32 {
        self.constraints
    }

    pub fn get_public_input_size(&self) -> Option<u32> {
        self.public_input_size
    }

    pub fn get_auxiliary_input_size(&self) -> u32 {
        self.auxiliary_input_size
    }

    pub fn set_public_input_size(&mut self, n: u32) {
        assert!(self.public_input_size.is_none(), "public_input_size is already set");
        self.public_input_size = Some(n);
    }

    pub fn set_auxiliary_input_size(&mut self, n: u32) {
        self.auxiliary_input_size = n;
    }

    /// The current circuit fingerprint: an MD5 of the running SHA-256 state
    /// seeded by every constraint accepted so far, in order. Callable at any
    /// point, finalized or not.
    pub fn digest(&self) -> [u8; 16] {
        self.digest.digest()
    }

    /// Accepts one high-level constraint, feeding the digest and then
    /// lowering it into gates and internal variables.
    pub fn add_constraint(&mut self, constraint: Constraint<F>) -> Result<(), ConstraintSystemError> {
        assert!(
            matches!(self.gates, GateStore::Unfinalized(_)),
            "add_constraint called on a finalized system"
        );
        let tag = constraint.tag();
        self.feed_digest(&constraint);

        match constraint {
            Constraint::Equal(a, b) => self.lower_equal(a, b)?,
            Constraint::Boolean(v) => self.lower_boolean(v)?,
            Constraint::Square(x, z) => self.lower_square(x, z)?,
            Constraint::R1cs(a, b, c) => self.lower_r1cs(a, b, c)?,
            Constraint::Generic(g) => self.lower_generic(g)?,
            Constraint::Poseidon { state } => self.lower_poseidon(state)?,
            Constraint::EcAdd { p1, p2, p3 } => self.lower_ec_add(p1, p2, p3)?,
            Constraint::EcScale { rounds } => self.lower_ec_scale(rounds)?,
            Constraint::EcEndoscale { rounds } => self.lower_ec_endoscale(rounds)?,
        }

        self.constraints += 1;
        if self.config.log_constraint_batches {
            log::debug!("accepted {tag} constraint, total now {}", self.constraints);
        }
        Ok(())
    }

    /// Streams the finalized gate table into `sink`: `public_input_size`
    /// synthesized public-input gates first, then every user gate in
    /// insertion order, all row indices resolved to absolute values.
    ///
    /// Panics if called twice, or before `set_public_input_size`.
    pub fn finalize_and_emit(&mut self, sink: &mut impl GateVectorSink<F>) {
        let n = self
            .public_input_size
            .expect("public_input_size must be set before finalization");
        let gates = match std::mem::replace(&mut self.gates, GateStore::Finalized) {
            GateStore::Unfinalized(gates) => gates,
            GateStore::Finalized => panic!("finalize_and_emit called twice"),
        };

        for i in 0..n {
            let row = Row::PublicInput(i);
            let prev = self.equivalence.wire(Variable::External(i + 1), Position::new(row, 0));
            let abs_row = row.to_absolute(n);
            let abs_prev_row = prev.row.to_absolute(n);
            sink.add_raw(
                GateKind::Generic.as_u8(),
                abs_row,
                abs_prev_row,
                prev.col,
                abs_row,
                1,
                abs_row,
                2,
                &[F::ONE, F::ZERO, F::ZERO, F::ZERO, F::ZERO],
            );
        }

        for gate in &gates {
            let abs_row = gate.row.to_absolute(n);
            sink.add_raw(
                gate.kind.as_u8(),
                abs_row,
                gate.l.row.to_absolute(n),
                gate.l.col,
                gate.r.row.to_absolute(n),
                gate.r.col,
                gate.o.row.to_absolute(n),
                gate.o.col,
                &gate.coeffs,
            );
        }

        log::info!("finalized {} gates (public_input_size={n})", n as u64 + gates.len() as u64);
    }

    /// Given a lookup from external variable index to value, produces the
    /// dense `row x 3` witness assignment.
    pub fn compute_witness(&self, f: impl Fn(u32) -> F) -> Vec<[F; 3]> {
        witness::compute_witness(self, f)
    }

    pub(crate) fn is_finalized(&self) -> bool {
        matches!(self.gates, GateStore::Finalized)
    }

    pub(crate) fn rows(&self) -> &RowBuffer {
        &self.rows
    }

    pub(crate) fn internal_vars(&self) -> &InternalVarTable<F> {
        &self.internal_vars
    }

    fn create_internal(&mut self, terms: Vec<(F, Variable)>, constant: Option<F>) -> Variable {
        self.internal_vars.create(terms, constant, self.config.check_overflow_on_internal_ids)
    }

    fn feed_digest(&mut self, constraint: &Constraint<F>) {
        self.digest.feed_tag(constraint.tag());
        match constraint {
            Constraint::Equal(a, b) => {
                self.feed_expr(a);
                self.feed_expr(b);
            }
            Constraint::Boolean(v) => self.feed_expr(v),
            Constraint::Square(x, z) => {
                self.feed_expr(x);
                self.feed_expr(z);
            }
            Constraint::R1cs(a, b, c) => {
                self.feed_expr(a);
                self.feed_expr(b);
                self.feed_expr(c);
            }
            Constraint::Generic(g) => {
                self.digest.feed_scalar(g.l.0);
                self.feed_expr(&g.l.1);
                self.digest.feed_scalar(g.r.0);
                self.feed_expr(&g.r.1);
                self.digest.feed_scalar(g.o.0);
                self.feed_expr(&g.o.1);
                self.digest.feed_scalar(g.m);
                self.digest.feed_scalar(g.c);
            }
            Constraint::Poseidon { state } => {
                for row in state {
                    for e in row {
                        self.feed_expr(e);
                    }
                }
            }
            Constraint::EcAdd { p1, p2, p3 } => {
                for p in [p1, p2, p3] {
                    self.feed_expr(&p.x);
                    self.feed_expr(&p.y);
                }
            }
            Constraint::EcScale { rounds } => {
                for r in rounds {
                    for e in [&r.xt, &r.b, &r.yt, &r.xp, &r.l1, &r.yp, &r.xs, &r.ys] {
                        self.feed_expr(e);
                    }
                }
            }
            Constraint::EcEndoscale { rounds } => {
                for r in rounds {
                    for e in &r.row0 {
                        self.feed_expr(e);
                    }
                    for e in &r.row1 {
                        self.feed_expr(e);
                    }
                    for e in &r.row2 {
                        self.feed_expr(e);
                    }
                    for e in &r.row3 {
                        self.feed_expr(e);
                    }
                }
            }
        }
    }

    fn feed_expr(&mut self, expr: &Expr<F>) {
        let canon = canonicalize(expr);
        self.digest.feed_terms(&canon.terms_with_constant_prefix());
    }

    /// Collapses `expr` to a single constant or a single scaled variable,
    /// spilling any extra terms through fresh internal variables (§4.5).
    fn reduce_lincom(&mut self, expr: &Expr<F>) -> Reduced<F> {
        let canon = canonicalize(expr);
        if canon.terms.is_empty() {
            return Reduced::Constant(canon.constant.unwrap_or(F::ZERO));
        }
        if canon.terms.len() == 1 && canon.constant.is_none() {
            let (s, i) = canon.terms[0];
            return Reduced::Var(s, Variable::External(i));
        }
        if canon.terms.len() == 1 {
            let (s, i) = canon.terms[0];
            let c = canon.constant.unwrap();
            let head = Variable::External(i);
            let res = self.create_internal(vec![(s, head)], Some(c));
            self.emit_generic_row(Some((s, head)), None, Some((-F::ONE, res)), F::ZERO, c);
            return Reduced::Var(F::ONE, res);
        }

        let (rs, rv) = self.completely_reduce(&canon.terms[1..]);
        let (ls, i) = canon.terms[0];
        let head = Variable::External(i);
        let constant = canon.constant.unwrap_or(F::ZERO);
        let res = self.create_internal(vec![(ls, head), (rs, rv)], canon.constant);
        self.emit_generic_row(Some((ls, head)), Some((rs, rv)), Some((-F::ONE, res)), F::ZERO, constant);
        Reduced::Var(F::ONE, res)
    }

    /// Right-folds `terms` into a single `(scalar, variable)` pair, one
    /// Generic gate per fusion. The fold is deliberately right-leaning (the
    /// head term is fused last); the digest and gate count both depend on
    /// this exact order (§4.5).
    fn completely_reduce(&mut self, terms: &[(F, u32)]) -> (F, Variable) {
        if terms.len() == 1 {
            let (s, i) = terms[0];
            return (s, Variable::External(i));
        }
        let (rs, rv) = self.completely_reduce(&terms[1..]);
        let (ls, i) = terms[0];
        let head = Variable::External(i);
        let res = self.create_internal(vec![(ls, head), (rs, rv)], None);
        self.emit_generic_row(Some((ls, head)), Some((rs, rv)), Some((-F::ONE, res)), F::ZERO, F::ZERO);
        (F::ONE, res)
    }

    /// Collapses a [`Reduced`] value to a raw variable with implicit
    /// coefficient 1, spilling a pinning gate when the coefficient isn't
    /// already 1 (§4.6).
    fn fold_to_var(&mut self, reduced: Reduced<F>) -> Variable {
        match reduced {
            Reduced::Var(s, v) if s == F::ONE => v,
            Reduced::Var(s, v) => {
                let sv = self.create_internal(vec![(s, v)], None);
                self.emit_generic_row(Some((s, v)), None, Some((-F::ONE, sv)), F::ZERO, F::ZERO);
                sv
            }
            Reduced::Constant(s) => {
                let cv = self.create_internal(vec![], Some(s));
                self.emit_generic_row(Some((F::ONE, cv)), None, None, F::ZERO, -s);
                cv
            }
        }
    }

    fn reduce_to_v(&mut self, expr: &Expr<F>) -> Variable {
        let reduced = self.reduce_lincom(expr);
        self.fold_to_var(reduced)
    }

    fn lower_equal(&mut self, a: Expr<F>, b: Expr<F>) -> Result<(), ConstraintSystemError> {
        let ra = self.reduce_lincom(&a);
        let rb = self.reduce_lincom(&b);
        if let (Reduced::Constant(s1), Reduced::Constant(s2)) = (ra, rb) {
            if s1 != s2 {
                return Err(ConstraintSystemError::AssertFailure(AssertKind::Equal));
            }
            return Ok(());
        }
        let (l, r, o, m, c) =
            fold_product_row(ra, rb, Reduced::Constant(F::ZERO), F::ONE, -F::ONE, F::ZERO, F::ZERO, F::ZERO);
        self.emit_generic_row(l, r, o, m, c);
        Ok(())
    }

    fn lower_boolean(&mut self, v: Expr<F>) -> Result<(), ConstraintSystemError> {
        let reduced = self.reduce_lincom(&v);
        match reduced {
            Reduced::Constant(s) => {
                if s != s.square() {
                    return Err(ConstraintSystemError::AssertFailure(AssertKind::Boolean));
                }
                Ok(())
            }
            Reduced::Var(..) => {
                let folded = self.fold_to_var(reduced);
                self.emit_generic_row(Some((-F::ONE, folded)), Some((F::ZERO, folded)), None, F::ONE, F::ZERO);
                Ok(())
            }
        }
    }

    fn lower_square(&mut self, x: Expr<F>, z: Expr<F>) -> Result<(), ConstraintSystemError> {
        let rx = self.reduce_lincom(&x);
        let rz = self.reduce_lincom(&z);
        if let (Reduced::Constant(sl), Reduced::Constant(so)) = (rx, rz) {
            if sl.square() != so {
                return Err(ConstraintSystemError::AssertFailure(AssertKind::Square));
            }
            return Ok(());
        }
        let (l, r, o, m, c) = fold_product_row(rx, rx, rz, F::ZERO, F::ZERO, -F::ONE, F::ONE, F::ZERO);
        self.emit_generic_row(l, r, o, m, c);
        Ok(())
    }

    fn lower_r1cs(&mut self, a: Expr<F>, b: Expr<F>, c_expr: Expr<F>) -> Result<(), ConstraintSystemError> {
        let ra = self.reduce_lincom(&a);
        let rb = self.reduce_lincom(&b);
        let rc = self.reduce_lincom(&c_expr);
        if let (Reduced::Constant(sa), Reduced::Constant(sb), Reduced::Constant(sc)) = (ra, rb, rc) {
            if sa * sb != sc {
                return Err(ConstraintSystemError::AssertFailure(AssertKind::R1cs));
            }
            return Ok(());
        }
        let (l, r, o, m, c) = fold_product_row(ra, rb, rc, F::ZERO, F::ZERO, F::ONE, -F::ONE, F::ZERO);
        self.emit_generic_row(l, r, o, m, c);
        Ok(())
    }

    fn lower_generic(&mut self, g: GenericConstraint<F>) -> Result<(), ConstraintSystemError> {
        let rl = self.reduce_lincom(&g.l.1);
        let rr = self.reduce_lincom(&g.r.1);
        let ro = self.reduce_lincom(&g.o.1);
        if matches!(rl, Reduced::Constant(_)) && matches!(rr, Reduced::Constant(_)) && g.m != F::ZERO {
            return Err(ConstraintSystemError::NonConstantRequired);
        }
        let (l, r, o, m, c) = fold_product_row(rl, rr, ro, g.l.0, g.r.0, g.o.0, g.m, g.c);
        self.emit_generic_row(l, r, o, m, c);
        Ok(())
    }

    fn lower_poseidon(&mut self, state: Vec<[Expr<F>; 3]>) -> Result<(), ConstraintSystemError> {
        let transitions = state.len().saturating_sub(1);
        if transitions == 0 {
            return Ok(());
        }
        let params = PoseidonParams::standard(transitions);
        for idx in 0..transitions {
            let v0 = self.reduce_to_v(&state[idx][0]);
            let v1 = self.reduce_to_v(&state[idx][1]);
            let v2 = self.reduce_to_v(&state[idx][2]);
            let is_final = idx == transitions - 1;
            let (kind, coeffs) = if is_final {
                (GateKind::PoseidonFinal, vec![F::ZERO; 5])
            } else {
                let rc = params.constants_for_round(idx);
                (GateKind::PoseidonRound, vec![rc[0], rc[1], rc[2], F::ZERO, F::ZERO])
            };
            self.add_row(kind, [Some(v0), Some(v1), Some(v2)], coeffs);
        }
        Ok(())
    }

    fn lower_ec_add(&mut self, p1: Point<F>, p2: Point<F>, p3: Point<F>) -> Result<(), ConstraintSystemError> {
        let x1 = self.reduce_to_v(&p1.x);
        let y1 = self.reduce_to_v(&p1.y);
        let x2 = self.reduce_to_v(&p2.x);
        let y2 = self.reduce_to_v(&p2.y);
        let x3 = self.reduce_to_v(&p3.x);
        let y3 = self.reduce_to_v(&p3.y);
        self.add_row(GateKind::EcAddY, [Some(y1), Some(y2), Some(y3)], Vec::new());
        self.add_row(GateKind::EcAddX, [Some(x1), Some(x2), Some(x3)], Vec::new());
        Ok(())
    }

    fn lower_ec_scale(&mut self, rounds: Vec<ScaleRound<F>>) -> Result<(), ConstraintSystemError> {
        for round in rounds {
            let xt = self.reduce_to_v(&round.xt);
            let b = self.reduce_to_v(&round.b);
            let yt = self.reduce_to_v(&round.yt);
            let xp = self.reduce_to_v(&round.xp);
            let l1 = self.reduce_to_v(&round.l1);
            let yp = self.reduce_to_v(&round.yp);
            let xs = self.reduce_to_v(&round.xs);
            let ys = self.reduce_to_v(&round.ys);
            self.add_row(GateKind::EcScaleXtBYt, [Some(xt), Some(b), Some(yt)], Vec::new());
            self.add_row(GateKind::EcScaleXpL1Yp, [Some(xp), Some(l1), Some(yp)], Vec::new());
            self.add_row(GateKind::EcScaleXsXtYs, [Some(xs), Some(xt), Some(ys)], Vec::new());
        }
        Ok(())
    }

    fn lower_ec_endoscale(&mut self, rounds: Vec<EndoRound<F>>) -> Result<(), ConstraintSystemError> {
        for round in rounds {
            let a0 = self.reduce_to_v(&round.row0[0]);
            let a1 = self.reduce_to_v(&round.row0[1]);
            self.add_endoscale_row0(a0, a1);

            let r1 = [
                self.reduce_to_v(&round.row1[0]),
                self.reduce_to_v(&round.row1[1]),
                self.reduce_to_v(&round.row1[2]),
            ];
            self.add_row(GateKind::EcEndoscale1, r1.map(Some), Vec::new());

            let r2 = [
                self.reduce_to_v(&round.row2[0]),
                self.reduce_to_v(&round.row2[1]),
                self.reduce_to_v(&round.row2[2]),
            ];
            self.add_row(GateKind::EcEndoscale2, r2.map(Some), Vec::new());

            let r3 = [
                self.reduce_to_v(&round.row3[0]),
                self.reduce_to_v(&round.row3[1]),
                self.reduce_to_v(&round.row3[2]),
            ];
            self.add_row(GateKind::EcEndoscale3, r3.map(Some), Vec::new());
        }
        Ok(())
    }

    fn emit_generic_row(
        &mut self,
        l: Option<(F, Variable)>,
        r: Option<(F, Variable)>,
        o: Option<(F, Variable)>,
        m: F,
        c: F,
    ) {
        let lc = l.map_or(F::ZERO, |(coef, _)| coef);
        let rc = r.map_or(F::ZERO, |(coef, _)| coef);
        let oc = o.map_or(F::ZERO, |(coef, _)| coef);
        let slots = [l.map(|(_, v)| v), r.map(|(_, v)| v), o.map(|(_, v)| v)];
        self.add_row(GateKind::Generic, slots, vec![lc, rc, oc, m, c]);
    }

    fn add_row(&mut self, kind: GateKind, slots: [Option<Variable>; 3], coeffs: Vec<F>) {
        let gates = match &mut self.gates {
            GateStore::Unfinalized(gates) => gates,
            GateStore::Finalized => panic!("cannot add a constraint row after finalization"),
        };
        let row = Row::AfterPublicInput(self.next_row);
        let mut prevs = [Position::new(row, 0), Position::new(row, 1), Position::new(row, 2)];
        for col in 0..3u8 {
            if let Some(v) = slots[col as usize] {
                prevs[col as usize] = self.equivalence.wire(v, Position::new(row, col));
            }
        }
        gates.push(GateSpec::new(kind, row, prevs[0], prevs[1], prevs[2], coeffs));
        self.rows.push(slots);
        self.next_row += 1;
    }

    /// `EC_endoscale` kind-8 rows only carry two real wires; the third
    /// slot's back-pointer is "column 3", not a self-loop at a real column
    /// (§9, open question), so it can't go through the ordinary [`Self::add_row`].
    fn add_endoscale_row0(&mut self, v0: Variable, v1: Variable) {
        let gates = match &mut self.gates {
            GateStore::Unfinalized(gates) => gates,
            GateStore::Finalized => panic!("cannot add a constraint row after finalization"),
        };
        let row = Row::AfterPublicInput(self.next_row);
        let p0 = self.equivalence.wire(v0, Position::new(row, 0));
        let p1 = self.equivalence.wire(v1, Position::new(row, 1));
        let p2 = Position::new_unchecked(row, 3);
        gates.push(GateSpec::new(GateKind::EcEndoscale0, row, p0, p1, p2, Vec::new()));
        self.rows.push([Some(v0), Some(v1), None]);
        self.next_row += 1;
    }
}

impl<F: Field> Default for ConstraintSystem<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Shared core of every two-operand, optionally-multiplicative lowering
/// (`Equal`, `Square`, `R1cs`, `Generic`): folds three already-reduced
/// operands into the coefficients of one Generic gate, absorbing constant
/// operands into `c` and folding the `m*l*r` product into a linear term
/// whenever one side of the product isn't a variable.
#[allow(clippy::too_many_arguments)]
fn fold_product_row<F: Field>(
    rl: Reduced<F>,
    rr: Reduced<F>,
    ro: Reduced<F>,
    cl: F,
    cr: F,
    co: F,
    m: F,
    c: F,
) -> (Option<(F, Variable)>, Option<(F, Variable)>, Option<(F, Variable)>, F, F) {
    let (sl, var_l) = match rl {
        Reduced::Var(s, v) => (s, Some(v)),
        Reduced::Constant(s) => (s, None),
    };
    let (sr, var_r) = match rr {
        Reduced::Var(s, v) => (s, Some(v)),
        Reduced::Constant(s) => (s, None),
    };
    let (so, var_o) = match ro {
        Reduced::Var(s, v) => (s, Some(v)),
        Reduced::Constant(s) => (s, None),
    };

    let mut const_acc = c;
    let mut l_coef = F::ZERO;
    let mut r_coef = F::ZERO;
    let mut o_coef = F::ZERO;

    match var_l {
        Some(_) => l_coef += cl * sl,
        None => const_acc += cl * sl,
    }
    match var_r {
        Some(_) => r_coef += cr * sr,
        None => const_acc += cr * sr,
    }
    match var_o {
        Some(_) => o_coef += co * so,
        None => const_acc += co * so,
    }

    let mut m_coef = F::ZERO;
    match (var_l, var_r) {
        (Some(_), Some(_)) => m_coef += m * sl * sr,
        (Some(_), None) => l_coef += m * sl * sr,
        (None, Some(_)) => r_coef += m * sl * sr,
        (None, None) => const_acc += m * sl * sr,
    }

    (
        var_l.map(|v| (l_coef, v)),
        var_r.map(|v| (r_coef, v)),
        var_o.map(|v| (o_coef, v)),
        m_coef,
        const_acc,
    )
}
