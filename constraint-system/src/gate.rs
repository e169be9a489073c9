use plonk_cs_field::Field;

use crate::equivalence::{Position, Row};

/// The fixed gate-kind enum. Numeric values must stay bit-exact: a
/// downstream prover keys its gate-specific evaluation logic off these
/// exact bytes (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GateKind {
    PoseidonFinal = 0,
    Generic = 1,
    PoseidonRound = 2,
    EcAddY = 3,
    EcAddX = 4,
    EcScaleXtBYt = 5,
    EcScaleXpL1Yp = 6,
    EcScaleXsXtYs = 7,
    EcEndoscale0 = 8,
    EcEndoscale1 = 9,
    EcEndoscale2 = 10,
    EcEndoscale3 = 11,
}

impl GateKind {
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

/// One row of the unfinalized gate buffer.
///
/// `(lrow,lcol)`, `(rrow,rcol)`, `(orow,ocol)` are the *previous* occurrence
/// of whatever variable this row's columns 0, 1, 2 hold -- the
/// copy-permutation back-pointers described in §4.3. `coeffs` holds
/// gate-kind-specific selectors; it is empty for every EC gate kind.
#[derive(Debug, Clone)]
pub struct GateSpec<F> {
    pub kind: GateKind,
    pub row: Row,
    pub l: Position,
    pub r: Position,
    pub o: Position,
    pub coeffs: Vec<F>,
}

impl<F: Field> GateSpec<F> {
    pub fn new(kind: GateKind, row: Row, l: Position, r: Position, o: Position, coeffs: Vec<F>) -> Self {
        GateSpec { kind, row, l, r, o, coeffs }
    }
}

/// The external collaborator that consumes a finalized gate table.
///
/// Exactly one call per gate, in the order fixed by §6.1: all public-input
/// gates ascending, then every user gate in insertion order. The sink is
/// borrowed for the duration of [`crate::system::ConstraintSystem::finalize_and_emit`]
/// and never retained.
pub trait GateVectorSink<F> {
    #[allow(clippy::too_many_arguments)]
    fn add_raw(
        &mut self,
        gate_kind: u8,
        row: u64,
        lrow: u64,
        lcol: u8,
        rrow: u64,
        rcol: u8,
        orow: u64,
        ocol: u8,
        coeffs: &[F],
    );
}

/// A raw, sink-shaped gate record, the argument tuple a [`GateVectorSink`]
/// receives flattened into fields -- convenient for tests that want to
/// assert on the emitted sequence without writing a custom sink each time.
#[derive(Debug, Clone, PartialEq)]
pub struct RawGate<F> {
    pub gate_kind: u8,
    pub row: u64,
    pub lrow: u64,
    pub lcol: u8,
    pub rrow: u64,
    pub rcol: u8,
    pub orow: u64,
    pub ocol: u8,
    pub coeffs: Vec<F>,
}

/// An in-memory [`GateVectorSink`] that simply records every call, used by
/// tests and by simple callers that don't need streaming output.
#[derive(Debug, Default)]
pub struct VecSink<F> {
    pub gates: Vec<RawGate<F>>,
}

impl<F> VecSink<F> {
    pub fn new() -> Self {
        VecSink { gates: Vec::new() }
    }
}

impl<F: Clone> GateVectorSink<F> for VecSink<F> {
    fn add_raw(
        &mut self,
        gate_kind: u8,
        row: u64,
        lrow: u64,
        lcol: u8,
        rrow: u64,
        rcol: u8,
        orow: u64,
        ocol: u8,
        coeffs: &[F],
    ) {
        self.gates.push(RawGate {
            gate_kind,
            row,
            lrow,
            lcol,
            rrow,
            rcol,
            orow,
            ocol,
            coeffs: coeffs.to_vec(),
        });
    }
}
