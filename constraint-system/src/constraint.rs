use crate::expr::Expr;

/// A point on the elliptic curve used by the `EC_*` constraint family,
/// represented by its two affine coordinates as linear combinations.
#[derive(Debug, Clone)]
pub struct Point<F> {
    pub x: Expr<F>,
    pub y: Expr<F>,
}

impl<F> Point<F> {
    pub fn new(x: Expr<F>, y: Expr<F>) -> Self {
        Point { x, y }
    }
}

/// One scalar-multiplication round: the running accumulator and
/// table/selection intermediates carried across the three rows a round
/// lowers to (kinds 5, 6, 7 -- §4.7).
#[derive(Debug, Clone)]
pub struct ScaleRound<F> {
    pub xt: Expr<F>,
    pub b: Expr<F>,
    pub yt: Expr<F>,
    pub xp: Expr<F>,
    pub l1: Expr<F>,
    pub yp: Expr<F>,
    pub xs: Expr<F>,
    pub ys: Expr<F>,
}

/// One double-and-add endoscaling round, lowering to the four consecutive
/// rows of kinds 8-11 (§4.7, §6.4). Row 0 only carries two real wires; the
/// third column of that row has no externally meaningful value.
#[derive(Debug, Clone)]
pub struct EndoRound<F> {
    pub row0: [Expr<F>; 2],
    pub row1: [Expr<F>; 3],
    pub row2: [Expr<F>; 3],
    pub row3: [Expr<F>; 3],
}

/// The `Generic{l, r, o, m, c}` constraint: `cl*l + cr*r + co*o + m*l*r + c = 0`
/// where `l`, `r`, `o` are themselves linear combinations (§4.7).
#[derive(Debug, Clone)]
pub struct GenericConstraint<F> {
    pub l: (F, Expr<F>),
    pub r: (F, Expr<F>),
    pub o: (F, Expr<F>),
    pub m: F,
    pub c: F,
}

/// The full set of constraint kinds the lowering compiler accepts (§4.7).
/// A closed tagged union, per the design doc's resolution of the "open
/// constructor pattern" note (§9): the source language dispatches over an
/// extensible sum type, but a closed-world reimplementation enumerates
/// every variant once here instead.
#[derive(Debug, Clone)]
pub enum Constraint<F> {
    Equal(Expr<F>, Expr<F>),
    Boolean(Expr<F>),
    Square(Expr<F>, Expr<F>),
    R1cs(Expr<F>, Expr<F>, Expr<F>),
    Generic(GenericConstraint<F>),
    Poseidon { state: Vec<[Expr<F>; 3]> },
    EcAdd { p1: Point<F>, p2: Point<F>, p3: Point<F> },
    EcScale { rounds: Vec<ScaleRound<F>> },
    EcEndoscale { rounds: Vec<EndoRound<F>> },
}

impl<F> Constraint<F> {
    /// The short ASCII tag fed to the digest accumulator before lowering
    /// (§4.9).
    pub fn tag(&self) -> &'static str {
        match self {
            Constraint::Equal(..) => "equal",
            Constraint::Boolean(..) => "boolean",
            Constraint::Square(..) => "square",
            Constraint::R1cs(..) => "r1cs",
            Constraint::Generic(..) => "basic",
            Constraint::Poseidon { .. } => "poseidon",
            Constraint::EcAdd { .. } => "ec_add",
            Constraint::EcScale { .. } => "ec_scale",
            Constraint::EcEndoscale { .. } => "ec_endoscale",
        }
    }
}
