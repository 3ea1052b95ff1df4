//! Affine expressions, maps, and integer sets.
//!
//! An [`AffineExpr`] is a pure expression tree over dimension positions
//! and integer constants. Dimensions are positional: `Dim(i)` refers to
//! the `i`-th entry of whatever operand list accompanies the expression
//! (an apply's map operands, a load's index operands, an if's set
//! operands). Expressions are immutable once built.

/// Binary operators available in affine expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AffineBinOp {
    Add,
    Mul,
    FloorDiv,
    CeilDiv,
    Mod,
}

/// An affine expression tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AffineExpr {
    /// Index into the accompanying operand list.
    Dim(usize),
    Const(i64),
    Binary { op: AffineBinOp, lhs: Box<AffineExpr>, rhs: Box<AffineExpr> },
}

impl AffineExpr {
    pub fn dim(position: usize) -> Self {
        AffineExpr::Dim(position)
    }

    pub fn constant(value: i64) -> Self {
        AffineExpr::Const(value)
    }

    fn binary(op: AffineBinOp, lhs: AffineExpr, rhs: AffineExpr) -> Self {
        AffineExpr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }
    }

    pub fn add(self, rhs: AffineExpr) -> Self {
        Self::binary(AffineBinOp::Add, self, rhs)
    }

    pub fn mul(self, rhs: AffineExpr) -> Self {
        Self::binary(AffineBinOp::Mul, self, rhs)
    }

    pub fn floor_div(self, rhs: AffineExpr) -> Self {
        Self::binary(AffineBinOp::FloorDiv, self, rhs)
    }

    pub fn ceil_div(self, rhs: AffineExpr) -> Self {
        Self::binary(AffineBinOp::CeilDiv, self, rhs)
    }

    pub fn rem(self, rhs: AffineExpr) -> Self {
        Self::binary(AffineBinOp::Mod, self, rhs)
    }
}

/// An ordered list of affine result expressions.
///
/// Loads and stores carry one expression per memref dimension; an
/// affine apply carries exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AffineMap {
    pub exprs: Vec<AffineExpr>,
}

impl AffineMap {
    pub fn new(exprs: impl Into<Vec<AffineExpr>>) -> Self {
        Self { exprs: exprs.into() }
    }

    /// Identity map of the given rank: `(d0, ..., dn-1)`.
    pub fn identity(rank: usize) -> Self {
        Self { exprs: (0..rank).map(AffineExpr::dim).collect() }
    }
}

/// A single constraint of an integer set.
///
/// `Eq` constraints read `expr == 0`, `Ge` constraints `expr >= 0`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Constraint {
    pub expr: AffineExpr,
    pub equality: bool,
}

impl Constraint {
    pub fn eq_zero(expr: AffineExpr) -> Self {
        Self { expr, equality: true }
    }

    pub fn ge_zero(expr: AffineExpr) -> Self {
        Self { expr, equality: false }
    }
}

/// A conjunction of affine constraints guarding an `If` region.
///
/// Only conjunction is modeled; disjunctive sets and else branches are
/// outside the vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IntegerSet {
    pub constraints: Vec<Constraint>,
}

impl IntegerSet {
    pub fn new(constraints: impl Into<Vec<Constraint>>) -> Self {
        Self { constraints: constraints.into() }
    }
}
