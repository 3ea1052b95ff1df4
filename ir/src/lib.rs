//! Affine/parallel intermediate representation for polygen.
//!
//! The IR models the output of a polyhedral middle end: loop nests,
//! parallel regions mappable to GPU grid/block dimensions, affine
//! memory accesses, and a small arithmetic vocabulary. It carries no
//! behavior of its own; backends walk the tree and read it.
//!
//! # Module Organization
//!
//! - [`types`] - Scalar/memref types, memory spaces, predicate enums
//! - [`affine`] - Affine expressions, maps, integer sets
//! - [`node`] - Values, nodes, functions, modules, and constructors

pub mod affine;
pub mod node;
pub mod types;


pub use affine::{AffineBinOp, AffineExpr, AffineMap, Constraint, IntegerSet};
pub use node::{Function, Module, Node, NodeKind, Value};
pub use types::{CmpPredicate, MemorySpace, ScalarType, ShuffleMode, Type};
