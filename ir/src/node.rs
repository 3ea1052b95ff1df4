//! IR values, nodes, and the module tree.
//!
//! A [`Value`] is an opaque handle to one typed result (or block-entry
//! induction variable). Values carry a stable id issued at construction
//! and compare by that id, never structurally, so they can key maps
//! without relying on address stability.
//!
//! A [`Node`] is one operation: a [`NodeKind`] payload, an ordered
//! operand list, an ordered result list, and — for the container kinds
//! (`For`, `If`, `Parallel`) — an owned body of child nodes. A value
//! defined inside a body is visible to following siblings and
//! descendant scopes only; the generator assumes this and does not
//! verify it.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use smallvec::{SmallVec, smallvec};

use crate::affine::{AffineMap, IntegerSet};
use crate::types::{CmpPredicate, MemorySpace, ScalarType, ShuffleMode, Type};

static NEXT_VALUE_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct ValueData {
    id: u64,
    ty: Type,
}

/// Handle to a single typed IR value.
///
/// Cheap to clone; identity is the stable id, so two handles are equal
/// exactly when they denote the same defining result.
#[derive(Clone)]
pub struct Value(Arc<ValueData>);

impl Value {
    pub fn new(ty: Type) -> Self {
        let id = NEXT_VALUE_ID.fetch_add(1, Ordering::Relaxed);
        Value(Arc::new(ValueData { id, ty }))
    }

    /// Stable id, unique for the lifetime of the process.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn ty(&self) -> &Type {
        &self.0.ty
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Value(id={}, ty={:?})", self.0.id, self.0.ty)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.0.id == other.0.id
    }
}

impl Eq for Value {}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

/// Operation kind with its attribute payload.
///
/// Operand conventions (see the constructors):
/// - binary arithmetic and `Cmp`: `[lhs, rhs]`
/// - unary math and `Bitcast`: `[src]`
/// - `Apply` / `If`: the map/set operands, in dimension order
/// - `Load` / `VectorLoad` / `PlainLoad`: `[memref, indices...]`
/// - `Store` / `VectorStore`: `[value, memref, indices...]`
/// - `Shuffle`: `[value, offset, width]`
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Materialize a buffer in the memref's declared space.
    Alloc,
    ConstIndex { value: i64 },
    ConstInt { value: i64 },
    ConstFloat { value: f64 },
    /// Bind one affine result expression to an integer value.
    Apply { map: AffineMap },
    /// Counted loop with constant bounds and step.
    For { lower: i64, upper: i64, step: i64, unroll: bool },
    /// Conjunctive affine guard, no else branch.
    If { set: IntegerSet },
    /// Independent loop dimensions mapped to block or thread indices.
    /// One extent (and one induction-variable result) per dimension.
    Parallel { extents: SmallVec<[i64; 3]> },
    /// Affine-indexed scalar read.
    Load { map: AffineMap },
    /// Scalar read indexed directly by operand values.
    PlainLoad,
    /// Affine-indexed scalar write.
    Store { map: AffineMap },
    /// Single wide read of `lanes` consecutive elements.
    VectorLoad { map: AffineMap, lanes: u32 },
    /// Single wide write of `lanes` consecutive elements.
    VectorStore { map: AffineMap, lanes: u32 },
    /// Block-wide synchronization point.
    Barrier,
    Shuffle { mode: ShuffleMode },
    Mul,
    Add,
    Sub,
    Div,
    Max,
    Pow,
    Cmp { predicate: CmpPredicate },
    Exp,
    Tanh,
    Sqrt,
    Log,
    /// Reinterpreting numeric cast to the result's scalar type.
    Bitcast,
    /// Conditional value selection, produced by if-conversion upstream.
    Select,
}

impl NodeKind {
    /// Kind name for diagnostics.
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Alloc => "alloc",
            NodeKind::ConstIndex { .. } => "const.index",
            NodeKind::ConstInt { .. } => "const.int",
            NodeKind::ConstFloat { .. } => "const.float",
            NodeKind::Apply { .. } => "affine.apply",
            NodeKind::For { .. } => "affine.for",
            NodeKind::If { .. } => "affine.if",
            NodeKind::Parallel { .. } => "affine.parallel",
            NodeKind::Load { .. } => "affine.load",
            NodeKind::PlainLoad => "memref.load",
            NodeKind::Store { .. } => "affine.store",
            NodeKind::VectorLoad { .. } => "affine.vector_load",
            NodeKind::VectorStore { .. } => "affine.vector_store",
            NodeKind::Barrier => "gpu.barrier",
            NodeKind::Shuffle { .. } => "gpu.shuffle",
            NodeKind::Mul => "arith.mulf",
            NodeKind::Add => "arith.addf",
            NodeKind::Sub => "arith.subf",
            NodeKind::Div => "arith.divf",
            NodeKind::Max => "arith.maxf",
            NodeKind::Pow => "math.powf",
            NodeKind::Cmp { .. } => "arith.cmpf",
            NodeKind::Exp => "math.exp",
            NodeKind::Tanh => "math.tanh",
            NodeKind::Sqrt => "math.sqrt",
            NodeKind::Log => "math.log",
            NodeKind::Bitcast => "arith.bitcast",
            NodeKind::Select => "arith.select",
        }
    }
}

/// One IR operation, owning its body when it is a container kind.
#[derive(Debug, Clone)]
pub struct Node {
    kind: NodeKind,
    operands: SmallVec<[Value; 4]>,
    results: SmallVec<[Value; 2]>,
    body: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind, operands: impl IntoIterator<Item = Value>, results: impl IntoIterator<Item = Value>) -> Self {
        Self { kind, operands: operands.into_iter().collect(), results: results.into_iter().collect(), body: Vec::new() }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn operands(&self) -> &[Value] {
        &self.operands
    }

    pub fn results(&self) -> &[Value] {
        &self.results
    }

    pub fn body(&self) -> &[Node] {
        &self.body
    }

    /// Sole (or first) result. Panics on result-less kinds; producer code
    /// only calls this for value-defining nodes.
    pub fn result(&self) -> &Value {
        &self.results[0]
    }

    /// Induction variables of a `For` or `Parallel` node.
    pub fn induction_vars(&self) -> &[Value] {
        &self.results
    }

    /// Append a child to a container node's body.
    pub fn push(&mut self, child: Node) -> &mut Self {
        self.body.push(child);
        self
    }

    /// Fallible pre-order traversal: the node itself, then its body,
    /// depth first in declaration order.
    pub fn try_walk<E>(&self, f: &mut impl FnMut(&Node) -> Result<(), E>) -> Result<(), E> {
        f(self)?;
        for child in &self.body {
            child.try_walk(f)?;
        }
        Ok(())
    }
}

// Producer-side constructors. Each allocates the node's result values
// so bodies can reference them while being built.
impl Node {
    pub fn parallel(extents: impl IntoIterator<Item = i64>) -> Self {
        let extents: SmallVec<[i64; 3]> = extents.into_iter().collect();
        let ivs: SmallVec<[Value; 2]> = extents.iter().map(|_| Value::new(Type::Scalar(ScalarType::Index))).collect();
        Self { kind: NodeKind::Parallel { extents }, operands: smallvec![], results: ivs, body: Vec::new() }
    }

    pub fn for_loop(lower: i64, upper: i64, step: i64) -> Self {
        let iv = Value::new(Type::Scalar(ScalarType::Index));
        Self {
            kind: NodeKind::For { lower, upper, step, unroll: false },
            operands: smallvec![],
            results: smallvec![iv],
            body: Vec::new(),
        }
    }

    /// `for_loop` tagged with the unroll hint.
    pub fn for_loop_unrolled(lower: i64, upper: i64, step: i64) -> Self {
        let mut node = Self::for_loop(lower, upper, step);
        if let NodeKind::For { unroll, .. } = &mut node.kind {
            *unroll = true;
        }
        node
    }

    pub fn if_region(set: IntegerSet, operands: impl IntoIterator<Item = Value>) -> Self {
        Self { kind: NodeKind::If { set }, operands: operands.into_iter().collect(), results: smallvec![], body: Vec::new() }
    }

    pub fn alloc(element: ScalarType, shape: impl Into<Vec<i64>>, space: MemorySpace) -> Self {
        let result = Value::new(Type::memref(element, shape, space));
        Self::new(NodeKind::Alloc, [], [result])
    }

    pub fn const_index(value: i64) -> Self {
        let result = Value::new(Type::Scalar(ScalarType::Index));
        Self::new(NodeKind::ConstIndex { value }, [], [result])
    }

    pub fn const_int(value: i64) -> Self {
        let result = Value::new(Type::Scalar(ScalarType::Int));
        Self::new(NodeKind::ConstInt { value }, [], [result])
    }

    pub fn const_float(value: f64, ty: ScalarType) -> Self {
        let result = Value::new(Type::Scalar(ty));
        Self::new(NodeKind::ConstFloat { value }, [], [result])
    }

    pub fn apply(map: AffineMap, operands: impl IntoIterator<Item = Value>) -> Self {
        let result = Value::new(Type::Scalar(ScalarType::Index));
        Self::new(NodeKind::Apply { map }, operands, [result])
    }

    pub fn load(memref: Value, map: AffineMap, indices: impl IntoIterator<Item = Value>) -> Self {
        let result = Value::new(Type::Scalar(memref.ty().element()));
        let operands = std::iter::once(memref).chain(indices);
        Self::new(NodeKind::Load { map }, operands, [result])
    }

    pub fn plain_load(memref: Value, indices: impl IntoIterator<Item = Value>) -> Self {
        let result = Value::new(Type::Scalar(memref.ty().element()));
        let operands = std::iter::once(memref).chain(indices);
        Self::new(NodeKind::PlainLoad, operands, [result])
    }

    pub fn store(value: Value, memref: Value, map: AffineMap, indices: impl IntoIterator<Item = Value>) -> Self {
        let operands = [value, memref].into_iter().chain(indices);
        Self::new(NodeKind::Store { map }, operands, [])
    }

    pub fn vector_load(memref: Value, map: AffineMap, lanes: u32, indices: impl IntoIterator<Item = Value>) -> Self {
        let result = Value::new(Type::Scalar(memref.ty().element()));
        let operands = std::iter::once(memref).chain(indices);
        Self::new(NodeKind::VectorLoad { map, lanes }, operands, [result])
    }

    pub fn vector_store(
        value: Value,
        memref: Value,
        map: AffineMap,
        lanes: u32,
        indices: impl IntoIterator<Item = Value>,
    ) -> Self {
        let operands = [value, memref].into_iter().chain(indices);
        Self::new(NodeKind::VectorStore { map, lanes }, operands, [])
    }

    pub fn barrier() -> Self {
        Self::new(NodeKind::Barrier, [], [])
    }

    pub fn shuffle(mode: ShuffleMode, value: Value, offset: Value, width: Value) -> Self {
        let result = Value::new(value.ty().clone());
        Self::new(NodeKind::Shuffle { mode }, [value, offset, width], [result])
    }

    fn binary(kind: NodeKind, lhs: Value, rhs: Value) -> Self {
        let result = Value::new(lhs.ty().clone());
        Self::new(kind, [lhs, rhs], [result])
    }

    pub fn mul(lhs: Value, rhs: Value) -> Self {
        Self::binary(NodeKind::Mul, lhs, rhs)
    }

    pub fn add(lhs: Value, rhs: Value) -> Self {
        Self::binary(NodeKind::Add, lhs, rhs)
    }

    pub fn sub(lhs: Value, rhs: Value) -> Self {
        Self::binary(NodeKind::Sub, lhs, rhs)
    }

    pub fn div(lhs: Value, rhs: Value) -> Self {
        Self::binary(NodeKind::Div, lhs, rhs)
    }

    pub fn max(lhs: Value, rhs: Value) -> Self {
        Self::binary(NodeKind::Max, lhs, rhs)
    }

    pub fn pow(lhs: Value, rhs: Value) -> Self {
        Self::binary(NodeKind::Pow, lhs, rhs)
    }

    pub fn cmp(predicate: CmpPredicate, lhs: Value, rhs: Value) -> Self {
        let result = Value::new(Type::Scalar(ScalarType::Int));
        Self::new(NodeKind::Cmp { predicate }, [lhs, rhs], [result])
    }

    fn unary(kind: NodeKind, src: Value) -> Self {
        let result = Value::new(src.ty().clone());
        Self::new(kind, [src], [result])
    }

    pub fn exp(src: Value) -> Self {
        Self::unary(NodeKind::Exp, src)
    }

    pub fn tanh(src: Value) -> Self {
        Self::unary(NodeKind::Tanh, src)
    }

    pub fn sqrt(src: Value) -> Self {
        Self::unary(NodeKind::Sqrt, src)
    }

    pub fn log(src: Value) -> Self {
        Self::unary(NodeKind::Log, src)
    }

    pub fn bitcast(src: Value, ty: ScalarType) -> Self {
        let result = Value::new(Type::Scalar(ty));
        Self::new(NodeKind::Bitcast, [src], [result])
    }

    pub fn select(cond: Value, then_value: Value, else_value: Value) -> Self {
        let result = Value::new(then_value.ty().clone());
        Self::new(NodeKind::Select, [cond, then_value, else_value], [result])
    }
}

/// A function: a name and its top-level node list. Kernels are the
/// top-level `Parallel` nodes, in declaration order.
#[derive(Debug, Clone)]
pub struct Function {
    name: String,
    body: Vec<Node>,
}

impl Function {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), body: Vec::new() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn body(&self) -> &[Node] {
        &self.body
    }

    pub fn push(&mut self, node: Node) -> &mut Self {
        self.body.push(node);
        self
    }
}

/// A whole input module: functions in declaration order.
#[derive(Debug, Clone, Default)]
pub struct Module {
    functions: Vec<Function>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn functions(&self) -> &[Function] {
        &self.functions
    }

    pub fn push(&mut self, function: Function) -> &mut Self {
        self.functions.push(function);
        self
    }
}
