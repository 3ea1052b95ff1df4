//! Type vocabulary for the affine/parallel IR.
//!
//! Every value produced by a node carries a [`Type`]: either one of the
//! scalar types or a shaped, space-tagged memory reference.

/// Scalar element types understood by the backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarType {
    F16,
    F32,
    F64,
    Int,
    Index,
}

impl ScalarType {
    /// Bit width of the scalar, used for vectorized access planning.
    pub fn bit_width(self) -> u32 {
        match self {
            ScalarType::F16 => 16,
            ScalarType::F32 | ScalarType::Int | ScalarType::Index => 32,
            ScalarType::F64 => 64,
        }
    }

    pub fn is_float(self) -> bool {
        matches!(self, ScalarType::F16 | ScalarType::F32 | ScalarType::F64)
    }
}

/// Address space a memref lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MemorySpace {
    Global,
    Shared,
    Local,
}

/// Value type: a scalar or a shaped memory reference.
///
/// Shape ordering is declaration order, outermost dimension first.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    Scalar(ScalarType),
    MemRef { element: ScalarType, shape: Vec<i64>, space: MemorySpace },
}

impl Type {
    pub fn memref(element: ScalarType, shape: impl Into<Vec<i64>>, space: MemorySpace) -> Self {
        Type::MemRef { element, shape: shape.into(), space }
    }

    /// Element type for memrefs, the scalar itself otherwise.
    pub fn element(&self) -> ScalarType {
        match self {
            Type::Scalar(s) => *s,
            Type::MemRef { element, .. } => *element,
        }
    }

}

/// Float comparison predicates.
///
/// The full vocabulary a middle end can produce; backends may support
/// only a subset and must reject the rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpPredicate {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

/// Warp shuffle addressing modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShuffleMode {
    /// Shift values down the warp by a fixed offset.
    Down,
    /// Read from an explicit source lane.
    Idx,
    /// Shift values up the warp.
    Up,
    /// Butterfly exchange by XOR of the lane id.
    Xor,
}
