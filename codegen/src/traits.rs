//! Collaborator seams for code generation.

use polygen_ir::{Node, NodeKind};

/// Supplies launch dimensions for a parallel region.
///
/// This is the narrow interface to the upstream dimension analyzer.
/// The result is purely informational: it feeds the launch-configuration
/// comment above each kernel and nothing else.
pub trait DimsProvider {
    /// Ordered dimension extents of `region` and their total element
    /// count. Returns an empty sequence for non-parallel nodes.
    fn parallel_dims(&self, region: &Node) -> (Vec<i64>, i64);
}

/// Dimension provider that reads the extents stored on the parallel
/// node itself. Stands in for the real analyzer in tests and simple
/// pipelines.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtentDims;

impl DimsProvider for ExtentDims {
    fn parallel_dims(&self, region: &Node) -> (Vec<i64>, i64) {
        match region.kind() {
            NodeKind::Parallel { extents } => {
                let dims: Vec<i64> = extents.to_vec();
                let total = dims.iter().product();
                (dims, total)
            }
            _ => (Vec::new(), 0),
        }
    }
}
