//! CUDA C source generation backend.
//!
//! Lowers a [`Module`] of affine/parallel regions into one textual
//! compilation unit: a single runtime include followed by one
//! `__global__` kernel per top-level parallel region, in declaration
//! order.
//!
//! Generation is single-threaded and all-or-nothing: one depth-first
//! pass per kernel, a fresh [`GenerationContext`] per module, and any
//! error aborts the whole call with no partial output.

pub mod exprs;
pub mod memory;
pub mod names;
pub mod ops;
pub mod types;

use polygen_ir::{Module, Node, NodeKind};

use crate::context::GenerationContext;
use crate::error::{MalformedKernelSnafu, Result};
use crate::traits::DimsProvider;

use self::memory::declare;
use self::names::collect_names;
use self::ops::emit_node;

/// The single include line prefixed to every generated module.
pub const RUNTIME_INCLUDE: &str = "#include \"cuda_runtime.h\"\n";

/// Generate CUDA C source for every kernel region in `module`.
///
/// Kernels appear in the input's declaration order, named `kernel0`,
/// `kernel1`, ... for the lifetime of this call.
pub fn generate(module: &Module, dims: &dyn DimsProvider) -> Result<String> {
    let mut ctx = GenerationContext::new();
    let mut out = String::from(RUNTIME_INCLUDE);

    for function in module.functions() {
        for node in function.body() {
            if matches!(node.kind(), NodeKind::Parallel { .. }) {
                emit_kernel(node, dims, &mut ctx, &mut out)?;
            }
        }
    }

    tracing::debug!(source = %out, "generated CUDA module");
    Ok(out)
}

/// Emit one kernel: naming pass, launch-dimension comment, signature
/// over the captured free variables, then the body.
fn emit_kernel(region: &Node, dims: &dyn DimsProvider, ctx: &mut GenerationContext, out: &mut String) -> Result<()> {
    let captured = collect_names(region, ctx)?;
    if captured.is_empty() {
        return MalformedKernelSnafu { reason: "kernel region captures no outside state" }.fail();
    }

    let (grid_dims, _) = dims.parallel_dims(region);
    let inner = region.body().iter().find(|n| matches!(n.kind(), NodeKind::Parallel { .. }));
    let (block_dims, _) = dims.parallel_dims(inner.unwrap_or(region));
    out.push_str(&format!("// grid dims: {}, block dims: {}\n", dims_tuple(&grid_dims), dims_tuple(&block_dims)));

    let kernel_name = ctx.next_kernel_name();
    let params: Vec<String> = captured.iter().map(|value| declare(value, &ctx.symbols)).collect::<Result<_>>()?;
    out.push_str(&format!("__global__ void {kernel_name}({}) {{\n", params.join(", ")));

    ctx.push_indent();
    for child in region.body() {
        emit_node(child, ctx, out)?;
    }
    ctx.pop_indent();
    out.push_str("}\n");
    Ok(())
}

/// Python-tuple formatting so a 1-D launch reads `(8,)`.
fn dims_tuple(dims: &[i64]) -> String {
    match dims {
        [single] => format!("({single},)"),
        _ => {
            let joined = dims.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
            format!("({joined})")
        }
    }
}
