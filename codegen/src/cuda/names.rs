//! The naming pass.
//!
//! Runs once per top-level kernel region, strictly before body
//! emission. Names are assigned in a fixed kind ordering, each kind in
//! a full pre-order traversal of its own, so repeated runs over the
//! same IR produce byte-identical output. Memrefs referenced by loads
//! and stores but defined outside the region are captured as kernel
//! parameters, ordered by first encounter.

use polygen_ir::{Node, NodeKind, Value};

use crate::context::GenerationContext;
use crate::error::{MalformedKernelSnafu, Result};

const DIM_SUFFIXES: [&str; 3] = ["x", "y", "z"];

/// Name every value the region defines and return the captured free
/// variables, in parameter order.
pub fn collect_names(region: &Node, ctx: &mut GenerationContext) -> Result<Vec<Value>> {
    name_parallel_ivs(region, ctx)?;
    name_loop_ivs(region, ctx)?;
    name_applies(region, ctx)?;
    name_allocs(region, ctx)?;

    let mut captured = Vec::new();
    name_vector_loads(region, ctx, &mut captured)?;
    name_scalar_loads(region, ctx, &mut captured)?;
    capture_stores(region, ctx, &mut captured)?;

    name_constants(region, ctx)?;
    name_temps(region, ctx)?;

    Ok(captured)
}

/// Parallel induction variables become launch indices: the region's
/// own variables are block indices, any nested region's are thread
/// indices. Assignment is by reverse position, last variable -> `x`.
fn name_parallel_ivs(region: &Node, ctx: &mut GenerationContext) -> Result<()> {
    region.try_walk(&mut |node: &Node| {
        if !matches!(node.kind(), NodeKind::Parallel { .. }) {
            return Ok(());
        }
        let prefix = if std::ptr::eq(node, region) { "blockIdx." } else { "threadIdx." };
        let ivs = node.induction_vars();
        if ivs.len() > DIM_SUFFIXES.len() {
            return MalformedKernelSnafu {
                reason: format!("parallel region with {} induction variables, at most 3 map to launch indices", ivs.len()),
            }
            .fail();
        }
        for (i, iv) in ivs.iter().enumerate() {
            let suffix = DIM_SUFFIXES[ivs.len() - 1 - i];
            ctx.symbols.define(iv, format!("{prefix}{suffix}"))?;
        }
        Ok(())
    })
}

fn name_loop_ivs(region: &Node, ctx: &mut GenerationContext) -> Result<()> {
    let mut counter = 0usize;
    region.try_walk(&mut |node: &Node| {
        if matches!(node.kind(), NodeKind::For { .. }) {
            ctx.symbols.define(&node.induction_vars()[0], format!("iter{counter}"))?;
            counter += 1;
        }
        Ok(())
    })
}

fn name_applies(region: &Node, ctx: &mut GenerationContext) -> Result<()> {
    let mut counter = 0usize;
    region.try_walk(&mut |node: &Node| {
        if matches!(node.kind(), NodeKind::Apply { .. }) {
            for result in node.results() {
                ctx.symbols.define(result, format!("expr{counter}"))?;
                counter += 1;
            }
        }
        Ok(())
    })
}

fn name_allocs(region: &Node, ctx: &mut GenerationContext) -> Result<()> {
    let mut counter = 0usize;
    region.try_walk(&mut |node: &Node| {
        if matches!(node.kind(), NodeKind::Alloc) {
            ctx.symbols.define(node.result(), format!("array{counter}"))?;
            counter += 1;
        }
        Ok(())
    })
}

/// Capture rule shared by load and store scanning: a memref operand
/// with no name yet was defined outside the region and becomes the
/// next formal parameter.
fn capture_memref(memref: &Value, ctx: &mut GenerationContext, captured: &mut Vec<Value>) -> Result<()> {
    if !ctx.symbols.contains(memref) {
        let name = ctx.next_arg_name();
        ctx.symbols.define(memref, name)?;
        captured.push(memref.clone());
    }
    Ok(())
}

fn name_vector_loads(region: &Node, ctx: &mut GenerationContext, captured: &mut Vec<Value>) -> Result<()> {
    let mut counter = 0usize;
    region.try_walk(&mut |node: &Node| {
        if matches!(node.kind(), NodeKind::VectorLoad { .. }) {
            capture_memref(&node.operands()[0], ctx, captured)?;
            ctx.symbols.define(node.result(), format!("vec{counter}"))?;
            counter += 1;
        }
        Ok(())
    })
}

/// Both scalar load forms share one result counter; affine-indexed
/// loads are scanned before plain-indexed ones.
fn name_scalar_loads(region: &Node, ctx: &mut GenerationContext, captured: &mut Vec<Value>) -> Result<()> {
    let mut counter = 0usize;
    let kinds: [fn(&NodeKind) -> bool; 2] =
        [|k| matches!(k, NodeKind::Load { .. }), |k| matches!(k, NodeKind::PlainLoad)];
    for kind in kinds {
        region.try_walk(&mut |node: &Node| {
            if kind(node.kind()) {
                capture_memref(&node.operands()[0], ctx, captured)?;
                ctx.symbols.define(node.result(), format!("R{counter}"))?;
                counter += 1;
            }
            Ok(())
        })?;
    }
    Ok(())
}

fn capture_stores(region: &Node, ctx: &mut GenerationContext, captured: &mut Vec<Value>) -> Result<()> {
    let kinds: [fn(&NodeKind) -> bool; 2] =
        [|k| matches!(k, NodeKind::Store { .. }), |k| matches!(k, NodeKind::VectorStore { .. })];
    for kind in kinds {
        region.try_walk(&mut |node: &Node| {
            if kind(node.kind()) {
                capture_memref(&node.operands()[1], ctx, captured)?;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Constants share one counter across the three kinds, visited in
/// index, float, int order.
fn name_constants(region: &Node, ctx: &mut GenerationContext) -> Result<()> {
    let mut counter = 0usize;
    let kinds: [fn(&NodeKind) -> bool; 3] = [
        |k| matches!(k, NodeKind::ConstIndex { .. }),
        |k| matches!(k, NodeKind::ConstFloat { .. }),
        |k| matches!(k, NodeKind::ConstInt { .. }),
    ];
    for kind in kinds {
        region.try_walk(&mut |node: &Node| {
            if kind(node.kind()) {
                ctx.symbols.define(node.result(), format!("const{counter}th"))?;
                counter += 1;
            }
            Ok(())
        })?;
    }
    Ok(())
}

/// Arithmetic, math, bitcast, and shuffle results share the `temp`
/// counter, one full pre-order pass per kind in fixed order.
fn name_temps(region: &Node, ctx: &mut GenerationContext) -> Result<()> {
    let mut counter = 0usize;
    let kinds: [fn(&NodeKind) -> bool; 13] = [
        |k| matches!(k, NodeKind::Mul),
        |k| matches!(k, NodeKind::Add),
        |k| matches!(k, NodeKind::Max),
        |k| matches!(k, NodeKind::Sub),
        |k| matches!(k, NodeKind::Div),
        |k| matches!(k, NodeKind::Exp),
        |k| matches!(k, NodeKind::Pow),
        |k| matches!(k, NodeKind::Cmp { .. }),
        |k| matches!(k, NodeKind::Tanh),
        |k| matches!(k, NodeKind::Sqrt),
        |k| matches!(k, NodeKind::Log),
        |k| matches!(k, NodeKind::Bitcast),
        |k| matches!(k, NodeKind::Shuffle { .. }),
    ];
    for kind in kinds {
        region.try_walk(&mut |node: &Node| {
            if kind(node.kind()) {
                ctx.symbols.define(node.result(), format!("temp{counter}"))?;
                counter += 1;
            }
            Ok(())
        })?;
    }
    Ok(())
}
