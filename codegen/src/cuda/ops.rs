//! Statement emission for individual IR nodes.
//!
//! One emission rule per node kind: non-container kinds produce a
//! single assignment/expression statement, container kinds open a
//! block, recurse, and close it. The match is exhaustive over
//! [`NodeKind`], so adding a kind without an emission rule fails to
//! compile instead of silently skipping at run time.

use polygen_ir::{AffineExpr, CmpPredicate, Node, NodeKind, ShuffleMode};

use crate::context::GenerationContext;
use crate::error::{MalformedKernelSnafu, Result, UnsupportedAttributeSnafu, UnsupportedNodeKindSnafu};

use super::exprs::render;
use super::memory::{access, declare, vector_access};
use super::types::c_scalar;

/// Emit the statement (or block) for one node at the current depth.
pub fn emit_node(node: &Node, ctx: &mut GenerationContext, out: &mut String) -> Result<()> {
    match node.kind() {
        NodeKind::Alloc => {
            let decl = declare(node.result(), &ctx.symbols)?;
            out.push_str(&format!("{}{decl};\n", ctx.indent()));
        }

        NodeKind::ConstIndex { value } => {
            let name = ctx.symbols.lookup(node.result())?;
            out.push_str(&format!("{}constexpr int {name} = {value};\n", ctx.indent()));
        }

        NodeKind::ConstInt { value } => {
            let name = ctx.symbols.lookup(node.result())?;
            let ty = c_scalar(node.result().ty().element());
            out.push_str(&format!("{}constexpr {ty} {name} = {value};\n", ctx.indent()));
        }

        NodeKind::ConstFloat { value } => {
            let name = ctx.symbols.lookup(node.result())?;
            let ty = c_scalar(node.result().ty().element());
            out.push_str(&format!("{}constexpr {ty} {name} = {value};\n", ctx.indent()));
        }

        NodeKind::Apply { map } => {
            if map.exprs.len() != 1 {
                return MalformedKernelSnafu {
                    reason: format!("affine apply with {} result expressions, exactly 1 required", map.exprs.len()),
                }
                .fail();
            }
            let name = ctx.symbols.lookup(node.result())?.to_string();
            let expr = render(&map.exprs[0], node.operands(), &ctx.symbols)?;
            out.push_str(&format!("{}int {name} = {expr};\n", ctx.indent()));
        }

        NodeKind::Mul => emit_infix(node, "*", ctx, out)?,
        NodeKind::Add => emit_infix(node, "+", ctx, out)?,
        NodeKind::Sub => emit_infix(node, "-", ctx, out)?,
        NodeKind::Div => emit_infix(node, "/", ctx, out)?,

        NodeKind::Max => emit_call2(node, "max", ctx, out)?,
        NodeKind::Pow => emit_call2(node, "powf", ctx, out)?,

        NodeKind::Cmp { predicate } => {
            let op = match predicate {
                CmpPredicate::Eq => "==",
                CmpPredicate::Gt => ">",
                other => {
                    return UnsupportedAttributeSnafu { what: format!("comparison predicate {other:?}") }.fail();
                }
            };
            emit_infix(node, op, ctx, out)?;
        }

        NodeKind::Exp => emit_call1(node, "exp", ctx, out)?,
        NodeKind::Tanh => emit_call1(node, "tanhf", ctx, out)?,
        NodeKind::Sqrt => emit_call1(node, "sqrtf", ctx, out)?,
        NodeKind::Log => emit_call1(node, "logf", ctx, out)?,

        NodeKind::Bitcast => {
            let name = ctx.symbols.lookup(node.result())?.to_string();
            let src = ctx.symbols.lookup(&node.operands()[0])?;
            let ty = c_scalar(node.result().ty().element());
            out.push_str(&format!("{}auto {name} = static_cast<{ty}>({src});\n", ctx.indent()));
        }

        NodeKind::Load { map } => {
            let name = ctx.symbols.lookup(node.result())?.to_string();
            let read = access(&node.operands()[0], &map.exprs, &node.operands()[1..], &ctx.symbols)?;
            out.push_str(&format!("{}auto {name} = {read};\n", ctx.indent()));
        }

        NodeKind::PlainLoad => {
            let name = ctx.symbols.lookup(node.result())?.to_string();
            let exprs: Vec<AffineExpr> = (0..node.operands().len() - 1).map(AffineExpr::dim).collect();
            let read = access(&node.operands()[0], &exprs, &node.operands()[1..], &ctx.symbols)?;
            out.push_str(&format!("{}auto {name} = {read};\n", ctx.indent()));
        }

        NodeKind::Store { map } => {
            let value = ctx.symbols.lookup(&node.operands()[0])?.to_string();
            let write = access(&node.operands()[1], &map.exprs, &node.operands()[2..], &ctx.symbols)?;
            out.push_str(&format!("{}{write} = {value};\n", ctx.indent()));
        }

        NodeKind::VectorLoad { map, lanes } => {
            let name = ctx.symbols.lookup(node.result())?.to_string();
            let read = vector_access(&node.operands()[0], &map.exprs, &node.operands()[1..], *lanes, &ctx.symbols)?;
            out.push_str(&format!("{}auto {name} = {read};\n", ctx.indent()));
        }

        NodeKind::VectorStore { map, lanes } => {
            let value = ctx.symbols.lookup(&node.operands()[0])?.to_string();
            let write = vector_access(&node.operands()[1], &map.exprs, &node.operands()[2..], *lanes, &ctx.symbols)?;
            out.push_str(&format!("{}{write} = {value};\n", ctx.indent()));
        }

        NodeKind::Barrier => {
            out.push_str(&format!("{}__syncthreads();\n", ctx.indent()));
        }

        NodeKind::Shuffle { mode } => {
            let intrinsic = match mode {
                ShuffleMode::Down => "__shfl_down_sync",
                ShuffleMode::Idx => "__shfl_sync",
                other => {
                    return UnsupportedAttributeSnafu { what: format!("shuffle mode {other:?}") }.fail();
                }
            };
            let name = ctx.symbols.lookup(node.result())?.to_string();
            let value = ctx.symbols.lookup(&node.operands()[0])?.to_string();
            let offset = ctx.symbols.lookup(&node.operands()[1])?.to_string();
            let width = ctx.symbols.lookup(&node.operands()[2])?;
            out.push_str(&format!(
                "{}auto {name} = {intrinsic}(0xffffffff, {value}, {offset}, {width});\n",
                ctx.indent()
            ));
        }

        NodeKind::For { lower, upper, step, unroll } => {
            let iter = ctx.symbols.lookup(&node.induction_vars()[0])?.to_string();
            if *unroll {
                out.push_str(&format!("{}#pragma unroll\n", ctx.indent()));
            }
            out.push_str(&format!(
                "{}for (int {iter} = {lower}; {iter} < {upper}; {iter} += {step}) {{\n",
                ctx.indent()
            ));
            emit_body(node, ctx, out)?;
            out.push_str(&format!("{}}}\n", ctx.indent()));
        }

        NodeKind::If { set } => {
            let mut constraints = Vec::with_capacity(set.constraints.len());
            for constraint in &set.constraints {
                let expr = render(&constraint.expr, node.operands(), &ctx.symbols)?;
                let relation = if constraint.equality { "==" } else { ">=" };
                constraints.push(format!("{expr} {relation} 0"));
            }
            // An empty conjunction is vacuously true; `if ()` is not C.
            if constraints.is_empty() {
                constraints.push("true".to_string());
            }
            out.push_str(&format!("{}if ({}) {{\n", ctx.indent(), constraints.join(" && ")));
            emit_body(node, ctx, out)?;
            out.push_str(&format!("{}}}\n", ctx.indent()));
        }

        // A nested parallel region is the thread dimension: its body is
        // inlined into the enclosing kernel, no block of its own.
        NodeKind::Parallel { .. } => {
            for child in node.body() {
                emit_node(child, ctx, out)?;
            }
        }

        NodeKind::Select => {
            return UnsupportedNodeKindSnafu { kind: node.kind().name() }.fail();
        }
    }
    Ok(())
}

fn emit_body(node: &Node, ctx: &mut GenerationContext, out: &mut String) -> Result<()> {
    ctx.push_indent();
    for child in node.body() {
        emit_node(child, ctx, out)?;
    }
    ctx.pop_indent();
    Ok(())
}

/// `auto name = lhs OP rhs;`
fn emit_infix(node: &Node, op: &str, ctx: &mut GenerationContext, out: &mut String) -> Result<()> {
    let name = ctx.symbols.lookup(node.result())?.to_string();
    let lhs = ctx.symbols.lookup(&node.operands()[0])?.to_string();
    let rhs = ctx.symbols.lookup(&node.operands()[1])?;
    out.push_str(&format!("{}auto {name} = {lhs} {op} {rhs};\n", ctx.indent()));
    Ok(())
}

/// `auto name = f(lhs, rhs);`
fn emit_call2(node: &Node, f: &str, ctx: &mut GenerationContext, out: &mut String) -> Result<()> {
    let name = ctx.symbols.lookup(node.result())?.to_string();
    let lhs = ctx.symbols.lookup(&node.operands()[0])?.to_string();
    let rhs = ctx.symbols.lookup(&node.operands()[1])?;
    out.push_str(&format!("{}auto {name} = {f}({lhs}, {rhs});\n", ctx.indent()));
    Ok(())
}

/// `auto name = f(src);`
fn emit_call1(node: &Node, f: &str, ctx: &mut GenerationContext, out: &mut String) -> Result<()> {
    let name = ctx.symbols.lookup(node.result())?.to_string();
    let src = ctx.symbols.lookup(&node.operands()[0])?;
    out.push_str(&format!("{}auto {name} = {f}({src});\n", ctx.indent()));
    Ok(())
}
