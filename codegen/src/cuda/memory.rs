//! Memory layout: flat offsets for global memrefs, native
//! multi-dimensional arrays for shared/local ones, and the wide-fetch
//! form for vectorized accesses.

use polygen_ir::{AffineExpr, MemorySpace, ScalarType, Type, Value};

use crate::context::SymbolTable;
use crate::error::{MalformedKernelSnafu, Result};

use super::exprs::{render, render_atom};
use super::types::{c_scalar, vector_fetch_type};

fn memref_type(memref: &Value) -> Result<(ScalarType, &[i64], MemorySpace)> {
    match memref.ty() {
        Type::MemRef { element, shape, space } => Ok((*element, shape, *space)),
        Type::Scalar(_) => {
            MalformedKernelSnafu { reason: format!("value {} used as a memref but typed scalar", memref.id()) }.fail()
        }
    }
}

/// Row-major strides for a declared shape: the last dimension varies
/// fastest, `stride[k] = product(shape[k+1..])`.
pub fn row_major_strides(shape: &[i64]) -> Vec<i64> {
    let mut strides = vec![1i64; shape.len()];
    for k in (0..shape.len().saturating_sub(1)).rev() {
        strides[k] = strides[k + 1] * shape[k + 1];
    }
    strides
}

/// Render the access expression for a memref: `name[flat + 0]` for
/// global memory, `name[i][j]` for shared/local arrays.
///
/// `exprs` are the per-dimension index expressions in shape order;
/// `operands` is the operand list the expressions' dims refer to.
pub fn access(memref: &Value, exprs: &[AffineExpr], operands: &[Value], symbols: &SymbolTable) -> Result<String> {
    let (_, shape, space) = memref_type(memref)?;
    let name = symbols.lookup(memref)?.to_string();

    match space {
        MemorySpace::Global => {
            let strides = row_major_strides(shape);
            let mut terms = Vec::with_capacity(exprs.len());
            for (expr, stride) in exprs.iter().zip(&strides) {
                let index = render_atom(expr, operands, symbols)?;
                if *stride == 1 {
                    terms.push(index);
                } else {
                    terms.push(format!("{index} * {stride}"));
                }
            }
            // Trailing `+ 0` keeps every flat access the same shape.
            terms.push("0".to_string());
            Ok(format!("{name}[{}]", terms.join(" + ")))
        }
        MemorySpace::Shared | MemorySpace::Local => {
            let mut out = name;
            for expr in exprs {
                out.push('[');
                out.push_str(&render(expr, operands, symbols)?);
                out.push(']');
            }
            Ok(out)
        }
    }
}

/// Render the access for a vectorized load/store: one wide fetch
/// through a reinterpreted pointer to the scalar element address.
pub fn vector_access(
    memref: &Value,
    exprs: &[AffineExpr],
    operands: &[Value],
    lanes: u32,
    symbols: &SymbolTable,
) -> Result<String> {
    let (element, _, _) = memref_type(memref)?;
    let fetch = vector_fetch_type(element, lanes)?;
    let scalar = access(memref, exprs, operands, symbols)?;
    Ok(format!("(reinterpret_cast<{fetch}*>(&({scalar}))[0])"))
}

/// Render the declaration of a memref-typed variable: a flat pointer
/// for global memory (`float* arg0`), a fixed-size array otherwise
/// (`__shared__ float array0[16][16]`).
pub fn declare(memref: &Value, symbols: &SymbolTable) -> Result<String> {
    let (element, shape, space) = memref_type(memref)?;
    let name = symbols.lookup(memref)?;
    let scalar = c_scalar(element);

    Ok(match space {
        MemorySpace::Global => format!("{scalar}* {name}"),
        MemorySpace::Shared | MemorySpace::Local => {
            let mut out = String::new();
            if space == MemorySpace::Shared {
                out.push_str("__shared__ ");
            }
            out.push_str(scalar);
            out.push(' ');
            out.push_str(name);
            for dim in shape {
                out.push_str(&format!("[{dim}]"));
            }
            out
        }
    })
}
