//! Affine expression rendering.
//!
//! Expressions render as structurally recursive C arithmetic with no
//! algebraic simplification. Nested binary subexpressions are
//! parenthesized; the root is left bare so loop guards and `if`
//! constraints read naturally (`i - 2 == 0`, not `(i - 2) == 0`).

use polygen_ir::{AffineBinOp, AffineExpr, Value};

use crate::context::SymbolTable;
use crate::error::Result;

/// Render `expr` against its operand list.
pub fn render(expr: &AffineExpr, operands: &[Value], symbols: &SymbolTable) -> Result<String> {
    match expr {
        AffineExpr::Dim(position) => Ok(symbols.lookup(&operands[*position])?.to_string()),
        AffineExpr::Const(value) => Ok(value.to_string()),
        AffineExpr::Binary { op, lhs, rhs } => {
            let l = render_atom(lhs, operands, symbols)?;
            let r = render_atom(rhs, operands, symbols)?;
            Ok(match op {
                // The affine vocabulary has no subtraction; a negative
                // constant addend prints as one for readability.
                // i64::MIN has no negation, it keeps the `+` form.
                AffineBinOp::Add => match **rhs {
                    AffineExpr::Const(c) if c < 0 && c > i64::MIN => format!("{l} - {}", -c),
                    _ => format!("{l} + {r}"),
                },
                AffineBinOp::Mul => format!("{l} * {r}"),
                AffineBinOp::FloorDiv => format!("{l} / {r}"),
                // Integer ceiling via the floor identity; valid for the
                // non-negative operands affine domains guarantee.
                AffineBinOp::CeilDiv => format!("({l} + {r} - 1) / {r}"),
                AffineBinOp::Mod => format!("{l} % {r}"),
            })
        }
    }
}

/// Render `expr` parenthesized if compound, for embedding inside a
/// larger expression (e.g. a stride multiplication).
pub fn render_atom(expr: &AffineExpr, operands: &[Value], symbols: &SymbolTable) -> Result<String> {
    let text = render(expr, operands, symbols)?;
    Ok(match expr {
        AffineExpr::Binary { .. } => format!("({text})"),
        _ => text,
    })
}
