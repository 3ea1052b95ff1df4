//! Code generation for the polygen affine/parallel IR.
//!
//! Turns the middle end's loop/parallel-region tree into textual GPU
//! kernel source. The only backend is CUDA C, under [`cuda`]; the
//! naming scheme, memory layout, and statement emission live there.
//!
//! # Usage
//!
//! ```ignore
//! use polygen_codegen::{cuda, ExtentDims};
//!
//! let source = cuda::generate(&module, &ExtentDims)?;
//! ```

pub mod context;
pub mod cuda;
pub mod error;
pub mod traits;

#[cfg(test)]
mod test;

pub use context::{GenerationContext, SymbolTable};
pub use error::{Error, Result};
pub use traits::{DimsProvider, ExtentDims};
