//! Generation-scoped state: the symbol table and module counters.

use std::collections::HashMap;

use polygen_ir::Value;
use snafu::OptionExt;

use crate::error::{NameCollisionSnafu, Result, UndefinedValueSnafu};

/// Write-once mapping from IR values to generated identifier names.
///
/// Keys are the values' stable ids. Renaming a value or looking up an
/// unnamed one is a pipeline bug and fails generation outright; there
/// is no sentinel fallback.
#[derive(Debug, Default)]
pub struct SymbolTable {
    names: HashMap<u64, String>,
}

impl SymbolTable {
    /// Assign `name` to `value`. Fails if the value is already named.
    pub fn define(&mut self, value: &Value, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if let Some(existing) = self.names.get(&value.id()) {
            return NameCollisionSnafu { id: value.id(), existing: existing.clone(), name }.fail();
        }
        self.names.insert(value.id(), name);
        Ok(())
    }

    /// Name previously assigned to `value`.
    pub fn lookup(&self, value: &Value) -> Result<&str> {
        self.names.get(&value.id()).map(String::as_str).context(UndefinedValueSnafu { id: value.id() })
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.names.contains_key(&value.id())
    }
}

/// State for one whole-module generation run.
///
/// Owns the symbol table and the counters whose scope outlives a single
/// kernel (kernel names stay unique for the module; captured-parameter
/// names keep incrementing across kernels). Built fresh at the start of
/// each generation call; nothing survives between runs.
#[derive(Debug, Default)]
pub struct GenerationContext {
    pub symbols: SymbolTable,
    kernel_counter: usize,
    arg_counter: usize,
    depth: usize,
}

impl GenerationContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unique kernel name: `kernel0`, `kernel1`, ...
    pub fn next_kernel_name(&mut self) -> String {
        let name = format!("kernel{}", self.kernel_counter);
        self.kernel_counter += 1;
        name
    }

    /// Next captured-parameter name: `arg0`, `arg1`, ...
    pub fn next_arg_name(&mut self) -> String {
        let name = format!("arg{}", self.arg_counter);
        self.arg_counter += 1;
        name
    }

    /// Current indentation string.
    pub fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }

    pub fn push_indent(&mut self) {
        self.depth += 1;
    }

    pub fn pop_indent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }
}
