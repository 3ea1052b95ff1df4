//! Error types for code generation.
//!
//! Every variant is unrecoverable for the current generation call:
//! the driver returns the error and produces no partial output.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while generating kernel source.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// A value was named twice during the naming pass.
    #[snafu(display("value {id} already named `{existing}`, refusing `{name}`"))]
    NameCollision { id: u64, existing: String, name: String },

    /// A value was referenced before the naming pass assigned it a name.
    #[snafu(display("value {id} has no generated name"))]
    UndefinedValue { id: u64 },

    /// A node kind with no emission rule was encountered.
    #[snafu(display("no emission rule for node kind `{kind}`"))]
    UnsupportedNodeKind { kind: String },

    /// A node attribute outside the supported subset.
    #[snafu(display("unsupported attribute: {what}"))]
    UnsupportedAttribute { what: String },

    /// Structurally invalid kernel region.
    #[snafu(display("malformed kernel: {reason}"))]
    MalformedKernel { reason: String },
}
