//! Error kinds for document loading and operation dispatch.
//!
//! Every failure is raised synchronously at the offending call; nothing is
//! retried or swallowed. Multi-element mutations validate their arguments
//! before touching any node, so a returned error means no node was mutated.

use thiserror::Error;

/// Errors raised by document loading, the operation dispatcher, and the
/// `NodeSet` contract methods.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    /// An operation received a present-but-malformed argument
    /// (e.g. an empty attribute name).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A required argument was null/absent where a value was mandatory
    /// (e.g. a null attribute name).
    #[error("missing argument: {0}")]
    MissingArgument(String),

    /// `nth` called with a position outside `[0, count)`.
    #[error("index {index} out of range for set of {len} element(s)")]
    IndexOutOfRange { index: i64, len: usize },

    /// Unknown operation name, or a known operation invoked with an
    /// argument count/type combination outside its contract.
    #[error("function '{op}' with {argc} argument(s) is not supported")]
    UnsupportedOperation { op: String, argc: usize },

    /// `map`/`toDictionary` produced two elements with the same key.
    #[error("duplicate key '{0}' in map projection")]
    DuplicateKey(String),

    /// The input markup could not be parsed into a document tree.
    #[error("parse error: {0}")]
    Parse(String),

    /// The document source could not be read.
    #[error("i/o error: {0}")]
    Io(String),
}

impl QueryError {
    /// Build the dispatcher's uniform unknown-operation error.
    pub(crate) fn unsupported(op: &str, argc: usize) -> Self {
        QueryError::UnsupportedOperation {
            op: op.to_string(),
            argc,
        }
    }
}
