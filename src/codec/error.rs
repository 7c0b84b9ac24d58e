//! Codec error types

use thiserror::Error;

/// Errors reported by the decoder and by construction-time shape checks
///
/// Decoding never panics on malformed input; every failure surfaces as one
/// of these variants and no partially decoded item is handed back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Fewer bytes remain than a read requires
    #[error("truncated input: need {needed} bytes at offset {at}, {available} available")]
    TruncatedInput {
        at: usize,
        needed: usize,
        available: usize,
    },

    /// An offset word points outside the buffer
    #[error("invalid offset {offset:#x} from container base {base} (buffer is {len} bytes)")]
    InvalidOffset { offset: u64, base: usize, len: usize },

    /// A tuple or fixed array cannot hold its declared number of fields
    #[error("arity mismatch: expected {expected} fields, found {found}")]
    ArityMismatch { expected: usize, found: usize },

    /// Aliased offsets would expand the decoded tree past what the input
    /// can describe
    #[error("decode limit exceeded: more than {limit} nodes from a {len}-byte input")]
    LimitExceeded { limit: usize, len: usize },

    /// A value does not have the kind its schema declares
    #[error("shape mismatch: expected {expected}, found {found}")]
    ShapeMismatch {
        expected: &'static str,
        found: &'static str,
    },
}
