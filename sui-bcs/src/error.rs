//! Error types for encoding and decoding operations.

use alloc::string::String;

use thiserror::Error;

use crate::IntWidth;

// DESERIALIZATION ERROR
// ================================================================================================

/// Errors that can occur while reconstructing a value from BCS bytes.
///
/// Every variant aborts reconstruction of the enclosing value; no partially decoded value is ever
/// returned to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeserializationError {
    /// The input ran out before a required field was complete.
    #[error("unexpected end of data")]
    UnexpectedEof,
    /// The bytes do not correspond to any valid value of the requested type.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(String),
    /// A tagged-union discriminant outside the declared set of variants.
    #[error("unknown variant {tag} for {type_name}")]
    UnknownVariant { type_name: &'static str, tag: u64 },
    /// The requested value was decoded but unread bytes are left in the input.
    #[error("{remaining} trailing bytes left after decoding")]
    TrailingBytes { remaining: usize },
    /// A [BudgetedReader](crate::BudgetedReader) would go over its byte budget.
    #[error("budget exhausted: requested {requested} bytes, {remaining} remaining")]
    BudgetExhausted { requested: usize, remaining: usize },
    /// Nesting of containers went deeper than the configured limit.
    #[error("container depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),
}

impl DeserializationError {
    /// Returns a [DeserializationError::MalformedEncoding] built from the provided message.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedEncoding(msg.into())
    }
}

// SERIALIZATION ERROR
// ================================================================================================

/// Errors that can occur while encoding a value.
///
/// These are raised before any byte of the offending item is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SerializationError {
    #[error("value {value} does not fit into {width}")]
    IntegerOutOfRange { width: IntWidth, value: u128 },
    #[error("sequence of length {0} exceeds the maximum BCS sequence length")]
    SequenceTooLong(usize),
}
