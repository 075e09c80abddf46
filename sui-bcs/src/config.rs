use crate::{DeserializationError, MAX_CONTAINER_DEPTH};

// TRAILING BYTES POLICY
// ================================================================================================

/// What a top-level decode does with input left over after the requested value.
///
/// BCS streams are not self-delimiting beyond the single value requested, so leftover bytes
/// usually mean the caller asked for the wrong type.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TrailingBytes {
    /// Fail with [DeserializationError::TrailingBytes].
    #[default]
    Reject,
    /// Emit a `tracing` warning and return the decoded value.
    Warn,
    /// Silently return the decoded value.
    Allow,
}

impl TrailingBytes {
    /// Applies this policy to `remaining` unread bytes.
    pub fn check(self, remaining: usize) -> Result<(), DeserializationError> {
        if remaining == 0 {
            return Ok(());
        }
        match self {
            Self::Reject => Err(DeserializationError::TrailingBytes { remaining }),
            Self::Warn => {
                tracing::warn!(remaining, "trailing bytes left after decoding");
                Ok(())
            },
            Self::Allow => Ok(()),
        }
    }
}

// DECODER CONFIG
// ================================================================================================

/// Policy applied by top-level decode operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    pub trailing_bytes: TrailingBytes,
    /// Maximum nesting of vectors, structs and enums in layout-driven decoding.
    pub max_container_depth: usize,
    /// When set, the decode may consume at most this many bytes.
    pub budget: Option<usize>,
}

impl DecoderConfig {
    pub const fn new() -> Self {
        Self {
            trailing_bytes: TrailingBytes::Reject,
            max_container_depth: MAX_CONTAINER_DEPTH,
            budget: None,
        }
    }

    pub const fn with_trailing_bytes(mut self, policy: TrailingBytes) -> Self {
        self.trailing_bytes = policy;
        self
    }

    pub const fn with_max_container_depth(mut self, depth: usize) -> Self {
        self.max_container_depth = depth;
        self
    }

    pub const fn with_budget(mut self, budget: usize) -> Self {
        self.budget = Some(budget);
        self
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new()
    }
}
