//! Error types for tether-wire.

use tether_topology::CodeError;
use thiserror::Error;

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, WireError>;

/// A received frame that cannot be turned into a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WireError {
    /// Fewer bytes than a payload occupies.
    #[error("payload too short: need {needed} bytes, got {actual}")]
    TooShort { needed: usize, actual: usize },

    /// A field carries a code with no meaning.
    #[error("invalid field: {0}")]
    InvalidCode(#[from] CodeError),
}
