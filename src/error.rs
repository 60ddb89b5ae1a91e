use thiserror::Error;

/// Result type alias for matrix and network operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the numeric core.
///
/// Both variants signal a programming error in the caller. Nothing in the
/// crate retries or coerces around them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A matrix was requested with a zero dimension.
    #[error("invalid matrix shape {rows}x{cols}: dimensions must be positive")]
    InvalidShape { rows: usize, cols: usize },

    /// Operands (or a vector and a layer) have incompatible dimensions.
    #[error("shape mismatch in {op}: {}x{} vs {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        op: &'static str,
        left: (usize, usize),
        right: (usize, usize),
    },
}

/// Errors raised while loading or validating a `TrainConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}
