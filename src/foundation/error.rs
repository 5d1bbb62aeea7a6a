/// Convenience result type used across the crate.
pub type ChordResult<T> = Result<T, ChordError>;

/// Error taxonomy for a render-and-encode run.
///
/// Every variant terminates the run. The binary maps variants to distinct exit codes.
#[derive(thiserror::Error, Debug)]
pub enum ChordError {
    /// Invalid configuration (rejected before any work starts).
    #[error("validation error: {0}")]
    Validation(String),

    /// The execution environment is missing something required (e.g. `ffmpeg`).
    #[error("environment error: {0}")]
    Environment(String),

    /// Rasterization or frame-store failure.
    #[error("frame synthesis error: {0}")]
    Synthesis(String),

    /// The external encoder failed.
    #[error("encoding error: {0}")]
    Encode(String),

    /// The run was abandoned through a [`CancelToken`](crate::CancelToken).
    #[error("cancelled: {0}")]
    Cancelled(String),

    /// Context-carrying error from lower layers (usually I/O).
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ChordError {
    /// Build a [`ChordError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ChordError::Environment`].
    pub fn environment(msg: impl Into<String>) -> Self {
        Self::Environment(msg.into())
    }

    /// Build a [`ChordError::Synthesis`].
    pub fn synthesis(msg: impl Into<String>) -> Self {
        Self::Synthesis(msg.into())
    }

    /// Build a [`ChordError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`ChordError::Cancelled`].
    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::Cancelled(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
