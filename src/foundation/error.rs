/// Convenience result type used across MarketClash.
pub type ClashResult<T> = Result<T, ClashError>;

/// Top-level error taxonomy for the render pipeline.
#[derive(thiserror::Error, Debug)]
pub enum ClashError {
    /// Invalid input data (series, geometry, frame buffers).
    #[error("validation error: {0}")]
    Validation(String),

    /// Invalid or unreadable run configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Errors while drawing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors while persisting or encoding frames.
    #[error("encode error: {0}")]
    Encode(String),

    /// The run was cancelled before the video was produced.
    #[error("run cancelled after {frames} frame(s)")]
    Cancelled {
        /// Number of frames rendered before cancellation was observed.
        frames: u64,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ClashError {
    /// Build a [`ClashError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`ClashError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`ClashError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`ClashError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Return `true` for [`ClashError::Cancelled`].
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
