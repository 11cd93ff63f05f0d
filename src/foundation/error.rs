/// Convenience result type used across Lenslayer.
pub type LenslayerResult<T> = Result<T, LenslayerError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Only [`LenslayerError::Config`] and [`LenslayerError::Source`] are terminal
/// for a pipeline; the remaining kinds are reported and contained.
#[derive(thiserror::Error, Debug)]
pub enum LenslayerError {
    /// Invalid setup data (target rate, canvas dimensions, ...). Fatal at setup.
    #[error("configuration error: {0}")]
    Config(String),

    /// A layer with this id is already registered. The operation is a no-op.
    #[error("duplicate layer id '{0}'")]
    DuplicateLayer(String),

    /// No layer with this id is registered. The operation is a no-op.
    #[error("unknown layer id '{0}'")]
    UnknownLayer(String),

    /// A layer callback failed. Contained per layer; the tick continues.
    #[error("layer callback error: {0}")]
    Callback(String),

    /// The video source is not available or was lost. Halts ticking until retry.
    #[error("source error: {0}")]
    Source(String),

    /// Invalid detection data. Never affects the render cadence.
    #[error("detection error: {0}")]
    Detection(String),

    /// Wrapped lower-level error from dependencies or host callbacks.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LenslayerError {
    /// Build a [`LenslayerError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build a [`LenslayerError::Callback`] value.
    pub fn callback(msg: impl Into<String>) -> Self {
        Self::Callback(msg.into())
    }

    /// Build a [`LenslayerError::Source`] value.
    pub fn source(msg: impl Into<String>) -> Self {
        Self::Source(msg.into())
    }

    /// Build a [`LenslayerError::Detection`] value.
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }
}
