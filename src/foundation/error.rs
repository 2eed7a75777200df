/// Crate-wide result type.
pub type StampResult<T> = Result<T, StampError>;

/// Errors surfaced by the public API.
///
/// Asset failures inside the render loop never reach callers as `StampError`; the affected slot
/// is left unbound instead. These variants cover caller misuse and the explicit IO entry points.
#[derive(thiserror::Error, Debug)]
pub enum StampError {
    /// Invalid caller-provided configuration or parameters.
    #[error("validation error: {0}")]
    Validation(String),

    /// An asset could not be read or decoded.
    #[error("asset error: {0}")]
    Asset(String),

    /// The frame could not be produced (buffer sizing, thread pool setup).
    #[error("render error: {0}")]
    Render(String),

    /// Scene or state (de)serialization failed.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Any other error, with its source chain preserved.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StampError {
    /// Build a [`StampError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`StampError::Asset`].
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`StampError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`StampError::Serde`].
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
