/// Convenience result type used across risomix.
pub type RisoResult<T> = Result<T, RisoError>;

/// Top-level error taxonomy used by the library APIs.
///
/// Every variant is local and recoverable: a failed command leaves the scene untouched.
#[derive(thiserror::Error, Debug)]
pub enum RisoError {
    /// Invalid user-provided parameters or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// The action needs state that is not there yet (e.g. both images loaded).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// Errors raised while rasterizing or compositing a frame.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing scene descriptions.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RisoError {
    /// Build a [`RisoError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`RisoError::Precondition`] value.
    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    /// Build a [`RisoError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`RisoError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// True for errors that should be shown to the user as a warning rather than a failure.
    pub fn is_user_warning(&self) -> bool {
        matches!(self, Self::Precondition(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
