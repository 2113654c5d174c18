/// Convenience result type used across unveil.
pub type UnveilResult<T> = Result<T, UnveilError>;

/// Top-level error taxonomy used at the configuration boundary.
///
/// Runtime engine operations never fail: a missing node or an absent collaborator skips the
/// registration. Errors only surface while parsing or validating manifests, trigger strings and
/// simulated pages.
#[derive(thiserror::Error, Debug)]
pub enum UnveilError {
    /// Invalid user-provided configuration data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Structural problems in a page manifest.
    #[error("manifest error: {0}")]
    Manifest(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UnveilError {
    /// Build a [`UnveilError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`UnveilError::Manifest`] value.
    pub fn manifest(msg: impl Into<String>) -> Self {
        Self::Manifest(msg.into())
    }

    /// Build a [`UnveilError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
