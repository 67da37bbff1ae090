//! Error types for the data model

/// Parse and validation failures for model values
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A status/stage/role string did not name a known value
    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },

    /// Email address failed validation
    #[error("invalid email address: {0}")]
    InvalidEmail(String),

    /// Name produced an empty slug
    #[error("name has no usable characters: {0:?}")]
    EmptySlug(String),
}

impl ModelError {
    #[inline]
    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::UnknownValue {
            kind,
            value: value.to_string(),
        }
    }
}
