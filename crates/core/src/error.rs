//! Typed input errors.

/// Rejection for a string outside one of the closed domain vocabularies.
///
/// Out-of-domain values are a caller contract violation and fail fast;
/// nothing in the engine silently coerces or defaults them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    #[error("unknown collection state: {value}")]
    UnknownState { value: String },

    #[error("unknown account type: {value}")]
    UnknownAccountType { value: String },

    #[error("unknown payment activity: {value}")]
    UnknownActivity { value: String },

    #[error("unknown collection action: {value}")]
    UnknownAction { value: String },

    #[error("unknown dunning channel: {value}")]
    UnknownChannel { value: String },

    #[error("unknown skip condition type: {value}")]
    UnknownSkipCondition { value: String },
}
