//! Errors raised by the fixture store and request handlers

use thiserror::Error;

/// Library result alias
pub type FixtureResult<T> = Result<T, FixtureError>;

/// Everything the fixture backend can reject
#[derive(Debug, Error)]
pub enum FixtureError {
    /// Login with anything but the configured pair
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Request body could not be decoded
    #[error("invalid request body: {0}")]
    InvalidBody(String),

    /// `location` form value is not a `[lat, lon]` array
    #[error("invalid location {value:?}: {reason}")]
    InvalidLocation {
        /// Raw field value
        value: String,
        /// Parser message
        reason: String,
    },

    /// Entity lookup by id failed
    #[error("{kind} not found: {id}")]
    NotFound {
        /// Entity kind ("post", "user", ...)
        kind: &'static str,
        /// Requested id
        id: String,
    },

    /// No handler for this method and path
    #[error("no route for {method} {path}")]
    NoRoute {
        /// Request method
        method: String,
        /// Request path
        path: String,
    },

    /// Insert referenced a user that does not exist
    #[error("unknown user: {0}")]
    UnknownUser(String),

    /// Insert reused an existing id
    #[error("duplicate {kind} id: {id}")]
    DuplicateId {
        /// Entity kind
        kind: &'static str,
        /// Offending id
        id: String,
    },

    /// Every numeric id is taken, so none can be assigned
    #[error("no free {kind} id left")]
    IdsExhausted {
        /// Entity kind
        kind: &'static str,
    },

    /// Response serialization failed
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl FixtureError {
    /// HTTP status code this error is reported with
    pub const fn status(&self) -> u16 {
        match self {
            Self::InvalidBody(_) | Self::InvalidLocation { .. } => 400,
            Self::InvalidCredentials => 401,
            Self::NotFound { .. } | Self::NoRoute { .. } => 404,
            Self::DuplicateId { .. } | Self::IdsExhausted { .. } => 409,
            Self::UnknownUser(_) | Self::Serialize(_) => 500,
        }
    }

    /// Shorthand for a missing entity
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }
}
