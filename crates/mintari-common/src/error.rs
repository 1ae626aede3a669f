//! Common error types used throughout mintari.
//!
//! One error type covers the record store, the stylization backends and the
//! storage publisher. Remote failures are split into [`Error::Network`] (the
//! request never produced a response) and [`Error::Upstream`] (the remote
//! answered with a failure).

/// Common error type for mintari.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The requested record was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(String),

    /// An I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The operation conflicts with the current state of a record.
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Required configuration (such as an API credential) is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A remote call could not be completed.
    #[error("Network error: {0}")]
    Network(String),

    /// A remote service answered with a failure.
    #[error("Upstream error ({status}): {body}")]
    Upstream {
        /// HTTP status code returned by the remote service.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a new Database error.
    pub fn database<S: Into<String>>(msg: S) -> Self {
        Self::Database(msg.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new Conflict error.
    pub fn conflict<S: Into<String>>(msg: S) -> Self {
        Self::Conflict(msg.into())
    }

    /// Create a new Configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a new Network error.
    pub fn network<S: Into<String>>(msg: S) -> Self {
        Self::Network(msg.into())
    }

    /// Create a new Upstream error from a status code and response body.
    pub fn upstream<S: Into<String>>(status: u16, body: S) -> Self {
        Self::Upstream {
            status,
            body: body.into(),
        }
    }

    /// Create a new Internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// HTTP status code to report when this error ends a request.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InvalidInput(_) => 400,
            Self::Conflict(_) => 409,
            Self::Network(_) | Self::Upstream { .. } => 502,
            Self::Database(_) | Self::Io(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Short machine-readable code for this error kind.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::Database(_) => "database_error",
            Self::Io(_) => "io_error",
            Self::InvalidInput(_) => "validation_error",
            Self::Conflict(_) => "conflict",
            Self::Configuration(_) => "configuration_error",
            Self::Network(_) => "network_error",
            Self::Upstream { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
        }
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
