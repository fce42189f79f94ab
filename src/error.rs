//! Error types for stylus.
//!
//! All failures the client can encounter are collected in [`StylusError`],
//! following the thiserror pattern. Auth, fetch, and render failures are
//! user-facing and surface as a timed banner in the TUI; `NotFound` indicates
//! a navigation invariant was violated and is a programming-logic fault.

use thiserror::Error;

/// Primary error type for stylus operations.
#[derive(Error, Debug)]
pub enum StylusError {
    /// Authentication against the remote service failed.
    #[error("Authentication failed: {message}")]
    Auth {
        /// Human-readable error message.
        message: String,
        /// Underlying transport error, if available.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Notebook retrieval failed after login.
    #[error("Failed to fetch notebooks: {message}")]
    Fetch {
        /// Human-readable error message.
        message: String,
        /// Underlying transport error, if available.
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Markdown conversion failed.
    #[error("Failed to render markdown: {message}")]
    Render {
        /// Human-readable error message.
        message: String,
    },

    /// A selection referenced an id absent from the cache.
    ///
    /// This is never a user-facing condition: the UI only offers ids that
    /// exist, so hitting this means the state machine broke an invariant.
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What kind of entity was looked up ("notebook" or "page").
        kind: &'static str,
        /// The id that was not found.
        id: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable error message.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {context}")]
    Io {
        /// Context describing the operation that failed.
        context: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

impl StylusError {
    /// Create a new authentication error.
    #[must_use]
    pub fn auth(message: impl Into<String>) -> Self {
        Self::Auth {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new authentication error with a transport source.
    #[must_use]
    pub fn auth_with_source(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Auth {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new fetch error.
    #[must_use]
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::Fetch {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new fetch error with a transport source.
    #[must_use]
    pub fn fetch_with_source(message: impl Into<String>, source: reqwest::Error) -> Self {
        Self::Fetch {
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a new render error.
    #[must_use]
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    /// Create a new not-found error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a new I/O error with context.
    #[must_use]
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Auth { .. } => 2,
            Self::Fetch { .. } => 3,
            Self::Render { .. } => 4,
            Self::Config { .. } => 5,
            Self::Io { .. } => 74,
            _ => 1,
        }
    }

    /// Whether this error should surface as a transient banner rather than
    /// terminate anything.
    ///
    /// Everything the remote service or the renderer can produce is
    /// recoverable; only internal invariant violations are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::NotFound { .. })
    }
}

/// Result type alias for stylus operations.
pub type Result<T> = std::result::Result<T, StylusError>;
