//! Error types for framework operations.

/// Errors that can occur when a framework token must resolve.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    /// The token does not name a supported framework.
    #[error("'{token}' is an unsupported framework")]
    Unsupported {
        /// The token as written.
        token: String,
    },
}

/// Result type for framework operations.
pub type Result<T> = std::result::Result<T, FrameworkError>;
