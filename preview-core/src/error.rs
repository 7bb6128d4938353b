//! Error types for preview-core.

use thiserror::Error;

use crate::fallback::AllModelsFailed;

/// Result type alias using preview-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for preview operations
#[derive(Error, Debug)]
pub enum Error {
    // Request errors
    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    UpstreamFetch(String),

    // Generation errors
    #[error("All candidate models failed: {0}")]
    Generation(#[from] AllModelsFailed),

    #[error("{0}")]
    Configuration(String),

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn upstream_fetch(message: impl Into<String>) -> Self {
        Self::UpstreamFetch(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// True for errors caused by the caller's input or the image they pointed at.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidInput(_) | Self::UpstreamFetch(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::ModelAttempt;

    #[test]
    fn test_client_error_classification() {
        assert!(Error::invalid_input("bad url").is_client_error());
        assert!(Error::upstream_fetch("not an image").is_client_error());
        assert!(!Error::configuration("no key").is_client_error());

        let generation = Error::from(AllModelsFailed {
            attempts: vec![ModelAttempt {
                model: "m".into(),
                reason: "boom".into(),
            }],
        });
        assert!(!generation.is_client_error());
        assert!(generation.to_string().contains("m: boom"));
    }
}
