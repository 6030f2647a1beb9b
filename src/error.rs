//! Error taxonomy for the retrieval-and-synthesis engine.
//!
//! Structural invariant violations (bad chunk input, missing or corrupt
//! index artifacts, embedding failures) are hard errors. The heuristic
//! stages never produce an [`EngineError`]: a missed pattern degrades to
//! an empty or default result instead.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by the index, the embedding collaborators, and the
/// orchestrator.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Malformed or empty chunk input, or a vector dimension mismatch.
    #[error("schema error: {0}")]
    Schema(String),

    /// A persisted index artifact is missing.
    #[error("index artifact not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The persisted artifacts disagree with each other.
    #[error("corrupt index at {}: {reason}", path.display())]
    Corrupt { path: PathBuf, reason: String },

    /// The embedding model failed. Never retried by the core.
    #[error("embedding call failed ({provider}): {message}")]
    ExternalCall { provider: String, message: String },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error at {}: {source}", path.display())]
    Serialization {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl EngineError {
    pub fn schema(message: impl Into<String>) -> Self {
        EngineError::Schema(message.into())
    }

    pub fn corrupt(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        EngineError::Corrupt {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn external(provider: impl Into<String>, message: impl std::fmt::Display) -> Self {
        EngineError::ExternalCall {
            provider: provider.into(),
            message: message.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        EngineError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
