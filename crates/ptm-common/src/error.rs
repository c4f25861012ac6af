//! Error types for PTM zone analysis

use thiserror::Error;

/// Result type alias for PTM operations
pub type Result<T> = std::result::Result<T, PtmError>;

/// Main error type for PTM zone analysis
///
/// The first four variants form the analysis taxonomy: a lookup that found nothing,
/// a source failure worth retrying, a structurally broken input record, and a curve
/// length mismatch between two derived artifacts. The rest cover the ambient concerns
/// (I/O, parameter files, configuration) and pipeline control.
#[derive(Error, Debug)]
pub enum PtmError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transient source error: {0}")]
    TransientSource(String),

    #[error("Invalid protein {accession}: {reason}")]
    InvalidProtein { accession: String, reason: String },

    #[error("Dimension mismatch: expected {expected} positions, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Malformed page: {0}")]
    MalformedPage(String),

    #[error("Run cancelled after {pages} page(s)")]
    Cancelled { pages: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl PtmError {
    /// Create an invalid protein error
    pub fn invalid_protein(accession: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidProtein {
            accession: accession.into(),
            reason: reason.into(),
        }
    }

    /// Create a transient source error
    pub fn transient(msg: impl Into<String>) -> Self {
        Self::TransientSource(msg.into())
    }

    /// Create a not-found error
    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    /// Whether a retry may succeed where this attempt failed.
    ///
    /// Only source failures qualify; a missing record stays missing.
    pub fn is_transient(&self) -> bool {
        matches!(self, PtmError::TransientSource(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PtmError::NotFound(_))
    }
}
