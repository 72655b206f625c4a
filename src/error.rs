use thiserror::Error;

/// Everything that can go wrong while analysing a single profile.
///
/// Each pipeline stage fails with its own kind so the caller can tell an
/// unreachable page apart from a page whose markup changed.
#[derive(Debug, Error)]
pub enum CommitdayError {
    #[error("Failed to fetch {url}: {reason}")]
    Network {
        url: String,
        status: Option<u16>,
        reason: String,
    },

    #[error("No contribution calendar found on {url}")]
    MissingWidget { url: String },

    #[error("Malformed calendar cell: {0}")]
    Parse(String),

    #[error("{0}")]
    Validation(String),

    #[error("Text generation failed: {0}")]
    Generation(String),
}

impl CommitdayError {
    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            CommitdayError::Network { .. } => "network",
            CommitdayError::MissingWidget { .. } => "missing_widget",
            CommitdayError::Parse(_) => "parse",
            CommitdayError::Validation(_) => "validation",
            CommitdayError::Generation(_) => "generation",
        }
    }

    /// True when the failure was caused by the caller's input rather than an
    /// upstream service.
    pub fn is_user_error(&self) -> bool {
        matches!(self, CommitdayError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, CommitdayError>;
