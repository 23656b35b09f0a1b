use thiserror::Error;

/// The only failure text the user ever sees.
pub const FAILURE_REASON: &str = "Failed to optimize strategy";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("no {kind} '{key}' in the catalog")]
pub struct NotFoundError {
    pub kind: &'static str,
    pub key: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OptimizeError {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("optimizer returned HTTP {status}: {body}")]
    Backend { status: u16, body: String },

    #[error("malformed optimizer response: {0}")]
    MalformedResponse(String),
}

impl OptimizeError {
    pub fn kind(&self) -> &'static str {
        match self {
            OptimizeError::NotFound(_) => "not_found",
            OptimizeError::Transport(_) => "transport",
            OptimizeError::Backend { .. } => "backend",
            OptimizeError::MalformedResponse(_) => "malformed_response",
        }
    }

    pub fn user_message(&self) -> &'static str {
        FAILURE_REASON
    }
}
