use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NoFileSelected,
    ServiceError,
    MalformedResponse,
    SubmissionInFlight,
    FileUnreadable,
}

/// Failures surfaced by the upload flow. The `Display` text is what the user sees.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("Please select a file first.")]
    NoFileSelected,
    #[error("Server error: {0}")]
    ServiceError(String),
    #[error("Unexpected response from server: {0}")]
    MalformedResponse(String),
    #[error("A submission is already in progress.")]
    SubmissionInFlight,
    #[error("Could not read file: {0}")]
    FileUnreadable(String),
}

impl ExtractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoFileSelected => ErrorKind::NoFileSelected,
            Self::ServiceError(_) => ErrorKind::ServiceError,
            Self::MalformedResponse(_) => ErrorKind::MalformedResponse,
            Self::SubmissionInFlight => ErrorKind::SubmissionInFlight,
            Self::FileUnreadable(_) => ErrorKind::FileUnreadable,
        }
    }
}

impl From<reqwest::Error> for ExtractError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::ServiceError(format!("request timed out: {}", e))
        } else if e.is_connect() {
            Self::ServiceError(format!("could not reach server: {}", e))
        } else {
            Self::ServiceError(e.to_string())
        }
    }
}
