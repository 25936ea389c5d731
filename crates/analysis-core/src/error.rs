use std::path::PathBuf;

use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str =
    "Cannot reach the analysis service. Make sure it is running.";
pub const GENERIC_SERVICE_MESSAGE: &str = "Something went wrong.";

/// Local input problems. Never leave the client.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter some text to analyse.")]
    EmptyText,
    #[error("Please select a .txt or .pdf file.")]
    MissingFile,
}

/// Everything that can end a submission attempt without a stored result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("The analysis engine is offline. Start the service and try again.")]
    Unavailable,
    /// `detail` goes to the log; users only see the generic message.
    #[error("{}", CONNECTIVITY_MESSAGE)]
    Transport { detail: String },
    /// Message reported by the service, shown verbatim.
    #[error("{0}")]
    Service(String),
}

impl SubmitError {
    pub fn transport(detail: impl Into<String>) -> Self {
        SubmitError::Transport {
            detail: detail.into(),
        }
    }

    /// Validation and availability failures are decided before any request.
    pub fn is_local(&self) -> bool {
        matches!(self, SubmitError::Validation(_) | SubmitError::Unavailable)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            SubmitError::Validation(_) => "validation",
            SubmitError::Unavailable => "unavailable",
            SubmitError::Transport { .. } => "transport",
            SubmitError::Service(_) => "service",
        }
    }
}

/// Health probe failures. All of them mean "unavailable".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("health request failed: {0}")]
    Transport(String),
    #[error("health endpoint returned status {0}")]
    Status(u16),
    #[error("health response is malformed: {0}")]
    Decode(String),
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("unsupported file {name}: only .txt and .pdf are accepted")]
    UnsupportedFile { name: String },
    #[error("failed to read {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("no analysis result to export")]
    NothingToExport,
    #[error("summary is empty")]
    EmptySummary,
    #[error("failed to write {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_messages_are_user_facing() {
        let err: SubmitError = ValidationError::EmptyText.into();
        assert_eq!(err.to_string(), "Please enter some text to analyse.");
        assert!(err.is_local());
    }

    #[test]
    fn transport_hides_detail() {
        let err = SubmitError::transport("connection refused (os error 111)");
        assert_eq!(err.to_string(), CONNECTIVITY_MESSAGE);
        assert_eq!(err.kind(), "transport");
        assert!(!err.is_local());
    }

    #[test]
    fn service_message_is_verbatim() {
        assert_eq!(SubmitError::Service("too long".into()).to_string(), "too long");
    }
}
