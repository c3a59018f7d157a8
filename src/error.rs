use serde::Serialize;
use thiserror::Error;

/// Coarse classification of a failed extraction, stable across strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    NetworkError,
    ConfigNotFoundError,
    NoCaptionsError,
    NoMatchingLanguageError,
    NoTranscriptTextError,
    VideoUnavailableError,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::NetworkError => "NetworkError",
            ErrorKind::ConfigNotFoundError => "ConfigNotFoundError",
            ErrorKind::NoCaptionsError => "NoCaptionsError",
            ErrorKind::NoMatchingLanguageError => "NoMatchingLanguageError",
            ErrorKind::NoTranscriptTextError => "NoTranscriptTextError",
            ErrorKind::VideoUnavailableError => "VideoUnavailableError",
        };
        write!(f, "{name}")
    }
}

#[derive(Debug, Clone, Error)]
pub enum TranscriptError {
    #[error("{0}")]
    Network(String),

    #[error("{0}")]
    ConfigNotFound(String),

    #[error("No transcript available for this video ({0})")]
    NoCaptions(String),

    #[error("no caption track matches languages [{}] (available: [{}])", .requested.join(", "), .available.join(", "))]
    NoMatchingLanguage {
        requested: Vec<String>,
        available: Vec<String>,
    },

    #[error("caption payload contained no transcript text")]
    NoTranscriptText,

    #[error("{0}")]
    VideoUnavailable(String),
}

impl TranscriptError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TranscriptError::Network(_) => ErrorKind::NetworkError,
            TranscriptError::ConfigNotFound(_) => ErrorKind::ConfigNotFoundError,
            TranscriptError::NoCaptions(_) => ErrorKind::NoCaptionsError,
            TranscriptError::NoMatchingLanguage { .. } => ErrorKind::NoMatchingLanguageError,
            TranscriptError::NoTranscriptText => ErrorKind::NoTranscriptTextError,
            TranscriptError::VideoUnavailable(_) => ErrorKind::VideoUnavailableError,
        }
    }

    /// Wrap a transport or status failure for `url`
    pub fn network(url: &str, err: reqwest::Error) -> Self {
        let url = url.split('?').next().unwrap_or(url);
        TranscriptError::Network(format!("request to {url} failed: {err}"))
    }
}
