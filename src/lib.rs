pub mod config;
pub mod decoder;
pub mod error;
pub mod fetch;
pub mod library;
pub mod locator;
pub mod output;
pub mod source;

#[cfg(test)]
pub(crate) mod testserver;

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

pub use error::{ErrorKind, TranscriptError};

/// A single caption segment; timing is in seconds when the source carries it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

impl Segment {
    /// Segment with text only
    pub fn text(text: impl Into<String>) -> Self {
        Segment {
            text: text.into(),
            start: None,
            duration: None,
        }
    }
}

/// How the transcript was obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Scrape the watch page and download the caption track directly
    #[default]
    Scrape,
    /// Delegate to the transcript library
    Library,
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Strategy::Scrape => write!(f, "scrape"),
            Strategy::Library => write!(f, "library"),
        }
    }
}

/// Complete transcript for a video
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Transcript {
    pub video_id: String,
    pub language: String,
    pub strategy: Strategy,
    pub segments: Vec<Segment>,
}

impl Transcript {
    /// Segment texts joined by single spaces, boundaries left untouched
    pub fn full_text(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Outcome of one extraction, handed to the caller as a whole
#[derive(Debug, Clone, PartialEq)]
pub enum TranscriptResult {
    Success(Transcript),
    Failure { kind: ErrorKind, message: String },
}

#[derive(Serialize)]
struct WireResult<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    language: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    segments: Option<&'a [Segment]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    kind: Option<ErrorKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl TranscriptResult {
    pub fn is_success(&self) -> bool {
        matches!(self, TranscriptResult::Success(_))
    }

    /// Serialize as the single-line JSON object consumed by the editor plugin
    pub fn to_json_line(&self) -> String {
        let wire = match self {
            TranscriptResult::Success(t) => WireResult {
                success: true,
                text: Some(t.full_text()),
                language: Some(&t.language),
                segments: Some(&t.segments),
                kind: None,
                error: None,
            },
            TranscriptResult::Failure { kind, message } => WireResult {
                success: false,
                text: None,
                language: None,
                segments: None,
                kind: Some(*kind),
                error: Some(message),
            },
        };
        serde_json::to_string(&wire).unwrap_or_else(|e| {
            format!(r#"{{"success":false,"error":"failed to serialize result: {e}"}}"#)
        })
    }
}

impl From<Result<Transcript, TranscriptError>> for TranscriptResult {
    fn from(result: Result<Transcript, TranscriptError>) -> Self {
        match result {
            Ok(t) => TranscriptResult::Success(t),
            Err(e) => TranscriptResult::Failure {
                kind: e.kind(),
                message: e.to_string(),
            },
        }
    }
}

static VIDEO_ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^([a-zA-Z0-9_-]{11})$",
        r"youtube\.com/watch\?.*v=([a-zA-Z0-9_-]{11})",
        r"youtu\.be/([a-zA-Z0-9_-]{11})",
        r"youtube\.com/(?:embed|shorts)/([a-zA-Z0-9_-]{11})",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Pull the video ID out of a bare ID or any common YouTube URL shape
pub fn extract_video_id(input: &str) -> Option<String> {
    let input = input.trim();
    VIDEO_ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .map(|caps| caps[1].to_string())
}
