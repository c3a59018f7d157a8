use std::future::Future;

use log::{debug, warn};
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

use crate::error::TranscriptError;
use crate::{Segment, Strategy, Transcript};

const CAUSE_MARKER: &str = "This is most likely caused by:";

/// One timed snippet as reported by a transcript library
#[derive(Debug, Clone, PartialEq)]
pub struct Snippet {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

/// What a transcript library hands back for one fetch
#[derive(Debug, Clone, PartialEq)]
pub struct LibraryTranscript {
    pub language: String,
    pub snippets: Vec<Snippet>,
}

/// Fetch-by-id capability of an external transcript library.
///
/// Implementations translate their own failures into [`TranscriptError`].
pub trait TranscriptLibrary {
    fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> impl Future<Output = Result<LibraryTranscript, TranscriptError>>;
}

/// Adapter over `yt_transcript_rs`
pub struct YtTranscriptApi {
    api: YouTubeTranscriptApi,
}

impl YtTranscriptApi {
    pub fn new() -> Result<Self, TranscriptError> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| TranscriptError::Network(format!("Failed to initialize transcript library: {e}")))?;
        Ok(YtTranscriptApi { api })
    }
}

impl TranscriptLibrary for YtTranscriptApi {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<LibraryTranscript, TranscriptError> {
        let langs: Vec<&str> = languages.iter().map(String::as_str).collect();
        let fetched = self
            .api
            .fetch_transcript(video_id, &langs, false)
            .await
            .map_err(|e| {
                debug!("yt-transcript-rs error: {e}");
                classify_failure(&e)
            })?;

        Ok(LibraryTranscript {
            language: fetched.language_code.clone(),
            snippets: fetched
                .snippets
                .into_iter()
                .map(|s| Snippet {
                    text: s.text,
                    start: s.start,
                    duration: s.duration,
                })
                .collect(),
        })
    }
}

/// Map a `yt_transcript_rs` failure onto the shared error taxonomy
pub fn classify_failure(err: &CouldNotRetrieveTranscript) -> TranscriptError {
    use CouldNotRetrieveTranscriptReason::*;

    let Some(ref reason) = err.reason else {
        return classify_message(&err.to_string());
    };

    let cause = cause_text(err);
    match reason {
        VideoUnavailable | VideoUnplayable { .. } | AgeRestricted | InvalidVideoId => {
            TranscriptError::VideoUnavailable(cause)
        }
        TranscriptsDisabled | NoTranscriptFound { .. } => TranscriptError::NoCaptions(cause),
        _ => TranscriptError::Network(format!("Failed to download transcript: {cause}")),
    }
}

/// First paragraph of the library's explanation, without its generic header
fn cause_text(err: &CouldNotRetrieveTranscript) -> String {
    let full = err.to_string();
    let cause = full
        .split_once(CAUSE_MARKER)
        .map(|(_, rest)| rest.trim())
        .unwrap_or(full.as_str());
    cause.split("\n\n").next().unwrap_or(cause).trim().to_string()
}

/// Keyword classification for failures that carry no structured reason
pub fn classify_message(message: &str) -> TranscriptError {
    let lower = message.to_lowercase();
    let message = message.trim().to_string();
    if lower.contains("video") && (lower.contains("private") || lower.contains("deleted")) {
        TranscriptError::VideoUnavailable(message)
    } else if lower.contains("disable") || lower.contains("unavailable") || lower.contains("no transcript") {
        TranscriptError::NoCaptions(message)
    } else {
        TranscriptError::Network(format!("Failed to download transcript: {message}"))
    }
}

/// Normalize a library transcript into the scraping path's shape
pub fn normalize(video_id: &str, fetched: LibraryTranscript) -> Result<Transcript, TranscriptError> {
    if fetched.snippets.is_empty() {
        return Err(TranscriptError::NoTranscriptText);
    }
    Ok(Transcript {
        video_id: video_id.to_string(),
        language: fetched.language,
        strategy: Strategy::Library,
        segments: fetched
            .snippets
            .into_iter()
            .map(|s| Segment {
                text: s.text,
                start: Some(s.start),
                duration: Some(s.duration),
            })
            .collect(),
    })
}

/// Fetch through `library` and fold its outcome into our types
pub async fn fetch_via<L: TranscriptLibrary>(
    library: &L,
    video_id: &str,
    languages: &[String],
) -> Result<Transcript, TranscriptError> {
    debug!("Fetching {video_id} via transcript library, languages={languages:?}");
    match library.fetch(video_id, languages).await {
        Ok(fetched) => normalize(video_id, fetched),
        Err(e) => {
            warn!("Transcript library failed for {video_id}: [{}] {e}", e.kind());
            Err(e)
        }
    }
}
