use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::TranscriptError;

static PLAYER_RESPONSE_ASSIGNMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ytInitialPlayerResponse\s*=\s*\{").unwrap());

/// Playability states under which YouTube withholds the video entirely
const UNAVAILABLE_STATUSES: &[&str] = &["ERROR", "LOGIN_REQUIRED", "UNPLAYABLE"];

/// One caption stream advertised on the watch page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptionTrack {
    pub language_code: String,
    pub display_name: String,
    pub base_url: String,
}

/// How a track is picked from the advertised list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TrackSelection {
    /// Whatever YouTube lists first
    #[default]
    First,
    /// First track matching the language preferences, tried in order
    Preferred,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerResponse {
    captions: Option<Captions>,
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Captions {
    player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    caption_tracks: Option<Vec<RawTrack>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrack {
    base_url: String,
    #[serde(default)]
    language_code: String,
    name: Option<TrackName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TrackName {
    simple_text: Option<String>,
    #[serde(default)]
    runs: Vec<TextRun>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    #[serde(default)]
    text: String,
}

impl TrackName {
    fn display(&self) -> Option<String> {
        if let Some(ref text) = self.simple_text {
            return Some(text.clone());
        }
        let joined: String = self.runs.iter().map(|r| r.text.as_str()).collect();
        (!joined.is_empty()).then_some(joined)
    }
}

impl From<RawTrack> for CaptionTrack {
    fn from(raw: RawTrack) -> Self {
        CaptionTrack {
            display_name: raw
                .name
                .as_ref()
                .and_then(TrackName::display)
                .unwrap_or_else(|| "Unknown".to_string()),
            language_code: raw.language_code,
            base_url: raw.base_url,
        }
    }
}

/// Slice out the JSON object assigned to `ytInitialPlayerResponse`.
///
/// Scans brace depth from the opening `{`, skipping over string literals
/// (with backslash escapes) so braces and `};` inside strings don't end the
/// object early. Returns `None` if there's no assignment or the object never
/// closes.
pub fn find_player_response(html: &str) -> Option<&str> {
    let m = PLAYER_RESPONSE_ASSIGNMENT.find(html)?;
    let start = m.end() - 1;
    let bytes = html.as_bytes();

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&html[start..=i]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Locate and decode the caption tracks advertised in a watch page
pub fn extract_tracks(html: &str) -> Result<Vec<CaptionTrack>, TranscriptError> {
    let raw = find_player_response(html).ok_or_else(|| {
        TranscriptError::ConfigNotFound("could not find ytInitialPlayerResponse in watch page".to_string())
    })?;
    debug!("Found player response ({} bytes)", raw.len());

    let response: PlayerResponse = serde_json::from_str(raw).map_err(|e| {
        TranscriptError::ConfigNotFound(format!("ytInitialPlayerResponse is not valid JSON: {e}"))
    })?;

    let tracks: Vec<CaptionTrack> = response
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .and_then(|r| r.caption_tracks)
        .unwrap_or_default()
        .into_iter()
        .map(CaptionTrack::from)
        .collect();

    if tracks.is_empty() {
        let unplayable = response
            .playability_status
            .filter(|p| p.status.as_deref().is_some_and(|s| UNAVAILABLE_STATUSES.contains(&s)));
        if let Some(status) = unplayable {
            let code = status.status.unwrap_or_default();
            let reason = status.reason.unwrap_or_else(|| code.clone());
            warn!("Video is not playable: {code} ({reason})");
            return Err(TranscriptError::VideoUnavailable(format!(
                "Video is unavailable or has been deleted: {reason}"
            )));
        }
        return Err(TranscriptError::NoCaptions("captions are disabled or missing".to_string()));
    }

    debug!(
        "Found {} caption tracks: {}",
        tracks.len(),
        tracks.iter().map(|t| t.language_code.as_str()).collect::<Vec<_>>().join(",")
    );
    Ok(tracks)
}

/// Pick one track according to `selection`
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    selection: TrackSelection,
    languages: &[String],
) -> Result<&'a CaptionTrack, TranscriptError> {
    let chosen = match selection {
        TrackSelection::First => tracks.first(),
        TrackSelection::Preferred => languages
            .iter()
            .find_map(|lang| tracks.iter().find(|t| &t.language_code == lang)),
    };

    match chosen {
        Some(track) => Ok(track),
        None if tracks.is_empty() => {
            Err(TranscriptError::NoCaptions("no caption tracks to choose from".to_string()))
        }
        None => Err(TranscriptError::NoMatchingLanguage {
            requested: languages.to_vec(),
            available: tracks.iter().map(|t| t.language_code.clone()).collect(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    fn page(player_response: &str) -> String {
        format!(
            "<html><script>var ytInitialPlayerResponse = {player_response};var meta = {{}};</script></html>"
        )
    }

    fn track(lang: &str) -> CaptionTrack {
        CaptionTrack {
            language_code: lang.to_string(),
            display_name: lang.to_string(),
            base_url: format!("https://example.com/api/timedtext?lang={lang}"),
        }
    }

    #[test]
    fn test_find_player_response_simple() {
        let html = page(r#"{"a":{"b":1}}"#);
        assert_eq!(find_player_response(&html), Some(r#"{"a":{"b":1}}"#));
    }

    #[test]
    fn test_find_player_response_ignores_braces_in_strings() {
        let obj = r#"{"title":"we };\" { love braces }","nested":{"x":"}"}}"#;
        let html = page(obj);
        assert_eq!(find_player_response(&html), Some(obj));
    }

    #[test]
    fn test_find_player_response_without_spaces() {
        let html = r#"<script>window.ytInitialPlayerResponse={"k":[1,2]};</script>"#;
        assert_eq!(find_player_response(html), Some(r#"{"k":[1,2]}"#));
    }

    #[test]
    fn test_find_player_response_unterminated() {
        let html = r#"var ytInitialPlayerResponse = {"a": {"b": 1}"#;
        assert_eq!(find_player_response(html), None);
    }

    #[test]
    fn test_missing_assignment_is_config_not_found() {
        let err = extract_tracks("<html><body>nothing here</body></html>").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigNotFoundError);
    }

    #[test]
    fn test_invalid_json_is_config_not_found() {
        let err = extract_tracks(&page("{not json}")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigNotFoundError);
    }

    #[test]
    fn test_absent_captions_is_no_captions() {
        let err = extract_tracks(&page(r#"{"videoDetails":{"title":"x"}}"#)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCaptionsError);
    }

    #[test]
    fn test_empty_track_list_is_no_captions() {
        let html = page(r#"{"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[]}}}"#);
        let err = extract_tracks(&html).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCaptionsError);
    }

    #[test]
    fn test_unplayable_video_is_unavailable() {
        let html = page(r#"{"playabilityStatus":{"status":"ERROR","reason":"This video is private"}}"#);
        let err = extract_tracks(&html).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::VideoUnavailableError);
        assert!(err.to_string().contains("This video is private"));
    }

    #[test]
    fn test_extract_tracks_in_advertised_order() {
        let html = page(
            r#"{"playabilityStatus":{"status":"OK"},"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[
                {"baseUrl":"https://www.youtube.com/api/timedtext?v=x&lang=en","languageCode":"en","name":{"simpleText":"English"}},
                {"baseUrl":"https://www.youtube.com/api/timedtext?v=x&lang=ko","languageCode":"ko","name":{"runs":[{"text":"Korean "},{"text":"(auto-generated)"}]}},
                {"baseUrl":"https://www.youtube.com/api/timedtext?v=x&lang=ja"}
            ]}}}"#,
        );
        let tracks = extract_tracks(&html).unwrap();
        assert_eq!(tracks.len(), 3);
        assert_eq!(tracks[0].language_code, "en");
        assert_eq!(tracks[0].display_name, "English");
        assert_eq!(tracks[0].base_url, "https://www.youtube.com/api/timedtext?v=x&lang=en");
        assert_eq!(tracks[1].display_name, "Korean (auto-generated)");
        assert_eq!(tracks[2].language_code, "");
        assert_eq!(tracks[2].display_name, "Unknown");
    }

    #[test]
    fn test_select_first_ignores_preferences() {
        let tracks = vec![track("en"), track("ko")];
        let langs = vec!["ko".to_string(), "en".to_string()];
        let chosen = select_track(&tracks, TrackSelection::First, &langs).unwrap();
        assert_eq!(chosen.language_code, "en");
    }

    #[test]
    fn test_select_preferred_follows_preference_order() {
        let tracks = vec![track("en"), track("ko")];
        let langs = vec!["ko".to_string(), "en".to_string()];
        let chosen = select_track(&tracks, TrackSelection::Preferred, &langs).unwrap();
        assert_eq!(chosen.language_code, "ko");
    }

    #[test]
    fn test_select_preferred_without_match() {
        let tracks = vec![track("en"), track("de")];
        let langs = vec!["ko".to_string(), "ja".to_string()];
        let err = select_track(&tracks, TrackSelection::Preferred, &langs).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoMatchingLanguageError);
        match err {
            TranscriptError::NoMatchingLanguage { requested, available } => {
                assert_eq!(requested, vec!["ko", "ja"]);
                assert_eq!(available, vec!["en", "de"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_select_from_empty_list() {
        let err = select_track(&[], TrackSelection::First, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NoCaptionsError);
    }
}
