use std::sync::LazyLock;

use log::debug;
use regex::Regex;
use serde::Deserialize;

use crate::Segment;
use crate::error::TranscriptError;
use crate::fetch::PageFetcher;

static TEXT_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<text[^>]*>([^<]+)</text>").unwrap());

#[derive(Debug, Deserialize)]
struct Json3Payload {
    #[serde(default)]
    events: Vec<Json3Event>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Json3Event {
    t_start_ms: Option<f64>,
    d_duration_ms: Option<f64>,
    segs: Option<Vec<Json3Seg>>,
}

#[derive(Debug, Deserialize)]
struct Json3Seg {
    utf8: Option<String>,
}

/// Ask the timedtext endpoint for json3 instead of its XML default
pub fn with_json_format(url: &str) -> String {
    let sep = if url.contains('?') { '&' } else { '?' };
    format!("{url}{sep}fmt=json3")
}

/// Download a caption track and decode it into segments
pub async fn fetch_segments(fetcher: &PageFetcher, base_url: &str) -> Result<Vec<Segment>, TranscriptError> {
    let url = with_json_format(base_url);
    debug!("Fetching caption payload");
    let payload = fetcher.fetch_text(&url).await?;
    decode_payload(&payload)
}

/// Decode a caption payload: json3 first, legacy `<text>` markup otherwise
pub fn decode_payload(payload: &str) -> Result<Vec<Segment>, TranscriptError> {
    let segments = match serde_json::from_str::<Json3Payload>(payload) {
        Ok(json) => {
            debug!("Decoded json3 payload with {} events", json.events.len());
            segments_from_json3(json)
        }
        Err(e) => {
            debug!("Payload is not json3 ({e}), scanning for <text> markup");
            segments_from_markup(payload)
        }
    };

    if segments.is_empty() {
        return Err(TranscriptError::NoTranscriptText);
    }
    Ok(segments)
}

fn segments_from_json3(payload: Json3Payload) -> Vec<Segment> {
    let mut segments = Vec::new();
    for event in payload.events {
        let start = event.t_start_ms.map(|ms| ms / 1000.0);
        let duration = event.d_duration_ms.map(|ms| ms / 1000.0);
        for text in event.segs.into_iter().flatten().filter_map(|s| s.utf8) {
            segments.push(Segment { text, start, duration });
        }
    }
    segments
}

fn segments_from_markup(payload: &str) -> Vec<Segment> {
    TEXT_TAG
        .captures_iter(payload)
        .map(|caps| Segment::text(html_escape::decode_html_entities(&caps[1])))
        .collect()
}
