use std::path::{Path, PathBuf};

use eyre::Result;
use log::debug;

use crate::Transcript;

/// Render transcript as plain text (segments joined by single spaces)
pub fn render_text(transcript: &Transcript) -> String {
    transcript.full_text()
}

/// Render the segment list as pretty-printed JSON
pub fn render_json(transcript: &Transcript) -> Result<String> {
    Ok(serde_json::to_string_pretty(&transcript.segments)?)
}

/// Paths written by [`save`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedFiles {
    pub text: PathBuf,
    pub json: PathBuf,
}

/// Write `transcript_<id>.txt` and `transcript_<id>.json` into `dir`
pub fn save(transcript: &Transcript, dir: &Path) -> Result<SavedFiles> {
    std::fs::create_dir_all(dir)?;

    let text = dir.join(format!("transcript_{}.txt", transcript.video_id));
    std::fs::write(&text, render_text(transcript))?;
    debug!("Wrote transcript text: {}", text.display());

    let json = dir.join(format!("transcript_{}.json", transcript.video_id));
    std::fs::write(&json, render_json(transcript)?)?;
    debug!("Wrote transcript segments: {}", json.display());

    Ok(SavedFiles { text, json })
}
