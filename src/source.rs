use std::future::Future;

use log::{debug, info, warn};

use crate::config::ExtractorConfig;
use crate::decoder;
use crate::error::TranscriptError;
use crate::fetch::PageFetcher;
use crate::library::{self, TranscriptLibrary, YtTranscriptApi};
use crate::locator::{self, TrackSelection};
use crate::{Strategy, Transcript, TranscriptResult};

/// Anything that can turn a video ID into a transcript
pub trait TranscriptSource {
    fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> impl Future<Output = Result<Transcript, TranscriptError>>;
}

/// Watch page -> caption track -> caption payload
pub struct ScrapeSource {
    fetcher: PageFetcher,
    selection: TrackSelection,
}

impl ScrapeSource {
    pub fn new(fetcher: PageFetcher, selection: TrackSelection) -> Self {
        ScrapeSource { fetcher, selection }
    }
}

impl TranscriptSource for ScrapeSource {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript, TranscriptError> {
        let html = self.fetcher.fetch_watch_page(video_id).await?;
        let tracks = locator::extract_tracks(&html)?;
        let track = locator::select_track(&tracks, self.selection, languages)?;
        info!(
            "Using caption track: lang={} name={}",
            track.language_code, track.display_name
        );

        let segments = decoder::fetch_segments(&self.fetcher, &track.base_url).await?;
        Ok(Transcript {
            video_id: video_id.to_string(),
            language: track.language_code.clone(),
            strategy: Strategy::Scrape,
            segments,
        })
    }
}

/// Delegates the whole lookup to a transcript library
pub struct LibrarySource<L> {
    library: L,
}

impl<L: TranscriptLibrary> LibrarySource<L> {
    pub fn new(library: L) -> Self {
        LibrarySource { library }
    }
}

impl<L: TranscriptLibrary> TranscriptSource for LibrarySource<L> {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript, TranscriptError> {
        library::fetch_via(&self.library, video_id, languages).await
    }
}

/// The configured strategy, chosen at runtime
pub enum Source {
    Scrape(ScrapeSource),
    Library(LibrarySource<YtTranscriptApi>),
}

impl Source {
    pub fn from_config(client: reqwest::Client, config: &ExtractorConfig) -> Result<Self, TranscriptError> {
        debug!("Building {} source", config.strategy);
        Ok(match config.strategy {
            Strategy::Scrape => Source::Scrape(ScrapeSource::new(
                PageFetcher::new(client, config),
                config.track_selection,
            )),
            Strategy::Library => Source::Library(LibrarySource::new(YtTranscriptApi::new()?)),
        })
    }
}

impl TranscriptSource for Source {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<Transcript, TranscriptError> {
        match self {
            Source::Scrape(s) => s.fetch(video_id, languages).await,
            Source::Library(s) => s.fetch(video_id, languages).await,
        }
    }
}

/// Run one extraction and fold every failure into the result
pub async fn extract<S: TranscriptSource>(source: &S, video_id: &str, languages: &[String]) -> TranscriptResult {
    let result = source.fetch(video_id, languages).await;
    match &result {
        Ok(t) => info!(
            "Extracted {} segments for {video_id} (lang={}, via {})",
            t.segments.len(),
            t.language,
            t.strategy
        ),
        Err(e) => warn!("Extraction failed for {video_id}: [{}] {e}", e.kind()),
    }
    result.into()
}

/// Build the configured source and extract `video_id` with it
pub async fn extract_with_config(
    client: reqwest::Client,
    config: &ExtractorConfig,
    video_id: &str,
) -> TranscriptResult {
    match Source::from_config(client, config) {
        Ok(source) => extract(&source, video_id, &config.languages).await,
        Err(e) => Err::<Transcript, _>(e).into(),
    }
}
