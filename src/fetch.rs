use log::debug;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};

use crate::config::ExtractorConfig;
use crate::error::TranscriptError;

const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Single-attempt GETs with a desktop-browser header set
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
    user_agent: String,
    accept_language: Option<String>,
    watch_url: String,
}

impl PageFetcher {
    pub fn new(client: reqwest::Client, config: &ExtractorConfig) -> Self {
        PageFetcher {
            client,
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language_header(),
            watch_url: config.watch_url.clone(),
        }
    }

    pub fn watch_url(&self, video_id: &str) -> String {
        format!("{}?v={video_id}", self.watch_url)
    }

    /// Fetch the watch page HTML for `video_id`
    pub async fn fetch_watch_page(&self, video_id: &str) -> Result<String, TranscriptError> {
        let url = self.watch_url(video_id);
        debug!("Fetching watch page: {url}");
        self.get(&url, Some(ACCEPT_HTML)).await
    }

    /// Fetch any URL as text with the same headers
    pub async fn fetch_text(&self, url: &str) -> Result<String, TranscriptError> {
        self.get(url, None).await
    }

    async fn get(&self, url: &str, accept: Option<&str>) -> Result<String, TranscriptError> {
        let mut request = self.client.get(url).header(USER_AGENT, &self.user_agent);
        if let Some(accept) = accept {
            request = request.header(ACCEPT, accept);
        }
        if let Some(ref lang) = self.accept_language {
            request = request.header(ACCEPT_LANGUAGE, lang);
        }

        let body = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| TranscriptError::network(url, e))?
            .text()
            .await
            .map_err(|e| TranscriptError::network(url, e))?;

        debug!("Fetched {} bytes from {}", body.len(), url.split('?').next().unwrap_or(url));
        Ok(body)
    }
}
