use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::VideoConfig;
use crate::error::{AppError, AppResult};
use crate::models::course::Video;
use crate::services::duration::DurationBucket;

/// Video lookup service: best match for a query within a length bucket.
#[async_trait]
pub trait VideoLookup: Send + Sync {
    /// `Ok(None)` means the search ran and found nothing.
    async fn find_video(&self, query: &str, bucket: DurationBucket) -> AppResult<Option<Video>>;
}

/// YouTube Data API v3 search client.
#[derive(Clone)]
pub struct YouTubeClient {
    client: Client,
    config: VideoConfig,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: Option<Snippet>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl YouTubeClient {
    pub fn new(config: VideoConfig) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::GenerationService(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }
}

impl SearchResponse {
    fn into_video(self) -> Option<Video> {
        let item = self.items.into_iter().next()?;
        let video_id = item.id.video_id?;
        let thumbnail = item
            .snippet
            .and_then(|s| s.thumbnails)
            .and_then(|t| t.high.or(t.default))
            .map(|t| t.url)
            .unwrap_or_default();

        Some(Video::new(
            format!("https://www.youtube.com/watch?v={}", video_id),
            thumbnail,
        ))
    }
}

#[async_trait]
impl VideoLookup for YouTubeClient {
    async fn find_video(&self, query: &str, bucket: DurationBucket) -> AppResult<Option<Video>> {
        let url = format!("{}/search", self.config.api_base.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("key", self.config.api_key.as_str()),
                ("part", "snippet"),
                ("q", query),
                ("type", "video"),
                ("videoDuration", bucket.as_str()),
                ("maxResults", "1"),
            ])
            .send()
            .await
            .map_err(|e| AppError::GenerationService(format!("video lookup failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(AppError::GenerationService(format!(
                "video lookup returned {}",
                status
            )));
        }

        let result: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::GenerationParse(format!("video search response: {}", e)))?;

        Ok(result.into_video())
    }
}
