use futures::stream::{self, StreamExt};

use crate::dto::generation::{ChapterContentRequest, GeneratedSection};
use crate::error::{AppError, AppResult};
use crate::models::course::Video;
use crate::services::{
    duration::DurationBucket, generative::GenerativeClient, prompts, video::VideoLookup,
};
use crate::utils::json::decode_generated;

/// Content produced for one chapter. Never an error: failures are folded
/// into empty content plus a warning.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnrichedChapter {
    pub sections: Vec<GeneratedSection>,
    pub video: Video,
    pub warnings: Vec<String>,
}

pub struct ChapterEnricher;

impl ChapterEnricher {
    /// Sections, then a video. A failed sections call fails the attempt; a
    /// missing or failed video only adds a warning.
    pub async fn try_enrich(
        generator: &dyn GenerativeClient,
        videos: &dyn VideoLookup,
        request: &ChapterContentRequest,
    ) -> AppResult<EnrichedChapter> {
        let text = generator.generate(&prompts::chapter_sections(request)).await?;
        let sections: Vec<GeneratedSection> = decode_generated(&text, "chapter sections")?;

        let mut warnings = Vec::new();
        let bucket = DurationBucket::from_duration_text(&request.duration);
        let video = match videos.find_video(&request.chapter_name, bucket).await {
            Ok(Some(video)) => video,
            Ok(None) => {
                tracing::warn!(chapter = %request.chapter_name, %bucket, "No video found for chapter");
                warnings.push(format!("No video found for chapter '{}'", request.chapter_name));
                Video::default()
            }
            Err(e) => {
                tracing::warn!(chapter = %request.chapter_name, %bucket, "Video lookup failed: {}", e);
                warnings.push(format!(
                    "Video lookup failed for chapter '{}': {}",
                    request.chapter_name, e
                ));
                Video::default()
            }
        };

        Ok(EnrichedChapter {
            sections,
            video,
            warnings,
        })
    }

    /// `try_enrich` with the failure folded into empty content.
    pub async fn enrich(
        generator: &dyn GenerativeClient,
        videos: &dyn VideoLookup,
        request: &ChapterContentRequest,
    ) -> EnrichedChapter {
        match Self::try_enrich(generator, videos, request).await {
            Ok(chapter) => chapter,
            Err(e) => Self::degraded(&request.chapter_name, &e),
        }
    }

    /// Enrich every chapter with at most `concurrency` in flight. Output
    /// order matches `requests`.
    pub async fn enrich_all(
        generator: &dyn GenerativeClient,
        videos: &dyn VideoLookup,
        requests: &[ChapterContentRequest],
        concurrency: usize,
    ) -> Vec<EnrichedChapter> {
        let results: Vec<AppResult<EnrichedChapter>> = stream::iter(requests.iter().cloned())
            .map(|request| async move { Self::try_enrich(generator, videos, &request).await })
            .buffered(concurrency.max(1))
            .collect()
            .await;

        results
            .into_iter()
            .zip(requests)
            .map(|(result, request)| match result {
                Ok(chapter) => chapter,
                Err(e) => Self::degraded(&request.chapter_name, &e),
            })
            .collect()
    }

    fn degraded(chapter_name: &str, error: &AppError) -> EnrichedChapter {
        tracing::warn!(chapter = %chapter_name, "Chapter content generation failed, keeping the chapter empty: {}", error);
        EnrichedChapter {
            sections: Vec::new(),
            video: Video::default(),
            warnings: vec![format!(
                "Content generation failed for chapter '{}': {}",
                chapter_name, error
            )],
        }
    }
}
