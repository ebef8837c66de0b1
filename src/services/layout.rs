use crate::dto::generation::{CourseLayout, GenerateLayoutRequest};
use crate::error::{AppError, AppResult};
use crate::models::course::MAX_CHAPTERS;
use crate::services::{generative::GenerativeClient, prompts};
use crate::utils::json::decode_generated;

pub struct LayoutGenerator;

impl LayoutGenerator {
    /// Check the request before anything is sent to the generative service.
    pub fn validate(request: &GenerateLayoutRequest) -> AppResult<()> {
        if request.topic.trim().is_empty() {
            return Err(AppError::Validation("topic is required".to_string()));
        }
        if request.skills.iter().all(|s| s.trim().is_empty()) {
            return Err(AppError::Validation("at least one skill is required".to_string()));
        }
        if request.duration.trim().is_empty() {
            return Err(AppError::Validation("duration is required".to_string()));
        }
        if request.chapter_count == 0 || request.chapter_count as usize > MAX_CHAPTERS {
            return Err(AppError::Validation(format!(
                "chapter count must be between 1 and {} (got {})",
                MAX_CHAPTERS, request.chapter_count
            )));
        }
        Ok(())
    }

    /// One generative call producing the course skeleton. Service and parse
    /// failures are returned as-is; there is no retry.
    pub async fn generate(
        generator: &dyn GenerativeClient,
        request: &GenerateLayoutRequest,
    ) -> AppResult<CourseLayout> {
        Self::validate(request)?;

        tracing::info!(
            topic = %request.topic,
            chapters = request.chapter_count,
            "Generating course layout"
        );

        let text = generator.generate(&prompts::course_layout(request)).await?;
        let layout: CourseLayout = decode_generated(&text, "course layout")?;

        if layout.chapters.is_empty() {
            return Err(AppError::GenerationParse(
                "course layout has no chapters".to_string(),
            ));
        }
        if layout.chapters.len() != request.chapter_count as usize {
            tracing::warn!(
                requested = request.chapter_count,
                generated = layout.chapters.len(),
                "Generated layout chapter count differs from the request"
            );
        }

        Ok(layout)
    }
}
