use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::course::{CourseResponse, VideoResponse};
use crate::models::course::CourseLevel;
use crate::utils::json::{null_as_empty, string_or_number};

/// Input to the layout generator.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateLayoutRequest {
    pub topic: String,
    pub skills: Vec<String>,
    pub difficulty: CourseLevel,
    /// Total course duration in hours.
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(alias = "noOfChp")]
    pub chapter_count: u32,
}

/// Course skeleton as produced by the generative service.
///
/// Field names follow the schema the service is prompted with.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseLayout {
    #[serde(rename = "Course Name")]
    pub course_name: String,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Skills", default)]
    pub skills: Vec<String>,
    #[serde(rename = "Level")]
    pub level: CourseLevel,
    #[serde(rename = "Duration", deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(rename = "NoOfChapters", default)]
    pub no_of_chapters: u32,
    #[serde(rename = "Course Outcomes", default)]
    pub course_outcomes: Vec<String>,
    #[serde(rename = "Chapters")]
    pub chapters: Vec<LayoutChapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LayoutChapter {
    #[serde(rename = "Chapter Name")]
    pub chapter_name: String,
    #[serde(rename = "About")]
    pub about: String,
    /// Target length in minutes, e.g. `"15 minutes"`.
    #[serde(rename = "Duration", deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(rename = "Content", default)]
    pub content: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseLayoutResponse {
    pub course_layout: CourseLayout,
}

/// One chapter stub to enrich.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContentRequest {
    pub chapter_name: String,
    #[serde(default)]
    pub about: String,
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    /// Topics the chapter covers.
    #[serde(default, alias = "topics")]
    pub content: Vec<String>,
    pub difficulty: CourseLevel,
}

/// Section as produced by the generative service.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSection {
    pub title: String,
    pub explanation: String,
    /// Empty when the topic is not code related.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub code_example: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapterContentResponse {
    pub sections: Vec<GeneratedSection>,
    pub video: VideoResponse,
    /// Degradations that did not fail the request.
    pub warnings: Vec<String>,
}

/// Result of the full generate → enrich → persist pipeline.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BuildCourseResponse {
    pub message: String,
    pub course: CourseResponse,
    pub warnings: Vec<String>,
}

impl ChapterContentRequest {
    pub fn from_layout(chapter: &LayoutChapter, difficulty: CourseLevel) -> Self {
        Self {
            chapter_name: chapter.chapter_name.clone(),
            about: chapter.about.clone(),
            duration: chapter.duration.clone(),
            content: chapter.content.clone(),
            difficulty,
        }
    }
}
