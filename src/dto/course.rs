use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::format_datetime;
use crate::models::course::{Chapter, Course, CourseLevel, Ppt, Section, Video};
use crate::utils::json::{optional_string_or_number, string_or_number};

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub course_name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub level: CourseLevel,
    #[serde(default)]
    pub course_outcomes: Vec<String>,
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(default)]
    pub chapters: Vec<CreateChapterRequest>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateChapterRequest {
    pub chapter_name: String,
    pub about: String,
    #[serde(deserialize_with = "string_or_number")]
    pub duration: String,
    #[serde(default)]
    pub sections: Vec<SectionPayload>,
    #[serde(default)]
    pub video: Option<VideoPayload>,
    #[serde(default)]
    pub ppt: Option<PptPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionPayload {
    /// Existing section id; absent or malformed ids get a fresh one.
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    pub title: String,
    pub explanation: String,
    #[serde(default)]
    pub code_example: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VideoPayload {
    pub url: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PptPayload {
    pub title: Option<String>,
    pub link: Option<String>,
}

// ---------------------------------------------------------------------------
// Layout updates
// ---------------------------------------------------------------------------

/// Course-level edit. Chapters carrying an id update that chapter in place;
/// chapters without one are appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseLayoutRequest {
    pub course_name: Option<String>,
    pub description: Option<String>,
    pub level: Option<CourseLevel>,
    pub course_outcomes: Option<Vec<String>>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub duration: Option<String>,
    #[serde(default)]
    pub chapters: Vec<ChapterLayoutPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapterLayoutPayload {
    #[serde(rename = "_id", alias = "id", default)]
    pub id: Option<String>,
    pub chapter_name: String,
    #[serde(default)]
    pub about: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub duration: String,
}

/// Single-chapter edit: details, sections, and optional media patches.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateChapterLayoutRequest {
    pub chapter_name: Option<String>,
    pub about: Option<String>,
    #[serde(default, deserialize_with = "optional_string_or_number")]
    pub duration: Option<String>,
    #[serde(default)]
    pub sections: Vec<SectionPayload>,
    pub video: Option<VideoPayload>,
    pub ppt: Option<PptPayload>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteChapterRequest {
    #[serde(default = "default_true")]
    pub is_completed: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub level: CourseLevel,
    pub course_outcomes: Vec<String>,
    pub duration: String,
    pub no_of_chapters: u32,
    pub chapters: Vec<ChapterResponse>,
    pub certificate: Option<String>,
    pub passed_final: bool,
    pub assigned_copy: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChapterResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub chapter_name: String,
    pub about: String,
    pub duration: String,
    pub sections: Vec<SectionResponse>,
    pub video: VideoResponse,
    pub ppt: PptResponse,
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub explanation: String,
    pub code_example: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct VideoResponse {
    pub url: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PptResponse {
    pub title: Option<String>,
    pub link: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseCreatedResponse {
    pub message: String,
    pub course: CourseResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ChapterUpdatedResponse {
    pub message: String,
    pub chapter: ChapterResponse,
}

impl From<&Course> for CourseResponse {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.map(|id| id.to_hex()).unwrap_or_default(),
            course_name: course.course_name.clone(),
            description: course.description.clone(),
            skills: course.skills.clone(),
            level: course.level,
            course_outcomes: course.course_outcomes.clone(),
            duration: course.duration.clone(),
            no_of_chapters: course.no_of_chapters,
            chapters: course.chapters.iter().map(ChapterResponse::from).collect(),
            certificate: course.certificate.clone(),
            passed_final: course.passed_final,
            assigned_copy: course.assigned_copy,
            created_at: format_datetime(course.created_at),
            updated_at: format_datetime(course.updated_at),
        }
    }
}

impl From<&Chapter> for ChapterResponse {
    fn from(chapter: &Chapter) -> Self {
        Self {
            id: chapter.id.to_hex(),
            chapter_name: chapter.chapter_name.clone(),
            about: chapter.about.clone(),
            duration: chapter.duration.clone(),
            sections: chapter.sections.iter().map(SectionResponse::from).collect(),
            video: VideoResponse::from(&chapter.video),
            ppt: PptResponse {
                title: chapter.ppt.title.clone(),
                link: chapter.ppt.link.clone(),
            },
            is_completed: chapter.is_completed,
        }
    }
}

impl From<&Section> for SectionResponse {
    fn from(section: &Section) -> Self {
        Self {
            id: section.id.to_hex(),
            title: section.title.clone(),
            explanation: section.explanation.clone(),
            code_example: section.code_example.clone(),
        }
    }
}

impl From<&Video> for VideoResponse {
    fn from(video: &Video) -> Self {
        Self {
            url: video.url.clone(),
            thumbnail: video.thumbnail.clone(),
        }
    }
}

impl From<VideoPayload> for Video {
    fn from(payload: VideoPayload) -> Self {
        Self {
            url: payload.url,
            thumbnail: payload.thumbnail,
        }
    }
}

impl From<PptPayload> for Ppt {
    fn from(payload: PptPayload) -> Self {
        Self {
            title: payload.title,
            link: payload.link,
        }
    }
}
