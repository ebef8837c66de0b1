use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::utils::json::null_as_empty;

/// Generated study notes, one document per course.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Notes {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    /// Unique key: at most one notes document per course.
    pub course: ObjectId,
    pub notes: CourseNotes,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// Notes body, also the shape the generator is asked to produce.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseNotes {
    #[serde(default)]
    pub course_name: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub chapters: Vec<ChapterNotes>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNotes {
    pub chapter_name: String,
    pub notes: NoteBody,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteBody {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub explanation: String,
    #[serde(default)]
    pub code_example: Option<String>,
}

impl Notes {
    pub fn new(course: ObjectId, notes: CourseNotes) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            course,
            notes,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl CourseNotes {
    /// Minimum shape: a course name and at least one chapter.
    /// A chapter without an explanation breaks the notes invariant.
    pub fn validate(&self) -> AppResult<()> {
        if self.course_name.trim().is_empty() {
            return Err(AppError::GenerationParse(
                "notes response is missing courseName".to_string(),
            ));
        }
        if self.chapters.is_empty() {
            return Err(AppError::GenerationParse(
                "notes response has no chapters".to_string(),
            ));
        }
        if let Some(chapter) = self
            .chapters
            .iter()
            .find(|c| c.notes.explanation.trim().is_empty())
        {
            return Err(AppError::Validation(format!(
                "notes for chapter '{}' have no explanation",
                chapter.chapter_name
            )));
        }
        Ok(())
    }
}
