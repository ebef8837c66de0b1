use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// A course never holds more than this many chapters.
pub const MAX_CHAPTERS: usize = 5;

/// Course document (aggregate root). Chapters and sections are embedded and
/// have no existence outside it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub course_name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub level: CourseLevel,
    #[serde(default)]
    pub course_outcomes: Vec<String>,
    pub duration: String,
    pub no_of_chapters: u32,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub certificate: Option<String>,
    #[serde(default)]
    pub passed_final: bool,
    /// True for copies produced on assignment, false for originals.
    #[serde(default)]
    pub assigned_copy: bool,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
pub enum CourseLevel {
    #[serde(alias = "basic", alias = "BASIC")]
    Basic,
    #[serde(alias = "intermediate", alias = "INTERMEDIATE")]
    Intermediate,
    #[serde(alias = "advanced", alias = "ADVANCED")]
    Advanced,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub chapter_name: String,
    pub about: String,
    pub duration: String,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default)]
    pub video: Video,
    #[serde(default)]
    pub ppt: Ppt,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub title: String,
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_example: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Video {
    pub url: Option<String>,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Ppt {
    pub title: Option<String>,
    pub link: Option<String>,
}

impl fmt::Display for CourseLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CourseLevel::Basic => "Basic",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        };
        f.write_str(s)
    }
}

impl Course {
    pub fn new(
        course_name: String,
        description: String,
        skills: Vec<String>,
        level: CourseLevel,
        course_outcomes: Vec<String>,
        duration: String,
        chapters: Vec<Chapter>,
    ) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            course_name,
            description,
            skills,
            level,
            course_outcomes,
            duration,
            no_of_chapters: chapters.len() as u32,
            chapters,
            certificate: None,
            passed_final: false,
            assigned_copy: false,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Reject a chapter list longer than `MAX_CHAPTERS`.
    pub fn validate_chapter_count(count: usize) -> AppResult<()> {
        if count > MAX_CHAPTERS {
            return Err(AppError::Validation(format!(
                "A course can have a maximum of {} chapters only (got {})",
                MAX_CHAPTERS, count
            )));
        }
        Ok(())
    }

    pub fn validate(&self) -> AppResult<()> {
        Self::validate_chapter_count(self.chapters.len())
    }

    /// Build an independent copy for one mentee: same content, fresh
    /// identity, flagged as an assigned copy.
    ///
    /// Chapter and section ids are kept; they are only unique within a course.
    pub fn clone_for_assignment(&self) -> Course {
        let now = DateTime::now();
        Course {
            id: Some(ObjectId::new()),
            assigned_copy: true,
            created_at: Some(now),
            updated_at: Some(now),
            ..self.clone()
        }
    }

    pub fn chapter(&self, chapter_id: &ObjectId) -> Option<&Chapter> {
        self.chapters.iter().find(|c| &c.id == chapter_id)
    }

    pub fn chapter_mut(&mut self, chapter_id: &ObjectId) -> Option<&mut Chapter> {
        self.chapters.iter_mut().find(|c| &c.id == chapter_id)
    }

    /// Advance `updated_at`. The stamp always moves forward, even within
    /// one millisecond, so it can serve as a write guard.
    pub fn touch(&mut self) {
        let now = DateTime::now().timestamp_millis();
        let next = match self.updated_at {
            Some(previous) => now.max(previous.timestamp_millis() + 1),
            None => now,
        };
        self.updated_at = Some(DateTime::from_millis(next));
    }
}

impl Chapter {
    /// A chapter with a fresh identity and no generated content yet.
    pub fn new(chapter_name: String, about: String, duration: String) -> Self {
        Self {
            id: ObjectId::new(),
            chapter_name,
            about,
            duration,
            sections: Vec::new(),
            video: Video::default(),
            ppt: Ppt::default(),
            is_completed: false,
        }
    }

    pub fn section(&self, section_id: &ObjectId) -> Option<&Section> {
        self.sections.iter().find(|s| &s.id == section_id)
    }
}

impl Section {
    pub fn new(title: String, explanation: String, code_example: Option<String>) -> Self {
        Self {
            id: ObjectId::new(),
            title,
            explanation,
            code_example,
        }
    }
}

impl Video {
    pub fn new(url: String, thumbnail: String) -> Self {
        Self {
            url: Some(url),
            thumbnail: Some(thumbnail),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_none() && self.thumbnail.is_none()
    }
}
