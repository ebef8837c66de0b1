use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::dto::format_datetime;
use crate::models::flashcard::Flashcard;
use crate::models::notes::{CourseNotes, Notes};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NotesResponse {
    pub course_name: String,
    pub skills: Vec<String>,
    pub chapters: Vec<ChapterNotesResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ChapterNotesResponse {
    pub chapter_name: String,
    pub notes: NoteBodyResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NoteBodyResponse {
    pub explanation: String,
    pub code_example: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct FlashcardDeckResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub course: String,
    pub cards: Vec<CardResponse>,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub struct CardResponse {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlashcardResponse {
    pub message: String,
    pub flashcards: FlashcardDeckResponse,
}

impl From<&CourseNotes> for NotesResponse {
    fn from(notes: &CourseNotes) -> Self {
        Self {
            course_name: notes.course_name.clone(),
            skills: notes.skills.clone(),
            chapters: notes
                .chapters
                .iter()
                .map(|c| ChapterNotesResponse {
                    chapter_name: c.chapter_name.clone(),
                    notes: NoteBodyResponse {
                        explanation: c.notes.explanation.clone(),
                        code_example: c.notes.code_example.clone(),
                    },
                })
                .collect(),
        }
    }
}

impl From<&Notes> for NotesResponse {
    fn from(notes: &Notes) -> Self {
        Self::from(&notes.notes)
    }
}

impl From<&Flashcard> for FlashcardDeckResponse {
    fn from(deck: &Flashcard) -> Self {
        Self {
            id: deck.id.map(|id| id.to_hex()).unwrap_or_default(),
            course: deck.course.to_hex(),
            cards: deck
                .cards
                .iter()
                .map(|c| CardResponse {
                    front: c.front.clone(),
                    back: c.back.clone(),
                })
                .collect(),
            created_at: format_datetime(deck.created_at),
        }
    }
}
