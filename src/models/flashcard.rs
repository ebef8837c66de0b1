use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const MAX_FLASHCARDS: usize = 15;

/// Flashcard deck, one document per course.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Flashcard {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub course: ObjectId,
    pub cards: Vec<Card>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Card {
    pub front: String,
    pub back: String,
}

impl Flashcard {
    pub fn new(course: ObjectId, cards: Vec<Card>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            course,
            cards,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    /// Between one and `MAX_FLASHCARDS` cards.
    pub fn validate_cards(cards: &[Card]) -> AppResult<()> {
        if cards.is_empty() {
            return Err(AppError::GenerationParse(
                "flashcard response contained no cards".to_string(),
            ));
        }
        if cards.len() > MAX_FLASHCARDS {
            return Err(AppError::Validation(format!(
                "Maximum {} flashcards allowed per course (got {})",
                MAX_FLASHCARDS,
                cards.len()
            )));
        }
        Ok(())
    }
}
