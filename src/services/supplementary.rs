use mongodb::bson::oid::ObjectId;

use crate::error::{AppError, AppResult};
use crate::models::{
    flashcard::{Card, Flashcard},
    notes::{CourseNotes, Notes},
};
use crate::services::{
    course::CourseService, generative::GenerativeClient, prompts, repository::Repository,
};
use crate::utils::json::decode_generated;

/// Notes and flashcards: generated once per course, then served as stored.
pub struct SupplementaryService;

impl SupplementaryService {
    /// Stored notes for the course, generating and storing them on first use.
    /// Stored notes are served even after the course itself is gone.
    pub async fn notes_for_course(
        repo: &dyn Repository,
        generator: &dyn GenerativeClient,
        course_id: &ObjectId,
    ) -> AppResult<Notes> {
        if let Some(existing) = repo.find_notes(course_id).await? {
            tracing::debug!(course_id = %course_id, "Serving stored notes");
            return Ok(existing);
        }

        let course = CourseService::load_course(repo, course_id).await?;

        let text = generator.generate(&prompts::course_notes(&course)).await?;
        let notes: CourseNotes = decode_generated(&text, "course notes")?;
        notes.validate()?;

        let stored = repo
            .insert_notes_if_absent(&Notes::new(*course_id, notes))
            .await?;
        tracing::info!(course_id = %course_id, chapters = stored.notes.chapters.len(), "Stored generated notes");
        Ok(stored)
    }

    /// Stored flashcards for the course, generating and storing them on first use.
    pub async fn flashcards_for_course(
        repo: &dyn Repository,
        generator: &dyn GenerativeClient,
        course_id: &ObjectId,
    ) -> AppResult<Flashcard> {
        if let Some(existing) = repo.find_flashcards(course_id).await? {
            tracing::debug!(course_id = %course_id, "Serving stored flashcards");
            return Ok(existing);
        }

        let course = CourseService::load_course(repo, course_id).await?;

        let text = generator
            .generate(&prompts::flashcards(&course.course_name))
            .await?;
        let cards: Vec<Card> = decode_generated(&text, "flashcards")?;
        Flashcard::validate_cards(&cards)?;

        let stored = repo
            .insert_flashcards_if_absent(&Flashcard::new(*course_id, cards))
            .await?;
        tracing::info!(course_id = %course_id, cards = stored.cards.len(), "Stored generated flashcards");
        Ok(stored)
    }

    pub async fn get_notes(repo: &dyn Repository, course_id: &ObjectId) -> AppResult<Notes> {
        repo.find_notes(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Notes"))
    }

    pub async fn get_flashcards(repo: &dyn Repository, course_id: &ObjectId) -> AppResult<Flashcard> {
        repo.find_flashcards(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Flashcards"))
    }
}
