use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, DateTime};

use crate::error::AppResult;
use crate::models::{
    assigned_course::{AssignedCourse, Assignment},
    course::Course,
    flashcard::Flashcard,
    notes::Notes,
    user::User,
};

/// Storage port for every collection the pipeline and the assignment manager
/// touch. Each method is a single-document operation; nothing here spans a
/// transaction.
#[async_trait]
pub trait Repository: Send + Sync {
    // Courses

    /// Insert a course, keeping its id when it already has one.
    async fn insert_course(&self, course: &Course) -> AppResult<ObjectId>;
    async fn find_course(&self, id: &ObjectId) -> AppResult<Option<Course>>;
    /// Courses for `ids`, in the order given. Missing ids are skipped.
    async fn find_courses(&self, ids: &[ObjectId]) -> AppResult<Vec<Course>>;
    /// Replace the whole document, but only while its stored `updatedAt`
    /// still equals `expected_updated_at`. `false` when no document matched,
    /// either because the id is unknown or because the course changed since
    /// it was read.
    async fn replace_course(
        &self,
        course: &Course,
        expected_updated_at: Option<DateTime>,
    ) -> AppResult<bool>;
    async fn delete_course(&self, id: &ObjectId) -> AppResult<bool>;

    // Users

    async fn find_user(&self, id: &ObjectId) -> AppResult<Option<User>>;
    /// Append to the user's owned-course list. `false` when the user does not exist.
    async fn push_user_course(&self, user_id: &ObjectId, course_id: &ObjectId) -> AppResult<bool>;
    /// Remove a course id from every user's list; returns how many users changed.
    async fn pull_course_from_users(&self, course_id: &ObjectId) -> AppResult<u64>;

    // Assigned courses

    async fn insert_assigned_course(&self, assigned: &AssignedCourse) -> AppResult<ObjectId>;
    async fn find_assigned_course(&self, id: &ObjectId) -> AppResult<Option<AssignedCourse>>;
    async fn find_assigned_by_org_course(&self, org_course_id: &ObjectId) -> AppResult<Option<AssignedCourse>>;
    /// All records, or only those for `org_course_id` when given.
    async fn find_assigned_courses(&self, org_course_id: Option<&ObjectId>) -> AppResult<Vec<AssignedCourse>>;
    async fn find_assigned_by_mentor(&self, mentor: &str) -> AppResult<Vec<AssignedCourse>>;
    async fn find_assigned_for_mentee(&self, mentee_id: &ObjectId) -> AppResult<Vec<AssignedCourse>>;
    /// Append an assignment unless the mentee already has one.
    ///
    /// Returns the updated document, or `None` when the record is missing or
    /// the mentee is already assigned.
    async fn push_assignment(&self, id: &ObjectId, assignment: &Assignment) -> AppResult<Option<AssignedCourse>>;
    async fn set_due_date(&self, id: &ObjectId, due_date: DateTime) -> AppResult<Option<AssignedCourse>>;
    async fn delete_assigned_course(&self, id: &ObjectId) -> AppResult<bool>;

    // Supplementary content

    async fn find_notes(&self, course_id: &ObjectId) -> AppResult<Option<Notes>>;
    /// Store `notes` unless a document for the same course exists; either
    /// way the stored document is returned.
    async fn insert_notes_if_absent(&self, notes: &Notes) -> AppResult<Notes>;
    async fn find_flashcards(&self, course_id: &ObjectId) -> AppResult<Option<Flashcard>>;
    async fn insert_flashcards_if_absent(&self, deck: &Flashcard) -> AppResult<Flashcard>;
}
