use std::collections::HashMap;

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, to_bson, to_document, Bson, DateTime, Document},
    options::{ClientOptions, FindOneAndUpdateOptions, IndexOptions, ReturnDocument},
    Client, Collection, Database as MongoDatabase, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::info;

use crate::error::{AppError, AppResult};
use crate::models::{
    assigned_course::{AssignedCourse, Assignment},
    course::Course,
    flashcard::Flashcard,
    notes::Notes,
    user::User,
};
use crate::services::repository::Repository;

pub const COURSES: &str = "courses";
pub const USERS: &str = "users";
pub const ASSIGNED_COURSES: &str = "assignedcourses";
pub const NOTES: &str = "notes";
pub const FLASHCARDS: &str = "flashcards";

/// Database connection wrapper for MongoDB
///
/// Wraps both the MongoDB client and the application's database instance.
#[derive(Clone)]
pub struct Database {
    /// MongoDB client instance for connection management
    pub client: Client,
    /// Specific database instance for this application
    pub database: MongoDatabase,
}

impl Database {
    /// Connect to MongoDB and verify the connection by listing databases.
    ///
    /// # Example
    /// ```ignore
    /// let db = Database::new("mongodb://localhost:27017", "coursegen").await?;
    /// ```
    pub async fn new(database_url: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        info!("Connecting to MongoDB: {}", database_url);

        let mut client_options = ClientOptions::parse(database_url).await?;
        client_options.app_name = Some("coursegen-server".to_string());

        let client = Client::with_options(client_options)?;
        let database = client.database(db_name);

        client.list_database_names(None, None).await?;

        info!("MongoDB connection established successfully");

        Ok(Self { client, database })
    }

    /// One notes document and one flashcard deck per course.
    pub async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        for name in [NOTES, FLASHCARDS] {
            let index = IndexModel::builder()
                .keys(doc! { "course": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build();
            self.database
                .collection::<Document>(name)
                .create_index(index, None)
                .await?;
            info!("Ensured unique index on {}.course", name);
        }
        Ok(())
    }
}

/// `Repository` backed by the MongoDB collections.
#[derive(Clone)]
pub struct MongoRepository {
    db: Database,
}

impl MongoRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn courses(&self) -> Collection<Course> {
        self.db.database.collection(COURSES)
    }

    fn users(&self) -> Collection<User> {
        self.db.database.collection(USERS)
    }

    fn assigned(&self) -> Collection<AssignedCourse> {
        self.db.database.collection(ASSIGNED_COURSES)
    }

    fn notes(&self) -> Collection<Notes> {
        self.db.database.collection(NOTES)
    }

    fn flashcards(&self) -> Collection<Flashcard> {
        self.db.database.collection(FLASHCARDS)
    }

    /// Atomic "insert unless a document for this course exists".
    ///
    /// A concurrent upsert for the same course can lose the race on the
    /// unique index; the winner's document is returned in that case.
    async fn insert_by_course_if_absent<T>(
        collection: Collection<T>,
        course_id: &ObjectId,
        value: &T,
    ) -> AppResult<T>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync,
    {
        let mut on_insert = to_document(value)?;
        on_insert.remove("course");

        let options = FindOneAndUpdateOptions::builder()
            .upsert(true)
            .return_document(ReturnDocument::After)
            .build();

        let result = collection
            .find_one_and_update(
                doc! { "course": course_id },
                doc! { "$setOnInsert": on_insert },
                options,
            )
            .await;

        match result {
            Ok(Some(stored)) => Ok(stored),
            Ok(None) => Err(AppError::not_found("Stored document")),
            Err(e) => {
                tracing::warn!(course_id = %course_id, "Upsert lost a race, reading the stored document: {}", e);
                collection
                    .find_one(doc! { "course": course_id }, None)
                    .await?
                    .ok_or(AppError::Database(e))
            }
        }
    }
}

fn inserted_id(result: mongodb::results::InsertOneResult) -> AppResult<ObjectId> {
    result
        .inserted_id
        .as_object_id()
        .ok_or_else(|| AppError::InvalidId("inserted id is not an ObjectId".to_string()))
}

#[async_trait]
impl Repository for MongoRepository {
    async fn insert_course(&self, course: &Course) -> AppResult<ObjectId> {
        let mut course = course.clone();
        let id = *course.id.get_or_insert_with(ObjectId::new);
        self.courses().insert_one(&course, None).await?;
        Ok(id)
    }

    async fn find_course(&self, id: &ObjectId) -> AppResult<Option<Course>> {
        Ok(self.courses().find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_courses(&self, ids: &[ObjectId]) -> AppResult<Vec<Course>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let cursor = self
            .courses()
            .find(doc! { "_id": { "$in": ids.to_vec() } }, None)
            .await?;
        let found: Vec<Course> = cursor.try_collect().await?;

        let mut by_id: HashMap<ObjectId, Course> = found
            .into_iter()
            .filter_map(|c| c.id.map(|id| (id, c)))
            .collect();
        Ok(ids.iter().filter_map(|id| by_id.remove(id)).collect())
    }

    async fn replace_course(
        &self,
        course: &Course,
        expected_updated_at: Option<DateTime>,
    ) -> AppResult<bool> {
        let Some(id) = course.id else {
            return Ok(false);
        };
        // `null` also matches documents written without the field.
        let filter = match expected_updated_at {
            Some(stamp) => doc! { "_id": id, "updatedAt": stamp },
            None => doc! { "_id": id, "updatedAt": Bson::Null },
        };
        let result = self.courses().replace_one(filter, course, None).await?;
        Ok(result.matched_count > 0)
    }

    async fn delete_course(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.courses().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_user(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.users().find_one(doc! { "_id": id }, None).await?)
    }

    async fn push_user_course(&self, user_id: &ObjectId, course_id: &ObjectId) -> AppResult<bool> {
        let result = self
            .users()
            .update_one(
                doc! { "_id": user_id },
                doc! { "$push": { "courses": course_id } },
                None,
            )
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn pull_course_from_users(&self, course_id: &ObjectId) -> AppResult<u64> {
        let result = self
            .users()
            .update_many(
                doc! { "courses": course_id },
                doc! { "$pull": { "courses": course_id } },
                None,
            )
            .await?;
        Ok(result.modified_count)
    }

    async fn insert_assigned_course(&self, assigned: &AssignedCourse) -> AppResult<ObjectId> {
        let result = self.assigned().insert_one(assigned, None).await?;
        inserted_id(result)
    }

    async fn find_assigned_course(&self, id: &ObjectId) -> AppResult<Option<AssignedCourse>> {
        Ok(self.assigned().find_one(doc! { "_id": id }, None).await?)
    }

    async fn find_assigned_by_org_course(&self, org_course_id: &ObjectId) -> AppResult<Option<AssignedCourse>> {
        Ok(self
            .assigned()
            .find_one(doc! { "orgCourseId": org_course_id }, None)
            .await?)
    }

    async fn find_assigned_courses(&self, org_course_id: Option<&ObjectId>) -> AppResult<Vec<AssignedCourse>> {
        let filter = match org_course_id {
            Some(id) => doc! { "orgCourseId": id },
            None => doc! {},
        };
        let cursor = self.assigned().find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_assigned_by_mentor(&self, mentor: &str) -> AppResult<Vec<AssignedCourse>> {
        let cursor = self.assigned().find(doc! { "mentor": mentor }, None).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_assigned_for_mentee(&self, mentee_id: &ObjectId) -> AppResult<Vec<AssignedCourse>> {
        let cursor = self
            .assigned()
            .find(doc! { "assigns.menteeId": mentee_id }, None)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn push_assignment(&self, id: &ObjectId, assignment: &Assignment) -> AppResult<Option<AssignedCourse>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .assigned()
            .find_one_and_update(
                doc! { "_id": id, "assigns.menteeId": { "$ne": assignment.mentee_id } },
                doc! {
                    "$push": { "assigns": to_bson(assignment)? },
                    "$set": { "updatedAt": DateTime::now() },
                },
                options,
            )
            .await?)
    }

    async fn set_due_date(&self, id: &ObjectId, due_date: DateTime) -> AppResult<Option<AssignedCourse>> {
        let options = FindOneAndUpdateOptions::builder()
            .return_document(ReturnDocument::After)
            .build();
        Ok(self
            .assigned()
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "dueDate": due_date, "updatedAt": DateTime::now() } },
                options,
            )
            .await?)
    }

    async fn delete_assigned_course(&self, id: &ObjectId) -> AppResult<bool> {
        let result = self.assigned().delete_one(doc! { "_id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }

    async fn find_notes(&self, course_id: &ObjectId) -> AppResult<Option<Notes>> {
        Ok(self.notes().find_one(doc! { "course": course_id }, None).await?)
    }

    async fn insert_notes_if_absent(&self, notes: &Notes) -> AppResult<Notes> {
        Self::insert_by_course_if_absent(self.notes(), &notes.course, notes).await
    }

    async fn find_flashcards(&self, course_id: &ObjectId) -> AppResult<Option<Flashcard>> {
        Ok(self
            .flashcards()
            .find_one(doc! { "course": course_id }, None)
            .await?)
    }

    async fn insert_flashcards_if_absent(&self, deck: &Flashcard) -> AppResult<Flashcard> {
        Self::insert_by_course_if_absent(self.flashcards(), &deck.course, deck).await
    }
}
