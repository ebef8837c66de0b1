use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// The slice of a user document this service reads and writes.
///
/// Profiles, credentials and roles belong to the auth and directory services;
/// only the owned-course index is maintained here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub courses: Vec<ObjectId>,
}

/// Identity of the caller, taken from a verified token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: ObjectId,
}

impl User {
    pub fn new(id: ObjectId) -> Self {
        Self {
            id,
            courses: Vec::new(),
        }
    }

    pub fn owns(&self, course_id: &ObjectId) -> bool {
        self.courses.contains(course_id)
    }
}
