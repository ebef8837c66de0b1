use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

/// Template record binding a mentor and an original course to the copies
/// handed out to mentees.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AssignedCourse {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub mentor: String,
    #[serde(default)]
    pub assigns: Vec<Assignment>,
    /// The original course. Never cloned in place, never edited by learners.
    pub org_course_id: ObjectId,
    pub due_date: Option<DateTime>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

/// One mentee and the course copy made for them.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub mentee_id: ObjectId,
    pub course_copy: ObjectId,
}

impl AssignedCourse {
    pub fn new(mentor: String, org_course_id: ObjectId, due_date: Option<DateTime>) -> Self {
        let now = DateTime::now();
        Self {
            id: None,
            mentor,
            assigns: Vec::new(),
            org_course_id,
            due_date,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }

    pub fn assignment_for(&self, mentee_id: &ObjectId) -> Option<&Assignment> {
        self.assigns.iter().find(|a| &a.mentee_id == mentee_id)
    }
}

impl Assignment {
    pub fn new(mentee_id: ObjectId, course_copy: ObjectId) -> Self {
        Self {
            mentee_id,
            course_copy,
        }
    }
}
