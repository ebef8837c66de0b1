use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::dto::course::CourseResponse;
use crate::dto::format_datetime;
use crate::models::assigned_course::AssignedCourse;

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignedCourseRequest {
    pub mentor: String,
    pub org_course_id: String,
    #[serde(default, deserialize_with = "optional_due_date")]
    pub due_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMenteeRequest {
    #[serde(alias = "userId")]
    pub mentee_id: String,
    /// Defaults to the template's original course; must match it when given.
    #[serde(default)]
    pub org_course_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetDueDateRequest {
    #[serde(deserialize_with = "due_date")]
    pub due_date: DateTime<Utc>,
}

/// Filter for listing assignment records.
#[derive(Debug, Default, Serialize, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AssignedCourseListQuery {
    /// Only records for this original course.
    pub org_course_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignedCourseResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub mentor: String,
    pub assigns: Vec<AssignmentResponse>,
    pub org_course_id: String,
    pub due_date: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentResponse {
    pub mentee_id: String,
    pub course_copy: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignedCourseEnvelope {
    pub message: String,
    pub assigned_course: AssignedCourseResponse,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddMenteeResponse {
    pub message: String,
    pub assigned_course: AssignedCourseResponse,
    pub course_copy: CourseResponse,
}

/// A mentee's view of one assigned copy.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenteeCourseSummary {
    #[serde(rename = "_id")]
    pub id: String,
    pub course_name: String,
    pub description: String,
    pub skills: Vec<String>,
    pub level: crate::models::course::CourseLevel,
    pub passed_final: bool,
    pub assigned_date: Option<String>,
    pub due_date: Option<String>,
    pub mentor: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MenteeCoursesResponse {
    pub courses: Vec<MenteeCourseSummary>,
}

impl From<&AssignedCourse> for AssignedCourseResponse {
    fn from(assigned: &AssignedCourse) -> Self {
        Self {
            id: assigned.id.map(|id| id.to_hex()).unwrap_or_default(),
            mentor: assigned.mentor.clone(),
            assigns: assigned
                .assigns
                .iter()
                .map(|a| AssignmentResponse {
                    mentee_id: a.mentee_id.to_hex(),
                    course_copy: a.course_copy.to_hex(),
                })
                .collect(),
            org_course_id: assigned.org_course_id.to_hex(),
            due_date: format_datetime(assigned.due_date),
            created_at: format_datetime(assigned.created_at),
            updated_at: format_datetime(assigned.updated_at),
        }
    }
}

/// Accepts RFC 3339 timestamps or plain `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

fn due_date<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_due_date(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {}", raw)))
}

fn optional_due_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(raw) => parse_due_date(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid due date: {}", raw))),
    }
}
