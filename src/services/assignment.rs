use mongodb::bson::{oid::ObjectId, DateTime};

use crate::error::{AppError, AppResult};
use crate::models::{
    assigned_course::{AssignedCourse, Assignment},
    course::Course,
};
use crate::services::{course::CourseService, repository::Repository};

/// Result of assigning a course copy to a mentee.
#[derive(Debug)]
pub struct MenteeAssignment {
    pub assigned_course: AssignedCourse,
    pub course_copy: Course,
}

/// A mentee's copy together with the template it came from.
#[derive(Debug)]
pub struct AssignedCopy {
    pub assigned_course: AssignedCourse,
    pub course: Course,
}

pub struct AssignmentService;

impl AssignmentService {
    pub async fn create(
        repo: &dyn Repository,
        mentor: String,
        org_course_id: ObjectId,
        due_date: Option<DateTime>,
    ) -> AppResult<AssignedCourse> {
        if mentor.trim().is_empty() {
            return Err(AppError::Validation("mentor is required".to_string()));
        }
        CourseService::load_course(repo, &org_course_id).await?;

        let mut assigned = AssignedCourse::new(mentor, org_course_id, due_date);
        let id = repo.insert_assigned_course(&assigned).await?;
        assigned.id = Some(id);

        tracing::info!(assigned_course_id = %id, org_course_id = %org_course_id, "Created assigned course");
        Ok(assigned)
    }

    pub async fn get(repo: &dyn Repository, id: &ObjectId) -> AppResult<AssignedCourse> {
        repo.find_assigned_course(id)
            .await?
            .ok_or_else(|| AppError::not_found("Assigned course"))
    }

    /// Copy-on-assign: clone the original course, store the clone, add it to
    /// the mentee's list, then record the assignment.
    ///
    /// A mentee already on the record, or one that does not exist, is
    /// rejected before any clone is made.
    /// Later steps are not rolled back if a following one fails.
    pub async fn add_mentee(
        repo: &dyn Repository,
        id: &ObjectId,
        mentee_id: ObjectId,
        org_course_id: Option<ObjectId>,
    ) -> AppResult<MenteeAssignment> {
        let assigned = Self::get(repo, id).await?;

        if let Some(requested) = org_course_id {
            if requested != assigned.org_course_id {
                return Err(AppError::Validation(format!(
                    "course {} is not the course of this assignment",
                    requested
                )));
            }
        }
        if assigned.assignment_for(&mentee_id).is_some() {
            return Err(Self::already_assigned(&mentee_id));
        }
        repo.find_user(&mentee_id)
            .await?
            .ok_or_else(|| AppError::not_found("Mentee"))?;

        let original = CourseService::load_course(repo, &assigned.org_course_id).await?;
        let copy = original.clone_for_assignment();
        let copy_id = repo.insert_course(&copy).await?;
        tracing::info!(course_copy = %copy_id, org_course_id = %assigned.org_course_id, "Stored course copy");

        if !repo.push_user_course(&mentee_id, &copy_id).await? {
            tracing::error!(course_copy = %copy_id, mentee_id = %mentee_id, "Course copy stored but the mentee disappeared");
            return Err(AppError::not_found("Mentee"));
        }

        let assignment = Assignment::new(mentee_id, copy_id);
        let updated = match repo.push_assignment(id, &assignment).await? {
            Some(updated) => updated,
            None => {
                tracing::error!(course_copy = %copy_id, mentee_id = %mentee_id, "Course copy stored but the assignment was not recorded");
                return Err(match repo.find_assigned_course(id).await? {
                    Some(_) => Self::already_assigned(&mentee_id),
                    None => AppError::not_found("Assigned course"),
                });
            }
        };

        tracing::info!(assigned_course_id = %id, mentee_id = %mentee_id, course_copy = %copy_id, "Mentee added");
        Ok(MenteeAssignment {
            assigned_course: updated,
            course_copy: copy,
        })
    }

    /// Overwrites any due date already set.
    pub async fn set_due_date(
        repo: &dyn Repository,
        id: &ObjectId,
        due_date: DateTime,
    ) -> AppResult<AssignedCourse> {
        let updated = repo
            .set_due_date(id, due_date)
            .await?
            .ok_or_else(|| AppError::not_found("Assigned course"))?;
        tracing::info!(assigned_course_id = %id, "Due date set");
        Ok(updated)
    }

    /// Every assignment record, optionally only those for one original course.
    pub async fn list(
        repo: &dyn Repository,
        org_course_id: Option<&ObjectId>,
    ) -> AppResult<Vec<AssignedCourse>> {
        repo.find_assigned_courses(org_course_id).await
    }

    pub async fn by_mentor(repo: &dyn Repository, mentor: &str) -> AppResult<Vec<AssignedCourse>> {
        repo.find_assigned_by_mentor(mentor).await
    }

    pub async fn by_org_course(repo: &dyn Repository, org_course_id: &ObjectId) -> AppResult<AssignedCourse> {
        repo.find_assigned_by_org_course(org_course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Assigned course"))
    }

    /// Every copy handed to `mentee_id`. Copies whose course was deleted are
    /// skipped.
    pub async fn copies_for_mentee(
        repo: &dyn Repository,
        mentee_id: &ObjectId,
    ) -> AppResult<Vec<AssignedCopy>> {
        let records = repo.find_assigned_for_mentee(mentee_id).await?;
        let mut copies = Vec::with_capacity(records.len());

        for record in records {
            let Some(copy_id) = record.assignment_for(mentee_id).map(|a| a.course_copy) else {
                continue;
            };
            match repo.find_course(&copy_id).await? {
                Some(course) => copies.push(AssignedCopy {
                    assigned_course: record,
                    course,
                }),
                None => {
                    tracing::warn!(course_copy = %copy_id, mentee_id = %mentee_id, "Assigned course copy no longer exists");
                }
            }
        }

        Ok(copies)
    }

    /// Removes the record only; copies stay with their mentees.
    pub async fn delete(repo: &dyn Repository, id: &ObjectId) -> AppResult<()> {
        if !repo.delete_assigned_course(id).await? {
            return Err(AppError::not_found("Assigned course"));
        }
        tracing::info!(assigned_course_id = %id, "Deleted assigned course");
        Ok(())
    }

    fn already_assigned(mentee_id: &ObjectId) -> AppError {
        AppError::Validation(format!(
            "mentee {} already has a copy of this course",
            mentee_id
        ))
    }
}
