use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
};
use mongodb::bson::DateTime;

use crate::{
    dto::{
        assigned_course::{
            AddMenteeRequest, AddMenteeResponse, AssignedCourseEnvelope, AssignedCourseListQuery,
            AssignedCourseResponse,
            CreateAssignedCourseRequest, MenteeCourseSummary, MenteeCoursesResponse,
            SetDueDateRequest,
        },
        course::CourseResponse,
        format_datetime, MessageResponse,
    },
    handlers::{failure, parse_object_id, pretty_json_response, pretty_json_response_with_status, ApiResult},
    services::assignment::{AssignedCopy, AssignmentService},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/assigned",
    tag = "assigned",
    request_body = CreateAssignedCourseRequest,
    responses(
        (status = 201, description = "Assigned course created", body = AssignedCourseEnvelope),
        (status = 404, description = "Original course not found", body = ErrorResponse)
    )
)]
pub async fn create_assigned_course(
    State(state): State<AppState>,
    Json(request): Json<CreateAssignedCourseRequest>,
) -> ApiResult {
    let org_course_id = parse_object_id(&request.org_course_id)?;
    let assigned = AssignmentService::create(
        state.repo.as_ref(),
        request.mentor,
        org_course_id,
        request.due_date.map(|d| DateTime::from_millis(d.timestamp_millis())),
    )
    .await
    .map_err(failure("Failed to create assigned course"))?;

    Ok(pretty_json_response_with_status(
        StatusCode::CREATED,
        AssignedCourseEnvelope {
            message: "Assigned course created successfully".to_string(),
            assigned_course: AssignedCourseResponse::from(&assigned),
        },
    ))
}

#[utoipa::path(
    put,
    path = "/api/assigned/{id}/addMentee",
    tag = "assigned",
    params(("id" = String, Path, description = "Assigned course id")),
    request_body = AddMenteeRequest,
    responses(
        (status = 200, description = "Mentee received an independent course copy", body = AddMenteeResponse),
        (status = 400, description = "Mentee already assigned or course mismatch", body = ErrorResponse),
        (status = 404, description = "Assigned course, course or mentee not found", body = ErrorResponse)
    )
)]
pub async fn add_mentee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<AddMenteeRequest>,
) -> ApiResult {
    let id = parse_object_id(&id)?;
    let mentee_id = parse_object_id(&request.mentee_id)?;
    let org_course_id = request
        .org_course_id
        .as_deref()
        .map(parse_object_id)
        .transpose()?;

    let result = AssignmentService::add_mentee(state.repo.as_ref(), &id, mentee_id, org_course_id)
        .await
        .map_err(failure("Failed to add mentee"))?;

    Ok(pretty_json_response(AddMenteeResponse {
        message: "Mentee added successfully".to_string(),
        assigned_course: AssignedCourseResponse::from(&result.assigned_course),
        course_copy: CourseResponse::from(&result.course_copy),
    }))
}

#[utoipa::path(
    put,
    path = "/api/assigned/{id}/setDueDate",
    tag = "assigned",
    params(("id" = String, Path, description = "Assigned course id")),
    request_body = SetDueDateRequest,
    responses(
        (status = 200, description = "Due date set", body = AssignedCourseEnvelope),
        (status = 404, description = "Assigned course not found", body = ErrorResponse)
    )
)]
pub async fn set_due_date(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(request): Json<SetDueDateRequest>,
) -> ApiResult {
    let id = parse_object_id(&id)?;
    let assigned = AssignmentService::set_due_date(
        state.repo.as_ref(),
        &id,
        DateTime::from_millis(request.due_date.timestamp_millis()),
    )
    .await
    .map_err(failure("Failed to set due date"))?;

    Ok(pretty_json_response(AssignedCourseEnvelope {
        message: "Due date set successfully".to_string(),
        assigned_course: AssignedCourseResponse::from(&assigned),
    }))
}

#[utoipa::path(
    get,
    path = "/api/assigned/{id}",
    tag = "assigned",
    params(("id" = String, Path, description = "Assigned course id")),
    responses(
        (status = 200, description = "Assigned course", body = AssignedCourseResponse),
        (status = 404, description = "Assigned course not found", body = ErrorResponse)
    )
)]
pub async fn get_assigned_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_object_id(&id)?;
    let assigned = AssignmentService::get(state.repo.as_ref(), &id)
        .await
        .map_err(failure("Failed to load assigned course"))?;

    Ok(pretty_json_response(AssignedCourseResponse::from(&assigned)))
}

#[utoipa::path(
    get,
    path = "/api/assigned",
    tag = "assigned",
    params(AssignedCourseListQuery),
    responses(
        (status = 200, description = "Assigned courses, optionally for one original course", body = [AssignedCourseResponse]),
        (status = 400, description = "Malformed orgCourseId", body = ErrorResponse)
    )
)]
pub async fn list_assigned_courses(
    State(state): State<AppState>,
    Query(query): Query<AssignedCourseListQuery>,
) -> ApiResult {
    let org_course_id = query
        .org_course_id
        .as_deref()
        .filter(|raw| !raw.trim().is_empty())
        .map(parse_object_id)
        .transpose()?;
    let records = AssignmentService::list(state.repo.as_ref(), org_course_id.as_ref())
        .await
        .map_err(failure("Failed to list assigned courses"))?;

    let response: Vec<AssignedCourseResponse> =
        records.iter().map(AssignedCourseResponse::from).collect();
    Ok(pretty_json_response(response))
}

#[utoipa::path(
    get,
    path = "/api/assigned/mentor/{mentor}",
    tag = "assigned",
    params(("mentor" = String, Path, description = "Mentor id")),
    responses(
        (status = 200, description = "Assigned courses of the mentor", body = [AssignedCourseResponse])
    )
)]
pub async fn list_by_mentor(
    State(state): State<AppState>,
    Path(mentor): Path<String>,
) -> ApiResult {
    let records = AssignmentService::by_mentor(state.repo.as_ref(), &mentor)
        .await
        .map_err(failure("Failed to list assigned courses"))?;

    let response: Vec<AssignedCourseResponse> =
        records.iter().map(AssignedCourseResponse::from).collect();
    Ok(pretty_json_response(response))
}

#[utoipa::path(
    get,
    path = "/api/assigned/by-org-course/{org_course_id}",
    tag = "assigned",
    params(("org_course_id" = String, Path, description = "Original course id")),
    responses(
        (status = 200, description = "Assigned course for the original course", body = AssignedCourseResponse),
        (status = 404, description = "No assigned course for this course", body = ErrorResponse)
    )
)]
pub async fn get_by_org_course(
    State(state): State<AppState>,
    Path(org_course_id): Path<String>,
) -> ApiResult {
    let org_course_id = parse_object_id(&org_course_id)?;
    let assigned = AssignmentService::by_org_course(state.repo.as_ref(), &org_course_id)
        .await
        .map_err(failure("Failed to load assigned course"))?;

    Ok(pretty_json_response(AssignedCourseResponse::from(&assigned)))
}

#[utoipa::path(
    get,
    path = "/api/assigned/assigned-courses/{mentee_id}",
    tag = "assigned",
    params(("mentee_id" = String, Path, description = "Mentee id")),
    responses(
        (status = 200, description = "Course copies assigned to the mentee", body = MenteeCoursesResponse)
    )
)]
pub async fn list_for_mentee(
    State(state): State<AppState>,
    Path(mentee_id): Path<String>,
) -> ApiResult {
    let mentee_id = parse_object_id(&mentee_id)?;
    let copies = AssignmentService::copies_for_mentee(state.repo.as_ref(), &mentee_id)
        .await
        .map_err(failure("Failed to list assigned courses"))?;

    Ok(pretty_json_response(MenteeCoursesResponse {
        courses: copies.iter().map(summarize).collect(),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/assigned/{id}",
    tag = "assigned",
    params(("id" = String, Path, description = "Assigned course id")),
    responses(
        (status = 200, description = "Assigned course deleted", body = MessageResponse),
        (status = 404, description = "Assigned course not found", body = ErrorResponse)
    )
)]
pub async fn delete_assigned_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let id = parse_object_id(&id)?;
    AssignmentService::delete(state.repo.as_ref(), &id)
        .await
        .map_err(failure("Failed to delete assigned course"))?;

    Ok(pretty_json_response(MessageResponse {
        message: "Assigned course deleted successfully".to_string(),
    }))
}

fn summarize(copy: &AssignedCopy) -> MenteeCourseSummary {
    MenteeCourseSummary {
        id: copy.course.id.map(|id| id.to_hex()).unwrap_or_default(),
        course_name: copy.course.course_name.clone(),
        description: copy.course.description.clone(),
        skills: copy.course.skills.clone(),
        level: copy.course.level,
        passed_final: copy.course.passed_final,
        assigned_date: format_datetime(copy.assigned_course.updated_at),
        due_date: format_datetime(copy.assigned_course.due_date),
        mentor: copy.assigned_course.mentor.clone(),
    }
}
