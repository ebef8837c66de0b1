use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    dto::{
        course::{
            ChapterResponse, ChapterUpdatedResponse, CompleteChapterRequest, CourseCreatedResponse,
            CourseResponse, CreateCourseRequest, SectionResponse, UpdateChapterLayoutRequest,
            UpdateCourseLayoutRequest,
        },
        MessageResponse,
    },
    handlers::{failure, parse_object_id, pretty_json_response, pretty_json_response_with_status, ApiResult},
    models::user::AuthUser,
    services::course::CourseService,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/courses/create-courses",
    tag = "courses",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseCreatedResponse),
        (status = 400, description = "More than five chapters", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<CreateCourseRequest>,
) -> ApiResult {
    let course = CourseService::create_course(state.repo.as_ref(), &user.user_id, request)
        .await
        .map_err(failure("Failed to create course"))?;

    Ok(pretty_json_response_with_status(
        StatusCode::CREATED,
        CourseCreatedResponse {
            message: "Course created successfully".to_string(),
            course: CourseResponse::from(&course),
        },
    ))
}

#[utoipa::path(
    get,
    path = "/api/courses/courselist",
    tag = "courses",
    responses(
        (status = 200, description = "Courses owned by the caller", body = [CourseResponse]),
        (status = 401, description = "Authentication required", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn list_courses(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult {
    let courses = CourseService::list_courses(state.repo.as_ref(), &user.user_id)
        .await
        .map_err(failure("Failed to list courses"))?;

    let response: Vec<CourseResponse> = courses.iter().map(CourseResponse::from).collect();
    Ok(pretty_json_response(response))
}

#[utoipa::path(
    get,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 404, description = "Not one of the caller's courses", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult {
    let course_id = parse_object_id(&id)?;
    let course = CourseService::get_course(state.repo.as_ref(), &user.user_id, &course_id)
        .await
        .map_err(failure("Failed to load course"))?;

    Ok(pretty_json_response(CourseResponse::from(&course)))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/chapters/{chapter_id}",
    tag = "courses",
    params(
        ("course_id" = String, Path, description = "Course id"),
        ("chapter_id" = String, Path, description = "Chapter id")
    ),
    responses(
        (status = 200, description = "Chapter", body = ChapterResponse),
        (status = 404, description = "Course or chapter not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_chapter(
    State(state): State<AppState>,
    Path((course_id, chapter_id)): Path<(String, String)>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let chapter_id = parse_object_id(&chapter_id)?;
    let chapter = CourseService::get_chapter(state.repo.as_ref(), &course_id, &chapter_id)
        .await
        .map_err(failure("Failed to load chapter"))?;

    Ok(pretty_json_response(ChapterResponse::from(&chapter)))
}

#[utoipa::path(
    get,
    path = "/api/courses/{course_id}/chapters/{chapter_id}/sections/{section_id}",
    tag = "courses",
    params(
        ("course_id" = String, Path, description = "Course id"),
        ("chapter_id" = String, Path, description = "Chapter id"),
        ("section_id" = String, Path, description = "Section id")
    ),
    responses(
        (status = 200, description = "Section", body = SectionResponse),
        (status = 404, description = "Course, chapter or section not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_section(
    State(state): State<AppState>,
    Path((course_id, chapter_id, section_id)): Path<(String, String, String)>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let chapter_id = parse_object_id(&chapter_id)?;
    let section_id = parse_object_id(&section_id)?;
    let section = CourseService::get_section(state.repo.as_ref(), &course_id, &chapter_id, &section_id)
        .await
        .map_err(failure("Failed to load section"))?;

    Ok(pretty_json_response(SectionResponse::from(&section)))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}/layout",
    tag = "courses",
    params(("course_id" = String, Path, description = "Course id")),
    request_body = UpdateCourseLayoutRequest,
    responses(
        (status = 200, description = "Layout merged", body = CourseCreatedResponse),
        (status = 400, description = "More than five chapters", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 409, description = "Course changed since it was read", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_course_layout(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Json(request): Json<UpdateCourseLayoutRequest>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let course = CourseService::update_course_layout(state.repo.as_ref(), &course_id, request)
        .await
        .map_err(failure("Failed to update course layout"))?;

    Ok(pretty_json_response(CourseCreatedResponse {
        message: "Course layout updated successfully".to_string(),
        course: CourseResponse::from(&course),
    }))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}/chapters/{chapter_id}/layout",
    tag = "courses",
    params(
        ("course_id" = String, Path, description = "Course id"),
        ("chapter_id" = String, Path, description = "Chapter id")
    ),
    request_body = UpdateChapterLayoutRequest,
    responses(
        (status = 200, description = "Chapter merged", body = ChapterUpdatedResponse),
        (status = 404, description = "Course or chapter not found", body = ErrorResponse),
        (status = 409, description = "Course changed since it was read", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_chapter_layout(
    State(state): State<AppState>,
    Path((course_id, chapter_id)): Path<(String, String)>,
    Json(request): Json<UpdateChapterLayoutRequest>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let chapter_id = parse_object_id(&chapter_id)?;
    let chapter = CourseService::update_chapter_layout(state.repo.as_ref(), &course_id, &chapter_id, request)
        .await
        .map_err(failure("Failed to update chapter layout"))?;

    Ok(pretty_json_response(ChapterUpdatedResponse {
        message: "Chapter layout updated successfully".to_string(),
        chapter: ChapterResponse::from(&chapter),
    }))
}

#[utoipa::path(
    put,
    path = "/api/courses/{course_id}/chapters/{chapter_id}/complete",
    tag = "courses",
    params(
        ("course_id" = String, Path, description = "Course id"),
        ("chapter_id" = String, Path, description = "Chapter id")
    ),
    request_body = CompleteChapterRequest,
    responses(
        (status = 200, description = "Completion recorded", body = ChapterUpdatedResponse),
        (status = 404, description = "Course or chapter not found", body = ErrorResponse),
        (status = 409, description = "Course changed since it was read", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn complete_chapter(
    State(state): State<AppState>,
    Path((course_id, chapter_id)): Path<(String, String)>,
    Json(request): Json<CompleteChapterRequest>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let chapter_id = parse_object_id(&chapter_id)?;
    let chapter = CourseService::complete_chapter(
        state.repo.as_ref(),
        &course_id,
        &chapter_id,
        request.is_completed,
    )
    .await
    .map_err(failure("Failed to update chapter completion"))?;

    Ok(pretty_json_response(ChapterUpdatedResponse {
        message: "Chapter completion updated".to_string(),
        chapter: ChapterResponse::from(&chapter),
    }))
}

#[utoipa::path(
    delete,
    path = "/api/courses/{id}",
    tag = "courses",
    params(("id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Course deleted", body = MessageResponse),
        (status = 404, description = "Course not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_course(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult {
    let course_id = parse_object_id(&id)?;
    CourseService::delete_course(state.repo.as_ref(), &course_id)
        .await
        .map_err(failure("Failed to delete course"))?;

    Ok(pretty_json_response(MessageResponse {
        message: "Course deleted successfully".to_string(),
    }))
}
