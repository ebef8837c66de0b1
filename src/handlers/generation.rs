use axum::{
    extract::{Extension, State},
    http::StatusCode,
    response::Json,
};

use crate::{
    dto::{
        course::{CourseResponse, VideoResponse},
        generation::{
            BuildCourseResponse, ChapterContentRequest, ChapterContentResponse,
            CourseLayoutResponse, GenerateLayoutRequest,
        },
    },
    handlers::{failure, pretty_json_response, pretty_json_response_with_status, ApiResult},
    models::user::AuthUser,
    services::{course::CourseService, enrichment::ChapterEnricher, layout::LayoutGenerator},
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/generate-course",
    tag = "generation",
    request_body = GenerateLayoutRequest,
    responses(
        (status = 200, description = "Course layout generated", body = CourseLayoutResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 502, description = "Generative service failed or answered in an unexpected shape", body = ErrorResponse)
    )
)]
pub async fn generate_course_layout(
    State(state): State<AppState>,
    Json(request): Json<GenerateLayoutRequest>,
) -> ApiResult {
    let layout = LayoutGenerator::generate(state.generator.as_ref(), &request)
        .await
        .map_err(failure("Failed to generate course layout"))?;

    Ok(pretty_json_response(CourseLayoutResponse {
        course_layout: layout,
    }))
}

/// Sections and a video for one chapter. Failures degrade to empty content
/// and are reported in `warnings`.
#[utoipa::path(
    post,
    path = "/api/generate-chapter-content",
    tag = "generation",
    request_body = ChapterContentRequest,
    responses(
        (status = 200, description = "Chapter content, possibly degraded", body = ChapterContentResponse)
    )
)]
pub async fn generate_chapter_content(
    State(state): State<AppState>,
    Json(request): Json<ChapterContentRequest>,
) -> ApiResult {
    let enriched =
        ChapterEnricher::enrich(state.generator.as_ref(), state.videos.as_ref(), &request).await;

    Ok(pretty_json_response(ChapterContentResponse {
        video: VideoResponse::from(&enriched.video),
        sections: enriched.sections,
        warnings: enriched.warnings,
    }))
}

#[utoipa::path(
    post,
    path = "/api/courses/generate",
    tag = "generation",
    request_body = GenerateLayoutRequest,
    responses(
        (status = 201, description = "Course generated and stored", body = BuildCourseResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 401, description = "Authentication required", body = ErrorResponse),
        (status = 502, description = "Layout generation failed", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
pub async fn build_course(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    Json(request): Json<GenerateLayoutRequest>,
) -> ApiResult {
    let built = CourseService::build_course(
        state.repo.as_ref(),
        state.generator.as_ref(),
        state.videos.as_ref(),
        &state.config.pipeline,
        &user.user_id,
        request,
    )
    .await
    .map_err(failure("Failed to build course"))?;

    Ok(pretty_json_response_with_status(
        StatusCode::CREATED,
        BuildCourseResponse {
            message: "Course generated successfully".to_string(),
            course: CourseResponse::from(&built.course),
            warnings: built.warnings,
        },
    ))
}
