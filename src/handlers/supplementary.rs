use axum::extract::{Path, State};

use crate::{
    dto::supplementary::{FlashcardDeckResponse, FlashcardResponse, NotesResponse},
    handlers::{failure, parse_object_id, pretty_json_response, ApiResult},
    services::supplementary::SupplementaryService,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/notes/generate/{course_id}",
    tag = "supplementary",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Stored or freshly generated notes", body = NotesResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 502, description = "Generative service failed or answered in an unexpected shape", body = ErrorResponse)
    )
)]
pub async fn generate_notes(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let notes = SupplementaryService::notes_for_course(
        state.repo.as_ref(),
        state.generator.as_ref(),
        &course_id,
    )
    .await
    .map_err(failure("Failed to generate notes"))?;

    Ok(pretty_json_response(NotesResponse::from(&notes)))
}

#[utoipa::path(
    get,
    path = "/api/notes/{course_id}",
    tag = "supplementary",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Stored notes", body = NotesResponse),
        (status = 404, description = "No notes for this course", body = ErrorResponse)
    )
)]
pub async fn get_notes(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let notes = SupplementaryService::get_notes(state.repo.as_ref(), &course_id)
        .await
        .map_err(failure("Failed to load notes"))?;

    Ok(pretty_json_response(NotesResponse::from(&notes)))
}

#[utoipa::path(
    post,
    path = "/api/genflashcards/{course_id}",
    tag = "supplementary",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Stored or freshly generated flashcards", body = FlashcardResponse),
        (status = 400, description = "More than fifteen cards", body = ErrorResponse),
        (status = 404, description = "Course not found", body = ErrorResponse),
        (status = 502, description = "Generative service failed or answered in an unexpected shape", body = ErrorResponse)
    )
)]
pub async fn generate_flashcards(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let deck = SupplementaryService::flashcards_for_course(
        state.repo.as_ref(),
        state.generator.as_ref(),
        &course_id,
    )
    .await
    .map_err(failure("Failed to generate flashcards"))?;

    Ok(pretty_json_response(FlashcardResponse {
        message: "Flashcards ready".to_string(),
        flashcards: FlashcardDeckResponse::from(&deck),
    }))
}

#[utoipa::path(
    get,
    path = "/api/flashcards/{course_id}",
    tag = "supplementary",
    params(("course_id" = String, Path, description = "Course id")),
    responses(
        (status = 200, description = "Stored flashcards", body = FlashcardDeckResponse),
        (status = 404, description = "No flashcards for this course", body = ErrorResponse)
    )
)]
pub async fn get_flashcards(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
) -> ApiResult {
    let course_id = parse_object_id(&course_id)?;
    let deck = SupplementaryService::get_flashcards(state.repo.as_ref(), &course_id)
        .await
        .map_err(failure("Failed to load flashcards"))?;

    Ok(pretty_json_response(FlashcardDeckResponse::from(&deck)))
}
