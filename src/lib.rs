pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;

use std::sync::Arc;

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use crate::{
    handlers::{assigned_course, course, generation, supplementary},
    middleware::AuthMiddleware,
    services::{generative::GenerativeClient, repository::Repository, video::VideoLookup},
};

#[derive(Clone)]
pub struct AppState {
    /// Storage for courses, users, assignments and side-documents
    pub repo: Arc<dyn Repository>,
    /// Generative content service, built once from configuration
    pub generator: Arc<dyn GenerativeClient>,
    /// Video lookup service
    pub videos: Arc<dyn VideoLookup>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        generation::generate_course_layout,
        generation::generate_chapter_content,
        generation::build_course,
        course::create_course,
        course::list_courses,
        course::get_course,
        course::get_chapter,
        course::get_section,
        course::update_course_layout,
        course::update_chapter_layout,
        course::complete_chapter,
        course::delete_course,
        supplementary::generate_notes,
        supplementary::get_notes,
        supplementary::generate_flashcards,
        supplementary::get_flashcards,
        assigned_course::create_assigned_course,
        assigned_course::list_assigned_courses,
        assigned_course::add_mentee,
        assigned_course::set_due_date,
        assigned_course::get_assigned_course,
        assigned_course::list_by_mentor,
        assigned_course::get_by_org_course,
        assigned_course::list_for_mentee,
        assigned_course::delete_assigned_course,
    ),
    components(schemas(
        dto::ErrorResponse,
        dto::MessageResponse,
        dto::generation::GenerateLayoutRequest,
        dto::generation::CourseLayout,
        dto::generation::LayoutChapter,
        dto::generation::CourseLayoutResponse,
        dto::generation::ChapterContentRequest,
        dto::generation::GeneratedSection,
        dto::generation::ChapterContentResponse,
        dto::generation::BuildCourseResponse,
        dto::course::CreateCourseRequest,
        dto::course::CreateChapterRequest,
        dto::course::SectionPayload,
        dto::course::VideoPayload,
        dto::course::PptPayload,
        dto::course::UpdateCourseLayoutRequest,
        dto::course::ChapterLayoutPayload,
        dto::course::UpdateChapterLayoutRequest,
        dto::course::CompleteChapterRequest,
        dto::course::CourseResponse,
        dto::course::ChapterResponse,
        dto::course::SectionResponse,
        dto::course::VideoResponse,
        dto::course::PptResponse,
        dto::course::CourseCreatedResponse,
        dto::course::ChapterUpdatedResponse,
        dto::supplementary::NotesResponse,
        dto::supplementary::ChapterNotesResponse,
        dto::supplementary::NoteBodyResponse,
        dto::supplementary::FlashcardDeckResponse,
        dto::supplementary::CardResponse,
        dto::supplementary::FlashcardResponse,
        dto::assigned_course::CreateAssignedCourseRequest,
        dto::assigned_course::AddMenteeRequest,
        dto::assigned_course::SetDueDateRequest,
        dto::assigned_course::AssignedCourseResponse,
        dto::assigned_course::AssignmentResponse,
        dto::assigned_course::AssignedCourseEnvelope,
        dto::assigned_course::AddMenteeResponse,
        dto::assigned_course::MenteeCourseSummary,
        dto::assigned_course::MenteeCoursesResponse,
        models::course::CourseLevel,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "generation", description = "Course layout and chapter content generation"),
        (name = "courses", description = "Course storage, layout edits and completion tracking"),
        (name = "supplementary", description = "Per-course notes and flashcards"),
        (name = "assigned", description = "Mentor assignments and per-mentee course copies")
    ),
    info(
        title = "Course Generation API",
        version = "0.1.0",
        description = "Generates courses, stores them, and hands out independent copies to mentees"
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    // Routes acting on the current user - require a valid token
    let protected_routes = Router::new()
        .route("/courses/generate", post(generation::build_course))
        .route("/courses/create-courses", post(course::create_course))
        .route("/courses/courselist", get(course::list_courses))
        .route(
            "/courses/:course_id",
            get(course::get_course).delete(course::delete_course),
        )
        .route("/courses/:course_id/layout", put(course::update_course_layout))
        .route(
            "/courses/:course_id/chapters/:chapter_id",
            get(course::get_chapter),
        )
        .route(
            "/courses/:course_id/chapters/:chapter_id/layout",
            put(course::update_chapter_layout),
        )
        .route(
            "/courses/:course_id/chapters/:chapter_id/complete",
            put(course::complete_chapter),
        )
        .route(
            "/courses/:course_id/chapters/:chapter_id/sections/:section_id",
            get(course::get_section),
        )
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            AuthMiddleware::auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/generate-course", post(generation::generate_course_layout))
        .route(
            "/generate-chapter-content",
            post(generation::generate_chapter_content),
        )
        .route("/notes/generate/:course_id", post(supplementary::generate_notes))
        .route("/notes/:course_id", get(supplementary::get_notes))
        .route("/genflashcards/:course_id", post(supplementary::generate_flashcards))
        .route("/flashcards/:course_id", get(supplementary::get_flashcards))
        .route(
            "/assigned",
            get(assigned_course::list_assigned_courses).post(assigned_course::create_assigned_course),
        )
        .route(
            "/assigned/",
            get(assigned_course::list_assigned_courses).post(assigned_course::create_assigned_course),
        )
        .route(
            "/assigned/:id",
            get(assigned_course::get_assigned_course)
                .delete(assigned_course::delete_assigned_course),
        )
        .route("/assigned/:id/addMentee", put(assigned_course::add_mentee))
        .route("/assigned/:id/setDueDate", put(assigned_course::set_due_date))
        .route("/assigned/mentor/:mentor", get(assigned_course::list_by_mentor))
        .route(
            "/assigned/by-org-course/:org_course_id",
            get(assigned_course::get_by_org_course),
        )
        .route(
            "/assigned/assigned-courses/:mentee_id",
            get(assigned_course::list_for_mentee),
        );

    let api_routes = Router::new().merge(protected_routes).merge(public_routes);

    Router::new()
        .nest("/api", api_routes)
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
