mod common;

use coursegen_server::{
    dto::course::{
        ChapterLayoutPayload, CreateChapterRequest, CreateCourseRequest, SectionPayload,
        UpdateChapterLayoutRequest, UpdateCourseLayoutRequest,
    },
    error::AppError,
    models::course::CourseLevel,
    services::{course::CourseService, repository::Repository},
};
use common::{seed_course, setup_test_app, FakeVideoLookup, ScriptedGenerator};
use mongodb::bson::oid::ObjectId;

fn create_request(chapters: usize) -> CreateCourseRequest {
    CreateCourseRequest {
        course_name: "Rust".to_string(),
        description: "Systems programming".to_string(),
        skills: vec!["rust".to_string()],
        level: CourseLevel::Intermediate,
        course_outcomes: vec!["Ship a CLI".to_string()],
        duration: "3 hours".to_string(),
        chapters: (0..chapters)
            .map(|i| CreateChapterRequest {
                chapter_name: format!("Chapter {}", i + 1),
                about: "about".to_string(),
                duration: "20 minutes".to_string(),
                sections: vec![SectionPayload {
                    id: None,
                    title: "Intro".to_string(),
                    explanation: "Text".to_string(),
                    code_example: None,
                }],
                video: None,
                ppt: None,
            })
            .collect(),
    }
}

#[tokio::test]
async fn test_create_course_records_owner() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let user_id = app.repo.add_user();

    let course = CourseService::create_course(app.repo.as_ref(), &user_id, create_request(3))
        .await
        .unwrap();

    let course_id = course.id.unwrap();
    assert_eq!(course.no_of_chapters, 3);
    assert!(!course.assigned_copy);
    assert_eq!(app.repo.user(&user_id).unwrap().courses, vec![course_id]);

    let listed = CourseService::list_courses(app.repo.as_ref(), &user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].course_name, "Rust");
}

#[tokio::test]
async fn test_create_course_with_six_chapters_persists_nothing() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let user_id = app.repo.add_user();

    let err = CourseService::create_course(app.repo.as_ref(), &user_id, create_request(6))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(app.repo.course_count(), 0);
    assert!(app.repo.user(&user_id).unwrap().courses.is_empty());
}

#[tokio::test]
async fn test_get_course_requires_ownership() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let owner = app.repo.add_user();
    let stranger = app.repo.add_user();

    let course = CourseService::create_course(app.repo.as_ref(), &owner, create_request(1))
        .await
        .unwrap();
    let course_id = course.id.unwrap();

    assert!(CourseService::get_course(app.repo.as_ref(), &owner, &course_id).await.is_ok());
    assert!(matches!(
        CourseService::get_course(app.repo.as_ref(), &stranger, &course_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_layout_update_merges_chapters() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();
    let (setup_id, syntax_id) = (course.chapters[0].id, course.chapters[1].id);

    let update = UpdateCourseLayoutRequest {
        chapters: vec![
            ChapterLayoutPayload {
                id: Some(setup_id.to_hex()),
                chapter_name: "Installing Python".to_string(),
                about: "Tooling".to_string(),
                duration: "15 minutes".to_string(),
            },
            ChapterLayoutPayload {
                id: None,
                chapter_name: "Functions".to_string(),
                about: "def".to_string(),
                duration: "30 minutes".to_string(),
            },
        ],
        ..Default::default()
    };

    let updated = CourseService::update_course_layout(app.repo.as_ref(), &course_id, update)
        .await
        .unwrap();

    let names: Vec<&str> = updated.chapters.iter().map(|c| c.chapter_name.as_str()).collect();
    assert_eq!(names, ["Installing Python", "Syntax", "Functions"]);
    assert_eq!(updated.chapters[0].id, setup_id);
    assert_eq!(updated.chapters[1].id, syntax_id);
    // Sections of an edited chapter survive a layout edit
    assert_eq!(updated.chapters[0].sections, course.chapters[0].sections);

    let stored = app.repo.find_course(&course_id).await.unwrap().unwrap();
    assert_eq!(stored.chapters.len(), 3);
    assert_eq!(stored.no_of_chapters, 3);
}

#[tokio::test]
async fn test_layout_update_beyond_five_chapters_is_rejected() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();

    let update = UpdateCourseLayoutRequest {
        chapters: (0..4)
            .map(|i| ChapterLayoutPayload {
                id: None,
                chapter_name: format!("Extra {}", i),
                about: String::new(),
                duration: "5 minutes".to_string(),
            })
            .collect(),
        ..Default::default()
    };

    let err = CourseService::update_course_layout(app.repo.as_ref(), &course_id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    let stored = app.repo.find_course(&course_id).await.unwrap().unwrap();
    assert_eq!(stored.chapters.len(), 2);
}

#[tokio::test]
async fn test_chapter_layout_update_merges_sections() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();
    let chapter_id = course.chapters[0].id;
    let section_id = course.chapters[0].sections[0].id;

    let update = UpdateChapterLayoutRequest {
        chapter_name: Some("Setup, revised".to_string()),
        sections: vec![
            SectionPayload {
                id: Some(section_id.to_hex()),
                title: "Intro, revised".to_string(),
                explanation: "New text".to_string(),
                code_example: Some("python3 --version".to_string()),
            },
            SectionPayload {
                id: Some("temp-1".to_string()),
                title: "Virtual environments".to_string(),
                explanation: "venv".to_string(),
                code_example: None,
            },
        ],
        ..Default::default()
    };

    let chapter = CourseService::update_chapter_layout(app.repo.as_ref(), &course_id, &chapter_id, update)
        .await
        .unwrap();

    assert_eq!(chapter.chapter_name, "Setup, revised");
    assert_eq!(chapter.sections.len(), 2);
    assert_eq!(chapter.sections[0].id, section_id);
    assert_eq!(chapter.sections[0].title, "Intro, revised");
    assert_ne!(chapter.sections[1].id, section_id);

    let section = CourseService::get_section(
        app.repo.as_ref(),
        &course_id,
        &chapter_id,
        &chapter.sections[1].id,
    )
    .await
    .unwrap();
    assert_eq!(section.title, "Virtual environments");
}

#[tokio::test]
async fn test_unknown_chapter_is_not_found() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();

    let err = CourseService::complete_chapter(app.repo.as_ref(), &course_id, &ObjectId::new(), true)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));

    let err = CourseService::get_chapter(app.repo.as_ref(), &ObjectId::new(), &course.chapters[0].id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_delete_course_pulls_it_from_owner() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let user_id = app.repo.add_user();
    let course = CourseService::create_course(app.repo.as_ref(), &user_id, create_request(1))
        .await
        .unwrap();
    let course_id = course.id.unwrap();

    CourseService::delete_course(app.repo.as_ref(), &course_id).await.unwrap();

    assert_eq!(app.repo.course_count(), 0);
    assert!(app.repo.user(&user_id).unwrap().courses.is_empty());
    assert!(matches!(
        CourseService::delete_course(app.repo.as_ref(), &course_id).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_stale_copy_cannot_overwrite_completion() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();
    let chapter_id = course.chapters[0].id;

    let mut stale = app.repo.find_course(&course_id).await.unwrap().unwrap();
    let read_at = stale.updated_at;

    CourseService::complete_chapter(app.repo.as_ref(), &course_id, &chapter_id, true)
        .await
        .unwrap();

    stale.course_name = "Renamed".to_string();
    stale.touch();
    assert!(!app.repo.replace_course(&stale, read_at).await.unwrap());

    let stored = app.repo.find_course(&course_id).await.unwrap().unwrap();
    assert!(stored.chapters[0].is_completed);
    assert_eq!(stored.course_name, course.course_name);
}

#[tokio::test]
async fn test_edit_racing_another_writer_is_conflict() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();

    app.repo.edit_before_next_replace();
    let update = UpdateCourseLayoutRequest {
        course_name: Some("Renamed".to_string()),
        ..Default::default()
    };
    let err = CourseService::update_course_layout(app.repo.as_ref(), &course_id, update)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let stored = app.repo.find_course(&course_id).await.unwrap().unwrap();
    assert_eq!(stored.course_name, course.course_name);

    // A fresh read goes through
    CourseService::complete_chapter(app.repo.as_ref(), &course_id, &course.chapters[1].id, true)
        .await
        .unwrap();
}

#[tokio::test]
async fn test_layout_updates_accept_numeric_duration() {
    let app = setup_test_app(ScriptedGenerator::new(), FakeVideoLookup::new());
    let course = seed_course(&app.repo).await;
    let course_id = course.id.unwrap();
    let chapter_id = course.chapters[0].id;

    let update: UpdateChapterLayoutRequest =
        serde_json::from_value(serde_json::json!({ "duration": 25 })).unwrap();
    let chapter = CourseService::update_chapter_layout(app.repo.as_ref(), &course_id, &chapter_id, update)
        .await
        .unwrap();
    assert_eq!(chapter.duration, "25");

    let update: UpdateCourseLayoutRequest =
        serde_json::from_value(serde_json::json!({ "duration": 2 })).unwrap();
    let updated = CourseService::update_course_layout(app.repo.as_ref(), &course_id, update)
        .await
        .unwrap();
    assert_eq!(updated.duration, "2");
}
