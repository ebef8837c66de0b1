use coursegen_server::models::{
    assigned_course::{AssignedCourse, Assignment},
    course::{Chapter, Course, CourseLevel, Section, Video, MAX_CHAPTERS},
    flashcard::{Card, Flashcard},
};
use mongodb::bson::{self, oid::ObjectId};

fn course_with(chapters: usize) -> Course {
    let chapters = (0..chapters)
        .map(|i| {
            let mut chapter = Chapter::new(format!("Chapter {}", i + 1), "About".into(), "15 minutes".into());
            chapter
                .sections
                .push(Section::new("Intro".into(), "Text".into(), Some("let x = 1;".into())));
            chapter
        })
        .collect();
    Course::new(
        "Rust".into(),
        "Ownership first".into(),
        vec!["rust".into()],
        CourseLevel::Intermediate,
        vec!["Read borrow errors".into()],
        "3 hours".into(),
        chapters,
    )
}

#[test]
fn test_course_creation() {
    let course = course_with(3);

    assert!(course.id.is_none());
    assert_eq!(course.no_of_chapters, 3);
    assert!(!course.assigned_copy);
    assert!(!course.passed_final);
    assert!(course.chapters.iter().all(|c| !c.is_completed && c.video.is_empty()));
    assert!(course.validate().is_ok());
}

#[test]
fn test_chapter_limit() {
    assert!(course_with(MAX_CHAPTERS).validate().is_ok());
    assert!(course_with(MAX_CHAPTERS + 1).validate().is_err());
    assert!(Course::validate_chapter_count(0).is_ok());
}

#[test]
fn test_clone_for_assignment() {
    let mut original = course_with(2);
    original.id = Some(ObjectId::new());

    let copy = original.clone_for_assignment();

    assert_ne!(copy.id, original.id);
    assert!(copy.id.is_some());
    assert!(copy.assigned_copy);
    assert_eq!(copy.chapters, original.chapters);
    assert_eq!(copy.course_name, original.course_name);
}

#[test]
fn test_course_document_field_names() {
    let mut course = course_with(1);
    course.chapters[0].video = Video::new("https://youtu.be/x".into(), "https://img/x.jpg".into());

    let doc = bson::to_document(&course).unwrap();

    assert!(!doc.contains_key("_id"));
    assert_eq!(doc.get_str("courseName").unwrap(), "Rust");
    assert!(doc.contains_key("noOfChapters"));
    assert!(!doc.get_bool("assignedCopy").unwrap());

    let chapter = doc.get_array("chapters").unwrap()[0].as_document().unwrap();
    assert!(chapter.get_object_id("_id").is_ok());
    assert_eq!(chapter.get_str("chapterName").unwrap(), "Chapter 1");
    assert_eq!(
        chapter.get_document("video").unwrap().get_str("url").unwrap(),
        "https://youtu.be/x"
    );
    let section = chapter.get_array("sections").unwrap()[0].as_document().unwrap();
    assert_eq!(section.get_str("codeExample").unwrap(), "let x = 1;");
}

#[test]
fn test_course_level_accepts_lowercase() {
    let level: CourseLevel = serde_json::from_str("\"advanced\"").unwrap();
    assert_eq!(level, CourseLevel::Advanced);
    assert_eq!(CourseLevel::Basic.to_string(), "Basic");
}

#[test]
fn test_assigned_course_lookup() {
    let mentee = ObjectId::new();
    let copy = ObjectId::new();
    let mut assigned = AssignedCourse::new("mentor-1".into(), ObjectId::new(), None);
    assigned.assigns.push(Assignment::new(mentee, copy));

    assert_eq!(assigned.assignment_for(&mentee).map(|a| a.course_copy), Some(copy));
    assert!(assigned.assignment_for(&ObjectId::new()).is_none());

    let doc = bson::to_document(&assigned).unwrap();
    assert!(doc.contains_key("orgCourseId"));
    let entry = doc.get_array("assigns").unwrap()[0].as_document().unwrap();
    assert_eq!(entry.get_object_id("menteeId").unwrap(), mentee);
    assert_eq!(entry.get_object_id("courseCopy").unwrap(), copy);
}

#[test]
fn test_flashcard_limits() {
    let cards: Vec<Card> = (0..16)
        .map(|i| Card {
            front: format!("Q{}", i),
            back: format!("A{}", i),
        })
        .collect();

    assert!(Flashcard::validate_cards(&cards[..15]).is_ok());
    assert!(Flashcard::validate_cards(&cards).is_err());
    assert!(Flashcard::validate_cards(&[]).is_err());
}
