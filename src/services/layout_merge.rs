//! Merging layout edits into an existing course.
//!
//! Items that carry a known id are updated where they are; everything else is
//! appended. Existing items are never reordered or removed.

use mongodb::bson::oid::ObjectId;

use crate::dto::course::{
    ChapterLayoutPayload, PptPayload, SectionPayload, UpdateChapterLayoutRequest,
    UpdateCourseLayoutRequest, VideoPayload,
};
use crate::error::AppResult;
use crate::models::course::{Chapter, Course, Ppt, Section, Video};

/// A payload id that is a well-formed ObjectId, or `None`.
pub fn parse_item_id(raw: Option<&str>) -> Option<ObjectId> {
    raw.and_then(|s| ObjectId::parse_str(s.trim()).ok())
}

/// Apply a course-level layout edit. Fails without touching `course` when the
/// result would hold too many chapters.
pub fn merge_course_layout(course: &mut Course, update: UpdateCourseLayoutRequest) -> AppResult<()> {
    let mut merged = course.clone();

    if let Some(name) = non_blank(update.course_name) {
        merged.course_name = name;
    }
    if let Some(description) = non_blank(update.description) {
        merged.description = description;
    }
    if let Some(level) = update.level {
        merged.level = level;
    }
    if let Some(outcomes) = update.course_outcomes {
        merged.course_outcomes = outcomes;
    }
    if let Some(duration) = non_blank(update.duration) {
        merged.duration = duration;
    }

    merge_chapters(&mut merged.chapters, update.chapters);

    Course::validate_chapter_count(merged.chapters.len())?;
    merged.no_of_chapters = merged.chapters.len() as u32;
    merged.touch();

    *course = merged;
    Ok(())
}

fn merge_chapters(chapters: &mut Vec<Chapter>, incoming: Vec<ChapterLayoutPayload>) {
    for payload in incoming {
        match parse_item_id(payload.id.as_deref()) {
            Some(id) => match chapters.iter_mut().find(|c| c.id == id) {
                Some(chapter) => {
                    chapter.chapter_name = payload.chapter_name;
                    chapter.about = payload.about;
                    chapter.duration = payload.duration;
                }
                None => {
                    tracing::warn!(chapter_id = %id, "Layout update names an unknown chapter, ignoring it");
                }
            },
            None => {
                chapters.push(Chapter::new(
                    payload.chapter_name,
                    payload.about,
                    payload.duration,
                ));
            }
        }
    }
}

/// Apply a single-chapter edit: details, sections, then media.
pub fn merge_chapter_layout(chapter: &mut Chapter, update: UpdateChapterLayoutRequest) {
    if let Some(name) = non_blank(update.chapter_name) {
        chapter.chapter_name = name;
    }
    if let Some(about) = update.about {
        chapter.about = about;
    }
    if let Some(duration) = non_blank(update.duration) {
        chapter.duration = duration;
    }

    merge_sections(&mut chapter.sections, update.sections);

    if let Some(video) = update.video {
        patch_video(&mut chapter.video, video);
    }
    if let Some(ppt) = update.ppt {
        patch_ppt(&mut chapter.ppt, ppt);
    }
}

/// Sections with a well-formed id keep it: updated in place when it is
/// already in the chapter, appended otherwise. Sections without one are
/// appended under a fresh id.
pub fn merge_sections(sections: &mut Vec<Section>, incoming: Vec<SectionPayload>) {
    for payload in incoming {
        let id = parse_item_id(payload.id.as_deref());
        match id.and_then(|id| sections.iter_mut().find(|s| s.id == id)) {
            Some(section) => {
                section.title = payload.title;
                section.explanation = payload.explanation;
                section.code_example = payload.code_example;
            }
            None => sections.push(Section {
                id: id.unwrap_or_else(ObjectId::new),
                title: payload.title,
                explanation: payload.explanation,
                code_example: payload.code_example,
            }),
        }
    }
}

fn patch_video(video: &mut Video, patch: VideoPayload) {
    if let Some(url) = non_blank(patch.url) {
        video.url = Some(url);
    }
    if let Some(thumbnail) = non_blank(patch.thumbnail) {
        video.thumbnail = Some(thumbnail);
    }
}

fn patch_ppt(ppt: &mut Ppt, patch: PptPayload) {
    if let Some(title) = non_blank(patch.title) {
        ppt.title = Some(title);
    }
    if let Some(link) = non_blank(patch.link) {
        ppt.link = Some(link);
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::course::CourseLevel;

    fn course_with(names: &[&str]) -> Course {
        let chapters = names
            .iter()
            .map(|n| Chapter::new(n.to_string(), format!("about {}", n), "10 minutes".into()))
            .collect();
        Course::new(
            "Course".into(),
            "desc".into(),
            vec![],
            CourseLevel::Basic,
            vec![],
            "1 hour".into(),
            chapters,
        )
    }

    fn chapter_payload(id: Option<String>, name: &str) -> ChapterLayoutPayload {
        ChapterLayoutPayload {
            id,
            chapter_name: name.to_string(),
            about: String::new(),
            duration: "5 minutes".into(),
        }
    }

    fn section_payload(id: Option<String>, title: &str) -> SectionPayload {
        SectionPayload {
            id,
            title: title.to_string(),
            explanation: format!("{} explained", title),
            code_example: None,
        }
    }

    #[test]
    fn test_existing_chapters_update_in_place_and_new_ones_append() {
        let mut course = course_with(&["A", "B"]);
        let (a, b) = (course.chapters[0].id, course.chapters[1].id);

        let update = UpdateCourseLayoutRequest {
            chapters: vec![
                chapter_payload(Some(a.to_hex()), "A2"),
                chapter_payload(None, "C"),
            ],
            ..Default::default()
        };
        merge_course_layout(&mut course, update).unwrap();

        let names: Vec<&str> = course.chapters.iter().map(|c| c.chapter_name.as_str()).collect();
        assert_eq!(names, ["A2", "B", "C"]);
        assert_eq!(course.chapters[0].id, a);
        assert_eq!(course.chapters[1].id, b);
        assert_eq!(course.chapters[1].about, "about B");
        assert!(course.chapters[2].id != a && course.chapters[2].id != b);
        assert_eq!(course.no_of_chapters, 3);
    }

    #[test]
    fn test_unknown_chapter_id_is_ignored() {
        let mut course = course_with(&["A"]);
        let update = UpdateCourseLayoutRequest {
            chapters: vec![chapter_payload(Some(ObjectId::new().to_hex()), "Ghost")],
            ..Default::default()
        };
        merge_course_layout(&mut course, update).unwrap();
        assert_eq!(course.chapters.len(), 1);
        assert_eq!(course.chapters[0].chapter_name, "A");
    }

    #[test]
    fn test_too_many_chapters_leaves_course_untouched() {
        let mut course = course_with(&["A", "B", "C", "D"]);
        let before = course.clone();
        let update = UpdateCourseLayoutRequest {
            course_name: Some("Renamed".into()),
            chapters: vec![chapter_payload(None, "E"), chapter_payload(None, "F")],
            ..Default::default()
        };
        let err = merge_course_layout(&mut course, update).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(course, before);
    }

    #[test]
    fn test_course_fields_patched_when_present() {
        let mut course = course_with(&["A"]);
        let update = UpdateCourseLayoutRequest {
            course_name: Some("Renamed".into()),
            description: Some("".into()),
            level: Some(CourseLevel::Advanced),
            ..Default::default()
        };
        merge_course_layout(&mut course, update).unwrap();
        assert_eq!(course.course_name, "Renamed");
        assert_eq!(course.description, "desc");
        assert_eq!(course.level, CourseLevel::Advanced);
    }

    #[test]
    fn test_section_identities() {
        let mut sections = vec![Section::new("One".into(), "1".into(), None)];
        let existing = sections[0].id;
        let foreign = ObjectId::new();

        merge_sections(
            &mut sections,
            vec![
                section_payload(Some(existing.to_hex()), "One edited"),
                section_payload(Some(foreign.to_hex()), "Kept id"),
                section_payload(Some("not-an-id".into()), "Bad id"),
                section_payload(None, "No id"),
            ],
        );

        assert_eq!(sections.len(), 4);
        assert_eq!(sections[0].id, existing);
        assert_eq!(sections[0].title, "One edited");
        assert_eq!(sections[1].id, foreign);

        let ids: std::collections::HashSet<ObjectId> = sections.iter().map(|s| s.id).collect();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_media_patched_only_with_values() {
        let mut chapter = Chapter::new("A".into(), "a".into(), "5".into());
        chapter.video = Video::new("https://v/1".into(), "t1.jpg".into());

        merge_chapter_layout(
            &mut chapter,
            UpdateChapterLayoutRequest {
                video: Some(VideoPayload {
                    url: Some("https://v/2".into()),
                    thumbnail: Some("".into()),
                }),
                ppt: Some(PptPayload {
                    title: Some("Slides".into()),
                    link: None,
                }),
                ..Default::default()
            },
        );

        assert_eq!(chapter.video.url.as_deref(), Some("https://v/2"));
        assert_eq!(chapter.video.thumbnail.as_deref(), Some("t1.jpg"));
        assert_eq!(chapter.ppt.title.as_deref(), Some("Slides"));
        assert!(chapter.ppt.link.is_none());
        assert_eq!(chapter.chapter_name, "A");
    }
}
