use mongodb::bson::{oid::ObjectId, DateTime};

use crate::config::PipelineConfig;
use crate::dto::course::{CreateCourseRequest, UpdateChapterLayoutRequest, UpdateCourseLayoutRequest};
use crate::dto::generation::{ChapterContentRequest, CourseLayout, GenerateLayoutRequest, GeneratedSection};
use crate::error::{AppError, AppResult};
use crate::models::course::{Chapter, Course, Ppt, Section, Video};
use crate::services::{
    enrichment::{ChapterEnricher, EnrichedChapter},
    generative::GenerativeClient,
    layout::LayoutGenerator,
    layout_merge,
    repository::Repository,
    video::VideoLookup,
};

/// A freshly built course and the degradations met while building it.
#[derive(Debug)]
pub struct BuiltCourse {
    pub course: Course,
    pub warnings: Vec<String>,
}

pub struct CourseService;

impl CourseService {
    /// Persist a course for `user_id` and record it in the user's owned list.
    ///
    /// The two writes are independent: if the user cannot be updated the
    /// course stays stored without an owner.
    pub async fn create_course(
        repo: &dyn Repository,
        user_id: &ObjectId,
        request: CreateCourseRequest,
    ) -> AppResult<Course> {
        Course::validate_chapter_count(request.chapters.len())?;

        let chapters = request
            .chapters
            .into_iter()
            .map(|c| {
                let mut chapter = Chapter::new(c.chapter_name, c.about, c.duration);
                layout_merge::merge_sections(&mut chapter.sections, c.sections);
                chapter.video = c.video.map(Video::from).unwrap_or_default();
                chapter.ppt = c.ppt.map(Ppt::from).unwrap_or_default();
                chapter
            })
            .collect();

        let course = Course::new(
            request.course_name,
            request.description,
            request.skills,
            request.level,
            request.course_outcomes,
            request.duration,
            chapters,
        );

        Self::persist_for_user(repo, user_id, course).await
    }

    /// Layout, then per-chapter content, then one write. A layout failure
    /// aborts before anything is stored; chapter failures become warnings.
    pub async fn build_course(
        repo: &dyn Repository,
        generator: &dyn GenerativeClient,
        videos: &dyn VideoLookup,
        pipeline: &PipelineConfig,
        user_id: &ObjectId,
        request: GenerateLayoutRequest,
    ) -> AppResult<BuiltCourse> {
        let layout = LayoutGenerator::generate(generator, &request).await?;
        Course::validate_chapter_count(layout.chapters.len())?;

        let chapter_requests: Vec<ChapterContentRequest> = layout
            .chapters
            .iter()
            .map(|c| ChapterContentRequest::from_layout(c, request.difficulty))
            .collect();

        let enriched = ChapterEnricher::enrich_all(
            generator,
            videos,
            &chapter_requests,
            pipeline.enrichment_concurrency,
        )
        .await;

        let warnings: Vec<String> = enriched
            .iter()
            .flat_map(|c| c.warnings.iter().cloned())
            .collect();

        let course = Self::assemble(layout, enriched);
        let course = Self::persist_for_user(repo, user_id, course).await?;

        tracing::info!(
            course_id = ?course.id,
            chapters = course.chapters.len(),
            warnings = warnings.len(),
            "Course built"
        );

        Ok(BuiltCourse { course, warnings })
    }

    /// Combine a skeleton with its enriched chapters, position by position.
    pub fn assemble(layout: CourseLayout, enriched: Vec<EnrichedChapter>) -> Course {
        let chapters = layout
            .chapters
            .into_iter()
            .zip(enriched)
            .map(|(stub, content)| {
                let mut chapter = Chapter::new(stub.chapter_name, stub.about, stub.duration);
                chapter.sections = content.sections.into_iter().map(Section::from).collect();
                chapter.video = content.video;
                chapter
            })
            .collect();

        Course::new(
            layout.course_name,
            layout.description,
            layout.skills,
            layout.level,
            layout.course_outcomes,
            layout.duration,
            chapters,
        )
    }

    async fn persist_for_user(
        repo: &dyn Repository,
        user_id: &ObjectId,
        mut course: Course,
    ) -> AppResult<Course> {
        course.validate()?;

        let course_id = repo.insert_course(&course).await?;
        course.id = Some(course_id);
        tracing::info!(course_id = %course_id, "Created course: {}", course.course_name);

        if !repo.push_user_course(user_id, &course_id).await? {
            tracing::error!(
                course_id = %course_id,
                user_id = %user_id,
                "Course stored but the owning user does not exist"
            );
            return Err(AppError::not_found("User"));
        }

        Ok(course)
    }

    pub async fn load_course(repo: &dyn Repository, course_id: &ObjectId) -> AppResult<Course> {
        repo.find_course(course_id)
            .await?
            .ok_or_else(|| AppError::not_found("Course"))
    }

    /// The user's courses, in the order they were added.
    pub async fn list_courses(repo: &dyn Repository, user_id: &ObjectId) -> AppResult<Vec<Course>> {
        let user = repo
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        repo.find_courses(&user.courses).await
    }

    /// A course the user owns. Someone else's course reads as not found.
    pub async fn get_course(
        repo: &dyn Repository,
        user_id: &ObjectId,
        course_id: &ObjectId,
    ) -> AppResult<Course> {
        let user = repo
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User"))?;
        if !user.owns(course_id) {
            return Err(AppError::not_found("Course"));
        }
        Self::load_course(repo, course_id).await
    }

    pub async fn get_chapter(
        repo: &dyn Repository,
        course_id: &ObjectId,
        chapter_id: &ObjectId,
    ) -> AppResult<Chapter> {
        let course = Self::load_course(repo, course_id).await?;
        course
            .chapter(chapter_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Chapter"))
    }

    pub async fn get_section(
        repo: &dyn Repository,
        course_id: &ObjectId,
        chapter_id: &ObjectId,
        section_id: &ObjectId,
    ) -> AppResult<Section> {
        let chapter = Self::get_chapter(repo, course_id, chapter_id).await?;
        chapter
            .section(section_id)
            .cloned()
            .ok_or_else(|| AppError::not_found("Section"))
    }

    pub async fn update_course_layout(
        repo: &dyn Repository,
        course_id: &ObjectId,
        update: UpdateCourseLayoutRequest,
    ) -> AppResult<Course> {
        let mut course = Self::load_course(repo, course_id).await?;
        let read_at = course.updated_at;
        layout_merge::merge_course_layout(&mut course, update)?;
        Self::save(repo, &course, read_at).await?;

        tracing::info!(course_id = %course_id, chapters = course.chapters.len(), "Course layout updated");
        Ok(course)
    }

    pub async fn update_chapter_layout(
        repo: &dyn Repository,
        course_id: &ObjectId,
        chapter_id: &ObjectId,
        update: UpdateChapterLayoutRequest,
    ) -> AppResult<Chapter> {
        let mut course = Self::load_course(repo, course_id).await?;
        let read_at = course.updated_at;
        let chapter = course
            .chapter_mut(chapter_id)
            .ok_or_else(|| AppError::not_found("Chapter"))?;
        layout_merge::merge_chapter_layout(chapter, update);
        let chapter = chapter.clone();

        course.touch();
        Self::save(repo, &course, read_at).await?;

        tracing::info!(course_id = %course_id, chapter_id = %chapter_id, "Chapter layout updated");
        Ok(chapter)
    }

    /// Completion is tracked on one course document; copies are independent.
    pub async fn complete_chapter(
        repo: &dyn Repository,
        course_id: &ObjectId,
        chapter_id: &ObjectId,
        is_completed: bool,
    ) -> AppResult<Chapter> {
        let mut course = Self::load_course(repo, course_id).await?;
        let read_at = course.updated_at;
        let chapter = course
            .chapter_mut(chapter_id)
            .ok_or_else(|| AppError::not_found("Chapter"))?;
        chapter.is_completed = is_completed;
        let chapter = chapter.clone();

        course.touch();
        Self::save(repo, &course, read_at).await?;

        tracing::info!(course_id = %course_id, chapter_id = %chapter_id, is_completed, "Chapter completion updated");
        Ok(chapter)
    }

    /// Delete the course and drop it from every owned-course list.
    pub async fn delete_course(repo: &dyn Repository, course_id: &ObjectId) -> AppResult<()> {
        if !repo.delete_course(course_id).await? {
            return Err(AppError::not_found("Course"));
        }
        let users = repo.pull_course_from_users(course_id).await?;
        tracing::info!(course_id = %course_id, users, "Deleted course");
        Ok(())
    }

    /// Write back a course read at `read_at`. A concurrent edit in between
    /// turns into `Conflict` instead of being overwritten.
    async fn save(repo: &dyn Repository, course: &Course, read_at: Option<DateTime>) -> AppResult<()> {
        if repo.replace_course(course, read_at).await? {
            return Ok(());
        }
        let Some(id) = course.id else {
            return Err(AppError::not_found("Course"));
        };
        match repo.find_course(&id).await? {
            Some(_) => {
                tracing::warn!(course_id = %id, "Course changed while being edited");
                Err(AppError::Conflict(
                    "Course was modified by another request, reload and retry".into(),
                ))
            }
            None => Err(AppError::not_found("Course")),
        }
    }
}

impl From<GeneratedSection> for Section {
    fn from(generated: GeneratedSection) -> Self {
        let code_example = Some(generated.code_example).filter(|c| !c.trim().is_empty());
        Section::new(generated.title, generated.explanation, code_example)
    }
}
