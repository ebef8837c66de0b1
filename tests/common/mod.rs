#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Duration;
use mongodb::bson::{oid::ObjectId, DateTime};
use serde_json::json;

use coursegen_server::{
    config::AppConfig,
    error::{AppError, AppResult},
    models::{
        assigned_course::{AssignedCourse, Assignment},
        course::{Chapter, Course, CourseLevel, Section, Video},
        flashcard::Flashcard,
        notes::Notes,
        user::User,
    },
    services::{
        auth::AuthService, duration::DurationBucket, generative::GenerativeClient,
        repository::Repository, video::VideoLookup,
    },
    AppState,
};

// ---------------------------------------------------------------------------
// In-memory repository
// ---------------------------------------------------------------------------

#[derive(Default)]
struct Store {
    courses: Vec<Course>,
    users: HashMap<ObjectId, User>,
    assigned: Vec<AssignedCourse>,
    notes: Vec<Notes>,
    flashcards: Vec<Flashcard>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    store: Mutex<Store>,
    edit_before_replace: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_user(&self) -> ObjectId {
        let id = ObjectId::new();
        self.store.lock().unwrap().users.insert(id, User::new(id));
        id
    }

    pub fn user(&self, id: &ObjectId) -> Option<User> {
        self.store.lock().unwrap().users.get(id).cloned()
    }

    pub fn course_count(&self) -> usize {
        self.store.lock().unwrap().courses.len()
    }

    pub fn notes_count(&self) -> usize {
        self.store.lock().unwrap().notes.len()
    }

    pub fn flashcard_count(&self) -> usize {
        self.store.lock().unwrap().flashcards.len()
    }

    /// Make another writer touch the stored course right before the next
    /// `replace_course` lands.
    pub fn edit_before_next_replace(&self) {
        self.edit_before_replace.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert_course(&self, course: &Course) -> AppResult<ObjectId> {
        let mut course = course.clone();
        let id = *course.id.get_or_insert_with(ObjectId::new);
        self.store.lock().unwrap().courses.push(course);
        Ok(id)
    }

    async fn find_course(&self, id: &ObjectId) -> AppResult<Option<Course>> {
        let store = self.store.lock().unwrap();
        Ok(store.courses.iter().find(|c| c.id.as_ref() == Some(id)).cloned())
    }

    async fn find_courses(&self, ids: &[ObjectId]) -> AppResult<Vec<Course>> {
        let store = self.store.lock().unwrap();
        Ok(ids
            .iter()
            .filter_map(|id| store.courses.iter().find(|c| c.id.as_ref() == Some(id)).cloned())
            .collect())
    }

    async fn replace_course(&self, course: &Course, expected_updated_at: Option<DateTime>) -> AppResult<bool> {
        let mut store = self.store.lock().unwrap();
        if self.edit_before_replace.swap(false, Ordering::SeqCst) {
            if let Some(stored) = store.courses.iter_mut().find(|c| c.id == course.id) {
                stored.touch();
            }
        }
        match store
            .courses
            .iter_mut()
            .find(|c| c.id.is_some() && c.id == course.id && c.updated_at == expected_updated_at)
        {
            Some(existing) => {
                *existing = course.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_course(&self, id: &ObjectId) -> AppResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.courses.len();
        store.courses.retain(|c| c.id.as_ref() != Some(id));
        Ok(store.courses.len() < before)
    }

    async fn find_user(&self, id: &ObjectId) -> AppResult<Option<User>> {
        Ok(self.store.lock().unwrap().users.get(id).cloned())
    }

    async fn push_user_course(&self, user_id: &ObjectId, course_id: &ObjectId) -> AppResult<bool> {
        let mut store = self.store.lock().unwrap();
        match store.users.get_mut(user_id) {
            Some(user) => {
                user.courses.push(*course_id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn pull_course_from_users(&self, course_id: &ObjectId) -> AppResult<u64> {
        let mut store = self.store.lock().unwrap();
        let mut changed = 0;
        for user in store.users.values_mut() {
            let before = user.courses.len();
            user.courses.retain(|c| c != course_id);
            if user.courses.len() < before {
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn insert_assigned_course(&self, assigned: &AssignedCourse) -> AppResult<ObjectId> {
        let mut assigned = assigned.clone();
        let id = *assigned.id.get_or_insert_with(ObjectId::new);
        self.store.lock().unwrap().assigned.push(assigned);
        Ok(id)
    }

    async fn find_assigned_course(&self, id: &ObjectId) -> AppResult<Option<AssignedCourse>> {
        let store = self.store.lock().unwrap();
        Ok(store.assigned.iter().find(|a| a.id.as_ref() == Some(id)).cloned())
    }

    async fn find_assigned_by_org_course(&self, org_course_id: &ObjectId) -> AppResult<Option<AssignedCourse>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .assigned
            .iter()
            .find(|a| &a.org_course_id == org_course_id)
            .cloned())
    }

    async fn find_assigned_courses(&self, org_course_id: Option<&ObjectId>) -> AppResult<Vec<AssignedCourse>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .assigned
            .iter()
            .filter(|a| org_course_id.map_or(true, |id| &a.org_course_id == id))
            .cloned()
            .collect())
    }

    async fn find_assigned_by_mentor(&self, mentor: &str) -> AppResult<Vec<AssignedCourse>> {
        let store = self.store.lock().unwrap();
        Ok(store.assigned.iter().filter(|a| a.mentor == mentor).cloned().collect())
    }

    async fn find_assigned_for_mentee(&self, mentee_id: &ObjectId) -> AppResult<Vec<AssignedCourse>> {
        let store = self.store.lock().unwrap();
        Ok(store
            .assigned
            .iter()
            .filter(|a| a.assignment_for(mentee_id).is_some())
            .cloned()
            .collect())
    }

    async fn push_assignment(&self, id: &ObjectId, assignment: &Assignment) -> AppResult<Option<AssignedCourse>> {
        let mut store = self.store.lock().unwrap();
        let Some(record) = store.assigned.iter_mut().find(|a| a.id.as_ref() == Some(id)) else {
            return Ok(None);
        };
        if record.assignment_for(&assignment.mentee_id).is_some() {
            return Ok(None);
        }
        record.assigns.push(assignment.clone());
        record.updated_at = Some(DateTime::now());
        Ok(Some(record.clone()))
    }

    async fn set_due_date(&self, id: &ObjectId, due_date: DateTime) -> AppResult<Option<AssignedCourse>> {
        let mut store = self.store.lock().unwrap();
        Ok(store
            .assigned
            .iter_mut()
            .find(|a| a.id.as_ref() == Some(id))
            .map(|record| {
                record.due_date = Some(due_date);
                record.updated_at = Some(DateTime::now());
                record.clone()
            }))
    }

    async fn delete_assigned_course(&self, id: &ObjectId) -> AppResult<bool> {
        let mut store = self.store.lock().unwrap();
        let before = store.assigned.len();
        store.assigned.retain(|a| a.id.as_ref() != Some(id));
        Ok(store.assigned.len() < before)
    }

    async fn find_notes(&self, course_id: &ObjectId) -> AppResult<Option<Notes>> {
        let store = self.store.lock().unwrap();
        Ok(store.notes.iter().find(|n| &n.course == course_id).cloned())
    }

    async fn insert_notes_if_absent(&self, notes: &Notes) -> AppResult<Notes> {
        let mut store = self.store.lock().unwrap();
        if let Some(existing) = store.notes.iter().find(|n| n.course == notes.course) {
            return Ok(existing.clone());
        }
        let mut notes = notes.clone();
        notes.id.get_or_insert_with(ObjectId::new);
        store.notes.push(notes.clone());
        Ok(notes)
    }

    async fn find_flashcards(&self, course_id: &ObjectId) -> AppResult<Option<Flashcard>> {
        let store = self.store.lock().unwrap();
        Ok(store.flashcards.iter().find(|f| &f.course == course_id).cloned())
    }

    async fn insert_flashcards_if_absent(&self, deck: &Flashcard) -> AppResult<Flashcard> {
        let mut store = self.store.lock().unwrap();
        if let Some(existing) = store.flashcards.iter().find(|f| f.course == deck.course) {
            return Ok(existing.clone());
        }
        let mut deck = deck.clone();
        deck.id.get_or_insert_with(ObjectId::new);
        store.flashcards.push(deck.clone());
        Ok(deck)
    }
}

// ---------------------------------------------------------------------------
// Scripted generative service
// ---------------------------------------------------------------------------

#[derive(Clone)]
enum Reply {
    Text(String),
    ServiceError,
}

/// Answers prompts by substring match; the first matching rule wins.
#[derive(Default)]
pub struct ScriptedGenerator {
    rules: Mutex<Vec<(String, Reply)>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, needle: &str, text: impl Into<String>) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Reply::Text(text.into())));
        self
    }

    pub fn fail(self, needle: &str) -> Self {
        self.rules
            .lock()
            .unwrap()
            .push((needle.to_string(), Reply::ServiceError));
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerativeClient for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());

        let reply = self
            .rules
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
            .map(|(_, reply)| reply.clone());

        match reply {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::ServiceError) => Err(AppError::GenerationService("scripted failure".to_string())),
            None => Err(AppError::GenerationService(format!("no scripted reply for prompt: {}", prompt))),
        }
    }
}

// ---------------------------------------------------------------------------
// Video lookup fake
// ---------------------------------------------------------------------------

/// Returns a video for every query except those listed as missing, and
/// records the bucket each query was made with.
#[derive(Default)]
pub struct FakeVideoLookup {
    missing: Vec<String>,
    failing: Vec<String>,
    queries: Mutex<Vec<(String, DurationBucket)>>,
}

impl FakeVideoLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing(mut self, query: &str) -> Self {
        self.missing.push(query.to_string());
        self
    }

    pub fn failing(mut self, query: &str) -> Self {
        self.failing.push(query.to_string());
        self
    }

    pub fn queries(&self) -> Vec<(String, DurationBucket)> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl VideoLookup for FakeVideoLookup {
    async fn find_video(&self, query: &str, bucket: DurationBucket) -> AppResult<Option<Video>> {
        self.queries.lock().unwrap().push((query.to_string(), bucket));
        if self.failing.iter().any(|q| q == query) {
            return Err(AppError::GenerationService("quota exceeded".to_string()));
        }
        if self.missing.iter().any(|q| q == query) {
            return Ok(None);
        }
        let slug = query.to_lowercase().replace(' ', "-");
        Ok(Some(Video::new(
            format!("https://www.youtube.com/watch?v={}", slug),
            format!("https://img.example/{}.jpg", slug),
        )))
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub const JWT_SECRET: &str = "test-secret";

pub struct TestApp {
    pub state: AppState,
    pub repo: Arc<InMemoryRepository>,
    pub generator: Arc<ScriptedGenerator>,
    pub videos: Arc<FakeVideoLookup>,
}

pub fn setup_test_app(generator: ScriptedGenerator, videos: FakeVideoLookup) -> TestApp {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = JWT_SECRET.to_string();

    let repo = Arc::new(InMemoryRepository::new());
    let generator = Arc::new(generator);
    let videos = Arc::new(videos);

    let state = AppState {
        repo: repo.clone(),
        generator: generator.clone(),
        videos: videos.clone(),
        config: Arc::new(config),
    };

    TestApp {
        state,
        repo,
        generator,
        videos,
    }
}

pub fn bearer_token(user_id: &ObjectId) -> String {
    let token = AuthService::new(JWT_SECRET)
        .issue_token(user_id, Duration::hours(1))
        .expect("failed to sign test token");
    format!("Bearer {}", token)
}

pub fn layout_json(chapters: &[&str]) -> String {
    let chapters: Vec<_> = chapters
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "Chapter Name": name,
                "About": format!("All about {}", name),
                "Duration": format!("{} minutes", 5 + i * 20),
                "Content": [format!("{} basics", name)]
            })
        })
        .collect();

    json!({
        "Course Name": "Python Foundations",
        "Description": "Start programming with Python",
        "Skills": ["python"],
        "Level": "Basic",
        "Duration": "2 hours",
        "NoOfChapters": chapters.len(),
        "Course Outcomes": ["Write small scripts"],
        "Chapters": chapters
    })
    .to_string()
}

pub fn sections_json(title: &str) -> String {
    json!([
        { "title": title, "explanation": format!("{} explained", title), "codeExample": "print('hi')" },
        { "title": format!("{} in practice", title), "explanation": "Worked example", "codeExample": "" }
    ])
    .to_string()
}

pub fn notes_json(chapters: &[&str]) -> String {
    let chapters: Vec<_> = chapters
        .iter()
        .map(|name| json!({ "chapterName": name, "notes": { "explanation": format!("{} summary", name), "codeExample": null } }))
        .collect();
    json!({ "courseName": "Python Foundations", "skills": ["python"], "chapters": chapters }).to_string()
}

pub fn cards_json(count: usize) -> String {
    let cards: Vec<_> = (0..count)
        .map(|i| json!({ "front": format!("Question {}", i + 1), "back": format!("Answer {}", i + 1) }))
        .collect();
    serde_json::Value::Array(cards).to_string()
}

/// A stored original course with two chapters of one section each.
pub async fn seed_course(repo: &InMemoryRepository) -> Course {
    let chapters = ["Setup", "Syntax"]
        .iter()
        .map(|name| {
            let mut chapter = Chapter::new(name.to_string(), format!("About {}", name), "10 minutes".into());
            chapter
                .sections
                .push(Section::new(format!("{} intro", name), "Text".into(), None));
            chapter
        })
        .collect();
    let mut course = Course::new(
        "Python Foundations".into(),
        "Start programming with Python".into(),
        vec!["python".into()],
        CourseLevel::Basic,
        vec!["Write small scripts".into()],
        "2 hours".into(),
        chapters,
    );
    let id = repo.insert_course(&course).await.expect("seed course");
    course.id = Some(id);
    course
}
