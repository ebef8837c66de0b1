//! Prompt text for the generative service.
//!
//! Each prompt pins the JSON shape the matching decoder expects; wording is
//! otherwise free to change.

use crate::dto::generation::{ChapterContentRequest, GenerateLayoutRequest};
use crate::models::course::Course;
use crate::models::flashcard::MAX_FLASHCARDS;

pub fn course_layout(request: &GenerateLayoutRequest) -> String {
    format!(
        r#"Design a {level} level course on "{topic}" covering these skills: {skills}.
The whole course should take about {duration} hours and have exactly {count} chapters.
Respond with a single JSON object and nothing else, using exactly these keys:
{{
  "Course Name": string,
  "Description": string,
  "Skills": [string],
  "Level": "Basic" | "Intermediate" | "Advanced",
  "Duration": string,
  "NoOfChapters": number,
  "Course Outcomes": [string],
  "Chapters": [
    {{ "Chapter Name": string, "About": string, "Duration": "<minutes> minutes", "Content": [string] }}
  ]
}}"#,
        level = request.difficulty,
        topic = request.topic.trim(),
        skills = request.skills.join(", "),
        duration = request.duration.trim(),
        count = request.chapter_count,
    )
}

pub fn chapter_sections(request: &ChapterContentRequest) -> String {
    let topics = if request.content.is_empty() {
        request.chapter_name.clone()
    } else {
        request.content.join(", ")
    };
    format!(
        r#"Write the teaching content for the chapter "{name}" ({about}) of a {level} level course.
Cover these topics: {topics}.
Give one section per topic. Match the depth of each explanation to the {level} level; the more detail a topic needs, the longer its explanation.
Include a short code example only when the topic is about programming; otherwise use an empty string.
Respond with a JSON array and nothing else:
[ {{ "title": string, "explanation": string, "codeExample": string }} ]"#,
        name = request.chapter_name,
        about = request.about,
        level = request.difficulty,
        topics = topics,
    )
}

pub fn course_notes(course: &Course) -> String {
    let chapters: Vec<&str> = course
        .chapters
        .iter()
        .map(|c| c.chapter_name.as_str())
        .collect();
    format!(
        r#"Prepare revision notes for the {level} level course "{name}".
Description: {description}
Skills: {skills}
Chapters, in order: {chapters}
Write one entry per chapter with a clear explanation, and a code example where it helps (null otherwise).
Respond with a single JSON object and nothing else:
{{
  "courseName": string,
  "skills": [string],
  "chapters": [ {{ "chapterName": string, "notes": {{ "explanation": string, "codeExample": string | null }} }} ]
}}"#,
        level = course.level,
        name = course.course_name,
        description = course.description,
        skills = course.skills.join(", "),
        chapters = chapters.join(" | "),
    )
}

pub fn flashcards(topic: &str) -> String {
    format!(
        r#"Create at most {max} flashcards for studying "{topic}".
Each card has a short question or term on the front and a concise answer on the back.
Respond with a JSON array and nothing else:
[ {{ "front": string, "back": string }} ]"#,
        max = MAX_FLASHCARDS,
        topic = topic,
    )
}
