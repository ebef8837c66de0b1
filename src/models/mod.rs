pub mod assigned_course;
pub mod course;
pub mod flashcard;
pub mod notes;
pub mod user;
