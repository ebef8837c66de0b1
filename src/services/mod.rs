pub mod assignment;
pub mod auth;
pub mod course;
pub mod database;
pub mod duration;
pub mod enrichment;
pub mod generative;
pub mod layout;
pub mod layout_merge;
pub mod prompts;
pub mod repository;
pub mod supplementary;
pub mod video;
