#![forbid(unsafe_code)]

pub mod json_file;
pub mod repository;

pub use json_file::{JsonFileRepository, write_json_atomic};
pub use repository::{InMemoryRepository, PersistError, ProgressRepository, ProgressSnapshot, Storage};
