#![allow(dead_code)]

mod repository;

pub use repository::{InMemoryRepository, record, record_at};
