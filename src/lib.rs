//! Retention cleanup for package repositories
//!
//! Lists the packages of a repository, decides which versions to keep under a
//! [`retention::RetentionPolicy`] and deletes the rest.

pub mod action;
pub mod config;
pub mod executor;
pub mod filter;
pub mod logging;
pub mod report;
pub mod repository;
pub mod retention;
