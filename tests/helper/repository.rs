//! Repository test utilities

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use pkg_retention::repository::{PackageRepository, RepositoryError};
use pkg_retention::retention::PackageRecord;

/// Package record uploaded at a fixed date
pub fn record(filename: &str, version: &str) -> PackageRecord {
    record_at(filename, version, "2022-05-01T10:00:00Z")
}

pub fn record_at(filename: &str, version: &str, created_at: &str) -> PackageRecord {
    PackageRecord {
        filename: filename.to_string(),
        version: version.to_string(),
        created_at: created_at.parse().unwrap(),
        delete_handle: format!("/api/v1/repos/rabbitmq/erlang/{}", filename),
    }
}

/// Repository serving a fixed inventory and recording deletions
#[derive(Default)]
pub struct InMemoryRepository {
    packages: Vec<PackageRecord>,
    failing: HashSet<String>,
    unavailable: bool,
    deleted: Mutex<Vec<String>>,
}

impl InMemoryRepository {
    pub fn new(packages: Vec<PackageRecord>) -> Self {
        Self {
            packages,
            ..Default::default()
        }
    }

    /// Make deletion of this file fail
    pub fn failing_on(mut self, filename: &str) -> Self {
        self.failing.insert(filename.to_string());
        self
    }

    /// Make listing fail
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// File names deleted so far, sorted
    pub fn deleted(&self) -> Vec<String> {
        let mut deleted = self.deleted.lock().unwrap().clone();
        deleted.sort();
        deleted
    }
}

#[async_trait]
impl PackageRepository for InMemoryRepository {
    async fn list_packages(&self) -> Result<Vec<PackageRecord>, RepositoryError> {
        if self.unavailable {
            return Err(RepositoryError::UnexpectedStatus {
                status: 503,
                url: "http://localhost/rabbitmq/erlang/packages.json".to_string(),
            });
        }
        Ok(self.packages.clone())
    }

    async fn delete_package(&self, record: &PackageRecord) -> Result<(), RepositoryError> {
        if self.failing.contains(&record.filename) {
            return Err(RepositoryError::UnexpectedStatus {
                status: 500,
                url: format!("http://localhost{}", record.delete_handle),
            });
        }
        self.deleted.lock().unwrap().push(record.filename.clone());
        Ok(())
    }
}
