//! Access to the package repository holding the artifacts
//!
//! # Modules
//!
//! - [`error`]: Error type for listing and deletion
//! - [`packagecloud`]: Packagecloud API implementation with Link-header pagination
//! - [`probe`]: Outbound connectivity check

#[cfg(test)]
use mockall::automock;

pub mod error;
pub mod packagecloud;
pub mod probe;

pub use error::RepositoryError;
pub use packagecloud::PackagecloudRepository;

use crate::retention::types::PackageRecord;

/// Trait for listing and deleting the packages of a repository
#[cfg_attr(test, automock)]
#[async_trait::async_trait]
pub trait PackageRepository: Send + Sync {
    /// Lists every package of the repository, following pagination
    ///
    /// # Returns
    /// * `Ok(Vec<PackageRecord>)` - The complete inventory
    /// * `Err(RepositoryError)` - If any page could not be fetched; a partial
    ///   inventory is never returned
    async fn list_packages(&self) -> Result<Vec<PackageRecord>, RepositoryError>;

    /// Deletes one package
    ///
    /// Deleting a package that is already gone succeeds.
    async fn delete_package(&self, record: &PackageRecord) -> Result<(), RepositoryError>;
}
