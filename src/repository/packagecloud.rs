//! Packagecloud API repository implementation

use std::time::Duration;

use reqwest::header::LINK;
use reqwest::{RequestBuilder, StatusCode, Url};
use tracing::{debug, info, warn};

use crate::config::{HTTP_CONNECT_TIMEOUT_SECS, PACKAGECLOUD_API_URL, USER_AGENT};
use crate::repository::PackageRepository;
use crate::repository::error::RepositoryError;
use crate::retention::types::PackageRecord;

/// Repository implementation for the Packagecloud API
///
/// Authenticates with the API token as basic auth user and no password.
pub struct PackagecloudRepository {
    client: reqwest::Client,
    base_url: String,
    username: String,
    repository: String,
    token: String,
    package_type: Option<String>,
}

impl PackagecloudRepository {
    /// Creates a new PackagecloudRepository with a custom base URL
    pub fn new(base_url: &str, username: &str, repository: &str, token: &str) -> Self {
        Self {
            client: reqwest::Client::builder()
                .user_agent(USER_AGENT)
                .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
                .build()
                .expect("Failed to create HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            username: username.to_string(),
            repository: repository.to_string(),
            token: token.to_string(),
            package_type: None,
        }
    }

    /// Creates a repository client for packagecloud.io
    pub fn packagecloud(username: &str, repository: &str, token: &str) -> Self {
        Self::new(PACKAGECLOUD_API_URL, username, repository, token)
    }

    /// Restricts the listing to one package type (e.g., "deb", "rpm")
    pub fn with_package_type(mut self, package_type: Option<String>) -> Self {
        self.package_type = package_type;
        self
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(&self.token, None::<&str>)
    }

    fn packages_url(&self) -> Result<Url, RepositoryError> {
        let raw = format!(
            "{}/{}/{}/packages.json",
            self.base_url, self.username, self.repository
        );
        let mut url = parse_url(&raw)?;
        if let Some(package_type) = &self.package_type {
            url.query_pairs_mut().append_pair("filter", package_type);
        }
        Ok(url)
    }

    /// Destroy URLs are absolute paths on the API host
    fn delete_url(&self, delete_handle: &str) -> Result<Url, RepositoryError> {
        parse_url(&self.base_url)?
            .join(delete_handle)
            .map_err(|e| RepositoryError::InvalidUrl {
                url: delete_handle.to_string(),
                reason: e.to_string(),
            })
    }
}

fn parse_url(url: &str) -> Result<Url, RepositoryError> {
    Url::parse(url).map_err(|e| RepositoryError::InvalidUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

/// Extract the `rel="next"` target of a Link header
///
/// e.g. `<https://packagecloud.io/api/v1/repos/a/b/packages.json?page=3>; rel="next"`
pub fn next_link(link_header: &str) -> Option<String> {
    link_header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts.next()?.trim();
        let is_next = parts.any(|param| param.trim() == r#"rel="next""#);
        if !is_next {
            return None;
        }
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

#[async_trait::async_trait]
impl PackageRepository for PackagecloudRepository {
    async fn list_packages(&self) -> Result<Vec<PackageRecord>, RepositoryError> {
        let mut packages = Vec::new();
        let mut next_url = Some(self.packages_url()?);
        let mut page = 0;

        while let Some(url) = next_url.take() {
            page += 1;
            let response = self
                .authorized(self.client.get(url.clone()))
                .send()
                .await?;

            let status = response.status();
            if !status.is_success() {
                warn!("Packagecloud returned status {}: {}", status, url);
                return Err(RepositoryError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_string(),
                });
            }

            next_url = response
                .headers()
                .get(LINK)
                .and_then(|v| v.to_str().ok())
                .and_then(next_link)
                .map(|link| parse_url(&link))
                .transpose()?;

            let records: Vec<PackageRecord> = response.json().await.map_err(|e| {
                warn!("Failed to parse Packagecloud packages response: {}", e);
                RepositoryError::InvalidResponse(e.to_string())
            })?;

            debug!("Fetched {} package(s) from page {}", records.len(), page);
            packages.extend(records);
        }

        info!(
            "Listed {} package(s) from {}/{}",
            packages.len(),
            self.username,
            self.repository
        );
        Ok(packages)
    }

    async fn delete_package(&self, record: &PackageRecord) -> Result<(), RepositoryError> {
        let url = self.delete_url(&record.delete_handle)?;

        let response = self
            .authorized(self.client.delete(url.clone()))
            .send()
            .await?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("{} is already deleted", record.filename);
            return Ok(());
        }

        if !status.is_success() {
            warn!("Unexpected response code {} for {}", status, url);
            return Err(RepositoryError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        Ok(())
    }
}
