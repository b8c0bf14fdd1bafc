//! Outbound connectivity check used to validate the runner's network setup

use std::time::Duration;

use reqwest::StatusCode;
use tracing::info;

use crate::config::{HTTP_CONNECT_TIMEOUT_SECS, USER_AGENT};
use crate::repository::error::RepositoryError;

/// Issue one GET request and succeed on a 2xx answer
pub async fn check_connectivity(url: &str) -> Result<StatusCode, RepositoryError> {
    info!("Starting test sequence, trying to reach {}", url);

    let client = reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .build()?;

    let status = client.get(url).send().await?.status();

    if !status.is_success() {
        return Err(RepositoryError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    Ok(status)
}
