use std::time::Duration;

use anyhow::Result;
use serde::Deserialize;
use thiserror::Error;

/// Default remote user directory.
pub const DEFAULT_ENDPOINT: &str = "https://frontend-test-middle.vercel.app/api/users";

/// Fixed page size requested from the endpoint.
pub const PAGE_SIZE: u32 = 50;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// One selectable user record from the remote source.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: u64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub job: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        format!("{} {}", self.last_name, self.first_name)
    }

    pub fn job_label(&self) -> &str {
        self.job.as_deref().unwrap_or("No Job")
    }
}

/// Range/total metadata accompanying one page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageMeta {
    pub from: u32,
    pub to: u32,
    pub total: u32,
}

/// One batch of users plus its pagination metadata.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PageResponse {
    pub data: Vec<User>,
    pub meta: PageMeta,
}

/// Why a page fetch failed. All variants are logged and otherwise silent.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server returned {0}")]
    Status(reqwest::StatusCode),
    #[error("malformed page response: {0}")]
    Malformed(#[source] serde_json::Error),
}

/// Read-only client for the paginated users endpoint.
#[derive(Clone)]
pub struct UserClient {
    http: reqwest::blocking::Client,
    endpoint: String,
}

impl UserClient {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("userpick/", env!("CARGO_PKG_VERSION")))
            .timeout(FETCH_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Fetch one page of users. Pages are 1-based and sized `PAGE_SIZE`.
    pub fn fetch_page(&self, page: u32) -> Result<PageResponse, FetchError> {
        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("page", page), ("limit", PAGE_SIZE)])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        // Decode through serde_json so missing/mistyped fields are reported
        // as a malformed page rather than a partial value.
        let body = response.bytes()?;
        serde_json::from_slice(&body).map_err(FetchError::Malformed)
    }
}
