// GitHub API HTTP client.
// Issues the repository-listing and language-breakdown requests and
// classifies rate limiting from response headers.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use reqwest::{
    Client, StatusCode,
    header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, USER_AGENT},
};

use crate::error::{FolioError, Result};

use super::types::{RawRepo, RepoListing};

const GITHUB_API_BASE: &str = "https://api.github.com";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// Number of repositories requested from the listing endpoint.
pub const PROJECTS_PER_PAGE: u32 = 4;

/// Source of project data for the feed controller. Implemented by the real
/// GitHub client and by scripted fakes in tests.
#[allow(async_fn_in_trait)]
pub trait ProjectSource {
    /// List the most recently updated repositories for a user.
    async fn list_repositories(&self, user: &str) -> Result<RepoListing>;

    /// Fetch the language byte counts for one repository. Strictly
    /// best-effort decoration: any failure yields an empty mapping.
    async fn fetch_languages(&self, languages_url: &str) -> BTreeMap<String, u64>;
}

/// GitHub API client. The endpoints used are public, so a token is optional;
/// carrying one raises the rate limit.
pub struct GitHubClient {
    client: Client,
}

impl GitHubClient {
    /// Create a new GitHub client, optionally authenticated.
    pub fn new(token: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );
        headers.insert(USER_AGENT, HeaderValue::from_static("folio-tui"));

        if let Some(token) = token {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", token))
                    .map_err(|e| FolioError::Other(e.to_string()))?,
            );
        }

        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(FolioError::Api)?;

        Ok(Self { client })
    }
}

impl ProjectSource for GitHubClient {
    async fn list_repositories(&self, user: &str) -> Result<RepoListing> {
        let url = format!("{}/users/{}/repos", GITHUB_API_BASE, user);
        let per_page = PROJECTS_PER_PAGE.to_string();
        let params = [("sort", "updated"), ("per_page", per_page.as_str())];
        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(FolioError::Api)?;

        match response.status() {
            status if status.is_success() => {
                let repos: Vec<RawRepo> = response.json().await.map_err(FolioError::Api)?;
                Ok(RepoListing::Success(repos))
            }
            StatusCode::FORBIDDEN if remaining_is_zero(response.headers()) => {
                Ok(RepoListing::RateLimited {
                    reset: reset_from_headers(response.headers()),
                })
            }
            status => Ok(RepoListing::HttpError(status.as_u16())),
        }
    }

    async fn fetch_languages(&self, languages_url: &str) -> BTreeMap<String, u64> {
        let response = match self.client.get(languages_url).send().await {
            Ok(response) if response.status().is_success() => response,
            _ => return BTreeMap::new(),
        };
        response.json().await.unwrap_or_default()
    }
}

/// Whether the rate limit headers report an exhausted quota.
fn remaining_is_zero(headers: &HeaderMap) -> bool {
    headers
        .get("x-ratelimit-remaining")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|remaining| remaining == 0)
}

/// Rate limit reset instant from headers (epoch seconds).
fn reset_from_headers(headers: &HeaderMap) -> Option<DateTime<Utc>> {
    let reset = headers
        .get("x-ratelimit-reset")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<i64>().ok())?;
    DateTime::from_timestamp(reset, 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_remaining_is_zero() {
        assert!(remaining_is_zero(&headers(&[("x-ratelimit-remaining", "0")])));
        assert!(!remaining_is_zero(&headers(&[(
            "x-ratelimit-remaining",
            "12"
        )])));
        assert!(!remaining_is_zero(&headers(&[])));
        assert!(!remaining_is_zero(&headers(&[(
            "x-ratelimit-remaining",
            "soon"
        )])));
    }

    #[test]
    fn test_reset_from_headers() {
        let reset = reset_from_headers(&headers(&[("x-ratelimit-reset", "1700000000")])).unwrap();
        assert_eq!(reset.timestamp(), 1_700_000_000);

        assert!(reset_from_headers(&headers(&[])).is_none());
        assert!(reset_from_headers(&headers(&[("x-ratelimit-reset", "later")])).is_none());
    }
}
