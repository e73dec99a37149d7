// GitHub API response types.
// Defines structs for deserializing GitHub REST API responses and the
// assembled project summaries the rest of the app works with.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Repository entry as returned by the repository-listing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawRepo {
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub fork: bool,
    #[serde(default)]
    pub private: bool,
    pub updated_at: DateTime<Utc>,
    pub languages_url: String,
}

/// A repository assembled into a displayable project card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    pub description: Option<String>,
    pub html_url: String,
    pub stargazers_count: u64,
    pub forks_count: u64,
    pub updated_at: DateTime<Utc>,
    /// Language name to byte count. Empty when the per-repo language fetch
    /// failed; never absent.
    #[serde(default)]
    pub languages: BTreeMap<String, u64>,
}

impl ProjectSummary {
    pub fn from_raw(raw: RawRepo, languages: BTreeMap<String, u64>) -> Self {
        Self {
            name: raw.name,
            description: raw.description,
            html_url: raw.html_url,
            stargazers_count: raw.stargazers_count,
            forks_count: raw.forks_count,
            updated_at: raw.updated_at,
            languages,
        }
    }

    /// Languages sorted by byte count descending, for badge display.
    pub fn top_languages(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut langs: Vec<(&str, u64)> = self
            .languages
            .iter()
            .map(|(name, bytes)| (name.as_str(), *bytes))
            .collect();
        langs.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        langs.truncate(limit);
        langs
    }
}

/// Outcome of one repository-listing call.
#[derive(Debug, Clone)]
pub enum RepoListing {
    Success(Vec<RawRepo>),
    RateLimited { reset: Option<DateTime<Utc>> },
    HttpError(u16),
}

/// Filtering policy for the project feed: drop forks and private entries,
/// keep the first `limit` in server order (already sorted by recency).
pub fn filter_projects(repos: Vec<RawRepo>, limit: usize) -> Vec<RawRepo> {
    repos
        .into_iter()
        .filter(|repo| !repo.fork && !repo.private)
        .take(limit)
        .collect()
}
