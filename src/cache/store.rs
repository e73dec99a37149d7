// Cache store for the GitHub project feed.
// Persists the project list and its write timestamp as two independent files,
// mirroring the paired-key layout the feed freshness policy is defined over.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{FolioError, Result};
use crate::github::ProjectSummary;

/// How long a cached project list counts as fresh: 1 hour.
pub const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

const PROJECTS_FILE: &str = "github_projects_cache.json";
const TIMESTAMP_FILE: &str = "github_projects_cache_timestamp";

/// A cached project list together with its write instant.
#[derive(Debug, Clone)]
pub struct CachedProjects {
    pub projects: Vec<ProjectSummary>,
    /// Epoch milliseconds at the time of the write.
    pub written_at_ms: i64,
}

/// Filesystem-backed store for the project feed cache.
pub struct CacheStore {
    dir: PathBuf,
}

impl CacheStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Open the store at the platform cache directory.
    pub fn open() -> Result<Self> {
        let dir = super::paths::cache_dir().ok_or(FolioError::NoCacheDir)?;
        Ok(Self::new(dir))
    }

    /// Read the cached project list. Returns `None` unless both the list and
    /// its timestamp are present and parse; a half-written or corrupt pair is
    /// indistinguishable from an empty cache.
    pub fn read(&self) -> Option<CachedProjects> {
        let raw = fs::read_to_string(self.dir.join(PROJECTS_FILE)).ok()?;
        let projects: Vec<ProjectSummary> = serde_json::from_str(&raw).ok()?;

        let raw_ts = fs::read_to_string(self.dir.join(TIMESTAMP_FILE)).ok()?;
        let written_at_ms: i64 = raw_ts.trim().parse().ok()?;

        Some(CachedProjects {
            projects,
            written_at_ms,
        })
    }

    /// Persist the project list and the write instant. The list is written
    /// before the timestamp so an interrupted write leaves the pair stale or
    /// absent, never fresh-looking.
    pub fn write(&self, projects: &[ProjectSummary], now_ms: i64) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(projects)?;
        write_atomic(&self.dir.join(PROJECTS_FILE), json.as_bytes())?;
        write_atomic(&self.dir.join(TIMESTAMP_FILE), now_ms.to_string().as_bytes())?;

        Ok(())
    }

    /// Check whether a cached entry is still fresh at `now_ms`.
    pub fn is_fresh(&self, entry: &CachedProjects, now_ms: i64) -> bool {
        now_ms.saturating_sub(entry.written_at_ms) < CACHE_TTL.as_millis() as i64
    }
}

/// Write atomically via a temp file.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    fn sample_project(name: &str) -> ProjectSummary {
        ProjectSummary {
            name: name.to_string(),
            description: Some("a project".to_string()),
            html_url: format!("https://github.com/someone/{}", name),
            stargazers_count: 3,
            forks_count: 1,
            updated_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap(),
            languages: BTreeMap::from([("Rust".to_string(), 1024u64)]),
        }
    }

    #[test]
    fn test_write_then_read_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());

        let projects = vec![sample_project("alpha"), sample_project("beta")];
        store.write(&projects, 1_000_000).unwrap();

        let cached = store.read().unwrap();
        assert_eq!(cached.written_at_ms, 1_000_000);
        assert_eq!(cached.projects.len(), 2);
        assert_eq!(cached.projects[0].name, "alpha");
        assert_eq!(cached.projects[1].name, "beta");
        assert_eq!(cached.projects[0].languages.get("Rust"), Some(&1024));
    }

    #[test]
    fn test_freshness_boundaries() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());

        let t = 1_700_000_000_000i64;
        store.write(&[sample_project("alpha")], t).unwrap();
        let cached = store.read().unwrap();

        // TTL is 3_600_000 ms, strict comparison.
        assert!(store.is_fresh(&cached, t + 3_599_999));
        assert!(!store.is_fresh(&cached, t + 3_600_000));
        assert!(!store.is_fresh(&cached, t + 3_600_001));
    }

    #[test]
    fn test_missing_cache_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());
        assert!(store.read().is_none());
    }

    #[test]
    fn test_corrupt_list_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());

        store.write(&[sample_project("alpha")], 42).unwrap();
        fs::write(temp_dir.path().join(PROJECTS_FILE), "{not json").unwrap();

        assert!(store.read().is_none());
    }

    #[test]
    fn test_list_without_timestamp_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());

        store.write(&[sample_project("alpha")], 42).unwrap();
        fs::remove_file(temp_dir.path().join(TIMESTAMP_FILE)).unwrap();

        assert!(store.read().is_none());
    }

    #[test]
    fn test_garbage_timestamp_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());

        store.write(&[sample_project("alpha")], 42).unwrap();
        fs::write(temp_dir.path().join(TIMESTAMP_FILE), "soon").unwrap();

        assert!(store.read().is_none());
    }

    #[test]
    fn test_rewrite_supersedes_previous_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = CacheStore::new(temp_dir.path().to_path_buf());

        store.write(&[sample_project("alpha")], 1).unwrap();
        store.write(&[sample_project("beta")], 2).unwrap();

        let cached = store.read().unwrap();
        assert_eq!(cached.written_at_ms, 2);
        assert_eq!(cached.projects[0].name, "beta");
    }
}
