// Project feed controller.
// Orchestrates the cache store and the GitHub fetcher into one render
// outcome per invocation. Every exit path renders something; cached data is
// always preferred over a hard error.

use std::time::Duration;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::sync::mpsc::UnboundedSender;

use crate::cache::{CacheStore, CachedProjects};
use crate::github::{
    PROJECTS_PER_PAGE, ProjectSource, ProjectSummary, RepoListing, filter_projects,
};

use super::console::ConsoleMessage;

/// Number of placeholder cards shown while fetching.
pub const SKELETON_CARDS: usize = 4;

/// Minimum perceived loading interval after the skeleton appears.
const MIN_LOADING_DELAY: Duration = Duration::from_millis(300);

/// Non-fatal staleness notice rendered above the cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// Rate limited, rendering the (possibly stale) cache instead.
    StaleCacheRateLimit,
    /// Fetch failed, rendering the (possibly stale) cache instead.
    StaleCacheError,
}

/// User-facing error banner.
#[derive(Debug, Clone)]
pub enum ErrorKind {
    /// Provider quota exhausted and no cache to fall back on. The reset
    /// instant is formatted at draw time so it follows the active language.
    RateLimited { reset: Option<DateTime<Utc>> },
    /// Anything else, with a pointer at the external profile.
    Generic { profile_url: String },
}

/// Instruction for the rendering collaborator.
#[derive(Debug, Clone)]
pub enum RenderInstruction {
    Skeleton(usize),
    ProjectCards(Vec<ProjectSummary>),
    WarningBanner(WarningKind),
    ErrorBanner(ErrorKind),
    EmptyState,
}

/// Event emitted by the feed task.
#[derive(Debug, Clone)]
pub enum FeedEvent {
    Render(RenderInstruction),
    Log(ConsoleMessage),
}

/// Terminal state of one controller invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedState {
    FreshHit,
    LiveSuccess,
    RateLimitedStaleCache,
    RateLimitedNoCache,
    ErrorStaleCache,
    ErrorNoCache,
    Empty,
}

/// Run the feed once: check the cache, fetch live if needed, fall back per
/// policy, and emit render instructions along the way.
pub async fn load_projects<S: ProjectSource>(
    source: &S,
    cache: &CacheStore,
    user: &str,
    events: &UnboundedSender<FeedEvent>,
) -> FeedState {
    let now_ms = Utc::now().timestamp_millis();
    let cached = cache.read();

    if let Some(entry) = &cached {
        if cache.is_fresh(entry, now_ms) {
            render(events, RenderInstruction::ProjectCards(entry.projects.clone()));
            return FeedState::FreshHit;
        }
    }

    render(events, RenderInstruction::Skeleton(SKELETON_CARDS));
    tokio::time::sleep(MIN_LOADING_DELAY).await;

    let listing = match source.list_repositories(user).await {
        Ok(listing) => listing,
        Err(e) => {
            log(events, ConsoleMessage::warn(format!("Project fetch failed: {}", e)));
            return fallback_after_error(cached, user, events);
        }
    };

    match listing {
        RepoListing::RateLimited { reset } => {
            if let Some(entry) = cached {
                log(
                    events,
                    ConsoleMessage::warn("GitHub rate limit hit, rendering cached projects"),
                );
                render(events, RenderInstruction::ProjectCards(entry.projects));
                render(
                    events,
                    RenderInstruction::WarningBanner(WarningKind::StaleCacheRateLimit),
                );
                FeedState::RateLimitedStaleCache
            } else {
                log(
                    events,
                    ConsoleMessage::warn("GitHub rate limit hit with no cached projects"),
                );
                render(
                    events,
                    RenderInstruction::ErrorBanner(ErrorKind::RateLimited { reset }),
                );
                FeedState::RateLimitedNoCache
            }
        }
        RepoListing::HttpError(status) => {
            log(
                events,
                ConsoleMessage::warn(format!("Project listing returned HTTP {}", status)),
            );
            fallback_after_error(cached, user, events)
        }
        RepoListing::Success(raw) => {
            let filtered = filter_projects(raw, PROJECTS_PER_PAGE as usize);
            if filtered.is_empty() {
                render(events, RenderInstruction::EmptyState);
                return FeedState::Empty;
            }

            // Per-repo language fetches run concurrently; join_all keeps the
            // results in repo order regardless of completion order, and each
            // failure degrades to an empty mapping in the fetcher.
            let languages =
                join_all(filtered.iter().map(|repo| source.fetch_languages(&repo.languages_url)))
                    .await;

            let projects: Vec<ProjectSummary> = filtered
                .into_iter()
                .zip(languages)
                .map(|(raw, languages)| ProjectSummary::from_raw(raw, languages))
                .collect();

            if let Err(e) = cache.write(&projects, now_ms) {
                log(
                    events,
                    ConsoleMessage::warn(format!("Could not write project cache: {}", e)),
                );
            }

            render(events, RenderInstruction::ProjectCards(projects));
            FeedState::LiveSuccess
        }
    }
}

/// Stale-cache fallback for transport and HTTP errors. Without a cache the
/// generic banner points at the external profile.
fn fallback_after_error(
    cached: Option<CachedProjects>,
    user: &str,
    events: &UnboundedSender<FeedEvent>,
) -> FeedState {
    if let Some(entry) = cached {
        render(events, RenderInstruction::ProjectCards(entry.projects));
        render(
            events,
            RenderInstruction::WarningBanner(WarningKind::StaleCacheError),
        );
        FeedState::ErrorStaleCache
    } else {
        render(
            events,
            RenderInstruction::ErrorBanner(ErrorKind::Generic {
                profile_url: format!("https://github.com/{}", user),
            }),
        );
        FeedState::ErrorNoCache
    }
}

fn render(events: &UnboundedSender<FeedEvent>, instruction: RenderInstruction) {
    let _ = events.send(FeedEvent::Render(instruction));
}

fn log(events: &UnboundedSender<FeedEvent>, message: ConsoleMessage) {
    let _ = events.send(FeedEvent::Log(message));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{FolioError, Result};
    use crate::github::RawRepo;
    use chrono::TimeZone;
    use std::collections::{BTreeMap, HashMap};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;
    use tokio::sync::mpsc::{self, UnboundedReceiver};

    /// Scripted fetcher with controllable per-repo completion timing.
    struct FakeSource {
        response: FakeResponse,
        list_calls: AtomicUsize,
        languages: HashMap<String, BTreeMap<String, u64>>,
        delays_ms: HashMap<String, u64>,
    }

    enum FakeResponse {
        Listing(RepoListing),
        Transport,
    }

    impl FakeSource {
        fn new(response: FakeResponse) -> Self {
            Self {
                response,
                list_calls: AtomicUsize::new(0),
                languages: HashMap::new(),
                delays_ms: HashMap::new(),
            }
        }
    }

    impl ProjectSource for FakeSource {
        async fn list_repositories(&self, _user: &str) -> Result<RepoListing> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                FakeResponse::Listing(listing) => Ok(listing.clone()),
                FakeResponse::Transport => Err(FolioError::Other("connection refused".into())),
            }
        }

        async fn fetch_languages(&self, languages_url: &str) -> BTreeMap<String, u64> {
            if let Some(ms) = self.delays_ms.get(languages_url) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
            self.languages.get(languages_url).cloned().unwrap_or_default()
        }
    }

    fn raw(name: &str, fork: bool, private: bool) -> RawRepo {
        RawRepo {
            name: name.to_string(),
            html_url: format!("https://github.com/u/{}", name),
            description: Some(format!("{} description", name)),
            stargazers_count: 1,
            forks_count: 0,
            fork,
            private,
            updated_at: Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap(),
            languages_url: format!("https://api.github.com/repos/u/{}/languages", name),
        }
    }

    fn project(name: &str) -> ProjectSummary {
        ProjectSummary::from_raw(raw(name, false, false), BTreeMap::new())
    }

    fn drain(mut rx: UnboundedReceiver<FeedEvent>) -> Vec<RenderInstruction> {
        let mut instructions = Vec::new();
        while let Ok(event) = rx.try_recv() {
            if let FeedEvent::Render(instruction) = event {
                instructions.push(instruction);
            }
        }
        instructions
    }

    fn card_names(instruction: &RenderInstruction) -> Vec<String> {
        match instruction {
            RenderInstruction::ProjectCards(projects) => {
                projects.iter().map(|p| p.name.clone()).collect()
            }
            other => panic!("expected ProjectCards, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_scenario_live_fetch_filters_forks_and_private() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let source = FakeSource::new(FakeResponse::Listing(RepoListing::Success(vec![
            raw("keep-1", false, false),
            raw("forked", true, false),
            raw("secret", false, true),
            raw("forked-secret", true, true),
            raw("keep-2", false, false),
        ])));
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::LiveSuccess);
        let instructions = drain(rx);
        assert!(matches!(instructions[0], RenderInstruction::Skeleton(4)));
        assert_eq!(
            card_names(instructions.last().unwrap()),
            vec!["keep-1", "keep-2"]
        );
    }

    #[tokio::test]
    async fn test_scenario_fresh_cache_skips_network() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let now_ms = Utc::now().timestamp_millis();
        // 10 minutes old, TTL is 60.
        cache
            .write(&[project("cached-a"), project("cached-b")], now_ms - 10 * 60 * 1000)
            .unwrap();

        let source = FakeSource::new(FakeResponse::Transport);
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::FreshHit);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 0);
        let instructions = drain(rx);
        assert_eq!(instructions.len(), 1);
        assert_eq!(card_names(&instructions[0]), vec!["cached-a", "cached-b"]);
    }

    #[tokio::test]
    async fn test_scenario_rate_limited_without_cache_carries_reset() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let reset = Utc::now() + chrono::Duration::seconds(1500);
        let source = FakeSource::new(FakeResponse::Listing(RepoListing::RateLimited {
            reset: Some(reset),
        }));
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::RateLimitedNoCache);
        let instructions = drain(rx);
        match instructions.last().unwrap() {
            RenderInstruction::ErrorBanner(ErrorKind::RateLimited { reset: Some(at) }) => {
                assert_eq!(*at, reset);
            }
            other => panic!("expected rate limit banner, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stale_cache_beats_rate_limit_banner() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let now_ms = Utc::now().timestamp_millis();
        // Two hours old: stale, but still preferred over the hard error.
        cache
            .write(&[project("old-but-gold")], now_ms - 2 * 60 * 60 * 1000)
            .unwrap();

        let source = FakeSource::new(FakeResponse::Listing(RepoListing::RateLimited {
            reset: None,
        }));
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::RateLimitedStaleCache);
        let instructions = drain(rx);
        assert!(
            !instructions
                .iter()
                .any(|i| matches!(i, RenderInstruction::ErrorBanner(_)))
        );
        assert!(instructions.iter().any(|i| matches!(
            i,
            RenderInstruction::WarningBanner(WarningKind::StaleCacheRateLimit)
        )));
        assert!(
            instructions
                .iter()
                .any(|i| matches!(i, RenderInstruction::ProjectCards(_)))
        );
    }

    #[tokio::test]
    async fn test_transport_error_falls_back_to_stale_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let now_ms = Utc::now().timestamp_millis();
        cache
            .write(&[project("still-here")], now_ms - 2 * 60 * 60 * 1000)
            .unwrap();

        let source = FakeSource::new(FakeResponse::Transport);
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::ErrorStaleCache);
        let instructions = drain(rx);
        assert!(instructions.iter().any(|i| matches!(
            i,
            RenderInstruction::WarningBanner(WarningKind::StaleCacheError)
        )));
    }

    #[tokio::test]
    async fn test_http_error_without_cache_renders_generic_banner() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let source = FakeSource::new(FakeResponse::Listing(RepoListing::HttpError(502)));
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::ErrorNoCache);
        let instructions = drain(rx);
        match instructions.last().unwrap() {
            RenderInstruction::ErrorBanner(ErrorKind::Generic { profile_url }) => {
                assert_eq!(profile_url, "https://github.com/someone");
            }
            other => panic!("expected generic banner, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_success_with_nothing_qualifying_renders_empty_state() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let source = FakeSource::new(FakeResponse::Listing(RepoListing::Success(vec![
            raw("forked", true, false),
            raw("secret", false, true),
        ])));
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::Empty);
        let instructions = drain(rx);
        assert!(matches!(
            instructions.last().unwrap(),
            RenderInstruction::EmptyState
        ));
    }

    #[tokio::test]
    async fn test_language_fetch_completion_order_does_not_reorder_cards() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());

        let repos = vec![
            raw("first", false, false),
            raw("second", false, false),
            raw("third", false, false),
            raw("fourth", false, false),
        ];
        let mut source = FakeSource::new(FakeResponse::Listing(RepoListing::Success(repos)));
        // Completion order is the reverse of repo order.
        for (idx, name) in ["first", "second", "third", "fourth"].iter().enumerate() {
            let url = format!("https://api.github.com/repos/u/{}/languages", name);
            source.delays_ms.insert(url.clone(), (4 - idx as u64) * 20);
            source
                .languages
                .insert(url, BTreeMap::from([(name.to_string(), idx as u64 + 1)]));
        }
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        assert_eq!(state, FeedState::LiveSuccess);
        let instructions = drain(rx);
        match instructions.last().unwrap() {
            RenderInstruction::ProjectCards(projects) => {
                let names: Vec<&str> = projects.iter().map(|p| p.name.as_str()).collect();
                assert_eq!(names, vec!["first", "second", "third", "fourth"]);
                // Each card kept its own language map.
                for project in projects {
                    assert!(project.languages.contains_key(&project.name));
                }
            }
            other => panic!("expected ProjectCards, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_live_success_writes_cache() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let source = FakeSource::new(FakeResponse::Listing(RepoListing::Success(vec![raw(
            "fresh", false, false,
        )])));
        let (tx, _rx) = mpsc::unbounded_channel();

        load_projects(&source, &cache, "someone", &tx).await;

        let cached = cache.read().unwrap();
        assert_eq!(cached.projects.len(), 1);
        assert_eq!(cached.projects[0].name, "fresh");
    }

    #[tokio::test]
    async fn test_corrupt_cache_is_treated_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let cache = CacheStore::new(temp_dir.path().to_path_buf());
        let now_ms = Utc::now().timestamp_millis();
        cache.write(&[project("x")], now_ms).unwrap();
        std::fs::write(
            temp_dir.path().join("github_projects_cache.json"),
            "not json",
        )
        .unwrap();

        let source = FakeSource::new(FakeResponse::Listing(RepoListing::Success(vec![raw(
            "live", false, false,
        )])));
        let (tx, rx) = mpsc::unbounded_channel();

        let state = load_projects(&source, &cache, "someone", &tx).await;

        // Proceeds with the live fetch instead of the fresh-cache short-circuit.
        assert_eq!(state, FeedState::LiveSuccess);
        assert_eq!(source.list_calls.load(Ordering::SeqCst), 1);
        let instructions = drain(rx);
        assert_eq!(card_names(instructions.last().unwrap()), vec!["live"]);
    }
}
