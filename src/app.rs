// App state and main event loop.
// Manages tabs, the feed task, the typing engine ticks, and keyboard input.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::*;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::cache::CacheStore;
use crate::config::{self, Config};
use crate::github::{GitHubClient, ProjectSummary};
use crate::i18n::Language;
use crate::state::console::{ConsoleMessage, ConsoleState};
use crate::state::feed::{self, ErrorKind, FeedEvent, RenderInstruction, WarningKind};
use crate::state::script::experience_script;
use crate::state::terminal::{Tick, TypingEngine};
use crate::ui;

/// Active tab in the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Projects,
    Experience,
    Console,
}

impl Tab {
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Projects => "Projects",
            Tab::Experience => "Experience",
            Tab::Console => "Console",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Tab::Projects => Tab::Experience,
            Tab::Experience => Tab::Console,
            Tab::Console => Tab::Projects,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            Tab::Projects => Tab::Console,
            Tab::Experience => Tab::Projects,
            Tab::Console => Tab::Experience,
        }
    }
}

/// Current rendering of the Projects tab.
#[derive(Debug, Clone)]
pub enum ProjectsView {
    Loading { skeleton: usize },
    Cards {
        projects: Vec<ProjectSummary>,
        warning: Option<WarningKind>,
    },
    Error(ErrorKind),
    Empty,
}

/// Main application state.
pub struct App {
    pub active_tab: Tab,
    pub language: Language,
    pub github_user: String,
    github_token: Option<String>,
    pub projects: ProjectsView,
    pub console: ConsoleState,
    pub engine: TypingEngine,
    pending_tick: Option<Tick>,
    pub should_quit: bool,
    events_tx: UnboundedSender<FeedEvent>,
    events_rx: UnboundedReceiver<FeedEvent>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            active_tab: Tab::default(),
            language: config.language,
            github_user: config.github_user,
            github_token: config.github_token,
            projects: ProjectsView::Loading {
                skeleton: feed::SKELETON_CARDS,
            },
            console: ConsoleState::default(),
            engine: TypingEngine::new(experience_script(config.language)),
            pending_tick: None,
            should_quit: false,
            events_tx,
            events_rx,
        }
    }

    /// Main event loop.
    pub fn run(&mut self, terminal: &mut Terminal<impl Backend>) -> io::Result<()> {
        self.spawn_feed();
        while !self.should_quit {
            self.drain_feed_events();
            self.advance_terminal();
            terminal.draw(|frame| ui::draw(frame, self))?;
            self.handle_events()?;
        }
        Ok(())
    }

    /// Start one feed run in the background. Emits render instructions and
    /// log lines back over the event channel.
    fn spawn_feed(&mut self) {
        let tx = self.events_tx.clone();
        let user = self.github_user.clone();
        let token = self.github_token.clone();

        tokio::spawn(async move {
            let client = match GitHubClient::new(token.as_deref()) {
                Ok(client) => client,
                Err(e) => {
                    let _ = tx.send(FeedEvent::Log(ConsoleMessage::error(format!(
                        "Could not build GitHub client: {}",
                        e
                    ))));
                    let _ = tx.send(FeedEvent::Render(RenderInstruction::ErrorBanner(
                        ErrorKind::Generic {
                            profile_url: format!("https://github.com/{}", user),
                        },
                    )));
                    return;
                }
            };

            // The feed must still render when no platform cache dir exists.
            let cache = match CacheStore::open() {
                Ok(cache) => cache,
                Err(e) => {
                    let _ = tx.send(FeedEvent::Log(ConsoleMessage::warn(format!(
                        "Falling back to a temporary cache dir: {}",
                        e
                    ))));
                    CacheStore::new(std::env::temp_dir().join("folio-cache"))
                }
            };

            let state = feed::load_projects(&client, &cache, &user, &tx).await;
            let _ = tx.send(FeedEvent::Log(ConsoleMessage::info(format!(
                "Project feed settled: {:?}",
                state
            ))));
        });
    }

    /// Apply pending feed events to the UI state.
    fn drain_feed_events(&mut self) {
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                FeedEvent::Render(instruction) => self.apply_instruction(instruction),
                FeedEvent::Log(message) => {
                    let viewing = self.active_tab == Tab::Console;
                    self.console.push(message, viewing);
                }
            }
        }
    }

    fn apply_instruction(&mut self, instruction: RenderInstruction) {
        match instruction {
            RenderInstruction::Skeleton(count) => {
                self.projects = ProjectsView::Loading { skeleton: count };
            }
            RenderInstruction::ProjectCards(projects) => {
                self.projects = ProjectsView::Cards {
                    projects,
                    warning: None,
                };
            }
            RenderInstruction::WarningBanner(kind) => {
                if let ProjectsView::Cards { warning, .. } = &mut self.projects {
                    *warning = Some(kind);
                }
            }
            RenderInstruction::ErrorBanner(kind) => {
                self.projects = ProjectsView::Error(kind);
            }
            RenderInstruction::EmptyState => {
                self.projects = ProjectsView::Empty;
            }
        }
    }

    /// Fire the typing engine's tick when due.
    fn advance_terminal(&mut self) {
        if let Some(tick) = self.pending_tick {
            let now = Instant::now();
            if now >= tick.due() {
                self.pending_tick = self.engine.advance(&tick, now);
            }
        }
    }

    /// Handle keyboard and other events.
    #[allow(clippy::collapsible_if)]
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(self.poll_timeout())? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('q') => self.should_quit = true,
                        KeyCode::Tab => self.switch_tab(self.active_tab.next()),
                        KeyCode::BackTab => self.switch_tab(self.active_tab.prev()),
                        KeyCode::Char('l') => self.switch_language(),
                        KeyCode::Char('r') => self.refresh_projects(),
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    /// Poll timeout: tight enough for the next terminal tick, otherwise the
    /// usual input cadence.
    fn poll_timeout(&self) -> Duration {
        match self.pending_tick {
            Some(tick) => tick
                .due()
                .saturating_duration_since(Instant::now())
                .min(Duration::from_millis(50)),
            None => Duration::from_millis(100),
        }
    }

    fn switch_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
        match tab {
            // One-shot visibility gate: the run starts the first time the
            // Experience tab is actually shown.
            Tab::Experience => {
                if !self.engine.has_started() {
                    self.pending_tick = Some(self.engine.start(Instant::now()));
                }
            }
            Tab::Console => self.console.mark_read(),
            Tab::Projects => {}
        }
    }

    /// Toggle the display language: persist it and rebuild the terminal
    /// script. With the Experience tab active the run restarts in place (a
    /// tick from the old run becomes a stale no-op); with the tab hidden the
    /// one-shot gate re-arms so the new run waits for the next activation
    /// instead of playing off-screen.
    fn switch_language(&mut self) {
        self.language = self.language.toggle();
        config::save_language(self.language);

        let script = experience_script(self.language);
        if self.engine.has_started() && self.active_tab == Tab::Experience {
            self.pending_tick = Some(self.engine.restart(script, Instant::now()));
        } else {
            self.engine = TypingEngine::new(script);
            self.pending_tick = None;
        }
    }

    /// Re-run the project feed on demand. The event channel is replaced, so
    /// late events from a still-running superseded run land nowhere instead
    /// of overwriting the newer run's render.
    fn refresh_projects(&mut self) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        self.events_tx = events_tx;
        self.events_rx = events_rx;
        self.projects = ProjectsView::Loading {
            skeleton: feed::SKELETON_CARDS,
        };
        self.spawn_feed();
    }
}
