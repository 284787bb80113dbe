//! Dashboard runtime.
//!
//! DESIGN
//! ======
//! One task owns the [`SessionStore`] and is therefore its only writer. It
//! selects over:
//!
//! - decoded events from the current connection instance
//! - user actions from the input side (stdin in the CLI)
//! - a one-second clock tick
//! - state changes of the current link
//! - the reconnect timer, armed only while the link is down
//! - completions of background network work
//!
//! Every change is pushed to the [`Surface`] as it happens. Maze changes are
//! projected at that moment, so the surface always gets a finished scene.
//!
//! Nothing that touches the network is awaited inside the loop. Hydration,
//! the stream handshake with its status refresh, and log resets run as
//! spawned tasks whose results come back through a select arm. A stalled
//! controller therefore never holds up `Quit` or the clock.
//!
//! LIFECYCLE
//! =========
//! `run` hydrates from the REST collaborators, then opens the stream and
//! re-fetches the rover status. When a link closes the next instance is
//! opened after the policy's backoff, at most `reconnect.attempts` times per
//! session. `Quit` (or the action channel closing) tears down: pending
//! network work is aborted, the link is closed if still open, its final
//! disconnect notice is applied, and the store is handed back.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use std::time::Duration;

use maze::Projector;
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, info, warn};
use wire::{Command, Decoder, Event, LogEntry};

use crate::api::{ApiClient, ApiError, LogsCleared};
use crate::clock;
use crate::config::DashboardConfig;
use crate::conn::{ConnError, Controller, LinkState};
use crate::state::{Change, ConnectionState, SessionStore};
use crate::surface::Surface;

const EVENT_BUFFER: usize = 256;
const CLOCK_PERIOD: Duration = Duration::from_secs(1);

// =============================================================================
// USER ACTIONS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserAction {
    Send(Command),
    ResetLogs,
    Quit,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ActionError {
    #[error("unknown action `{0}` (try start, stop, say <text>, maze <id>, reset, quit)")]
    Unknown(String),
    #[error("`{0}` needs an argument")]
    MissingArgument(&'static str),
}

impl UserAction {
    /// Parse one input line. Blank lines yield `Ok(None)`.
    ///
    /// # Errors
    ///
    /// [`ActionError`] for an unknown verb or a verb missing its argument.
    pub fn parse(line: &str) -> Result<Option<Self>, ActionError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();
        let action = match verb.to_ascii_lowercase().as_str() {
            "start" => Self::Send(Command::Start),
            "stop" => Self::Send(Command::Stop),
            "say" | "message" => {
                if rest.is_empty() {
                    return Err(ActionError::MissingArgument("say"));
                }
                Self::Send(Command::Message { message: rest.to_owned() })
            }
            "maze" => {
                if rest.is_empty() {
                    return Err(ActionError::MissingArgument("maze"));
                }
                Self::Send(Command::MazeId { maze_id: rest.to_owned() })
            }
            "reset" => Self::ResetLogs,
            "quit" | "exit" => Self::Quit,
            other => return Err(ActionError::Unknown(other.to_owned())),
        };
        Ok(Some(action))
    }
}

// =============================================================================
// BACKGROUND WORK
// =============================================================================

struct Hydration {
    logs: Result<Vec<LogEntry>, ApiError>,
    history: Result<Vec<String>, ApiError>,
}

async fn fetch_hydration(api: ApiClient) -> Hydration {
    let (logs, history) = tokio::join!(api.fetch_logs(), api.fetch_maze_history());
    Hydration { logs, history }
}

/// A finished open attempt. On success `outcome` carries the rover flag
/// re-fetched right after the handshake.
struct Opened {
    controller: Controller,
    outcome: Result<bool, ConnError>,
}

async fn open_link(mut controller: Controller, api: ApiClient, events: mpsc::Sender<Event>) -> Opened {
    if let Err(error) = controller.open(events).await {
        return Opened { controller, outcome: Err(error) };
    }
    let connected = match api.fetch_connection_status().await {
        Ok(connected) => connected,
        Err(error) => {
            warn!(%error, "dashboard: connection status unavailable");
            false
        }
    };
    Opened { controller, outcome: Ok(connected) }
}

/// Await a pending task; never resolves when there is none.
async fn join_pending<T>(task: &mut Option<JoinHandle<T>>) -> Result<T, JoinError> {
    match task {
        Some(handle) => handle.await,
        None => std::future::pending().await,
    }
}

fn abort_pending<T>(task: &mut Option<JoinHandle<T>>, what: &str) {
    if let Some(handle) = task.take() {
        debug!(what, "dashboard: aborting pending work");
        handle.abort();
    }
}

/// Next state of the current link; never resolves without one.
async fn next_link_state(link: &mut Option<watch::Receiver<LinkState>>) -> LinkState {
    let Some(link) = link else {
        return std::future::pending().await;
    };
    if link.changed().await.is_err() {
        return LinkState::Closed;
    }
    *link.borrow_and_update()
}

// =============================================================================
// DASHBOARD
// =============================================================================

pub struct Dashboard<S: Surface> {
    config: DashboardConfig,
    api: ApiClient,
    store: SessionStore,
    projector: Projector,
    surface: S,
}

impl<S: Surface> Dashboard<S> {
    pub fn new(config: DashboardConfig, api: ApiClient, surface: S) -> Self {
        let store = SessionStore::new(config.variant, config.log_capacity);
        let projector = Projector::new(config.cell_size);
        Self { config, api, store, projector, surface }
    }

    /// Run until `Quit` or until `actions` closes. Returns the final store
    /// and the surface.
    pub async fn run(mut self, mut actions: mpsc::Receiver<UserAction>) -> (SessionStore, S) {
        self.render_all();

        let (events_tx, mut events_rx) = mpsc::channel(EVENT_BUFFER);
        let mut hydrating = Some(tokio::spawn(fetch_hydration(self.api.clone())));
        let mut opening: Option<JoinHandle<Opened>> = None;
        let mut resetting: Option<JoinHandle<Result<LogsCleared, ApiError>>> = None;
        let mut controller: Option<Controller> = None;
        let mut link: Option<watch::Receiver<LinkState>> = None;
        let mut reconnect_at: Option<Instant> = None;
        let mut retries = 0_u32;

        let mut ticker = tokio::time::interval(CLOCK_PERIOD);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                Some(event) = events_rx.recv() => self.apply(event),
                action = actions.recv() => match action {
                    Some(UserAction::Send(command)) => match &controller {
                        Some(controller) => {
                            controller.send(&command);
                        }
                        None => debug!(kind = command.kind(), "dashboard: send ignored, no open link"),
                    },
                    Some(UserAction::ResetLogs) => {
                        if resetting.is_some() {
                            debug!("dashboard: log reset already in flight");
                        } else {
                            let api = self.api.clone();
                            resetting = Some(tokio::spawn(async move { api.reset_logs().await }));
                        }
                    }
                    Some(UserAction::Quit) | None => break,
                },
                _ = ticker.tick() => self.surface.tick(&clock::now_hms()),
                joined = join_pending(&mut hydrating), if hydrating.is_some() => {
                    hydrating = None;
                    match joined {
                        Ok(hydration) => self.hydrate(hydration),
                        Err(error) => warn!(%error, "dashboard: hydration task failed"),
                    }
                    opening = Some(self.spawn_open(&events_tx));
                }
                joined = join_pending(&mut opening), if opening.is_some() => {
                    opening = None;
                    match joined {
                        Ok(Opened { controller: opened, outcome: Ok(connected) }) => {
                            link = Some(opened.watch());
                            controller = Some(opened);
                            self.apply(Event::ConnectionStatus { connected });
                        }
                        Ok(Opened { controller: failed, outcome: Err(error) }) => {
                            warn!(%error, url = failed.url(), "dashboard: stream unavailable");
                            self.apply(Event::ConnectionStatus { connected: false });
                            reconnect_at = self.next_retry(&mut retries);
                        }
                        Err(error) => {
                            warn!(%error, "dashboard: open task failed");
                            self.apply(Event::ConnectionStatus { connected: false });
                            reconnect_at = self.next_retry(&mut retries);
                        }
                    }
                }
                joined = join_pending(&mut resetting), if resetting.is_some() => {
                    resetting = None;
                    match joined {
                        Ok(Ok(cleared)) => {
                            self.store.reset_log(cleared);
                            self.surface.log_cleared();
                        }
                        Ok(Err(error)) => warn!(%error, "dashboard: log reset refused, keeping log"),
                        Err(error) => warn!(%error, "dashboard: log reset task failed"),
                    }
                }
                state = next_link_state(&mut link), if link.is_some() => {
                    if state == LinkState::Closed {
                        link = None;
                        // The status refresh may have landed after the link's own
                        // disconnect notice.
                        self.apply(Event::ConnectionStatus { connected: false });
                        reconnect_at = self.next_retry(&mut retries);
                    }
                }
                () = tokio::time::sleep_until(reconnect_at.unwrap_or_else(Instant::now)), if reconnect_at.is_some() => {
                    reconnect_at = None;
                    opening = Some(self.spawn_open(&events_tx));
                }
            }
        }

        info!("dashboard: shutting down");
        abort_pending(&mut hydrating, "hydration");
        abort_pending(&mut opening, "open");
        abort_pending(&mut resetting, "log reset");
        if let Some(mut controller) = controller.take() {
            let close = controller.close();
            tokio::pin!(close);
            loop {
                tokio::select! {
                    () = &mut close => break,
                    Some(event) = events_rx.recv() => self.apply(event),
                }
            }
        }
        while let Ok(event) = events_rx.try_recv() {
            self.apply(event);
        }
        (self.store, self.surface)
    }

    /// Start a fresh connection instance in the background.
    fn spawn_open(&self, events: &mpsc::Sender<Event>) -> JoinHandle<Opened> {
        let controller = Controller::new(self.config.ws_url.clone(), Decoder::new(self.config.variant))
            .with_connect_timeout(self.config.http_timeout);
        tokio::spawn(open_link(controller, self.api.clone(), events.clone()))
    }

    fn next_retry(&self, retries: &mut u32) -> Option<Instant> {
        let Some(delay) = self.config.reconnect.delay(*retries) else {
            if self.config.reconnect.attempts > 0 {
                warn!(attempts = self.config.reconnect.attempts, "dashboard: reconnect budget spent");
            }
            return None;
        };
        *retries += 1;
        info!(retry = *retries, ?delay, "dashboard: reconnect scheduled");
        Some(Instant::now() + delay)
    }

    fn hydrate(&mut self, hydration: Hydration) {
        match hydration.logs {
            Ok(entries) => {
                debug!(count = entries.len(), "dashboard: hydrating log");
                for entry in entries {
                    self.apply(Event::Log(entry));
                }
            }
            Err(error) => warn!(%error, "dashboard: log history unavailable"),
        }
        match hydration.history {
            Ok(ids) => self.surface.history(&ids),
            Err(error) => warn!(%error, "dashboard: maze history unavailable"),
        }
    }

    fn apply(&mut self, event: Event) {
        match self.store.apply(event) {
            Change::Connection { changed: true } => self.surface.status(self.store.connection()),
            Change::Connection { changed: false } => {}
            Change::Log { .. } => {
                if let Some(entry) = self.store.latest_log() {
                    self.surface.log(entry);
                }
            }
            Change::Maze => self.render_maze(),
        }
    }

    fn render_all(&mut self) {
        self.surface.tick(&clock::now_hms());
        self.surface.status(ConnectionState::default());
        self.render_maze();
    }

    fn render_maze(&mut self) {
        let scene = self.projector.project(&self.store.maze());
        self.surface.maze(&scene);
    }
}
