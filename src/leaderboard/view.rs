use std::sync::Arc;

use serde_json::json;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::api::{ApiError, LeaderboardEntry, LeaderboardQuery, LeaderboardResponse, LeaderboardSource};
use crate::client_log::ClientLogger;
use crate::config::PageConfig;
use crate::leaderboard::mode::LeaderboardMode;

const COMPONENT: &str = "LeaderboardView";
const EVENT_BUFFER: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    SetMode(LeaderboardMode),
    SetCountry(String),
    Refresh,
    Shutdown,
}

/// What the renderer sees. Published as a whole, so `loading` and `entries`
/// always change together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub mode: LeaderboardMode,
    /// Empty for the global board.
    pub country: String,
    pub entries: Vec<LeaderboardEntry>,
    pub loading: bool,
    /// Incremented for every fetch issued.
    pub generation: u64,
}

impl ViewState {
    pub fn new(mode: LeaderboardMode, country: impl Into<String>) -> Self {
        Self {
            mode,
            country: country.into().trim().to_ascii_uppercase(),
            entries: Vec::new(),
            loading: false,
            generation: 0,
        }
    }
}

#[derive(Debug, Error)]
#[error("leaderboard view has shut down")]
pub struct ViewClosed;

/// Cheap, cloneable front door to a running [`LeaderboardView`].
#[derive(Debug, Clone)]
pub struct ViewHandle {
    events: mpsc::Sender<ViewEvent>,
    state: watch::Receiver<ViewState>,
}

impl ViewHandle {
    pub async fn send(&self, event: ViewEvent) -> Result<(), ViewClosed> {
        self.events.send(event).await.map_err(|_| ViewClosed)
    }

    pub async fn set_mode(&self, mode: LeaderboardMode) -> Result<(), ViewClosed> {
        self.send(ViewEvent::SetMode(mode)).await
    }

    pub async fn set_country(&self, country: impl Into<String>) -> Result<(), ViewClosed> {
        self.send(ViewEvent::SetCountry(country.into())).await
    }

    pub async fn refresh(&self) -> Result<(), ViewClosed> {
        self.send(ViewEvent::Refresh).await
    }

    pub async fn shutdown(&self) -> Result<(), ViewClosed> {
        self.send(ViewEvent::Shutdown).await
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    pub fn current(&self) -> ViewState {
        self.state.borrow().clone()
    }
}

struct FetchOutcome {
    generation: u64,
    query: LeaderboardQuery,
    result: Result<LeaderboardResponse, ApiError>,
}

/// Owns the leaderboard state and turns state-change events into fetches.
///
/// Every change supersedes the previous fetch: the in-flight task is aborted
/// and any late result carrying an older generation is dropped, so responses
/// can never land out of order.
pub struct LeaderboardView {
    source: Arc<dyn LeaderboardSource>,
    logger: Arc<ClientLogger>,
    page: PageConfig,
    state: ViewState,
    state_tx: watch::Sender<ViewState>,
    results_tx: mpsc::UnboundedSender<FetchOutcome>,
    in_flight: Option<JoinHandle<()>>,
}

impl LeaderboardView {
    /// Starts the view task. It fetches once immediately, as on mount.
    pub fn spawn(
        source: Arc<dyn LeaderboardSource>,
        logger: Arc<ClientLogger>,
        initial: ViewState,
        page: PageConfig,
    ) -> (ViewHandle, JoinHandle<()>) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (state_tx, state_rx) = watch::channel(initial.clone());
        let (results_tx, results_rx) = mpsc::unbounded_channel();

        let view = LeaderboardView {
            source,
            logger,
            page,
            state: initial,
            state_tx,
            results_tx,
            in_flight: None,
        };
        let task = tokio::spawn(view.run(events_rx, results_rx));

        let handle = ViewHandle {
            events: events_tx,
            state: state_rx,
        };
        (handle, task)
    }

    async fn run(
        mut self,
        mut events: mpsc::Receiver<ViewEvent>,
        mut results: mpsc::UnboundedReceiver<FetchOutcome>,
    ) {
        self.logger.log_component_mount(COMPONENT);
        self.refresh();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    None | Some(ViewEvent::Shutdown) => break,
                    Some(event) => self.handle_event(event),
                },
                Some(outcome) = results.recv() => self.apply(outcome),
            }
        }

        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        self.logger.log_component_unmount(COMPONENT);
    }

    fn handle_event(&mut self, event: ViewEvent) {
        match event {
            ViewEvent::SetMode(mode) => {
                if mode == self.state.mode {
                    debug!(mode = %mode, "Mode unchanged, skipping refresh");
                    return;
                }
                self.logger
                    .log_user_action("select_mode", json!({ "from": self.state.mode, "to": mode }));
                self.state.mode = mode;
                self.refresh();
            }
            ViewEvent::SetCountry(country) => {
                let country = country.trim().to_ascii_uppercase();
                if country == self.state.country {
                    debug!(country, "Country unchanged, skipping refresh");
                    return;
                }
                self.logger.log_user_action(
                    "select_country",
                    json!({ "from": self.state.country, "to": country }),
                );
                self.state.country = country;
                self.refresh();
            }
            ViewEvent::Refresh => self.refresh(),
            ViewEvent::Shutdown => {}
        }
    }

    fn refresh(&mut self) {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
        }

        self.state.generation += 1;
        self.state.loading = true;
        self.publish();

        let generation = self.state.generation;
        let query = LeaderboardQuery::new(self.state.mode, self.state.country.clone())
            .with_page(self.page.limit, self.page.offset);
        let source = Arc::clone(&self.source);
        let results = self.results_tx.clone();

        debug!(generation, query = query.path_and_query(), "Refreshing leaderboard");
        self.in_flight = Some(tokio::spawn(async move {
            let result = source.global(&query).await;
            let _ = results.send(FetchOutcome {
                generation,
                query,
                result,
            });
        }));
    }

    fn apply(&mut self, outcome: FetchOutcome) {
        if outcome.generation != self.state.generation {
            debug!(
                stale = outcome.generation,
                current = self.state.generation,
                "Discarding superseded leaderboard response"
            );
            return;
        }

        self.in_flight = None;
        match outcome.result {
            Ok(response) => self.state.entries = response.entries,
            Err(e) => {
                let response = e.response_body().map(|body| json!(body));
                self.logger
                    .log_api_error("GET", &outcome.query.path_and_query(), &e, response);
                self.state.entries = Vec::new();
            }
        }
        self.state.loading = false;
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.state.clone());
    }
}
