//! The interactive search workflow.
//!
//! [`SearchController`] owns the [`Session`] and is the only thing that
//! mutates it. User actions (`input`, `submit`, `select`, ...) change state
//! synchronously and may spawn at most one background task; task results come
//! back through a channel and are applied by [`SearchController::process_next`].
//!
//! Every action that moves the session on bumps a generation counter. Results
//! tagged with an older generation are dropped, so a lookup that was already
//! sent when the user kept typing can finish without clobbering newer state.

use std::{sync::Arc, time::Duration};

use tokio::{
    sync::{mpsc, watch},
    task::JoinHandle,
    time::Instant,
};
use tracing::{debug, warn};

use crate::{
    Config,
    error::ClientError,
    model::{DisplayUnit, PlaceCandidate, WeatherSnapshot},
    provider::{GeocodingClient, WeatherClient},
    session::{SUBMIT_FAILED_MESSAGE, Session, SessionState, WEATHER_FAILED_MESSAGE},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    pub debounce: Duration,
    pub min_query_len: usize,
    pub suggestion_limit: u8,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for SearchOptions {
    fn from(config: &Config) -> Self {
        Self {
            debounce: config.debounce(),
            min_query_len: config.min_query_len,
            suggestion_limit: config.suggestion_limit,
        }
    }
}

#[derive(Debug)]
enum Completion {
    DebounceElapsed { generation: u64 },
    Lookup { generation: u64, result: Result<Vec<PlaceCandidate>, ClientError> },
    Weather { generation: u64, result: Result<WeatherSnapshot, ClientError> },
}

impl Completion {
    fn generation(&self) -> u64 {
        match self {
            Completion::DebounceElapsed { generation }
            | Completion::Lookup { generation, .. }
            | Completion::Weather { generation, .. } => *generation,
        }
    }
}

/// What the current generation is waiting on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pending {
    Debounce,
    /// Lookup started by the debounce timer; failures are silent.
    Suggestions,
    /// Lookup started by an explicit submit; failures are shown.
    Submit,
    Weather,
}

/// Owns one search session. Actions spawn onto the current Tokio runtime, so
/// they must be called from inside one.
pub struct SearchController {
    geocoder: Arc<dyn GeocodingClient>,
    weather: Arc<dyn WeatherClient>,
    options: SearchOptions,
    session: Session,
    generation: u64,
    pending: Option<Pending>,
    timer: Option<JoinHandle<()>>,
    completions_tx: mpsc::UnboundedSender<Completion>,
    completions_rx: mpsc::UnboundedReceiver<Completion>,
    publisher: watch::Sender<Session>,
}

impl SearchController {
    pub fn new(
        geocoder: Arc<dyn GeocodingClient>,
        weather: Arc<dyn WeatherClient>,
        options: SearchOptions,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (publisher, _) = watch::channel(Session::default());

        Self {
            geocoder,
            weather,
            options,
            session: Session::default(),
            generation: 0,
            pending: None,
            timer: None,
            completions_tx,
            completions_rx,
            publisher,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Receiver that observes every published session change.
    pub fn subscribe(&self) -> watch::Receiver<Session> {
        self.publisher.subscribe()
    }

    /// Whether the current session still waits on a timer or request.
    pub fn is_busy(&self) -> bool {
        self.pending.is_some()
    }

    /// A keystroke: `text` is the full content of the search box.
    pub fn input(&mut self, text: impl Into<String>) {
        let generation = self.advance();
        self.session.query = text.into();

        if self.session.is_resolved() {
            debug!("snapshot resolved, ignoring keystroke for lookup purposes");
            self.publish();
            return;
        }

        self.session.state = SessionState::Idle;
        if self.query_is_searchable() {
            self.schedule_lookup(generation);
        }
        self.publish();
    }

    /// Explicit search. Short queries are ignored, as are sessions that are
    /// resolving or showing a place (no search form is on screen then).
    pub fn submit(&mut self) {
        let showing_place = matches!(
            self.session.state,
            SessionState::Resolving(_) | SessionState::Resolved { .. }
        );
        if showing_place || !self.query_is_searchable() {
            debug!(query = %self.session.query, "submit ignored");
            return;
        }

        let generation = self.advance();
        self.dispatch_lookup(generation, Pending::Submit);
    }

    /// Choose a suggestion and start fetching its weather.
    pub fn select(&mut self, candidate: PlaceCandidate) {
        let generation = self.advance();
        let (lat, lon) = (candidate.latitude, candidate.longitude);

        self.session.state = SessionState::Resolving(candidate);
        self.publish();

        let weather = Arc::clone(&self.weather);
        let tx = self.completions_tx.clone();
        debug!(generation, lat, lon, "dispatching weather fetch");
        tokio::spawn(async move {
            let request = tokio::spawn(async move { weather.fetch_by_coordinates(lat, lon).await });
            let result = request.await.unwrap_or_else(|err| Err(ClientError::from(err)));
            let _ = tx.send(Completion::Weather { generation, result });
        });
        self.pending = Some(Pending::Weather);
    }

    /// "Search another location": back to an empty idle session.
    pub fn search_another(&mut self) {
        self.advance();
        self.session.query.clear();
        self.session.state = SessionState::Idle;
        self.publish();
    }

    pub fn toggle_unit(&mut self) {
        self.set_unit(self.session.unit.toggled());
    }

    pub fn set_unit(&mut self, unit: DisplayUnit) {
        if self.session.unit != unit {
            self.session.unit = unit;
            self.publish();
        }
    }

    /// Wait for the next background completion and apply it.
    ///
    /// Returns `true` when the session changed as a result.
    pub async fn process_next(&mut self) -> bool {
        match self.completions_rx.recv().await {
            Some(completion) => self.apply(completion),
            None => false,
        }
    }

    /// Apply completions until the current generation waits on nothing.
    pub async fn settle(&mut self) {
        while self.pending.is_some() {
            self.process_next().await;
        }
    }

    fn apply(&mut self, completion: Completion) -> bool {
        if completion.generation() != self.generation {
            debug!(
                stale = completion.generation(),
                current = self.generation,
                "dropping stale completion"
            );
            return false;
        }

        match completion {
            Completion::DebounceElapsed { generation } => {
                self.timer = None;
                self.dispatch_lookup(generation, Pending::Suggestions);
                false
            }
            Completion::Lookup { result, .. } => {
                let origin = self.pending.take();
                self.session.state = match (result, origin) {
                    (Ok(candidates), _) => SessionState::Suggesting(candidates),
                    (Err(err), Some(Pending::Submit)) => {
                        warn!(error = %err, "geocoding failed on submit");
                        SessionState::Error(SUBMIT_FAILED_MESSAGE.to_string())
                    }
                    (Err(err), _) => {
                        debug!(error = %err, "geocoding failed while typing, showing no suggestions");
                        SessionState::Suggesting(Vec::new())
                    }
                };
                self.publish();
                true
            }
            Completion::Weather { result, .. } => {
                self.pending = None;
                let next = match result {
                    Ok(snapshot) => {
                        let label = match &self.session.state {
                            SessionState::Resolving(candidate) => candidate.label(),
                            _ => None,
                        }
                        .unwrap_or_else(|| snapshot.place_name.clone());
                        self.session.query = label.clone();
                        SessionState::Resolved { snapshot, label }
                    }
                    Err(err) => {
                        warn!(error = %err, "weather fetch failed");
                        SessionState::Error(WEATHER_FAILED_MESSAGE.to_string())
                    }
                };
                self.session.state = next;
                self.publish();
                true
            }
        }
    }

    /// Start a new generation: cancels the debounce timer and forgets
    /// whatever the previous generation was waiting on.
    fn advance(&mut self) -> u64 {
        self.cancel_timer();
        self.pending = None;
        self.generation += 1;
        self.generation
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn query_is_searchable(&self) -> bool {
        self.session.query.trim().chars().count() >= self.options.min_query_len
    }

    fn schedule_lookup(&mut self, generation: u64) {
        let tx = self.completions_tx.clone();
        let delay = self.options.debounce;
        // Deadline is fixed at the keystroke, not when the task first runs.
        let deadline = Instant::now() + delay;

        debug!(generation, ?delay, "scheduling suggestion lookup");
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            let _ = tx.send(Completion::DebounceElapsed { generation });
        }));
        self.pending = Some(Pending::Debounce);
    }

    fn dispatch_lookup(&mut self, generation: u64, origin: Pending) {
        let geocoder = Arc::clone(&self.geocoder);
        let tx = self.completions_tx.clone();
        let query = self.session.query.trim().to_string();
        let limit = self.options.suggestion_limit;

        debug!(generation, query = %query, ?origin, "dispatching geocoding lookup");
        // The request runs in its own task so a panicking client still
        // yields a completion.
        tokio::spawn(async move {
            let request = tokio::spawn(async move { geocoder.lookup(&query, limit).await });
            let result = request.await.unwrap_or_else(|err| Err(ClientError::from(err)));
            let _ = tx.send(Completion::Lookup { generation, result });
        });
        self.pending = Some(origin);
    }

    fn publish(&self) {
        self.publisher.send_replace(self.session.clone());
    }
}

impl Drop for SearchController {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

impl std::fmt::Debug for SearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchController")
            .field("session", &self.session)
            .field("generation", &self.generation)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}
