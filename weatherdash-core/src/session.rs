//! The dashboard session: current snapshot, settings, derived view and
//! auto-refresh, driven one event at a time.

use chrono::Utc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    error::{SettingsError, WeatherError},
    geolocation::Geolocator,
    model::{Coordinates, WeatherQuery, WeatherSnapshot},
    provider::WeatherProvider,
    refresh::{RefreshTick, RefreshTimer},
    settings::{SettingUpdate, Settings},
    store::SettingsStore,
    view::{DerivedView, compute_derived_view},
};

const NAME_FAILURE: &str = "Failed to fetch weather data. Please check the city name and try again.";
const POSITION_FAILURE: &str = "Failed to fetch weather data for your location.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Idle,
    Loading,
    Ready,
    Failed,
}

#[derive(Debug)]
pub struct WeatherSession {
    provider: Box<dyn WeatherProvider>,
    settings: SettingsStore,
    phase: SessionPhase,
    snapshot: Option<WeatherSnapshot>,
    view: Option<DerivedView>,
    error: Option<String>,
    refresh: Option<RefreshTimer>,
    generation: u64,
    tick_tx: UnboundedSender<RefreshTick>,
    tick_rx: UnboundedReceiver<RefreshTick>,
}

impl WeatherSession {
    /// An idle session. Refresh timers are spawned on the current tokio runtime.
    pub fn new(provider: Box<dyn WeatherProvider>, settings: SettingsStore) -> Self {
        let (tick_tx, tick_rx) = mpsc::unbounded_channel();
        Self {
            provider,
            settings,
            phase: SessionPhase::Idle,
            snapshot: None,
            view: None,
            error: None,
            refresh: None,
            generation: 0,
            tick_tx,
            tick_rx,
        }
    }

    /// A session that has already requested its default location.
    pub async fn open(provider: Box<dyn WeatherProvider>, settings: SettingsStore) -> Self {
        let mut session = Self::new(provider, settings);
        let default_location = session.settings.active().default_location.clone();
        session.request_by_name(&default_location).await;
        session
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn snapshot(&self) -> Option<&WeatherSnapshot> {
        self.snapshot.as_ref()
    }

    /// Last computed view, kept through failures.
    pub fn view(&self) -> Option<&DerivedView> {
        self.view.as_ref()
    }

    /// The view to render right now; hidden while loading or after a failure.
    pub fn visible_view(&self) -> Option<&DerivedView> {
        match self.phase {
            SessionPhase::Ready => self.view.as_ref(),
            SessionPhase::Idle | SessionPhase::Loading | SessionPhase::Failed => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    pub fn active_settings(&self) -> &Settings {
        self.settings.active()
    }

    pub fn is_refresh_scheduled(&self) -> bool {
        self.refresh.is_some()
    }

    pub fn refresh_period(&self) -> Option<std::time::Duration> {
        self.refresh.as_ref().map(RefreshTimer::period)
    }

    /// Blank names are ignored.
    pub async fn request_by_name(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.run_request(WeatherQuery::Name(name.to_string()), NAME_FAILURE).await;
    }

    pub async fn request_by_coordinates(&mut self, lat: f64, lon: f64) {
        self.run_request(WeatherQuery::Coordinates(Coordinates::new(lat, lon)), POSITION_FAILURE)
            .await;
    }

    pub async fn request_current_location(&mut self, locator: &dyn Geolocator) {
        self.begin_loading();
        match locator.current_position().await {
            Ok(position) => self.request_by_coordinates(position.lat, position.lon).await,
            Err(err) => {
                let message = err.user_message();
                self.fail(message, &WeatherError::Geolocation(err));
            }
        }
    }

    async fn run_request(&mut self, query: WeatherQuery, failure_message: &str) {
        self.begin_loading();
        match self.provider.fetch_current(&query).await {
            Ok(snapshot) => self.ingest(snapshot),
            Err(err) => self.fail(failure_message, &err),
        }
    }

    fn begin_loading(&mut self) {
        self.phase = SessionPhase::Loading;
        self.error = None;
    }

    fn ingest(&mut self, snapshot: WeatherSnapshot) {
        tracing::info!(
            location = %snapshot.location.name,
            condition = %snapshot.current.condition.text,
            "Weather snapshot received"
        );
        self.snapshot = Some(snapshot);
        self.recompute_view();
        self.phase = SessionPhase::Ready;
        self.sync_refresh_timer(true);
    }

    /// The previous snapshot and view stay in place behind the error.
    fn fail(&mut self, message: &str, err: &WeatherError) {
        tracing::warn!(error = %err, "Weather request failed");
        self.phase = SessionPhase::Failed;
        self.error = Some(message.to_string());
    }

    fn recompute_view(&mut self) {
        self.view = self
            .snapshot
            .as_ref()
            .map(|s| compute_derived_view(s, self.settings.active(), Utc::now()));
    }

    pub fn open_settings(&mut self) {
        self.settings.open_editing();
    }

    pub fn update_draft(&mut self, update: SettingUpdate) {
        self.settings.update_draft(update);
    }

    pub fn update_draft_field(&mut self, key: &str, value: &str) -> Result<(), SettingsError> {
        self.settings.update_draft_field(key, value)
    }

    pub fn discard_settings(&mut self) {
        self.settings.discard();
    }

    pub fn commit_settings(&mut self) {
        self.settings.commit();
        self.recompute_view();
        self.sync_refresh_timer(false);
    }

    pub fn reset_settings(&mut self) {
        self.settings.reset_to_defaults();
        self.recompute_view();
        self.sync_refresh_timer(false);
    }

    /// Keep exactly one timer while auto-refresh is on and there is something to
    /// refresh. `restart` replaces a timer even if its period is unchanged.
    fn sync_refresh_timer(&mut self, restart: bool) {
        let wanted = self.snapshot.as_ref().and(self.settings.active().auto_refresh.interval());
        let current = self.refresh.as_ref().map(RefreshTimer::period);

        match (current, wanted) {
            (Some(running), Some(period)) if running == period && !restart => {}
            (_, Some(period)) => {
                if let Some(old) = self.refresh.take() {
                    old.cancel();
                }
                self.generation += 1;
                self.refresh =
                    Some(RefreshTimer::start(self.generation, period, self.tick_tx.clone()));
            }
            (_, None) => {
                if let Some(old) = self.refresh.take() {
                    old.cancel();
                }
            }
        }
    }

    /// Wait for the next tick of the current timer. Pending forever while no
    /// timer is scheduled.
    pub async fn next_refresh_tick(&mut self) -> Option<RefreshTick> {
        self.tick_rx.recv().await
    }

    /// Re-request the current location. Ticks from cancelled timers are dropped.
    pub async fn handle_refresh_tick(&mut self, tick: RefreshTick) {
        if self.refresh.as_ref().map(RefreshTimer::generation) != Some(tick.generation) {
            tracing::debug!(generation = tick.generation, "Ignoring tick from cancelled timer");
            return;
        }
        let Some(name) = self.snapshot.as_ref().map(|s| s.location.name.clone()) else {
            return;
        };
        tracing::debug!(location = %name, "Auto-refresh");
        self.request_by_name(&name).await;
    }

    /// Cancel the timer and drop any ticks already queued.
    pub fn shutdown(&mut self) {
        if let Some(timer) = self.refresh.take() {
            timer.cancel();
        }
        while self.tick_rx.try_recv().is_ok() {}
    }
}
