//! Schedule view engine.
//!
//! Owns the authoritative schedule set fetched from the backend together
//! with the user's current [`FilterSpec`], and republishes the derived page
//! whenever either of them changes. Admin screens drive the engine
//! directly; student screens go through [`StudentScheduleView`], which
//! shares the same derivation but cannot mutate schedules.
//!
//! State lives behind a single mutex that is never held across an await.
//! Each bulk fetch takes a generation number and a completion older than
//! the last applied one is dropped, so a slow response cannot overwrite a
//! newer set.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::{HttpScheduleApi, ScheduleApi};
use crate::config::{ApiConfig, DEFAULT_PAGE_SIZE};
use crate::error::AppError;
use crate::models::{
    BusyFlags, FilterChange, FilterSpec, NewScheduleRequest, PageMeta, SchedulePage,
    ScheduleEntity, UpdateScheduleRequest, ViewSnapshot,
};
use crate::normalize::{normalize_batch, normalize_value};
use crate::notify::{Notifier, Severity, TracingNotifier};

use super::derive;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineOptions {
    /// Drop records with an unusable time range instead of defaulting
    /// their duration.
    pub strict_durations: bool,
    /// Page size used initially and after `reset_filters`.
    pub default_page_size: u32,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            strict_durations: false,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl From<&ApiConfig> for EngineOptions {
    fn from(config: &ApiConfig) -> Self {
        Self {
            strict_durations: config.strict_durations,
            default_page_size: config.page_size.max(1),
        }
    }
}

/// Result of a bulk fetch. Failures have already been reported to the
/// notifier and leave the previous set in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied(usize),
    Superseded,
    Failed,
}

#[derive(Debug, Clone, Copy)]
enum Mutation {
    Create,
    Update,
    Delete,
}

impl Mutation {
    fn success_message(self) -> &'static str {
        match self {
            Mutation::Create => "Schedule created successfully",
            Mutation::Update => "Schedule updated successfully",
            Mutation::Delete => "Schedule deleted successfully",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            Mutation::Create => "Failed to create schedule",
            Mutation::Update => "Failed to update schedule",
            Mutation::Delete => "Failed to delete schedule",
        }
    }
}

#[derive(Debug, Default)]
struct InFlight {
    loading: u32,
    creating: u32,
    updating: u32,
    deleting: u32,
}

impl InFlight {
    fn counter(&mut self, mutation: Mutation) -> &mut u32 {
        match mutation {
            Mutation::Create => &mut self.creating,
            Mutation::Update => &mut self.updating,
            Mutation::Delete => &mut self.deleting,
        }
    }

    fn flags(&self) -> BusyFlags {
        BusyFlags {
            is_loading: self.loading > 0,
            is_creating: self.creating > 0,
            is_updating: self.updating > 0,
            is_deleting: self.deleting > 0,
        }
    }
}

#[derive(Debug)]
struct ViewState {
    all: Vec<ScheduleEntity>,
    filters: FilterSpec,
    page: SchedulePage,
    in_flight: InFlight,
    next_generation: u64,
    applied_generation: u64,
}

impl ViewState {
    fn rederive(&mut self) {
        self.page = derive(&self.all, &self.filters);
    }

    fn meta(&self) -> PageMeta {
        PageMeta {
            page: self.filters.page,
            limit: self.filters.page_size,
            total: self.page.total,
        }
    }

    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            schedules: self.page.items.clone(),
            meta: self.meta(),
            filters: self.filters.clone(),
            busy: self.in_flight.flags(),
        }
    }
}

pub struct ScheduleViewEngine {
    api: Arc<dyn ScheduleApi>,
    notifier: Arc<dyn Notifier>,
    options: EngineOptions,
    state: Mutex<ViewState>,
    publisher: watch::Sender<ViewSnapshot>,
}

impl ScheduleViewEngine {
    pub fn new(api: Arc<dyn ScheduleApi>, notifier: Arc<dyn Notifier>, options: EngineOptions) -> Self {
        let state = ViewState {
            all: Vec::new(),
            filters: FilterSpec::with_page_size(options.default_page_size),
            page: SchedulePage::default(),
            in_flight: InFlight::default(),
            next_generation: 0,
            applied_generation: 0,
        };
        let (publisher, _) = watch::channel(state.snapshot());

        Self {
            api,
            notifier,
            options,
            state: Mutex::new(state),
            publisher,
        }
    }

    /// HTTP backend with log-only notifications.
    pub fn from_config(config: &ApiConfig) -> Result<Self, AppError> {
        let api = HttpScheduleApi::new(config.clone())?;
        Ok(Self::new(
            Arc::new(api),
            Arc::new(TracingNotifier),
            EngineOptions::from(config),
        ))
    }

    pub fn student_view(&self) -> StudentScheduleView<'_> {
        StudentScheduleView { engine: self }
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.publisher.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.lock().snapshot()
    }

    pub fn schedules(&self) -> Vec<ScheduleEntity> {
        self.lock().page.items.clone()
    }

    pub fn filters(&self) -> FilterSpec {
        self.lock().filters.clone()
    }

    pub fn meta(&self) -> PageMeta {
        self.lock().meta()
    }

    pub fn busy(&self) -> BusyFlags {
        self.lock().in_flight.flags()
    }

    /// Size of the authoritative set, before any filtering.
    pub fn loaded_count(&self) -> usize {
        self.lock().all.len()
    }

    // -- filter operations --------------------------------------------------

    pub fn set_filter(&self, change: FilterChange) {
        debug!("Filter change: {:?}", change);
        self.update_state(|state| {
            state.filters.apply(change);
            state.rederive();
        });
    }

    pub fn reset_filters(&self) {
        let page_size = self.options.default_page_size;
        self.update_state(|state| {
            state.filters = FilterSpec::with_page_size(page_size);
            state.rederive();
        });
    }

    pub fn go_to_page(&self, page: u32) {
        self.set_filter(FilterChange::Page(page));
    }

    pub fn set_page_size(&self, page_size: u32) {
        self.set_filter(FilterChange::PageSize(page_size));
    }

    // -- backend operations -------------------------------------------------

    pub async fn fetch_all(&self) -> FetchOutcome {
        let generation = self.update_state(|state| {
            state.in_flight.loading += 1;
            state.next_generation += 1;
            state.next_generation
        });
        info!("Fetching schedules (generation {})", generation);

        let result = self.api.fetch_schedules().await;

        let (outcome, failure) = {
            let mut state = self.lock();
            state.in_flight.loading = state.in_flight.loading.saturating_sub(1);

            let result = match result {
                Ok(_) if generation <= state.applied_generation => {
                    debug!(
                        "Discarding fetch generation {} (generation {} already applied)",
                        generation, state.applied_generation
                    );
                    (FetchOutcome::Superseded, None)
                }
                Ok(records) => {
                    let received = records.len();
                    state.all = normalize_batch(records, self.options.strict_durations);
                    state.applied_generation = generation;
                    state.rederive();

                    let loaded = state.all.len();
                    if loaded < received {
                        warn!("Skipped {} of {} schedule records", received - loaded, received);
                    }
                    info!("Loaded {} schedules, {} match current filters", loaded, state.page.total);
                    (FetchOutcome::Applied(loaded), None)
                }
                Err(e) => {
                    error!("Failed to fetch schedules: {}", e);
                    (FetchOutcome::Failed, Some(e.user_message("Failed to load schedules")))
                }
            };

            self.publish(&state);
            result
        };

        if let Some(message) = failure {
            self.notifier.notify(Severity::Error, &message);
        }
        outcome
    }

    /// Single schedule, or `None` after notifying when it is missing or the
    /// request failed. Does not touch the authoritative set.
    pub async fn fetch_by_id(&self, id: &str) -> Option<ScheduleEntity> {
        self.update_state(|state| state.in_flight.loading += 1);

        let result = self.api.fetch_schedule(id).await;

        self.update_state(|state| {
            state.in_flight.loading = state.in_flight.loading.saturating_sub(1);
        });

        let record = match result {
            Ok(record) => record,
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                error!("Failed to fetch schedule {}: {}", id, e);
                self.notifier
                    .notify(Severity::Error, &e.user_message("Failed to load schedule"));
                return None;
            }
        };

        let Some(record) = record else {
            warn!("Schedule {} not found", id);
            self.notifier.notify(Severity::Warning, "Schedule not found");
            return None;
        };

        match normalize_value(record, self.options.strict_durations) {
            Ok(schedule) => Some(schedule),
            Err(e) => {
                warn!("Unusable schedule record {}: {}", id, e);
                self.notifier
                    .notify(Severity::Error, &e.user_message("Failed to load schedule"));
                None
            }
        }
    }

    pub async fn create(&self, req: NewScheduleRequest) -> Result<(), AppError> {
        self.run_mutation(Mutation::Create, self.api.create_schedule(&req))
            .await
    }

    pub async fn update(&self, id: &str, req: UpdateScheduleRequest) -> Result<(), AppError> {
        self.run_mutation(Mutation::Update, self.api.update_schedule(id, &req))
            .await
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        self.run_mutation(Mutation::Delete, self.api.delete_schedule(id))
            .await
    }

    /// Shared mutation flow: busy flag, notify, then re-fetch on success.
    /// The filter selection survives the re-fetch.
    async fn run_mutation<F>(&self, mutation: Mutation, request: F) -> Result<(), AppError>
    where
        F: Future<Output = Result<(), AppError>>,
    {
        self.update_state(|state| *state.in_flight.counter(mutation) += 1);

        let result = request.await;

        self.update_state(|state| {
            let counter = state.in_flight.counter(mutation);
            *counter = counter.saturating_sub(1);
        });

        match result {
            Ok(()) => {
                info!("{:?} succeeded, refreshing schedules", mutation);
                self.notifier
                    .notify(Severity::Success, mutation.success_message());
                self.fetch_all().await;
                Ok(())
            }
            Err(e) => {
                error!("{:?} failed: {}", mutation, e);
                self.notifier
                    .notify(Severity::Error, &e.user_message(mutation.failure_message()));
                Err(e)
            }
        }
    }

    // -- internals ----------------------------------------------------------

    fn lock(&self) -> MutexGuard<'_, ViewState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn update_state<T>(&self, f: impl FnOnce(&mut ViewState) -> T) -> T {
        let mut state = self.lock();
        let value = f(&mut *state);
        self.publish(&state);
        value
    }

    fn publish(&self, state: &ViewState) {
        self.publisher.send_replace(state.snapshot());
    }
}

/// Read-only schedule access for student screens.
#[derive(Clone, Copy)]
pub struct StudentScheduleView<'a> {
    engine: &'a ScheduleViewEngine,
}

impl StudentScheduleView<'_> {
    pub async fn fetch_all(&self) -> FetchOutcome {
        self.engine.fetch_all().await
    }

    pub async fn fetch_by_id(&self, id: &str) -> Option<ScheduleEntity> {
        self.engine.fetch_by_id(id).await
    }

    pub fn set_filter(&self, change: FilterChange) {
        self.engine.set_filter(change);
    }

    pub fn reset_filters(&self) {
        self.engine.reset_filters();
    }

    pub fn go_to_page(&self, page: u32) {
        self.engine.go_to_page(page);
    }

    pub fn set_page_size(&self, page_size: u32) {
        self.engine.set_page_size(page_size);
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewSnapshot> {
        self.engine.subscribe()
    }

    pub fn snapshot(&self) -> ViewSnapshot {
        self.engine.snapshot()
    }

    pub fn schedules(&self) -> Vec<ScheduleEntity> {
        self.engine.schedules()
    }

    pub fn meta(&self) -> PageMeta {
        self.engine.meta()
    }

    pub fn is_loading(&self) -> bool {
        self.engine.busy().is_loading
    }
}
