//! The calendar board: sources in, month grid and sidebar out.
//!
//! The board owns the last-known entries of each source and re-runs the
//! adapt, aggregate, index pipeline whenever one of them is replaced. It
//! never patches entries in place: a committed mutation re-fetches the
//! event collection and the pipeline runs again.

use std::collections::HashMap;
use std::pin::pin;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::adapter::{adapt_bugs, adapt_events, adapt_tasks, adapt_todos};
use crate::aggregate::{AggregateCache, SourceEntries};
use crate::config::BoardConfig;
use crate::day_index::{DayIndex, DayKey, MonthGrid, YearMonth};
use crate::entry::{CalendarEntry, SourceType};
use crate::error::{CalboardError, CalboardResult};
use crate::filter::filter;
use crate::mutation::{MutationController, MutationOutcome, MutationPhase};
use crate::notify::{Notification, NotificationQueue};
use crate::record::NativeEvent;
use crate::source::Backend;
use crate::view::{DayCellView, ViewState};

/// Which sources have resolved (successfully or not) at least once.
#[derive(Debug, Clone, Copy, Default)]
struct Loaded {
    tasks: bool,
    bugs: bool,
    todos: bool,
    events: bool,
}

impl Loaded {
    fn mark(&mut self, source_type: SourceType) {
        match source_type {
            SourceType::Task => self.tasks = true,
            SourceType::Bug => self.bugs = true,
            SourceType::Todo => self.todos = true,
            SourceType::Event => self.events = true,
        }
    }

    fn all(&self) -> bool {
        self.tasks && self.bugs && self.todos && self.events
    }
}

/// Last-known entries per source and everything derived from them.
struct Pipeline {
    sources: SourceEntries,
    loaded: Loaded,
    /// Raw native events, kept to seed editor drafts.
    events: Vec<NativeEvent>,

    cache: AggregateCache,
    entries: Arc<[CalendarEntry]>,
    positions: HashMap<String, usize>,
    index: DayIndex,
}

impl Pipeline {
    fn new() -> Self {
        Pipeline {
            sources: SourceEntries::default(),
            loaded: Loaded::default(),
            events: Vec::new(),
            cache: AggregateCache::new(),
            entries: Arc::from([]),
            positions: HashMap::new(),
            index: DayIndex::default(),
        }
    }

    /// Replace one source's entries. A failed fetch leaves the source empty
    /// and queues an error notification.
    fn settle(
        &mut self,
        source_type: SourceType,
        result: CalboardResult<Vec<CalendarEntry>>,
        notifications: &mut NotificationQueue,
    ) {
        self.loaded.mark(source_type);

        let entries: Arc<[CalendarEntry]> = match result {
            Ok(entries) => entries.into(),
            Err(e) => {
                let error = CalboardError::SourceFetch {
                    source_type,
                    message: e.to_string(),
                };
                warn!(%source_type, error = %e, "source fetch failed");
                notifications.push(Notification::error(error.to_string()));
                Arc::from([])
            }
        };

        match source_type {
            SourceType::Task => self.sources.tasks = entries,
            SourceType::Bug => self.sources.bugs = entries,
            SourceType::Todo => self.sources.todos = entries,
            SourceType::Event => self.sources.events = entries,
        }
    }

    fn settle_events(
        &mut self,
        result: CalboardResult<Vec<NativeEvent>>,
        notifications: &mut NotificationQueue,
    ) {
        match result {
            Ok(raw) => {
                let adapted = adapt_events(&raw);
                self.events = raw;
                self.settle(SourceType::Event, Ok(adapted), notifications);
            }
            Err(e) => {
                self.events.clear();
                self.settle(SourceType::Event, Err(e), notifications);
            }
        }
    }

    fn rebuild(&mut self) {
        let merged = self.cache.get(&self.sources);
        if Arc::ptr_eq(&merged, &self.entries) {
            return;
        }

        self.index = DayIndex::build(&merged);
        self.positions = merged
            .iter()
            .enumerate()
            .map(|(pos, entry)| (entry.id.clone(), pos))
            .collect();
        self.entries = merged;
    }

    fn entry(&self, id: &str) -> Option<&CalendarEntry> {
        self.positions.get(id).map(|&pos| &self.entries[pos])
    }
}

pub struct CalendarBoard<B> {
    backend: B,
    owner_id: i64,
    org_id: i64,

    pipeline: Pipeline,

    view: ViewState,
    mutations: MutationController,
    notifications: NotificationQueue,
}

impl<B: Backend> CalendarBoard<B> {
    pub fn new(backend: B, config: &BoardConfig) -> Self {
        CalendarBoard {
            backend,
            owner_id: config.owner_id,
            org_id: config.org_id,
            pipeline: Pipeline::new(),
            view: ViewState::new(YearMonth::current(), config.visible_per_day),
            mutations: MutationController::new(),
            notifications: NotificationQueue::default(),
        }
    }

    /// Start on a specific month instead of the current one.
    pub fn with_month(mut self, month: YearMonth) -> Self {
        self.view.current_month = month;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // FETCHING:

    /// Fetch all four sources concurrently. Each source is applied as soon
    /// as its fetch settles, so a slow or hung source never holds back the
    /// others. A source that fails contributes nothing and raises a
    /// notification.
    pub async fn refresh(&mut self) {
        let backend = &self.backend;
        let pipeline = &mut self.pipeline;
        let notifications = &mut self.notifications;

        let mut tasks = pin!(backend.list_tasks(self.owner_id));
        let mut bugs = pin!(backend.list_bugs(self.owner_id));
        let mut todos = pin!(backend.list_todos(self.owner_id));
        let mut events = pin!(backend.list_events(self.org_id));
        let mut settled = Loaded::default();

        while !settled.all() {
            tokio::select! {
                result = &mut tasks, if !settled.tasks => {
                    settled.mark(SourceType::Task);
                    pipeline.settle(SourceType::Task, result.map(|t| adapt_tasks(&t)), notifications);
                }
                result = &mut bugs, if !settled.bugs => {
                    settled.mark(SourceType::Bug);
                    pipeline.settle(SourceType::Bug, result.map(|b| adapt_bugs(&b)), notifications);
                }
                result = &mut todos, if !settled.todos => {
                    settled.mark(SourceType::Todo);
                    pipeline.settle(SourceType::Todo, result.map(|t| adapt_todos(&t)), notifications);
                }
                result = &mut events, if !settled.events => {
                    settled.mark(SourceType::Event);
                    pipeline.settle_events(result, notifications);
                }
            }
            pipeline.rebuild();
        }

        info!(entries = pipeline.entries.len(), "calendar refreshed");
    }

    /// Re-fetch only the native events, after a mutation.
    pub async fn refresh_events(&mut self) {
        let events = self.backend.list_events(self.org_id).await;
        self.pipeline.settle_events(events, &mut self.notifications);
        self.pipeline.rebuild();
    }

    /// True once every source has resolved at least once.
    pub fn is_ready(&self) -> bool {
        self.pipeline.loaded.all()
    }

    // READING:

    pub fn entries(&self) -> &[CalendarEntry] {
        &self.pipeline.entries
    }

    pub fn entry(&self, id: &str) -> Option<&CalendarEntry> {
        self.pipeline.entry(id)
    }

    pub fn events(&self) -> &[NativeEvent] {
        &self.pipeline.events
    }

    pub fn index(&self) -> &DayIndex {
        &self.pipeline.index
    }

    pub fn entries_on(&self, day: DayKey) -> Vec<&CalendarEntry> {
        self.pipeline
            .index
            .entries_on(day)
            .iter()
            .filter_map(|id| self.pipeline.entry(id))
            .collect()
    }

    /// The unfiltered grid for the month in view.
    pub fn month_grid(&self) -> MonthGrid {
        self.pipeline.index.month_grid(self.view.current_month)
    }

    /// A day's entries with the overflow cap applied.
    pub fn day_cell(&self, day: DayKey) -> DayCellView<'_> {
        self.view.day_cell(day, self.entries_on(day))
    }

    /// The filtered, time-sorted side list.
    pub fn sidebar(&self) -> Vec<CalendarEntry> {
        filter(&self.pipeline.entries, &self.view.criteria())
    }

    // VIEW STATE:

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    /// Select a day, optionally with an entry under the cursor.
    pub fn select_date(&mut self, date: NaiveDate, entry_id: Option<&str>) {
        let under_cursor = entry_id.and_then(|id| self.pipeline.entry(id));
        self.view.select_date(date, under_cursor, &self.pipeline.events);
    }

    pub fn toggle_expand(&mut self, day: DayKey) -> bool {
        let count = self.pipeline.index.entries_on(day).len();
        self.view.toggle_expand(day, count)
    }

    /// Open the editor on an entry. Read-only entries are ignored.
    pub fn open_editor(&mut self, entry_id: &str) -> bool {
        match self.pipeline.entry(entry_id) {
            Some(entry) => self.view.open_editor(entry, &self.pipeline.events),
            None => false,
        }
    }

    pub fn close_editor(&mut self) {
        self.view.close_editor();
    }

    // MUTATIONS:

    pub fn mutation_phase(&self) -> MutationPhase {
        self.mutations.phase()
    }

    /// Submit the open draft. On success the editor closes and events are
    /// re-fetched; on failure the draft stays as it was.
    pub async fn submit_editor(&mut self) -> CalboardResult<MutationOutcome> {
        let result = self.mutations.submit(&mut self.view, &self.backend).await;
        self.after_mutation(result).await
    }

    /// Stage an entry for deletion pending the user's confirmation.
    pub fn request_delete(&mut self, entry_id: &str) -> bool {
        match self.pipeline.entry(entry_id) {
            Some(entry) => self.mutations.request_delete(entry),
            None => false,
        }
    }

    pub fn pending_delete(&self) -> Option<&CalendarEntry> {
        self.mutations.pending_delete()
    }

    pub fn cancel_delete(&mut self) {
        self.mutations.cancel_delete();
    }

    pub async fn confirm_delete(&mut self) -> CalboardResult<MutationOutcome> {
        let result = self.mutations.confirm_delete(&mut self.view, &self.backend).await;
        self.after_mutation(result).await
    }

    async fn after_mutation(
        &mut self,
        result: CalboardResult<MutationOutcome>,
    ) -> CalboardResult<MutationOutcome> {
        match &result {
            Ok(outcome) => {
                let message = match outcome {
                    MutationOutcome::Created(event) => format!("Created \"{}\"", event.fields.title),
                    MutationOutcome::Updated(event) => format!("Updated \"{}\"", event.fields.title),
                    MutationOutcome::Deleted(_) => "Event deleted".to_string(),
                };
                self.notifications.push(Notification::success(message));
                self.refresh_events().await;
            }
            // Inline in the editor, not a toast
            Err(CalboardError::Validation(_)) => {}
            Err(e) => self.notifications.push(Notification::error(e.to_string())),
        }
        result
    }

    // NOTIFICATIONS:

    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain()
    }
}
