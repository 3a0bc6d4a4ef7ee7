//! Create, update and delete of native events from the editor.
//!
//! Nothing is drawn optimistically on the grid. The controller only drives
//! the editor lifecycle: the draft survives a failed call so the user can
//! retry, and visual changes wait for the caller's re-fetch after a commit.

use std::fmt;

use tracing::{info, warn};

use crate::entry::CalendarEntry;
use crate::error::{CalboardError, CalboardResult};
use crate::record::NativeEvent;
use crate::source::EventSource;
use crate::view::{EditorState, ViewState};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MutationKind::Create => write!(f, "create"),
            MutationKind::Update => write!(f, "update"),
            MutationKind::Delete => write!(f, "delete"),
        }
    }
}

/// Lifecycle of the most recent mutation:
/// `Idle -> Pending -> Committed | RolledBack`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MutationPhase {
    #[default]
    Idle,
    Pending(MutationKind),
    Committed(MutationKind),
    RolledBack(MutationKind),
}

/// What a successful mutation did.
#[derive(Debug, Clone, PartialEq)]
pub enum MutationOutcome {
    Created(NativeEvent),
    Updated(NativeEvent),
    Deleted(i64),
}

impl MutationOutcome {
    pub fn kind(&self) -> MutationKind {
        match self {
            MutationOutcome::Created(_) => MutationKind::Create,
            MutationOutcome::Updated(_) => MutationKind::Update,
            MutationOutcome::Deleted(_) => MutationKind::Delete,
        }
    }
}

#[derive(Debug, Default)]
pub struct MutationController {
    phase: MutationPhase,
    pending_delete: Option<CalendarEntry>,
}

impl MutationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> MutationPhase {
        self.phase
    }

    /// Send the open draft to the event service: a create for a new event,
    /// an update for an existing one. Validation runs first and never
    /// reaches the service. On success the editor closes; on failure it
    /// stays open with the draft untouched.
    pub async fn submit<S: EventSource>(
        &mut self,
        view: &mut ViewState,
        service: &S,
    ) -> CalboardResult<MutationOutcome> {
        let (target, fields) = match &view.editor {
            EditorState::Closed => {
                return Err(CalboardError::Validation(
                    "No event is open in the editor".into(),
                ));
            }
            EditorState::Creating { draft, .. } => (None, draft.to_fields()?),
            EditorState::Editing { entry, draft } => (Some(entry.source_id), draft.to_fields()?),
        };

        let kind = match target {
            Some(_) => MutationKind::Update,
            None => MutationKind::Create,
        };
        self.phase = MutationPhase::Pending(kind);

        let result = match target {
            Some(id) => service
                .update_event(id, &fields)
                .await
                .map(MutationOutcome::Updated),
            None => service.create_event(&fields).await.map(MutationOutcome::Created),
        };

        self.settle(kind, result, |outcome| {
            view.close_editor();
            outcome
        })
    }

    /// Ask for confirmation before deleting. Only native events qualify.
    pub fn request_delete(&mut self, entry: &CalendarEntry) -> bool {
        if !entry.source_type.is_editable() {
            return false;
        }
        self.pending_delete = Some(entry.clone());
        true
    }

    pub fn pending_delete(&self) -> Option<&CalendarEntry> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the event awaiting confirmation. On success any editor open on
    /// it is closed; on failure the event stays where it was.
    pub async fn confirm_delete<S: EventSource>(
        &mut self,
        view: &mut ViewState,
        service: &S,
    ) -> CalboardResult<MutationOutcome> {
        let entry = self.pending_delete.take().ok_or_else(|| {
            CalboardError::Validation("No event is awaiting delete confirmation".into())
        })?;

        let kind = MutationKind::Delete;
        self.phase = MutationPhase::Pending(kind);

        let id = entry.source_id;
        let result = service
            .delete_event(id)
            .await
            .map(|()| MutationOutcome::Deleted(id));

        self.settle(kind, result, |outcome| {
            if view.editor.editing_id() == Some(id) {
                view.close_editor();
            }
            outcome
        })
    }

    fn settle(
        &mut self,
        kind: MutationKind,
        result: CalboardResult<MutationOutcome>,
        on_commit: impl FnOnce(MutationOutcome) -> MutationOutcome,
    ) -> CalboardResult<MutationOutcome> {
        match result {
            Ok(outcome) => {
                info!(%kind, "event mutation committed");
                self.phase = MutationPhase::Committed(kind);
                Ok(on_commit(outcome))
            }
            Err(e) => {
                warn!(%kind, error = %e, "event mutation rolled back");
                self.phase = MutationPhase::RolledBack(kind);
                Err(CalboardError::Mutation {
                    kind,
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_index::YearMonth;
    use crate::entry::{EntryColor, Priority, SourceType};
    use crate::record::EventFields;
    use crate::timestamp::parse_local;
    use crate::view::DEFAULT_VISIBLE_PER_DAY;
    use chrono::NaiveDate;
    use std::cell::{Cell, RefCell};

    #[derive(Default)]
    struct FakeEvents {
        fail: Cell<bool>,
        calls: Cell<usize>,
        created: RefCell<Vec<EventFields>>,
    }

    impl EventSource for FakeEvents {
        async fn list_events(&self, _org_id: i64) -> CalboardResult<Vec<NativeEvent>> {
            Ok(Vec::new())
        }

        async fn create_event(&self, event: &EventFields) -> CalboardResult<NativeEvent> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(CalboardError::Service("503 Service Unavailable".into()));
            }
            self.created.borrow_mut().push(event.clone());
            Ok(NativeEvent::new(42, event.clone()))
        }

        async fn update_event(&self, id: i64, event: &EventFields) -> CalboardResult<NativeEvent> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(CalboardError::Service("409 Conflict".into()));
            }
            Ok(NativeEvent::new(id, event.clone()))
        }

        async fn delete_event(&self, _id: i64) -> CalboardResult<()> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(CalboardError::Service("500 Internal Server Error".into()));
            }
            Ok(())
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    fn view_with_creator(title: &str) -> ViewState {
        let mut view = ViewState::new(YearMonth::new(2024, 3).unwrap(), DEFAULT_VISIBLE_PER_DAY);
        view.open_creator(date());
        if let Some(draft) = view.draft_mut() {
            draft.title = title.to_string();
        }
        view
    }

    fn event_entry(id: i64) -> CalendarEntry {
        CalendarEntry {
            id: CalendarEntry::entry_id(SourceType::Event, id),
            title: "Sync".to_string(),
            description: None,
            start_time: parse_local("2024-03-15T09:00").unwrap(),
            end_time: parse_local("2024-03-15T10:00").unwrap(),
            source_type: SourceType::Event,
            source_id: id,
            color: EntryColor::Indigo,
            priority: Priority::Medium,
            status: "SCHEDULED".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_commits_and_closes_editor() {
        let service = FakeEvents::default();
        let mut view = view_with_creator("Launch");
        let mut controller = MutationController::new();

        let outcome = controller.submit(&mut view, &service).await.unwrap();

        assert!(matches!(outcome, MutationOutcome::Created(ref e) if e.id == 42));
        assert_eq!(controller.phase(), MutationPhase::Committed(MutationKind::Create));
        assert_eq!(view.editor, EditorState::Closed);
        assert_eq!(service.created.borrow().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_draft() {
        let service = FakeEvents::default();
        service.fail.set(true);
        let mut view = view_with_creator("Launch");
        let before = view.editor.clone();
        let mut controller = MutationController::new();

        let err = controller.submit(&mut view, &service).await.unwrap_err();

        assert!(matches!(err, CalboardError::Mutation { kind: MutationKind::Create, .. }));
        assert_eq!(controller.phase(), MutationPhase::RolledBack(MutationKind::Create));
        assert_eq!(view.editor, before);
    }

    #[tokio::test]
    async fn test_invalid_draft_never_reaches_service() {
        let service = FakeEvents::default();
        let mut view = view_with_creator("   ");
        let mut controller = MutationController::new();

        let err = controller.submit(&mut view, &service).await.unwrap_err();

        assert!(matches!(err, CalboardError::Validation(_)));
        assert_eq!(service.calls.get(), 0);
        assert_eq!(controller.phase(), MutationPhase::Idle);
        assert!(view.editor.is_open());
    }

    #[tokio::test]
    async fn test_update_targets_existing_source_id() {
        let service = FakeEvents::default();
        let mut view = ViewState::new(YearMonth::new(2024, 3).unwrap(), DEFAULT_VISIBLE_PER_DAY);
        view.open_editor(&event_entry(7), &[]);
        if let Some(draft) = view.draft_mut() {
            draft.title = "Sync (moved)".to_string();
        }
        let mut controller = MutationController::new();

        let outcome = controller.submit(&mut view, &service).await.unwrap();

        match outcome {
            MutationOutcome::Updated(event) => {
                assert_eq!(event.id, 7);
                assert_eq!(event.fields.title, "Sync (moved)");
            }
            other => panic!("expected update, got {other:?}"),
        }
        assert!(!view.editor.is_open());
    }

    #[tokio::test]
    async fn test_failed_update_keeps_editor_and_draft() {
        let service = FakeEvents::default();
        let mut view = ViewState::new(YearMonth::new(2024, 3).unwrap(), DEFAULT_VISIBLE_PER_DAY);
        view.open_editor(&event_entry(7), &[]);
        if let Some(draft) = view.draft_mut() {
            draft.title = "Sync (moved)".to_string();
            draft.location = Some("Room 4".to_string());
        }
        service.fail.set(true);
        let before = view.editor.clone();
        let mut controller = MutationController::new();

        let err = controller.submit(&mut view, &service).await.unwrap_err();

        assert!(matches!(err, CalboardError::Mutation { kind: MutationKind::Update, .. }));
        assert_eq!(service.calls.get(), 1);
        assert_eq!(controller.phase(), MutationPhase::RolledBack(MutationKind::Update));
        assert_eq!(view.editor, before);
        match &view.editor {
            EditorState::Editing { entry, draft } => {
                assert_eq!(entry.source_id, 7);
                assert_eq!(draft.title, "Sync (moved)");
            }
            other => panic!("expected editor to stay on event 7, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let service = FakeEvents::default();
        let mut view = ViewState::new(YearMonth::new(2024, 3).unwrap(), DEFAULT_VISIBLE_PER_DAY);
        let mut controller = MutationController::new();

        assert!(controller.confirm_delete(&mut view, &service).await.is_err());
        assert_eq!(service.calls.get(), 0);

        controller.request_delete(&event_entry(7));
        controller.cancel_delete();
        assert!(controller.pending_delete().is_none());
        assert!(controller.confirm_delete(&mut view, &service).await.is_err());
        assert_eq!(service.calls.get(), 0);
    }

    #[tokio::test]
    async fn test_delete_closes_editor_on_same_event() {
        let service = FakeEvents::default();
        let mut view = ViewState::new(YearMonth::new(2024, 3).unwrap(), DEFAULT_VISIBLE_PER_DAY);
        let entry = event_entry(7);
        view.open_editor(&entry, &[]);
        let mut controller = MutationController::new();

        assert!(controller.request_delete(&entry));
        let outcome = controller.confirm_delete(&mut view, &service).await.unwrap();

        assert_eq!(outcome, MutationOutcome::Deleted(7));
        assert_eq!(view.editor, EditorState::Closed);
    }

    #[tokio::test]
    async fn test_failed_delete_rolls_back() {
        let service = FakeEvents::default();
        service.fail.set(true);
        let mut view = ViewState::new(YearMonth::new(2024, 3).unwrap(), DEFAULT_VISIBLE_PER_DAY);
        let entry = event_entry(7);
        view.open_editor(&entry, &[]);
        let mut controller = MutationController::new();

        controller.request_delete(&entry);
        assert!(controller.confirm_delete(&mut view, &service).await.is_err());

        assert_eq!(controller.phase(), MutationPhase::RolledBack(MutationKind::Delete));
        assert_eq!(view.editor.editing_id(), Some(7));
    }

    #[test]
    fn test_read_only_entries_cannot_be_deleted() {
        let mut controller = MutationController::new();
        let mut task = event_entry(1);
        task.source_type = SourceType::Task;
        assert!(!controller.request_delete(&task));
        assert!(controller.pending_delete().is_none());
    }
}
