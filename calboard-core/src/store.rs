//! JSON-file-backed collaborator services.
//!
//! A store directory holds one JSON array per collection:
//! `tasks.json`, `bugs.json`, `todos.json` and `events.json`, each in the
//! same camelCase shape the REST services return. A missing file is an
//! empty collection. The store is single-tenant, so owner and org ids are
//! accepted and ignored.

use std::path::PathBuf;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{CalboardError, CalboardResult};
use crate::record::{Bug, EventFields, NativeEvent, Task, Todo};
use crate::source::{BugSource, EventSource, TaskSource, TodoSource};

const TASKS_FILE: &str = "tasks.json";
const BUGS_FILE: &str = "bugs.json";
const TODOS_FILE: &str = "todos.json";
const EVENTS_FILE: &str = "events.json";

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        JsonStore { root: root.into() }
    }

    async fn read<T: DeserializeOwned>(&self, file: &str) -> CalboardResult<Vec<T>> {
        let path = self.root.join(file);

        let content = match tokio::fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "collection file missing, treating as empty");
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            CalboardError::Serialization(format!("Failed to parse {}: {}", path.display(), e))
        })
    }

    async fn write<T: Serialize>(&self, file: &str, records: &[T]) -> CalboardResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        let content = serde_json::to_string_pretty(records)?;
        tokio::fs::write(self.root.join(file), content).await?;
        Ok(())
    }
}

impl TaskSource for JsonStore {
    async fn list_tasks(&self, _owner_id: i64) -> CalboardResult<Vec<Task>> {
        self.read(TASKS_FILE).await
    }
}

impl BugSource for JsonStore {
    async fn list_bugs(&self, _owner_id: i64) -> CalboardResult<Vec<Bug>> {
        self.read(BUGS_FILE).await
    }
}

impl TodoSource for JsonStore {
    async fn list_todos(&self, _owner_id: i64) -> CalboardResult<Vec<Todo>> {
        self.read(TODOS_FILE).await
    }
}

impl EventSource for JsonStore {
    async fn list_events(&self, _org_id: i64) -> CalboardResult<Vec<NativeEvent>> {
        self.read(EVENTS_FILE).await
    }

    async fn create_event(&self, event: &EventFields) -> CalboardResult<NativeEvent> {
        let mut events: Vec<NativeEvent> = self.read(EVENTS_FILE).await?;
        let id = events.iter().map(|e| e.id).max().unwrap_or(0) + 1;

        let created = NativeEvent::new(id, event.clone());
        events.push(created.clone());
        self.write(EVENTS_FILE, &events).await?;

        Ok(created)
    }

    async fn update_event(&self, id: i64, event: &EventFields) -> CalboardResult<NativeEvent> {
        let mut events: Vec<NativeEvent> = self.read(EVENTS_FILE).await?;

        let existing = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CalboardError::NotFound(format!("event {id}")))?;
        existing.fields = event.clone();
        let updated = existing.clone();

        self.write(EVENTS_FILE, &events).await?;
        Ok(updated)
    }

    async fn delete_event(&self, id: i64) -> CalboardResult<()> {
        let mut events: Vec<NativeEvent> = self.read(EVENTS_FILE).await?;
        let before = events.len();
        events.retain(|e| e.id != id);

        if events.len() == before {
            return Err(CalboardError::NotFound(format!("event {id}")));
        }

        self.write(EVENTS_FILE, &events).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::day_index::DayKey;
    use crate::draft::EventDraft;
    use tempfile::TempDir;

    fn fields(title: &str) -> EventFields {
        let mut draft = EventDraft::new(DayKey::from_ymd(2024, 3, 15).unwrap().date());
        draft.title = title.to_string();
        draft.to_fields().unwrap()
    }

    #[tokio::test]
    async fn test_missing_files_are_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(store.list_tasks(1).await.unwrap().is_empty());
        assert!(store.list_events(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_assigns_next_id() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        let first = store.create_event(&fields("Kickoff")).await.unwrap();
        let second = store.create_event(&fields("Retro")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.list_events(1).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_id_fail() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());

        assert!(matches!(
            store.update_event(9, &fields("Ghost")).await,
            Err(CalboardError::NotFound(_))
        ));
        assert!(matches!(
            store.delete_event(9).await,
            Err(CalboardError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_then_delete() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(dir.path());
        let created = store.create_event(&fields("Kickoff")).await.unwrap();

        let updated = store
            .update_event(created.id, &fields("Kickoff (v2)"))
            .await
            .unwrap();
        assert_eq!(updated.fields.title, "Kickoff (v2)");

        store.delete_event(created.id).await.unwrap();
        assert!(store.list_events(1).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reads_rest_shaped_tasks() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(TASKS_FILE),
            r#"[{"id": 1, "title": "Ship it", "dueDate": "2024-03-10", "status": "IN_PROGRESS", "priority": "HIGH"}]"#,
        )
        .unwrap();
        let store = JsonStore::new(dir.path());

        let tasks = store.list_tasks(1).await.unwrap();
        assert_eq!(tasks[0].due_date.as_deref(), Some("2024-03-10"));
    }

    #[tokio::test]
    async fn test_corrupt_file_is_a_serialization_error() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(BUGS_FILE), "{not json").unwrap();
        let store = JsonStore::new(dir.path());

        assert!(matches!(
            store.list_bugs(1).await,
            Err(CalboardError::Serialization(_))
        ));
    }
}
