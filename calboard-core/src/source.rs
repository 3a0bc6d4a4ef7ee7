//! Collaborator services the calendar reads from and writes to.
//!
//! Implementations are expected to talk to the owning domain's backend
//! (REST, a local store, a test fake). The calendar never persists anything
//! itself.

use crate::error::CalboardResult;
use crate::record::{Bug, EventFields, NativeEvent, Task, Todo};

#[allow(async_fn_in_trait)]
pub trait TaskSource {
    async fn list_tasks(&self, owner_id: i64) -> CalboardResult<Vec<Task>>;
}

#[allow(async_fn_in_trait)]
pub trait BugSource {
    async fn list_bugs(&self, owner_id: i64) -> CalboardResult<Vec<Bug>>;
}

#[allow(async_fn_in_trait)]
pub trait TodoSource {
    async fn list_todos(&self, owner_id: i64) -> CalboardResult<Vec<Todo>>;
}

/// The event service: the only source the calendar can mutate.
#[allow(async_fn_in_trait)]
pub trait EventSource {
    async fn list_events(&self, org_id: i64) -> CalboardResult<Vec<NativeEvent>>;

    async fn create_event(&self, event: &EventFields) -> CalboardResult<NativeEvent>;

    async fn update_event(&self, id: i64, event: &EventFields) -> CalboardResult<NativeEvent>;

    async fn delete_event(&self, id: i64) -> CalboardResult<()>;
}

/// Everything a calendar board needs from its collaborators.
pub trait Backend: TaskSource + BugSource + TodoSource + EventSource {}

impl<T> Backend for T where T: TaskSource + BugSource + TodoSource + EventSource {}
