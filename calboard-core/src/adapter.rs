//! Source adapters: raw domain records to `CalendarEntry`.
//!
//! Each adapter is a pure function over one record collection. Records
//! without a usable calendar placement are dropped, never raised, so one bad
//! record cannot take down the whole view.

use chrono::{DateTime, Local};
use tracing::debug;

use crate::entry::{CalendarEntry, EntryColor, Priority, SourceType};
use crate::record::{Bug, NativeEvent, Task, Todo};
use crate::timestamp::parse_local;

/// Raw records for one source type.
#[derive(Debug, Clone, Copy)]
pub enum SourceRecords<'a> {
    Tasks(&'a [Task]),
    Bugs(&'a [Bug]),
    Todos(&'a [Todo]),
    Events(&'a [NativeEvent]),
}

/// Adapt a collection of raw records, whatever its source type.
pub fn adapt(records: SourceRecords<'_>) -> Vec<CalendarEntry> {
    match records {
        SourceRecords::Tasks(tasks) => adapt_tasks(tasks),
        SourceRecords::Bugs(bugs) => adapt_bugs(bugs),
        SourceRecords::Todos(todos) => adapt_todos(todos),
        SourceRecords::Events(events) => adapt_events(events),
    }
}

/// Tasks appear on their due date; tasks without one are skipped.
pub fn adapt_tasks(tasks: &[Task]) -> Vec<CalendarEntry> {
    tasks
        .iter()
        .filter_map(|task| {
            let due = placement(SourceType::Task, task.id, task.due_date.as_deref())?;
            Some(CalendarEntry {
                id: CalendarEntry::entry_id(SourceType::Task, task.id),
                title: task.title.clone(),
                description: task.description.clone(),
                start_time: due,
                end_time: due,
                source_type: SourceType::Task,
                source_id: task.id,
                color: EntryColor::for_task_status(&task.status),
                priority: Priority::from_tier(&task.priority),
                status: task.status.clone(),
            })
        })
        .collect()
}

/// Bugs appear on their due date, falling back to the resolution date.
pub fn adapt_bugs(bugs: &[Bug]) -> Vec<CalendarEntry> {
    bugs.iter()
        .filter_map(|bug| {
            let date = bug.due_date.as_deref().or(bug.resolved_at.as_deref());
            let at = placement(SourceType::Bug, bug.id, date)?;
            Some(CalendarEntry {
                id: CalendarEntry::entry_id(SourceType::Bug, bug.id),
                title: bug.title.clone(),
                description: bug.description.clone(),
                start_time: at,
                end_time: at,
                source_type: SourceType::Bug,
                source_id: bug.id,
                color: EntryColor::for_tier(&bug.severity),
                priority: Priority::from_tier(&bug.severity),
                status: bug.status.clone(),
            })
        })
        .collect()
}

/// Todos appear on their due date; todos without one are skipped.
pub fn adapt_todos(todos: &[Todo]) -> Vec<CalendarEntry> {
    todos
        .iter()
        .filter_map(|todo| {
            let due = placement(SourceType::Todo, todo.id, todo.due_date.as_deref())?;
            Some(CalendarEntry {
                id: CalendarEntry::entry_id(SourceType::Todo, todo.id),
                title: todo.title.clone(),
                description: todo.description.clone(),
                start_time: due,
                end_time: due,
                source_type: SourceType::Todo,
                source_id: todo.id,
                color: EntryColor::for_tier(&todo.priority),
                priority: Priority::from_tier(&todo.priority),
                status: todo.status.clone(),
            })
        })
        .collect()
}

/// Every native event is included. Only an unparseable start drops one.
pub fn adapt_events(events: &[NativeEvent]) -> Vec<CalendarEntry> {
    events
        .iter()
        .filter_map(|event| {
            let fields = &event.fields;
            let start = placement(SourceType::Event, event.id, Some(&fields.start_time))?;

            // An unreadable or inverted end collapses onto the start
            let end = parse_local(&fields.end_time)
                .filter(|end| *end >= start)
                .unwrap_or_else(|| {
                    debug!(event_id = event.id, end = %fields.end_time, "clamping event end to start");
                    start
                });

            Some(CalendarEntry {
                id: CalendarEntry::entry_id(SourceType::Event, event.id),
                title: fields.title.clone(),
                description: fields.description.clone(),
                start_time: start,
                end_time: end,
                source_type: SourceType::Event,
                source_id: event.id,
                color: EntryColor::for_event(fields.color.as_deref()),
                priority: Priority::from_event(Some(&fields.priority)),
                status: fields.status.clone(),
            })
        })
        .collect()
}

fn placement(source_type: SourceType, id: i64, date: Option<&str>) -> Option<DateTime<Local>> {
    let raw = date?;
    let parsed = parse_local(raw);
    if parsed.is_none() {
        debug!(%source_type, id, date = raw, "dropping record with malformed date");
    }
    parsed
}
