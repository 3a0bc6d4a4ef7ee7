//! Raw domain records, as returned by the collaborator services.
//!
//! These mirror the REST wire shape (camelCase JSON). Date fields are kept
//! as the strings the service sent; the adapters decide whether a record
//! has a usable calendar placement.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: String,
    pub priority: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bug {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub resolved_at: Option<String>,
    pub status: String,
    pub severity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    pub status: String,
    pub priority: String,
}

/// A calendar event owned by the event service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeEvent {
    pub id: i64,
    #[serde(flatten)]
    pub fields: EventFields,
}

/// Everything about a native event except its id.
///
/// This is also the body sent to `create` and `update`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventFields {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub start_time: String,
    pub end_time: String,
    pub event_type: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub is_all_day: bool,
    pub priority: String,
    pub status: String,
    #[serde(default)]
    pub reminder_minutes: u32,

    // Recurrence is stored and editable but never expanded into occurrences
    #[serde(default)]
    pub is_recurring: bool,
    #[serde(default)]
    pub recurrence_pattern: Option<String>,

    #[serde(default)]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

impl NativeEvent {
    pub fn new(id: i64, fields: EventFields) -> Self {
        NativeEvent { id, fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_native_event_reads_rest_shape() {
        let json = r#"{
            "id": 7,
            "title": "Sprint review",
            "startTime": "2024-03-15T09:00:00Z",
            "endTime": "2024-03-15T10:00:00Z",
            "eventType": "MEETING",
            "isAllDay": false,
            "priority": "HIGH",
            "status": "SCHEDULED",
            "reminderMinutes": 15,
            "isRecurring": true,
            "recurrencePattern": "WEEKLY"
        }"#;

        let event: NativeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 7);
        assert_eq!(event.fields.title, "Sprint review");
        assert_eq!(event.fields.recurrence_pattern.as_deref(), Some("WEEKLY"));
        assert!(event.fields.color.is_none());
    }

    #[test]
    fn test_bug_optional_dates_default_to_none() {
        let json = r#"{"id": 3, "title": "Crash", "status": "OPEN", "severity": "HIGH"}"#;
        let bug: Bug = serde_json::from_str(json).unwrap();
        assert!(bug.due_date.is_none());
        assert!(bug.resolved_at.is_none());
    }
}
