//! Editor drafts for native events and the payloads built from them.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::entry::CalendarEntry;
use crate::error::{CalboardError, CalboardResult};
use crate::record::{EventFields, NativeEvent};
use crate::timestamp::{local_at, parse_local};

const DEFAULT_EVENT_TYPE: &str = "MEETING";
const DEFAULT_PRIORITY: &str = "MEDIUM";
const DEFAULT_STATUS: &str = "SCHEDULED";
const DEFAULT_REMINDER_MINUTES: u32 = 15;

/// The editable working copy of a native event.
///
/// Discarded on cancel; replaced by the server's record once committed.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub all_day: bool,
    pub start: NaiveTime,
    /// Day the event ends on. Equal to `date` unless it runs past midnight.
    pub end_date: NaiveDate,
    pub end: NaiveTime,
    pub event_type: String,
    pub location: Option<String>,
    pub priority: String,
    pub status: String,
    pub reminder_minutes: u32,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub meeting_link: Option<String>,
    pub notes: Option<String>,
    pub color: Option<String>,
}

impl EventDraft {
    /// A blank draft anchored to `date`, 09:00 to 10:00.
    pub fn new(date: NaiveDate) -> Self {
        EventDraft {
            title: String::new(),
            description: None,
            date,
            all_day: false,
            start: hm(9, 0),
            end_date: date,
            end: hm(10, 0),
            event_type: DEFAULT_EVENT_TYPE.to_string(),
            location: None,
            priority: DEFAULT_PRIORITY.to_string(),
            status: DEFAULT_STATUS.to_string(),
            reminder_minutes: DEFAULT_REMINDER_MINUTES,
            is_recurring: false,
            recurrence_pattern: None,
            meeting_link: None,
            notes: None,
            color: None,
        }
    }

    /// Seed a draft from the stored event. Recurrence fields carry over as-is.
    pub fn from_event(event: &NativeEvent) -> Self {
        let f = &event.fields;
        let start = parse_local(&f.start_time);
        let end = parse_local(&f.end_time);

        let date = start
            .map(|s| s.date_naive())
            .unwrap_or_else(|| chrono::Local::now().date_naive());

        EventDraft {
            title: f.title.clone(),
            description: f.description.clone(),
            date,
            all_day: f.is_all_day,
            start: start.map(|s| trim_seconds(s.time())).unwrap_or(hm(9, 0)),
            end_date: end.map(|e| e.date_naive()).unwrap_or(date),
            end: end.map(|e| trim_seconds(e.time())).unwrap_or(hm(10, 0)),
            event_type: f.event_type.clone(),
            location: f.location.clone(),
            priority: f.priority.clone(),
            status: f.status.clone(),
            reminder_minutes: f.reminder_minutes,
            is_recurring: f.is_recurring,
            recurrence_pattern: f.recurrence_pattern.clone(),
            meeting_link: f.meeting_link.clone(),
            notes: f.notes.clone(),
            color: f.color.clone(),
        }
    }

    /// Fallback when the raw event is not at hand: only what the entry knows.
    pub fn from_entry(entry: &CalendarEntry) -> Self {
        let mut draft = EventDraft::new(entry.start_time.date_naive());
        draft.title = entry.title.clone();
        draft.description = entry.description.clone();
        draft.start = trim_seconds(entry.start_time.time());
        draft.end_date = entry.end_time.date_naive();
        draft.end = trim_seconds(entry.end_time.time());
        draft.priority = entry.priority.as_str().to_uppercase();
        draft.status = entry.status.clone();
        draft
    }

    /// Check required fields before anything is sent.
    pub fn validate(&self) -> CalboardResult<()> {
        if self.title.trim().is_empty() {
            return Err(CalboardError::Validation("Title is required".into()));
        }

        if self.all_day && self.end_date < self.date {
            return Err(CalboardError::Validation(
                "End date must not be before start date".into(),
            ));
        }

        if !self.all_day && self.ends_at() <= self.starts_at() {
            return Err(CalboardError::Validation(
                "End time must be after start time".into(),
            ));
        }

        let has_pattern = self
            .recurrence_pattern
            .as_deref()
            .is_some_and(|p| !p.trim().is_empty());
        if self.is_recurring && !has_pattern {
            return Err(CalboardError::Validation(
                "Recurring events need a recurrence pattern".into(),
            ));
        }

        Ok(())
    }

    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.start)
    }

    pub fn ends_at(&self) -> NaiveDateTime {
        self.end_date.and_time(self.end)
    }

    /// Move the event to another start date, keeping how many days it spans.
    pub fn move_to(&mut self, date: NaiveDate) {
        let span = self.end_date.signed_duration_since(self.date);
        self.date = date;
        self.end_date = date + span;
    }

    /// Build the service payload, resolving start and end into local
    /// instants. All-day events run from midnight on the start date to the
    /// last second of the end date.
    pub fn to_fields(&self) -> CalboardResult<EventFields> {
        self.validate()?;

        let (start, end) = if self.all_day {
            (NaiveTime::MIN, end_of_day())
        } else {
            (self.start, self.end)
        };

        let resolve = |date: NaiveDate, time: NaiveTime| {
            local_at(date, time).ok_or_else(|| {
                CalboardError::Validation(format!(
                    "{} {} does not exist in the local time zone",
                    date,
                    time.format("%H:%M")
                ))
            })
        };

        Ok(EventFields {
            title: self.title.trim().to_string(),
            description: non_blank(&self.description),
            start_time: resolve(self.date, start)?.to_rfc3339(),
            end_time: resolve(self.end_date, end)?.to_rfc3339(),
            event_type: self.event_type.clone(),
            location: non_blank(&self.location),
            is_all_day: self.all_day,
            priority: self.priority.clone(),
            status: self.status.clone(),
            reminder_minutes: self.reminder_minutes,
            is_recurring: self.is_recurring,
            recurrence_pattern: if self.is_recurring {
                non_blank(&self.recurrence_pattern)
            } else {
                None
            },
            meeting_link: non_blank(&self.meeting_link),
            notes: non_blank(&self.notes),
            color: non_blank(&self.color),
        })
    }
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn end_of_day() -> NaiveTime {
    NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN)
}

fn trim_seconds(time: NaiveTime) -> NaiveTime {
    hm(time.hour(), time.minute())
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
