//! The canonical calendar entry every source is adapted into.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::day_index::DayKey;

/// Which domain an entry was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Task,
    Bug,
    Todo,
    Event,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Task => "task",
            SourceType::Bug => "bug",
            SourceType::Todo => "todo",
            SourceType::Event => "event",
        }
    }

    /// Only native events can be created, edited or deleted from the calendar.
    pub fn is_editable(&self) -> bool {
        matches!(self, SourceType::Event)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "task" => Ok(SourceType::Task),
            "bug" => Ok(SourceType::Bug),
            "todo" => Ok(SourceType::Todo),
            "event" => Ok(SourceType::Event),
            other => Err(format!("Unknown source type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Map a task/todo priority or bug severity. Matching is case-sensitive;
    /// anything unrecognised is medium.
    pub fn from_tier(value: &str) -> Self {
        match value {
            "CRITICAL" => Priority::Critical,
            "HIGH" => Priority::High,
            "MEDIUM" => Priority::Medium,
            "LOW" => Priority::Low,
            _ => Priority::Medium,
        }
    }

    /// Map a native event's stored priority, ignoring case.
    pub fn from_event(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_lowercase()).as_deref() {
            Some("critical") => Priority::Critical,
            Some("high") => Priority::High,
            Some("low") => Priority::Low,
            _ => Priority::Medium,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Critical => "critical",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display color token for an entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryColor {
    Green,
    Blue,
    Purple,
    Red,
    Orange,
    Yellow,
    Indigo,
    Neutral,
    /// A color stored verbatim on a native event (e.g. "#0ea5e9").
    Custom(String),
}

impl EntryColor {
    /// Color for a task, keyed by its status.
    pub fn for_task_status(status: &str) -> Self {
        match status {
            "DONE" => EntryColor::Green,
            "IN_PROGRESS" => EntryColor::Blue,
            "REVIEW" => EntryColor::Purple,
            "BLOCKED" => EntryColor::Red,
            _ => EntryColor::Neutral,
        }
    }

    /// Four-tier scheme shared by bug severity and todo priority.
    pub fn for_tier(tier: &str) -> Self {
        match tier {
            "CRITICAL" => EntryColor::Red,
            "HIGH" => EntryColor::Orange,
            "MEDIUM" => EntryColor::Yellow,
            "LOW" => EntryColor::Green,
            _ => EntryColor::Neutral,
        }
    }

    /// Color stored on a native event; indigo when absent or blank.
    pub fn for_event(stored: Option<&str>) -> Self {
        let Some(stored) = stored.map(str::trim).filter(|s| !s.is_empty()) else {
            return EntryColor::Indigo;
        };

        match stored.to_ascii_lowercase().as_str() {
            "green" => EntryColor::Green,
            "blue" => EntryColor::Blue,
            "purple" => EntryColor::Purple,
            "red" => EntryColor::Red,
            "orange" => EntryColor::Orange,
            "yellow" => EntryColor::Yellow,
            "indigo" => EntryColor::Indigo,
            "neutral" | "gray" | "grey" => EntryColor::Neutral,
            _ => EntryColor::Custom(stored.to_string()),
        }
    }

    pub fn token(&self) -> &str {
        match self {
            EntryColor::Green => "green",
            EntryColor::Blue => "blue",
            EntryColor::Purple => "purple",
            EntryColor::Red => "red",
            EntryColor::Orange => "orange",
            EntryColor::Yellow => "yellow",
            EntryColor::Indigo => "indigo",
            EntryColor::Neutral => "neutral",
            EntryColor::Custom(value) => value,
        }
    }
}

impl fmt::Display for EntryColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.token())
    }
}

/// One displayable calendar item, whatever domain it came from.
///
/// Entries are derived: they are rebuilt from the raw records on every fetch
/// and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// `{source_type}-{source_id}`, unique across the merged set.
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Local>,
    pub end_time: DateTime<Local>,
    pub source_type: SourceType,
    pub source_id: i64,
    pub color: EntryColor,
    pub priority: Priority,
    /// Verbatim source status; vocabularies differ per source type.
    pub status: String,
}

impl CalendarEntry {
    pub fn entry_id(source_type: SourceType, source_id: i64) -> String {
        format!("{}-{}", source_type, source_id)
    }

    /// Local calendar day this entry is bucketed under.
    pub fn day_key(&self) -> DayKey {
        DayKey::of(&self.start_time)
    }

    pub fn is_event(&self) -> bool {
        self.source_type == SourceType::Event
    }

    /// Case-insensitive substring match on title or description.
    /// `needle` must already be lowercased.
    pub fn matches_text(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(needle)
            || self
                .description
                .as_deref()
                .is_some_and(|d| d.to_lowercase().contains(needle))
    }
}

impl fmt::Display for CalendarEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}
