//! Search and type filtering for the sidebar list.
//!
//! The month grid is never filtered; only the side list narrows down.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::entry::{CalendarEntry, SourceType};

/// Sidebar type filter. Native events are not selectable here and always
/// pass, whatever the filter is set to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Task,
    Bug,
    Todo,
}

impl TypeFilter {
    pub fn admits(&self, source_type: SourceType) -> bool {
        match (self, source_type) {
            (TypeFilter::All, _) | (_, SourceType::Event) => true,
            (TypeFilter::Task, SourceType::Task) => true,
            (TypeFilter::Bug, SourceType::Bug) => true,
            (TypeFilter::Todo, SourceType::Todo) => true,
            _ => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TypeFilter::All => "all",
            TypeFilter::Task => "task",
            TypeFilter::Bug => "bug",
            TypeFilter::Todo => "todo",
        }
    }
}

impl fmt::Display for TypeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TypeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(TypeFilter::All),
            "task" | "tasks" => Ok(TypeFilter::Task),
            "bug" | "bugs" => Ok(TypeFilter::Bug),
            "todo" | "todos" => Ok(TypeFilter::Todo),
            other => Err(format!(
                "Unknown type filter '{other}'. Expected all, task, bug or todo"
            )),
        }
    }
}

/// What the sidebar list is narrowed by.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub type_filter: TypeFilter,
    /// Restrict to one local calendar date.
    pub date_scope: Option<NaiveDate>,
}

impl FilterCriteria {
    pub fn new(query: impl Into<String>, type_filter: TypeFilter) -> Self {
        FilterCriteria {
            query: query.into(),
            type_filter,
            date_scope: None,
        }
    }

    pub fn on(mut self, date: NaiveDate) -> Self {
        self.date_scope = Some(date);
        self
    }
}

/// Entries matching `criteria`, sorted ascending by start time.
///
/// The sort is stable, so entries starting at the same instant keep their
/// aggregate order (tasks, bugs, todos, events).
pub fn filter(entries: &[CalendarEntry], criteria: &FilterCriteria) -> Vec<CalendarEntry> {
    // Whitespace-only queries match everything; others are used verbatim
    let needle = if criteria.query.trim().is_empty() {
        String::new()
    } else {
        criteria.query.to_lowercase()
    };

    let mut matched: Vec<CalendarEntry> = entries
        .iter()
        .filter(|entry| entry.matches_text(&needle))
        .filter(|entry| criteria.type_filter.admits(entry.source_type))
        .filter(|entry| {
            criteria
                .date_scope
                .is_none_or(|date| entry.start_time.date_naive() == date)
        })
        .cloned()
        .collect();

    matched.sort_by_key(|entry| entry.start_time);
    matched
}
