pub mod agenda;
pub mod delete;
pub mod edit;
pub mod month;
pub mod new;

use anyhow::{Context, Result};
use calboard_core::day_index::DayKey;
use calboard_core::draft::EventDraft;
use chrono::{Duration, NaiveDateTime, NaiveTime};
use clap::Args;

/// Event fields shared by `new` and `edit`. Anything left out keeps the
/// draft's current value.
#[derive(Args, Debug, Default)]
pub struct EventArgs {
    /// Event title
    #[arg(long)]
    pub title: Option<String>,

    /// Day of the event (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<DayKey>,

    /// Start time (HH:MM)
    #[arg(short, long)]
    pub start: Option<String>,

    /// End time (HH:MM)
    #[arg(short, long, conflicts_with = "duration")]
    pub end: Option<String>,

    /// Length instead of an end time (e.g. "30m", "1h 30m")
    #[arg(long)]
    pub duration: Option<String>,

    /// Span the whole day
    #[arg(long)]
    pub all_day: bool,

    #[arg(short, long)]
    pub location: Option<String>,

    #[arg(long)]
    pub description: Option<String>,

    /// LOW, MEDIUM, HIGH or CRITICAL
    #[arg(short, long)]
    pub priority: Option<String>,

    /// Recurrence pattern, stored as-is (e.g. "WEEKLY")
    #[arg(long)]
    pub recurring: Option<String>,

    /// Display color, a name or "#rrggbb"
    #[arg(long)]
    pub color: Option<String>,
}

impl EventArgs {
    /// Write the given flags into a draft. Moving the start without an end
    /// keeps the event's length.
    pub fn apply(self, draft: &mut EventDraft) -> Result<()> {
        if let Some(title) = self.title {
            draft.title = title;
        }
        if let Some(day) = self.date {
            draft.move_to(day.date());
        }
        if self.all_day {
            draft.all_day = true;
        }

        let length = draft.ends_at() - draft.starts_at();
        if let Some(start) = self.start {
            draft.start = parse_time(&start)?;
            draft.all_day = false;
            let end = draft.starts_at() + length;
            set_end(draft, end);
        }
        if let Some(end) = self.end {
            draft.end_date = draft.date;
            draft.end = parse_time(&end)?;
            draft.all_day = false;
        } else if let Some(duration) = self.duration {
            let end = draft.starts_at() + parse_duration(&duration)?;
            set_end(draft, end);
            draft.all_day = false;
        }

        if let Some(location) = self.location {
            draft.location = non_empty(location);
        }
        if let Some(description) = self.description {
            draft.description = non_empty(description);
        }
        if let Some(priority) = self.priority {
            draft.priority = priority.to_uppercase();
        }
        if let Some(pattern) = self.recurring {
            draft.is_recurring = !pattern.trim().is_empty();
            draft.recurrence_pattern = non_empty(pattern);
        }
        if let Some(color) = self.color {
            draft.color = non_empty(color);
        }

        Ok(())
    }
}

fn set_end(draft: &mut EventDraft, end: NaiveDateTime) {
    draft.end_date = end.date();
    draft.end = end.time();
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}

pub fn parse_time(input: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(input.trim(), "%H:%M")
        .with_context(|| format!("Could not parse time: \"{}\". Expected HH:MM", input))
}

fn parse_duration(input: &str) -> Result<Duration> {
    let std_dur = humantime::parse_duration(input)
        .with_context(|| format!("Could not parse duration: \"{}\"", input))?;
    Duration::from_std(std_dur).context("Duration too large")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft() -> EventDraft {
        EventDraft::new(NaiveDate::from_ymd_opt(2026, 3, 20).unwrap())
    }

    fn hm(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_moving_start_keeps_length() {
        let mut draft = draft();
        let args = EventArgs {
            start: Some("14:30".to_string()),
            ..EventArgs::default()
        };
        args.apply(&mut draft).unwrap();

        assert_eq!(draft.start, hm(14, 30));
        assert_eq!(draft.end, hm(15, 30));
    }

    #[test]
    fn test_duration_sets_end() {
        let mut draft = draft();
        let args = EventArgs {
            start: Some("13:00".to_string()),
            duration: Some("45m".to_string()),
            ..EventArgs::default()
        };
        args.apply(&mut draft).unwrap();

        assert_eq!(draft.end, hm(13, 45));
    }

    #[test]
    fn test_duration_past_midnight_ends_next_day() {
        let mut draft = draft();
        let args = EventArgs {
            start: Some("23:30".to_string()),
            duration: Some("2h".to_string()),
            ..EventArgs::default()
        };
        args.apply(&mut draft).unwrap();

        assert_eq!(draft.end_date, NaiveDate::from_ymd_opt(2026, 3, 21).unwrap());
        assert_eq!(draft.end, hm(1, 30));
    }

    #[test]
    fn test_new_date_moves_both_ends() {
        let mut draft = draft();
        let args = EventArgs {
            date: Some("2026-04-02".parse().unwrap()),
            ..EventArgs::default()
        };
        args.apply(&mut draft).unwrap();

        assert_eq!(draft.date, NaiveDate::from_ymd_opt(2026, 4, 2).unwrap());
        assert_eq!(draft.end_date, draft.date);
    }

    #[test]
    fn test_recurring_flag_sets_pattern() {
        let mut draft = draft();
        let args = EventArgs {
            recurring: Some("WEEKLY".to_string()),
            priority: Some("high".to_string()),
            ..EventArgs::default()
        };
        args.apply(&mut draft).unwrap();

        assert!(draft.is_recurring);
        assert_eq!(draft.recurrence_pattern.as_deref(), Some("WEEKLY"));
        assert_eq!(draft.priority, "HIGH");
    }

    #[test]
    fn test_parse_time_rejects_garbage() {
        assert_eq!(parse_time("09:15").unwrap(), hm(9, 15));
        assert!(parse_time("quarter past nine").is_err());
    }
}
