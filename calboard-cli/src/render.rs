//! Terminal rendering for calboard types.
//!
//! Extension traits that add colored output to calboard-core types using
//! owo_colors.

use calboard_core::day_index::{DayKey, GridCell, MonthGrid};
use calboard_core::notify::{Notification, NotificationLevel};
use calboard_core::source::Backend;
use calboard_core::{CalendarBoard, CalendarEntry, EntryColor};
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;

/// Width of one day column in the month grid, including the separator.
const CELL_WIDTH: usize = 14;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Paint text in an entry color.
pub fn paint(color: &EntryColor, text: &str) -> String {
    match color {
        EntryColor::Green => text.green().to_string(),
        EntryColor::Blue => text.blue().to_string(),
        EntryColor::Purple => text.purple().to_string(),
        EntryColor::Red => text.red().to_string(),
        EntryColor::Orange => text.truecolor(249, 115, 22).to_string(),
        EntryColor::Yellow => text.yellow().to_string(),
        EntryColor::Indigo => text.truecolor(99, 102, 241).to_string(),
        EntryColor::Neutral => text.dimmed().to_string(),
        EntryColor::Custom(value) => match parse_hex(value) {
            Some((r, g, b)) => text.truecolor(r, g, b).to_string(),
            None => text.to_string(),
        },
    }
}

fn parse_hex(value: &str) -> Option<(u8, u8, u8)> {
    let hex = value.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

impl Render for CalendarEntry {
    fn render(&self) -> String {
        let time = if self.start_time == self.end_time {
            format!("{:<11}", self.start_time.format("%H:%M"))
        } else {
            format!(
                "{}–{}",
                self.start_time.format("%H:%M"),
                self.end_time.format("%H:%M")
            )
        };
        let tag = format!("[{} {}]", self.source_type, self.status);

        format!(
            "{} {} {} {}",
            time.dimmed(),
            paint(&self.color, "●"),
            self.title,
            tag.dimmed()
        )
    }
}

impl Render for Notification {
    fn render(&self) -> String {
        match self.level {
            NotificationLevel::Success => self.message.green().to_string(),
            NotificationLevel::Error => self.message.red().to_string(),
            NotificationLevel::Info => self.message.dimmed().to_string(),
        }
    }
}

/// Render the month in view as a Sunday-first grid of capped day cells.
pub fn render_month<B: Backend>(board: &CalendarBoard<B>) -> String {
    let grid: MonthGrid = board.month_grid();
    let today = Local::now().date_naive();
    let mut lines = Vec::new();

    let first = grid.month.first_day();
    lines.push(first.format("%B %Y").to_string().bold().to_string());
    lines.push(
        WEEKDAYS
            .iter()
            .map(|d| format!("{:<width$}", d, width = CELL_WIDTH))
            .collect::<String>()
            .dimmed()
            .to_string(),
    );

    for week in grid.weeks() {
        let columns: Vec<Vec<String>> = week
            .iter()
            .map(|cell| match cell {
                GridCell::Blank => Vec::new(),
                GridCell::Day { day, .. } => render_cell(board, *day, today),
            })
            .collect();

        let height = columns.iter().map(Vec::len).max().unwrap_or(0);
        for row in 0..height {
            let line: String = columns
                .iter()
                .map(|col| col.get(row).cloned().unwrap_or_else(|| " ".repeat(CELL_WIDTH)))
                .collect();
            lines.push(line.trim_end().to_string());
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// One column of lines for a day: the day number, then capped entries.
/// Every line is exactly CELL_WIDTH visible characters wide.
fn render_cell<B: Backend>(board: &CalendarBoard<B>, day: DayKey, today: NaiveDate) -> Vec<String> {
    let cell = board.day_cell(day);
    let mut column = Vec::with_capacity(cell.visible.len() + 2);

    let number = format!("{:<width$}", day.date().format("%-d"), width = CELL_WIDTH);
    column.push(if day.date() == today {
        number.reversed().to_string()
    } else {
        number.bold().to_string()
    });

    for entry in &cell.visible {
        let title = truncate(&entry.title, CELL_WIDTH - 3);
        let padded = format!("{:<width$}", title, width = CELL_WIDTH - 2);
        column.push(format!("{} {}", paint(&entry.color, "●"), paint(&entry.color, &padded)));
    }

    if let Some(more) = cell.more_label() {
        column.push(format!("{:<width$}", more, width = CELL_WIDTH).dimmed().to_string());
    }

    column
}

/// Render the sidebar list, grouped by day.
pub fn render_agenda(entries: &[CalendarEntry]) -> String {
    if entries.is_empty() {
        return "No entries found".dimmed().to_string();
    }

    let today = Local::now().date_naive();
    let mut lines = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for entry in entries {
        let date = entry.start_time.date_naive();
        if current_date != Some(date) {
            if current_date.is_some() {
                lines.push(String::new());
            }
            lines.push(format_date_label(date, today).bold().to_string());
            current_date = Some(date);
        }
        lines.push(format!("  {}", entry.render()));
    }

    lines.join("\n")
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Mar 13")
fn format_date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
    cut.push('…');
    cut
}
