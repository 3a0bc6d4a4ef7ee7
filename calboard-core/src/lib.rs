//! Calendar aggregation engine.
//!
//! Merges four differently shaped record streams (tasks, bugs, todos and
//! native calendar events) into one day-indexed calendar:
//! - `adapter` maps raw records into `CalendarEntry` values
//! - `aggregate` and `day_index` merge and bucket them by local day
//! - `filter` narrows the sidebar list
//! - `view` and `mutation` drive navigation and the event editor
//! - `board` ties it all to the collaborator services in `source`

pub mod adapter;
pub mod aggregate;
pub mod board;
pub mod config;
pub mod day_index;
pub mod draft;
pub mod entry;
pub mod error;
pub mod filter;
pub mod mutation;
pub mod notify;
pub mod record;
pub mod source;
pub mod store;
pub mod timestamp;
pub mod view;

pub use board::CalendarBoard;
pub use entry::{CalendarEntry, EntryColor, Priority, SourceType};
pub use error::{CalboardError, CalboardResult};
