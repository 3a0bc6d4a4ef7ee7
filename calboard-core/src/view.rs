//! Month navigation, day selection, overflow expansion and the editor slot.

use chrono::NaiveDate;

use crate::day_index::{DayKey, YearMonth};
use crate::draft::EventDraft;
use crate::entry::CalendarEntry;
use crate::filter::{FilterCriteria, TypeFilter};
use crate::record::NativeEvent;

/// Default number of entries a day cell shows before collapsing the rest.
pub const DEFAULT_VISIBLE_PER_DAY: usize = 3;

/// The single editor slot. Only one draft can exist at a time, which is what
/// keeps two edits of the same event from racing.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Creating {
        date: NaiveDate,
        draft: EventDraft,
    },
    Editing {
        entry: CalendarEntry,
        draft: EventDraft,
    },
}

impl EditorState {
    pub fn is_open(&self) -> bool {
        !matches!(self, EditorState::Closed)
    }

    pub fn draft(&self) -> Option<&EventDraft> {
        match self {
            EditorState::Closed => None,
            EditorState::Creating { draft, .. } | EditorState::Editing { draft, .. } => Some(draft),
        }
    }

    /// Source id of the event being edited, if any.
    pub fn editing_id(&self) -> Option<i64> {
        match self {
            EditorState::Editing { entry, .. } => Some(entry.source_id),
            _ => None,
        }
    }
}

/// What a day cell shows given the overflow cap.
#[derive(Debug, Clone)]
pub struct DayCellView<'a> {
    pub day: DayKey,
    pub visible: Vec<&'a CalendarEntry>,
    pub hidden: usize,
    pub expanded: bool,
}

impl DayCellView<'_> {
    /// The "+N more" affordance, shown while collapsed entries exist.
    pub fn more_label(&self) -> Option<String> {
        (self.hidden > 0).then(|| format!("+{} more", self.hidden))
    }

    pub fn total(&self) -> usize {
        self.visible.len() + self.hidden
    }
}

#[derive(Debug, Clone)]
pub struct ViewState {
    pub current_month: YearMonth,
    pub selected_date: Option<NaiveDate>,
    pub expanded_day: Option<DayKey>,
    pub search_query: String,
    pub type_filter: TypeFilter,
    pub editor: EditorState,
    visible_per_day: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        ViewState::new(YearMonth::current(), DEFAULT_VISIBLE_PER_DAY)
    }
}

impl ViewState {
    pub fn new(current_month: YearMonth, visible_per_day: usize) -> Self {
        ViewState {
            current_month,
            selected_date: None,
            expanded_day: None,
            search_query: String::new(),
            type_filter: TypeFilter::All,
            editor: EditorState::Closed,
            visible_per_day: visible_per_day.max(1),
        }
    }

    pub fn visible_per_day(&self) -> usize {
        self.visible_per_day
    }

    /// Move by whole months. Expansion never carries across months.
    pub fn navigate_month(&mut self, delta: i32) {
        self.current_month = self.current_month.offset(delta);
        self.expanded_day = None;
    }

    /// Select a day. Clicking a native event opens it for editing; clicking
    /// anywhere else on the day opens a create-editor anchored to it.
    pub fn select_date(
        &mut self,
        date: NaiveDate,
        under_cursor: Option<&CalendarEntry>,
        events: &[NativeEvent],
    ) {
        self.selected_date = Some(date);

        match under_cursor {
            Some(entry) if entry.is_event() => {
                self.open_editor(entry, events);
            }
            _ => self.open_creator(date),
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected_date = None;
    }

    /// Expand a day that has more entries than fit, or collapse it again.
    /// Expanding one day collapses any other. Returns whether the day is now
    /// expanded.
    pub fn toggle_expand(&mut self, day: DayKey, entry_count: usize) -> bool {
        if self.expanded_day == Some(day) {
            self.expanded_day = None;
        } else if entry_count > self.visible_per_day {
            self.expanded_day = Some(day);
        }
        self.is_expanded(day)
    }

    pub fn is_expanded(&self, day: DayKey) -> bool {
        self.expanded_day == Some(day)
    }

    /// Apply the overflow cap to a day's entries.
    pub fn day_cell<'a>(&self, day: DayKey, mut entries: Vec<&'a CalendarEntry>) -> DayCellView<'a> {
        let expanded = self.is_expanded(day);
        let hidden = if expanded {
            0
        } else {
            entries.len().saturating_sub(self.visible_per_day)
        };
        entries.truncate(entries.len() - hidden);

        DayCellView {
            day,
            visible: entries,
            hidden,
            expanded,
        }
    }

    pub fn open_creator(&mut self, date: NaiveDate) {
        self.editor = EditorState::Creating {
            date,
            draft: EventDraft::new(date),
        };
    }

    /// Open the editor on a native event. Tasks, bugs and todos are
    /// read-only here, so this is a no-op for them. Returns whether the
    /// editor was opened.
    pub fn open_editor(&mut self, entry: &CalendarEntry, events: &[NativeEvent]) -> bool {
        if !entry.source_type.is_editable() {
            return false;
        }

        let draft = events
            .iter()
            .find(|event| event.id == entry.source_id)
            .map(EventDraft::from_event)
            .unwrap_or_else(|| EventDraft::from_entry(entry));

        self.editor = EditorState::Editing {
            entry: entry.clone(),
            draft,
        };
        true
    }

    /// Discard the draft.
    pub fn close_editor(&mut self) {
        self.editor = EditorState::Closed;
    }

    pub fn draft_mut(&mut self) -> Option<&mut EventDraft> {
        match &mut self.editor {
            EditorState::Closed => None,
            EditorState::Creating { draft, .. } | EditorState::Editing { draft, .. } => Some(draft),
        }
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.search_query = query.into();
    }

    pub fn set_type_filter(&mut self, type_filter: TypeFilter) {
        self.type_filter = type_filter;
    }

    /// Criteria for the sidebar list.
    pub fn criteria(&self) -> FilterCriteria {
        FilterCriteria {
            query: self.search_query.clone(),
            type_filter: self.type_filter,
            date_scope: self.selected_date,
        }
    }
}
