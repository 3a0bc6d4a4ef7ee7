use anyhow::Result;
use calboard_core::CalendarBoard;
use calboard_core::day_index::DayKey;
use calboard_core::filter::TypeFilter;
use calboard_core::source::Backend;

use crate::render::render_agenda;

pub fn run<B: Backend>(
    board: &mut CalendarBoard<B>,
    date: Option<DayKey>,
    search: Option<String>,
    type_filter: TypeFilter,
) -> Result<()> {
    let view = board.view_mut();
    view.selected_date = date.map(|day| day.date());
    view.set_search(search.unwrap_or_default());
    view.set_type_filter(type_filter);

    println!("{}", render_agenda(&board.sidebar()));
    Ok(())
}
