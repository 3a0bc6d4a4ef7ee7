use anyhow::Result;
use calboard_core::CalendarBoard;
use calboard_core::day_index::{DayKey, YearMonth};
use calboard_core::source::Backend;

use crate::render::render_month;

pub fn run<B: Backend>(
    board: &mut CalendarBoard<B>,
    month: Option<YearMonth>,
    expand: Option<DayKey>,
) -> Result<()> {
    // Expanding a day implies showing its month
    let target = month.or_else(|| expand.map(|day| YearMonth::containing(day.date())));
    if let Some(target) = target {
        let view = board.view_mut();
        let delta = months_between(view.current_month, target);
        view.navigate_month(delta);
    }

    if let Some(day) = expand {
        board.toggle_expand(day);
    }

    println!("{}", render_month(board));
    Ok(())
}

fn months_between(from: YearMonth, to: YearMonth) -> i32 {
    (to.year() - from.year()) * 12 + to.month() as i32 - from.month() as i32
}
