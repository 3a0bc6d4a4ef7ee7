use anyhow::Result;
use calboard_core::CalendarBoard;
use calboard_core::source::Backend;
use chrono::Local;
use dialoguer::Input;

use super::EventArgs;

pub async fn run<B: Backend>(board: &mut CalendarBoard<B>, mut args: EventArgs) -> Result<()> {
    let interactive = args.title.is_none();

    if interactive {
        let title: String = Input::new().with_prompt("  Title").interact_text()?;
        args.title = Some(title);
    }

    let date = args
        .date
        .map(|day| day.date())
        .unwrap_or_else(|| Local::now().date_naive());
    board.select_date(date, None);

    if interactive && args.location.is_none() {
        let location: String = Input::new()
            .with_prompt("  Where? (skip)")
            .default(String::new())
            .show_default(false)
            .interact_text()?;
        args.location = Some(location);
    }

    if let Some(draft) = board.view_mut().draft_mut() {
        args.apply(draft)?;
    }

    if interactive {
        println!();
    }
    board.submit_editor().await?;
    Ok(())
}
