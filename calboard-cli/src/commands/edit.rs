use anyhow::{Result, bail};
use calboard_core::CalendarBoard;
use calboard_core::source::Backend;

use super::EventArgs;

pub async fn run<B: Backend>(board: &mut CalendarBoard<B>, id: &str, args: EventArgs) -> Result<()> {
    let Some(entry) = board.entry(id) else {
        bail!("No entry '{}'", id);
    };
    if !entry.is_event() {
        bail!("'{}' is a {} and is read-only here", id, entry.source_type);
    }

    board.open_editor(id);
    if let Some(draft) = board.view_mut().draft_mut() {
        args.apply(draft)?;
    }

    board.submit_editor().await?;
    Ok(())
}
