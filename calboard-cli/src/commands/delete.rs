use anyhow::{Result, bail};
use calboard_core::CalendarBoard;
use calboard_core::source::Backend;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use crate::render::Render;

pub async fn run<B: Backend>(board: &mut CalendarBoard<B>, id: &str, yes: bool) -> Result<()> {
    if !board.request_delete(id) {
        match board.entry(id) {
            Some(entry) => bail!("'{}' is a {} and is read-only here", id, entry.source_type),
            None => bail!("No entry '{}'", id),
        }
    }

    if !yes {
        if let Some(entry) = board.pending_delete() {
            println!("  {}", entry.render());
        }
        let confirmed = Confirm::new()
            .with_prompt("  Delete this event?")
            .default(false)
            .interact()?;
        if !confirmed {
            board.cancel_delete();
            println!("{}", "  Kept".dimmed());
            return Ok(());
        }
    }

    board.confirm_delete().await?;
    Ok(())
}
