mod commands;
mod logging;
mod render;

use anyhow::Result;
use calboard_core::CalendarBoard;
use calboard_core::config::BoardConfig;
use calboard_core::day_index::{DayKey, YearMonth};
use calboard_core::filter::TypeFilter;
use calboard_core::store::JsonStore;
use clap::{Parser, Subcommand};

use crate::commands::EventArgs;
use crate::render::Render;

#[derive(Parser)]
#[command(name = "calboard")]
#[command(about = "One calendar for your tasks, bugs, todos and events")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month grid
    Month {
        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<YearMonth>,

        /// Show every entry on this day (YYYY-MM-DD)
        #[arg(long)]
        expand: Option<DayKey>,
    },
    /// List entries in start-time order
    Agenda {
        /// Only entries on this day (YYYY-MM-DD)
        #[arg(short, long)]
        date: Option<DayKey>,

        /// Case-insensitive text search over titles and descriptions
        #[arg(short, long)]
        search: Option<String>,

        /// Restrict to one source: all, task, bug or todo
        #[arg(short = 't', long = "type", default_value = "all")]
        type_filter: TypeFilter,
    },
    /// Create a calendar event
    New {
        #[command(flatten)]
        event: EventArgs,
    },
    /// Edit a calendar event
    Edit {
        /// Entry id, e.g. "event-3"
        id: String,

        #[command(flatten)]
        event: EventArgs,
    },
    /// Delete a calendar event
    Delete {
        /// Entry id, e.g. "event-3"
        id: String,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging();

    let config = BoardConfig::load()?;
    let store = JsonStore::new(config.data_path());
    let mut board = CalendarBoard::new(store, &config);
    board.refresh().await;

    let result = match cli.command {
        Commands::Month { month, expand } => commands::month::run(&mut board, month, expand),
        Commands::Agenda {
            date,
            search,
            type_filter,
        } => commands::agenda::run(&mut board, date, search, type_filter),
        Commands::New { event } => commands::new::run(&mut board, event).await,
        Commands::Edit { id, event } => commands::edit::run(&mut board, &id, event).await,
        Commands::Delete { id, yes } => commands::delete::run(&mut board, &id, yes).await,
    };

    // A failed mutation is both queued and returned; report it once
    let failure = result.as_ref().err().map(|e| e.to_string());
    for notification in board.drain_notifications() {
        if failure.as_deref() != Some(notification.message.as_str()) {
            eprintln!("{}", notification.render());
        }
    }

    result
}
