//! Gamebox command line
//!
//! Searches the game catalog and manages a personal game library from the
//! terminal.

mod commands;

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use gamebox_catalog::GameStatus;
use gamebox_library::{LibraryView, SortOrder};
use std::path::PathBuf;

/// Gamebox - track the games you play
#[derive(Parser)]
#[command(name = "gamebox", version, about)]
struct Cli {
    /// Configuration file (defaults to ~/.gamebox/config.toml, then /etc/gamebox)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Profile whose library to use
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the catalog by title
    Search {
        /// Search text
        #[arg(required_unless_present = "interactive", num_args = 1..)]
        query: Vec<String>,
        /// Read queries from stdin, one per line, searching after each pause
        #[arg(long, short, conflicts_with = "query")]
        interactive: bool,
    },
    /// Show top rated games
    Top,
    /// Add a catalog game to your library
    Add {
        /// Catalog game id
        id: String,
        /// Save it for later instead of marking it as playing
        #[arg(long)]
        wishlist: bool,
    },
    /// List your library
    List {
        /// Sort by date, rating or title
        #[arg(long, default_value = "date")]
        sort: SortOrder,
        /// Only titles containing this text
        #[arg(long)]
        filter: Option<String>,
        /// all, collection or wishlist
        #[arg(long, default_value = "all")]
        view: LibraryView,
    },
    /// Change status, rating, review, platform or completion date
    Update {
        /// Catalog game id
        id: String,
        #[arg(long)]
        status: Option<GameStatus>,
        /// 0 to 5, in half points
        #[arg(long)]
        rating: Option<f32>,
        #[arg(long)]
        review: Option<String>,
        /// Platform you play on
        #[arg(long)]
        platform: Option<String>,
        /// Completion date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_completed")]
        completed: Option<NaiveDate>,
        /// Remove the completion date
        #[arg(long)]
        clear_completed: bool,
    },
    /// Remove a game from your library
    Remove {
        /// Catalog game id
        id: String,
    },
    /// Show profile statistics
    Stats,
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    let ctx = commands::Context::load(cli.config.as_deref(), cli.user)?;

    match cli.command {
        Commands::Search { interactive: true, .. } => commands::catalog::interactive(&ctx).await?,
        Commands::Search { query, .. } => commands::catalog::search(&ctx, &query.join(" ")).await?,
        Commands::Top => commands::catalog::top(&ctx).await?,
        Commands::Add { id, wishlist } => {
            let status = if wishlist {
                GameStatus::Backlog
            } else {
                GameStatus::Playing
            };
            commands::library::add(&ctx, &id, status).await?
        }
        Commands::List { sort, filter, view } => {
            commands::library::list(&ctx, sort, filter.as_deref(), view).await?
        }
        Commands::Update {
            id,
            status,
            rating,
            review,
            platform,
            completed,
            clear_completed,
        } => {
            let completed_at = if clear_completed {
                Some(None)
            } else {
                completed.map(Some)
            };
            let patch = gamebox_library::EntryPatch {
                status,
                rating,
                user_review: review,
                played_on: platform,
                completed_at,
            };
            commands::library::update(&ctx, &id, patch).await?
        }
        Commands::Remove { id } => commands::library::remove(&ctx, &id).await?,
        Commands::Stats => commands::stats::run(&ctx).await?,
    }

    Ok(())
}

/// Setup logging with tracing
fn setup_logging() {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .init();
}
