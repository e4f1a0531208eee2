mod play;

use std::{path::PathBuf, process::ExitCode};

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use filmle_core::{
    catalog::DEFAULT_SEARCH_LIMIT,
    config::{self, AppConfig},
    DailyGame, DaySpec, GuessError, MaskedCredits, MovieId,
};
use serde::Serialize;
use tracing::{error, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Guess the movie of the day from the credits it shares with your guesses.
#[derive(Debug, Parser)]
#[command(name = "filmle", version)]
struct Cli {
    /// Config file to use instead of the one in the user config directory.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the day and the masked credits of its movie.
    Daily {
        /// YYYY-MM-DD, or an RFC 3339 timestamp.
        #[arg(long)]
        date: Option<DaySpec>,
    },
    /// Score one guess by movie id.
    Guess {
        id: String,
        #[arg(long)]
        date: Option<DaySpec>,
    },
    /// Find movie ids by title.
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Catalog counters.
    Stats,
    /// Interactive session on stdin.
    Play {
        #[arg(long)]
        date: Option<DaySpec>,
    },
}

#[derive(Debug, Serialize)]
struct DailyResponse {
    date: NaiveDate,
    credits: MaskedCredits,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_logging();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)?,
        None => {
            config::ensure_default_config()?;
            AppConfig::load()?
        }
    };
    info!("using catalog {}", config.catalog_path.display());
    let game = DailyGame::from_config(&config)?;
    let resolve_day = |date: Option<DaySpec>| game.resolve_day(date, Utc::now());

    match cli.command {
        Command::Daily { date } => {
            let date = resolve_day(date);
            let credits = game.masked_credits(date)?;
            print_json(&DailyResponse { date, credits })?;
        }
        Command::Guess { id, date } => {
            let day = resolve_day(date);
            match game.guess(&MovieId::new(id.trim()), day) {
                Ok(result) => print_json(&result)?,
                Err(err @ GuessError::UnknownMovie(_)) => {
                    print_json(&ErrorResponse {
                        error: err.to_string(),
                    })?;
                    return Ok(ExitCode::from(2));
                }
                Err(err) => return Err(err.into()),
            }
        }
        Command::Search { query, limit } => {
            print_json(&serde_json::json!({ "results": game.search(&query, limit) }))?;
        }
        Command::Stats => print_json(&game.stats())?,
        Command::Play { date } => {
            let day = resolve_day(date);
            if let Err(err) = play::run(&game, day).await {
                error!("play session ended with an error: {err:#}");
                return Err(err);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .compact()
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
