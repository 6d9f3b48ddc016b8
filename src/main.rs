use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use film_scout::analytics::{
    FieldPosition, ReportParams, TendencyEngine, TendencyQuery, TendencySettings,
};
use film_scout::api::{build_router, state::AppState};
use film_scout::config::AppConfig;
use film_scout::ingest::{self, IngestError};
use film_scout::models::{Down, FilmId, GameFilm, PlayRecord, PlayResult};
use film_scout::storage::{JsonlPlayStore, StorageConfig};

#[derive(Parser)]
#[command(name = "film-scout")]
#[command(about = "Opponent tendency analytics over charted game film")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Bind address
        #[arg(long)]
        host: Option<String>,

        /// Port number
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a tendency report as JSON
    Report {
        /// Report on a single game film
        #[arg(long, conflicts_with = "opponent")]
        film: Option<FilmId>,

        /// Report on every game against this opponent
        #[arg(long)]
        opponent: Option<String>,

        /// Which part of the report to print
        #[arg(long, value_enum, default_value = "full")]
        section: Section,

        /// Only plays on this down (1st, 2nd, 3rd, 4th)
        #[arg(long)]
        down: Option<Down>,

        /// Minimum yards to go (inclusive)
        #[arg(long)]
        distance_gte: Option<u32>,

        /// Maximum yards to go (inclusive)
        #[arg(long)]
        distance_lte: Option<u32>,

        /// Only plays from this formation
        #[arg(long)]
        formation: Option<String>,

        /// Only plays in this field position (redZone, midfield, backedUp)
        #[arg(long)]
        field_position: Option<FieldPosition>,

        /// Only plays with this result
        #[arg(long)]
        play_result: Option<PlayResult>,
    },

    /// List opponents with logged film
    Opponents,

    /// Validate and import games and plays from JSONL files
    Import {
        /// JSONL file of game films
        #[arg(long)]
        games: Option<PathBuf>,

        /// JSONL file of play records
        #[arg(long)]
        plays: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Section {
    Full,
    Defense,
    Offense,
    Formations,
    PlayCalls,
}

fn init_tracing(level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_found = cli.config.exists();
    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("Failed to load config {}", cli.config.display()))?;
    if let Some(dir) = cli.data_dir {
        config.data_dir = dir;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    init_tracing(&config.log_level, cli.json_logs);
    tracing::info!("Starting film-scout v{}", env!("CARGO_PKG_VERSION"));
    if !config_found {
        tracing::warn!(
            "Config file {} not found, using defaults",
            cli.config.display()
        );
    }

    let storage = StorageConfig::new(config.data_dir.clone());
    let settings = TendencySettings::from_config(&config.analytics)
        .context("Invalid personnel rules")?;
    let engine = TendencyEngine::new(Arc::new(JsonlPlayStore::new(storage.clone())), settings);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let app = build_router(AppState::new(engine), &config.server);
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {}", addr))?;
            tracing::info!("Listening on http://{}", addr);
            tracing::info!("Data directory: {}", config.data_dir.display());
            axum::serve(listener, app).await?;
        }
        Commands::Report {
            film,
            opponent,
            section,
            down,
            distance_gte,
            distance_lte,
            formation,
            field_position,
            play_result,
        } => {
            let query = TendencyQuery::try_from(ReportParams {
                film_id: film,
                opponent,
                down,
                distance_gte,
                distance_lte,
                formation,
                field_position,
                play_result,
            })?;

            match section {
                Section::Full => print_json(&engine.report(&query).await?)?,
                Section::Defense => print_json(&engine.defense(&query).await?)?,
                Section::Offense => print_json(&engine.offense(&query).await?)?,
                Section::Formations => print_json(&engine.formations(&query).await?)?,
                Section::PlayCalls => print_json(&engine.play_calls(&query).await?)?,
            }
        }
        Commands::Opponents => {
            let opponents = engine.opponents().await?;
            if opponents.is_empty() {
                println!("No opponents logged in {}", config.data_dir.display());
            }
            for o in &opponents {
                println!(
                    "{:<30} {:>3} game(s)  {} .. {}",
                    o.opponent_name, o.game_count, o.first_game_date, o.last_game_date
                );
            }
        }
        Commands::Import { games, plays } => {
            if games.is_none() && plays.is_none() {
                bail!("Nothing to import: pass --games and/or --plays");
            }
            let games: Vec<GameFilm> = match games {
                Some(path) => ingest::load_jsonl(&path)?,
                None => Vec::new(),
            };
            let plays: Vec<PlayRecord> = match plays {
                Some(path) => ingest::load_jsonl(&path)?,
                None => Vec::new(),
            };

            match ingest::import(&storage, games, plays) {
                Ok(result) => {
                    println!(
                        "Imported {} game(s) and {} play(s) into {}",
                        result.games_imported,
                        result.plays_imported,
                        config.data_dir.display()
                    );
                }
                Err(IngestError::Invalid(problems)) => {
                    for problem in &problems {
                        eprintln!("  {}", problem);
                    }
                    bail!("{} record(s) rejected; nothing was imported", problems.len());
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    Ok(())
}
