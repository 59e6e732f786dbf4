use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use truenorthwatch::config::default_config_path;
use truenorthwatch::db::{default_database_path, party_repo};
use truenorthwatch::logging::{init_logging, LogFormat};
use truenorthwatch::stance::scorer_from_config;
use truenorthwatch::{
    load_config, Categorizer, Config, Database, PipelineConfig, PlatformPipeline,
    SqliteStanceStore, StanceAnalyzer,
};

#[derive(Parser)]
#[command(name = "truenorthwatch")]
#[command(version, about = "Track where Canadian federal parties stand, category by category")]
struct Cli {
    /// Path to config.json (defaults to ~/.truenorthwatch/config.json when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage known parties
    Party {
        #[command(subcommand)]
        action: PartyAction,
    },
    /// Print a party's stances for an election year, computing them on first use
    Stances {
        #[arg(long)]
        party_id: i64,

        #[arg(long)]
        year: i32,
    },
    /// Split a platform text file into categories
    Categorize { file: PathBuf },
    /// Categorize a platform text file and score each category
    Analyze { file: PathBuf },
}

#[derive(Subcommand)]
enum PartyAction {
    Add { name: String },
    List,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_format).context("Failed to initialize logging")?;

    let config = resolve_config(cli.config.as_deref())?;

    match cli.command {
        Command::Party { action } => {
            let db = open_database(&config)?;
            match action {
                PartyAction::Add { name } => {
                    let party = party_repo::insert(&db, name.trim())?;
                    println!("{}", serde_json::to_string_pretty(&party)?);
                }
                PartyAction::List => {
                    let parties = party_repo::list(&db)?;
                    println!("{}", serde_json::to_string_pretty(&parties)?);
                }
            }
        }
        Command::Stances { party_id, year } => {
            let db = open_database(&config)?;
            let store = Arc::new(SqliteStanceStore::new(db));
            let pipeline = PlatformPipeline::from_config(&config, store)?;
            let records = pipeline
                .get_or_compute_platform_stances(party_id, year)
                .await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }
        Command::Categorize { file } => {
            let text = read_text(&file)?;
            let categorized = Categorizer::builtin()?.categorize(&text);
            println!("{}", serde_json::to_string_pretty(&categorized)?);
        }
        Command::Analyze { file } => {
            let text = read_text(&file)?;
            let categorized = Categorizer::builtin()?.categorize(&text);

            let pipeline_config = PipelineConfig::from_config(&config);
            let analyzer = StanceAnalyzer::new(scorer_from_config(&config.scorer)?)
                .with_timeout(pipeline_config.scoring_timeout)
                .with_policy(pipeline_config.on_scoring_failure);
            let analysis = analyzer.analyze(&categorized).await?;

            println!("{}", serde_json::to_string_pretty(&analysis.stances)?);
        }
    }

    Ok(())
}

fn resolve_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        return load_config(path)
            .with_context(|| format!("Failed to load config from {}", path.display()));
    }

    match default_config_path() {
        Some(path) if path.exists() => load_config(&path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        _ => {
            log::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

fn open_database(config: &Config) -> Result<Database> {
    let path = match &config.database_path {
        Some(path) => PathBuf::from(path),
        None => default_database_path().context("Could not determine home directory")?,
    };
    Database::open(&path).with_context(|| format!("Failed to open database at {}", path.display()))
}

fn read_text(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}
