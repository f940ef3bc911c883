use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use taskrec_core::{DownloadTask, TaskStatus};
use taskrec_infrastructure::{
    RecordStore, StoreConfig,
    logging::{self, LoggerConfig},
};

mod commands;

#[derive(Parser)]
#[command(name = "taskrec")]
#[command(about = "Inspect and clean up background task records", long_about = None)]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Store root directory, overriding the config file
    #[arg(long, global = true)]
    base_dir: Option<PathBuf>,

    /// Collection name, overriding the config file
    #[arg(long, global = true)]
    collection: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List records
    List {
        #[arg(long)]
        group: Option<String>,
        /// Only records in this status (e.g. running, failed)
        #[arg(long)]
        status: Option<TaskStatus>,
    },
    /// Print one record as JSON
    Show { task_id: String },
    /// Delete records older than the given age
    Prune {
        #[command(flatten)]
        age: AgeArgs,
        #[arg(long)]
        group: Option<String>,
        /// Only print what would be deleted
        #[arg(long)]
        dry_run: bool,
    },
    /// Delete records by task id
    Delete {
        #[arg(required = true)]
        task_ids: Vec<String>,
    },
    /// Delete all records, or all records of one group
    Clear {
        #[arg(long)]
        group: Option<String>,
    },
}

#[derive(Args)]
struct AgeArgs {
    #[arg(long, default_value_t = 0)]
    days: i64,
    #[arg(long, default_value_t = 0)]
    hours: i64,
    #[arg(long, default_value_t = 0)]
    minutes: i64,
}

impl AgeArgs {
    fn to_duration(&self) -> Result<chrono::Duration> {
        let minutes = self
            .days
            .checked_mul(24 * 60)
            .and_then(|m| m.checked_add(self.hours.checked_mul(60)?))
            .and_then(|m| m.checked_add(self.minutes))
            .context("age is too large")?;
        anyhow::ensure!(minutes > 0, "age must be positive; pass --days, --hours or --minutes");
        chrono::Duration::try_minutes(minutes).context("age is too large")
    }
}

fn load_config(cli: &Cli) -> Result<StoreConfig> {
    let mut config = match &cli.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::load_default()?,
    };
    if let Some(base_dir) = &cli.base_dir {
        config.base_dir = Some(base_dir.clone());
    }
    if let Some(collection) = &cli.collection {
        config.collection = collection.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    logging::logger_init(&LoggerConfig::from(&config.log))?;

    let store: RecordStore<DownloadTask> = RecordStore::open(&config)
        .await
        .context("Failed to open record store")?;
    tracing::debug!(collection = store.collection(), "record store ready");

    match cli.command {
        Commands::List { group, status } => {
            commands::records::list(&store, group.as_deref(), status).await?
        }
        Commands::Show { task_id } => commands::records::show(&store, &task_id).await?,
        Commands::Prune {
            age,
            group,
            dry_run,
        } => commands::cleanup::prune(&store, age.to_duration()?, group.as_deref(), dry_run).await?,
        Commands::Delete { task_ids } => commands::cleanup::delete(&store, &task_ids).await?,
        Commands::Clear { group } => commands::cleanup::clear(&store, group.as_deref()).await?,
    }

    Ok(())
}
