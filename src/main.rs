//! jira-assist CLI
//!
//! Terminal front end for the Jira assistant backend: natural-language search, worklog commands, saved phrases,
//! filters and search history.

mod commands;

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use log::debug;

use jira_assist_lib::{Assistant, ConfigManager, SessionStore};

#[derive(Parser)]
#[command(name = "jira-assist")]
#[command(author, version, long_about = None)]
#[command(about = "Natural-language Jira search and worklog assistant")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Print structured JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Backend base URL (or set JIRA_ASSIST_BACKEND env var)
    #[arg(long, env = "JIRA_ASSIST_BACKEND", global = true)]
    backend: Option<String>,

    /// Use this config file instead of the platform default
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the tracker account the backend works as
    Whoami,

    /// List tracker projects
    Projects,

    /// List recent sprints of a project
    Sprints {
        /// Project key
        project: String,
    },

    /// Edit or inspect the current query
    Query {
        #[command(subcommand)]
        action: commands::query::QueryAction,
    },

    /// Run the current query (search or worklog command)
    Search(commands::query::SearchArgs),

    /// Choose project, user and sprint filters
    Select {
        #[command(subcommand)]
        action: commands::select::SelectAction,
    },

    /// Manage saved phrases
    Phrases {
        #[command(subcommand)]
        action: commands::phrases::PhraseAction,
    },

    /// Browse search history
    History {
        #[command(subcommand)]
        action: commands::history::HistoryAction,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();

    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::at(path),
        None => ConfigManager::new().context("locating config directory")?,
    };
    let mut config = config_manager.load();
    if let Some(backend) = &cli.backend {
        config.backend_url = backend.clone();
    }
    debug!("Using backend {}", config.backend_url);

    let store = SessionStore::new().context("locating data directory")?;
    let session = store.load();
    let assistant = Assistant::new(config).context("building backend client")?;

    let mut ctx = commands::Context {
        assistant,
        config_manager,
        session,
        json: cli.json,
    };

    let result = match cli.command {
        Commands::Whoami => commands::tracker::whoami(&ctx).await,
        Commands::Projects => commands::tracker::projects(&ctx).await,
        Commands::Sprints { project } => commands::tracker::sprints(&ctx, &project).await,
        Commands::Query { action } => commands::query::execute(&mut ctx, action),
        Commands::Search(args) => commands::query::search(&mut ctx, args).await,
        Commands::Select { action } => commands::select::execute(&mut ctx, action).await,
        Commands::Phrases { action } => commands::phrases::execute(&mut ctx, action).await,
        Commands::History { action } => commands::history::execute(&mut ctx, action).await,
        Commands::Config { action } => commands::config::execute(&ctx, action),
    };

    store
        .save(&ctx.session)
        .with_context(|| format!("saving session to {}", store.path().display()))?;
    result
}
