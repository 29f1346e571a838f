//! `mediasearch-cli` — a small `clap`-derived tool that exercises the query
//! runtime from a terminal, the way `mcp-agent-mail-cli` wraps its own core
//! crate. Not the index bootstrap/ingestion CLI named in §1 as out of
//! scope: this one only ever *reads* an already-opened index.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use mediasearch::config::Config;
use mediasearch::index::{seed, IndexSet};
use mediasearch::models::Mode;
use mediasearch::providers::ProviderClients;
use mediasearch::query::parser;
use mediasearch::transport::batch;
use mediasearch::AppState;

#[derive(Debug, Parser)]
#[command(name = "mediasearch-cli", about = "Exercise the mediasearch query runtime from a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run an autocomplete or search query against an index and print the
    /// resulting envelope as JSON.
    Query {
        /// Raw query text, e.g. "dune" or "person:denis villeneuve".
        text: String,
        #[arg(long, value_enum, default_value = "search")]
        mode: CliMode,
        #[arg(long, default_value_t = 20)]
        limit: usize,
        #[arg(long)]
        sources: Option<String>,
        /// Use a transient in-memory index pre-loaded with demo data
        /// instead of opening `INDEX_PATH`.
        #[arg(long)]
        demo: bool,
        #[arg(long)]
        index_path: Option<PathBuf>,
    },
    /// Seed the configured (or given) index path with demo data.
    Seed {
        #[arg(long)]
        index_path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum CliMode {
    Autocomplete,
    Search,
}

impl From<CliMode> for Mode {
    fn from(value: CliMode) -> Self {
        match value {
            CliMode::Autocomplete => Mode::Autocomplete,
            CliMode::Search => Mode::Search,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt().with_env_filter(
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
    ).init();

    let cli = Cli::parse();

    match cli.command {
        Command::Query { text, mode, limit, sources, demo, index_path } => {
            let mut config = Config::from_env()?;
            if let Some(path) = &index_path {
                config.index_path = path.to_string_lossy().into_owned();
            }

            let index = if demo {
                let index = IndexSet::open_in_memory()?;
                seed::seed_demo_data(&index)?;
                index
            } else {
                IndexSet::open_or_create(std::path::Path::new(&config.index_path))?
            };

            let providers = ProviderClients::from_config(&config.providers);
            let mut parsed = parser::parse(&text, false);
            if let Some(sources) = sources {
                parsed.source_hint = Some(
                    sources.split(',').map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty()).collect(),
                );
            }

            let state = AppState::new(config, index, providers);
            let envelope = batch::run(&state, &parsed, mode.into(), limit).await?;
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
        Command::Seed { index_path } => {
            let mut config = Config::from_env()?;
            if let Some(path) = &index_path {
                config.index_path = path.to_string_lossy().into_owned();
            }
            let index = IndexSet::open_or_create(std::path::Path::new(&config.index_path))?;
            seed::seed_demo_data(&index)?;
            println!("seeded demo data into {}", config.index_path);
        }
    }

    Ok(())
}
