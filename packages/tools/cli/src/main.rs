//! Sift CLI (`sift`)
//!
//! 검색 디스크립터를 SQL로 확인하고, 스키마 관계를 조회하고,
//! 첫 번째 일치 행을 가져오는 Operator 도구입니다.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod config;

use config::CliConfig;

#[derive(Parser)]
#[command(name = "sift")]
#[command(author, version, about = "Sift CLI - compile search descriptors into SQL", long_about = None)]
struct Cli {
    /// Schema YAML file (overrides config)
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    // ─────────────────────────────────────────────────────────────────────────
    // Compile
    // ─────────────────────────────────────────────────────────────────────────
    /// Print the SQL a descriptor compiles to
    Explain {
        /// Root table
        #[arg(long)]
        table: String,

        /// Treat input as search params ({"filter", "order_by", "limit", "offset"})
        #[arg(long)]
        params: bool,

        /// Descriptor JSON (e.g. '{"author.name%like": "kim"}')
        input: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Schema
    // ─────────────────────────────────────────────────────────────────────────
    /// List relations usable in search keys
    Relations {
        /// Table name
        #[arg(long)]
        table: String,
    },

    // ─────────────────────────────────────────────────────────────────────────
    // Execute
    // ─────────────────────────────────────────────────────────────────────────
    /// Fetch the first row matching a descriptor
    First {
        /// Root table
        #[arg(long)]
        table: String,

        /// Postgres URL (overrides config)
        #[arg(long)]
        database_url: Option<String>,

        /// Treat input as search params
        #[arg(long)]
        params: bool,

        /// Descriptor JSON
        input: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sift_cli=info,sift_sql=info,sift_core=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = CliConfig::load()?;
    let schema_path = config.schema_path(cli.schema.clone())?;

    match cli.command {
        Commands::Explain {
            table,
            params,
            input,
        } => commands::explain::run(&config, &schema_path, &table, params, &input, cli.format),
        Commands::Relations { table } => {
            commands::relations::run(&schema_path, &table, cli.format)
        }
        Commands::First {
            table,
            database_url,
            params,
            input,
        } => {
            let database_url = config.database_url(database_url)?;
            commands::first::run(
                &config,
                &schema_path,
                &database_url,
                &table,
                params,
                &input,
                cli.format,
            )
            .await
        }
    }
}
