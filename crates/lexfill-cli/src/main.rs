use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lexfill_application::FillService;
use lexfill_infrastructure::ConfigService;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;
mod repl;

const DEFAULT_LOG_FILTER: &str = "lexfill=warn";

#[derive(Parser)]
#[command(name = "lexfill")]
#[command(about = "LEXFILL - conversational placeholder filling for legal document templates", long_about = None)]
struct Cli {
    /// Config file (defaults to <config dir>/lexfill/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `lexfill_core=debug` (overrides RUST_LOG)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fill a template interactively, one question at a time
    Fill {
        /// Template file with [Bracketed] placeholders
        template: PathBuf,
        /// Document type selecting the legal context (safe, nda, employment, ...)
        #[arg(long)]
        doc_type: Option<String>,
        /// Where to write the filled document (defaults to filled.<ext>)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// List the placeholders of a template in the order they are asked
    Placeholders {
        template: PathBuf,
    },
    /// Fill a template from a JSON answers file without prompting
    Render {
        template: PathBuf,
        /// JSON object mapping placeholder names to answers
        #[arg(long)]
        answers: PathBuf,
        #[arg(long)]
        doc_type: Option<String>,
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
    };

    // stderr keeps the REPL on stdout clean
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let config = ConfigService::new(cli.config)
        .load()
        .await
        .context("Failed to load configuration")?;
    let service = FillService::new(config);

    match cli.command {
        Commands::Fill {
            template,
            doc_type,
            output,
        } => commands::fill::run(&service, &template, doc_type.as_deref(), output.as_deref()).await?,
        Commands::Placeholders { template } => commands::placeholders::run(&service, &template).await?,
        Commands::Render {
            template,
            answers,
            doc_type,
            output,
        } => commands::render::run(&service, &template, &answers, doc_type.as_deref(), output.as_deref()).await?,
    }

    Ok(())
}
