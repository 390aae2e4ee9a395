mod commands;

use std::path::PathBuf;

use anyhow::Result;
use chatvec_core::constants::{DEFAULT_BATCH_SIZE, DEFAULT_SEARCH_LIMIT};
use chatvec_core::env_config::env_string;
use chatvec_core::{DatabaseConfig, DistanceMetric, WriteDisposition};
use chatvec_embeddings::{EmbeddingConfig, model_dimension};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "chatvec")]
#[command(about = "Embed exported conversations into PostgreSQL and search them by similarity", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    database: DatabaseArgs,
    #[command(subcommand)]
    command: Commands,
}

/// Overrides for the environment-derived database settings.
#[derive(Args)]
struct DatabaseArgs {
    /// PostgreSQL connection URL (defaults to DATABASE_URL or POSTGRES_*)
    #[arg(long, global = true)]
    database_url: Option<String>,
    /// Schema holding the messages table
    #[arg(long, global = true)]
    schema: Option<String>,
    /// Messages table name
    #[arg(long, global = true)]
    table: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the messages extracted from a conversations file
    Extract {
        file: PathBuf,
        /// Also list the nodes that produced no message
        #[arg(long)]
        with_skipped: bool,
    },
    /// Extract, embed and store a conversations file
    Ingest {
        file: PathBuf,
        #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
        batch_size: usize,
        #[arg(long, default_value_t = WriteDisposition::Replace)]
        disposition: WriteDisposition,
        /// Store messages without vectors and skip loading the model
        #[arg(long)]
        no_embeddings: bool,
        #[arg(long)]
        model: Option<String>,
    },
    /// Rank stored messages by similarity to a query
    Search {
        query: String,
        #[arg(short = 'n', long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
        /// Minimum score on the metric's scale. No cutoff by default; use 0 to drop
        /// negatively correlated cosine matches
        #[arg(short, long, allow_negative_numbers = true)]
        threshold: Option<f64>,
        #[arg(short, long)]
        role: Option<String>,
        #[arg(short, long)]
        conversation: Option<String>,
        #[arg(short, long, default_value_t = DistanceMetric::Cosine)]
        metric: DistanceMetric,
        #[arg(long)]
        model: Option<String>,
    },
    /// Print message counts and role distribution
    Stats,
    /// Create the pgvector extension, schema and table
    Migrate {
        #[arg(long)]
        model: Option<String>,
    },
    /// Serve the HTTP search API
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
        #[arg(long)]
        model: Option<String>,
    },
}

/// Embedding settings from the environment, with `--model` taking precedence.
fn embedding_config(model: Option<String>) -> EmbeddingConfig {
    let config = EmbeddingConfig::from_env();
    match model {
        Some(name) => config.with_model(name),
        None => config,
    }
}

/// Database settings from the environment and global flags.
///
/// Without an explicit `CHATVEC_VECTOR_DIM`, the vector width follows the embedding model.
fn database_config(args: &DatabaseArgs, model_name: &str) -> Result<DatabaseConfig> {
    let base = DatabaseConfig::from_env()?;
    let dimension = if env_string("CHATVEC_VECTOR_DIM").is_some() {
        base.dimension
    } else {
        model_dimension(model_name).unwrap_or(base.dimension)
    };
    Ok(DatabaseConfig::new(
        args.database_url.clone().unwrap_or(base.url),
        args.schema.clone().unwrap_or(base.schema),
        args.table.clone().unwrap_or(base.table),
        dimension,
    )?)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, with_skipped } => commands::extract::run(&file, with_skipped)?,
        Commands::Ingest { file, batch_size, disposition, no_embeddings, model } => {
            let embedding = embedding_config(model);
            let database = database_config(&cli.database, &embedding.model_name)?;
            commands::ingest::run(&file, batch_size, disposition, !no_embeddings, &embedding, &database)
                .await?;
        },
        Commands::Search { query, limit, threshold, role, conversation, metric, model } => {
            let embedding = embedding_config(model);
            let database = database_config(&cli.database, &embedding.model_name)?;
            let query = chatvec_core::SimilarityQuery::new(query)
                .with_limit(limit)
                .with_threshold(threshold)
                .with_role(role)
                .with_conversation(conversation)
                .with_metric(metric);
            commands::search::run_search(&query, &embedding, &database).await?;
        },
        Commands::Stats => {
            let embedding = embedding_config(None);
            let database = database_config(&cli.database, &embedding.model_name)?;
            commands::search::run_stats(&database).await?;
        },
        Commands::Migrate { model } => {
            let embedding = embedding_config(model);
            let database = database_config(&cli.database, &embedding.model_name)?;
            commands::migrate::run(&database).await?;
        },
        Commands::Serve { port, host, model } => {
            let embedding = embedding_config(model);
            let database = database_config(&cli.database, &embedding.model_name)?;
            commands::serve::run(port, host, &embedding, &database).await?;
        },
    }

    Ok(())
}
