mod live;
mod rank;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tablerank")]
#[command(about = "Restaurant local-search ranking and SEO audits")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rank a restaurant against competitors read from a JSON file
    Rank {
        /// JSON file with `subject` and `competitors`
        #[arg(long, short)]
        input: PathBuf,
        /// YAML file overriding the default ranking weights
        #[arg(long)]
        weights: Option<PathBuf>,
    },
    /// Search Google Places for restaurants
    Search {
        query: String,
        /// Maximum number of results (1-20)
        #[arg(long, default_value = "10", value_parser = clap::value_parser!(u32).range(1..=20))]
        limit: u32,
    },
    /// Run a full audit for one place and print the JSON report
    Audit { place_id: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Rank { input, weights }) => {
            rank::run_rank(&input, weights.as_deref())?;
        }
        Some(Commands::Search { query, limit }) => {
            let config = tablerank_core::load_app_config()?;
            live::run_search(&config, &query, limit).await?;
        }
        Some(Commands::Audit { place_id }) => {
            let config = tablerank_core::load_app_config()?;
            live::run_audit(&config, &place_id).await?;
        }
        None => println!("no command given; run `tablerank --help` for usage"),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
