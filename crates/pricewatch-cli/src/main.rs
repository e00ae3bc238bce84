mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pricewatch-cli")]
#[command(about = "Competitor pricing scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List configured competitors
    List,
    /// Scrape pricing pages
    Scrape {
        /// Scrape a single competitor by key instead of all of them
        #[arg(long)]
        competitor: Option<String>,
        /// Print the stored results as JSON
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    dotenvy::dotenv().ok();
    let config = pricewatch_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let registry = scrape::load_registry(&config)?;
    tracing::debug!(env = %config.env, competitors = registry.len(), "configuration loaded");

    match cli.command {
        Some(Commands::List) => scrape::print_competitors(&registry),
        Some(Commands::Scrape { competitor, json }) => {
            scrape::run_scrape(&config, registry, competitor.as_deref(), json).await?;
        }
        None => println!(
            "pricewatch-cli: {} competitors configured; run `scrape` to fetch pricing",
            registry.len()
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests;
