//! Scrape command handlers for the CLI.
//!
//! Per-competitor failures are reported in the summary, never propagated;
//! only configuration problems end the process with an error.

use std::time::Duration;

use serde::Serializer as _;

use pricewatch_core::{AppConfig, CompetitorRegistry, ScrapeOutcome, ScrapeResult};
use pricewatch_scraper::{CompetitorScraper, PageFetcher};

/// Loads the competitor registry from `PRICEWATCH_COMPETITORS_PATH` when
/// set, otherwise the built-in list.
pub(crate) fn load_registry(config: &AppConfig) -> anyhow::Result<CompetitorRegistry> {
    match &config.competitors_path {
        Some(path) => {
            let registry = pricewatch_core::load_competitors(path)?;
            tracing::info!(path = %path.display(), count = registry.len(), "loaded competitors file");
            Ok(registry)
        }
        None => Ok(CompetitorRegistry::builtin()),
    }
}

pub(crate) fn print_competitors(registry: &CompetitorRegistry) {
    for competitor in registry.iter() {
        println!("{:<12} {:<14} {}", competitor.key, competitor.name, competitor.url);
    }
}

/// Runs a single-competitor or bulk scrape and prints the outcome.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the results
/// cannot be serialized.
pub(crate) async fn run_scrape(
    config: &AppConfig,
    registry: CompetitorRegistry,
    competitor: Option<&str>,
    json: bool,
) -> anyhow::Result<()> {
    let fetcher = PageFetcher::from_config(config)
        .map_err(|e| anyhow::anyhow!("failed to build page fetcher: {e}"))?;
    let mut scraper = CompetitorScraper::new(
        registry,
        fetcher,
        Duration::from_millis(config.request_delay_ms),
    );

    let outcomes = match competitor {
        Some(key) => vec![(key.to_string(), scraper.scrape_single(key).await)],
        None => scraper.scrape_all().await,
    };

    if json {
        println!("{}", render_json(&scraper.results_in_config_order())?);
    } else {
        for (key, outcome) in &outcomes {
            println!("{}", outcome_line(key, outcome));
        }
    }
    println!("{}", summary_line(&outcomes));

    Ok(())
}

/// Pretty JSON object keyed by competitor key, in the order given.
pub(crate) fn render_json(results: &[ScrapeResult]) -> anyhow::Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::pretty(&mut out);
    ser.collect_map(results.iter().map(|result| (&result.key, result)))?;
    Ok(String::from_utf8(out)?)
}

pub(crate) fn outcome_line(key: &str, outcome: &ScrapeOutcome) -> String {
    match (&outcome.data, &outcome.error) {
        (Some(data), _) if outcome.success => {
            format!("ok     {key:<12} {}", data.plan_names().join(", "))
        }
        (_, Some(error)) => format!("failed {key:<12} {error}"),
        _ => format!("failed {key:<12}"),
    }
}

pub(crate) fn summary_line(outcomes: &[(String, ScrapeOutcome)]) -> String {
    let succeeded = outcomes.iter().filter(|(_, o)| o.success).count();
    format!("Updated {succeeded} out of {} competitors", outcomes.len())
}
