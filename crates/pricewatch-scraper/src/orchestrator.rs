//! Scrape orchestration: fetch → route → extract → store.

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::Utc;

use pricewatch_core::{CompetitorRegistry, PricingData, ScrapeOutcome, ScrapeResult};

use crate::error::ScraperError;
use crate::extract::extract_pricing;
use crate::fetch::{PageFetcher, PageSource};
use crate::rate_limit::MinIntervalQueue;
use crate::store::{MemoryRepository, ResultRepository};

/// Drives scrapes for a fixed competitor registry and keeps the latest
/// result per competitor in its repository.
///
/// All work is sequential: `&mut self` on every scrape makes the repository
/// single-writer.
pub struct CompetitorScraper<R: ResultRepository = MemoryRepository, S: PageSource = PageFetcher>
{
    registry: CompetitorRegistry,
    source: S,
    repository: R,
    request_delay: Duration,
}

impl CompetitorScraper<MemoryRepository, PageFetcher> {
    /// Creates a scraper backed by an empty in-memory repository.
    /// `request_delay` is the idle time between competitors in
    /// [`CompetitorScraper::scrape_all`].
    #[must_use]
    pub fn new(registry: CompetitorRegistry, fetcher: PageFetcher, request_delay: Duration) -> Self {
        Self::with_repository(registry, fetcher, MemoryRepository::new(), request_delay)
    }
}

impl<R: ResultRepository, S: PageSource> CompetitorScraper<R, S> {
    #[must_use]
    pub fn with_repository(
        registry: CompetitorRegistry,
        source: S,
        repository: R,
        request_delay: Duration,
    ) -> Self {
        Self {
            registry,
            source,
            repository,
            request_delay,
        }
    }

    /// Scrapes one competitor and records the result.
    ///
    /// Fetch and extraction failures are captured into a failed
    /// [`ScrapeResult`] and stored like a success. An unknown key fails
    /// without touching the repository.
    pub async fn scrape_single(&mut self, key: &str) -> ScrapeOutcome {
        let Some(competitor) = self.registry.get(key).cloned() else {
            let err = ScraperError::UnknownCompetitor(key.to_string());
            tracing::warn!(competitor = key, "{err}");
            return ScrapeOutcome::failure(err.to_string());
        };

        tracing::info!(competitor = key, url = %competitor.url, "scraping competitor");

        let result = match self.fetch_and_extract(key, &competitor.name, &competitor.url).await {
            Ok(data) => {
                tracing::info!(
                    competitor = key,
                    plans = data.plans.len(),
                    "scrape succeeded"
                );
                ScrapeResult::succeeded(&competitor, data, Utc::now())
            }
            Err(e) => {
                tracing::error!(competitor = key, error = %e, "scrape failed");
                ScrapeResult::failed(&competitor, e.to_string(), Utc::now())
            }
        };

        let outcome = result.outcome();
        self.repository.put(result);
        outcome
    }

    async fn fetch_and_extract(
        &self,
        key: &str,
        name: &str,
        url: &str,
    ) -> Result<PricingData, ScraperError> {
        let page = self.source.fetch_page(name, url).await?;
        extract_pricing(key, &page.text).map_err(|source| ScraperError::Extraction {
            competitor: name.to_string(),
            source,
        })
    }

    /// Scrapes every configured competitor in registry order.
    ///
    /// Waits `request_delay` between competitors but not after the last.
    /// Returns one outcome per key, in the same order; a failing competitor
    /// never stops the run.
    pub async fn scrape_all(&mut self) -> Vec<(String, ScrapeOutcome)> {
        let mut queue = MinIntervalQueue::new(self.request_delay);
        queue.extend(self.registry.keys().into_iter().map(str::to_string));

        let total = queue.len();
        let mut outcomes = Vec::with_capacity(total);
        while let Some(key) = queue.next().await {
            let outcome = self.scrape_single(&key).await;
            outcomes.push((key, outcome));
        }

        let succeeded = outcomes.iter().filter(|(_, o)| o.success).count();
        tracing::info!(succeeded, total, "Updated {succeeded} out of {total} competitors");

        outcomes
    }

    /// Owned copy of every stored result, keyed and ordered by competitor
    /// key.
    #[must_use]
    pub fn get_all_data(&self) -> BTreeMap<String, ScrapeResult> {
        self.repository.snapshot()
    }

    /// Stored results in configuration order; competitors never scraped are
    /// left out.
    #[must_use]
    pub fn results_in_config_order(&self) -> Vec<ScrapeResult> {
        self.registry
            .iter()
            .filter_map(|competitor| self.repository.get(&competitor.key).cloned())
            .collect()
    }

    #[must_use]
    pub fn get_competitor_data(&self, key: &str) -> Option<ScrapeResult> {
        self.repository.get(key).cloned()
    }

    pub fn clear_data(&mut self) {
        self.repository.clear();
    }
}
