use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::competitors::Competitor;

/// One pricing tier offered by a competitor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub name: String,
    /// Free-text price label as displayed, e.g. `"£21/month"` or `"Offert"`.
    /// Never parsed into a number.
    pub price: String,
    pub description: String,
    pub features: Vec<String>,
}

/// Normalized extraction result for one competitor's pricing page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingData {
    pub plans: Vec<Plan>,
    /// ISO 4217 code, or `"Unknown"` for heuristic extraction.
    pub currency: String,
    pub billing_period: String,
    /// Bounded excerpt of the page text for human review.
    pub raw_text_extract: String,
    /// Raw pricing tokens; only populated by the generic extractor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_mentions: Option<Vec<String>>,
}

impl PricingData {
    #[must_use]
    pub fn plan_names(&self) -> Vec<&str> {
        self.plans.iter().map(|p| p.name.as_str()).collect()
    }

    #[must_use]
    pub fn plan(&self, name: &str) -> Option<&Plan> {
        self.plans.iter().find(|p| p.name == name)
    }
}

/// Envelope recording the most recent scrape attempt for one competitor.
///
/// `success` is `true` exactly when `pricing_data` is `Some` and `error` is
/// `None`. Build values through [`ScrapeResult::succeeded`] and
/// [`ScrapeResult::failed`] to keep that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub key: String,
    pub name: String,
    pub url: String,
    pub last_updated: DateTime<Utc>,
    pub success: bool,
    pub pricing_data: Option<PricingData>,
    pub error: Option<String>,
}

impl ScrapeResult {
    #[must_use]
    pub fn succeeded(
        competitor: &Competitor,
        pricing_data: PricingData,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            key: competitor.key.clone(),
            name: competitor.name.clone(),
            url: competitor.url.clone(),
            last_updated: at,
            success: true,
            pricing_data: Some(pricing_data),
            error: None,
        }
    }

    #[must_use]
    pub fn failed(competitor: &Competitor, error: String, at: DateTime<Utc>) -> Self {
        Self {
            key: competitor.key.clone(),
            name: competitor.name.clone(),
            url: competitor.url.clone(),
            last_updated: at,
            success: false,
            pricing_data: None,
            error: Some(error),
        }
    }

    /// Short outcome view of this envelope.
    #[must_use]
    pub fn outcome(&self) -> ScrapeOutcome {
        match (&self.pricing_data, &self.error) {
            (Some(data), None) if self.success => ScrapeOutcome::success(data.clone()),
            (_, Some(error)) => ScrapeOutcome::failure(error.clone()),
            _ => ScrapeOutcome::failure("inconsistent scrape result".to_string()),
        }
    }
}

/// Short result of a single scrape: `{success, data}` or `{success, error}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapeOutcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PricingData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeOutcome {
    #[must_use]
    pub fn success(data: PricingData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(error: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
        }
    }
}
