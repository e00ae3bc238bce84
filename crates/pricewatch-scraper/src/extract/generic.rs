//! Heuristic extraction for pages without a site catalog.
//!
//! The pipeline is a chain of pure stages: [`main_content`] (or
//! [`plain_text`] when that yields nothing) → [`pricing_tokens`] →
//! [`discover_plans`] → [`assemble`].

use std::sync::LazyLock;

use regex::Regex;
use scraper::Html;

use pricewatch_core::{Plan, PricingData};

use crate::content::main_content;
use crate::error::ExtractionError;
use crate::text::{plain_text, truncate_with_ellipsis, EXTRACT_MAX_CHARS};

pub const GENERAL_PRICING_PLAN: &str = "General Pricing";
pub const CONTACT_FOR_PRICING: &str = "Contact for pricing";
const GENERAL_PRICING_DESCRIPTION: &str = "Pricing information extracted from page content";

const UNKNOWN_CURRENCY: &str = "Unknown";
const UNKNOWN_PERIOD: &str = "unknown";

const MAX_TOKENS: usize = 10;
const PRICE_LABEL_TOKENS: usize = 5;
const MAX_PLAN_LINE_CHARS: usize = 100;

const PLAN_KEYWORDS: [&str; 9] = [
    "basic",
    "starter",
    "pro",
    "enterprise",
    "premium",
    "growth",
    "scale",
    "free",
    "standard",
];

static CURRENCY_AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[$£€]\d+(?:,\d{3})*(?:\.\d{2})?").expect("valid currency regex")
});
static PER_PERIOD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\d+(?:,\d{3})*(?:\.\d{2})?\s*(?:per|/)\s*(?:month|year|user)")
        .expect("valid per-period regex")
});
static FREE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:free|gratis|kostenlos)").expect("valid regex"));
static CONTACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:contact|custom|enterprise)").expect("valid regex"));

/// Extracts pricing data from an arbitrary page.
///
/// # Errors
///
/// Returns [`ExtractionError::InvalidSelector`] if a content-root selector
/// fails to parse.
pub fn extract_generic(document: &Html) -> Result<PricingData, ExtractionError> {
    let content = match main_content(document)? {
        Some(content) => content,
        None => plain_text(document),
    };
    Ok(assemble(&content))
}

/// Builds [`PricingData`] from already-cleaned page content.
#[must_use]
pub fn assemble(content: &str) -> PricingData {
    let tokens = pricing_tokens(content);

    let mut plans = discover_plans(content);
    if plans.is_empty() {
        let price = if tokens.is_empty() {
            CONTACT_FOR_PRICING.to_string()
        } else {
            tokens
                .iter()
                .take(PRICE_LABEL_TOKENS)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        };
        plans.push(Plan {
            name: GENERAL_PRICING_PLAN.to_string(),
            price,
            description: GENERAL_PRICING_DESCRIPTION.to_string(),
            features: Vec::new(),
        });
    }

    PricingData {
        plans,
        currency: UNKNOWN_CURRENCY.to_string(),
        billing_period: UNKNOWN_PERIOD.to_string(),
        raw_text_extract: truncate_with_ellipsis(content, EXTRACT_MAX_CHARS),
        pricing_mentions: Some(tokens),
    }
}

/// Raw pricing tokens, collected pattern by pattern in match order and
/// capped at ten.
#[must_use]
pub fn pricing_tokens(text: &str) -> Vec<String> {
    [&*CURRENCY_AMOUNT_RE, &*PER_PERIOD_RE, &*FREE_RE, &*CONTACT_RE]
        .into_iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.as_str().to_string()))
        .take(MAX_TOKENS)
        .collect()
}

/// Short lines naming a plan tier become plans with empty details.
#[must_use]
pub fn discover_plans(text: &str) -> Vec<Plan> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && line.chars().count() < MAX_PLAN_LINE_CHARS)
        .filter(|line| {
            let lower = line.to_lowercase();
            PLAN_KEYWORDS.iter().any(|kw| lower.contains(kw))
        })
        .map(|line| Plan {
            name: line.to_string(),
            price: String::new(),
            description: String::new(),
            features: Vec::new(),
        })
        .collect()
}

#[cfg(test)]
#[path = "generic_test.rs"]
mod tests;
