use scraper::Html;

use pricewatch_core::PricingData;

use super::catalog::{PredicateText, SiteCatalog};
use crate::text::{normalize_spaces, plain_text, pricing_excerpt};

/// Confirms catalog plans against a parsed page.
///
/// Returns `None` when nothing matched and the catalog defers empty pages to
/// the generic extractor.
#[must_use]
pub fn extract_site(catalog: &SiteCatalog, document: &Html) -> Option<PricingData> {
    let text = normalize_spaces(&plain_text(document));
    let plans = catalog.matching_plans(&PredicateText::new(&text));

    if plans.is_empty() && catalog.defer_when_empty {
        tracing::debug!(competitor = catalog.key, "no catalog plan confirmed, deferring");
        return None;
    }

    Some(PricingData {
        plans,
        currency: catalog.currency.to_string(),
        billing_period: catalog.billing_period.to_string(),
        raw_text_extract: pricing_excerpt(document),
        pricing_mentions: None,
    })
}
