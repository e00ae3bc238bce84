//! Routing from competitor keys to extractors, and the extractors
//! themselves.
//!
//! Known competitors resolve to a declarative [`SiteCatalog`]; every other
//! key falls through to the generic heuristic extractor.

pub mod catalog;
pub mod generic;
mod site;

use scraper::Html;

use pricewatch_core::PricingData;

pub use catalog::{find_catalog, SiteCatalog, SITE_CATALOGS};
pub use generic::{discover_plans, extract_generic, pricing_tokens};
pub use site::extract_site;

use crate::error::ExtractionError;

#[derive(Debug, Clone, Copy)]
pub enum Extractor {
    Site(&'static SiteCatalog),
    Generic,
}

/// Resolves the extractor for `key`. Unknown keys get [`Extractor::Generic`].
#[must_use]
pub fn route(key: &str) -> Extractor {
    find_catalog(key).map_or(Extractor::Generic, Extractor::Site)
}

impl Extractor {
    /// Parses `raw_html` and extracts pricing data from it.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] if the document cannot be processed.
    pub fn extract(&self, raw_html: &str) -> Result<PricingData, ExtractionError> {
        let document = Html::parse_document(raw_html);
        match self {
            Extractor::Site(catalog) => match extract_site(catalog, &document) {
                Some(data) => Ok(data),
                None => extract_generic(&document),
            },
            Extractor::Generic => extract_generic(&document),
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Extractor::Site(catalog) => catalog.key,
            Extractor::Generic => "generic",
        }
    }
}

/// Routes `key` and extracts pricing data from `raw_html` in one step.
///
/// # Errors
///
/// See [`Extractor::extract`].
pub fn extract_pricing(key: &str, raw_html: &str) -> Result<PricingData, ExtractionError> {
    let extractor = route(key);
    tracing::debug!(competitor = key, extractor = extractor.name(), "extracting pricing");
    extractor.extract(raw_html)
}

#[cfg(test)]
#[path = "extract_test.rs"]
mod tests;
