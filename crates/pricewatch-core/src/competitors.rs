use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A tracked competitor: identifier, display name, and pricing page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competitor {
    pub key: String,
    pub name: String,
    pub url: String,
}

impl Competitor {
    #[must_use]
    pub fn new(key: &str, name: &str, url: &str) -> Self {
        Self {
            key: key.to_string(),
            name: name.to_string(),
            url: url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CompetitorsFile {
    pub competitors: Vec<Competitor>,
}

/// Ordered, validated competitor list.
///
/// Built once at startup and never mutated afterwards; iteration order is
/// the configuration order used by bulk scrapes.
#[derive(Debug, Clone)]
pub struct CompetitorRegistry {
    competitors: Vec<Competitor>,
}

impl CompetitorRegistry {
    /// Builds a registry from an explicit list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] on empty keys or names, non-HTTP
    /// URLs, or duplicate keys.
    pub fn new(competitors: Vec<Competitor>) -> Result<Self, ConfigError> {
        validate_competitors(&competitors)?;
        Ok(Self { competitors })
    }

    /// The six competitors tracked out of the box.
    #[must_use]
    pub fn builtin() -> Self {
        Self {
            competitors: vec![
                Competitor::new(
                    "carta",
                    "Carta",
                    "https://carta.com/uk/en/plans/pricing-for-companies/",
                ),
                Competitor::new("bolago", "Bolago", "https://bolago.com/se/priser/"),
                Competitor::new("nvr", "NVR", "https://www.nvr.se/pris"),
                Competitor::new("ledgy", "Ledgy", "https://ledgy.com/company-pricing"),
                Competitor::new(
                    "cakeequity",
                    "Cake Equity",
                    "https://www.cakeequity.com/pricing",
                ),
                Competitor::new("mantle", "Mantle", "https://withmantle.com/pricing"),
            ],
        }
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.key == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.iter()
    }

    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.competitors.iter().map(|c| c.key.as_str()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.competitors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.competitors.is_empty()
    }
}

/// Load and validate a competitor list from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_competitors(path: &Path) -> Result<CompetitorRegistry, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CompetitorsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: CompetitorsFile = serde_yaml::from_str(&content)?;
    CompetitorRegistry::new(file.competitors)
}

fn validate_competitors(competitors: &[Competitor]) -> Result<(), ConfigError> {
    let mut seen_keys = HashSet::new();

    for competitor in competitors {
        if competitor.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "competitor key must be non-empty".to_string(),
            ));
        }

        if competitor.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "competitor '{}' must have a non-empty name",
                competitor.key
            )));
        }

        let url = competitor.url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "competitor '{}' has unsupported url '{}'; must be http(s)",
                competitor.key, competitor.url
            )));
        }

        if !seen_keys.insert(competitor.key.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate competitor key: '{}'",
                competitor.key
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
#[path = "competitors_test.rs"]
mod tests;
