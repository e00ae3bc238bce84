pub mod app_config;
pub mod competitors;
pub mod config;
pub mod pricing;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use competitors::{load_competitors, Competitor, CompetitorRegistry, CompetitorsFile};
pub use config::{load_app_config, load_app_config_from_env};
pub use pricing::{Plan, PricingData, ScrapeOutcome, ScrapeResult};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read competitors file {path}: {source}")]
    CompetitorsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse competitors file: {0}")]
    CompetitorsFileParse(#[from] serde_yaml::Error),

    #[error("invalid competitor configuration: {0}")]
    Validation(String),
}
