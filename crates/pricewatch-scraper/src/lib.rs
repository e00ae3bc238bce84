pub mod content;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod orchestrator;
pub mod rate_limit;
pub mod store;
pub mod text;

pub use error::{ExtractionError, FetchError, ScraperError};
pub use extract::{extract_pricing, route, Extractor};
pub use fetch::{FetchedPage, PageFetcher, PageSource};
pub use orchestrator::CompetitorScraper;
pub use rate_limit::MinIntervalQueue;
pub use store::{MemoryRepository, ResultRepository};
