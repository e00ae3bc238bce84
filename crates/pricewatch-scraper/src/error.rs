use thiserror::Error;

/// Failure to retrieve a competitor page. Never retried.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request failed for {competitor}: {source}")]
    Transport {
        competitor: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request failed for {competitor}: unexpected HTTP status {status} from {url}")]
    Status {
        competitor: String,
        status: u16,
        url: String,
    },
}

/// Failure while turning a fetched page into pricing data.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("invalid selector \"{selector}\": {reason}")]
    InvalidSelector { selector: String, reason: String },
}

#[derive(Debug, Error)]
pub enum ScraperError {
    #[error("Unknown competitor: {0}")]
    UnknownCompetitor(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Parsing failed for {competitor}: {source}")]
    Extraction {
        competitor: String,
        #[source]
        source: ExtractionError,
    },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}
