use thiserror::Error;

/// Why one upstream call produced no usable JSON.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} answered HTTP {status}")]
    Status {
        url: String,
        status: u16,
        body: Option<String>,
    },

    #[error("malformed body from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("body from {url} exceeds {limit} bytes")]
    TooLarge { url: String, limit: usize },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
