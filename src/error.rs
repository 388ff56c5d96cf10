use thiserror::Error;

/// Failure talking to the MyFly Club API. The sampler treats every variant
/// as "no result" for the pair it was checking.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("GET {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Parse(err.to_string())
    }
}

/// Terminal failures of a report generation run.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unable to locate a random route with available flights after {attempts} attempts")]
    Exhausted { attempts: u32 },
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Webhook returned status {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
