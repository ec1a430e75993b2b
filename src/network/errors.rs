use thiserror::Error;

// * Unified Error type for the Network Layer.
// * Every variant is transient from the fetcher's point of view and is retried.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("HTTP {0} from upstream")]
    Status(u16),

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl NetworkError {
    // * Short label used for metrics and structured logs
    pub fn kind(&self) -> &'static str {
        match self {
            NetworkError::Reqwest(e) if e.is_timeout() => "timeout",
            NetworkError::Reqwest(_) => "transport",
            NetworkError::Status(_) => "status",
            NetworkError::Connection(_) => "connection",
        }
    }
}
