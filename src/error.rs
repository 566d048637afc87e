use thiserror::Error;

/// Failures reported by a [`Transport`](crate::transport::Transport).
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("request to {url} failed: {source}")]
    Connection {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl TransportError {
    pub fn connection(
        url: &reqwest::Url,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        TransportError::Connection {
            url: url.to_string(),
            source: source.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error("Malformed query: {0}")]
    MalformedInput(&'static str),

    #[error("Couldn't encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The body is kept as received for diagnostics.
    #[error("Couldn't decode response: {source}")]
    Decode {
        #[source]
        source: serde_json::Error,
        body: Vec<u8>,
    },

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("Task ended without reporting an outcome")]
    Aborted,
}

pub type QueryResult<T> = Result<T, QueryError>;
