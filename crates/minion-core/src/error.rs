//! Error types shared by every minion crate.

/// The request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Network(String),
    #[error("invalid request target {0}")]
    InvalidUrl(String),
}

#[derive(Debug, thiserror::Error)]
pub enum MinionError {
    /// The server answered with an envelope whose `success` flag is falsy.
    #[error("{0}")]
    Application(String),
    /// A polled job reached the `failed` state, or polling itself failed.
    #[error("{0}")]
    Job(String),
    /// A 2xx body that is not valid JSON, or JSON of the wrong shape.
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}
