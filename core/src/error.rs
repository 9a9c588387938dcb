use thiserror::Error;

use crate::envelope::ErrorCode;

#[derive(Debug, Error)]
pub enum Error {
    #[error("transport failure: {0}")]
    TransportFailure(#[from] reqwest::Error),

    /// Failure reported by an `HttpTransport` implementation not backed by reqwest.
    #[error("transport failure: {0}")]
    Transport(String),

    #[error("malformed response body: {0}")]
    DecodeFailure(#[from] serde_json::Error),

    #[error("remote rejected request: code={code} message={message}")]
    RemoteRejected { code: ErrorCode, message: String },

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("dispatcher closed")]
    DispatcherClosed,
}

impl Error {
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::TransportFailure(_) | Error::Transport(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
