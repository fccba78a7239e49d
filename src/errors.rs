use thiserror::Error;

use crate::batch::ItemResult;

/// Transport-level failures from the HTTP collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 4xx reply. `code`/`data` are filled when the body parses as the exchange error shape.
    #[error("Client error: status code: {status_code}, error code: {error_code:?}, error message: {error_message}, error data: {error_data:?}")]
    ClientRequest {
        status_code: u16,
        error_code: Option<u16>,
        error_message: String,
        error_data: Option<String>,
    },

    /// 5xx reply.
    #[error("Server error: status code: {status_code}, error message: {error_message}")]
    ServerRequest {
        status_code: u16,
        error_message: String,
    },

    /// Connection, DNS, TLS or body read failure.
    #[error("Request error: {0}")]
    Request(String),
}

/// Signing and key material errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("Private key parse error: {0}")]
    PrivateKeyParse(String),
    #[error("Canonical serialization failed: {0}")]
    Serialize(String),
    #[error("ECDSA signature failed: {0}")]
    Ecdsa(String),
    #[error("Signature recovery failed: {0}")]
    Recovery(String),
}

/// Main error type
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Caller input is malformed (asset, order id, price, size, address).
    #[error("Validation error: {0}")]
    Validation(String),

    /// No usable mid price was returned for the asset.
    #[error("No mid price available for {asset}")]
    PriceUnavailable { asset: String },

    #[error(transparent)]
    Signing(#[from] SigningError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The exchange rejected the action; message is the exchange's own text.
    #[error("Exchange rejected action: {0}")]
    Api(String),

    #[error("Json parse error: {0}")]
    JsonParse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Fail-fast batch stopped at `index`. `completed` holds results produced before it.
    #[error("Batch aborted at item {index}: {source}")]
    BatchAborted {
        index: usize,
        completed: Vec<ItemResult>,
        source: Box<Error>,
    },
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Error::Validation(msg.into())
    }

    pub fn json_parse(msg: impl Into<String>) -> Self {
        Error::JsonParse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }

    /// Short category name, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation",
            Error::PriceUnavailable { .. } => "price_unavailable",
            Error::Signing(_) => "signing",
            Error::Transport(_) => "transport",
            Error::Api(_) => "api",
            Error::JsonParse(_) => "json_parse",
            Error::Config(_) => "config",
            Error::BatchAborted { .. } => "batch_aborted",
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::JsonParse(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_converts() {
        let err: Error = TransportError::Request("connection refused".to_string()).into();
        assert_eq!(err.kind(), "transport");
        assert_eq!(err.to_string(), "Request error: connection refused");
    }

    #[test]
    fn test_batch_aborted_message_includes_source() {
        let err = Error::BatchAborted {
            index: 1,
            completed: vec![],
            source: Box::new(Error::validation("bad asset")),
        };
        assert_eq!(
            err.to_string(),
            "Batch aborted at item 1: Validation error: bad asset"
        );
    }
}
