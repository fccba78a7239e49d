use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::{prelude::*, Error, TransportError};

/// HTTP POST collaborator: `send(url, jsonBody) -> jsonResponse`.
///
/// Implementations do not retry; failures surface as [`TransportError`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn post(&self, url: &str, body: &Value) -> Result<Value>;
}

#[derive(Deserialize, Debug)]
struct ErrorData {
    data: String,
    code: u16,
    msg: String,
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    pub client: Client,
}

impl HttpClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn classify_status(status_code: u16, text: String) -> TransportError {
    if (400..500).contains(&status_code) {
        return match serde_json::from_str::<ErrorData>(&text) {
            Ok(error_data) => TransportError::ClientRequest {
                status_code,
                error_code: Some(error_data.code),
                error_message: error_data.msg,
                error_data: Some(error_data.data),
            },
            Err(err) => TransportError::ClientRequest {
                status_code,
                error_code: None,
                error_message: text,
                error_data: Some(err.to_string()),
            },
        };
    }
    TransportError::ServerRequest {
        status_code,
        error_message: text,
    }
}

async fn parse_response(response: Response) -> Result<Value> {
    let status_code = response.status().as_u16();
    let text = response
        .text()
        .await
        .map_err(|e| TransportError::Request(e.to_string()))?;

    if status_code >= 400 {
        return Err(classify_status(status_code, text).into());
    }
    serde_json::from_str(&text).map_err(|e| Error::json_parse(e.to_string()))
}

#[async_trait]
impl Transport for HttpClient {
    async fn post(&self, url: &str, body: &Value) -> Result<Value> {
        debug!(url = %url, "POST");
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| TransportError::Request(e.to_string()))?;
        parse_response(response).await
    }
}
