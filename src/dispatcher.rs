//! Sends signed actions and info queries through the transport.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::debug;

use crate::{
    asset::Hip3Asset,
    consts::{EXCHANGE_PATH, INFO_PATH},
    exchange::{MidPriceSource, SignedAction},
    info::{parse_mid, InfoRequest},
    prelude::*,
    req::Transport,
    BaseUrl, Error,
};

/// A request ready for the wire.
#[derive(Debug, Clone, Copy)]
pub enum Dispatch<'a> {
    Signed(&'a SignedAction),
    Query(&'a InfoRequest),
}

/// Binds a transport to the base URL chosen for the batch.
pub struct RequestDispatcher<'a> {
    transport: &'a dyn Transport,
    base_url: String,
}

impl std::fmt::Debug for RequestDispatcher<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestDispatcher")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl<'a> RequestDispatcher<'a> {
    pub fn new(transport: &'a dyn Transport, base_url: BaseUrl) -> Self {
        Self::with_url(transport, base_url.get_url())
    }

    /// Use an explicit base URL, e.g. a local mock server.
    pub fn with_url(transport: &'a dyn Transport, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            transport,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn dispatch(&self, request: Dispatch<'_>) -> Result<Value> {
        match request {
            Dispatch::Signed(signed) => self.send_action(signed).await,
            Dispatch::Query(query) => self.send_info(query).await,
        }
    }

    /// `POST /exchange`. A `{"status":"err"}` reply becomes [`Error::Api`].
    pub async fn send_action(&self, signed: &SignedAction) -> Result<Value> {
        let body = signed.to_request_body()?;
        // Payload carries a signature; log only identifiers
        debug!(
            action = signed.action().kind(),
            nonce = signed.nonce(),
            "Sending exchange request"
        );
        let response = self
            .transport
            .post(&format!("{}{EXCHANGE_PATH}", self.base_url), &body)
            .await?;
        debug!("Received exchange response");
        check_exchange_status(response)
    }

    /// `POST /info`.
    pub async fn send_info(&self, request: &InfoRequest) -> Result<Value> {
        let body = serde_json::to_value(request)?;
        debug!(query = ?body.get("type"), "Sending info request");
        self.transport
            .post(&format!("{}{INFO_PATH}", self.base_url), &body)
            .await
    }
}

fn check_exchange_status(response: Value) -> Result<Value> {
    if response.get("status").and_then(Value::as_str) == Some("err") {
        let message = match response.get("response") {
            Some(Value::String(msg)) => msg.clone(),
            Some(other) => other.to_string(),
            None => response.to_string(),
        };
        return Err(Error::Api(message));
    }
    Ok(response)
}

/// Per-order rejections carried in `response.data.statuses[].error` of an accepted action.
pub fn order_errors(response: &Value) -> Vec<&str> {
    response
        .pointer("/response/data/statuses")
        .and_then(Value::as_array)
        .map(|statuses| {
            statuses
                .iter()
                .filter_map(|status| status.get("error").and_then(Value::as_str))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl<'a> MidPriceSource for RequestDispatcher<'a> {
    async fn mid_price(&self, asset: &Hip3Asset) -> Result<Decimal> {
        let mids = self.send_info(&InfoRequest::AllMids).await?;
        parse_mid(&mids, asset)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use super::*;
    use crate::{
        exchange::cancel_order, key::SigningIdentity, test_utils::MockTransport,
        TransportError,
    };

    const KEY_ONE: &str = "0000000000000000000000000000000000000000000000000000000000000001";

    #[tokio::test]
    async fn test_info_goes_to_info_endpoint() {
        let transport = MockTransport::new();
        transport.push_ok(json!({"universe": []}));
        let dispatcher = RequestDispatcher::new(&transport, BaseUrl::Testnet);

        let response = dispatcher
            .dispatch(Dispatch::Query(&InfoRequest::PerpDexs))
            .await
            .unwrap();
        assert_eq!(response, json!({"universe": []}));

        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "https://api.hyperliquid-testnet.xyz/info");
        assert_eq!(calls[0].1, json!({"type": "perpDexs"}));
    }

    #[tokio::test]
    async fn test_signed_action_goes_to_exchange_endpoint() {
        let transport = MockTransport::new();
        transport.push_ok(json!({"status": "ok", "response": {"type": "cancel"}}));
        let dispatcher = RequestDispatcher::new(&transport, BaseUrl::Mainnet);
        let identity = SigningIdentity::from_private_key(KEY_ONE).unwrap();
        let signed =
            SignedAction::sign(cancel_order("42", "xyz:TSLA").unwrap(), 1583838, &identity).unwrap();

        dispatcher.dispatch(Dispatch::Signed(&signed)).await.unwrap();

        let calls = transport.calls();
        assert_eq!(calls[0].0, "https://api.hyperliquid.xyz/exchange");
        assert_eq!(calls[0].1, signed.to_request_body().unwrap());
    }

    #[tokio::test]
    async fn test_exchange_rejection_is_api_error() {
        let transport = MockTransport::new();
        transport.push_ok(json!({"status": "err", "response": "Insufficient margin"}));
        let dispatcher = RequestDispatcher::with_url(&transport, "http://localhost:3001/");
        let identity = SigningIdentity::from_private_key(KEY_ONE).unwrap();
        let signed =
            SignedAction::sign(cancel_order("1", "xyz:TSLA").unwrap(), 1, &identity).unwrap();

        let err = dispatcher.send_action(&signed).await.unwrap_err();
        assert!(matches!(err, Error::Api(msg) if msg == "Insufficient margin"));
        assert_eq!(transport.calls()[0].0, "http://localhost:3001/exchange");
    }

    #[test]
    fn test_order_errors_from_statuses() {
        let response = json!({
            "status": "ok",
            "response": {
                "type": "order",
                "data": {"statuses": [
                    {"resting": {"oid": 77}},
                    {"error": "Order must have minimum value of $10."}
                ]}
            }
        });
        assert_eq!(
            order_errors(&response),
            vec!["Order must have minimum value of $10."]
        );
        assert!(order_errors(&json!({"status": "ok", "response": {"type": "cancel"}})).is_empty());
        assert!(order_errors(&json!({"xyz:TSLA": "100"})).is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_propagates() {
        let transport = MockTransport::new();
        transport.push_err(TransportError::Request("connection reset".to_string()));
        let dispatcher = RequestDispatcher::new(&transport, BaseUrl::Mainnet);
        let err = dispatcher.send_info(&InfoRequest::AllMids).await.unwrap_err();
        assert!(matches!(err, Error::Transport(_)));
    }

    #[tokio::test]
    async fn test_mid_price_lookup() {
        let transport = MockTransport::new();
        transport.push_ok(json!({"xyz:TSLA": "100"}));
        transport.push_ok(json!({"BTC": "65000"}));
        let dispatcher = RequestDispatcher::new(&transport, BaseUrl::Mainnet);
        let asset = Hip3Asset::parse("xyz:TSLA").unwrap();

        assert_eq!(dispatcher.mid_price(&asset).await.unwrap(), dec!(100));
        assert!(matches!(
            dispatcher.mid_price(&asset).await,
            Err(Error::PriceUnavailable { .. })
        ));
        assert_eq!(transport.calls()[0].1, json!({"type": "allMids"}));
    }
}
