//! Sequential batch processing and result normalization.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::{
    config::{CredentialProvider, Credentials},
    dispatcher::{order_errors, RequestDispatcher},
    exchange::{ActionBuilder, SignedAction},
    helpers::next_nonce,
    info::InfoRequest,
    intent::TradeIntent,
    key::SigningIdentity,
    prelude::*,
    req::Transport,
    BaseUrl, Error,
};

/// What to do when one item fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// The first error aborts the batch.
    #[default]
    FailFast,
    /// Errors become `{error}` results and the batch continues.
    Isolate,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ItemOutcome {
    Data(Value),
    Error(String),
}

/// One result per input item, tagged with the item's position.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ItemResult {
    pub index: usize,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

impl ItemResult {
    pub fn data(index: usize, data: Value) -> Self {
        Self {
            index,
            outcome: ItemOutcome::Data(data),
        }
    }

    pub fn error(index: usize, message: impl Into<String>) -> Self {
        Self {
            index,
            outcome: ItemOutcome::Error(message.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ItemOutcome::Error(_))
    }
}

/// Wrap an item's outcome. Under [`ErrorPolicy::FailFast`] errors are returned as-is.
pub fn normalize(index: usize, result: Result<Value>, policy: ErrorPolicy) -> Result<ItemResult> {
    match (result, policy) {
        (Ok(data), _) => Ok(ItemResult::data(index, data)),
        (Err(e), ErrorPolicy::Isolate) => Ok(ItemResult::error(index, e.to_string())),
        (Err(e), ErrorPolicy::FailFast) => Err(e),
    }
}

/// Per-batch state resolved once and shared read-only by every item.
#[derive(Debug, Clone)]
pub struct BatchContext {
    pub base_url: BaseUrl,
    pub identity: SigningIdentity,
}

impl BatchContext {
    pub fn new(base_url: BaseUrl, identity: SigningIdentity) -> Self {
        Self { base_url, identity }
    }

    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        Ok(Self::new(
            credentials.network,
            SigningIdentity::from_credentials(credentials)?,
        ))
    }

    pub fn from_provider(provider: &dyn CredentialProvider) -> Result<Self> {
        Self::from_credentials(&provider.credentials()?)
    }
}

/// Runs intents one after another against a single transport.
pub struct BatchRunner<'a> {
    context: &'a BatchContext,
    dispatcher: RequestDispatcher<'a>,
    policy: ErrorPolicy,
}

impl<'a> BatchRunner<'a> {
    pub fn new(context: &'a BatchContext, transport: &'a dyn Transport, policy: ErrorPolicy) -> Self {
        Self {
            context,
            dispatcher: RequestDispatcher::new(transport, context.base_url),
            policy,
        }
    }

    /// Use a dispatcher bound to a custom URL instead of the network default.
    pub fn with_dispatcher(
        context: &'a BatchContext,
        dispatcher: RequestDispatcher<'a>,
        policy: ErrorPolicy,
    ) -> Self {
        Self {
            context,
            dispatcher,
            policy,
        }
    }

    /// Process a single intent through build, sign and dispatch.
    pub async fn process(&self, intent: &TradeIntent) -> Result<Value> {
        if let Some(query) = InfoRequest::from_intent(intent, &self.context.identity)? {
            return self.dispatcher.send_info(&query).await;
        }
        let action = ActionBuilder::new(&self.dispatcher).build(intent).await?;
        let signed = SignedAction::sign(action, next_nonce(), &self.context.identity)?;
        self.dispatcher.send_action(&signed).await
    }

    pub async fn run(&self, intents: &[TradeIntent]) -> Result<Vec<ItemResult>> {
        info!(
            items = intents.len(),
            network = %self.context.base_url,
            policy = ?self.policy,
            "Starting batch"
        );
        let mut results = Vec::with_capacity(intents.len());
        for (index, intent) in intents.iter().enumerate() {
            let outcome = self.process(intent).await;
            match &outcome {
                Ok(data) => {
                    for error in order_errors(data) {
                        warn!(
                            index,
                            operation = intent.operation(),
                            error,
                            "Order rejected by exchange"
                        );
                    }
                }
                Err(e) => warn!(
                    index,
                    operation = intent.operation(),
                    kind = e.kind(),
                    error = %e,
                    "Item failed"
                ),
            }
            match normalize(index, outcome, self.policy) {
                Ok(result) => results.push(result),
                Err(source) => {
                    return Err(Error::BatchAborted {
                        index,
                        completed: results,
                        source: Box::new(source),
                    })
                }
            }
        }
        info!(
            items = results.len(),
            failed = results.iter().filter(|r| r.is_error()).count(),
            "Batch complete"
        );
        Ok(results)
    }
}

/// Resolve credentials once, then process every intent in order.
pub async fn run_batch(
    provider: &dyn CredentialProvider,
    transport: &dyn Transport,
    intents: &[TradeIntent],
    policy: ErrorPolicy,
) -> Result<Vec<ItemResult>> {
    let context = BatchContext::from_provider(provider)?;
    BatchRunner::new(&context, transport, policy).run(intents).await
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::{
        intent::{OrderKind, PlaceOrderParams, Side},
        test_utils::MockTransport,
        TransportError,
    };

    const HARDHAT_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn context() -> BatchContext {
        BatchContext::from_credentials(&Credentials::new(HARDHAT_KEY, BaseUrl::Testnet)).unwrap()
    }

    fn three_intents() -> Vec<TradeIntent> {
        vec![
            TradeIntent::GetMarketInfo,
            TradeIntent::GetOrderBook {
                asset: "xyz:TSLA".to_string(),
            },
            TradeIntent::GetOpenOrders { user_address: None },
        ]
    }

    fn scripted_with_failure_at_second() -> MockTransport {
        let transport = MockTransport::new();
        transport.push_ok(json!([{"name": "xyz"}]));
        transport.push_err(TransportError::ServerRequest {
            status_code: 503,
            error_message: "unavailable".to_string(),
        });
        transport.push_ok(json!([]));
        transport
    }

    #[test]
    fn test_normalize() {
        assert_eq!(
            normalize(0, Ok(json!({"ok": true})), ErrorPolicy::FailFast).unwrap(),
            ItemResult::data(0, json!({"ok": true}))
        );
        let isolated = normalize(3, Err(Error::validation("bad")), ErrorPolicy::Isolate).unwrap();
        assert_eq!(isolated, ItemResult::error(3, "Validation error: bad"));
        assert!(normalize(3, Err(Error::validation("bad")), ErrorPolicy::FailFast).is_err());
    }

    #[test]
    fn test_item_result_serialization() {
        assert_eq!(
            serde_json::to_value(ItemResult::data(1, json!({"status": "ok"}))).unwrap(),
            json!({"index": 1, "data": {"status": "ok"}})
        );
        assert_eq!(
            serde_json::to_value(ItemResult::error(2, "boom")).unwrap(),
            json!({"index": 2, "error": "boom"})
        );
    }

    #[tokio::test]
    async fn test_isolated_failure_keeps_going() {
        let ctx = context();
        let transport = scripted_with_failure_at_second();
        let runner = BatchRunner::new(&ctx, &transport, ErrorPolicy::Isolate);

        let results = runner.run(&three_intents()).await.unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0], ItemResult::data(0, json!([{"name": "xyz"}])));
        assert!(results[1].is_error());
        assert_eq!(results[1].index, 1);
        assert_eq!(results[2], ItemResult::data(2, json!([])));
        assert_eq!(transport.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_batch() {
        let ctx = context();
        let transport = scripted_with_failure_at_second();
        let runner = BatchRunner::new(&ctx, &transport, ErrorPolicy::FailFast);

        match runner.run(&three_intents()).await.unwrap_err() {
            Error::BatchAborted {
                index,
                completed,
                source,
            } => {
                assert_eq!(index, 1);
                assert_eq!(completed, vec![ItemResult::data(0, json!([{"name": "xyz"}]))]);
                assert!(matches!(*source, Error::Transport(_)));
            }
            other => panic!("unexpected {other:?}"),
        }
        // Third item never reached the transport
        assert_eq!(transport.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_market_order_end_to_end() {
        let ctx = context();
        let transport = MockTransport::new();
        transport.push_ok(json!({"xyz:TSLA": "100"}));
        transport.push_ok(json!({"status": "ok", "response": {"type": "order"}}));
        let runner = BatchRunner::new(&ctx, &transport, ErrorPolicy::FailFast);

        let intent = TradeIntent::PlaceOrder(PlaceOrderParams {
            asset: "xyz:TSLA".to_string(),
            side: Side::Buy,
            size: "2".to_string(),
            order_type: OrderKind::Market,
            price: None,
            reduce_only: true,
        });
        let results = runner.run(&[intent]).await.unwrap();
        assert_eq!(
            results,
            vec![ItemResult::data(
                0,
                json!({"status": "ok", "response": {"type": "order"}})
            )]
        );

        let calls = transport.calls();
        assert_eq!(calls[0].0, "https://api.hyperliquid-testnet.xyz/info");
        assert_eq!(calls[0].1, json!({"type": "allMids"}));
        assert_eq!(calls[1].0, "https://api.hyperliquid-testnet.xyz/exchange");
        let body = &calls[1].1;
        assert_eq!(
            body["action"],
            json!({
                "type": "order",
                "orders": [{
                    "a": 0, "b": true, "p": "105", "s": "2", "r": true,
                    "t": {"limit": {"tif": "Ioc"}}, "c": "xyz:TSLA"
                }],
                "grouping": "na"
            })
        );
        assert!(body["nonce"].as_u64().is_some());
        assert!(body.get("vaultAddress").is_none());
    }

    #[tokio::test]
    async fn test_vault_address_travels_with_signed_actions() {
        let credentials = Credentials::new(HARDHAT_KEY, BaseUrl::Mainnet)
            .with_vault_address("0x1111111111111111111111111111111111111111");
        let transport = MockTransport::new();
        transport.push_ok(json!({"status": "ok"}));

        let intents = vec![TradeIntent::CancelAllOrders {
            asset: "xyz:TSLA".to_string(),
        }];
        let results = run_batch(&credentials, &transport, &intents, ErrorPolicy::FailFast)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);

        let body = &transport.calls()[0].1;
        assert_eq!(
            body["vaultAddress"],
            "0x1111111111111111111111111111111111111111"
        );
        assert_eq!(
            body["action"],
            json!({"type": "cancelByCloid", "cancels": [{"asset": "xyz:TSLA", "cloid": null}]})
        );
    }

    #[tokio::test]
    async fn test_validation_error_skips_transport() {
        let ctx = context();
        let transport = MockTransport::new();
        let runner = BatchRunner::new(&ctx, &transport, ErrorPolicy::Isolate);

        let results = runner
            .run(&[TradeIntent::CancelOrder {
                order_id: "abc".to_string(),
                coin: "xyz:TSLA".to_string(),
            }])
            .await
            .unwrap();
        assert!(results[0].is_error());
        assert!(transport.calls().is_empty());
    }

    #[tokio::test]
    async fn test_api_rejection_is_isolated() {
        let ctx = context();
        let transport = MockTransport::new();
        transport.push_ok(json!({"status": "err", "response": "Order has invalid price."}));
        let runner = BatchRunner::new(&ctx, &transport, ErrorPolicy::Isolate);

        let results = runner
            .run(&[TradeIntent::CancelOrder {
                order_id: "42".to_string(),
                coin: "xyz:TSLA".to_string(),
            }])
            .await
            .unwrap();
        assert_eq!(
            results[0],
            ItemResult::error(0, "Exchange rejected action: Order has invalid price.")
        );
    }

    #[tokio::test]
    async fn test_per_order_rejection_stays_in_data() {
        let ctx = context();
        let transport = MockTransport::new();
        let reply = json!({
            "status": "ok",
            "response": {"type": "cancel", "data": {"statuses": [{"error": "Order was never placed."}]}}
        });
        transport.push_ok(reply.clone());
        let runner = BatchRunner::new(&ctx, &transport, ErrorPolicy::Isolate);

        let results = runner
            .run(&[TradeIntent::CancelOrder {
                order_id: "42".to_string(),
                coin: "xyz:TSLA".to_string(),
            }])
            .await
            .unwrap();
        assert_eq!(results[0], ItemResult::data(0, reply.clone()));
        assert_eq!(order_errors(&reply), vec!["Order was never placed."]);
    }
}
