//! Trading intents accepted by the batch pipeline.

use serde::{Deserialize, Serialize};

use crate::serde_utils::string_or_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    #[serde(alias = "buy", alias = "BUY")]
    Buy,
    #[serde(alias = "sell", alias = "SELL")]
    Sell,
}

impl Side {
    pub fn is_buy(self) -> bool {
        matches!(self, Side::Buy)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderKind {
    #[serde(alias = "Market")]
    Market,
    #[serde(alias = "Limit")]
    Limit,
}

/// Order placement parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderParams {
    /// `dex:ASSET`
    pub asset: String,
    pub side: Side,
    /// Decimal string, sent verbatim.
    pub size: String,
    pub order_type: OrderKind,
    /// Required for limit orders, ignored for market orders.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default)]
    pub reduce_only: bool,
}

/// One unit of work in a batch, tagged by `operation`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "operation", rename_all = "camelCase")]
pub enum TradeIntent {
    PlaceOrder(PlaceOrderParams),
    #[serde(rename_all = "camelCase")]
    CancelOrder {
        #[serde(deserialize_with = "string_or_number")]
        order_id: String,
        coin: String,
    },
    #[serde(rename_all = "camelCase")]
    CancelAllOrders { asset: String },
    #[serde(rename_all = "camelCase")]
    GetOpenOrders {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_address: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    GetPositions {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_address: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    GetAccountSummary {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_address: Option<String>,
    },
    GetMarketInfo,
    #[serde(rename_all = "camelCase")]
    GetOrderBook { asset: String },
    #[serde(rename_all = "camelCase")]
    GetUserFills {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        user_address: Option<String>,
    },
}

impl TradeIntent {
    /// Operation name as it appears on the wire.
    pub fn operation(&self) -> &'static str {
        match self {
            TradeIntent::PlaceOrder(_) => "placeOrder",
            TradeIntent::CancelOrder { .. } => "cancelOrder",
            TradeIntent::CancelAllOrders { .. } => "cancelAllOrders",
            TradeIntent::GetOpenOrders { .. } => "getOpenOrders",
            TradeIntent::GetPositions { .. } => "getPositions",
            TradeIntent::GetAccountSummary { .. } => "getAccountSummary",
            TradeIntent::GetMarketInfo => "getMarketInfo",
            TradeIntent::GetOrderBook { .. } => "getOrderBook",
            TradeIntent::GetUserFills { .. } => "getUserFills",
        }
    }

    /// Whether the intent needs a signed `/exchange` action.
    pub fn is_signed(&self) -> bool {
        matches!(
            self,
            TradeIntent::PlaceOrder(_)
                | TradeIntent::CancelOrder { .. }
                | TradeIntent::CancelAllOrders { .. }
        )
    }
}
