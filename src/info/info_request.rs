use alloy::primitives::Address;
use serde::Serialize;

use crate::{
    helpers::parse_address, intent::TradeIntent, key::SigningIdentity, prelude::*,
    serde_utils::serialize_address, Error,
};

/// Body of a `POST /info` request.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum InfoRequest {
    /// Mid prices for every listed coin.
    AllMids,
    OpenOrders {
        #[serde(serialize_with = "serialize_address")]
        user: Address,
    },
    /// Positions and margin summary.
    #[serde(rename = "clearinghouseState")]
    UserState {
        #[serde(serialize_with = "serialize_address")]
        user: Address,
    },
    /// Builder-deployed perp DEXs.
    PerpDexs,
    L2Book {
        coin: String,
    },
    UserFills {
        #[serde(serialize_with = "serialize_address")]
        user: Address,
    },
}

fn resolve_user(user_address: Option<&str>, identity: &SigningIdentity) -> Result<Address> {
    match user_address.map(str::trim).filter(|u| !u.is_empty()) {
        Some(user) => parse_address("userAddress", user),
        None => Ok(identity.effective_address()),
    }
}

impl InfoRequest {
    /// Query body for a read-only intent; `None` for intents that need signing.
    pub fn from_intent(intent: &TradeIntent, identity: &SigningIdentity) -> Result<Option<Self>> {
        let request = match intent {
            TradeIntent::GetOpenOrders { user_address } => InfoRequest::OpenOrders {
                user: resolve_user(user_address.as_deref(), identity)?,
            },
            TradeIntent::GetPositions { user_address }
            | TradeIntent::GetAccountSummary { user_address } => InfoRequest::UserState {
                user: resolve_user(user_address.as_deref(), identity)?,
            },
            TradeIntent::GetMarketInfo => InfoRequest::PerpDexs,
            TradeIntent::GetOrderBook { asset } => {
                if asset.trim().is_empty() {
                    return Err(Error::validation("asset is required for an order book query"));
                }
                InfoRequest::L2Book {
                    coin: asset.clone(),
                }
            }
            TradeIntent::GetUserFills { user_address } => InfoRequest::UserFills {
                user: resolve_user(user_address.as_deref(), identity)?,
            },
            TradeIntent::PlaceOrder(_)
            | TradeIntent::CancelOrder { .. }
            | TradeIntent::CancelAllOrders { .. } => return Ok(None),
        };
        Ok(Some(request))
    }
}
