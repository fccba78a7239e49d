//! Maps trade intents onto exchange actions.

use std::str::FromStr;

use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::{
    asset::{AssetRef, Hip3Asset},
    exchange::actions::{
        Action, BulkCancel, BulkCancelCloid, BulkOrder, CancelRequest, CancelRequestCloid,
        OrderRequest, Tif,
    },
    intent::{OrderKind, PlaceOrderParams, Side, TradeIntent},
    prelude::*,
    Error,
};

/// Buys cross the book at mid + 5%.
pub const MARKET_BUY_MULTIPLIER: Decimal = dec!(1.05);
/// Sells cross the book at mid - 5%.
pub const MARKET_SELL_MULTIPLIER: Decimal = dec!(0.95);

/// Reference price lookup used to price market orders.
#[async_trait]
pub trait MidPriceSource: Send + Sync {
    async fn mid_price(&self, asset: &Hip3Asset) -> Result<Decimal>;
}

/// Aggressive limit price for a market order.
///
/// A mid too large to scale is reported as unavailable for `asset`.
pub fn market_limit_px(asset: &Hip3Asset, mid: Decimal, side: Side) -> Result<String> {
    let multiplier = match side {
        Side::Buy => MARKET_BUY_MULTIPLIER,
        Side::Sell => MARKET_SELL_MULTIPLIER,
    };
    let px = mid
        .checked_mul(multiplier)
        .ok_or_else(|| Error::PriceUnavailable {
            asset: asset.to_string(),
        })?;
    Ok(px.normalize().to_string())
}

/// Trimmed decimal string, rejected unless strictly positive.
fn positive_decimal(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    match Decimal::from_str(trimmed) {
        Ok(d) if d > Decimal::ZERO => Ok(trimmed.to_string()),
        _ => Err(Error::validation(format!(
            "{field} '{value}' must be a positive decimal"
        ))),
    }
}

fn validate_size(size: &str) -> Result<String> {
    positive_decimal("size", size)
}

fn validate_price(price: Option<&str>) -> Result<String> {
    match price {
        Some(price) if !price.trim().is_empty() => positive_decimal("price", price),
        _ => Err(Error::validation("price is required for limit orders")),
    }
}

fn order_action(
    asset: Hip3Asset,
    params: &PlaceOrderParams,
    limit_px: String,
    tif: Tif,
) -> Result<Action> {
    let sz = validate_size(&params.size)?;
    let order = OrderRequest::new(
        &AssetRef::from(asset),
        params.side.is_buy(),
        limit_px,
        sz,
        params.reduce_only,
        tif,
    );
    Ok(Action::Order(BulkOrder::single(order)))
}

/// Limit order; the price is passed through as written, minus surrounding whitespace.
pub fn limit_order(params: &PlaceOrderParams) -> Result<Action> {
    let asset = Hip3Asset::parse(&params.asset)?;
    let limit_px = validate_price(params.price.as_deref())?;
    order_action(asset, params, limit_px, Tif::Gtc)
}

/// Market order priced off an already-known mid.
pub fn market_order(params: &PlaceOrderParams, mid: Decimal) -> Result<Action> {
    let asset = Hip3Asset::parse(&params.asset)?;
    let limit_px = market_limit_px(&asset, mid, params.side)?;
    order_action(asset, params, limit_px, Tif::Ioc)
}

pub fn cancel_order(order_id: &str, coin: &str) -> Result<Action> {
    let oid = order_id.trim().parse::<u64>().map_err(|_| {
        Error::validation(format!("orderId '{order_id}' is not an integer"))
    })?;
    let asset = AssetRef::from(Hip3Asset::parse(coin)?);
    Ok(Action::Cancel(BulkCancel {
        cancels: vec![CancelRequest::new(&asset, oid)],
    }))
}

pub fn cancel_all_orders(asset: &str) -> Result<Action> {
    if asset.trim().is_empty() {
        return Err(Error::validation("asset is required to cancel all orders"));
    }
    Ok(Action::CancelByCloid(BulkCancelCloid {
        cancels: vec![CancelRequestCloid {
            asset: asset.to_string(),
            cloid: None,
        }],
    }))
}

/// Builds actions for signed intents, fetching mids for market orders.
pub struct ActionBuilder<'a> {
    mids: &'a dyn MidPriceSource,
}

impl<'a> ActionBuilder<'a> {
    pub fn new(mids: &'a dyn MidPriceSource) -> Self {
        Self { mids }
    }

    pub async fn build(&self, intent: &TradeIntent) -> Result<Action> {
        match intent {
            TradeIntent::PlaceOrder(params) => self.place_order(params).await,
            TradeIntent::CancelOrder { order_id, coin } => cancel_order(order_id, coin),
            TradeIntent::CancelAllOrders { asset } => cancel_all_orders(asset),
            other => Err(Error::validation(format!(
                "{} is a read-only query, not an exchange action",
                other.operation()
            ))),
        }
    }

    async fn place_order(&self, params: &PlaceOrderParams) -> Result<Action> {
        match params.order_type {
            OrderKind::Limit => limit_order(params),
            OrderKind::Market => {
                // Validate before spending a round trip on the mid lookup
                let asset = Hip3Asset::parse(&params.asset)?;
                validate_size(&params.size)?;
                let mid = self.mids.mid_price(&asset).await?;
                debug!(asset = %asset, mid = %mid, side = ?params.side, "Pricing market order");
                market_order(params, mid)
            }
        }
    }
}
