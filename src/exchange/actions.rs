//! Wire shapes of the signed exchange actions.
//!
//! Field declaration order is the serialization order, and the serialized bytes are what
//! get hashed and signed. Do not reorder fields or add `skip_serializing_if` to fields
//! the exchange expects to see.

use serde::Serialize;

use crate::{asset::AssetRef, consts::NO_GROUPING};

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tif {
    /// Good til cancelled
    Gtc,
    /// Immediate or cancel
    Ioc,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Limit {
    pub tif: Tif,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Order {
    Limit(Limit),
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "b")]
    pub is_buy: bool,
    #[serde(rename = "p")]
    pub limit_px: String,
    #[serde(rename = "s")]
    pub sz: String,
    #[serde(rename = "r")]
    pub reduce_only: bool,
    #[serde(rename = "t")]
    pub order_type: Order,
    /// Carries the HIP-3 asset name; absent for plain numeric assets.
    #[serde(rename = "c", skip_serializing_if = "Option::is_none")]
    pub cloid: Option<String>,
}

impl OrderRequest {
    pub fn new(
        asset: &AssetRef,
        is_buy: bool,
        limit_px: String,
        sz: String,
        reduce_only: bool,
        tif: Tif,
    ) -> Self {
        Self {
            asset: asset.wire_index(),
            is_buy,
            limit_px,
            sz,
            reduce_only,
            order_type: Order::Limit(Limit { tif }),
            cloid: asset.name().map(str::to_string),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkOrder {
    pub orders: Vec<OrderRequest>,
    pub grouping: String,
}

impl BulkOrder {
    pub fn single(order: OrderRequest) -> Self {
        Self {
            orders: vec![order],
            grouping: NO_GROUPING.to_string(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CancelRequest {
    #[serde(rename = "a")]
    pub asset: u32,
    #[serde(rename = "o")]
    pub oid: u64,
    /// Carries the HIP-3 asset name; absent for plain numeric assets.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coin: Option<String>,
}

impl CancelRequest {
    pub fn new(asset: &AssetRef, oid: u64) -> Self {
        Self {
            asset: asset.wire_index(),
            oid,
            coin: asset.name().map(str::to_string),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkCancel {
    pub cancels: Vec<CancelRequest>,
}

/// Cancel by client order id. A `null` cloid targets every order on the asset.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct CancelRequestCloid {
    pub asset: String,
    pub cloid: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct BulkCancelCloid {
    pub cancels: Vec<CancelRequestCloid>,
}

/// A signable exchange action.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum Action {
    Order(BulkOrder),
    Cancel(BulkCancel),
    CancelByCloid(BulkCancelCloid),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Order(_) => "order",
            Action::Cancel(_) => "cancel",
            Action::CancelByCloid(_) => "cancelByCloid",
        }
    }
}
