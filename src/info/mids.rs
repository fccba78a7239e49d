use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::{asset::Hip3Asset, prelude::*, Error};

/// Pick `asset`'s mid out of an `allMids` response (`{coin: "price", ...}`).
pub fn parse_mid(all_mids: &Value, asset: &Hip3Asset) -> Result<Decimal> {
    let unavailable = || Error::PriceUnavailable {
        asset: asset.to_string(),
    };
    let raw = all_mids
        .get(asset.as_str())
        .and_then(Value::as_str)
        .ok_or_else(unavailable)?;
    match Decimal::from_str(raw) {
        Ok(mid) if mid > Decimal::ZERO => Ok(mid),
        _ => Err(unavailable()),
    }
}
