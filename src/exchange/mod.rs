//! Signed exchange actions.
//!
//! # Submodules
//! - `actions` - wire shapes of `order`, `cancel` and `cancelByCloid`
//! - `builder` - intent to action mapping, including market-order pricing
//! - `signing` - canonical hashing, ECDSA signing and the signed envelope

mod actions;
mod builder;
mod signing;

pub use actions::*;
pub use builder::{
    cancel_all_orders, cancel_order, limit_order, market_limit_px, market_order, ActionBuilder,
    MidPriceSource, MARKET_BUY_MULTIPLIER, MARKET_SELL_MULTIPLIER,
};
pub use signing::{action_hash, canonical_bytes, sign_action, SignatureParts, SignedAction};
