#![deny(unreachable_pub)]

// Core modules
mod consts;
mod errors;
mod helpers;
mod prelude;
mod req;

// Shared utilities
pub mod serde_utils;

// Pipeline modules
pub mod asset;
pub mod batch;
pub mod config;
pub mod dispatcher;
pub mod exchange;
pub mod info;
pub mod intent;
pub mod key;

#[cfg(test)]
mod test_utils;

// Re-exports
pub use asset::{AssetRef, Hip3Asset};
pub use batch::{
    normalize, run_batch, BatchContext, BatchRunner, ErrorPolicy, ItemOutcome, ItemResult,
};
pub use config::{CredentialProvider, Credentials, EnvCredentials};
pub use consts::{HIP3_SEPARATOR, LOCAL_API_URL, MAINNET_API_URL, TESTNET_API_URL};
pub use dispatcher::{order_errors, Dispatch, RequestDispatcher};
pub use errors::{Error, SigningError, TransportError};
pub use exchange::{Action, ActionBuilder, MidPriceSource, SignatureParts, SignedAction};
pub use helpers::{address_hex, next_nonce, BaseUrl, NonceSource};
pub use info::InfoRequest;
pub use intent::{OrderKind, PlaceOrderParams, Side, TradeIntent};
pub use key::SigningIdentity;
pub use req::{HttpClient, Transport};
