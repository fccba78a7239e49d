use std::{
    fmt,
    str::FromStr,
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::{
    consts::{LOCAL_API_URL, MAINNET_API_URL, TESTNET_API_URL},
    Error,
};

/// Network selector. Resolved to a base URL once per batch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseUrl {
    #[default]
    Mainnet,
    Testnet,
    Localhost,
}

impl BaseUrl {
    pub fn get_url(&self) -> String {
        match self {
            BaseUrl::Mainnet => MAINNET_API_URL.to_string(),
            BaseUrl::Testnet => TESTNET_API_URL.to_string(),
            BaseUrl::Localhost => LOCAL_API_URL.to_string(),
        }
    }
}

impl fmt::Display for BaseUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BaseUrl::Mainnet => "mainnet",
            BaseUrl::Testnet => "testnet",
            BaseUrl::Localhost => "localhost",
        };
        f.write_str(name)
    }
}

impl FromStr for BaseUrl {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(BaseUrl::Mainnet),
            "testnet" => Ok(BaseUrl::Testnet),
            "localhost" => Ok(BaseUrl::Localhost),
            other => Err(Error::config(format!(
                "Unknown network '{other}'. Use: mainnet, testnet, localhost"
            ))),
        }
    }
}

/// Millisecond nonces with a monotonic tie-breaker.
///
/// Two calls inside the same millisecond yield `last + 1` instead of a duplicate.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicU64,
}

impl NonceSource {
    pub const fn new() -> Self {
        Self {
            last: AtomicU64::new(0),
        }
    }

    pub fn next(&self) -> u64 {
        self.next_after(now_ms())
    }

    fn next_after(&self, now: u64) -> u64 {
        let mut prev = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(prev + 1);
            match self
                .last
                .compare_exchange_weak(prev, candidate, Ordering::SeqCst, Ordering::Relaxed)
            {
                Ok(_) => return candidate,
                Err(actual) => prev = actual,
            }
        }
    }
}

static NONCES: NonceSource = NonceSource::new();

/// Next process-wide nonce.
pub fn next_nonce() -> u64 {
    NONCES.next()
}

pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}

/// Lowercase `0x`-prefixed rendering used on the wire.
pub fn address_hex(address: &Address) -> String {
    address.to_string().to_lowercase()
}

pub(crate) fn parse_address(field: &str, value: &str) -> Result<Address, Error> {
    Address::from_str(value.trim())
        .map_err(|e| Error::validation(format!("{field} '{value}' is not a valid address: {e}")))
}
