//! Credential configuration.
//!
//! Credentials come from an external provider. Two providers ship with the crate:
//! a plain [`Credentials`] value (e.g. deserialized from JSON) and [`EnvCredentials`],
//! which reads the process environment after loading a `.env` file.

use std::env;

use serde::Deserialize;
use tracing::debug;

use crate::{prelude::*, BaseUrl, Error};

pub const PRIVATE_KEY_VAR: &str = "HYPERLIQUID_PRIVATE_KEY";
pub const NETWORK_VAR: &str = "HYPERLIQUID_NETWORK";
pub const VAULT_ADDRESS_VAR: &str = "HYPERLIQUID_VAULT_ADDRESS";
pub const WALLET_ADDRESS_VAR: &str = "HYPERLIQUID_WALLET_ADDRESS";

/// Raw credential inputs.
#[derive(Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    /// Hex private key. A `0x` prefix is tolerated.
    pub private_key: String,
    #[serde(default)]
    pub network: BaseUrl,
    #[serde(default)]
    pub vault_address: Option<String>,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

// Keep the key out of logs
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("private_key", &"<redacted>")
            .field("network", &self.network)
            .field("vault_address", &self.vault_address)
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}

impl Credentials {
    pub fn new(private_key: impl Into<String>, network: BaseUrl) -> Self {
        Self {
            private_key: private_key.into(),
            network,
            vault_address: None,
            wallet_address: None,
        }
    }

    pub fn with_vault_address(mut self, vault_address: impl Into<String>) -> Self {
        self.vault_address = Some(vault_address.into());
        self
    }

    pub fn with_wallet_address(mut self, wallet_address: impl Into<String>) -> Self {
        self.wallet_address = Some(wallet_address.into());
        self
    }

    /// Vault address, with blank values treated as unset.
    pub fn vault_address(&self) -> Option<&str> {
        non_blank(self.vault_address.as_deref())
    }

    /// Wallet override, with blank values treated as unset.
    pub fn wallet_address(&self) -> Option<&str> {
        non_blank(self.wallet_address.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Source of credentials for a batch.
pub trait CredentialProvider {
    fn credentials(&self) -> Result<Credentials>;
}

impl CredentialProvider for Credentials {
    fn credentials(&self) -> Result<Credentials> {
        Ok(self.clone())
    }
}

/// Reads credentials from `HYPERLIQUID_*` environment variables.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvCredentials;

impl EnvCredentials {
    /// Resolve credentials through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Credentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let private_key = lookup(PRIVATE_KEY_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::config(format!("{PRIVATE_KEY_VAR} is not set")))?;

        let network = match lookup(NETWORK_VAR) {
            Some(name) if !name.trim().is_empty() => name.parse()?,
            _ => BaseUrl::default(),
        };

        Ok(Credentials {
            private_key: private_key.trim().to_string(),
            network,
            vault_address: lookup(VAULT_ADDRESS_VAR),
            wallet_address: lookup(WALLET_ADDRESS_VAR),
        })
    }
}

impl CredentialProvider for EnvCredentials {
    fn credentials(&self) -> Result<Credentials> {
        if dotenvy::dotenv().is_ok() {
            debug!("Loaded .env file");
        }
        Self::from_lookup(|name| env::var(name).ok())
    }
}
