//! Signing identity derived from a private key.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

use crate::{config::Credentials, helpers::parse_address, prelude::*, SigningError};

/// Account key plus the addresses it may act for.
#[derive(Clone)]
pub struct SigningIdentity {
    wallet: PrivateKeySigner,
    vault_address: Option<Address>,
    wallet_address: Option<Address>,
}

// Security: never print the key
impl std::fmt::Debug for SigningIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SigningIdentity")
            .field("wallet", &"<redacted>")
            .field("signer_address", &self.wallet.address())
            .field("vault_address", &self.vault_address)
            .field("wallet_address", &self.wallet_address)
            .finish()
    }
}

impl SigningIdentity {
    pub fn new(wallet: PrivateKeySigner) -> Self {
        Self {
            wallet,
            vault_address: None,
            wallet_address: None,
        }
    }

    /// Parse a hex private key (`0x` prefix optional).
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let wallet = private_key
            .trim()
            .parse::<PrivateKeySigner>()
            .map_err(|e| SigningError::PrivateKeyParse(e.to_string()))?;
        Ok(Self::new(wallet))
    }

    pub fn from_credentials(credentials: &Credentials) -> Result<Self> {
        let mut identity = Self::from_private_key(&credentials.private_key)?;
        if let Some(vault) = credentials.vault_address() {
            identity.vault_address = Some(parse_address("vaultAddress", vault)?);
        }
        if let Some(wallet) = credentials.wallet_address() {
            identity.wallet_address = Some(parse_address("walletAddress", wallet)?);
        }
        Ok(identity)
    }

    pub fn with_vault_address(mut self, vault_address: Address) -> Self {
        self.vault_address = Some(vault_address);
        self
    }

    pub fn with_wallet_address(mut self, wallet_address: Address) -> Self {
        self.wallet_address = Some(wallet_address);
        self
    }

    /// Address derived from the private key.
    pub fn signer_address(&self) -> Address {
        self.wallet.address()
    }

    pub fn vault_address(&self) -> Option<Address> {
        self.vault_address
    }

    pub fn wallet_address(&self) -> Option<Address> {
        self.wallet_address
    }

    /// Address trades settle against: vault, then wallet override, then key.
    pub fn effective_address(&self) -> Address {
        self.vault_address
            .or(self.wallet_address)
            .unwrap_or_else(|| self.wallet.address())
    }

    pub(crate) fn wallet(&self) -> &PrivateKeySigner {
        &self.wallet
    }
}
