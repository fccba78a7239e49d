//! Canonical hashing and signing of exchange actions.
//!
//! The envelope `{action, nonce, vaultAddress?}` is serialized as compact JSON in struct
//! declaration order, hashed with keccak256, and the 32-byte hash is signed as an
//! EIP-191 personal message.

use alloy::{
    primitives::{hex, keccak256, Address, Signature, B256},
    signers::SignerSync,
};
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::{
    exchange::actions::Action, helpers::address_hex, key::SigningIdentity, prelude::*,
    SigningError,
};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SigningEnvelope<'a> {
    action: &'a Action,
    nonce: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    vault_address: Option<&'a str>,
}

fn serialize_b256<S>(value: &B256, s: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&hex::encode_prefixed(value.as_slice()))
}

/// Signature split the way the exchange expects it.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignatureParts {
    #[serde(serialize_with = "serialize_b256")]
    pub r: B256,
    #[serde(serialize_with = "serialize_b256")]
    pub s: B256,
    pub v: u8,
}

impl From<&Signature> for SignatureParts {
    fn from(sig: &Signature) -> Self {
        let bytes = sig.as_bytes();
        Self {
            r: B256::from_slice(&bytes[..32]),
            s: B256::from_slice(&bytes[32..64]),
            v: bytes[64],
        }
    }
}

/// Exact bytes that get hashed for `(action, nonce, vault_address)`.
pub fn canonical_bytes(
    action: &Action,
    nonce: u64,
    vault_address: Option<&str>,
) -> Result<Vec<u8>> {
    let envelope = SigningEnvelope {
        action,
        nonce,
        vault_address,
    };
    serde_json::to_vec(&envelope).map_err(|e| SigningError::Serialize(e.to_string()).into())
}

pub fn action_hash(action: &Action, nonce: u64, vault_address: Option<&str>) -> Result<B256> {
    Ok(keccak256(canonical_bytes(action, nonce, vault_address)?))
}

fn sign_hash(identity: &SigningIdentity, hash: &B256) -> Result<Signature> {
    identity
        .wallet()
        .sign_message_sync(hash.as_slice())
        .map_err(|e| SigningError::Ecdsa(e.to_string()).into())
}

/// Sign `(action, nonce, vault_address)` with the identity's key.
pub fn sign_action(
    action: &Action,
    nonce: u64,
    vault_address: Option<&str>,
    identity: &SigningIdentity,
) -> Result<SignatureParts> {
    let hash = action_hash(action, nonce, vault_address)?;
    Ok(SignatureParts::from(&sign_hash(identity, &hash)?))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExchangePayload<'a> {
    action: &'a Action,
    nonce: u64,
    signature: SignatureParts,
    #[serde(skip_serializing_if = "Option::is_none")]
    vault_address: Option<&'a str>,
}

/// An action bound to the nonce and vault it was signed with.
///
/// Only constructible through [`SignedAction::sign`] and immutable afterwards, so the
/// request body always carries the triple that was hashed.
#[derive(Debug, Clone)]
pub struct SignedAction {
    action: Action,
    nonce: u64,
    vault_address: Option<String>,
    hash: B256,
    signature: Signature,
}

impl SignedAction {
    pub fn sign(action: Action, nonce: u64, identity: &SigningIdentity) -> Result<Self> {
        let vault_address = identity.vault_address().map(|a| address_hex(&a));
        let hash = action_hash(&action, nonce, vault_address.as_deref())?;
        let signature = sign_hash(identity, &hash)?;
        Ok(Self {
            action,
            nonce,
            vault_address,
            hash,
            signature,
        })
    }

    pub fn action(&self) -> &Action {
        &self.action
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn vault_address(&self) -> Option<&str> {
        self.vault_address.as_deref()
    }

    pub fn hash(&self) -> B256 {
        self.hash
    }

    pub fn signature(&self) -> SignatureParts {
        SignatureParts::from(&self.signature)
    }

    /// Recover the address that produced the signature.
    pub fn verify_signer(&self) -> Result<Address> {
        self.signature
            .recover_address_from_msg(self.hash.as_slice())
            .map_err(|e| SigningError::Recovery(e.to_string()).into())
    }

    /// `{action, nonce, signature, vaultAddress?}` body for `POST /exchange`.
    pub fn to_request_body(&self) -> Result<Value> {
        let payload = ExchangePayload {
            action: &self.action,
            nonce: self.nonce,
            signature: self.signature(),
            vault_address: self.vault_address.as_deref(),
        };
        serde_json::to_value(&payload).map_err(|e| SigningError::Serialize(e.to_string()).into())
    }
}
