//! Shared serialization helpers.

use alloy::primitives::Address;
use serde::{de, Deserialize, Deserializer, Serializer};

use crate::helpers::address_hex;

/// Accept either a JSON string or a JSON integer, keeping the raw text.
///
/// Order ids arrive from loosely-typed parameter sources; parsing happens later so a
/// bad value surfaces as a validation error for that item only.
pub fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Uint(u64),
        Float(f64),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Text(s) => Ok(s),
        Raw::Int(n) => Ok(n.to_string()),
        Raw::Uint(n) => Ok(n.to_string()),
        Raw::Float(f) if f.is_finite() => Ok(f.to_string()),
        Raw::Float(_) => Err(de::Error::custom("non-finite number")),
    }
}

/// Serialize an address as lowercase `0x` hex.
pub fn serialize_address<S>(address: &Address, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    s.serialize_str(&address_hex(address))
}
