//! Asset references for builder-deployed (HIP-3) perpetual markets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{consts::HIP3_SEPARATOR, prelude::*, Error};

/// A validated `dex:SYMBOL` pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Hip3Asset {
    name: String,
    split: usize,
}

impl Hip3Asset {
    pub fn parse(raw: &str) -> Result<Self> {
        let mut parts = raw.split(HIP3_SEPARATOR);
        let (dex, symbol) = match (parts.next(), parts.next(), parts.next()) {
            (Some(dex), Some(symbol), None) => (dex, symbol),
            _ => {
                return Err(Error::validation(format!(
                    "asset '{raw}' must be in dex{HIP3_SEPARATOR}ASSET format"
                )))
            }
        };
        if dex.trim().is_empty() || symbol.trim().is_empty() {
            return Err(Error::validation(format!(
                "asset '{raw}' has an empty dex or symbol"
            )));
        }
        Ok(Self {
            name: raw.to_string(),
            split: dex.len(),
        })
    }

    pub fn dex(&self) -> &str {
        &self.name[..self.split]
    }

    pub fn symbol(&self) -> &str {
        &self.name[self.split + HIP3_SEPARATOR.len_utf8()..]
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Hip3Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl TryFrom<String> for Hip3Asset {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Hip3Asset::parse(&value)
    }
}

impl From<Hip3Asset> for String {
    fn from(asset: Hip3Asset) -> Self {
        asset.name
    }
}

/// How an action names its asset.
///
/// HIP-3 markets are resolved server-side by name: the numeric slot is `0` and the
/// name travels out of band (order `c`, cancel `coin`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetRef {
    NumericIndex(u32),
    Hip3Name(Hip3Asset),
}

impl AssetRef {
    /// Value for the wire `a` field.
    pub fn wire_index(&self) -> u32 {
        match self {
            AssetRef::NumericIndex(index) => *index,
            AssetRef::Hip3Name(_) => 0,
        }
    }

    /// Name carried alongside the index, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            AssetRef::NumericIndex(_) => None,
            AssetRef::Hip3Name(asset) => Some(asset.as_str()),
        }
    }
}

impl From<Hip3Asset> for AssetRef {
    fn from(asset: Hip3Asset) -> Self {
        AssetRef::Hip3Name(asset)
    }
}
