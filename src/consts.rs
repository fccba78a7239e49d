pub const MAINNET_API_URL: &str = "https://api.hyperliquid.xyz";
pub const TESTNET_API_URL: &str = "https://api.hyperliquid-testnet.xyz";
pub const LOCAL_API_URL: &str = "http://localhost:3001";

pub(crate) const EXCHANGE_PATH: &str = "/exchange";
pub(crate) const INFO_PATH: &str = "/info";

/// Separator between the builder DEX name and the asset symbol.
pub const HIP3_SEPARATOR: char = ':';

/// Grouping used for standalone orders.
pub(crate) const NO_GROUPING: &str = "na";
