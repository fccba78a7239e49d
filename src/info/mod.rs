//! Read-only `/info` queries.

mod info_request;
mod mids;

pub use info_request::InfoRequest;
pub use mids::parse_mid;
