//! Database row types.
//!
//! Rows mirror their table exactly and convert into the `assetdesk-core`
//! domain types, which is where text columns such as `status` are parsed.

pub mod asset;
pub mod assignment;
pub mod directory;
