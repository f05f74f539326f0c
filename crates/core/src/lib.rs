//! Asset lifecycle domain: registry, assignment ledger, status transition
//! engine, and bulk coordinator, all scoped to a tenant/organization.
//!
//! This crate has no internal deps. Persistence sits behind
//! [`store::AssetStore`] and identity behind [`scope::Directory`]; the `db`
//! crate provides the Postgres implementations and [`memory`] the in-process
//! ones.

pub mod asset;
pub mod asset_status;
pub mod assignment;
pub mod bulk;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod listing;
pub mod memory;
pub mod registry;
pub mod scope;
pub mod service;
pub mod store;
pub mod types;
