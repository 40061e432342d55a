//! Storefront Core - derived-state pipeline for the product dashboard
//!
//! Turns an immutable catalog into a filtered/sorted view, fixed-size pages and
//! aggregate statistics, recomputed whenever the query changes. Statistics are
//! served through a single-slot cache keyed by a content fingerprint of the view
//! and persisted to SQLite.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub mod cart;
pub mod config;
pub mod database;
pub mod interface;
pub mod models;
pub mod pagination;
pub mod pipeline;
pub mod search;
pub mod stats;
mod store;

pub use config::DashboardConfig;
pub use interface::*;
pub use models::{Catalog, CATEGORIES};
pub use store::DashboardStore;

uniffi::setup_scaffolding!("storefront");
