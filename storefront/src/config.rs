//! Dashboard configuration
//!
//! Every knob has a default matching the stock dashboard, so an empty JSON
//! object (or no file at all) yields a working configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::interface::DashboardError;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV: &str = "STOREFRONT_CONFIG";

pub const DEFAULT_ITEMS_PER_PAGE: u32 = 50;
pub const DEFAULT_LOW_STOCK_THRESHOLD: u32 = 10;
pub const DEFAULT_PRICE_BUCKET_WIDTH: u32 = 100;
pub const DEFAULT_CATALOG_SIZE: u32 = 1000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
#[serde(default)]
pub struct DashboardConfig {
    pub items_per_page: u32,
    /// Records with stock strictly below this count as low stock
    pub low_stock_threshold: u32,
    pub price_bucket_width: u32,
    /// Size of the synthetic catalog generated at mount
    pub catalog_size: u32,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            price_bucket_width: DEFAULT_PRICE_BUCKET_WIDTH,
            catalog_size: DEFAULT_CATALOG_SIZE,
        }
    }
}

impl DashboardConfig {
    /// Resolve configuration: explicit path, then `STOREFRONT_CONFIG`, then defaults.
    pub fn from_sources(cli_path: Option<&str>) -> Result<Self, DashboardError> {
        if let Some(path) = cli_path {
            if path.is_empty() {
                return Err(DashboardError::InvalidInput(
                    "configuration path must not be empty".into(),
                ));
            }
            return Self::load_from_path(path);
        }

        match std::env::var(CONFIG_ENV).ok().filter(|p| !p.is_empty()) {
            Some(path) => Self::load_from_path(path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, DashboardError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            DashboardError::InvalidInput(format!("cannot read config {}: {e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DashboardError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DashboardError> {
        if self.items_per_page == 0 {
            return Err(DashboardError::InvalidInput(
                "items_per_page must be greater than zero".into(),
            ));
        }
        if self.low_stock_threshold == 0 {
            return Err(DashboardError::InvalidInput(
                "low_stock_threshold must be greater than zero".into(),
            ));
        }
        if self.price_bucket_width == 0 {
            return Err(DashboardError::InvalidInput(
                "price_bucket_width must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
