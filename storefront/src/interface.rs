//! Storefront FFI Interface Definition
//!
//! This file defines the public interface exposed to the presentation layer via UniFFI.
//! It acts as the source of truth for shared types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Price ordering applied to the filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, uniffi::Enum)]
pub enum SortOrder {
    /// Keep catalog order
    #[default]
    None,
    Ascending,
    Descending,
}

impl SortOrder {
    /// Parse the option value used by the sort selector ("", "asc", "desc")
    pub fn from_option_value(value: &str) -> Result<Self, DashboardError> {
        match value.trim() {
            "" => Ok(SortOrder::None),
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(DashboardError::InvalidInput(format!(
                "unknown sort order: {other:?}"
            ))),
        }
    }

    pub fn option_value(&self) -> &'static str {
        match self {
            SortOrder::None => "",
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// A catalog record. Immutable once it is part of a catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, uniffi::Record)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

/// Search and category filter chosen by the user.
/// An empty `category` means "all categories".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize, uniffi::Record)]
pub struct QueryParams {
    pub search_term: String,
    pub category: String,
}

impl QueryParams {
    pub fn new(search_term: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            category: category.into(),
        }
    }
}

/// A batch of query changes applied as a single transition.
/// `None` leaves the corresponding field untouched.
#[derive(Debug, Clone, PartialEq, Default, uniffi::Record)]
pub struct QueryUpdate {
    pub search_term: Option<String>,
    pub category: Option<String>,
    pub sort_order: Option<SortOrder>,
}

/// A bounded slice of the ordered view
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
pub struct Page {
    /// 1-indexed
    pub page_number: u32,
    pub items_per_page: u32,
    /// Never less than 1, even for an empty view
    pub total_pages: u32,
    /// Length of the view this page was cut from
    pub total_items: u64,
    pub items: Vec<Product>,
}

/// One bar of the category chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct ChartPoint {
    pub name: String,
    pub products: u64,
}

/// Aggregates over the filtered view.
///
/// Serialized field names follow the persisted cache format
/// (`averagePrice`, `lowStock`, `categoryCount`, `priceRanges`, `chartData`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, uniffi::Record)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// 0.0 when `has_data` is false
    pub average_price: f64,
    pub has_data: bool,
    #[serde(rename = "lowStock")]
    pub low_stock_count: u64,
    #[serde(rename = "categoryCount")]
    pub category_counts: HashMap<String, u64>,
    #[serde(rename = "priceRanges")]
    pub price_range_counts: HashMap<String, u64>,
    /// Categories in order of first appearance in the view
    pub chart_data: Vec<ChartPoint>,
}

/// Everything the presentation layer needs for one render
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
pub struct DashboardSnapshot {
    pub query: QueryParams,
    pub sort_order: SortOrder,
    pub page: Page,
    pub statistics: Statistics,
    pub filtered_count: u64,
    pub cart_size: u64,
    pub chart_visible: bool,
}

/// Error type for Storefront operations
#[derive(Debug, Error, uniffi::Error)]
pub enum DashboardError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// SERVICE INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// The primary interface for driving the dashboard.
/// This matches the functionality exposed by the `DashboardStore` object.
#[uniffi::export(with_foreign)]
pub trait DashboardApi: Send + Sync {
    // ─────────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// Replace the search term. Returns the new filtered count.
    fn set_search_term(&self, term: String) -> u64;

    /// Replace the category filter ("" clears it). Returns the new filtered count.
    fn set_category(&self, category: String) -> Result<u64, DashboardError>;

    /// Replace the price ordering
    fn set_sort_order(&self, order: SortOrder);

    /// Apply several query changes as one transition. Returns the new filtered count.
    fn apply(&self, update: QueryUpdate) -> Result<u64, DashboardError>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────────

    /// The visible slice of the ordered view
    fn current_page(&self) -> Page;

    /// Number of records matching the current query
    fn filtered_count(&self) -> u64;

    /// Aggregates over the filtered view
    fn statistics(&self) -> Statistics;

    /// Everything needed for one render, read under a single lock
    fn snapshot(&self) -> DashboardSnapshot;

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────────

    /// Advance one page; no-op on the last page. Returns the page number.
    fn next_page(&self) -> u32;

    /// Go back one page; no-op on page 1. Returns the page number.
    fn previous_page(&self) -> u32;

    /// Jump to a page, clamped into range. Returns the page number.
    fn go_to_page(&self, page_number: u32) -> u32;

    /// Page numbers for the page-button strip
    fn page_numbers(&self) -> Vec<u32>;

    // ─────────────────────────────────────────────────────────────────────────────
    // Cart & Chart
    // ─────────────────────────────────────────────────────────────────────────────

    /// Append a product id to the cart. Returns the new cart size.
    fn add_to_cart(&self, product_id: i64) -> u64;

    /// Number of entries in the cart (duplicates counted)
    fn cart_size(&self) -> u64;

    /// Show or hide the category chart. Returns the new visibility.
    fn toggle_chart(&self) -> bool;
}

impl From<crate::database::DatabaseError> for DashboardError {
    fn from(e: crate::database::DatabaseError) -> Self {
        DashboardError::DatabaseError(e.to_string())
    }
}

impl From<serde_json::Error> for DashboardError {
    fn from(e: serde_json::Error) -> Self {
        DashboardError::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_order_option_values() {
        assert_eq!(SortOrder::from_option_value("").unwrap(), SortOrder::None);
        assert_eq!(SortOrder::from_option_value("asc").unwrap(), SortOrder::Ascending);
        assert_eq!(SortOrder::from_option_value("desc").unwrap(), SortOrder::Descending);
        for order in [SortOrder::None, SortOrder::Ascending, SortOrder::Descending] {
            assert_eq!(SortOrder::from_option_value(order.option_value()).unwrap(), order);
        }
    }

    #[test]
    fn test_sort_order_rejects_unknown_value() {
        let err = SortOrder::from_option_value("price").unwrap_err();
        assert!(matches!(err, DashboardError::InvalidInput(_)));
    }

    #[test]
    fn test_statistics_serializes_with_cache_field_names() {
        let stats = Statistics {
            average_price: 12.5,
            has_data: true,
            low_stock_count: 3,
            ..Default::default()
        };
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averagePrice"], 12.5);
        assert_eq!(json["lowStock"], 3);
        assert!(json.get("categoryCount").is_some());
        assert!(json.get("priceRanges").is_some());
        assert!(json.get("chartData").is_some());
    }
}
