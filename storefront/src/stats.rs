//! Statistics aggregation and the statistics cache
//!
//! The cache holds a single entry, keyed by a content fingerprint of the view
//! it was computed from (plus the thresholds used). A lookup for any other view
//! is a miss, so statistics can never go stale when filters change.
//!
//! The entry is persisted under [`STATS_CACHE_KEY`] as a flat JSON object:
//! `{ fingerprint, averagePrice, hasData, lowStock, categoryCount, priceRanges, chartData }`.
//! It is read once when the cache is opened and written on every miss.
//! Persistence is best-effort: unreadable entries and failed writes are logged
//! and otherwise ignored.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::{DashboardConfig, DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_PRICE_BUCKET_WIDTH};
use crate::database::Database;
use crate::interface::{ChartPoint, Product, Statistics};
use crate::models::view_fingerprint;

/// Well-known key of the persisted statistics entry
pub const STATS_CACHE_KEY: &str = "statsCache";

/// Aggregation knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsThresholds {
    /// Stock strictly below this is "low"
    pub low_stock_threshold: u32,
    pub price_bucket_width: u32,
}

impl Default for StatsThresholds {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            price_bucket_width: DEFAULT_PRICE_BUCKET_WIDTH,
        }
    }
}

impl From<&DashboardConfig> for StatsThresholds {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            low_stock_threshold: config.low_stock_threshold,
            price_bucket_width: config.price_bucket_width,
        }
    }
}

/// Aggregate with the stock thresholds (low stock < 10, buckets of 100)
pub fn aggregate(view: &[Product]) -> Statistics {
    aggregate_with(view, &StatsThresholds::default())
}

/// Summary metrics and histograms over `view`.
/// An empty view yields `average_price == 0.0` and `has_data == false`.
pub fn aggregate_with(view: &[Product], thresholds: &StatsThresholds) -> Statistics {
    let mut chart_data: Vec<ChartPoint> = Vec::new();
    let mut chart_index: HashMap<&str, usize> = HashMap::new();
    let mut price_range_counts: HashMap<String, u64> = HashMap::new();
    let mut price_sum = 0.0;
    let mut low_stock_count = 0u64;

    for product in view {
        price_sum += product.price;
        if product.stock < thresholds.low_stock_threshold {
            low_stock_count += 1;
        }

        match chart_index.get(product.category.as_str()) {
            Some(&i) => chart_data[i].products += 1,
            None => {
                chart_index.insert(product.category.as_str(), chart_data.len());
                chart_data.push(ChartPoint {
                    name: product.category.clone(),
                    products: 1,
                });
            }
        }

        *price_range_counts
            .entry(price_bucket_label(product.price, thresholds.price_bucket_width))
            .or_insert(0) += 1;
    }

    let has_data = !view.is_empty();
    let average_price = if has_data {
        price_sum / view.len() as f64
    } else {
        0.0
    };

    Statistics {
        average_price,
        has_data,
        low_stock_count,
        category_counts: chart_data
            .iter()
            .map(|point| (point.name.clone(), point.products))
            .collect(),
        price_range_counts,
        chart_data,
    }
}

/// `"{lo}-{hi}"` for the bucket containing `price`, e.g. 150 → "100-199"
pub fn price_bucket_label(price: f64, bucket_width: u32) -> String {
    let width = i64::from(bucket_width.max(1));
    let low = (price / width as f64).floor() as i64 * width;
    format!("{}-{}", low, low + width - 1)
}

/// Persisted form of the single cache slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedStatistics {
    pub fingerprint: String,
    #[serde(flatten)]
    pub statistics: Statistics,
}

/// Single-slot statistics cache keyed by view fingerprint
pub struct StatsCache {
    slot: Option<CachedStatistics>,
    db: Option<Arc<Database>>,
    thresholds: StatsThresholds,
}

impl StatsCache {
    /// Cache without persistence
    pub fn in_memory(thresholds: StatsThresholds) -> Self {
        Self {
            slot: None,
            db: None,
            thresholds,
        }
    }

    /// Cache backed by `db`; the persisted entry (if readable) seeds the slot.
    pub fn persistent(db: Arc<Database>, thresholds: StatsThresholds) -> Self {
        let slot = Self::load_entry(&db);
        Self {
            slot,
            db: Some(db),
            thresholds,
        }
    }

    fn load_entry(db: &Database) -> Option<CachedStatistics> {
        let entry = match db.get_entry(STATS_CACHE_KEY) {
            Ok(Some(entry)) => entry,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read cached statistics");
                return None;
            }
        };

        match serde_json::from_str::<CachedStatistics>(&entry.value) {
            Ok(cached) => {
                tracing::debug!(
                    fingerprint = %cached.fingerprint,
                    updated_at = ?entry.updated_at,
                    "loaded cached statistics"
                );
                Some(cached)
            }
            Err(e) => {
                tracing::warn!(error = %e, "ignoring malformed cached statistics");
                None
            }
        }
    }

    /// Cache key for `view` under the current thresholds
    pub fn fingerprint(&self, view: &[Product]) -> String {
        format!(
            "{}:{}:{}",
            view_fingerprint(view),
            self.thresholds.low_stock_threshold,
            self.thresholds.price_bucket_width
        )
    }

    /// The slot's statistics if they were stored under `fingerprint`
    fn cached(&self, fingerprint: &str) -> Option<&Statistics> {
        self.slot
            .as_ref()
            .filter(|cached| cached.fingerprint == fingerprint)
            .map(|cached| &cached.statistics)
    }

    /// Statistics for `view`, recomputed and stored on a miss
    pub fn statistics(&mut self, view: &[Product]) -> Statistics {
        let fingerprint = self.fingerprint(view);
        if let Some(statistics) = self.cached(&fingerprint) {
            tracing::info!(fingerprint = %fingerprint, "using cached statistics");
            return statistics.clone();
        }

        let statistics = aggregate_with(view, &self.thresholds);
        let cached = CachedStatistics {
            fingerprint,
            statistics: statistics.clone(),
        };
        self.persist(&cached);
        self.slot = Some(cached);
        statistics
    }

    fn persist(&self, cached: &CachedStatistics) {
        let Some(db) = &self.db else {
            return;
        };

        let json = match serde_json::to_string(cached) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!(error = %e, "failed to serialize statistics");
                return;
            }
        };

        if let Err(e) = db.put_entry(STATS_CACHE_KEY, &json, Utc::now()) {
            tracing::warn!(error = %e, "failed to persist statistics");
        }
    }
}
