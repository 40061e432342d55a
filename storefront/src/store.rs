//! DashboardStore - Main API for the presentation layer
//!
//! Owns the immutable catalog, the statistics cache and all UI-session state
//! (query, sort order, page, cart, chart visibility) behind a single lock.
//! Every query transition recomputes the derived view exactly once while the
//! lock is held, so readers never observe a half-applied batch of changes.
//! When the ordered view changes identity the page number resets to 1.

use crate::cart::Cart;
use crate::config::DashboardConfig;
use crate::database::Database;
use crate::interface::{
    DashboardApi, DashboardError, DashboardSnapshot, Page, Product, QueryParams, QueryUpdate,
    SortOrder, Statistics,
};
use crate::models::{is_known_category, Catalog};
use crate::pagination::{self, Pager};
use crate::pipeline::DerivedView;
use crate::stats::{StatsCache, StatsThresholds};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// UI-session state, mutated only under the store's lock
struct SessionState {
    query: QueryParams,
    sort_order: SortOrder,
    view: DerivedView,
    pager: Pager,
    cart: Cart,
    chart_visible: bool,
    stats: StatsCache,
}

impl SessionState {
    fn total_pages(&self) -> u32 {
        pagination::total_pages(self.view.len(), self.pager.items_per_page())
    }

    fn current_page(&self) -> Page {
        self.pager.page(self.view.ordered())
    }

    fn statistics(&mut self) -> Statistics {
        self.stats.statistics(self.view.filtered())
    }
}

/// Thread-safe dashboard session
///
/// Concurrency Model:
/// - One `parking_lot::Mutex` guards all session state; operations are short and synchronous
/// - The catalog is shared read-only and never locked
/// - The statistics cache database uses an r2d2 connection pool
#[derive(uniffi::Object)]
pub struct DashboardStore {
    catalog: Catalog,
    state: Mutex<SessionState>,
}

// Internal implementation (not exported via FFI)
impl DashboardStore {
    /// Build a store over `catalog`. With a `cache_path` the statistics
    /// snapshot is read from and written to that SQLite file.
    pub fn from_catalog(
        catalog: Catalog,
        config: DashboardConfig,
        cache_path: Option<&Path>,
    ) -> Result<Self, DashboardError> {
        config.validate()?;

        let thresholds = StatsThresholds::from(&config);
        let stats = match cache_path {
            Some(path) => {
                let db = Database::open(path).map_err(DashboardError::from)?;
                StatsCache::persistent(Arc::new(db), thresholds)
            }
            None => StatsCache::in_memory(thresholds),
        };

        let query = QueryParams::default();
        let sort_order = SortOrder::None;
        let view = DerivedView::compute(catalog.products(), &query, sort_order);

        tracing::debug!(
            catalog = catalog.len(),
            persistent = cache_path.is_some(),
            "dashboard mounted"
        );

        Ok(Self {
            state: Mutex::new(SessionState {
                query,
                sort_order,
                view,
                pager: Pager::new(config.items_per_page),
                cart: Cart::new(),
                chart_visible: false,
                stats,
            }),
            catalog,
        })
    }

    /// Store without a persisted statistics cache
    pub fn in_memory(catalog: Catalog, config: DashboardConfig) -> Result<Self, DashboardError> {
        Self::from_catalog(catalog, config, None)
    }

    fn validate_category(category: &str) -> Result<(), DashboardError> {
        if category.is_empty() || is_known_category(category) {
            Ok(())
        } else {
            Err(DashboardError::InvalidInput(format!(
                "unknown category: {category:?}"
            )))
        }
    }

    /// Apply `change` to the query and sort order, then recompute the derived view.
    /// Resets to page 1 if the ordered view is no longer the one being paged.
    fn transition<F>(&self, change: F) -> u64
    where
        F: FnOnce(&mut QueryParams, &mut SortOrder),
    {
        let mut state = self.state.lock();
        let state = &mut *state;

        change(&mut state.query, &mut state.sort_order);
        let view = DerivedView::compute(self.catalog.products(), &state.query, state.sort_order);

        if view.ordered_fingerprint() != state.view.ordered_fingerprint() {
            if state.pager.page_number() != 1 {
                tracing::debug!(
                    from = state.pager.page_number(),
                    "view changed; resetting to first page"
                );
            }
            state.pager.reset();
        }

        tracing::debug!(
            search_term = %state.query.search_term,
            category = %state.query.category,
            sort_order = ?state.sort_order,
            filtered = view.len(),
            "derived view recomputed"
        );

        state.view = view;
        state.view.len() as u64
    }
}

// FFI-exported constructors (must be in standalone impl block)
#[uniffi::export]
impl DashboardStore {
    /// Create a store with a synthetic catalog and the statistics cache at the given path
    #[uniffi::constructor]
    pub fn new(cache_path: String) -> Result<Self, DashboardError> {
        Self::with_config(DashboardConfig::default(), Some(cache_path))
    }

    /// Create a store with a synthetic catalog sized by `config`
    #[uniffi::constructor]
    pub fn with_config(
        config: DashboardConfig,
        cache_path: Option<String>,
    ) -> Result<Self, DashboardError> {
        let catalog = Catalog::synthetic(config.catalog_size);
        Self::from_catalog(catalog, config, cache_path.as_deref().map(Path::new))
    }

    /// Create a store over an externally supplied record list
    #[uniffi::constructor]
    pub fn with_products(
        products: Vec<Product>,
        config: DashboardConfig,
        cache_path: Option<String>,
    ) -> Result<Self, DashboardError> {
        let catalog = Catalog::from_products(products)?;
        Self::from_catalog(catalog, config, cache_path.as_deref().map(Path::new))
    }
}

// Accessors not on the trait
#[uniffi::export]
impl DashboardStore {
    pub fn query(&self) -> QueryParams {
        self.state.lock().query.clone()
    }

    pub fn sort_order(&self) -> SortOrder {
        self.state.lock().sort_order
    }

    /// All records matching the current query, in display order
    pub fn filtered_products(&self) -> Vec<Product> {
        self.state.lock().view.ordered().to_vec()
    }

    /// Cart contents in insertion order
    pub fn cart_items(&self) -> Vec<i64> {
        self.state.lock().cart.items().to_vec()
    }

    pub fn chart_visible(&self) -> bool {
        self.state.lock().chart_visible
    }

    pub fn catalog_size(&self) -> u64 {
        self.catalog.len() as u64
    }
}

#[uniffi::export]
impl DashboardApi for DashboardStore {
    // ─────────────────────────────────────────────────────────────────────────────
    // Query Operations
    // ─────────────────────────────────────────────────────────────────────────────

    fn set_search_term(&self, term: String) -> u64 {
        self.transition(|query, _| query.search_term = term)
    }

    fn set_category(&self, category: String) -> Result<u64, DashboardError> {
        Self::validate_category(&category)?;
        Ok(self.transition(|query, _| query.category = category))
    }

    fn set_sort_order(&self, order: SortOrder) {
        self.transition(|_, sort_order| *sort_order = order);
    }

    /// Validation happens before any state changes, so a rejected batch leaves
    /// the session untouched.
    fn apply(&self, update: QueryUpdate) -> Result<u64, DashboardError> {
        if let Some(category) = &update.category {
            Self::validate_category(category)?;
        }

        Ok(self.transition(|query, sort_order| {
            if let Some(term) = update.search_term {
                query.search_term = term;
            }
            if let Some(category) = update.category {
                query.category = category;
            }
            if let Some(order) = update.sort_order {
                *sort_order = order;
            }
        }))
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Read Operations
    // ─────────────────────────────────────────────────────────────────────────────

    fn current_page(&self) -> Page {
        self.state.lock().current_page()
    }

    fn filtered_count(&self) -> u64 {
        self.state.lock().view.len() as u64
    }

    fn statistics(&self) -> Statistics {
        self.state.lock().statistics()
    }

    fn snapshot(&self) -> DashboardSnapshot {
        let mut state = self.state.lock();
        DashboardSnapshot {
            query: state.query.clone(),
            sort_order: state.sort_order,
            page: state.current_page(),
            statistics: state.statistics(),
            filtered_count: state.view.len() as u64,
            cart_size: state.cart.len() as u64,
            chart_visible: state.chart_visible,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────────

    fn next_page(&self) -> u32 {
        let mut state = self.state.lock();
        let total = state.total_pages();
        state.pager.next(total)
    }

    fn previous_page(&self) -> u32 {
        self.state.lock().pager.previous()
    }

    fn go_to_page(&self, page_number: u32) -> u32 {
        let mut state = self.state.lock();
        let total = state.total_pages();
        if page_number == 0 || page_number > total {
            tracing::debug!(requested = page_number, total, "clamping page request");
        }
        state.pager.go_to(page_number, total)
    }

    fn page_numbers(&self) -> Vec<u32> {
        pagination::page_numbers(self.state.lock().total_pages())
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Cart & Chart
    // ─────────────────────────────────────────────────────────────────────────────

    fn add_to_cart(&self, product_id: i64) -> u64 {
        self.state.lock().cart.add(product_id) as u64
    }

    fn cart_size(&self) -> u64 {
        self.state.lock().cart.len() as u64
    }

    fn toggle_chart(&self) -> bool {
        let mut state = self.state.lock();
        state.chart_visible = !state.chart_visible;
        state.chart_visible
    }
}
