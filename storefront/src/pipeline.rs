//! Derived view: filter, then sort, with fingerprints of both stages.
//!
//! The filtered (pre-sort) view feeds statistics; the ordered view feeds
//! pagination. Neither is ever mutated after construction.

use crate::interface::{Product, QueryParams, SortOrder};
use crate::models::view_fingerprint;
use crate::search::{evaluate, sort_in_place};

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedView {
    filtered: Vec<Product>,
    ordered: Vec<Product>,
    ordered_fingerprint: String,
}

impl DerivedView {
    pub fn compute(catalog: &[Product], params: &QueryParams, order: SortOrder) -> Self {
        #[cfg(feature = "perf-log")]
        let t0 = std::time::Instant::now();

        let filtered = evaluate(catalog, params);
        let mut ordered = filtered.clone();
        sort_in_place(&mut ordered, order);
        let ordered_fingerprint = view_fingerprint(&ordered);

        #[cfg(feature = "perf-log")]
        eprintln!(
            "[perf] derive={:.2}ms catalog={} filtered={}",
            t0.elapsed().as_secs_f64() * 1000.0,
            catalog.len(),
            filtered.len(),
        );

        Self {
            filtered,
            ordered,
            ordered_fingerprint,
        }
    }

    /// Matching records in catalog order
    pub fn filtered(&self) -> &[Product] {
        &self.filtered
    }

    /// Matching records in display order
    pub fn ordered(&self) -> &[Product] {
        &self.ordered
    }

    /// Identity of the ordered view; changes iff its records or their order change
    pub fn ordered_fingerprint(&self) -> &str {
        &self.ordered_fingerprint
    }

    pub fn len(&self) -> usize {
        self.filtered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}
