//! Query evaluation and price ordering
//!
//! Filtering is a case-insensitive substring match on the product name combined
//! with an exact category match. Both passes are order-preserving: filtering keeps
//! catalog order and sorting is stable, so equal prices stay in filter order.
//! Views at or above `PARALLEL_THRESHOLD` records use rayon; indexed parallel
//! iterators and `par_sort_by` keep the same ordering guarantees.

use std::cmp::Ordering;

use rayon::prelude::*;

use crate::interface::{Product, QueryParams, SortOrder};

/// Views this large are filtered and sorted in parallel
pub(crate) const PARALLEL_THRESHOLD: usize = 10_000;

/// Lowercased form of the query, computed once per evaluation
struct CompiledQuery<'a> {
    term_lower: String,
    category: &'a str,
}

impl<'a> CompiledQuery<'a> {
    fn new(params: &'a QueryParams) -> Self {
        Self {
            term_lower: params.search_term.to_lowercase(),
            category: params.category.as_str(),
        }
    }

    fn matches(&self, product: &Product) -> bool {
        let matches_category = self.category.is_empty() || product.category == self.category;
        matches_category
            && (self.term_lower.is_empty()
                || product.name.to_lowercase().contains(&self.term_lower))
    }
}

/// Records passing the search and category predicates, in catalog order.
pub fn evaluate(catalog: &[Product], params: &QueryParams) -> Vec<Product> {
    let query = CompiledQuery::new(params);

    if catalog.len() >= PARALLEL_THRESHOLD {
        // Vec's par_iter is indexed, so filter + collect keeps input order
        return catalog
            .par_iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect();
    }

    catalog.iter().filter(|p| query.matches(p)).cloned().collect()
}

/// A new vector ordered by price; the input is left untouched.
/// `SortOrder::None` returns the input order.
pub fn sort(view: &[Product], order: SortOrder) -> Vec<Product> {
    let mut sorted = view.to_vec();
    sort_in_place(&mut sorted, order);
    sorted
}

/// Stable price sort of an owned view
pub(crate) fn sort_in_place(view: &mut [Product], order: SortOrder) {
    let compare: fn(&Product, &Product) -> Ordering = match order {
        SortOrder::None => return,
        SortOrder::Ascending => |a: &Product, b: &Product| a.price.total_cmp(&b.price),
        SortOrder::Descending => |a: &Product, b: &Product| b.price.total_cmp(&a.price),
    };

    if view.len() >= PARALLEL_THRESHOLD {
        view.par_sort_by(compare);
    } else {
        view.sort_by(compare);
    }
}
