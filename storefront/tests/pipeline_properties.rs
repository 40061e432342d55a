//! Property-style checks of the derived-state pipeline over seeded catalogs.
//!
//! Each property is exercised against several catalog sizes, including one
//! above the parallel threshold, so both the sequential and rayon paths run.

use storefront::pagination::{paginate, total_pages};
use storefront::search::{evaluate, sort};
use storefront::stats::{aggregate, StatsCache, StatsThresholds};
use storefront::{Catalog, Product, QueryParams, SortOrder, CATEGORIES};

const SIZES: [u32; 5] = [0, 1, 37, 1000, 12_500];

fn catalogs() -> impl Iterator<Item = Catalog> {
    SIZES
        .into_iter()
        .enumerate()
        .map(|(i, size)| Catalog::seeded(size, 1000 + i as u64))
}

fn queries() -> Vec<QueryParams> {
    let mut queries = vec![
        QueryParams::new("", ""),
        QueryParams::new("1", ""),
        QueryParams::new("PRODUCT 9", ""),
        QueryParams::new("no such thing", ""),
    ];
    for category in CATEGORIES {
        queries.push(QueryParams::new("", *category));
        queries.push(QueryParams::new("2", *category));
    }
    queries
}

fn ids(products: &[Product]) -> Vec<i64> {
    products.iter().map(|p| p.id).collect()
}

// ============================================================
// Query Evaluator
// ============================================================

#[test]
fn test_empty_query_is_identity() {
    for catalog in catalogs() {
        let result = evaluate(catalog.products(), &QueryParams::default());
        assert_eq!(result.as_slice(), catalog.products());
    }
}

#[test]
fn test_evaluate_is_idempotent_and_order_preserving() {
    for catalog in catalogs() {
        for params in queries() {
            let once = evaluate(catalog.products(), &params);
            let twice = evaluate(&once, &params);
            assert_eq!(once, twice, "query {params:?}");

            let positions: Vec<usize> = once
                .iter()
                .map(|p| (p.id - 1) as usize)
                .collect();
            assert!(positions.windows(2).all(|w| w[0] < w[1]));
        }
    }
}

#[test]
fn test_every_result_satisfies_both_predicates() {
    for catalog in catalogs() {
        for params in queries() {
            let needle = params.search_term.to_lowercase();
            let result = evaluate(catalog.products(), &params);
            for product in &result {
                assert!(product.name.to_lowercase().contains(&needle));
                assert!(params.category.is_empty() || product.category == params.category);
            }
            let expected = catalog
                .products()
                .iter()
                .filter(|p| p.name.to_lowercase().contains(&needle))
                .filter(|p| params.category.is_empty() || p.category == params.category)
                .count();
            assert_eq!(result.len(), expected);
        }
    }
}

// ============================================================
// Sorter
// ============================================================

#[test]
fn test_sort_is_idempotent() {
    for catalog in catalogs() {
        for order in [SortOrder::None, SortOrder::Ascending, SortOrder::Descending] {
            let once = sort(catalog.products(), order);
            assert_eq!(sort(&once, order), once);
        }
    }
}

#[test]
fn test_sort_is_a_stable_permutation() {
    for catalog in catalogs() {
        let asc = sort(catalog.products(), SortOrder::Ascending);
        let desc = sort(catalog.products(), SortOrder::Descending);

        let mut sorted_ids = ids(&asc);
        sorted_ids.sort_unstable();
        assert_eq!(sorted_ids, ids(catalog.products()));

        for pair in asc.windows(2) {
            assert!(pair[0].price <= pair[1].price);
            if pair[0].price == pair[1].price {
                assert!(pair[0].id < pair[1].id, "ties keep catalog order");
            }
        }
        for pair in desc.windows(2) {
            assert!(pair[0].price >= pair[1].price);
            if pair[0].price == pair[1].price {
                assert!(pair[0].id < pair[1].id, "ties keep catalog order");
            }
        }
    }
}

// ============================================================
// Paginator
// ============================================================

#[test]
fn test_pages_partition_the_view() {
    for catalog in catalogs() {
        let view = catalog.products();
        for per_page in [1, 7, 50, 1000] {
            let total = total_pages(view.len(), per_page);
            let expected_total = std::cmp::max(1, view.len().div_ceil(per_page as usize)) as u32;
            assert_eq!(total, expected_total);

            let mut seen = Vec::with_capacity(view.len());
            for page_number in 1..=total {
                let page = paginate(view, per_page, page_number);
                assert!(page.items.len() <= per_page as usize);
                assert_eq!(page.total_pages, total);
                assert_eq!(page.total_items, view.len() as u64);
                seen.extend(page.items);
            }
            assert_eq!(seen.as_slice(), view);
        }
    }
}

#[test]
fn test_page_past_end_is_empty() {
    let catalog = Catalog::seeded(30, 4);
    let page = paginate(catalog.products(), 10, 4);
    assert!(page.items.is_empty());
    assert_eq!(page.total_pages, 3);
}

// ============================================================
// Statistics
// ============================================================

#[test]
fn test_aggregate_counts_are_consistent() {
    for catalog in catalogs() {
        for params in queries() {
            let view = evaluate(catalog.products(), &params);
            let stats = aggregate(&view);

            let total: u64 = stats.category_counts.values().sum();
            assert_eq!(total, view.len() as u64);
            let bucketed: u64 = stats.price_range_counts.values().sum();
            assert_eq!(bucketed, view.len() as u64);
            let charted: u64 = stats.chart_data.iter().map(|c| c.products).sum();
            assert_eq!(charted, view.len() as u64);

            let low = view.iter().filter(|p| p.stock < 10).count() as u64;
            assert_eq!(stats.low_stock_count, low);

            assert_eq!(stats.has_data, !view.is_empty());
            assert!(stats.average_price.is_finite());
        }
    }
}

#[test]
fn test_statistics_ignore_order() {
    let catalog = Catalog::seeded(500, 77);
    let asc = sort(catalog.products(), SortOrder::Ascending);
    let a = aggregate(catalog.products());
    let b = aggregate(&asc);
    assert_eq!(a.category_counts, b.category_counts);
    assert_eq!(a.price_range_counts, b.price_range_counts);
    assert_eq!(a.low_stock_count, b.low_stock_count);
}

#[test]
fn test_cache_never_serves_stale_view() {
    for catalog in catalogs() {
        let mut cache = StatsCache::in_memory(StatsThresholds::default());
        let mut previous: Option<Vec<Product>> = None;

        for params in queries() {
            let view = evaluate(catalog.products(), &params);
            let served = cache.statistics(&view);
            let fresh = aggregate(&view);

            assert_eq!(served.category_counts, fresh.category_counts);
            assert_eq!(served.price_range_counts, fresh.price_range_counts);
            assert_eq!(served.low_stock_count, fresh.low_stock_count);
            assert_eq!(served.chart_data, fresh.chart_data);
            assert_eq!(served.has_data, fresh.has_data);

            if let Some(prev) = &previous {
                if prev != &view {
                    assert_ne!(cache.fingerprint(prev), cache.fingerprint(&view));
                }
            }
            previous = Some(view);
        }
    }
}
