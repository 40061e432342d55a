//! Catalog model and synthetic catalog generation
//!
//! The catalog is built once at mount and shared read-only afterwards.
//! Downstream views hold clones of records, never references into a
//! mutable collection.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use sha2::{Digest, Sha256};

use crate::interface::{DashboardError, Product};

/// The fixed set of categories, in filter-bar order
pub const CATEGORIES: &[&str] = &["Electronics", "Clothing", "Books", "Food"];

const MIN_PRICE: u32 = 1;
const MAX_PRICE: u32 = 1000;
/// Exclusive upper bound
const MAX_STOCK: u32 = 200;

pub fn is_known_category(category: &str) -> bool {
    CATEGORIES.contains(&category)
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        price: f64,
        category: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            category: category.into(),
            stock,
        }
    }
}

/// Immutable record set for one dashboard session
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Arc<[Product]>,
}

impl Catalog {
    /// Synthetic catalog drawn from the thread RNG
    pub fn synthetic(size: u32) -> Self {
        Self::generate(size, &mut rand::thread_rng())
    }

    /// Deterministic synthetic catalog for a given seed
    pub fn seeded(size: u32, seed: u64) -> Self {
        Self::generate(size, &mut StdRng::seed_from_u64(seed))
    }

    /// Ids are 1-based and sequential; price is a whole number in [1, 1000].
    pub fn generate<R: Rng>(size: u32, rng: &mut R) -> Self {
        let products: Vec<Product> = (1..=size)
            .map(|n| {
                let id = i64::from(n);
                let category = CATEGORIES.choose(rng).copied().unwrap_or(CATEGORIES[0]);
                Product::new(
                    id,
                    format!("Product {id}"),
                    f64::from(rng.gen_range(MIN_PRICE..=MAX_PRICE)),
                    category,
                    rng.gen_range(0..MAX_STOCK),
                )
            })
            .collect();

        Self {
            products: products.into(),
        }
    }

    /// Accept an externally supplied record list.
    /// Ids must be 1-based and sequential in list order, prices finite and positive,
    /// categories from [`CATEGORIES`].
    pub fn from_products(products: Vec<Product>) -> Result<Self, DashboardError> {
        for (index, product) in products.iter().enumerate() {
            let expected = index as i64 + 1;
            if product.id != expected {
                return Err(DashboardError::InvalidInput(format!(
                    "product at position {expected} has id {}, expected {expected}",
                    product.id
                )));
            }
            if !product.price.is_finite() || product.price <= 0.0 {
                return Err(DashboardError::InvalidInput(format!(
                    "product {} has non-positive price {}",
                    product.id, product.price
                )));
            }
            if !is_known_category(&product.category) {
                return Err(DashboardError::InvalidInput(format!(
                    "product {} has unknown category {:?}",
                    product.id, product.category
                )));
            }
        }

        Ok(Self {
            products: products.into(),
        })
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

}

/// Content fingerprint of an ordered view: SHA-256 over (id, price) pairs.
/// Two views share a fingerprint iff they hold the same records in the same order.
pub fn view_fingerprint(view: &[Product]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((view.len() as u64).to_le_bytes());
    for product in view {
        hasher.update(product.id.to_le_bytes());
        hasher.update(product.price.to_bits().to_le_bytes());
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}
