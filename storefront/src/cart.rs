//! Cart accumulator: chronological product-id references
//!
//! Ids are not checked against the catalog and duplicates are kept.

/// Append `product_id` to `cart`, returning the new sequence
pub fn add_to_cart(cart: &[i64], product_id: i64) -> Vec<i64> {
    let mut next = Vec::with_capacity(cart.len() + 1);
    next.extend_from_slice(cart);
    next.push(product_id);
    next
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<i64>,
}

impl Cart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the new size
    pub fn add(&mut self, product_id: i64) -> usize {
        self.items.push(product_id);
        self.items.len()
    }

    pub fn items(&self) -> &[i64] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
