//! Fixed-size pagination over an ordered view
//!
//! Page numbers are 1-indexed. A view always has at least one page, so an
//! empty view yields page 1 of 1 with no items.

use crate::interface::{Page, Product};

/// `max(1, ceil(len / items_per_page))`
pub fn total_pages(len: usize, items_per_page: u32) -> u32 {
    let per_page = items_per_page.max(1) as usize;
    let pages = len.div_ceil(per_page).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Slice `view[(page-1)*k .. page*k]`, clipped to the view's length.
/// A page past the end yields no items; page 0 is read as page 1.
pub fn paginate(view: &[Product], items_per_page: u32, page_number: u32) -> Page {
    let per_page = items_per_page.max(1);
    let page_number = page_number.max(1);

    let start = ((page_number - 1) as usize)
        .saturating_mul(per_page as usize)
        .min(view.len());
    let end = start.saturating_add(per_page as usize).min(view.len());

    Page {
        page_number,
        items_per_page: per_page,
        total_pages: total_pages(view.len(), per_page),
        total_items: view.len() as u64,
        items: view[start..end].to_vec(),
    }
}

/// Page numbers for the page-button strip
pub fn page_numbers(total_pages: u32) -> Vec<u32> {
    (1..=total_pages.max(1)).collect()
}

/// Navigation state. Never moves outside `[1, total_pages]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pager {
    page_number: u32,
    items_per_page: u32,
}

impl Pager {
    pub fn new(items_per_page: u32) -> Self {
        Self {
            page_number: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn page_number(&self) -> u32 {
        self.page_number
    }

    pub fn items_per_page(&self) -> u32 {
        self.items_per_page
    }

    /// No-op on the last page
    pub fn next(&mut self, total_pages: u32) -> u32 {
        if self.page_number < total_pages {
            self.page_number += 1;
        }
        self.page_number
    }

    /// No-op on page 1
    pub fn previous(&mut self) -> u32 {
        if self.page_number > 1 {
            self.page_number -= 1;
        }
        self.page_number
    }

    /// Out-of-range requests are clamped into `[1, total_pages]`
    pub fn go_to(&mut self, page_number: u32, total_pages: u32) -> u32 {
        self.page_number = page_number.clamp(1, total_pages.max(1));
        self.page_number
    }

    pub fn reset(&mut self) {
        self.page_number = 1;
    }

    /// Current page of `view`
    pub fn page(&self, view: &[Product]) -> Page {
        paginate(view, self.items_per_page, self.page_number)
    }
}
