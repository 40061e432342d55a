//! Shared demo catalog for the CLI and tests.
//!
//! A small, hand-written catalog covering every category, several price
//! buckets, low-stock items and a few equal prices. Shipped as CSV and parsed
//! once on first access.

use once_cell::sync::Lazy;

pub const DEMO_PRODUCTS_CSV: &str = include_str!("../products.csv");

#[derive(Debug, Clone, PartialEq)]
pub struct DemoProduct {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub category: String,
    pub stock: u32,
}

pub static DEMO_PRODUCTS: Lazy<Vec<DemoProduct>> = Lazy::new(|| {
    parse_products(DEMO_PRODUCTS_CSV).expect("embedded demo catalog must parse")
});

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    /// 1-based line number and the offending column
    #[error("line {line}: invalid {column}")]
    Field { line: u64, column: &'static str },
}

/// Parse `id,name,price,category,stock` rows (with header)
pub fn parse_products(raw: &str) -> Result<Vec<DemoProduct>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(raw.as_bytes());

    let mut products = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let field = |index: usize, column: &'static str| {
            record.get(index).ok_or(ParseError::Field { line, column })
        };

        products.push(DemoProduct {
            id: field(0, "id")?
                .parse()
                .map_err(|_| ParseError::Field { line, column: "id" })?,
            name: field(1, "name")?.to_string(),
            price: field(2, "price")?
                .parse()
                .map_err(|_| ParseError::Field { line, column: "price" })?,
            category: field(3, "category")?.to_string(),
            stock: field(4, "stock")?
                .parse()
                .map_err(|_| ParseError::Field { line, column: "stock" })?,
        });
    }
    Ok(products)
}
