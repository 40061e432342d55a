//! Generate a large catalog file for performance testing.
//!
//! Writes a JSON array of products using the same generator the dashboard
//! uses at mount, so the file can be fed back through `--catalog`.
//!
//! Usage:
//!     cargo run --release --bin generate-perf-catalog [output_path] [count] [seed]
//!
//! Default output: ../distribution/perf_catalog.json

use storefront::models::CATEGORIES;
use storefront::Catalog;
use std::env;
use std::path::PathBuf;

/// Number of products to generate
const DEFAULT_COUNT: u32 = 100_000;

const DEFAULT_SEED: u64 = 0x5eed;

fn main() {
    let args: Vec<String> = env::args().collect();

    // Default output path
    let output_path = if args.len() > 1 {
        PathBuf::from(&args[1])
    } else {
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        PathBuf::from(manifest_dir)
            .parent()
            .unwrap()
            .join("distribution")
            .join("perf_catalog.json")
    };
    let count: u32 = args
        .get(2)
        .map(|s| s.parse().expect("count must be a positive integer"))
        .unwrap_or(DEFAULT_COUNT);
    let seed: u64 = args
        .get(3)
        .map(|s| s.parse().expect("seed must be an integer"))
        .unwrap_or(DEFAULT_SEED);

    // Create parent directory if needed
    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create output directory");
    }

    println!("Generating performance test catalog...");
    println!("Output: {}", output_path.display());

    let catalog = Catalog::seeded(count, seed);
    let json = serde_json::to_string(catalog.products()).expect("Failed to serialize catalog");
    std::fs::write(&output_path, &json).expect("Failed to write catalog");

    println!();
    println!("Catalog created: {}", output_path.display());
    println!("  Products: {}", catalog.len());
    println!("  Seed: {}", seed);
    println!("  File size: {:.2} MB", json.len() as f64 / 1024.0 / 1024.0);
    for category in CATEGORIES {
        let n = catalog
            .products()
            .iter()
            .filter(|p| p.category == *category)
            .count();
        println!("  {}: {}", category, n);
    }
}
