//! Command-line driver for the storefront dashboard pipeline
//!
//! Mounts a catalog (synthetic, demo or a JSON file), applies one query,
//! navigates to a page, optionally fills the cart, and prints the resulting
//! dashboard snapshot.
//!
//! Run with: cargo run -p storefront-cli -- --search widget --sort asc

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::{Path, PathBuf};
use storefront::{
    Catalog, DashboardApi, DashboardConfig, DashboardSnapshot, DashboardStore, Product,
    QueryUpdate, SortOrder,
};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of synthetic products (overrides the config's catalog size)
    #[arg(short, long)]
    count: Option<u32>,

    /// Seed for a reproducible synthetic catalog
    #[arg(long)]
    seed: Option<u64>,

    /// Use the bundled demo catalog instead of synthetic data
    #[arg(long, conflicts_with_all = ["count", "seed", "catalog"])]
    demo: bool,

    /// Load products from a JSON array file
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Case-insensitive substring matched against product names
    #[arg(short, long, default_value = "")]
    search: String,

    /// Exact category, empty for all
    #[arg(short = 'k', long, default_value = "")]
    category: String,

    /// Price order: "", "asc" or "desc"
    #[arg(long, default_value = "")]
    sort: String,

    /// 1-based page to show (clamped to the available range)
    #[arg(short, long, default_value_t = 1)]
    page: u32,

    /// Items per page (overrides the config)
    #[arg(long)]
    per_page: Option<u32>,

    /// SQLite file holding the persisted statistics snapshot
    #[arg(long)]
    cache_path: Option<PathBuf>,

    /// JSON config file (falls back to STOREFRONT_CONFIG)
    #[arg(long)]
    config: Option<String>,

    /// Product id to add to the cart; may be repeated
    #[arg(long = "add-to-cart")]
    add_to_cart: Vec<i64>,

    /// Print the snapshot as JSON
    #[arg(long)]
    json: bool,
}

fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("warn"))?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    Ok(())
}

fn demo_products() -> Vec<Product> {
    demo_data::DEMO_PRODUCTS
        .iter()
        .map(|p| Product::new(p.id, p.name.as_str(), p.price, p.category.as_str(), p.stock))
        .collect()
}

fn load_catalog_file(path: &Path) -> Result<Vec<Product>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read catalog {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse catalog {}", path.display()))
}

fn build_catalog(args: &Args, config: &DashboardConfig) -> Result<Catalog> {
    if args.demo {
        return Catalog::from_products(demo_products()).context("Demo catalog rejected");
    }
    if let Some(path) = &args.catalog {
        let products = load_catalog_file(path)?;
        return Catalog::from_products(products)
            .with_context(|| format!("Catalog {} rejected", path.display()));
    }
    let size = args.count.unwrap_or(config.catalog_size);
    Ok(match args.seed {
        Some(seed) => Catalog::seeded(size, seed),
        None => Catalog::synthetic(size),
    })
}

fn print_snapshot(snapshot: &DashboardSnapshot, page_numbers: &[u32]) {
    let page = &snapshot.page;
    let stats = &snapshot.statistics;

    println!(
        "query: search={:?} category={:?} sort={:?}",
        snapshot.query.search_term,
        snapshot.query.category,
        snapshot.sort_order.option_value()
    );
    println!(
        "matches: {}  page {}/{}  cart: {}",
        snapshot.filtered_count, page.page_number, page.total_pages, snapshot.cart_size
    );
    println!();

    for product in &page.items {
        println!(
            "  #{:<6} {:<40} {:>9.2}  {:<12} stock {}",
            product.id, product.name, product.price, product.category, product.stock
        );
    }
    if page.items.is_empty() {
        println!("  (no products)");
    }

    println!();
    if stats.has_data {
        println!("average price: {:.2}", stats.average_price);
    } else {
        println!("average price: -");
    }
    println!("low stock: {}", stats.low_stock_count);
    for point in &stats.chart_data {
        println!("  {:<12} {}", point.name, point.products);
    }

    let mut ranges: Vec<_> = stats.price_range_counts.iter().collect();
    ranges.sort_by_key(|(label, _)| {
        label
            .split('-')
            .next()
            .and_then(|lo| lo.parse::<u64>().ok())
            .unwrap_or(u64::MAX)
    });
    for (label, count) in ranges {
        println!("  {:<12} {}", label, count);
    }

    let pages: Vec<String> = page_numbers.iter().map(u32::to_string).collect();
    println!();
    println!("pages: {}", pages.join(" "));
}

fn main() -> Result<()> {
    init_logging()?;
    let args = Args::parse();

    let mut config =
        DashboardConfig::from_sources(args.config.as_deref()).context("Failed to load config")?;
    if let Some(per_page) = args.per_page {
        config.items_per_page = per_page;
    }

    let sort_order = SortOrder::from_option_value(&args.sort).context("Invalid --sort")?;

    let catalog = build_catalog(&args, &config)?;
    tracing::info!(products = catalog.len(), "catalog ready");

    let store = DashboardStore::from_catalog(catalog, config, args.cache_path.as_deref())
        .context("Failed to open dashboard")?;

    store
        .apply(QueryUpdate {
            search_term: Some(args.search.clone()),
            category: Some(args.category.clone()),
            sort_order: Some(sort_order),
        })
        .context("Query rejected")?;

    let page_number = store.go_to_page(args.page);
    if page_number != args.page {
        tracing::warn!(requested = args.page, shown = page_number, "page out of range");
    }

    for id in &args.add_to_cart {
        store.add_to_cart(*id);
    }

    let snapshot = store.snapshot();
    if args.json {
        let out = serde_json::to_string_pretty(&snapshot).context("Failed to encode snapshot")?;
        println!("{out}");
    } else {
        print_snapshot(&snapshot, &store.page_numbers());
    }

    Ok(())
}
