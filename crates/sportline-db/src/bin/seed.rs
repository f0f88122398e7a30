//! # Inventory Seeder
//!
//! Stocks every (product, branch) pair of a development database.
//!
//! ## Usage
//! ```bash
//! # 3 branches x 40 products (default)
//! cargo run -p sportline-db --bin seed
//!
//! # Custom shape and database path
//! cargo run -p sportline-db --bin seed -- --branches 5 --products 200 --db ./data/sportline.db
//! ```
//!
//! Each record gets a deterministic quantity between 0 and 39, a minimum of 5
//! and a maximum of 60, so every stock level (LOW, MEDIUM, HIGH) shows up.
//! Re-running overwrites the same pairs.

use anyhow::Context;
use sportline_db::{Database, DbConfig};
use std::env;
use tracing::info;
use tracing_subscriber::EnvFilter;

const MIN_STOCK: i64 = 5;
const MAX_STOCK: i64 = 60;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = env::args().collect();

    let mut branches: i64 = 3;
    let mut products: i64 = 40;
    let mut db_path = String::from("./sportline_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--branches" | "-b" if i + 1 < args.len() => {
                branches = args[i + 1].parse().context("--branches must be a number")?;
                i += 1;
            }
            "--products" | "-p" if i + 1 < args.len() => {
                products = args[i + 1].parse().context("--products must be a number")?;
                i += 1;
            }
            "--db" | "-d" if i + 1 < args.len() => {
                db_path = args[i + 1].clone();
                i += 1;
            }
            "--help" | "-h" => {
                println!("Sportline Inventory Seeder");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -b, --branches <N>  Number of branches (default: 3)");
                println!("  -p, --products <N>  Products per branch (default: 40)");
                println!("  -d, --db <PATH>     Database file path (default: ./sportline_dev.db)");
                println!("  -h, --help          Show this help message");
                return Ok(());
            }
            other => anyhow::bail!("unknown argument: {other}"),
        }
        i += 1;
    }

    let db = Database::new(DbConfig::new(&db_path))
        .await
        .with_context(|| format!("opening {db_path}"))?;

    info!(db_path = %db_path, branches, products, "Seeding inventory");

    let ledger = db.inventory();
    let start = std::time::Instant::now();
    let mut written = 0u64;

    for branch_id in 1..=branches {
        for product_id in 1..=products {
            let available = stock_for(product_id, branch_id);
            ledger
                .upsert_record(product_id, branch_id, available, MIN_STOCK, MAX_STOCK)
                .await
                .with_context(|| format!("stocking product {product_id} at branch {branch_id}"))?;
            written += 1;
        }
    }

    info!(
        written,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "Seed complete"
    );

    db.close().await;
    Ok(())
}

/// Deterministic quantity in `0..40`.
fn stock_for(product_id: i64, branch_id: i64) -> i64 {
    (product_id * 7 + branch_id * 13) % 40
}
