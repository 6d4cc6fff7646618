//! Catalog database tooling.
//!
//! `pepcat import` builds a fresh catalog database from a product
//! document; `pepcat seed` stocks an existing database with generated
//! development batches and can be re-run safely.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use pepcat_core::{CatalogDocument, StockItem};
use pepcat_loader::{CatalogImporter, InventorySeeder};
use pepcat_storage::{CatalogStore, table_count};

#[derive(Parser)]
#[command(name = "pepcat")]
#[command(version, about = "Peptide catalog database loader and dev inventory seeder")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the catalog database from a product document.
    Import {
        /// Path of the database to create (an existing file is replaced).
        #[arg(long, default_value = "data/catalog.db")]
        db: PathBuf,
        /// Product document to import.
        #[arg(long, default_value = "data/products.yaml")]
        products: PathBuf,
    },
    /// Stock an existing catalog database with development batches.
    Seed {
        /// Path of the database to stock; must already be imported.
        #[arg(long, default_value = "data/catalog.db")]
        db: PathBuf,
    },
}

/// SKUs to stock for development: (sku, quantity per batch, batches).
fn dev_stock_plan() -> Vec<StockItem> {
    vec![
        StockItem::new("SEMAGLUTIDE-2MG", 10, 1),
        StockItem::new("SEMAGLUTIDE-5MG", 5, 1),
        StockItem::new("RETATRUTIDE-5MG", 8, 1),
        StockItem::new("TIRZEPATIDE-10MG", 12, 1),
        StockItem::new("BPC157-5MG", 15, 2),
        StockItem::new("TB500-10MG", 7, 1),
        StockItem::new("CJC1295-2MG", 20, 1),
        StockItem::new("IPAMORELIN-5MG", 25, 1),
        StockItem::new("SELANK-10MG", 10, 1),
        StockItem::new("EPITALON-20MG", 5, 1),
    ]
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match Cli::parse().command {
        Commands::Import { db, products } => import(db, products),
        Commands::Seed { db } => seed(db),
    }
}

fn import(db: PathBuf, products: PathBuf) -> anyhow::Result<()> {
    if !products.exists() {
        bail!("product document {} not found", products.display());
    }
    if db.exists() {
        info!("removing existing database {}", db.display());
        fs::remove_file(&db)
            .with_context(|| format!("failed to remove {}", db.display()))?;
    }
    if let Some(parent) = db.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    info!("loading product data from {}", products.display());
    let doc = CatalogDocument::from_path(&products)?;

    let mut store = CatalogStore::create(&db)?;
    let report = CatalogImporter::new(&mut store).import(&doc)?;
    info!(
        "imported {} categories, {} substances, {} category links, {} variants",
        report.categories, report.substances, report.category_links, report.variants
    );

    // Verify against the store itself, not just the report.
    info!(
        "database now holds {} substances, {} variants, {} categories",
        table_count(store.conn(), "substances")?,
        table_count(store.conn(), "variants")?,
        table_count(store.conn(), "categories")?,
    );
    info!("database build complete: {}", db.display());
    Ok(())
}

fn seed(db: PathBuf) -> anyhow::Result<()> {
    if !db.exists() {
        bail!(
            "database {} not found, run `pepcat import` first",
            db.display()
        );
    }

    info!("connecting to database {}", db.display());
    let mut store = CatalogStore::open(&db)?;
    let report = InventorySeeder::new(&mut store).seed(&dev_stock_plan())?;

    info!(
        "stocked {} variants: {} new batches, {} inventory records ({} skus skipped)",
        report.variants_stocked, report.batches_created, report.inventory_created,
        report.skipped_skus
    );
    Ok(())
}
