//! Catalog import and development inventory seeding.
//!
//! [`CatalogImporter`] loads a product document into a fresh store in a
//! single transaction; [`InventorySeeder`] stocks an already-imported
//! store with generated dev batches and can be re-run safely.

pub mod error;
pub mod importer;
pub mod seeder;

pub use error::LoadError;
pub use importer::{CatalogImporter, ImportReport};
pub use seeder::{InventorySeeder, SeedReport};
