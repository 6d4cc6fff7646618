use pepcat_core::StockItem;
use pepcat_storage::{
    CatalogStore, StorageError, batch_exists, insert_batch, insert_inventory, variant_id_by_sku,
};
use rusqlite::Connection;
use time::{Duration, OffsetDateTime};
use tracing::{info, warn};

use crate::error::LoadError;

/// Generated batches expire one year after manufacture.
const SHELF_LIFE_DAYS: i64 = 365;

/// Row counts from one seeding run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub variants_stocked: u64,
    pub batches_created: u64,
    pub inventory_created: u64,
    pub skipped_skus: u64,
}

/// Stocks an imported catalog with generated dev batches.
///
/// Batch identifiers are probed per batch (`DEV-<sku>-001`, `-002`, ...)
/// against what the store already holds, so re-running the same plan
/// appends fresh batches instead of colliding with earlier runs. The
/// whole run commits once at the end; a failed batch or inventory insert
/// is logged and skipped without rolling back the rest.
pub struct InventorySeeder<'a> {
    store: &'a mut CatalogStore,
}

impl<'a> InventorySeeder<'a> {
    pub fn new(store: &'a mut CatalogStore) -> Self {
        Self { store }
    }

    pub fn seed(&mut self, plan: &[StockItem]) -> Result<SeedReport, LoadError> {
        let tx = self.store.transaction()?;
        let mut report = SeedReport::default();

        info!("stocking {} skus", plan.len());
        for item in plan {
            let Some(variant_id) = variant_id_by_sku(&tx, &item.sku)? else {
                warn!("variant with sku '{}' not found, skipping", item.sku);
                report.skipped_skus += 1;
                continue;
            };
            report.variants_stocked += 1;

            for _ in 0..item.batch_count {
                let batch_id = next_batch_id(&tx, variant_id, &item.sku)?;

                let manufactured = OffsetDateTime::now_utc().date();
                let expiration = manufactured + Duration::days(SHELF_LIFE_DAYS);
                let batch_pk =
                    match insert_batch(&tx, variant_id, &batch_id, manufactured, expiration) {
                        Ok(pk) => pk,
                        Err(e) if e.is_constraint_violation() => {
                            warn!("failed to insert batch '{}' for '{}': {}", batch_id, item.sku, e);
                            continue;
                        }
                        Err(e) => return Err(e.into()),
                    };
                report.batches_created += 1;
                info!("created batch '{}' for sku '{}'", batch_id, item.sku);

                let in_stock = item.quantity_per_batch > 0;
                match insert_inventory(&tx, batch_pk, item.quantity_per_batch, in_stock) {
                    Ok(_) => report.inventory_created += 1,
                    // The already-created batch row stays behind without
                    // an inventory record.
                    Err(e) if e.is_constraint_violation() => {
                        warn!("failed to insert inventory for batch '{}': {}", batch_id, e);
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }

        tx.commit().map_err(StorageError::from)?;
        Ok(report)
    }
}

/// Finds the first unused `DEV-<sku>-<NNN>` identifier for the variant.
///
/// The counter strictly increases and the store holds finitely many
/// batches, so the probe always terminates.
fn next_batch_id(conn: &Connection, variant_id: i64, sku: &str) -> Result<String, StorageError> {
    let mut seq: u32 = 1;
    loop {
        let candidate = format!("DEV-{sku}-{seq:03}");
        if !batch_exists(conn, variant_id, &candidate)? {
            return Ok(candidate);
        }
        seq += 1;
    }
}
