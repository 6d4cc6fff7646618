use pepcat_core::{CatalogDocument, DEFAULT_PRIORITY, DEFAULT_PRODUCT_TYPE, SubstanceEntry};
use pepcat_storage::{
    CatalogStore, NewSubstance, StorageError, category_id_by_slug, insert_category,
    insert_substance, insert_variant, link_substance_category,
};
use tracing::{info, warn};

use crate::error::LoadError;

/// Row counts from one import run, for verification.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportReport {
    pub categories: u64,
    pub substances: u64,
    pub category_links: u64,
    pub variants: u64,
}

/// One-shot bulk loader for a product document.
///
/// The whole run is a single transaction: any insert failure (duplicate
/// slug or sku included) aborts with nothing committed. The only
/// recoverable condition is a substance referencing a category slug that
/// does not exist, which skips that link and keeps going.
pub struct CatalogImporter<'a> {
    store: &'a mut CatalogStore,
}

impl<'a> CatalogImporter<'a> {
    pub fn new(store: &'a mut CatalogStore) -> Self {
        Self { store }
    }

    pub fn import(&mut self, doc: &CatalogDocument) -> Result<ImportReport, LoadError> {
        let tx = self.store.transaction()?;
        let mut report = ImportReport::default();

        info!("importing {} categories", doc.categories.len());
        for category in &doc.categories {
            insert_category(&tx, &category.slug, &category.name)?;
            report.categories += 1;
        }

        info!("importing {} substances", doc.substances.len());
        for entry in &doc.substances {
            let substance_id = insert_substance(&tx, &substance_record(entry)?)?;
            report.substances += 1;

            for slug in &entry.categories {
                match category_id_by_slug(&tx, slug)? {
                    Some(category_id) => {
                        link_substance_category(&tx, substance_id, category_id)?;
                        report.category_links += 1;
                    }
                    None => {
                        warn!(
                            "category '{}' not found for substance '{}', skipping link",
                            slug, entry.slug
                        );
                    }
                }
            }

            if !entry.variants.is_empty() {
                info!("adding {} variants for {}", entry.variants.len(), entry.name);
            }
            for variant in &entry.variants {
                insert_variant(
                    &tx,
                    substance_id,
                    &variant.sku,
                    variant.mg,
                    variant.price_cents,
                    variant.coa_path.as_deref(),
                )?;
                report.variants += 1;
            }
        }

        tx.commit().map_err(StorageError::from)?;
        Ok(report)
    }
}

/// Partitions a document entry into the row that gets inserted:
/// required scalars with their defaults applied, optional attributes
/// passed through as-is, and the catch-all blob for everything else
/// (omitted entirely when empty).
fn substance_record(entry: &SubstanceEntry) -> Result<NewSubstance, LoadError> {
    let meta_json = if entry.extra.is_empty() {
        None
    } else {
        Some(entry.extra.to_json()?)
    };

    Ok(NewSubstance {
        slug: entry.slug.clone(),
        name: entry.name.clone(),
        description: entry.description.clone(),
        product_type: entry
            .product_type
            .clone()
            .unwrap_or_else(|| DEFAULT_PRODUCT_TYPE.to_owned()),
        priority: entry.priority.unwrap_or(DEFAULT_PRIORITY),
        sequence: entry.sequence.clone(),
        sequence_length: entry.sequence_length,
        molecular_weight: entry.molecular_weight,
        formula: entry.formula.clone(),
        cas_number: entry.cas_number.clone(),
        purity_percent: entry.purity_percent,
        salt_form: entry.salt_form.clone(),
        physical_form: entry.physical_form.clone(),
        storage_temp_c: entry.storage_temp_c,
        recommended_solvent: entry.recommended_solvent.clone(),
        meta_json,
    })
}
