//! Product document model.
//!
//! The catalog is described by a YAML document with an ordered list of
//! categories and an ordered list of substances, each substance nesting
//! its purchasable variants. Fields without a dedicated column end up in
//! the flattened [`MetaMap`] so nothing from the source document is lost.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::CoreError;
use crate::meta::MetaMap;

/// Product type used when a substance entry does not declare one.
pub const DEFAULT_PRODUCT_TYPE: &str = "peptide";

/// Sentinel priority for substances without an explicit rank.
/// Keeps every row comparable; 9999 sorts after any real priority.
pub const DEFAULT_PRIORITY: i64 = 9999;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub categories: Vec<CategoryEntry>,
    #[serde(default)]
    pub substances: Vec<SubstanceEntry>,
}

impl CatalogDocument {
    pub fn from_yaml_str(input: &str) -> Result<Self, CoreError> {
        Ok(serde_yaml::from_str(input)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, CoreError> {
        let input = fs::read_to_string(path)?;
        Self::from_yaml_str(&input)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryEntry {
    pub slug: String,
    pub name: String,
}

/// One substance entry as it appears in the document.
///
/// `categories` and `variants` are relationship data, not substance
/// attributes, so they are modeled fields and never reach `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubstanceEntry {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub product_type: Option<String>,
    pub priority: Option<i64>,

    // Optional scientific attributes with dedicated columns.
    pub sequence: Option<String>,
    pub sequence_length: Option<i64>,
    pub molecular_weight: Option<f64>,
    pub formula: Option<String>,
    pub cas_number: Option<String>,
    pub purity_percent: Option<f64>,
    pub salt_form: Option<String>,
    pub physical_form: Option<String>,
    pub storage_temp_c: Option<f64>,
    pub recommended_solvent: Option<String>,

    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub variants: Vec<VariantEntry>,

    /// Everything else in the entry.
    #[serde(flatten)]
    pub extra: MetaMap,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VariantEntry {
    pub sku: String,
    pub mg: f64,
    pub price_cents: i64,
    pub coa_path: Option<String>,
}
