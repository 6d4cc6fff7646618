use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};

use crate::error::StorageError;

/// Accumulates (column, value) pairs and emits one parameterized INSERT.
///
/// Column names are `&'static str` drawn from a fixed checklist at the
/// call site; only the values travel as SQL parameters. Columns that are
/// never pushed fall back to their schema defaults, which is what lets
/// the substance insert vary its column set per row.
pub struct InsertRow {
    table: &'static str,
    columns: Vec<&'static str>,
    values: Vec<Value>,
}

impl InsertRow {
    pub fn new(table: &'static str) -> Self {
        Self {
            table,
            columns: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn push(&mut self, column: &'static str, value: impl Into<Value>) {
        self.columns.push(column);
        self.values.push(value.into());
    }

    /// Pushes only when the value is present.
    pub fn push_opt(&mut self, column: &'static str, value: Option<impl Into<Value>>) {
        if let Some(value) = value {
            self.push(column, value);
        }
    }

    pub fn insert(self, conn: &Connection) -> Result<i64, StorageError> {
        let placeholders: Vec<String> = (1..=self.columns.len()).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            self.columns.join(", "),
            placeholders.join(", ")
        );
        exec_insert(conn, &sql, params_from_iter(self.values))
    }
}

/// Runs an INSERT and returns the generated rowid, mapping SQLite
/// constraint failures to [`StorageError::ConstraintViolation`].
pub(crate) fn exec_insert<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<i64, StorageError> {
    match conn.execute(sql, params) {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(err, msg))
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Err(StorageError::ConstraintViolation(
                msg.unwrap_or_else(|| err.to_string()),
            ))
        }
        Err(e) => Err(StorageError::Sqlite(e)),
    }
}

/// Substance row assembled by the importer: required scalars plus
/// whatever optional attributes the document entry carried.
#[derive(Debug, Clone, Default)]
pub struct NewSubstance {
    pub slug: String,
    pub name: String,
    pub description: String,
    pub product_type: String,
    pub priority: i64,
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
    pub meta_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubstanceRow {
    pub id: i64,
    pub slug: String,
    pub name: String,
    pub description: String,
    pub product_type: String,
    pub priority: i64,
    pub meta_json: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VariantRow {
    pub id: i64,
    pub substance_id: i64,
    pub sku: String,
    pub mg: f64,
    pub price_cents: i64,
    pub coa_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BatchRow {
    pub id: i64,
    pub variant_id: i64,
    pub batch_id: String,
    pub manufactured: String,
    pub expiration: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryRow {
    pub batch_id: i64,
    pub quantity: i64,
    pub in_stock: bool,
}
