use std::path::Path;

use rusqlite::{Connection, OptionalExtension, Transaction, params};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::StorageError;
use crate::row::{BatchRow, InsertRow, InventoryRow, NewSubstance, SubstanceRow, VariantRow, exec_insert};

/// Batch dates are stored as ISO calendar-date text.
const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Handle on the catalog database. All writes go through an explicit
/// [`CatalogStore::transaction`] scope owned by the caller.
pub struct CatalogStore {
    conn: Connection,
}

impl CatalogStore {
    /// Opens a fresh store at `path` and applies the embedded schema.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens an existing, already schema-initialized store.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        crate::schema::apply_pragmas(&conn)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        crate::schema::init_schema(&conn)?;
        Ok(Self { conn })
    }

    pub fn transaction(&mut self) -> Result<Transaction<'_>, StorageError> {
        Ok(self.conn.transaction()?)
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

pub fn insert_category(conn: &Connection, slug: &str, name: &str) -> Result<i64, StorageError> {
    exec_insert(
        conn,
        "INSERT INTO categories (slug, name) VALUES (?1, ?2)",
        params![slug, name],
    )
}

/// Inserts a substance with exactly the columns present on `sub`.
///
/// The checklist below is the full set of known columns; absent optional
/// attributes are left to the schema defaults rather than written as
/// NULLs, and `meta_json` is only written when the entry carried extra
/// fields.
pub fn insert_substance(conn: &Connection, sub: &NewSubstance) -> Result<i64, StorageError> {
    let mut row = InsertRow::new("substances");
    row.push("slug", sub.slug.clone());
    row.push("name", sub.name.clone());
    row.push("description", sub.description.clone());
    row.push("product_type", sub.product_type.clone());
    row.push("priority", sub.priority);
    row.push_opt("sequence", sub.sequence.clone());
    row.push_opt("sequence_length", sub.sequence_length);
    row.push_opt("molecular_weight", sub.molecular_weight);
    row.push_opt("formula", sub.formula.clone());
    row.push_opt("cas_number", sub.cas_number.clone());
    row.push_opt("purity_percent", sub.purity_percent);
    row.push_opt("salt_form", sub.salt_form.clone());
    row.push_opt("physical_form", sub.physical_form.clone());
    row.push_opt("storage_temp_c", sub.storage_temp_c);
    row.push_opt("recommended_solvent", sub.recommended_solvent.clone());
    row.push_opt("meta_json", sub.meta_json.clone());
    row.insert(conn)
}

pub fn link_substance_category(
    conn: &Connection,
    substance_id: i64,
    category_id: i64,
) -> Result<(), StorageError> {
    exec_insert(
        conn,
        "INSERT INTO substance_categories (substance_id, category_id) VALUES (?1, ?2)",
        params![substance_id, category_id],
    )?;
    Ok(())
}

pub fn insert_variant(
    conn: &Connection,
    substance_id: i64,
    sku: &str,
    mg: f64,
    price_cents: i64,
    coa_path: Option<&str>,
) -> Result<i64, StorageError> {
    exec_insert(
        conn,
        "INSERT INTO variants (substance_id, sku, mg, price_cents, coa_path) VALUES (?1, ?2, ?3, ?4, ?5)",
        params![substance_id, sku, mg, price_cents, coa_path],
    )
}

pub fn insert_batch(
    conn: &Connection,
    variant_id: i64,
    batch_id: &str,
    manufactured: Date,
    expiration: Date,
) -> Result<i64, StorageError> {
    exec_insert(
        conn,
        "INSERT INTO batches (variant_id, batch_id, manufactured, expiration) VALUES (?1, ?2, ?3, ?4)",
        params![
            variant_id,
            batch_id,
            manufactured.format(DATE_FORMAT)?,
            expiration.format(DATE_FORMAT)?,
        ],
    )
}

pub fn insert_inventory(
    conn: &Connection,
    batch_pk: i64,
    quantity: i64,
    in_stock: bool,
) -> Result<i64, StorageError> {
    exec_insert(
        conn,
        "INSERT INTO inventory (batch_id, quantity, in_stock) VALUES (?1, ?2, ?3)",
        params![batch_pk, quantity, in_stock],
    )
}

pub fn category_id_by_slug(conn: &Connection, slug: &str) -> Result<Option<i64>, StorageError> {
    let id = conn
        .query_row("SELECT id FROM categories WHERE slug = ?1", params![slug], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

pub fn variant_id_by_sku(conn: &Connection, sku: &str) -> Result<Option<i64>, StorageError> {
    let id = conn
        .query_row("SELECT id FROM variants WHERE sku = ?1", params![sku], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(id)
}

pub fn batch_exists(
    conn: &Connection,
    variant_id: i64,
    batch_id: &str,
) -> Result<bool, StorageError> {
    let mut stmt = conn.prepare("SELECT 1 FROM batches WHERE variant_id = ?1 AND batch_id = ?2")?;
    Ok(stmt.exists(params![variant_id, batch_id])?)
}

/// `table` must be a literal table name, never caller input.
pub fn table_count(conn: &Connection, table: &'static str) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))?;
    Ok(count as u64)
}

pub fn substance_by_slug(conn: &Connection, slug: &str) -> Result<Option<SubstanceRow>, StorageError> {
    let row = conn
        .query_row(
            "SELECT id, slug, name, description, product_type, priority, meta_json
             FROM substances WHERE slug = ?1",
            params![slug],
            |row| {
                Ok(SubstanceRow {
                    id: row.get(0)?,
                    slug: row.get(1)?,
                    name: row.get(2)?,
                    description: row.get(3)?,
                    product_type: row.get(4)?,
                    priority: row.get(5)?,
                    meta_json: row.get(6)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

/// Variants in insertion (document) order.
pub fn variants_for_substance(
    conn: &Connection,
    substance_id: i64,
) -> Result<Vec<VariantRow>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, substance_id, sku, mg, price_cents, coa_path
         FROM variants WHERE substance_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![substance_id], |row| {
            Ok(VariantRow {
                id: row.get(0)?,
                substance_id: row.get(1)?,
                sku: row.get(2)?,
                mg: row.get(3)?,
                price_cents: row.get(4)?,
                coa_path: row.get(5)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn batches_for_variant(conn: &Connection, variant_id: i64) -> Result<Vec<BatchRow>, StorageError> {
    let mut stmt = conn.prepare(
        "SELECT id, variant_id, batch_id, manufactured, expiration
         FROM batches WHERE variant_id = ?1 ORDER BY id",
    )?;
    let rows = stmt
        .query_map(params![variant_id], |row| {
            Ok(BatchRow {
                id: row.get(0)?,
                variant_id: row.get(1)?,
                batch_id: row.get(2)?,
                manufactured: row.get(3)?,
                expiration: row.get(4)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub fn inventory_for_batch(conn: &Connection, batch_pk: i64) -> Result<Option<InventoryRow>, StorageError> {
    let row = conn
        .query_row(
            "SELECT batch_id, quantity, in_stock FROM inventory WHERE batch_id = ?1",
            params![batch_pk],
            |row| {
                Ok(InventoryRow {
                    batch_id: row.get(0)?,
                    quantity: row.get(1)?,
                    in_stock: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(row)
}

pub fn category_link_count(conn: &Connection, substance_id: i64) -> Result<u64, StorageError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM substance_categories WHERE substance_id = ?1",
        params![substance_id],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
