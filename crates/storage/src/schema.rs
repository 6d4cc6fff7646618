use rusqlite::Connection;

use crate::error::StorageError;

pub fn apply_pragmas(conn: &Connection) -> Result<(), StorageError> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA synchronous = NORMAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
    ",
    )?;
    Ok(())
}

pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    apply_pragmas(conn)?;
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS substances (
    id INTEGER PRIMARY KEY,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    description TEXT NOT NULL,
    product_type TEXT NOT NULL DEFAULT 'peptide',
    priority INTEGER NOT NULL DEFAULT 9999,
    sequence TEXT,
    sequence_length INTEGER,
    molecular_weight REAL,
    formula TEXT,
    cas_number TEXT,
    purity_percent REAL,
    salt_form TEXT,
    physical_form TEXT,
    storage_temp_c REAL,
    recommended_solvent TEXT,
    meta_json TEXT
);

CREATE TABLE IF NOT EXISTS substance_categories (
    substance_id INTEGER NOT NULL REFERENCES substances(id),
    category_id INTEGER NOT NULL REFERENCES categories(id),
    PRIMARY KEY (substance_id, category_id)
);

CREATE TABLE IF NOT EXISTS variants (
    id INTEGER PRIMARY KEY,
    substance_id INTEGER NOT NULL REFERENCES substances(id),
    sku TEXT NOT NULL UNIQUE,
    mg REAL NOT NULL,
    price_cents INTEGER NOT NULL,
    coa_path TEXT
);
CREATE INDEX IF NOT EXISTS idx_variants_substance ON variants (substance_id);

CREATE TABLE IF NOT EXISTS batches (
    id INTEGER PRIMARY KEY,
    variant_id INTEGER NOT NULL REFERENCES variants(id),
    batch_id TEXT NOT NULL,
    manufactured TEXT NOT NULL,
    expiration TEXT NOT NULL,
    UNIQUE (variant_id, batch_id)
);

CREATE TABLE IF NOT EXISTS inventory (
    id INTEGER PRIMARY KEY,
    batch_id INTEGER NOT NULL UNIQUE REFERENCES batches(id),
    quantity INTEGER NOT NULL,
    in_stock INTEGER NOT NULL
);
";
