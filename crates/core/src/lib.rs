pub mod document;
pub mod error;
pub mod meta;
pub mod stock;

pub use document::{CatalogDocument, CategoryEntry, SubstanceEntry, VariantEntry};
pub use document::{DEFAULT_PRIORITY, DEFAULT_PRODUCT_TYPE};
pub use error::CoreError;
pub use meta::MetaMap;
pub use stock::StockItem;
