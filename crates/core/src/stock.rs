/// One entry of a seeding plan: which variant to stock, how much per
/// batch, and how many batches to manufacture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockItem {
    pub sku: String,
    pub quantity_per_batch: i64,
    pub batch_count: u32,
}

impl StockItem {
    pub fn new(sku: impl Into<String>, quantity_per_batch: i64, batch_count: u32) -> Self {
        Self {
            sku: sku.into(),
            quantity_per_batch,
            batch_count,
        }
    }
}
