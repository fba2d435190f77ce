//! Catalog Records

use jiff::Timestamp;
use sewa::catalog::CatalogItem;

/// Item Record
#[derive(Debug, Clone)]
pub struct ItemRecord {
    pub item: CatalogItem,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}
