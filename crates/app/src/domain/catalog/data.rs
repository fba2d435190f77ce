//! Catalog Data

use sewa::catalog::{Category, ItemId};

/// New Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub price: u64,
    pub nominal_stock: u32,
}

/// Item Update Data
#[derive(Debug, Clone, PartialEq)]
pub struct ItemUpdate {
    pub name: String,
    pub category: Category,
    pub price: u64,
    pub nominal_stock: u32,
}
