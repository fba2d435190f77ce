//! Catalog

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;

/// Stable identifier of a rentable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Creates a new item identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ItemId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ItemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Kind of catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A complete costume.
    Fullset,

    /// A single accessory (wig, prop, mask...).
    Accessory,
}

impl Category {
    /// Persisted representation of the category.
    pub const fn as_str(self) -> &'static str {
        match self {
            Category::Fullset => "fullset",
            Category::Accessory => "accessory",
        }
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "fullset" => Ok(Category::Fullset),
            "accessory" => Ok(Category::Accessory),
            _ => Err(ValidationError::UnknownCategory(value.to_string())),
        }
    }
}

/// An item that can be rented, with a finite number of physical units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    /// Item identifier.
    pub id: ItemId,

    /// Display name.
    pub name: String,

    /// Item category.
    pub category: Category,

    /// Base rental price for the standard window, in the smallest currency unit.
    pub price: u64,

    /// Number of physical units owned.
    pub nominal_stock: u32,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn category_parses_case_insensitively() -> TestResult {
        assert_eq!("Fullset".parse::<Category>()?, Category::Fullset);
        assert_eq!(" accessory ".parse::<Category>()?, Category::Accessory);

        Ok(())
    }

    #[test]
    fn unknown_category_is_a_validation_error() {
        let result = "wig".parse::<Category>();

        assert_eq!(
            result,
            Err(ValidationError::UnknownCategory("wig".to_string()))
        );
    }

    #[test]
    fn item_id_displays_raw_value() {
        assert_eq!(ItemId::from("batman-dewasa").to_string(), "batman-dewasa");
    }
}
