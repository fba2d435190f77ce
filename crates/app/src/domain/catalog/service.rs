//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use sewa::catalog::ItemId;

use crate::{
    database::Db,
    domain::catalog::{
        data::{ItemUpdate, NewItem},
        errors::CatalogServiceError,
        records::ItemRecord,
        repository::PgCatalogRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgCatalogService {
    db: Db,
    repository: PgCatalogRepository,
}

impl PgCatalogService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgCatalogRepository::new(),
        }
    }
}

#[async_trait]
impl CatalogService for PgCatalogService {
    async fn list_items(&self) -> Result<Vec<ItemRecord>, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let items = self.repository.list_items(&mut tx).await?;

        tx.commit().await?;

        Ok(items)
    }

    async fn get_item(&self, item: &ItemId) -> Result<ItemRecord, CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let item = self.repository.get_item(&mut tx, item).await?;

        tx.commit().await?;

        Ok(item)
    }

    async fn create_item(&self, item: NewItem) -> Result<ItemRecord, CatalogServiceError> {
        if item.id.as_str().trim().is_empty() || item.name.trim().is_empty() {
            return Err(CatalogServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let created = self.repository.create_item(&mut tx, &item).await?;

        tx.commit().await?;

        Ok(created)
    }

    async fn update_item(
        &self,
        item: &ItemId,
        update: ItemUpdate,
    ) -> Result<ItemRecord, CatalogServiceError> {
        if update.name.trim().is_empty() {
            return Err(CatalogServiceError::MissingRequiredData);
        }

        let mut tx = self.db.begin().await?;

        let updated = self.repository.update_item(&mut tx, item, &update).await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn delete_item(&self, item: &ItemId) -> Result<(), CatalogServiceError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = self.repository.delete_item(&mut tx, item).await?;

        if rows_affected == 0 {
            return Err(CatalogServiceError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves all live items.
    async fn list_items(&self) -> Result<Vec<ItemRecord>, CatalogServiceError>;

    /// Retrieve a single item.
    async fn get_item(&self, item: &ItemId) -> Result<ItemRecord, CatalogServiceError>;

    /// Adds an item to the catalog.
    async fn create_item(&self, item: NewItem) -> Result<ItemRecord, CatalogServiceError>;

    /// Replaces an item's details.
    async fn update_item(
        &self,
        item: &ItemId,
        update: ItemUpdate,
    ) -> Result<ItemRecord, CatalogServiceError>;

    /// Removes an item from the catalog. Past bookings keep referencing it.
    async fn delete_item(&self, item: &ItemId) -> Result<(), CatalogServiceError>;
}
