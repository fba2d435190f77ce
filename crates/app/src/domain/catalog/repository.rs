//! Catalog Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sewa::catalog::{CatalogItem, ItemId};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::catalog::{
    data::{ItemUpdate, NewItem},
    records::ItemRecord,
};

const LIST_ITEMS_SQL: &str = include_str!("sql/list_items.sql");
const GET_ITEM_SQL: &str = include_str!("sql/get_item.sql");
const GET_ITEMS_SQL: &str = include_str!("sql/get_items.sql");
const LOCK_ITEMS_SQL: &str = include_str!("sql/lock_items.sql");
const CREATE_ITEM_SQL: &str = include_str!("sql/create_item.sql");
const UPDATE_ITEM_SQL: &str = include_str!("sql/update_item.sql");
const DELETE_ITEM_SQL: &str = include_str!("sql/delete_item.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCatalogRepository;

impl PgCatalogRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<Vec<ItemRecord>, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(LIST_ITEMS_SQL)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &ItemId,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(GET_ITEM_SQL)
            .bind(item.as_str())
            .fetch_one(&mut **tx)
            .await
    }

    /// Live items among `items`; unknown and deleted ids are omitted.
    pub(crate) async fn get_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[ItemId],
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let ids = item_ids(items);

        query_as::<Postgres, ItemRecord>(GET_ITEMS_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await
            .map(|records| records.into_iter().map(|record| record.item).collect())
    }

    /// Same as [`Self::get_items`], holding row locks until the transaction ends.
    ///
    /// Rows are locked in id order so concurrent checkouts cannot deadlock.
    pub(crate) async fn lock_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        items: &[ItemId],
    ) -> Result<Vec<CatalogItem>, sqlx::Error> {
        let ids = item_ids(items);

        query_as::<Postgres, ItemRecord>(LOCK_ITEMS_SQL)
            .bind(&ids)
            .fetch_all(&mut **tx)
            .await
            .map(|records| records.into_iter().map(|record| record.item).collect())
    }

    pub(crate) async fn create_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &NewItem,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(CREATE_ITEM_SQL)
            .bind(item.id.as_str())
            .bind(&item.name)
            .bind(item.category.as_str())
            .bind(to_amount(item.price, "price")?)
            .bind(to_count(item.nominal_stock, "nominal_stock")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &ItemId,
        update: &ItemUpdate,
    ) -> Result<ItemRecord, sqlx::Error> {
        query_as::<Postgres, ItemRecord>(UPDATE_ITEM_SQL)
            .bind(item.as_str())
            .bind(&update.name)
            .bind(update.category.as_str())
            .bind(to_amount(update.price, "price")?)
            .bind(to_count(update.nominal_stock, "nominal_stock")?)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn delete_item(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        item: &ItemId,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ITEM_SQL)
            .bind(item.as_str())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

fn item_ids(items: &[ItemId]) -> Vec<String> {
    let mut ids: Vec<String> = items.iter().map(|item| item.as_str().to_string()).collect();

    ids.sort();
    ids.dedup();

    ids
}

fn decode_error(column: &str, source: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

/// Reads a non-negative `BIGINT` money column.
pub(crate) fn try_get_amount(row: &PgRow, column: &str) -> sqlx::Result<u64> {
    let amount: i64 = row.try_get(column)?;

    u64::try_from(amount).map_err(|e| decode_error(column, e))
}

/// Reads a non-negative `INTEGER` count column.
pub(crate) fn try_get_count(row: &PgRow, column: &str) -> sqlx::Result<u32> {
    let count: i32 = row.try_get(column)?;

    u32::try_from(count).map_err(|e| decode_error(column, e))
}

pub(crate) fn to_amount(amount: u64, column: &str) -> sqlx::Result<i64> {
    i64::try_from(amount).map_err(|e| decode_error(column, e))
}

pub(crate) fn to_count(count: u32, column: &str) -> sqlx::Result<i32> {
    i32::try_from(count).map_err(|e| decode_error(column, e))
}

impl<'r> FromRow<'r, PgRow> for ItemRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let category = row
            .try_get::<String, _>("category")?
            .parse()
            .map_err(|e| decode_error("category", e))?;

        Ok(Self {
            item: CatalogItem {
                id: ItemId::new(row.try_get::<String, _>("id")?),
                name: row.try_get("name")?,
                category,
                price: try_get_amount(row, "price")?,
                nominal_stock: try_get_count(row, "nominal_stock")?,
            },
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            deleted_at: row
                .try_get::<Option<SqlxTimestamp>, _>("deleted_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
