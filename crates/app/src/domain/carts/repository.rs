//! Cart Entries Repository

use sewa::{cart::CartEntry, catalog::ItemId, pricing::RentalDays};
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    catalog::repository::{to_count, try_get_count},
    customers::records::CustomerUuid,
};

const GET_CART_ENTRIES_SQL: &str = include_str!("sql/get_cart_entries.sql");
const CLEAR_CART_SQL: &str = include_str!("sql/clear_cart.sql");
const CREATE_CART_ENTRY_SQL: &str = include_str!("sql/create_cart_entry.sql");

/// Row wrapper; [`CartEntry`] lives in the engine crate.
struct CartEntryRow(CartEntry);

#[derive(Debug, Clone, Default)]
pub(crate) struct PgCartsRepository;

impl PgCartsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn get_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<Vec<CartEntry>, sqlx::Error> {
        query_as::<Postgres, CartEntryRow>(GET_CART_ENTRIES_SQL)
            .bind(customer.into_uuid())
            .fetch_all(&mut **tx)
            .await
            .map(|rows| rows.into_iter().map(|row| row.0).collect())
    }

    /// Replaces the stored cart with `entries`, keeping their order.
    pub(crate) async fn replace_entries(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
        entries: &[CartEntry],
    ) -> Result<(), sqlx::Error> {
        self.clear_cart(tx, customer).await?;

        for (position, entry) in entries.iter().enumerate() {
            query(CREATE_CART_ENTRY_SQL)
                .bind(customer.into_uuid())
                .bind(entry.item_id.as_str())
                .bind(i32::try_from(position).unwrap_or(i32::MAX))
                .bind(to_count(entry.quantity, "quantity")?)
                .bind(to_count(entry.rental_days.get(), "rental_days")?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    pub(crate) async fn clear_cart(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        customer: CustomerUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(CLEAR_CART_SQL)
            .bind(customer.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for CartEntryRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let rental_days = RentalDays::new(try_get_count(row, "rental_days")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "rental_days".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self(CartEntry {
            item_id: ItemId::new(row.try_get::<String, _>("item_id")?),
            quantity: try_get_count(row, "quantity")?,
            rental_days,
        }))
    }
}
