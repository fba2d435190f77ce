//! Bookings Repository

use jiff::{Timestamp, civil::Date};
use jiff_sqlx::{Date as SqlxDate, Timestamp as SqlxTimestamp};
use rustc_hash::FxHashMap;
use sewa::{
    availability::LEAD_IN_DAYS,
    bookings::{Booking, BookingCode, BookingLine, BookingLines, BookingStatus, RentalPeriod},
    catalog::ItemId,
};
use sqlx::{
    FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as, query_scalar,
};
use uuid::Uuid;

use crate::domain::{
    bookings::{
        data::BookingFilter,
        records::{BookingRecord, BookingUuid},
    },
    catalog::repository::{to_amount, to_count, try_get_amount, try_get_count},
    customers::records::CustomerUuid,
};

const LIST_HOLDING_BOOKINGS_SQL: &str = include_str!("sql/list_holding_bookings.sql");
const LIST_BOOKINGS_SQL: &str = include_str!("sql/list_bookings.sql");
const GET_BOOKING_SQL: &str = include_str!("sql/get_booking.sql");
const LOCK_BOOKING_SQL: &str = include_str!("sql/lock_booking.sql");
const GET_BOOKING_LINES_SQL: &str = include_str!("sql/get_booking_lines.sql");
const CREATE_BOOKING_SQL: &str = include_str!("sql/create_booking.sql");
const CREATE_BOOKING_LINE_SQL: &str = include_str!("sql/create_booking_line.sql");
const UPDATE_BOOKING_STATUS_SQL: &str = include_str!("sql/update_booking_status.sql");
const COMPLETE_EXPIRED_BOOKINGS_SQL: &str = include_str!("sql/complete_expired_bookings.sql");

/// A `bookings` row without its lines.
#[derive(Debug, Clone)]
struct BookingHeader {
    uuid: Uuid,
    code: BookingCode,
    customer_uuid: Uuid,
    status: BookingStatus,
    period: RentalPeriod,
    total_price: u64,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl BookingHeader {
    fn into_record(self, lines: BookingLines) -> BookingRecord {
        BookingRecord {
            uuid: BookingUuid::from_uuid(self.uuid),
            customer: CustomerUuid::from_uuid(self.customer_uuid),
            booking: Booking {
                code: self.code,
                status: self.status,
                period: self.period,
                lines,
                total_price: self.total_price,
                created_at: self.created_at,
            },
            updated_at: self.updated_at,
        }
    }
}

/// A `booking_lines` row.
#[derive(Debug, Clone)]
struct BookingLineRow {
    booking_uuid: Uuid,
    line: BookingLine,
}

/// Payload of a booking insert.
#[derive(Debug, Clone)]
pub(crate) struct NewBookingRow<'a> {
    pub uuid: BookingUuid,
    pub code: &'a BookingCode,
    pub customer: CustomerUuid,
    pub period: RentalPeriod,
    pub total_price: u64,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgBookingsRepository;

impl PgBookingsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Active bookings holding stock on `as_of`, lines included.
    pub(crate) async fn list_holding_bookings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        as_of: Date,
    ) -> Result<Vec<Booking>, sqlx::Error> {
        let headers = query_as::<Postgres, BookingHeader>(LIST_HOLDING_BOOKINGS_SQL)
            .bind(SqlxDate::from(as_of))
            .bind(LEAD_IN_DAYS)
            .fetch_all(&mut **tx)
            .await?;

        let records = self.attach_lines(tx, headers).await?;

        Ok(records.into_iter().map(|record| record.booking).collect())
    }

    pub(crate) async fn list_bookings(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: BookingFilter,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        let headers = query_as::<Postgres, BookingHeader>(LIST_BOOKINGS_SQL)
            .bind(filter.customer.map(CustomerUuid::into_uuid))
            .bind(filter.status.map(BookingStatus::as_str))
            .fetch_all(&mut **tx)
            .await?;

        self.attach_lines(tx, headers).await
    }

    /// Fetches a booking by code, restricted to `owner` when given.
    pub(crate) async fn get_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &BookingCode,
        owner: Option<CustomerUuid>,
    ) -> Result<BookingRecord, sqlx::Error> {
        let header = query_as::<Postgres, BookingHeader>(GET_BOOKING_SQL)
            .bind(code.as_str())
            .bind(owner.map(CustomerUuid::into_uuid))
            .fetch_one(&mut **tx)
            .await?;

        self.single(tx, header).await
    }

    /// Fetches a booking by code and locks its row until the transaction ends.
    pub(crate) async fn lock_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &BookingCode,
    ) -> Result<BookingRecord, sqlx::Error> {
        let header = query_as::<Postgres, BookingHeader>(LOCK_BOOKING_SQL)
            .bind(code.as_str())
            .fetch_one(&mut **tx)
            .await?;

        self.single(tx, header).await
    }

    /// Inserts a booking header, returning `None` when its code is taken.
    pub(crate) async fn create_booking(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: &NewBookingRow<'_>,
    ) -> Result<Option<BookingUuid>, sqlx::Error> {
        let header = query_as::<Postgres, BookingHeader>(CREATE_BOOKING_SQL)
            .bind(booking.uuid.into_uuid())
            .bind(booking.code.as_str())
            .bind(booking.customer.into_uuid())
            .bind(SqlxDate::from(booking.period.pickup()))
            .bind(SqlxDate::from(booking.period.return_date()))
            .bind(to_amount(booking.total_price, "total_price")?)
            .fetch_optional(&mut **tx)
            .await?;

        Ok(header.map(|header| BookingUuid::from_uuid(header.uuid)))
    }

    pub(crate) async fn create_booking_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        lines: &[BookingLine],
    ) -> Result<(), sqlx::Error> {
        for line in lines {
            query(CREATE_BOOKING_LINE_SQL)
                .bind(booking.into_uuid())
                .bind(line.item_id.as_str())
                .bind(to_count(line.quantity, "quantity")?)
                .bind(to_amount(line.unit_price, "unit_price")?)
                .execute(&mut **tx)
                .await?;
        }

        Ok(())
    }

    /// Moves a booking from `from` to `to`, returning the new `updated_at`.
    ///
    /// Returns `None` without writing unless the booking is still in `from`.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        booking: BookingUuid,
        from: BookingStatus,
        to: BookingStatus,
    ) -> Result<Option<Timestamp>, sqlx::Error> {
        let updated_at = query_scalar::<Postgres, SqlxTimestamp>(UPDATE_BOOKING_STATUS_SQL)
            .bind(booking.into_uuid())
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&mut **tx)
            .await?;

        Ok(updated_at.map(|updated_at| updated_at.to_jiff()))
    }

    /// Completes every rental whose return date is before `today`, only
    /// `customer`'s when given.
    pub(crate) async fn complete_expired(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        today: Date,
        customer: Option<CustomerUuid>,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(COMPLETE_EXPIRED_BOOKINGS_SQL)
            .bind(SqlxDate::from(today))
            .bind(customer.map(CustomerUuid::into_uuid))
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    async fn single(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        header: BookingHeader,
    ) -> Result<BookingRecord, sqlx::Error> {
        self.attach_lines(tx, vec![header])
            .await?
            .pop()
            .ok_or(sqlx::Error::RowNotFound)
    }

    async fn attach_lines(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        headers: Vec<BookingHeader>,
    ) -> Result<Vec<BookingRecord>, sqlx::Error> {
        if headers.is_empty() {
            return Ok(Vec::new());
        }

        let uuids: Vec<Uuid> = headers.iter().map(|header| header.uuid).collect();

        let rows = query_as::<Postgres, BookingLineRow>(GET_BOOKING_LINES_SQL)
            .bind(&uuids)
            .fetch_all(&mut **tx)
            .await?;

        let mut lines: FxHashMap<Uuid, BookingLines> = FxHashMap::default();

        for row in rows {
            lines.entry(row.booking_uuid).or_default().push(row.line);
        }

        Ok(headers
            .into_iter()
            .map(|header| {
                let booking_lines = lines.remove(&header.uuid).unwrap_or_default();

                header.into_record(booking_lines)
            })
            .collect())
    }
}

fn decode_error(column: &str, source: impl std::error::Error + Send + Sync + 'static) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

impl<'r> FromRow<'r, PgRow> for BookingHeader {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let code = row
            .try_get::<String, _>("code")?
            .parse()
            .map_err(|e| decode_error("code", e))?;

        let status = row
            .try_get::<String, _>("status")?
            .parse()
            .map_err(|e| decode_error("status", e))?;

        let period = RentalPeriod::new(
            row.try_get::<SqlxDate, _>("pickup_date")?.to_jiff(),
            row.try_get::<SqlxDate, _>("return_date")?.to_jiff(),
        )
        .map_err(|e| decode_error("return_date", e))?;

        Ok(Self {
            uuid: row.try_get("uuid")?,
            code,
            customer_uuid: row.try_get("customer_uuid")?,
            status,
            period,
            total_price: try_get_amount(row, "total_price")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for BookingLineRow {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            booking_uuid: row.try_get("booking_uuid")?,
            line: BookingLine {
                item_id: ItemId::new(row.try_get::<String, _>("item_id")?),
                quantity: try_get_count(row, "quantity")?,
                unit_price: try_get_amount(row, "unit_price")?,
            },
        })
    }
}
