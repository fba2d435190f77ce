//! Bookings service.

use async_trait::async_trait;
use jiff::civil::Date;
use mockall::automock;
use sewa::{
    availability::{Availability, availability},
    bookings::{BookingCode, BookingStatus},
    checkout::{BookingRequest, checkout},
};
use sqlx::{Postgres, Transaction};
use tracing::{debug, info};

use crate::{
    calendar::BusinessCalendar,
    database::Db,
    domain::{
        bookings::{
            data::BookingFilter,
            errors::BookingsServiceError,
            records::{BookingRecord, BookingUuid},
            repository::{NewBookingRow, PgBookingsRepository},
        },
        carts::repository::PgCartsRepository,
        catalog::repository::PgCatalogRepository,
        customers::records::CustomerUuid,
    },
};

/// Fresh codes drawn before giving up on an insert.
pub const BOOKING_CODE_ATTEMPTS: usize = 8;

#[derive(Debug, Clone)]
pub struct PgBookingsService {
    db: Db,
    calendar: BusinessCalendar,
    bookings: PgBookingsRepository,
    catalog: PgCatalogRepository,
    carts: PgCartsRepository,
}

impl PgBookingsService {
    #[must_use]
    pub fn new(db: Db, calendar: BusinessCalendar) -> Self {
        Self {
            db,
            calendar,
            bookings: PgBookingsRepository::new(),
            catalog: PgCatalogRepository::new(),
            carts: PgCartsRepository::new(),
        }
    }

    /// Applies lazy expiry to `record` and persists it.
    async fn complete_if_expired(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        record: &mut BookingRecord,
        today: Date,
    ) -> Result<(), sqlx::Error> {
        let before = record.booking.status;

        if !record.booking.complete_if_expired(today) {
            return Ok(());
        }

        // Zero rows means another reader completed it first; the only way out
        // of `out_on_rent` is `completed`, so the in-memory status holds.
        let updated_at = self
            .bookings
            .update_status(tx, record.uuid, before, record.booking.status)
            .await?;

        if let Some(updated_at) = updated_at {
            record.updated_at = updated_at;

            info!(code = %record.booking.code, "completed expired rental");
        }

        Ok(())
    }
}

#[async_trait]
impl BookingsService for PgBookingsService {
    async fn availability(&self, as_of: Date) -> Result<Availability, BookingsServiceError> {
        let mut tx = self.db.begin().await?;

        let bookings = self.bookings.list_holding_bookings(&mut tx, as_of).await?;

        tx.commit().await?;

        Ok(availability(&bookings, as_of))
    }

    async fn create_booking(
        &self,
        customer: CustomerUuid,
        request: BookingRequest,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let today = self.calendar.today();
        let mut tx = self.db.begin().await?;

        let items = self.catalog.lock_items(&mut tx, &request.item_ids()).await?;
        let holding = self.bookings.list_holding_bookings(&mut tx, today).await?;

        let quote = checkout(&request, &items, &availability(&holding, today))?;

        let uuid = BookingUuid::new();
        let mut created = None;

        for _ in 0..BOOKING_CODE_ATTEMPTS {
            let code = BookingCode::generate(&mut rand::thread_rng(), today.year());

            let inserted = self
                .bookings
                .create_booking(
                    &mut tx,
                    &NewBookingRow {
                        uuid,
                        code: &code,
                        customer,
                        period: request.period(),
                        total_price: quote.total_price,
                    },
                )
                .await?;

            if inserted.is_some() {
                created = Some(code);
                break;
            }

            debug!(%code, "booking code taken, drawing again");
        }

        let code = created.ok_or(BookingsServiceError::CodeSpaceExhausted)?;

        self.bookings
            .create_booking_lines(&mut tx, uuid, &quote.lines)
            .await?;

        self.carts.clear_cart(&mut tx, customer).await?;

        let record = self.bookings.get_booking(&mut tx, &code, None).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn list_bookings(
        &self,
        filter: BookingFilter,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError> {
        let today = self.calendar.today();
        let mut tx = self.db.begin().await?;

        // Expire before filtering so a lapsed rental lists as completed.
        let completed = self
            .bookings
            .complete_expired(&mut tx, today, filter.customer)
            .await?;

        if completed > 0 {
            info!(completed, "completed expired rentals");
        }

        let records = self.bookings.list_bookings(&mut tx, filter).await?;

        tx.commit().await?;

        Ok(records)
    }

    async fn get_booking(
        &self,
        code: &BookingCode,
        owner: Option<CustomerUuid>,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let today = self.calendar.today();
        let mut tx = self.db.begin().await?;

        let mut record = self.bookings.get_booking(&mut tx, code, owner).await?;

        self.complete_if_expired(&mut tx, &mut record, today).await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn transition_booking(
        &self,
        code: &BookingCode,
        next: BookingStatus,
    ) -> Result<BookingRecord, BookingsServiceError> {
        let today = self.calendar.today();
        let mut tx = self.db.begin().await?;

        let mut record = self.bookings.lock_booking(&mut tx, code).await?;

        self.complete_if_expired(&mut tx, &mut record, today).await?;

        let current = record.booking.status;
        let next = current.transition_to(next)?;

        let updated_at = self
            .bookings
            .update_status(&mut tx, record.uuid, current, next)
            .await?
            .ok_or(BookingsServiceError::NotFound)?;

        tx.commit().await?;

        record.booking.status = next;
        record.updated_at = updated_at;

        Ok(record)
    }

    async fn complete_expired(&self) -> Result<u64, BookingsServiceError> {
        let today = self.calendar.today();
        let mut tx = self.db.begin().await?;

        let completed = self.bookings.complete_expired(&mut tx, today, None).await?;

        tx.commit().await?;

        Ok(completed)
    }
}

#[automock]
#[async_trait]
pub trait BookingsService: Send + Sync {
    /// Booked quantities per item on `as_of`.
    async fn availability(&self, as_of: Date) -> Result<Availability, BookingsServiceError>;

    /// Accepts a booking if every line fits today's effective stock, then
    /// empties the customer's cart. All in one transaction.
    async fn create_booking(
        &self,
        customer: CustomerUuid,
        request: BookingRequest,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Lists bookings, newest first.
    async fn list_bookings(
        &self,
        filter: BookingFilter,
    ) -> Result<Vec<BookingRecord>, BookingsServiceError>;

    /// Retrieve a single booking, only if owned by `owner` when given.
    async fn get_booking(
        &self,
        code: &BookingCode,
        owner: Option<CustomerUuid>,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Moves a booking to `next` if the lifecycle allows it.
    async fn transition_booking(
        &self,
        code: &BookingCode,
        next: BookingStatus,
    ) -> Result<BookingRecord, BookingsServiceError>;

    /// Completes every lapsed rental. Returns how many were completed.
    async fn complete_expired(&self) -> Result<u64, BookingsServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use sewa::{checkout::RequestedLine, stock::StockError};
    use testresult::TestResult;

    use crate::{
        domain::{carts::CartsService, catalog::CatalogService},
        test::{
            TestContext,
            helpers::{create_customer, new_item, set_status},
        },
    };

    use super::*;

    fn request(pickup: Date, days: i64, lines: &[(&str, u32)]) -> TestResult<BookingRequest> {
        Ok(BookingRequest::new(
            pickup,
            pickup.checked_add(days.days())?,
            lines
                .iter()
                .map(|(item, quantity)| RequestedLine {
                    item_id: (*item).into(),
                    quantity: *quantity,
                })
                .collect(),
        )?)
    }

    #[tokio::test]
    async fn create_booking_prices_and_persists_lines() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();

        ctx.catalog.create_item(new_item("gatotkaca", 5, 350_000)).await?;

        let record = ctx
            .bookings
            .create_booking(customer, request(today.checked_add(2.days())?, 5, &[("gatotkaca", 2)])?)
            .await?;

        assert_eq!(record.customer, customer);
        assert_eq!(record.booking.status, BookingStatus::Pending);
        assert_eq!(record.booking.total_price, 2 * 490_000);
        assert_eq!(record.booking.quantity_of(&"gatotkaca".into()), 2);
        assert!(record.booking.code.as_str().starts_with("TRX-"));

        Ok(())
    }

    #[tokio::test]
    async fn create_booking_beyond_stock_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();
        let pickup = today.checked_add(1.days())?;

        ctx.catalog.create_item(new_item("item-x", 5, 350_000)).await?;

        ctx.bookings
            .create_booking(customer, request(pickup, 3, &[("item-x", 2)])?)
            .await?;
        ctx.bookings
            .create_booking(customer, request(pickup, 3, &[("item-x", 3)])?)
            .await?;

        let result = ctx
            .bookings
            .create_booking(customer, request(pickup, 3, &[("item-x", 1)])?)
            .await;

        assert!(
            matches!(
                result,
                Err(BookingsServiceError::StockUnavailable(StockError::Unavailable { available: 0, .. }))
            ),
            "expected StockUnavailable, got {result:?}"
        );

        let availability = ctx.bookings.availability(today).await?;

        assert_eq!(availability.booked_quantity(&"item-x".into()), 5);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn create_booking_serialises_last_unit() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let pickup = ctx.calendar.today().checked_add(1.days())?;

        ctx.catalog.create_item(new_item("barong", 1, 400_000)).await?;

        let booking = request(pickup, 3, &[("barong", 1)])?;

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = ctx.bookings.clone();
                let booking = booking.clone();

                tokio::spawn(async move { service.create_booking(customer, booking).await })
            })
            .collect();

        let mut accepted = 0;
        let mut refused = 0;

        for handle in handles {
            match handle.await? {
                Ok(_) => accepted += 1,
                Err(BookingsServiceError::StockUnavailable(_)) => refused += 1,
                Err(error) => return Err(error.into()),
            }
        }

        assert_eq!((accepted, refused), (1, 7));
        assert_eq!(
            ctx.bookings.availability(ctx.calendar.today()).await?.booked_quantity(&"barong".into()),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn refused_checkout_leaves_no_trace() -> TestResult {
        let ctx = TestContext::new().await;
        let sari = create_customer(&ctx, "Sari").await?;
        let budi = create_customer(&ctx, "Budi").await?;
        let pickup = ctx.calendar.today().checked_add(1.days())?;

        ctx.catalog.create_item(new_item("barong", 1, 400_000)).await?;
        ctx.carts.add_item(budi, &"barong".into(), 1).await?;

        ctx.bookings
            .create_booking(sari, request(pickup, 3, &[("barong", 1)])?)
            .await?;

        let result = ctx
            .bookings
            .create_booking(budi, request(pickup, 3, &[("barong", 1)])?)
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::StockUnavailable(_))),
            "expected StockUnavailable, got {result:?}"
        );
        assert!(
            ctx.bookings
                .list_bookings(BookingFilter::for_customer(budi))
                .await?
                .is_empty()
        );
        assert_eq!(ctx.bookings.list_bookings(BookingFilter::default()).await?.len(), 1);

        let cart = ctx.carts.get_cart(budi).await?;

        assert_eq!(
            cart.lines
                .iter()
                .map(|line| (line.entry.item_id.as_str(), line.entry.quantity))
                .collect::<Vec<_>>(),
            vec![("barong", 1)]
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_booking_unknown_item_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let pickup = ctx.calendar.today().checked_add(1.days())?;

        let result = ctx
            .bookings
            .create_booking(customer, request(pickup, 3, &[("missing", 1)])?)
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::UnknownItem(_))),
            "expected UnknownItem, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_booking_clears_the_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let pickup = ctx.calendar.today().checked_add(1.days())?;

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;
        ctx.carts.add_item(customer, &"kebaya".into(), 2).await?;

        ctx.bookings
            .create_booking(customer, request(pickup, 3, &[("kebaya", 2)])?)
            .await?;

        assert!(ctx.carts.get_cart(customer).await?.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn cancelled_booking_releases_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();
        let pickup = today.checked_add(1.days())?;

        ctx.catalog.create_item(new_item("item-x", 5, 350_000)).await?;

        ctx.bookings
            .create_booking(customer, request(pickup, 3, &[("item-x", 2)])?)
            .await?;
        let large = ctx
            .bookings
            .create_booking(customer, request(pickup, 3, &[("item-x", 3)])?)
            .await?;

        ctx.bookings
            .transition_booking(&large.booking.code, BookingStatus::Cancelled)
            .await?;

        let availability = ctx.bookings.availability(today).await?;

        assert_eq!(availability.booked_quantity(&"item-x".into()), 2);

        Ok(())
    }

    #[tokio::test]
    async fn bookings_outside_lead_in_do_not_hold_stock() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();

        ctx.catalog.create_item(new_item("item-x", 5, 350_000)).await?;

        ctx.bookings
            .create_booking(customer, request(today.checked_add(4.days())?, 2, &[("item-x", 1)])?)
            .await?;
        ctx.bookings
            .create_booking(customer, request(today.checked_add(6.days())?, 2, &[("item-x", 2)])?)
            .await?;

        let availability = ctx.bookings.availability(today).await?;

        assert_eq!(availability.booked_quantity(&"item-x".into()), 1);

        Ok(())
    }

    #[tokio::test]
    async fn lazy_expiry_completes_once() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;

        let record = ctx
            .bookings
            .create_booking(customer, request(today.checked_add(1.days())?, 3, &[("kebaya", 1)])?)
            .await?;
        let code = record.booking.code.clone();

        // Rewind the rental so it ended yesterday while still out on rent.
        set_status(
            &ctx,
            &code,
            BookingStatus::OutOnRent,
            today.checked_sub(4.days())?,
            today.checked_sub(1.days())?,
        )
        .await?;

        let first = ctx.bookings.get_booking(&code, Some(customer)).await?;
        let second = ctx.bookings.get_booking(&code, Some(customer)).await?;

        assert_eq!(first.booking.status, BookingStatus::Completed);
        assert_eq!(second.booking.status, BookingStatus::Completed);
        assert_eq!(
            first.updated_at, second.updated_at,
            "second read must not write again"
        );

        Ok(())
    }

    #[tokio::test]
    async fn completed_filter_lists_lapsed_rentals_on_first_read() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;

        let record = ctx
            .bookings
            .create_booking(customer, request(today.checked_add(1.days())?, 3, &[("kebaya", 1)])?)
            .await?;

        set_status(
            &ctx,
            &record.booking.code,
            BookingStatus::OutOnRent,
            today.checked_sub(5.days())?,
            today.checked_sub(2.days())?,
        )
        .await?;

        let completed = ctx
            .bookings
            .list_bookings(BookingFilter::for_customer(customer).with_status(Some(BookingStatus::Completed)))
            .await?;

        assert_eq!(completed.len(), 1);
        assert_eq!(completed.first().map(|r| r.booking.status), Some(BookingStatus::Completed));

        let out_on_rent = ctx
            .bookings
            .list_bookings(BookingFilter::for_customer(customer).with_status(Some(BookingStatus::OutOnRent)))
            .await?;

        assert!(out_on_rent.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn any_status_filter_expires_lapsed_rentals() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;

        let record = ctx
            .bookings
            .create_booking(customer, request(today.checked_add(1.days())?, 3, &[("kebaya", 1)])?)
            .await?;

        set_status(
            &ctx,
            &record.booking.code,
            BookingStatus::OutOnRent,
            today.checked_sub(5.days())?,
            today.checked_sub(1.days())?,
        )
        .await?;

        ctx.bookings
            .list_bookings(BookingFilter::for_customer(customer).with_status(Some(BookingStatus::Pending)))
            .await?;

        // Nothing left for the sweep: the filtered read already completed it.
        assert_eq!(ctx.bookings.complete_expired().await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn customers_only_see_their_own_bookings() -> TestResult {
        let ctx = TestContext::new().await;
        let sari = create_customer(&ctx, "Sari").await?;
        let budi = create_customer(&ctx, "Budi").await?;
        let pickup = ctx.calendar.today().checked_add(1.days())?;

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;

        let record = ctx
            .bookings
            .create_booking(sari, request(pickup, 3, &[("kebaya", 1)])?)
            .await?;

        let result = ctx.bookings.get_booking(&record.booking.code, Some(budi)).await;

        assert!(
            matches!(result, Err(BookingsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
        assert!(
            ctx.bookings
                .list_bookings(BookingFilter::for_customer(budi))
                .await?
                .is_empty()
        );
        assert_eq!(
            ctx.bookings.list_bookings(BookingFilter::default()).await?.len(),
            1
        );

        Ok(())
    }

    #[tokio::test]
    async fn invalid_transition_is_refused() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let pickup = ctx.calendar.today().checked_add(1.days())?;

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;

        let record = ctx
            .bookings
            .create_booking(customer, request(pickup, 3, &[("kebaya", 1)])?)
            .await?;

        let result = ctx
            .bookings
            .transition_booking(&record.booking.code, BookingStatus::Completed)
            .await;

        assert!(
            matches!(result, Err(BookingsServiceError::InvalidTransition(_))),
            "expected InvalidTransition, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn sweep_completes_lapsed_rentals() -> TestResult {
        let ctx = TestContext::new().await;
        let customer = create_customer(&ctx, "Sari").await?;
        let today = ctx.calendar.today();

        ctx.catalog.create_item(new_item("kebaya", 5, 150_000)).await?;

        let record = ctx
            .bookings
            .create_booking(customer, request(today.checked_add(1.days())?, 3, &[("kebaya", 1)])?)
            .await?;

        set_status(
            &ctx,
            &record.booking.code,
            BookingStatus::OutOnRent,
            today.checked_sub(5.days())?,
            today.checked_sub(1.days())?,
        )
        .await?;

        assert_eq!(ctx.bookings.complete_expired().await?, 1);
        assert_eq!(ctx.bookings.complete_expired().await?, 0);

        Ok(())
    }
}
