//! Test context for service-level integration tests.

use jiff::tz::{TimeZone, offset};

use crate::{
    calendar::BusinessCalendar,
    database::Db,
    domain::{
        bookings::PgBookingsService, carts::PgCartsService, catalog::PgCatalogService,
        customers::PgCustomersService,
    },
};

use super::db::TestDb;

pub struct TestContext {
    pub db: TestDb,
    pub calendar: BusinessCalendar,
    pub catalog: PgCatalogService,
    pub bookings: PgBookingsService,
    pub carts: PgCartsService,
    pub customers: PgCustomersService,
}

impl TestContext {
    pub async fn new() -> Self {
        let test_db = TestDb::new().await;
        let db = Db::new(test_db.pool().clone());

        // Jakarta has no DST, so a fixed +07:00 matches it without tzdata.
        let calendar = BusinessCalendar::new(TimeZone::fixed(offset(7)));

        Self {
            catalog: PgCatalogService::new(db.clone()),
            bookings: PgBookingsService::new(db.clone(), calendar.clone()),
            carts: PgCartsService::new(db.clone(), calendar.clone()),
            customers: PgCustomersService::new(db),
            calendar,
            db: test_db,
        }
    }

    /// A fresh handle on the test database, for services not held by the context.
    pub fn app_db(&self) -> Db {
        Db::new(self.db.pool().clone())
    }
}
