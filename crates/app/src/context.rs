//! App Context

use std::sync::Arc;

use sqlx::migrate::MigrateError;
use thiserror::Error;

use crate::{
    auth::{AuthService, PgAuthService},
    calendar::BusinessCalendar,
    database::{self, Db},
    domain::{
        bookings::{BookingsService, PgBookingsService},
        carts::{CartsService, PgCartsService},
        catalog::{CatalogService, PgCatalogService},
        customers::{CustomersService, PgCustomersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to apply migrations")]
    Migrate(#[source] MigrateError),
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub bookings: Arc<dyn BookingsService>,
    pub carts: Arc<dyn CartsService>,
    pub customers: Arc<dyn CustomersService>,
    pub auth: Arc<dyn AuthService>,
    pub calendar: BusinessCalendar,
}

impl AppContext {
    /// Build application context from a database URL, applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns an error when establishing a database connection or migrating fails.
    pub async fn from_database_url(
        url: &str,
        calendar: BusinessCalendar,
    ) -> Result<Self, AppInitError> {
        let pool = database::connect(url)
            .await
            .map_err(AppInitError::Database)?;

        database::migrate(&pool)
            .await
            .map_err(AppInitError::Migrate)?;

        Ok(Self::from_db(Db::new(pool), calendar))
    }

    #[must_use]
    pub fn from_db(db: Db, calendar: BusinessCalendar) -> Self {
        Self {
            catalog: Arc::new(PgCatalogService::new(db.clone())),
            bookings: Arc::new(PgBookingsService::new(db.clone(), calendar.clone())),
            carts: Arc::new(PgCartsService::new(db.clone(), calendar.clone())),
            customers: Arc::new(PgCustomersService::new(db.clone())),
            auth: Arc::new(PgAuthService::new(db)),
            calendar,
        }
    }
}
