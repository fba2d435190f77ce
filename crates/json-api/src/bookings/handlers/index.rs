//! Booking Index Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::bookings::BookingStatus;

use sewa_app::domain::bookings::data::BookingFilter;

use crate::{
    bookings::{errors::into_status_error, handlers::BookingResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookingsResponse {
    /// Newest first
    pub bookings: Vec<BookingResponse>,
}

/// Booking Index Handler
///
/// Lists the caller's bookings, or every booking for admins. Statuses reflect
/// rentals that have lapsed since they were last read.
#[endpoint(
    tags("bookings"),
    summary = "List Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Bookings"),
        (status_code = StatusCode::BAD_REQUEST, description = "Unknown status filter"),
    ),
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<BookingsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let status = status
        .into_inner()
        .map(|value| value.parse::<BookingStatus>())
        .transpose()
        .or_400("Unknown booking status")?;

    let filter = if session.is_admin() {
        BookingFilter::default()
    } else {
        BookingFilter::for_customer(session.customer)
    };

    let records = state
        .app
        .bookings
        .list_bookings(filter.with_status(status))
        .await
        .map_err(into_status_error)?;

    Ok(Json(BookingsResponse {
        bookings: records.into_iter().map(BookingResponse::from).collect(),
    }))
}
