//! Create Booking Handler

use std::sync::Arc;

use jiff::civil::Date;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::checkout::{BookingRequest, RequestedLine};
use tracing::info;

use sewa_app::domain::bookings::BookingsServiceError;

use crate::{
    bookings::{errors::into_status_error, handlers::BookingResponse},
    extensions::*,
    observability::{record_booking_created, record_stock_rejection},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RequestedLineRequest {
    pub item_id: String,
    pub quantity: u32,
}

/// Create Booking Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateBookingRequest {
    /// `YYYY-MM-DD`
    pub pickup_date: String,

    /// `YYYY-MM-DD`, after `pickup_date`
    pub return_date: String,

    pub lines: Vec<RequestedLineRequest>,
}

impl TryFrom<CreateBookingRequest> for BookingRequest {
    type Error = StatusError;

    fn try_from(request: CreateBookingRequest) -> Result<Self, Self::Error> {
        let pickup = request
            .pickup_date
            .parse::<Date>()
            .or_400("could not parse \"pickup_date\"")?;
        let return_date = request
            .return_date
            .parse::<Date>()
            .or_400("could not parse \"return_date\"")?;

        let lines = request
            .lines
            .into_iter()
            .map(|line| RequestedLine {
                item_id: line.item_id.into(),
                quantity: line.quantity,
            })
            .collect();

        BookingRequest::new(pickup, return_date, lines)
            .map_err(|error| into_status_error(error.into()))
    }
}

/// Create Booking Handler
///
/// Books the requested items for the requested period. Every line must fit
/// today's effective stock; the customer's cart is emptied on success.
#[endpoint(
    tags("bookings"),
    summary = "Create Booking",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Booking created"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Item fully booked"),
    ),
)]
#[tracing::instrument(
    name = "bookings.create",
    skip(json, depot, res),
    fields(customer = tracing::field::Empty, lines = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateBookingRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;
    let request = BookingRequest::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("customer", tracing::field::display(session.customer));
    span.record("lines", request.lines().len());

    let record = match state.app.bookings.create_booking(session.customer, request).await {
        Ok(record) => record,
        Err(error @ BookingsServiceError::StockUnavailable(_)) => {
            record_stock_rejection("checkout");

            return Err(into_status_error(error));
        }
        Err(error) => return Err(into_status_error(error)),
    };

    record_booking_created();

    info!(code = %record.booking.code, total = record.booking.total_price, "booking created");

    res.add_header(LOCATION, format!("/bookings/{}", record.booking.code), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(BookingResponse::from(record)))
}
