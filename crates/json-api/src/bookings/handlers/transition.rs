//! Booking Status Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::bookings::{BookingCode, BookingStatus};
use tracing::info;

use crate::{
    bookings::{errors::into_status_error, handlers::BookingResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct TransitionRequest {
    /// Target status, e.g. `confirmed`
    pub status: String,
}

/// Booking Status Handler
///
/// Moves a booking along its lifecycle. Cancelling releases its stock.
#[endpoint(
    tags("bookings"),
    summary = "Update Booking Status",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Status updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::CONFLICT, description = "Transition not allowed"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
#[tracing::instrument(
    name = "bookings.transition",
    skip_all,
    fields(code = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    code: PathParam<String>,
    json: JsonBody<TransitionRequest>,
    depot: &mut Depot,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let code = code
        .into_inner()
        .parse::<BookingCode>()
        .or_400("Malformed booking code")?;

    tracing::Span::current().record("code", code.as_str());

    let next = json
        .into_inner()
        .status
        .parse::<BookingStatus>()
        .or_400("Unknown booking status")?;

    let record = state
        .app
        .bookings
        .transition_booking(&code, next)
        .await
        .map_err(into_status_error)?;

    info!(status = %record.booking.status, "booking status changed");

    Ok(Json(BookingResponse::from(record)))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use sewa::bookings::TransitionError;
    use sewa_app::domain::bookings::BookingsServiceError;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, admin_service, booking_record, make_booking};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(mocks, Router::with_path("bookings/{code}/status").put(handler))
    }

    #[tokio::test]
    async fn confirms_pending_booking() -> TestResult {
        let booking = make_booking(BookingStatus::Confirmed, date(2026, 10, 25), 3, &[("kebaya", 1)])?;
        let mut mocks = Mocks::default();

        mocks
            .bookings
            .expect_transition_booking()
            .once()
            .withf(|code, next| {
                code.as_str() == "TRX-0042-2026" && *next == BookingStatus::Confirmed
            })
            .return_once(move |_, _| Ok(booking_record(booking)));

        let mut res = TestClient::put("http://example.com/bookings/TRX-0042-2026/status")
            .json(&json!({ "status": "confirmed" }))
            .send(&make_service(mocks))
            .await;

        let body: BookingResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.status, "confirmed");

        Ok(())
    }

    #[tokio::test]
    async fn terminal_booking_returns_409() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .bookings
            .expect_transition_booking()
            .once()
            .return_once(|_, _| {
                Err(BookingsServiceError::InvalidTransition(TransitionError::Terminal(
                    BookingStatus::Cancelled,
                )))
            });

        let res = TestClient::put("http://example.com/bookings/TRX-0042-2026/status")
            .json(&json!({ "status": "confirmed" }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn unknown_status_returns_400() -> TestResult {
        let res = TestClient::put("http://example.com/bookings/TRX-0042-2026/status")
            .json(&json!({ "status": "returned" }))
            .send(&make_service(Mocks::default()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
