//! Get Booking Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use sewa::bookings::BookingCode;

use crate::{
    bookings::{errors::into_status_error, handlers::BookingResponse},
    extensions::*,
    state::State,
};

/// Get Booking Handler
///
/// Customers only see their own bookings; admins see any booking.
#[endpoint(
    tags("bookings"),
    summary = "Get Booking",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Booking found"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<BookingResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let code = code
        .into_inner()
        .parse::<BookingCode>()
        .or_400("Malformed booking code")?;

    let owner = (!session.is_admin()).then_some(session.customer);

    let record = state
        .app
        .bookings
        .get_booking(&code, owner)
        .await
        .map_err(into_status_error)?;

    Ok(Json(BookingResponse::from(record)))
}

#[cfg(test)]
mod tests {
    use jiff::civil::date;
    use salvo::test::{ResponseExt, TestClient};
    use sewa::bookings::BookingStatus;
    use sewa_app::domain::bookings::BookingsServiceError;
    use testresult::TestResult;

    use crate::test_helpers::{
        Mocks, TEST_CUSTOMER, admin_service, booking_record, customer_service, make_booking,
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("bookings/{code}").get(handler)
    }

    #[tokio::test]
    async fn customer_lookup_is_scoped_to_owner() -> TestResult {
        let booking = make_booking(BookingStatus::Confirmed, date(2026, 10, 25), 3, &[("kebaya", 1)])?;
        let mut mocks = Mocks::default();

        mocks
            .bookings
            .expect_get_booking()
            .once()
            .withf(|code, owner| code.as_str() == "TRX-0042-2026" && *owner == Some(TEST_CUSTOMER))
            .return_once(move |_, _| Ok(booking_record(booking)));

        let mut res = TestClient::get("http://example.com/bookings/TRX-0042-2026")
            .send(&customer_service(mocks, route()))
            .await;

        let body: BookingResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.code, "TRX-0042-2026");
        assert_eq!(body.status_label, "Konfirmasi");
        assert_eq!(body.pickup_date, "2026-10-25");
        assert_eq!(body.return_date, "2026-10-28");
        assert_eq!(body.lines.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn admin_lookup_is_unscoped() -> TestResult {
        let booking = make_booking(BookingStatus::Pending, date(2026, 10, 25), 3, &[("kebaya", 1)])?;
        let mut mocks = Mocks::default();

        mocks
            .bookings
            .expect_get_booking()
            .once()
            .withf(|_, owner| owner.is_none())
            .return_once(move |_, _| Ok(booking_record(booking)));

        let res = TestClient::get("http://example.com/bookings/TRX-0042-2026")
            .send(&admin_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn missing_booking_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .bookings
            .expect_get_booking()
            .once()
            .return_once(|_, _| Err(BookingsServiceError::NotFound));

        let res = TestClient::get("http://example.com/bookings/TRX-9999-2026")
            .send(&customer_service(mocks, route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn malformed_code_returns_400() -> TestResult {
        let res = TestClient::get("http://example.com/bookings/ORDER-1")
            .send(&customer_service(Mocks::default(), route()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
