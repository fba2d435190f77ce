//! Rent Again Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use sewa::bookings::BookingCode;

use crate::{
    carts::{errors::rejection, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Rent Again Handler
///
/// Puts the items of one of the caller's past bookings back into the cart,
/// with the booking's duration.
#[endpoint(
    tags("cart"),
    summary = "Rent Again",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Booking not found"),
        (status_code = StatusCode::CONFLICT, description = "Item fully booked"),
    ),
)]
pub(crate) async fn handler(
    code: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let code = code
        .into_inner()
        .parse::<BookingCode>()
        .or_400("Malformed booking code")?;

    let cart = state
        .app
        .carts
        .rent_again(session.customer, &code)
        .await
        .map_err(rejection("rent_again"))?;

    Ok(Json(CartResponse::from(cart)))
}
