//! Cart Rental Days Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::pricing::RentalDays;

use crate::{
    carts::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct RentalDaysRequest {
    /// 1 to 14
    pub rental_days: u32,
}

/// Cart Rental Days Handler
///
/// Sets the rental duration for every line of the cart and reprices it.
#[endpoint(
    tags("cart"),
    summary = "Set Cart Rental Days",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Duration updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Duration out of range"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<RentalDaysRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let rental_days = RentalDays::new(json.into_inner().rental_days)
        .map_err(|error| into_status_error(error.into()))?;

    let cart = state
        .app
        .carts
        .set_rental_days(session.customer, rental_days)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::from(cart)))
}
