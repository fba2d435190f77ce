//! Update Cart Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{errors::rejection, handlers::CartResponse},
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartItemRequest {
    /// New number of units, at least 1
    pub quantity: u32,
}

/// Update Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Set Cart Item Quantity",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not in cart"),
        (status_code = StatusCode::CONFLICT, description = "Item fully booked"),
    ),
)]
pub(crate) async fn handler(
    item_id: PathParam<String>,
    json: JsonBody<UpdateCartItemRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let cart = state
        .app
        .carts
        .set_quantity(
            session.customer,
            &item_id.into_inner().into(),
            json.into_inner().quantity,
        )
        .await
        .map_err(rejection("cart_update"))?;

    Ok(Json(CartResponse::from(cart)))
}
