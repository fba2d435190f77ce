//! Cart Sync Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::{cart::CartEntry, errors::ValidationError, pricing::RentalDays};
use tracing::info;

use crate::{
    carts::{
        errors::{into_status_error, rejection},
        handlers::CartResponse,
    },
    extensions::*,
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct LocalCartEntry {
    pub item_id: String,
    pub quantity: u32,

    /// Defaults to 3 when the client never chose one
    pub rental_days: Option<u32>,
}

impl TryFrom<LocalCartEntry> for CartEntry {
    type Error = ValidationError;

    fn try_from(entry: LocalCartEntry) -> Result<Self, Self::Error> {
        Ok(CartEntry {
            item_id: entry.item_id.into(),
            quantity: entry.quantity,
            rental_days: entry
                .rental_days
                .map(RentalDays::new)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Cart Sync Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct SyncCartRequest {
    /// Cart kept by the client while signed out
    pub entries: Vec<LocalCartEntry>,
}

/// Cart Sync Handler
///
/// Merges the client's signed-out cart into the stored cart after login. For
/// items in both, the client's quantity and duration win; items only on the
/// server stay after the client's items.
#[endpoint(
    tags("cart"),
    summary = "Sync Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Carts merged"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::CONFLICT, description = "Item fully booked"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<SyncCartRequest>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let local = json
        .into_inner()
        .entries
        .into_iter()
        .map(CartEntry::try_from)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|error| into_status_error(error.into()))?;

    let synced = local.len();

    let cart = state
        .app
        .carts
        .sync(session.customer, local)
        .await
        .map_err(rejection("cart_sync"))?;

    info!(synced, lines = cart.lines.len(), "cart synced");

    Ok(Json(CartResponse::from(cart)))
}
