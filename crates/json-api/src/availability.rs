//! Availability Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct BookedQuantity {
    pub item_id: String,
    pub booked_quantity: u32,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AvailabilityResponse {
    /// Business date the quantities hold for
    pub as_of: String,

    /// Items with at least one unit committed, ordered by id
    pub items: Vec<BookedQuantity>,
}

/// Availability Handler
///
/// Units committed per item on `as_of` (default: today on the business calendar).
#[endpoint(
    tags("availability"),
    summary = "Booked Quantities",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Booked quantities"),
        (status_code = StatusCode::BAD_REQUEST, description = "Malformed date"),
    ),
)]
pub(crate) async fn handler(
    as_of: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<AvailabilityResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _session = depot.session_or_401()?;
    let as_of = as_of.into_as_of(&state.app.calendar)?;

    let availability = state
        .app
        .bookings
        .availability(as_of)
        .await
        .or_500("failed to compute availability")?;

    let mut items: Vec<BookedQuantity> = availability
        .iter()
        .map(|(item, booked_quantity)| BookedQuantity {
            item_id: item.to_string(),
            booked_quantity,
        })
        .collect();

    items.sort_by(|a, b| a.item_id.cmp(&b.item_id));

    Ok(Json(AvailabilityResponse {
        as_of: as_of.to_string(),
        items,
    }))
}
