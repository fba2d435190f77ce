//! Item Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, items::get::ItemResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemsResponse {
    /// Live catalog items, ordered by id
    pub items: Vec<ItemResponse>,
}

/// Item Index Handler
///
/// Lists the catalog with today's effective stock per item.
#[endpoint(tags("items"), summary = "List Items", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ItemsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _session = depot.session_or_401()?;

    let records = state
        .app
        .catalog
        .list_items()
        .await
        .or_500("failed to fetch items")?;

    let availability = state
        .app
        .bookings
        .availability(state.app.calendar.today())
        .await
        .or_500("failed to compute availability")?;

    Ok(Json(ItemsResponse {
        items: records
            .into_iter()
            .map(|record| ItemResponse::new(record.item, &availability))
            .collect(),
    }))
}
