//! Get Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::{availability::Availability, catalog::CatalogItem};

use crate::{extensions::*, items::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ItemResponse {
    /// Item identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// `fullset` or `accessory`
    pub category: String,

    /// Base price for a standard rental, in rupiah
    pub price: u64,

    /// Units owned
    pub nominal_stock: u32,

    /// Units not committed to bookings around today
    pub effective_stock: u32,
}

impl ItemResponse {
    pub(crate) fn new(item: CatalogItem, availability: &Availability) -> Self {
        let effective_stock = availability.effective_stock(&item);

        Self {
            id: item.id.to_string(),
            name: item.name,
            category: item.category.to_string(),
            price: item.price,
            nominal_stock: item.nominal_stock,
            effective_stock,
        }
    }
}

/// Get Item Handler
///
/// Returns one catalog item with today's effective stock.
#[endpoint(
    tags("items"),
    summary = "Get Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item found"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<ItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let _session = depot.session_or_401()?;

    let record = state
        .app
        .catalog
        .get_item(&id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    let availability = state
        .app
        .bookings
        .availability(state.app.calendar.today())
        .await
        .or_500("failed to compute availability")?;

    Ok(Json(ItemResponse::new(record.item, &availability)))
}
