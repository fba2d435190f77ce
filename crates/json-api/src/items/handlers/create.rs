//! Create Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::{availability::Availability, catalog::Category};

use sewa_app::domain::catalog::data::NewItem;

use crate::{
    extensions::*,
    items::{errors::into_status_error, get::ItemResponse},
    state::State,
};

/// Create Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateItemRequest {
    pub id: String,
    pub name: String,
    /// `fullset` or `accessory`
    pub category: String,
    pub price: u64,
    pub nominal_stock: u32,
}

impl TryFrom<CreateItemRequest> for NewItem {
    type Error = StatusError;

    fn try_from(request: CreateItemRequest) -> Result<Self, Self::Error> {
        Ok(NewItem {
            id: request.id.into(),
            name: request.name,
            category: request.category.parse::<Category>().or_400("Unknown category")?,
            price: request.price,
            nominal_stock: request.nominal_stock,
        })
    }
}

/// Create Item Handler
#[endpoint(
    tags("items"),
    summary = "Create Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Item created"),
        (status_code = StatusCode::CONFLICT, description = "Item already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
#[tracing::instrument(
    name = "items.create",
    skip(json, depot, res),
    fields(item_id = tracing::field::Empty, nominal_stock = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let new_item = NewItem::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("item_id", tracing::field::display(&new_item.id));
    span.record("nominal_stock", new_item.nominal_stock);

    let record = state
        .app
        .catalog
        .create_item(new_item)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/items/{}", record.item.id), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    // A new item has no bookings yet.
    Ok(Json(ItemResponse::new(record.item, &Availability::default())))
}
