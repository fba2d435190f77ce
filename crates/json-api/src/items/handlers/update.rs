//! Update Item Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use sewa::catalog::Category;

use sewa_app::domain::catalog::data::ItemUpdate;

use crate::{
    extensions::*,
    items::{errors::into_status_error, get::ItemResponse},
    state::State,
};

/// Update Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateItemRequest {
    pub name: String,
    pub category: String,
    pub price: u64,
    pub nominal_stock: u32,
}

impl TryFrom<UpdateItemRequest> for ItemUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateItemRequest) -> Result<Self, Self::Error> {
        Ok(ItemUpdate {
            name: request.name,
            category: request.category.parse::<Category>().or_400("Unknown category")?,
            price: request.price,
            nominal_stock: request.nominal_stock,
        })
    }
}

/// Update Item Handler
///
/// Booked lines keep the price they were booked at.
#[endpoint(
    tags("items"),
    summary = "Update Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
#[tracing::instrument(
    name = "items.update",
    skip(id, json, depot),
    fields(item_id = tracing::field::Empty, price = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    json: JsonBody<UpdateItemRequest>,
    depot: &mut Depot,
) -> Result<Json<ItemResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let id = id.into_inner();
    let update = ItemUpdate::try_from(json.into_inner())?;

    let span = tracing::Span::current();

    span.record("item_id", id.as_str());
    span.record("price", update.price);

    let record = state
        .app
        .catalog
        .update_item(&id.into(), update)
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

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::json;
    use sewa::availability::Availability;
    use sewa_app::domain::catalog::CatalogServiceError;
    use testresult::TestResult;

    use crate::test_helpers::{Mocks, admin_service, make_item};

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        admin_service(mocks, Router::with_path("items/{id}").put(handler))
    }

    #[tokio::test]
    async fn updates_item() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_update_item()
            .once()
            .withf(|id, update| id.as_str() == "kebaya" && update.nominal_stock == 6)
            .return_once(|_, _| Ok(make_item("kebaya", 6, 175_000)));

        mocks
            .bookings
            .expect_availability()
            .once()
            .return_once(|_| Ok(Availability::default()));

        let response: ItemResponse = TestClient::put("http://example.com/items/kebaya")
            .json(&json!({
                "name": "Kostum kebaya",
                "category": "fullset",
                "price": 175_000,
                "nominal_stock": 6,
            }))
            .send(&make_service(mocks))
            .await
            .take_json()
            .await?;

        assert_eq!(response.price, 175_000);
        assert_eq!(response.nominal_stock, 6);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_item_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .catalog
            .expect_update_item()
            .once()
            .return_once(|_, _| Err(CatalogServiceError::NotFound));

        let res = TestClient::put("http://example.com/items/missing")
            .json(&json!({
                "name": "Kostum",
                "category": "accessory",
                "price": 10_000,
                "nominal_stock": 1,
            }))
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
