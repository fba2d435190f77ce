//! Remove Cart Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};

use crate::{
    carts::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Remove Cart Item Handler
#[endpoint(
    tags("cart"),
    summary = "Remove Item from Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Item removed"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not in cart"),
    ),
)]
pub(crate) async fn handler(
    item_id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let cart = state
        .app
        .carts
        .remove_item(session.customer, &item_id.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::from(cart)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use sewa_app::domain::carts::CartsServiceError;
    use testresult::TestResult;

    use crate::{
        carts::handlers::tests::empty_cart,
        test_helpers::{Mocks, customer_service},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("cart/items/{item_id}").delete(handler))
    }

    #[tokio::test]
    async fn removes_item() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_remove_item()
            .once()
            .withf(|_, item| item.as_str() == "kebaya")
            .return_once(|_, _| Ok(empty_cart()));

        let mut res = TestClient::delete("http://example.com/cart/items/kebaya")
            .send(&make_service(mocks))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.lines.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn missing_item_returns_404() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete("http://example.com/cart/items/kebaya")
            .send(&make_service(mocks))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
