//! Get Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_status_error, handlers::CartResponse},
    extensions::*,
    state::State,
};

/// Get Cart Handler
#[endpoint(tags("cart"), summary = "Get Cart", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let session = depot.session_or_401()?;

    let cart = state
        .app
        .carts
        .get_cart(session.customer)
        .await
        .map_err(into_status_error)?;

    Ok(Json(CartResponse::from(cart)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::{
        carts::handlers::tests::{empty_cart, make_cart},
        test_helpers::{Mocks, TEST_CUSTOMER, customer_service},
    };

    use super::*;

    fn make_service(mocks: Mocks) -> Service {
        customer_service(mocks, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn returns_priced_cart() -> TestResult {
        let cart = make_cart("gatotkaca", 2, 5, 490_000)?;
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_get_cart()
            .once()
            .withf(|customer| *customer == TEST_CUSTOMER)
            .return_once(move |_| Ok(cart));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(mocks))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.rental_days, 5);
        assert_eq!(body.subtotal, 980_000);
        assert_eq!(body.lines.first().map(|l| l.rental_price), Some(490_000));

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_defaults_to_three_days() -> TestResult {
        let mut mocks = Mocks::default();

        mocks
            .carts
            .expect_get_cart()
            .once()
            .return_once(|_| Ok(empty_cart()));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(mocks))
            .await;

        let body: CartResponse = res.take_json().await?;

        assert!(body.lines.is_empty());
        assert_eq!(body.rental_days, 3);
        assert_eq!(body.subtotal, 0);

        Ok(())
    }
}
