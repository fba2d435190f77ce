//! App Router

use salvo::Router;

use crate::{auth, availability, bookings, carts, items};

/// Every authenticated route. Catalog writes and status changes sit behind
/// the admin gate; when the method does not match, routing falls through to
/// the admin group.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(Router::with_path("availability").get(availability::handler))
        .push(
            Router::with_path("items")
                .get(items::index::handler)
                .push(Router::with_path("{id}").get(items::get::handler)),
        )
        .push(
            Router::with_path("bookings")
                .get(bookings::index::handler)
                .post(bookings::create::handler)
                .push(
                    Router::with_path("{code}")
                        .get(bookings::get::handler)
                        .push(Router::with_path("rent-again").post(carts::rent_again::handler)),
                ),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .push(
                    Router::with_path("items").post(carts::add::handler).push(
                        Router::with_path("{item_id}")
                            .put(carts::update::handler)
                            .delete(carts::remove::handler),
                    ),
                )
                .push(Router::with_path("rental-days").put(carts::rental_days::handler))
                .push(Router::with_path("sync").post(carts::sync::handler)),
        )
        .push(admin_router())
}

fn admin_router() -> Router {
    Router::new()
        .hoop(auth::middleware::admin_only)
        .push(
            Router::with_path("items").post(items::create::handler).push(
                Router::with_path("{id}")
                    .put(items::update::handler)
                    .delete(items::delete::handler),
            ),
        )
        .push(Router::with_path("bookings/{code}/status").put(bookings::transition::handler))
}
