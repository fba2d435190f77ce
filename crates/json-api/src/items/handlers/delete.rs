//! Delete Item Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;

use crate::{extensions::*, items::errors::into_status_error, state::State};

/// Delete Item Handler
///
/// Hides the item from the catalog; past bookings keep their lines.
#[endpoint(
    tags("items"),
    summary = "Delete Item",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Item deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Item not found"),
        (status_code = StatusCode::FORBIDDEN, description = "Admin access required"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let id = id.into_inner();

    state
        .app
        .catalog
        .delete_item(&id.as_str().into())
        .await
        .map_err(into_status_error)?;

    info!(item_id = %id, "item deleted");

    Ok(StatusCode::NO_CONTENT)
}
