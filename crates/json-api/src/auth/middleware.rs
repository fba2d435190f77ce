//! Auth middleware.

use std::sync::Arc;

use salvo::{http::header::AUTHORIZATION, prelude::*};
use sewa_app::auth::AuthServiceError;
use tracing::error;

use crate::{extensions::*, state::State};

/// Resolves the bearer token into a [`sewa_app::auth::Session`] for later handlers.
#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = extract_bearer_token(req) else {
        res.render(StatusError::unauthorized().brief("Missing or invalid Authorization header"));
        ctrl.skip_rest();

        return;
    };

    let Ok(state) = depot.obtain::<Arc<State>>() else {
        res.render(StatusError::internal_server_error());
        ctrl.skip_rest();

        return;
    };

    let session = match state.app.auth.authenticate_bearer(token).await {
        Ok(session) => session,
        Err(AuthServiceError::NotFound) => {
            res.render(StatusError::unauthorized().brief("Invalid API token"));
            ctrl.skip_rest();

            return;
        }
        Err(AuthServiceError::Sql(source)) => {
            error!("failed to validate api token: {source}");

            res.render(StatusError::internal_server_error());
            ctrl.skip_rest();

            return;
        }
    };

    depot.insert_session(session);

    ctrl.call_next(req, depot, res).await;
}

/// Lets only admin sessions through. Must run after [`handler`].
#[salvo::handler]
pub(crate) async fn admin_only(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    match depot.session_or_401() {
        Ok(session) if session.is_admin() => {
            ctrl.call_next(req, depot, res).await;
        }
        Ok(_customer) => {
            res.render(StatusError::forbidden().brief("Admin access required"));
            ctrl.skip_rest();
        }
        Err(status) => {
            res.render(status);
            ctrl.skip_rest();
        }
    }
}

fn extract_bearer_token(req: &Request) -> Option<&str> {
    let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return None;
    }

    Some(token)
}
