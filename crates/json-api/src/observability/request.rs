//! Request-level logging, request IDs and route normalisation.

use std::time::Instant;

use salvo::{
    Request, handler,
    http::{StatusCode, header::HeaderValue},
    prelude::{Depot, FlowCtrl, Response},
};
use sewa::bookings::BookingCode;
use tracing::{Instrument as _, error, info, warn};
use uuid::Uuid;

use super::{metrics, settings};

const REQUEST_ID_HEADER: &str = "x-request-id";
const REQUEST_ID_DEPOT_KEY: &str = "request_id";

#[handler]
pub(crate) async fn request_logging(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    if req.uri().path() == "/metrics" {
        ctrl.call_next(req, depot, res).await;
        return;
    }

    let started = Instant::now();

    let request_id = req
        .header::<String>(REQUEST_ID_HEADER)
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| Uuid::now_v7().to_string());

    depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

    set_request_id_header(res, &request_id);

    let method = req.method().to_string();
    let path = req.uri().path().to_owned();
    let route = normalise_route(&path);
    let _in_flight = metrics::InFlightRequestGuard::track();

    let span = tracing::info_span!(
        parent: None,
        "http.request",
        request_id = %request_id,
        method = %method,
        route = %route,
        status = tracing::field::Empty,
        duration_ms = tracing::field::Empty
    );

    ctrl.call_next(req, depot, res)
        .instrument(span.clone())
        .await;

    let duration = started.elapsed();
    let status = res.status_code.unwrap_or(StatusCode::OK);
    let duration_ms = duration.as_millis();
    let threshold_ms = u128::from(settings::slow_request_threshold_ms());

    metrics::observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

    span.record("status", status.as_u16());
    span.record("duration_ms", duration_ms);

    span.in_scope(|| {
        info!(status = status.as_u16(), duration_ms, "request.completed");

        if status.is_server_error() {
            error!(status = status.as_u16(), path = %path, "server error response");
        } else if status.is_client_error() {
            warn!(status = status.as_u16(), path = %path, "client error response");
        }

        if duration_ms > threshold_ms {
            warn!(duration_ms, threshold_ms, path = %path, "slow request detected");
        }
    });
}

fn set_request_id_header(res: &mut Response, request_id: &str) {
    match HeaderValue::from_str(request_id) {
        Ok(value) => {
            res.headers_mut().insert(REQUEST_ID_HEADER, value);
        }
        Err(source) => {
            warn!(request_id, "could not encode request id header: {source}");
        }
    }
}

/// Collapses identifiers in `path` so metric labels stay bounded.
fn normalise_route(path: &str) -> String {
    let mut route = String::new();
    let mut previous = "";

    for segment in path.split('/').filter(|segment| !segment.is_empty()) {
        route.push('/');

        let placeholder = if Uuid::parse_str(segment).is_ok() {
            Some("{uuid}")
        } else if segment.parse::<BookingCode>().is_ok() {
            Some("{code}")
        } else if previous == "items" {
            Some("{item_id}")
        } else {
            None
        };

        route.push_str(placeholder.unwrap_or(segment));
        previous = segment;
    }

    if route.is_empty() {
        route.push('/');
    }

    route
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifiers_collapse_to_placeholders() {
        assert_eq!(normalise_route("/"), "/");
        assert_eq!(normalise_route("/items"), "/items");
        assert_eq!(normalise_route("/items/kebaya-01"), "/items/{item_id}");
        assert_eq!(normalise_route("/cart/items/kebaya-01"), "/cart/items/{item_id}");
        assert_eq!(
            normalise_route("/bookings/TRX-0042-2026/status"),
            "/bookings/{code}/status"
        );
        assert_eq!(
            normalise_route("/customers/0192a3b4-0000-7000-8000-000000000000"),
            "/customers/{uuid}"
        );
    }
}
