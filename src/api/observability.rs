use crate::api::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    http::HeaderValue,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{Instrument, info, info_span};
use uuid::Uuid;

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.prometheus_handle.as_ref().map_or_else(
        || "Metrics not enabled or failed to initialize".to_string(),
        metrics_exporter_prometheus::PrometheusHandle::render,
    )
}

/// Coarse portal area for a route, used as a low-cardinality label.
#[must_use]
pub fn route_area(route: &str) -> &'static str {
    let route = route.strip_prefix("/api").unwrap_or(route);
    if route.starts_with("/auth") {
        "auth"
    } else if route.ends_with("/import") {
        "import"
    } else if route.starts_with("/suppliers") {
        "supplier"
    } else if route.starts_with("/images") || route.starts_with("/csv") {
        "catalog"
    } else if route.starts_with("/history") {
        "history"
    } else if route.starts_with("/session") {
        "session"
    } else if route.starts_with("/system") || route.starts_with("/metrics") {
        "system"
    } else {
        "other"
    }
}

/// Emits one wide event and the HTTP metrics for every request.
///
/// `user_id` is filled in by the auth middleware with the session email.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().to_string();
    let uri = req.uri().path().to_string();

    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());

    let user_agent = req
        .headers()
        .get("user-agent")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let area = route_area(matched_path.as_deref().unwrap_or(&uri));

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %uri,
        route = matched_path.clone(),
        area = area,
        user_id = tracing::field::Empty,
    );

    async move {
        let response = next.run(req).await;

        let elapsed = start.elapsed();
        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        let status = response.status().as_u16();

        let outcome = match status {
            500.. => "error",
            400..500 => "client_error",
            _ => "success",
        };

        // Route templates keep label cardinality bounded.
        let metrics_path = matched_path.as_deref().unwrap_or(&uri);

        let labels = [
            ("method", method.clone()),
            ("path", metrics_path.to_string()),
            ("status", status.to_string()),
            ("area", area.to_string()),
        ];

        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!("http_request_duration_seconds", &labels)
            .record(elapsed.as_secs_f64());

        info!(
            event = "http_request_finished",
            duration_ms = duration_ms,
            status_code = status,
            user_agent = %user_agent,
            outcome = %outcome,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}

pub async fn security_headers_middleware(req: Request, next: Next) -> Response {
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        "x-content-type-options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("x-frame-options", HeaderValue::from_static("DENY"));
    headers.insert(
        "referrer-policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "content-security-policy",
        HeaderValue::from_static(
            "default-src 'self'; img-src 'self' data: blob:; frame-ancestors 'none'; base-uri 'self'",
        ),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_area() {
        assert_eq!(route_area("/api/auth/login"), "auth");
        assert_eq!(route_area("/api/suppliers/{supplier}/images/import"), "import");
        assert_eq!(route_area("/api/suppliers/{supplier}/csv/import"), "import");
        assert_eq!(route_area("/api/suppliers/{supplier}/clusters"), "supplier");
        assert_eq!(route_area("/api/images/{filename}"), "catalog");
        assert_eq!(route_area("/api/csv"), "catalog");
        assert_eq!(route_area("/api/history"), "history");
        assert_eq!(route_area("/api/system/health/live"), "system");
        assert_eq!(route_area("/favicon.ico"), "other");
    }
}
