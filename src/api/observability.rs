//! Request logging and the Prometheus scrape endpoint.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::{Instrument, info, info_span, warn};
use uuid::Uuid;

use crate::api::AppState;

pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.prometheus_handle.as_ref() {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics recorder is not installed").into_response(),
    }
}

/// Which library a request path belongs to. Everything outside the three
/// catalogs is `system`.
fn catalog_label(path: &str) -> &'static str {
    let section = path
        .trim_start_matches('/')
        .trim_start_matches("api/")
        .split('/')
        .next()
        .unwrap_or_default();

    match section {
        "anime" => "anime",
        "manga" => "manga",
        "movies" => "movies",
        _ => "system",
    }
}

fn outcome(status: StatusCode) -> &'static str {
    if status.is_server_error() {
        "error"
    } else if status.is_client_error() {
        "client_error"
    } else {
        "success"
    }
}

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let request_id = Uuid::new_v4();

    let method = req.method().clone();
    let path = req.uri().path().to_string();
    // Unmatched paths collapse into one label value.
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or_else(|| "unmatched".to_string(), |mp| mp.as_str().to_string());
    let catalog = catalog_label(&path);

    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %method,
        path = %path,
        catalog,
    );

    async move {
        let response = next.run(req).await;
        let status = response.status();
        let elapsed = start.elapsed();

        let labels = [
            ("catalog", catalog.to_string()),
            ("route", route.clone()),
            ("method", method.to_string()),
            ("status", status.as_u16().to_string()),
        ];
        metrics::counter!("http_requests_total", &labels).increment(1);
        metrics::histogram!(
            "http_request_duration_seconds",
            "catalog" => catalog,
            "route" => route,
        )
        .record(elapsed.as_secs_f64());

        let duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        if status.is_server_error() {
            warn!(duration_ms, status_code = status.as_u16(), "Request failed");
        } else {
            info!(
                duration_ms,
                status_code = status.as_u16(),
                outcome = outcome(status),
                "Request finished"
            );
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_label() {
        assert_eq!(catalog_label("/api/anime"), "anime");
        assert_eq!(catalog_label("/api/anime/item"), "anime");
        assert_eq!(catalog_label("/api/manga/reload"), "manga");
        assert_eq!(catalog_label("/api/movies/item"), "movies");
        assert_eq!(catalog_label("/api/health"), "system");
        assert_eq!(catalog_label("/api/metrics"), "system");
        assert_eq!(catalog_label("/"), "system");
        assert_eq!(catalog_label("/api/animes"), "system");
    }

    #[test]
    fn test_outcome() {
        assert_eq!(outcome(StatusCode::OK), "success");
        assert_eq!(outcome(StatusCode::NOT_FOUND), "client_error");
        assert_eq!(outcome(StatusCode::BAD_GATEWAY), "error");
    }
}
