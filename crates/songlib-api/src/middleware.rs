//! Request logging middleware

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{info_span, Instrument};

use songlib_core::log_op_end;
use songlib_core_types::RequestId;

use crate::telemetry;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Log and count every request with its method, path, status and duration
///
/// Reuses an inbound `x-request-id` or mints one, exposes it to handlers as a
/// request extension and echoes it on the response.
pub async fn request_logger(mut req: Request, next: Next) -> Response {
    let request_id = req
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.trim().is_empty())
        .map(|v| RequestId::from_string(v.to_string()))
        .unwrap_or_default();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| path.clone());
    req.extensions_mut().insert(request_id.clone());

    let start = Instant::now();
    let span = info_span!("request", request_id = %request_id);
    let mut response = next.run(req).instrument(span).await;

    log_op_end!(
        "http_request",
        duration_ms = start.elapsed().as_millis() as u64,
        request_id = %request_id,
        method = %method,
        path = %path,
        status = response.status().as_u16()
    );

    telemetry::record_request(method.as_str(), &endpoint, response.status().as_u16());

    if let Ok(value) = HeaderValue::from_str(request_id.as_str()) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
