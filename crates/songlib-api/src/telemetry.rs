//! Prometheus request metrics

use std::sync::OnceLock;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::warn;

/// Requests served, labelled by `method`, `endpoint` and `status`
pub const HTTP_REQUESTS_TOTAL: &str = "http_requests_total";

static HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// The process-wide Prometheus recorder handle
///
/// The first call installs the recorder as the global `metrics` recorder.
pub fn prometheus_handle() -> PrometheusHandle {
    HANDLE
        .get_or_init(|| {
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            if metrics::set_global_recorder(recorder).is_err() {
                warn!("metrics recorder already installed elsewhere");
            }
            handle
        })
        .clone()
}

/// Count one served request
pub fn record_request(method: &str, endpoint: &str, status: u16) {
    metrics::counter!(
        HTTP_REQUESTS_TOTAL,
        "method" => method.to_string(),
        "endpoint" => endpoint.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
}
