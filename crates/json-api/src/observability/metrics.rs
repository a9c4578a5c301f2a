//! Prometheus request metrics and the `/metrics` scrape endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder as _, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder,
};
use salvo::{
    Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const DURATION_BUCKETS: [f64; 12] = [
    0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

#[derive(Debug)]
struct RequestMetrics {
    registry: Registry,
    requests: IntCounterVec,
    duration: HistogramVec,
    in_flight: IntGauge,
}

static REQUEST_METRICS: OnceLock<Option<RequestMetrics>> = OnceLock::new();

fn request_metrics() -> Option<&'static RequestMetrics> {
    REQUEST_METRICS
        .get_or_init(|| match RequestMetrics::register() {
            Ok(metrics) => Some(metrics),
            Err(source) => {
                error!("failed to register request metrics: {source}");
                None
            }
        })
        .as_ref()
}

impl RequestMetrics {
    fn register() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("atelier".to_string()), None)?;

        let requests = IntCounterVec::new(
            Opts::new(
                "http_requests_total",
                "HTTP requests by method, route and response status.",
            ),
            &["method", "route", "status"],
        )?;

        let duration = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request latency by method and route.",
            )
            .buckets(DURATION_BUCKETS.to_vec()),
            &["method", "route"],
        )?;

        let in_flight = IntGauge::new(
            "http_requests_in_flight",
            "HTTP requests currently being served.",
        )?;

        registry.register(Box::new(requests.clone()))?;
        registry.register(Box::new(duration.clone()))?;
        registry.register(Box::new(in_flight.clone()))?;

        Ok(Self {
            registry,
            requests,
            duration,
            in_flight,
        })
    }
}

/// Counts a request as in flight until dropped.
#[derive(Debug)]
pub(super) struct InFlight {
    gauge: Option<&'static IntGauge>,
}

impl InFlight {
    pub(super) fn start() -> Self {
        let gauge = request_metrics().map(|metrics| &metrics.in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self { gauge }
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        if let Some(gauge) = self.gauge {
            gauge.dec();
        }
    }
}

pub(super) fn record_request(method: &str, route: &str, status: u16, seconds: f64) {
    let Some(metrics) = request_metrics() else {
        return;
    };

    let status = status.to_string();

    metrics
        .requests
        .with_label_values(&[method, route, status.as_str()])
        .inc();

    metrics
        .duration
        .with_label_values(&[method, route])
        .observe(seconds);
}

/// Render every registered metric in the Prometheus text format.
#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let Some(metrics) = request_metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    let encoder = TextEncoder::new();
    let mut body = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut body) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    }

    match HeaderValue::from_str(encoder.format_type()) {
        Ok(content_type) => {
            res.headers_mut().insert(CONTENT_TYPE, content_type);
        }
        Err(source) => error!("invalid metrics content type: {source}"),
    }

    res.render(String::from_utf8_lossy(&body).into_owned());
}
