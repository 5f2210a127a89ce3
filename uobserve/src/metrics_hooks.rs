//! Metrics-based gateway hooks.
//!
//! ```rust
//! use uobserve::MetricsGatewayHooks;
//! use ugateway::GatewayHooks;
//!
//! fn accepts_gateway_hooks(_hooks: &dyn GatewayHooks) {}
//!
//! let hooks = MetricsGatewayHooks;
//! accepts_gateway_hooks(&hooks);
//! ```

use std::time::Duration;

use ucommon::CallId;
use ugateway::{GatewayError, GatewayHooks, Method};

#[derive(Debug, Clone, Copy, Default)]
pub struct MetricsGatewayHooks;

impl GatewayHooks for MetricsGatewayHooks {
    fn on_call_start(&self, _call: CallId, method: Method, endpoint: &str) {
        metrics::counter!(
            "unital_gateway_call_start_total",
            "method" => method.as_str(),
            "endpoint" => endpoint.to_string()
        )
        .increment(1);
    }

    fn on_success(
        &self,
        _call: CallId,
        method: Method,
        endpoint: &str,
        _status: u16,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "unital_gateway_success_total",
            "method" => method.as_str(),
            "endpoint" => endpoint.to_string()
        )
        .increment(1);
        metrics::histogram!(
            "unital_gateway_call_duration_seconds",
            "method" => method.as_str(),
            "endpoint" => endpoint.to_string(),
            "status" => "success"
        )
        .record(elapsed.as_secs_f64());
    }

    fn on_failure(
        &self,
        _call: CallId,
        method: Method,
        endpoint: &str,
        error: &GatewayError,
        elapsed: Duration,
    ) {
        metrics::counter!(
            "unital_gateway_failure_total",
            "method" => method.as_str(),
            "endpoint" => endpoint.to_string(),
            "error_kind" => error.kind.as_str()
        )
        .increment(1);
        metrics::histogram!(
            "unital_gateway_call_duration_seconds",
            "method" => method.as_str(),
            "endpoint" => endpoint.to_string(),
            "status" => "failure"
        )
        .record(elapsed.as_secs_f64());
    }
}
