//! Tracing-based gateway hooks and failure sink.
//!
//! ```rust
//! use uobserve::TracingGatewayHooks;
//! use ugateway::GatewayHooks;
//!
//! fn accepts_gateway_hooks(_hooks: &dyn GatewayHooks) {}
//!
//! let hooks = TracingGatewayHooks;
//! accepts_gateway_hooks(&hooks);
//! ```

use std::time::Duration;

use ucommon::CallId;
use ugateway::{FailureNotice, FailureSink, GatewayError, GatewayHooks, Method};

#[derive(Debug, Clone, Copy, Default)]
pub struct TracingGatewayHooks;

impl GatewayHooks for TracingGatewayHooks {
    fn on_call_start(&self, call: CallId, method: Method, endpoint: &str) {
        tracing::debug!(
            phase = "gateway",
            event = "call_start",
            call = %call,
            method = method.as_str(),
            endpoint
        );
    }

    fn on_success(
        &self,
        call: CallId,
        method: Method,
        endpoint: &str,
        status: u16,
        elapsed: Duration,
    ) {
        tracing::info!(
            phase = "gateway",
            event = "success",
            call = %call,
            method = method.as_str(),
            endpoint,
            status,
            elapsed_ms = elapsed.as_millis() as u64
        );
    }

    fn on_failure(
        &self,
        call: CallId,
        method: Method,
        endpoint: &str,
        error: &GatewayError,
        elapsed: Duration,
    ) {
        tracing::warn!(
            phase = "gateway",
            event = "failure",
            call = %call,
            method = method.as_str(),
            endpoint,
            status = error.status,
            error_kind = error.kind.as_str(),
            elapsed_ms = elapsed.as_millis() as u64,
            error = %error
        );
    }
}

/// Logs the user-facing failure notice at error level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingFailureSink;

impl FailureSink for TracingFailureSink {
    fn notify(&self, notice: &FailureNotice) {
        tracing::error!(
            phase = "gateway",
            event = "failure_notice",
            call = %notice.call,
            method = notice.method.as_str(),
            endpoint = notice.endpoint.as_str(),
            status = notice.error.status,
            error_kind = notice.error.kind.as_str(),
            error = %notice.error,
            "{}",
            notice.user_message()
        );
    }
}
