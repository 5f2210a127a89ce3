//! Operational hook contracts and failure notification sinks.
//!
//! ```rust
//! use ugateway::{
//!     CallId, FailureNotice, FailureSink, GatewayError, Method, RecordingFailureSink,
//! };
//!
//! let sink = RecordingFailureSink::new();
//! sink.notify(&FailureNotice {
//!     call: CallId::new(1),
//!     method: Method::Get,
//!     endpoint: "/teams".to_string(),
//!     error: GatewayError::non_success_status(502),
//! });
//! assert_eq!(sink.len(), 1);
//! ```

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use ucommon::CallId;

use crate::{GatewayError, Method};

/// Generic text shown to the user when a call fails.
pub const FAILURE_NOTICE_TEXT: &str = "Error fetching data from API";

pub trait GatewayHooks: Send + Sync {
    fn on_call_start(&self, _call: CallId, _method: Method, _endpoint: &str) {}

    fn on_success(
        &self,
        _call: CallId,
        _method: Method,
        _endpoint: &str,
        _status: u16,
        _elapsed: Duration,
    ) {
    }

    fn on_failure(
        &self,
        _call: CallId,
        _method: Method,
        _endpoint: &str,
        _error: &GatewayError,
        _elapsed: Duration,
    ) {
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopGatewayHooks;

impl GatewayHooks for NoopGatewayHooks {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub call: CallId,
    pub method: Method,
    pub endpoint: String,
    pub error: GatewayError,
}

impl FailureNotice {
    pub fn user_message(&self) -> &'static str {
        FAILURE_NOTICE_TEXT
    }
}

/// Channel every failed call is reported through exactly once.
///
/// Implementations must return promptly; the gateway resolves the call only
/// after `notify` returns.
pub trait FailureSink: Send + Sync {
    fn notify(&self, notice: &FailureNotice);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentFailureSink;

impl FailureSink for SilentFailureSink {
    fn notify(&self, _notice: &FailureNotice) {}
}

/// Keeps notices until a UI (or test) drains them.
#[derive(Debug, Default)]
pub struct RecordingFailureSink {
    notices: Mutex<Vec<FailureNotice>>,
}

impl RecordingFailureSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<FailureNotice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn drain(&self) -> Vec<FailureNotice> {
        std::mem::take(&mut *self.notices.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FailureSink for RecordingFailureSink {
    fn notify(&self, notice: &FailureNotice) {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice.clone());
    }
}
