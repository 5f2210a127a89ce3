use std::panic::{AssertUnwindSafe, catch_unwind};
use std::time::Duration;

use ucommon::CallId;
use ugateway::{FailureNotice, FailureSink, GatewayError, GatewayHooks, Method};

pub struct SafeGatewayHooks<H> {
    inner: H,
}

impl<H> SafeGatewayHooks<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }
}

impl<H> GatewayHooks for SafeGatewayHooks<H>
where
    H: GatewayHooks,
{
    fn on_call_start(&self, call: CallId, method: Method, endpoint: &str) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner.on_call_start(call, method, endpoint)
        }));
    }

    fn on_success(
        &self,
        call: CallId,
        method: Method,
        endpoint: &str,
        status: u16,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_success(call, method, endpoint, status, elapsed)
        }));
    }

    fn on_failure(
        &self,
        call: CallId,
        method: Method,
        endpoint: &str,
        error: &GatewayError,
        elapsed: Duration,
    ) {
        let _ = catch_unwind(AssertUnwindSafe(|| {
            self.inner
                .on_failure(call, method, endpoint, error, elapsed)
        }));
    }
}

pub struct SafeFailureSink<S> {
    inner: S,
}

impl<S> SafeFailureSink<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S> FailureSink for SafeFailureSink<S>
where
    S: FailureSink,
{
    fn notify(&self, notice: &FailureNotice) {
        let _ = catch_unwind(AssertUnwindSafe(|| self.inner.notify(notice)));
    }
}
