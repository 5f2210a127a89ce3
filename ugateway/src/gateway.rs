//! The request gateway: one authenticated JSON round trip per call.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use ucommon::{BoxFuture, CallId, CallIdSource};

use crate::{
    FailureNotice, FailureSink, GatewayError, GatewayHooks, Headers, HttpRequest, HttpTransport,
    Method, NoopGatewayHooks, RequestDescriptor, ResponseOutcome, SessionContext,
    SilentFailureSink,
};

pub const CONTENT_TYPE_HEADER: &str = "Content-Type";
pub const AUTHORIZATION_HEADER: &str = "Authorization";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Contract consumed by the chat driver and the list views.
pub trait ApiGateway: Send + Sync {
    /// Always resolves; failures are reported by the gateway before returning.
    fn call<'a>(&'a self, descriptor: RequestDescriptor) -> BoxFuture<'a, ResponseOutcome>;

    /// `GET path` expecting a JSON array. Failures and non-array payloads yield no items.
    fn fetch_collection<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Vec<Value>> {
        Box::pin(async move {
            match self.call(RequestDescriptor::get(path)).await {
                ResponseOutcome::Success(Value::Array(items)) => items,
                _ => Vec::new(),
            }
        })
    }
}

#[derive(Clone)]
pub struct RequestGateway {
    base_url: Arc<str>,
    session: Arc<SessionContext>,
    transport: Arc<dyn HttpTransport>,
    hooks: Arc<dyn GatewayHooks>,
    failure_sink: Arc<dyn FailureSink>,
    call_ids: Arc<CallIdSource>,
}

impl RequestGateway {
    pub fn new(
        base_url: impl Into<String>,
        session: Arc<SessionContext>,
        transport: Arc<dyn HttpTransport>,
    ) -> Self {
        Self::builder(base_url, transport).session(session).build()
    }

    pub fn builder(
        base_url: impl Into<String>,
        transport: Arc<dyn HttpTransport>,
    ) -> RequestGatewayBuilder {
        RequestGatewayBuilder::new(base_url, transport)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Arc<SessionContext> {
        &self.session
    }

    /// Full address for `path`: the base address followed by the path.
    pub fn endpoint(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        if path.is_empty() || path.starts_with('/') {
            format!("{base}{path}")
        } else {
            format!("{base}/{path}")
        }
    }

    pub async fn call(&self, descriptor: RequestDescriptor) -> ResponseOutcome {
        let call = self.call_ids.next_id();
        let method = descriptor.method();
        let path = descriptor.path().to_string();
        let started = Instant::now();

        self.hooks.on_call_start(call, method, &path);

        match self.execute(descriptor).await {
            Ok((status, value)) => {
                self.hooks
                    .on_success(call, method, &path, status, started.elapsed());
                ResponseOutcome::Success(value)
            }
            Err(error) => {
                self.report_failure(call, method, path, &error, started);
                ResponseOutcome::Failure(error)
            }
        }
    }

    async fn execute(&self, descriptor: RequestDescriptor) -> Result<(u16, Value), GatewayError> {
        let request = self.build_request(descriptor)?;
        let response = self.transport.send(request).await?;

        if !response.is_success() {
            return Err(GatewayError::non_success_status(response.status));
        }

        let value = serde_json::from_slice::<Value>(&response.body)
            .map_err(|err| GatewayError::decode_failure(err.to_string()))?;

        Ok((response.status, value))
    }

    pub(crate) fn build_request(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<HttpRequest, GatewayError> {
        let (method, path, body, overrides) = descriptor.into_parts();

        let mut headers = Headers::new();
        headers.insert(CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE);
        if let Some(authorization) = self.session.with_bearer(|token| format!("Bearer {token}"))? {
            headers.insert(AUTHORIZATION_HEADER, authorization);
        }

        for (name, value) in overrides {
            headers.insert(name, value);
        }

        let body = body
            .map(|value| serde_json::to_vec(&value))
            .transpose()
            .map_err(|err| GatewayError::invalid_request(err.to_string()))?;

        Ok(HttpRequest {
            method,
            url: self.endpoint(&path),
            headers,
            body,
        })
    }

    fn report_failure(
        &self,
        call: CallId,
        method: Method,
        endpoint: String,
        error: &GatewayError,
        started: Instant,
    ) {
        self.hooks
            .on_failure(call, method, &endpoint, error, started.elapsed());
        self.failure_sink.notify(&FailureNotice {
            call,
            method,
            endpoint,
            error: error.clone(),
        });
    }
}

impl ApiGateway for RequestGateway {
    fn call<'a>(&'a self, descriptor: RequestDescriptor) -> BoxFuture<'a, ResponseOutcome> {
        Box::pin(RequestGateway::call(self, descriptor))
    }
}

impl std::fmt::Debug for RequestGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestGateway")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .field("transport", &self.transport)
            .finish_non_exhaustive()
    }
}

pub struct RequestGatewayBuilder {
    base_url: String,
    transport: Arc<dyn HttpTransport>,
    session: Option<Arc<SessionContext>>,
    hooks: Arc<dyn GatewayHooks>,
    failure_sink: Arc<dyn FailureSink>,
}

impl RequestGatewayBuilder {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
            session: None,
            hooks: Arc::new(NoopGatewayHooks),
            failure_sink: Arc::new(SilentFailureSink),
        }
    }

    pub fn session(mut self, session: Arc<SessionContext>) -> Self {
        self.session = Some(session);
        self
    }

    pub fn hooks(mut self, hooks: Arc<dyn GatewayHooks>) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn failure_sink(mut self, failure_sink: Arc<dyn FailureSink>) -> Self {
        self.failure_sink = failure_sink;
        self
    }

    pub fn build(self) -> RequestGateway {
        RequestGateway {
            base_url: Arc::from(self.base_url),
            session: self
                .session
                .unwrap_or_else(|| Arc::new(SessionContext::new())),
            transport: self.transport,
            hooks: self.hooks,
            failure_sink: self.failure_sink,
            call_ids: Arc::new(CallIdSource::new()),
        }
    }
}
