//! Authenticated JSON request gateway for the dashboard API.
//!
//! Every outbound call goes through [`RequestGateway::call`], which resolves
//! to a [`ResponseOutcome`] and never surfaces an error to the caller. Failures
//! are reported once through the configured [`FailureSink`].
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use ugateway::{
//!     BoxFuture, GatewayError, HttpRequest, HttpResponse, HttpTransport, RecordingFailureSink,
//!     RequestDescriptor, RequestGateway, SessionContext,
//! };
//!
//! #[derive(Debug)]
//! struct Offline;
//!
//! impl HttpTransport for Offline {
//!     fn send<'a>(
//!         &'a self,
//!         _request: HttpRequest,
//!     ) -> BoxFuture<'a, Result<HttpResponse, GatewayError>> {
//!         Box::pin(async { Err(GatewayError::network_unreachable("offline")) })
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() {
//! let sink = Arc::new(RecordingFailureSink::new());
//! let gateway = RequestGateway::builder("http://localhost:8000/api", Arc::new(Offline))
//!     .session(Arc::new(SessionContext::new()))
//!     .failure_sink(sink.clone())
//!     .build();
//!
//! let outcome = gateway.call(RequestDescriptor::get("/teams")).await;
//!
//! assert!(!outcome.is_success());
//! assert_eq!(sink.len(), 1);
//! # }
//! ```

mod credentials;
mod descriptor;
mod error;
mod gateway;
mod hooks;
mod outcome;
mod transport;

pub mod prelude {
    pub use crate::{
        ApiGateway, FailureNotice, FailureSink, GatewayError, GatewayErrorKind, GatewayHooks,
        Method, RecordingFailureSink, RequestDescriptor, RequestGateway, ResponseOutcome,
        SessionContext, SilentFailureSink,
    };
}

pub use credentials::{
    CREDENTIAL_STORAGE_KEY, FileTokenStorage, InMemoryTokenStorage, SecretString, SessionContext,
    TokenStorage,
};
pub use descriptor::{Headers, Method, RequestDescriptor};
pub use error::{CredentialError, CredentialErrorKind, GatewayError, GatewayErrorKind};
pub use gateway::{
    AUTHORIZATION_HEADER, ApiGateway, CONTENT_TYPE_HEADER, JSON_CONTENT_TYPE, RequestGateway,
    RequestGatewayBuilder,
};
pub use hooks::{
    FAILURE_NOTICE_TEXT, FailureNotice, FailureSink, GatewayHooks, NoopGatewayHooks,
    RecordingFailureSink, SilentFailureSink,
};
pub use outcome::ResponseOutcome;
#[cfg(feature = "reqwest-transport")]
pub use transport::ReqwestTransport;
pub use transport::{HttpRequest, HttpResponse, HttpTransport};
pub use ucommon::{BoxFuture, CallId};
