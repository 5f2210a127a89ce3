//! HTTP transport trait and reqwest-based implementation.

use ucommon::BoxFuture;

use crate::{GatewayError, Headers, Method};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Performs one network exchange. Implementations must not retry.
///
/// Any status code is a successful exchange at this level; only failures to
/// reach the server or to encode the request are errors.
pub trait HttpTransport: Send + Sync + std::fmt::Debug {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, GatewayError>>;
}

#[cfg(feature = "reqwest-transport")]
pub use reqwest_transport::ReqwestTransport;

#[cfg(feature = "reqwest-transport")]
mod reqwest_transport {
    use reqwest::Client;
    use ucommon::BoxFuture;

    use super::{HttpRequest, HttpResponse, HttpTransport};
    use crate::{GatewayError, Method};

    #[derive(Debug, Clone, Default)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        pub fn new(client: Client) -> Self {
            Self { client }
        }

        fn method(method: Method) -> reqwest::Method {
            match method {
                Method::Get => reqwest::Method::GET,
                Method::Post => reqwest::Method::POST,
                Method::Put => reqwest::Method::PUT,
                Method::Patch => reqwest::Method::PATCH,
                Method::Delete => reqwest::Method::DELETE,
            }
        }

        fn map_send_error(err: reqwest::Error) -> GatewayError {
            if err.is_builder() {
                GatewayError::invalid_request(err.to_string())
            } else {
                GatewayError::network_unreachable(err.to_string())
            }
        }
    }

    impl HttpTransport for ReqwestTransport {
        fn send<'a>(
            &'a self,
            request: HttpRequest,
        ) -> BoxFuture<'a, Result<HttpResponse, GatewayError>> {
            Box::pin(async move {
                let HttpRequest {
                    method,
                    url,
                    headers,
                    body,
                } = request;

                let mut builder = self.client.request(Self::method(method), url);
                for (name, value) in headers.iter() {
                    builder = builder.header(name, value);
                }

                if let Some(body) = body {
                    builder = builder.body(body);
                }

                let response = builder.send().await.map_err(Self::map_send_error)?;
                let status = response.status();

                // An unreadable error body still reports the status.
                let body = match response.bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(_) if !status.is_success() => Vec::new(),
                    Err(err) => return Err(GatewayError::network_unreachable(err.to_string())),
                };

                Ok(HttpResponse {
                    status: status.as_u16(),
                    body,
                })
            })
        }
    }
}
