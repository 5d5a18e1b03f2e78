use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use crate::error::TransportError;
use crate::request::RequestDescriptor;

/// Status line and raw body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends a request and hands back whatever the server said.
///
/// Implementations report only failures below HTTP; any status code,
/// including 4xx/5xx, is a successful send. Exactly one network call per
/// `send`, no retries.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(
        &self,
        request: &RequestDescriptor,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send {
        (**self).send(request)
    }
}

/// Transport backed by `reqwest`.
///
/// Timeouts are whatever the underlying client defaults to.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a preconfigured client (proxies, TLS roots, timeouts).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse, TransportError> {
        let mut builder = self
            .http
            .request(request.method.into(), request.url.as_str());
        for (name, value) in request.headers {
            builder = builder.header(*name, *value);
        }

        // reqwest errors embed the unmasked URL.
        let response = builder.send().await.map_err(reqwest::Error::without_url)?;
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|source| TransportError::Body {
                status,
                source: source.without_url(),
            })?;

        debug!(status, bytes = body.len(), "Received response");

        Ok(RawResponse::new(status, body.to_vec()))
    }
}
