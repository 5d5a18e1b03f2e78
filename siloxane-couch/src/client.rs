use std::sync::Arc;

use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::config::{ConfigSource, DatabaseUrls};
use crate::db::Databases;
use crate::error::{ConfigError, CouchError};
use crate::request::{Method, RequestDescriptor};
use crate::transport::{HttpTransport, RawResponse, Transport};

/// Completion handler for the callback-style entry points.
///
/// Receives exactly one of an error or a parsed JSON body.
pub type Callback = Box<dyn FnOnce(Result<Value, CouchError>) + Send + 'static>;

/// Client for a CouchDB server.
///
/// Cheap to clone; clones share the configuration and transport.
pub struct Couch<T = HttpTransport> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    urls: Arc<dyn DatabaseUrls>,
    transport: T,
}

impl<T> Clone for Couch<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl Couch<HttpTransport> {
    /// Creates a client talking HTTP through `reqwest`.
    ///
    /// The configuration is resolved here; an unreadable reference is an error
    /// now, not on the first request.
    pub fn new(source: impl Into<ConfigSource>) -> Result<Self, ConfigError> {
        Self::with_transport(source, HttpTransport::new())
    }
}

impl<T: Transport> Couch<T> {
    /// Creates a client that sends its requests through `transport`.
    pub fn with_transport(
        source: impl Into<ConfigSource>,
        transport: T,
    ) -> Result<Self, ConfigError> {
        let urls = source.into().resolve()?;
        Ok(Self {
            inner: Arc::new(Inner { urls, transport }),
        })
    }

    /// Database lifecycle operations.
    pub fn db(&self) -> Databases<'_, T> {
        Databases::new(self)
    }

    /// URL the client would use for database `name`.
    pub fn database_url(&self, name: &str) -> String {
        self.inner.urls.database(name)
    }

    /// Performs one request against database `name` and classifies the outcome.
    ///
    /// Status 200 and 201 yield the parsed body. Any other status yields
    /// [`CouchError::Couch`] built from the body's `error` and `reason`
    /// fields. A transport failure yields [`CouchError::Connect`], carrying the
    /// status when one arrived before the failure. A body that is not JSON
    /// yields [`CouchError::MalformedResponse`], and an empty `name` yields
    /// [`CouchError::InvalidName`] without sending anything.
    #[instrument(skip(self))]
    pub async fn dispatch(&self, name: &str, method: Method) -> Result<Value, CouchError> {
        let request = RequestDescriptor::new(self.inner.urls.database(name), method);
        if name.is_empty() {
            return Err(CouchError::InvalidName { request });
        }

        debug!(url = %request.redacted_url(), "Sending request to CouchDB");

        match self.inner.transport.send(&request).await {
            Ok(response) => classify(request, response),
            Err(source) => {
                debug!(error = %source, "Transport failed");
                Err(CouchError::Connect {
                    status: source.status(),
                    source,
                    request,
                })
            }
        }
    }
}

impl<T: Transport + 'static> Couch<T> {
    /// Starts a request and returns immediately; `callback` runs once when it
    /// completes. `None` discards the outcome.
    ///
    /// # Panics
    ///
    /// Panics if called outside a Tokio runtime, since the request is spawned
    /// onto the current one.
    pub fn dispatch_with(
        &self,
        name: &str,
        method: Method,
        callback: Option<Callback>,
    ) -> JoinHandle<()> {
        let client = self.clone();
        let name = name.to_string();
        tokio::spawn(async move {
            let outcome = client.dispatch(&name, method).await;
            if let Some(callback) = callback {
                callback(outcome);
            }
        })
    }
}

fn classify(request: RequestDescriptor, response: RawResponse) -> Result<Value, CouchError> {
    let status = response.status;
    let body: Value = match serde_json::from_slice(&response.body) {
        Ok(body) => body,
        Err(source) => {
            return Err(CouchError::MalformedResponse {
                source,
                request,
                status,
            });
        }
    };

    if status == 200 || status == 201 {
        debug!(status, "Request succeeded");
        return Ok(body);
    }

    let field = |key: &str| body.get(key).and_then(Value::as_str).map(str::to_string);
    let error = CouchError::Couch {
        error: field("error"),
        reason: field("reason"),
        request,
        status,
    };

    debug!(status, kind = %error.kind(), "CouchDB reported an error");

    Err(error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request() -> RequestDescriptor {
        RequestDescriptor::new("http://x/foo", Method::Put)
    }

    #[test]
    fn test_classify_created() {
        let result = classify(request(), RawResponse::new(201, r#"{"ok":true}"#));
        assert_eq!(result.unwrap(), json!({"ok": true}));
    }

    #[test]
    fn test_classify_accepted_is_remote_failure() {
        // Only 200 and 201 count as success.
        let err = classify(request(), RawResponse::new(202, r#"{"ok":true}"#)).unwrap_err();
        assert_eq!(err.kind(), "couch:unknown");
        assert_eq!(err.status(), Some(202));
    }

    #[test]
    fn test_classify_remote_error_fields() {
        let body = r#"{"error":"not_found","reason":"Database does not exist."}"#;
        match classify(request(), RawResponse::new(404, body)) {
            Err(CouchError::Couch {
                error,
                reason,
                status,
                ..
            }) => {
                assert_eq!(error.as_deref(), Some("not_found"));
                assert_eq!(reason.as_deref(), Some("Database does not exist."));
                assert_eq!(status, 404);
            }
            other => panic!("Expected remote error, got {:?}", other),
        }
    }

    #[test]
    fn test_classify_malformed_on_both_paths() {
        let err = classify(request(), RawResponse::new(200, "<html>ok</html>")).unwrap_err();
        assert_eq!(err.kind(), "malformed_response");

        let err = classify(request(), RawResponse::new(502, "Bad Gateway")).unwrap_err();
        assert_eq!(err.kind(), "malformed_response");
        assert_eq!(err.status(), Some(502));
    }

    #[test]
    #[should_panic]
    fn test_dispatch_with_outside_runtime_panics() {
        let client = Couch::new(ConfigSource::from_fn(|name| format!("http://x/{name}"))).unwrap();
        let _ = client.dispatch_with("foo", Method::Get, None);
    }

    #[test]
    fn test_client_creation() {
        let client = Couch::new(ConfigSource::from_fn(|name| format!("http://x/{name}"))).unwrap();
        assert_eq!(client.database_url("foo"), "http://x/foo");
    }
}
