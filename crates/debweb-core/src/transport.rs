//! Transport seam between the typed backend API and the wire
//!
//! [`Transport`] sends one request and returns the decoded JSON body.
//! The production implementation lives in `debweb-http`; tests use
//! [`testing::RecordingTransport`].

use crate::error::CoreResult;
use crate::query::encode_params;
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// A request against the backend, path relative to the base URL
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub params: Vec<(String, String)>,
    pub body: Option<serde_json::Value>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>, params: Vec<(String, String)>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            params,
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            params: Vec::new(),
            body: Some(body),
        }
    }

    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            params: Vec::new(),
            body: Some(body),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            params: Vec::new(),
            body: None,
        }
    }

    /// Encoded query string, empty when there are no params
    pub fn query_string(&self) -> String {
        encode_params(&self.params)
    }

    /// Path plus query string, as logged and as matched in tests
    pub fn target(&self) -> String {
        if self.params.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.query_string())
        }
    }
}

impl std::fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.method, self.target())
    }
}

/// Sends requests to the backend
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request`; the JSON body of a 2xx response, an error otherwise
    async fn send(&self, request: ApiRequest) -> CoreResult<serde_json::Value>;
}

/// In-memory transport for tests
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;
    use crate::error::CoreError;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records every request and answers from queued or routed responses
    ///
    /// Lookup order: a response queued for the exact `METHOD target`,
    /// then one queued for `METHOD path`, then the fallback
    /// `{"success": true, "data": []}`.
    #[derive(Default)]
    pub struct RecordingTransport {
        requests: Mutex<Vec<ApiRequest>>,
        routes: Mutex<Vec<(String, VecDeque<CoreResult<serde_json::Value>>)>>,
    }

    impl RecordingTransport {
        pub fn new() -> Self {
            Self::default()
        }

        /// Queue a response for `key`, e.g. `"GET /api/customers"`
        pub fn respond(&self, key: &str, body: serde_json::Value) -> &Self {
            self.push(key, Ok(body));
            self
        }

        /// Queue a failure for `key`
        pub fn fail(&self, key: &str, error: CoreError) -> &Self {
            self.push(key, Err(error));
            self
        }

        fn push(&self, key: &str, response: CoreResult<serde_json::Value>) {
            let mut routes = self.routes.lock().unwrap();
            match routes.iter_mut().find(|(k, _)| k == key) {
                Some((_, queue)) => queue.push_back(response),
                None => {
                    let mut queue = VecDeque::new();
                    queue.push_back(response);
                    routes.push((key.to_string(), queue));
                }
            }
        }

        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        /// Requests rendered as `METHOD target`
        pub fn log(&self) -> Vec<String> {
            self.requests().iter().map(|r| r.to_string()).collect()
        }

        fn take(&self, key: &str) -> Option<CoreResult<serde_json::Value>> {
            let mut routes = self.routes.lock().unwrap();
            let (_, queue) = routes.iter_mut().find(|(k, _)| k == key)?;
            // The last queued response keeps answering once the rest are used
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().map(|r| match r {
                    Ok(v) => Ok(v.clone()),
                    Err(e) => Err(clone_error(e)),
                })
            }
        }
    }

    fn clone_error(error: &CoreError) -> CoreError {
        match error {
            CoreError::Network { message } => CoreError::Network { message: message.clone() },
            CoreError::Backend { status, message } => CoreError::Backend {
                status: *status,
                message: message.clone(),
            },
            other => CoreError::Internal { message: other.to_string() },
        }
    }

    #[async_trait]
    impl Transport for RecordingTransport {
        async fn send(&self, request: ApiRequest) -> CoreResult<serde_json::Value> {
            let exact = format!("{} {}", request.method, request.target());
            let by_path = format!("{} {}", request.method, request.path);
            self.requests.lock().unwrap().push(request);
            self.take(&exact)
                .or_else(|| self.take(&by_path))
                .unwrap_or_else(|| Ok(serde_json::json!({ "success": true, "data": [] })))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::RecordingTransport;
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn test_request_target() {
        let request = ApiRequest::get(
            "/api/customers",
            vec![("search".to_string(), "Rahim".to_string()), ("page".to_string(), "1".to_string())],
        );
        assert_eq!(request.target(), "/api/customers?search=Rahim&page=1");
        assert_eq!(request.to_string(), "GET /api/customers?search=Rahim&page=1");
        assert_eq!(ApiRequest::delete("/api/debit/9").target(), "/api/debit/9");
    }

    #[tokio::test]
    async fn test_recording_transport_routes() {
        let transport = RecordingTransport::new();
        transport
            .respond("GET /api/customers", serde_json::json!({ "data": [1] }))
            .fail("DELETE /api/customers/1", CoreError::Backend { status: 404, message: "gone".to_string() });

        let body = transport.send(ApiRequest::get("/api/customers", vec![])).await.unwrap();
        assert_eq!(body["data"][0], 1);
        assert!(transport.send(ApiRequest::delete("/api/customers/1")).await.is_err());
        let fallback = transport.send(ApiRequest::get("/api/other", vec![])).await.unwrap();
        assert_eq!(fallback["success"], true);
        assert_eq!(transport.request_count(), 3);
    }
}
