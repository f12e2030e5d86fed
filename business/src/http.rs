//! HTTP client with an interceptor chain.
//!
//! Every call made through [`HttpClient`] runs through the same pipeline:
//!
//! - **outgoing**: each [`Interceptor::request`] hook runs in order before the
//!   request is built. The default [`JsonInterceptor`] forces
//!   `content-type: application/json`.
//! - **incoming**: a 2xx response runs through every [`Interceptor::response`]
//!   hook. Anything else (transport error, timeout, non-2xx status) becomes an
//!   [`ErrorEnvelope`] that runs through every [`Interceptor::error`] hook and
//!   is returned as [`HttpError::Response`].
//!
//! Calls are single-attempt. Each one carries its own timeout taken from
//! [`HttpConfig`]; there is no retry, backoff, or caching.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, error};
use thiserror::Error;

use crate::config::HttpConfig;

/// Header name used for the body media type. Header names are stored lowercased.
pub const CONTENT_TYPE: &str = "content-type";

/// The only media type this client speaks.
pub const APPLICATION_JSON: &str = "application/json";

/// Message carried by every [`ErrorEnvelope`] unless an interceptor rewrites it.
/// Inspect [`ErrorEnvelope::cause`] for the real reason.
pub const FALLBACK_ERROR_MESSAGE: &str = "Error Message";

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outgoing request envelope.
///
/// `target` is either an absolute `http(s)://` URL or a path resolved against
/// [`HttpConfig::base_url`] when the request is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub target: String,
    /// Request headers (lowercased keys)
    pub headers: HashMap<String, String>,
    pub body: Option<Vec<u8>>,
}

impl Request {
    pub fn new(method: Method, target: impl Into<String>) -> Self {
        Self {
            method,
            target: target.into(),
            headers: HashMap::new(),
            body: None,
        }
    }

    /// Add a header, replacing any existing value regardless of name casing.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.set_header(name, value);
        self
    }

    /// Set the request body as raw bytes.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize>(mut self, value: &T) -> Result<Self, RequestError> {
        let body = serde_json::to_vec(value).map_err(|e| {
            error!("http request error: {} {}: {e:?}", self.method, self.target);
            RequestError::Serialize(e)
        })?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    /// Get a header value by name (case-insensitive).
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }
}

/// A simplified HTTP response that contains only Send-safe data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    /// Response body as bytes
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn set_header(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        self.headers
            .insert(name.as_ref().to_lowercase(), value.into());
    }

    /// Attempt to parse the body as UTF-8 text.
    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    /// Attempt to deserialize the body as JSON.
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// Why an issued call failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// Connection refused, DNS failure, reset, or a broken body stream.
    Transport(String),
    /// The server answered with a non-2xx status.
    HttpStatus { status: u16, body: Vec<u8> },
    /// The per-call timeout elapsed.
    Timeout,
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(reason) => write!(f, "transport failure: {reason}"),
            Self::HttpStatus { status, .. } => write!(f, "server returned status {status}"),
            Self::Timeout => f.write_str("request timed out"),
        }
    }
}

/// Normalized failure of an issued call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorEnvelope {
    /// The request as it was handed to the transport, after every interceptor ran.
    pub config: Request,
    /// The resolved URL the request was sent to.
    pub url: String,
    /// Whatever part of the response arrived, if any.
    pub response: Option<Response>,
    pub message: String,
    pub cause: FailureCause,
}

impl ErrorEnvelope {
    pub fn new(
        config: Request,
        url: impl Into<String>,
        response: Option<Response>,
        cause: FailureCause,
    ) -> Self {
        Self {
            config,
            url: url.into(),
            response,
            message: FALLBACK_ERROR_MESSAGE.to_owned(),
            cause,
        }
    }

    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self.cause, FailureCause::Timeout)
    }
}

/// Failure to build a request. Nothing was sent.
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("no base url configured for relative target `{target}`")]
    MissingBaseUrl { target: String },

    #[error("failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("failed to build request: {0}")]
    Build(#[from] reqwest::Error),

    #[error("request rejected by interceptor: {0}")]
    Interceptor(String),
}

/// HTTP client error.
#[derive(Debug, Error)]
pub enum HttpError {
    /// The request never left the client.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The call was issued and failed; displays the envelope message.
    #[error("{}", .0.message)]
    Response(Box<ErrorEnvelope>),

    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl HttpError {
    pub fn envelope(&self) -> Option<&ErrorEnvelope> {
        match self {
            Self::Response(envelope) => Some(envelope),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.envelope().is_some_and(ErrorEnvelope::is_timeout)
    }
}

/// Result type for HTTP operations.
pub type HttpResult<T> = Result<T, HttpError>;

/// One stage of the pipeline. Every hook defaults to pass-through.
pub trait Interceptor: Send + Sync + fmt::Debug {
    /// Runs before the request is built. Returning an error aborts the call
    /// before anything is sent.
    fn request(&self, request: Request) -> Result<Request, RequestError> {
        Ok(request)
    }

    /// Runs on every 2xx response.
    fn response(&self, response: Response) -> Response {
        response
    }

    /// Runs on every failed call.
    fn error(&self, envelope: ErrorEnvelope) -> ErrorEnvelope {
        envelope
    }
}

/// Forces `content-type: application/json` on every request and response.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonInterceptor;

impl Interceptor for JsonInterceptor {
    fn request(&self, mut request: Request) -> Result<Request, RequestError> {
        request.set_header(CONTENT_TYPE, APPLICATION_JSON);
        Ok(request)
    }

    fn response(&self, mut response: Response) -> Response {
        response.set_header(CONTENT_TYPE, APPLICATION_JSON);
        response
    }
}

/// Partially received response plus the reason the call failed.
struct Failed {
    partial: Option<Response>,
    cause: FailureCause,
}

/// Configured HTTP client. Cheap to clone; clones share the connection pool
/// and the interceptor chain.
///
/// # Example
///
/// ```ignore
/// use kong_admin_business::{HttpClient, UserRow};
///
/// async fn fetch_users(client: &HttpClient) {
///     let rows: Vec<UserRow> = client.get_json("/users").await.unwrap();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: reqwest::Client,
    base_url: String,
    timeout: Duration,
    interceptors: Vec<Arc<dyn Interceptor>>,
}

impl HttpClient {
    /// Create a client with the default [`JsonInterceptor`] installed.
    pub fn new(config: HttpConfig) -> Self {
        Self {
            inner: reqwest::Client::new(),
            base_url: config.base_url,
            timeout: config.timeout,
            interceptors: vec![Arc::new(JsonInterceptor)],
        }
    }

    /// Append an interceptor; it runs after the ones already installed.
    pub fn with_interceptor(mut self, interceptor: impl Interceptor + 'static) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Create a GET request.
    pub fn get(&self, target: impl Into<String>) -> Request {
        Request::new(Method::Get, target)
    }

    /// Create a POST request.
    pub fn post(&self, target: impl Into<String>) -> Request {
        Request::new(Method::Post, target)
    }

    /// Create a PUT request.
    pub fn put(&self, target: impl Into<String>) -> Request {
        Request::new(Method::Put, target)
    }

    /// Create a PATCH request.
    pub fn patch(&self, target: impl Into<String>) -> Request {
        Request::new(Method::Patch, target)
    }

    /// Create a DELETE request.
    pub fn delete(&self, target: impl Into<String>) -> Request {
        Request::new(Method::Delete, target)
    }

    /// GET `target` and deserialize the JSON body.
    pub async fn get_json<T: serde::de::DeserializeOwned>(&self, target: &str) -> HttpResult<T> {
        let response = self.send(self.get(target)).await?;
        response.json().map_err(HttpError::Decode)
    }

    /// Run `request` through the pipeline and send it.
    pub async fn send(&self, request: Request) -> HttpResult<Response> {
        let (config, outgoing) = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(err) => {
                error!("http request error: {err:?}");
                return Err(HttpError::Request(err));
            }
        };
        let url = outgoing.url().to_string();
        debug!("{} {url}", config.method);

        match self.execute(outgoing).await {
            Ok(response) if response.is_success() => Ok(self
                .interceptors
                .iter()
                .fold(response, |response, i| i.response(response))),
            Ok(response) => {
                let cause = FailureCause::HttpStatus {
                    status: response.status,
                    body: response.body.clone(),
                };
                Err(self.reject(config, url, Some(response), cause))
            }
            Err(Failed { partial, cause }) => Err(self.reject(config, url, partial, cause)),
        }
    }

    fn prepare(&self, request: Request) -> Result<(Request, reqwest::Request), RequestError> {
        let request = self
            .interceptors
            .iter()
            .try_fold(request, |request, i| i.request(request))?;
        let url = resolve_url(&self.base_url, &request.target)?;

        let mut builder = self
            .inner
            .request(request.method.to_reqwest(), url)
            .timeout(self.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let outgoing = builder.build()?;
        Ok((request, outgoing))
    }

    async fn execute(&self, outgoing: reqwest::Request) -> Result<Response, Failed> {
        let response = self.inner.execute(outgoing).await.map_err(|e| Failed {
            partial: None,
            cause: classify(&e),
        })?;

        // Extract status and headers before consuming the response
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), v.to_owned());
            }
        }

        match response.bytes().await {
            Ok(body) => Ok(Response {
                status,
                headers,
                body: body.to_vec(),
            }),
            Err(e) => Err(Failed {
                partial: Some(Response {
                    status,
                    headers,
                    body: Vec::new(),
                }),
                cause: classify(&e),
            }),
        }
    }

    fn reject(
        &self,
        config: Request,
        url: String,
        response: Option<Response>,
        cause: FailureCause,
    ) -> HttpError {
        error!("http response error: {} {url}: {cause}", config.method);
        let envelope = self
            .interceptors
            .iter()
            .fold(ErrorEnvelope::new(config, url, response, cause), |env, i| {
                i.error(env)
            });
        HttpError::Response(Box::new(envelope))
    }
}

fn classify(err: &reqwest::Error) -> FailureCause {
    if err.is_timeout() {
        FailureCause::Timeout
    } else {
        FailureCause::Transport(err.to_string())
    }
}

/// Join `target` onto `base_url` with exactly one `/`, unless `target` is absolute.
fn resolve_url(base_url: &str, target: &str) -> Result<String, RequestError> {
    if target.starts_with("http://") || target.starts_with("https://") {
        return Ok(target.to_owned());
    }
    if base_url.is_empty() {
        return Err(RequestError::MissingBaseUrl {
            target: target.to_owned(),
        });
    }
    Ok(format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        target.trim_start_matches('/')
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> HttpClient {
        HttpClient::new(HttpConfig::new(base_url))
    }

    #[test]
    fn test_response_is_success() {
        let response = Response {
            status: 204,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());

        let response = Response {
            status: 404,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_owned(), "text/plain".to_owned());

        let response = Response {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("content-type"), Some("text/plain"));
        assert_eq!(response.header("Content-Type"), Some("text/plain"));
        assert_eq!(response.header("CONTENT-TYPE"), Some("text/plain"));
    }

    #[test]
    fn test_request_header_overwrites_regardless_of_case() {
        let request = Request::new(Method::Get, "/users")
            .header("Content-Type", "text/plain")
            .header("CONTENT-TYPE", "text/html");

        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.header_value("content-type"), Some("text/html"));
    }

    #[test]
    fn test_json_interceptor_forces_content_type() {
        let request = Request::new(Method::Post, "/users").header("Content-Type", "text/plain");

        let request = JsonInterceptor.request(request).unwrap();

        assert_eq!(request.header_value("Content-Type"), Some(APPLICATION_JSON));
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn test_json_interceptor_normalizes_response() {
        let mut response = Response {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        response.set_header("Content-Type", "text/html; charset=utf-8");

        let response = JsonInterceptor.response(response);

        assert_eq!(response.header("content-type"), Some(APPLICATION_JSON));
    }

    #[test]
    fn test_request_json_sets_body_only() {
        #[derive(serde::Serialize)]
        struct NewUser {
            name: String,
        }

        let request = Request::new(Method::Post, "/users")
            .json(&NewUser {
                name: "Ann".to_owned(),
            })
            .unwrap();

        assert_eq!(request.body.as_deref(), Some(br#"{"name":"Ann"}"#.as_slice()));
        assert!(request.headers.is_empty());
    }

    #[test]
    fn test_request_json_rejects_unserializable_body() {
        let mut body = HashMap::new();
        body.insert((1, 2), "non-string map keys are not valid json");

        let err = Request::new(Method::Post, "/users").json(&body).unwrap_err();

        assert!(matches!(err, RequestError::Serialize(_)));
    }

    #[test]
    fn test_resolve_url_joins_with_single_slash() {
        assert_eq!(
            resolve_url("http://gw.local/", "/users").unwrap(),
            "http://gw.local/users"
        );
        assert_eq!(
            resolve_url("http://gw.local", "users").unwrap(),
            "http://gw.local/users"
        );
    }

    #[test]
    fn test_resolve_url_keeps_absolute_target() {
        assert_eq!(
            resolve_url("http://gw.local", "https://other.example/x").unwrap(),
            "https://other.example/x"
        );
    }

    #[test]
    fn test_resolve_url_requires_base_for_relative_target() {
        let err = resolve_url("", "/users").unwrap_err();
        assert!(matches!(err, RequestError::MissingBaseUrl { .. }));
    }

    #[test]
    fn test_prepare_applies_interceptors_in_order() {
        #[derive(Debug)]
        struct Tag;

        impl Interceptor for Tag {
            fn request(&self, request: Request) -> Result<Request, RequestError> {
                let seen = request.header_value(CONTENT_TYPE).unwrap_or("none").to_owned();
                Ok(request.header("x-seen-content-type", seen))
            }
        }

        let client = client("http://gw.local").with_interceptor(Tag);
        let (config, outgoing) = client.prepare(client.get("/users")).unwrap();

        assert_eq!(config.header_value("x-seen-content-type"), Some(APPLICATION_JSON));
        assert_eq!(outgoing.url().as_str(), "http://gw.local/users");
        assert_eq!(outgoing.timeout(), Some(&Duration::from_millis(1000)));
        assert_eq!(
            outgoing.headers().get(CONTENT_TYPE).map(|v| v.to_str().unwrap()),
            Some(APPLICATION_JSON)
        );
    }

    #[test]
    fn test_prepare_rejects_invalid_header() {
        let client = client("http://gw.local");
        let request = client.get("/users").header("bad header", "x");

        let err = client.prepare(request).unwrap_err();

        assert!(matches!(err, RequestError::Build(_)));
    }

    #[test]
    fn test_error_envelope_defaults_to_fallback_message() {
        let envelope = ErrorEnvelope::new(
            Request::new(Method::Get, "/users"),
            "http://gw.local/users",
            None,
            FailureCause::Timeout,
        );

        assert_eq!(envelope.message, FALLBACK_ERROR_MESSAGE);
        assert!(envelope.is_timeout());
        assert_eq!(envelope.status(), None);
        assert_eq!(
            HttpError::Response(Box::new(envelope)).to_string(),
            FALLBACK_ERROR_MESSAGE
        );
    }
}
