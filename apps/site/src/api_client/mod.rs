//! API Client: the single point of HTTP egress for the site's backend calls.
//!
//! Every call is joined onto one base URL fixed at construction. Responses are
//! decoded by declared content type first, then classified by status, so error
//! bodies can carry a structured `message`.
//!
//! One attempt per call: no retries, no timeout.
use std::sync::Arc;

use reqwest::{Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

pub mod transport;

#[cfg(test)]
pub(crate) mod mock;

pub use transport::{OutgoingRequest, RawResponse, ReqwestTransport, Transport, TransportError};

pub const NETWORK_ERROR_MESSAGE: &str = "Network error. Please check your connection.";
const DECODE_ERROR_MESSAGE: &str = "Received an invalid response from the server.";
const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum ApiError {
    /// No response at all. The underlying transport error is logged, not surfaced.
    #[error("{}", NETWORK_ERROR_MESSAGE)]
    Network,

    #[error("{message}")]
    Http { status: u16, message: String },

    /// A success response that declared JSON but did not contain it.
    #[error("{}", DECODE_ERROR_MESSAGE)]
    Decode { status: u16 },

    #[error("Failed to serialize request body: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Unexpected response payload: {0}")]
    UnexpectedPayload(String),
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    /// Deserializes a JSON payload into `T`. Text payloads are rejected.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        match self {
            Payload::Json(value) => serde_json::from_value(value)
                .map_err(|e| ApiError::UnexpectedPayload(e.to_string())),
            Payload::Text(text) => Err(ApiError::UnexpectedPayload(format!(
                "expected JSON, got text ({} bytes)",
                text.len()
            ))),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }
}

/// Per-call request shape. Headers given here override the client defaults.
#[derive(Debug, Clone)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            method: Method::GET,
            headers: Vec::new(),
            body: None,
        }
    }
}

impl RequestOptions {
    pub fn method(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into(),
            transport,
        }
    }

    pub fn with_reqwest(base_url: impl Into<String>) -> Self {
        Self::new(base_url, Arc::new(ReqwestTransport::default()))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Joins `path` onto the base URL with exactly one `/` between them.
    pub fn url_for(&self, path: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{base}/{path}")
    }

    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Payload, ApiError> {
        let request = OutgoingRequest {
            method: options.method,
            url: self.url_for(path),
            headers: merge_headers(&options.headers),
            body: options.body,
        };
        let method = request.method.clone();
        let url = request.url.clone();

        let raw = match self.transport.send(request).await {
            Ok(raw) => raw,
            Err(e) => {
                warn!("{method} {url} failed before a response: {e}");
                return Err(ApiError::Network);
            }
        };

        debug!("{method} {url} -> {}", raw.status);
        classify(raw)
    }

    pub async fn get(&self, path: &str) -> Result<Payload, ApiError> {
        self.request(path, RequestOptions::method(Method::GET)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Payload, ApiError> {
        self.request(path, RequestOptions::method(Method::DELETE)).await
    }

    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
    ) -> Result<Payload, ApiError> {
        self.send_body(Method::POST, path, data).await
    }

    pub async fn put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
    ) -> Result<Payload, ApiError> {
        self.send_body(Method::PUT, path, data).await
    }

    pub async fn patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        data: &B,
    ) -> Result<Payload, ApiError> {
        self.send_body(Method::PATCH, path, data).await
    }

    async fn send_body<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        data: &B,
    ) -> Result<Payload, ApiError> {
        let body = serde_json::to_string(data)?;
        self.request(path, RequestOptions::method(method).body(body))
            .await
    }
}

/// `Content-Type: application/json` first, then caller headers. A caller header
/// with the same name (case-insensitive) replaces the default.
fn merge_headers(caller: &[(String, String)]) -> Vec<(String, String)> {
    let mut merged = vec![("Content-Type".to_string(), JSON_CONTENT_TYPE.to_string())];
    for (name, value) in caller {
        match merged.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((name.clone(), value.clone())),
        }
    }
    merged
}

fn classify(raw: RawResponse) -> Result<Payload, ApiError> {
    let declares_json = raw
        .content_type
        .as_deref()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains(JSON_CONTENT_TYPE));

    let decoded = if declares_json {
        serde_json::from_slice::<Value>(&raw.body).map(Payload::Json)
    } else {
        Ok(Payload::Text(String::from_utf8_lossy(&raw.body).into_owned()))
    };

    let is_success = (200..300).contains(&raw.status);
    match decoded {
        Ok(payload) if is_success => Ok(payload),
        Err(e) if is_success => {
            warn!("Malformed JSON body on {} response: {e}", raw.status);
            Err(ApiError::Decode { status: raw.status })
        }
        decoded => Err(ApiError::Http {
            status: raw.status,
            message: error_message(raw.status, decoded.ok().as_ref()),
        }),
    }
}

/// The body's `message` field when it is a non-empty string, else a
/// status-derived fallback.
fn error_message(status: u16, payload: Option<&Payload>) -> String {
    let from_body = payload
        .and_then(Payload::as_json)
        .and_then(|v| v.get("message"))
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty());

    match from_body {
        Some(message) => message.to_string(),
        None => {
            let reason = StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .map(str::to_string)
                .unwrap_or_else(|| status.to_string());
            format!("API Error: {reason}")
        }
    }
}
