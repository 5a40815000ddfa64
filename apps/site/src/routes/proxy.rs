//! `/api` reverse proxy.
//!
//! Requests keep their full path (the `/api` prefix included) and query string
//! and are re-issued against the backend. The outgoing `Host` is the backend's
//! own, so virtual-hosted backends route the call correctly.

use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Error as BodyError,
};
use http_body_util::LengthLimitError;
use tracing::debug;

use crate::errors::AppError;
use crate::state::AppState;

/// Largest request body the proxy will buffer.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// ANY /api, ANY /api/, ANY /api/*
pub async fn proxy_handler(
    State(state): State<AppState>,
    request: Request,
) -> Result<Response, AppError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let target = format!("{}{}", state.backend_url, path_and_query);

    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(body_error)?;

    debug!("[proxy] {} {} -> {}", parts.method, parts.uri, target);

    let upstream = state
        .http
        .request(parts.method, &target)
        .headers(forwardable(&parts.headers, true))
        .body(body)
        .send()
        .await
        .map_err(|e| AppError::BadGateway(format!("{target}: {e}")))?;

    let status = upstream.status();
    let headers = forwardable(upstream.headers(), false);
    let bytes = upstream
        .bytes()
        .await
        .map_err(|e| AppError::BadGateway(format!("{target}: reading body: {e}")))?;

    debug!("[proxy] {} <- {}", target, status);

    Ok((status, headers, Body::from(bytes)).into_response())
}

fn body_error(err: BodyError) -> AppError {
    let err = err.into_inner();
    if err.is::<LengthLimitError>() {
        AppError::PayloadTooLarge(format!(
            "Request body exceeds {MAX_BODY_BYTES} bytes"
        ))
    } else {
        AppError::BadRequest(format!("Unreadable request body: {err}"))
    }
}

/// Copies `headers` minus hop-by-hop headers and `Content-Length` (recomputed
/// from the buffered body). Request headers also lose `Host`.
fn forwardable(headers: &HeaderMap, outgoing: bool) -> HeaderMap {
    let mut forwarded = headers.clone();
    for name in HOP_BY_HOP {
        forwarded.remove(name);
    }
    forwarded.remove(header::CONTENT_LENGTH);
    if outgoing {
        forwarded.remove(header::HOST);
    }
    forwarded
}
