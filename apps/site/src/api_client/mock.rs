use bytes::Bytes;
use serde_json::Value;

use super::transport::{MockTransport, OutgoingRequest, RawResponse, TransportError};

fn raw(status: u16, content_type: &str, body: &str) -> RawResponse {
    RawResponse {
        status,
        content_type: Some(content_type.to_string()),
        body: Bytes::from(body.to_string()),
    }
}

impl MockTransport {
    pub(crate) fn with_json(self, status: u16, body: Value) -> Self {
        self.with_text(status, "application/json", &body.to_string())
    }

    pub(crate) fn with_text(mut self, status: u16, content_type: &str, body: &str) -> Self {
        let response = raw(status, content_type, body);
        self.expect_send()
            .once()
            .return_once(move |_| Ok(response));
        self
    }

    /// Like `with_json`, but only for a request accepted by `matcher`.
    pub(crate) fn with_json_for(
        mut self,
        matcher: impl Fn(&OutgoingRequest) -> bool + Send + 'static,
        status: u16,
        body: Value,
    ) -> Self {
        let response = raw(status, "application/json", &body.to_string());
        self.expect_send()
            .once()
            .withf(matcher)
            .return_once(move |_| Ok(response));
        self
    }

    pub(crate) fn with_failure(mut self, reason: &str) -> Self {
        let reason = reason.to_string();
        self.expect_send()
            .once()
            .return_once(move |_| Err(TransportError(reason)));
        self
    }
}
