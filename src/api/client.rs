//! Purpose: Provide the transport seam and the HTTP client for the generation service.
//! Exports: `ApiResult`, `ExecutionRequest`, `Transport`, `HttpTransport`.
//! Role: Capability boundary: "send one request, return raw response text".
//! Invariants: The pipeline never inspects transport internals; all failures map to `Transport`.
//! Invariants: Raw response text is returned untouched; repair happens downstream.
#![allow(clippy::result_large_err)]
use crate::core::error::{Error, ErrorKind};
use serde::Serialize;
use std::io::Read;
use std::sync::Arc;
use url::Url;

pub type ApiResult<T> = Result<T, Error>;

/// Request envelope the service expects on its `/execution` endpoint.
/// `session_id` threads the conversation: empty on the first request,
/// then echoed back unchanged from each response.
#[derive(Clone, Debug, Serialize)]
pub struct ExecutionRequest<'a> {
    pub prompt: &'a str,
    pub attachments: &'a [String],
    pub session_id: &'a str,
}

pub trait Transport {
    fn execute(&self, request: &ExecutionRequest<'_>) -> ApiResult<String>;
}

#[derive(Clone)]
pub struct HttpTransport {
    inner: Arc<HttpTransportInner>,
}

struct HttpTransportInner {
    execution_url: Url,
    agent: ureq::Agent,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        let execution_url = resolve_execution_url(base_url.into())?;
        let agent = ureq::AgentBuilder::new().build();
        Ok(Self {
            inner: Arc::new(HttpTransportInner {
                execution_url,
                agent,
            }),
        })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: &ExecutionRequest<'_>) -> ApiResult<String> {
        let payload = serde_json::to_string(request).map_err(|err| {
            Error::new(ErrorKind::Internal)
                .with_message("failed to encode request json")
                .with_source(err)
        })?;

        tracing::debug!(
            url = self.inner.execution_url.as_str(),
            bytes = payload.len(),
            "sending execution request"
        );

        let response = self
            .inner
            .agent
            .request("POST", self.inner.execution_url.as_str())
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_string(&payload);

        let response = match response {
            Ok(resp) => resp,
            Err(ureq::Error::Status(code, _)) => {
                return Err(Error::new(ErrorKind::Transport)
                    .with_message(format!("service returned status {code}"))
                    .with_hint("Check that the generation service is healthy."));
            }
            Err(ureq::Error::Transport(err)) => {
                return Err(Error::new(ErrorKind::Transport)
                    .with_message("failed to send message")
                    .with_source(err));
            }
        };

        // Payloads carry base64 image/glTF data, so read without the
        // default into_string size cap.
        let mut raw = String::new();
        response
            .into_reader()
            .read_to_string(&mut raw)
            .map_err(|err| {
                Error::new(ErrorKind::Transport)
                    .with_message("failed to read response body")
                    .with_source(err)
            })?;

        tracing::debug!(bytes = raw.len(), "received raw response text");
        Ok(raw)
    }
}

fn resolve_execution_url(base_url: String) -> ApiResult<Url> {
    let mut base = Url::parse(&base_url).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid service URL")
            .with_hint("Use a base URL like http://localhost:8888.")
            .with_source(err)
    })?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join("execution").map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message("invalid service URL")
            .with_source(err)
    })
}
