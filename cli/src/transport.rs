//! Blocking `Transport` backed by ureq.

use std::time::Duration;

use hal_form_core::{HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};

/// Executes core requests with a shared ureq agent.
///
/// Status codes are never treated as errors here; 4xx/5xx come back as
/// `HttpResponse` values for the core to interpret.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Transport for UreqTransport {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        tracing::debug!(method = %req.method, url = %req.url, "sending request");

        let agent = &self.agent;
        let body = req.body.as_deref().unwrap_or_default().as_bytes();
        let result = match req.method {
            HttpMethod::Get => with_headers(agent.get(&req.url), req).call(),
            HttpMethod::Head => with_headers(agent.head(&req.url), req).call(),
            HttpMethod::Delete => with_headers(agent.delete(&req.url), req).call(),
            HttpMethod::Post => with_headers(agent.post(&req.url), req).send(body),
            HttpMethod::Put => with_headers(agent.put(&req.url), req).send(body),
            HttpMethod::Patch => with_headers(agent.patch(&req.url), req).send(body),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| TransportError::new(e.to_string()))?;

        tracing::debug!(status, url = %req.url, "received response");
        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}
