//! Stateless HTTP request builder and response parser for a HAL API.
//!
//! # Design
//! `HalClient` holds only a `base_url` and carries no mutable state between
//! calls. Every round-trip is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`. The
//! caller executes the actual HTTP exchange, keeping the core deterministic
//! and free of I/O dependencies.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse, ACCEPT, APPLICATION_JSON, CONTENT_TYPE, LINK, SCHEMA_JSON};
use crate::link::{parse_link_header, HalLinks, PROFILE};
use crate::schema::SchemaDocument;
use crate::types::{NewPerson, Person};

/// Synchronous, stateless client for a HAL/JSON API rooted at `base_url`.
#[derive(Debug, Clone)]
pub struct HalClient {
    base_url: String,
}

impl HalClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs pass through; anything else is joined onto `base_url`.
    pub fn resolve(&self, href: &str) -> String {
        if href.starts_with("http://") || href.starts_with("https://") {
            href.to_string()
        } else {
            format!("{}/{}", self.base_url, href.trim_start_matches('/'))
        }
    }

    /// Metadata probe for `href`.
    pub fn build_probe(&self, href: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Head,
            url: self.resolve(href),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Fetch of a profile document as JSON Schema.
    pub fn build_profile_fetch(&self, profile_href: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url: self.resolve(profile_href),
            headers: vec![(ACCEPT.to_string(), SCHEMA_JSON.to_string())],
            body: None,
        }
    }

    /// A form submission: `body` is sent verbatim as JSON.
    pub fn build_submit(&self, url: &str, method: HttpMethod, body: String) -> HttpRequest {
        HttpRequest {
            method,
            url: self.resolve(url),
            headers: vec![(CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string())],
            body: Some(body),
        }
    }

    pub fn build_create_person(&self, input: &NewPerson) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.build_submit("people", HttpMethod::Post, body))
    }

    /// The links advertised in a probe response's `Link` header.
    pub fn parse_links(&self, response: &HttpResponse) -> Result<HalLinks, ApiError> {
        check_success(response)?;
        let header = response.header(LINK).ok_or(ApiError::MissingHeader("Link"))?;
        parse_link_header(header)
    }

    /// The `profile` href from a probe response.
    pub fn parse_profile_href(&self, response: &HttpResponse) -> Result<String, ApiError> {
        let links = self.parse_links(response)?;
        Ok(links.require(PROFILE)?.to_string())
    }

    pub fn parse_schema(&self, response: HttpResponse) -> Result<SchemaDocument, ApiError> {
        check_success(&response)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }

    pub fn parse_create_person(&self, response: HttpResponse) -> Result<Person, ApiError> {
        check_status(&response, 201)?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// Decode a response body as JSON; an empty body decodes to `null`.
pub fn decode_body(body: &str) -> Result<Value, ApiError> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse, expected: u16) -> Result<(), ApiError> {
    if response.status == expected {
        return Ok(());
    }
    Err(status_error(response))
}

fn check_success(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(status_error(response))
}

fn status_error(response: &HttpResponse) -> ApiError {
    if response.status == 404 {
        return ApiError::NotFound;
    }
    ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    }
}
