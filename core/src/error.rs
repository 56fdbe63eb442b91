//! Error types for the HAL request form core.
//!
//! # Design
//! `NotFound` keeps its dedicated variant so callers can tell "the resource
//! does not exist" apart from any other unexpected status. All other non-2xx
//! responses land in `HttpError` with the raw status code and body.
//!
//! Probe and schema failures inside `RequestForm` never reach the caller as
//! errors; they are logged and degrade to the fallback editor. The variants
//! below surface from the standalone builders, the link parser, the editors,
//! and from driving the form out of order.

use thiserror::Error;

/// Errors returned by the core builders, parsers, editors and form.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// A payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A `Link` header segment is not of the form `<url>; rel="name"`.
    #[error("malformed Link header segment: {segment:?}")]
    MalformedLinkHeader { segment: String },

    /// A response carried no header with the given name.
    #[error("missing {0} header")]
    MissingHeader(&'static str),

    /// A parsed `Link` header has no entry for the given relation.
    #[error("no link with relation {0:?}")]
    MissingRelation(String),

    /// The schema editor has no property with the given name.
    #[error("schema has no property {0:?}")]
    UnknownField(String),

    /// The method field holds something the transport cannot send.
    #[error("unsupported HTTP method {0:?}")]
    UnsupportedMethod(String),

    /// An operation was called while the form was in the wrong state.
    #[error("cannot {action} while form is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },

    /// The host transport failed before a response was received.
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// A failure to complete an HTTP round-trip at all (DNS, connect, timeout).
///
/// Non-2xx responses are not transport errors; hosts return them as
/// `HttpResponse` values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("transport failed: {0}")]
pub struct TransportError(pub String);

impl TransportError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}
