//! Sans-IO core for composing requests against a HAL/JSON hypermedia API.
//!
//! # Overview
//! Builds `HttpRequest` values and consumes `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round-trip, or hands the core a `Transport` that does.
//!
//! # Design
//! - `link` turns a W3C `Link` header into HAL `_links`.
//! - `schema` strips relationship (`format: "uri"`) properties from a
//!   profile's JSON Schema.
//! - `form::RequestForm` is the popup form state machine: probe, fetch the
//!   profile schema, mount a schema or fallback editor, submit, publish.
//! - `HalClient` is stateless and holds only `base_url`; every operation is
//!   split into `build_*` and `parse_*`.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod dialog;
pub mod editor;
pub mod error;
pub mod events;
pub mod form;
pub mod http;
pub mod link;
pub mod schema;
pub mod types;

pub use client::HalClient;
pub use dialog::{DialogTemplate, HeadlessViewport, Viewport};
pub use editor::{EditorOptions, FallbackEditor, PayloadEditor, SchemaEditor};
pub use error::{ApiError, TransportError};
pub use events::{EventBus, FormEvent};
pub use form::{FormConfig, FormState, RequestForm};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use link::{parse_link_header, HalLinks, Link, LinkHeaderEntry};
pub use schema::{filter_uri_properties, SchemaDocument};
pub use types::{NewPerson, Person};
