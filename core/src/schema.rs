//! JSON Schema documents served by a resource's `profile` link.
//!
//! Only `properties` is interpreted; every other member of the document is
//! carried through untouched so the editor sees the schema as served.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON Schema with its `properties` map split out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaDocument {
    #[serde(default)]
    pub properties: Map<String, Value>,
    #[serde(flatten)]
    pub rest: Map<String, Value>,
}

impl SchemaDocument {
    pub fn title(&self) -> Option<&str> {
        self.rest.get("title").and_then(Value::as_str)
    }

    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Remove relationship (`format: "uri"`) properties in place.
    pub fn filter_uri_properties(&mut self) -> usize {
        filter_uri_properties(&mut self.properties)
    }
}

/// Remove every property whose descriptor has `format == "uri"`.
///
/// URI-typed properties are associations to other resources; they are
/// changed by link operations, never inside a create/update body. Returns
/// the number of properties removed.
pub fn filter_uri_properties(properties: &mut Map<String, Value>) -> usize {
    let before = properties.len();
    properties.retain(|_, descriptor| !is_uri_property(descriptor));
    before - properties.len()
}

fn is_uri_property(descriptor: &Value) -> bool {
    descriptor.get("format").and_then(Value::as_str) == Some("uri")
}
