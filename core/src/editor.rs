//! Payload editors mounted inside the request dialog.
//!
//! # Design
//! Exactly one editor is active per form. `PayloadEditor` tags which one and
//! `extract_payload` is the single way the form reads the request body, so
//! swapping editors never leaves a stale accessor behind.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ApiError;
use crate::schema::SchemaDocument;

/// Initial text of the fallback editor: an empty JSON object.
pub const EMPTY_JSON_BODY: &str = "{\n}";

/// Rendering options handed to the schema-driven form renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorOptions {
    pub theme: String,
    pub disable_collapse: bool,
    pub disable_edit_json: bool,
    pub disable_properties: bool,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            theme: "bootstrap2".to_string(),
            disable_collapse: true,
            disable_edit_json: true,
            disable_properties: true,
        }
    }
}

/// Editor whose fields come from a (URI-filtered) JSON Schema.
#[derive(Debug, Clone)]
pub struct SchemaEditor {
    schema: SchemaDocument,
    options: EditorOptions,
    edits: Map<String, Value>,
}

impl SchemaEditor {
    pub fn new(schema: SchemaDocument, options: EditorOptions) -> Self {
        Self {
            schema,
            options,
            edits: Map::new(),
        }
    }

    pub fn schema(&self) -> &SchemaDocument {
        &self.schema
    }

    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Property names in schema order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.schema.properties.keys().map(String::as_str)
    }

    /// Set one field. With `disable_properties` only schema properties may be
    /// set.
    pub fn set_field(&mut self, name: &str, value: Value) -> Result<(), ApiError> {
        if self.options.disable_properties && self.schema.property(name).is_none() {
            return Err(ApiError::UnknownField(name.to_string()));
        }
        self.edits.insert(name.to_string(), value);
        Ok(())
    }

    /// The current form value: every property seeded from its `default` (or
    /// an empty value of its `type`), then overlaid with edits.
    pub fn value(&self) -> Value {
        let mut object: Map<String, Value> = self
            .schema
            .properties
            .iter()
            .map(|(name, descriptor)| (name.clone(), initial_value(descriptor)))
            .collect();
        for (name, value) in &self.edits {
            object.insert(name.clone(), value.clone());
        }
        Value::Object(object)
    }
}

fn initial_value(descriptor: &Value) -> Value {
    if let Some(default) = descriptor.get("default") {
        return default.clone();
    }
    match descriptor.get("type").and_then(Value::as_str) {
        Some("string") => Value::String(String::new()),
        Some("integer") | Some("number") => Value::from(0),
        Some("boolean") => Value::Bool(false),
        Some("array") => Value::Array(Vec::new()),
        Some("object") => Value::Object(Map::new()),
        _ => Value::Null,
    }
}

/// Plain text editor used when no schema is available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FallbackEditor {
    heading: String,
    text: String,
}

impl FallbackEditor {
    pub fn new(heading: impl Into<String>) -> Self {
        Self {
            heading: heading.into(),
            text: EMPTY_JSON_BODY.to_string(),
        }
    }

    pub fn heading(&self) -> &str {
        &self.heading
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }
}

/// The editor currently mounted in the dialog.
#[derive(Debug, Clone)]
pub enum PayloadEditor {
    Schema(SchemaEditor),
    Fallback(FallbackEditor),
}

impl PayloadEditor {
    /// The request body: the schema editor's value as JSON, or the fallback
    /// editor's raw text, sent as typed.
    pub fn extract_payload(&self) -> Result<String, ApiError> {
        match self {
            PayloadEditor::Schema(editor) => serde_json::to_string(&editor.value())
                .map_err(|e| ApiError::SerializationError(e.to_string())),
            PayloadEditor::Fallback(editor) => Ok(editor.text().to_string()),
        }
    }

    pub fn is_schema(&self) -> bool {
        matches!(self, PayloadEditor::Schema(_))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            PayloadEditor::Schema(_) => "schema",
            PayloadEditor::Fallback(_) => "fallback",
        }
    }
}
