use std::cell::Cell;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Args;
use hal_form_core::{
    EventBus, FormConfig, FormEvent, HalClient, HeadlessViewport, HttpMethod, PayloadEditor,
    RequestForm, Transport,
};
use serde_json::{Map, Value};

use crate::config::ClientConfig;

#[derive(Debug, Args)]
pub struct ComposeArgs {
    /// Resource to open the form for; a URI-template suffix is dropped.
    pub href: String,

    /// Initial method of the form.
    #[arg(long, default_value = "POST")]
    pub method: String,

    /// Submit to this URL instead of HREF.
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Set a field: NAME=VALUE. VALUE is parsed as JSON, or taken as a string.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    pub set: Vec<(String, Value)>,

    /// Raw request body, used when no schema is available.
    #[arg(long, conflicts_with = "body_file")]
    pub body: Option<String>,

    /// Read the raw request body from a file.
    #[arg(long, value_name = "PATH")]
    pub body_file: Option<PathBuf>,
}

/// Prints result events: the resource on stdout, failures and headers in
/// the log.
#[derive(Debug, Default)]
struct PrintBus {
    failed: Cell<bool>,
}

impl EventBus for PrintBus {
    fn trigger(&self, event: FormEvent) {
        match event {
            FormEvent::Response { resource, response } => {
                tracing::info!(status = response.status, "request succeeded");
                if !resource.is_null() {
                    match serde_json::to_string_pretty(&resource) {
                        Ok(text) => println!("{text}"),
                        Err(e) => tracing::warn!("could not print response: {e}"),
                    }
                }
            }
            FormEvent::FailResponse { response, error } => {
                self.failed.set(true);
                tracing::warn!(%error, "request failed");
                if let Some(body) = response.map(|r| r.body).filter(|b| !b.is_empty()) {
                    eprintln!("{body}");
                }
            }
            FormEvent::ResponseHeaders { response } => {
                for (name, value) in response.iter().flat_map(|r| r.headers.iter()) {
                    tracing::debug!("{name}: {value}");
                }
            }
        }
    }
}

pub fn run_compose<T: Transport>(cfg: &ClientConfig, transport: &T, args: ComposeArgs) -> Result<()> {
    let client = HalClient::new(&cfg.base_url);
    let href = client.resolve(&args.href);
    let method: HttpMethod = args.method.parse()?;
    let config = FormConfig::new(&href).with_method(method);

    let mut form = RequestForm::new(client, config, PrintBus::default(), HeadlessViewport::default());
    form.render_with(transport)?;

    if let Some(url) = &args.url {
        form.set_url(url.clone());
    }
    let body = read_body(&args)?;
    let editor = form.editor_mut().ok_or_else(|| anyhow!("form did not open"))?;
    fill(editor, args.set, body)?;

    form.submit_with(transport)?;

    if let Some(location) = form.viewport().location() {
        tracing::info!(location, "location updated");
    }
    if form.bus().failed.get() {
        bail!("request to {} failed", form.url());
    }
    Ok(())
}

fn read_body(args: &ComposeArgs) -> Result<Option<String>> {
    if let Some(path) = &args.body_file {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read body file {}", path.display()))?;
        return Ok(Some(text));
    }
    Ok(args.body.clone())
}

/// Schema editors take `--set` fields; the fallback editor takes the raw
/// body, or an object built from `--set` fields when no body was given.
fn fill(editor: &mut PayloadEditor, fields: Vec<(String, Value)>, body: Option<String>) -> Result<()> {
    match editor {
        PayloadEditor::Schema(editor) => {
            if body.is_some() {
                tracing::warn!("schema editor active, ignoring raw body");
            }
            for (name, value) in fields {
                editor.set_field(&name, value)?;
            }
        }
        PayloadEditor::Fallback(editor) => match body {
            Some(text) => {
                if !fields.is_empty() {
                    tracing::warn!("raw body given, ignoring --set fields");
                }
                editor.set_text(text);
            }
            None if !fields.is_empty() => {
                let object: Map<String, Value> = fields.into_iter().collect();
                editor.set_text(serde_json::to_string(&object)?);
            }
            None => {}
        },
    }
    Ok(())
}

fn parse_assignment(raw: &str) -> Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got {raw:?}"))?;
    if name.is_empty() {
        return Err(format!("empty field name in {raw:?}"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal_form_core::{EditorOptions, FallbackEditor, SchemaDocument, SchemaEditor};
    use serde_json::json;

    fn schema_editor() -> PayloadEditor {
        let schema: SchemaDocument =
            serde_json::from_value(json!({"properties": {"name": {"type": "string"}}})).unwrap();
        PayloadEditor::Schema(SchemaEditor::new(schema, EditorOptions::default()))
    }

    #[test]
    fn assignment_value_is_json_when_possible() {
        assert_eq!(parse_assignment("age=42").unwrap(), ("age".to_string(), json!(42)));
        assert_eq!(parse_assignment("name=Frodo").unwrap(), ("name".to_string(), json!("Frodo")));
        assert_eq!(parse_assignment("tag=a=b").unwrap(), ("tag".to_string(), json!("a=b")));
    }

    #[test]
    fn assignment_requires_name_and_equals() {
        assert!(parse_assignment("nope").is_err());
        assert!(parse_assignment("=1").is_err());
    }

    #[test]
    fn schema_editor_takes_fields() {
        let mut editor = schema_editor();
        fill(&mut editor, vec![("name".to_string(), json!("Sam"))], Some("{}".to_string())).unwrap();
        assert_eq!(editor.extract_payload().unwrap(), r#"{"name":"Sam"}"#);
    }

    #[test]
    fn schema_editor_rejects_unknown_field() {
        let mut editor = schema_editor();
        assert!(fill(&mut editor, vec![("father".to_string(), json!("x"))], None).is_err());
    }

    #[test]
    fn fallback_builds_object_from_fields() {
        let mut editor = PayloadEditor::Fallback(FallbackEditor::new("http://h/people"));
        fill(&mut editor, vec![("name".to_string(), json!("Sam"))], None).unwrap();
        assert_eq!(editor.extract_payload().unwrap(), r#"{"name":"Sam"}"#);
    }

    #[test]
    fn fallback_prefers_raw_body() {
        let mut editor = PayloadEditor::Fallback(FallbackEditor::new("http://h/people"));
        fill(
            &mut editor,
            vec![("name".to_string(), json!("Sam"))],
            Some(r#"{"name":"Rosie"}"#.to_string()),
        )
        .unwrap();
        assert_eq!(editor.extract_payload().unwrap(), r#"{"name":"Rosie"}"#);
    }

    #[test]
    fn fallback_without_input_keeps_empty_object() {
        let mut editor = PayloadEditor::Fallback(FallbackEditor::new("http://h/people"));
        fill(&mut editor, Vec::new(), None).unwrap();
        assert_eq!(editor.extract_payload().unwrap(), "{\n}");
    }
}
