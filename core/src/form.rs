//! The popup request form: metadata probe, schema-driven or fallback editor,
//! and submission with result events.
//!
//! # Design
//! `RequestForm` is a sans-IO state machine. Each step returns the next
//! `HttpRequest` to run (if any) and is fed the outcome through an `on_*`
//! method, so the profile fetch can only be built after the probe resolved
//! and the editor can only be mounted after the fetch resolved or a step
//! failed. `render_with` / `submit_with` run the same steps through a
//! `Transport` for hosts that are happy to block.
//!
//! Probe and schema failures are never returned to the caller: the form logs
//! them and mounts the fallback editor instead. Submission failures are
//! published as `fail-response`.

use tracing::{debug, warn};

use crate::client::{decode_body, HalClient};
use crate::dialog::{DialogTemplate, Viewport};
use crate::editor::{EditorOptions, FallbackEditor, PayloadEditor, SchemaEditor};
use crate::error::{ApiError, TransportError};
use crate::events::{EventBus, FormEvent};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, Transport};

/// Prefix of the location set after a submission.
pub const NON_GET_PREFIX: &str = "NON-GET:";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Closed,
    ProbingMetadata,
    SchemaEditorReady,
    FallbackEditorReady,
    Open,
    Submitting,
}

impl FormState {
    pub fn as_str(self) -> &'static str {
        match self {
            FormState::Closed => "closed",
            FormState::ProbingMetadata => "probing metadata",
            FormState::SchemaEditorReady => "schema editor ready",
            FormState::FallbackEditorReady => "fallback editor ready",
            FormState::Open => "open",
            FormState::Submitting => "submitting",
        }
    }
}

/// What to edit and how to present it.
#[derive(Debug, Clone)]
pub struct FormConfig {
    pub href: String,
    pub method: HttpMethod,
    pub template: DialogTemplate,
    pub editor_options: EditorOptions,
}

impl FormConfig {
    /// `href` may be a URI template; everything from the first `{` is dropped.
    pub fn new(href: &str) -> Self {
        Self {
            href: strip_uri_template(href).to_string(),
            method: HttpMethod::Post,
            template: DialogTemplate::default(),
            editor_options: EditorOptions::default(),
        }
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_template(mut self, template: DialogTemplate) -> Self {
        self.template = template;
        self
    }
}

/// `http://h/people{?page,size}` becomes `http://h/people`.
pub fn strip_uri_template(href: &str) -> &str {
    href.split('{').next().unwrap_or(href)
}

pub struct RequestForm<B, V> {
    client: HalClient,
    config: FormConfig,
    bus: B,
    viewport: V,
    state: FormState,
    visited: Vec<FormState>,
    schema_requested: bool,
    editor: Option<PayloadEditor>,
    url: String,
    method: String,
    submitted_url: Option<String>,
}

impl<B: EventBus, V: Viewport> RequestForm<B, V> {
    pub fn new(client: HalClient, config: FormConfig, bus: B, viewport: V) -> Self {
        let url = config.href.clone();
        let method = config.method.to_string();
        Self {
            client,
            config,
            bus,
            viewport,
            state: FormState::Closed,
            visited: vec![FormState::Closed],
            schema_requested: false,
            editor: None,
            url,
            method,
            submitted_url: None,
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    /// Every state entered since construction, in order.
    pub fn visited(&self) -> &[FormState] {
        &self.visited
    }

    pub fn href(&self) -> &str {
        &self.config.href
    }

    pub fn editor(&self) -> Option<&PayloadEditor> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut PayloadEditor> {
        self.editor.as_mut()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Override the target URL field of the dialog.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    /// Override the method field of the dialog. Validated on submit.
    pub fn set_method(&mut self, method: impl Into<String>) {
        self.method = method.into();
    }

    pub fn viewport(&self) -> &V {
        &self.viewport
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    /// Start a render cycle; returns the metadata probe to execute.
    pub fn render(&mut self) -> Result<HttpRequest, ApiError> {
        self.expect(FormState::Closed, "render")?;
        self.editor = None;
        self.schema_requested = false;
        self.submitted_url = None;
        self.url = self.config.href.clone();
        self.method = self.config.method.to_string();
        self.transition(FormState::ProbingMetadata);
        Ok(self.client.build_probe(&self.config.href))
    }

    /// Feed the probe outcome. Returns the profile schema fetch when the
    /// probe advertised one; otherwise the fallback editor is already open.
    pub fn on_probe(
        &mut self,
        result: Result<HttpResponse, TransportError>,
    ) -> Result<Option<HttpRequest>, ApiError> {
        self.expect(FormState::ProbingMetadata, "handle probe")?;
        if self.schema_requested {
            return Err(self.invalid("handle probe"));
        }

        let profile = result
            .map_err(ApiError::from)
            .and_then(|response| self.client.parse_profile_href(&response));

        match profile {
            Ok(href) => {
                debug!(profile = %href, "fetching profile schema");
                self.schema_requested = true;
                Ok(Some(self.client.build_profile_fetch(&href)))
            }
            Err(e) => {
                warn!(href = %self.config.href, error = %e, "metadata probe unusable, using fallback editor");
                self.mount_fallback();
                Ok(None)
            }
        }
    }

    /// Feed the schema fetch outcome and open the dialog.
    pub fn on_schema(&mut self, result: Result<HttpResponse, TransportError>) -> Result<(), ApiError> {
        self.expect(FormState::ProbingMetadata, "handle schema")?;
        if !self.schema_requested {
            return Err(self.invalid("handle schema"));
        }

        let schema = result
            .map_err(ApiError::from)
            .and_then(|response| self.client.parse_schema(response));

        match schema {
            Ok(mut schema) => {
                let removed = schema.filter_uri_properties();
                debug!(removed, "filtered relationship properties from schema");
                let editor = SchemaEditor::new(schema, self.config.editor_options.clone());
                self.mount(PayloadEditor::Schema(editor), FormState::SchemaEditorReady);
            }
            Err(e) => {
                warn!(href = %self.config.href, error = %e, "profile schema unavailable, using fallback editor");
                self.mount_fallback();
            }
        }
        Ok(())
    }

    /// Build the submission from the dialog fields and close the dialog.
    pub fn submit(&mut self) -> Result<HttpRequest, ApiError> {
        self.expect(FormState::Open, "submit")?;
        let method: HttpMethod = self.method.parse()?;
        let body = match &self.editor {
            Some(editor) => editor.extract_payload()?,
            None => return Err(self.invalid("submit")),
        };

        let request = self.client.build_submit(&self.url, method, body);
        self.viewport.hide();
        self.submitted_url = Some(request.url.clone());
        self.transition(FormState::Submitting);
        Ok(request)
    }

    /// Feed the submission outcome: publishes the result events, updates the
    /// location, and closes the form.
    pub fn on_submit(&mut self, result: Result<HttpResponse, TransportError>) -> Result<(), ApiError> {
        self.expect(FormState::Submitting, "handle submission")?;

        let (outcome, response) = match result {
            Ok(response) if response.is_success() => match decode_body(&response.body) {
                Ok(resource) => (
                    FormEvent::Response {
                        resource,
                        response: response.clone(),
                    },
                    Some(response),
                ),
                Err(e) => (fail(Some(response.clone()), e.to_string()), Some(response)),
            },
            Ok(response) => {
                let error = format!("HTTP {}", response.status);
                (fail(Some(response.clone()), error), Some(response))
            }
            Err(e) => (fail(None, e.to_string()), None),
        };

        debug!(event = outcome.name(), "submission finished");
        self.bus.trigger(outcome);
        self.bus.trigger(FormEvent::ResponseHeaders { response });

        let url = self.submitted_url.take().unwrap_or_else(|| self.url.clone());
        self.viewport.set_location(&format!("{NON_GET_PREFIX}{url}"));
        self.transition(FormState::Closed);
        Ok(())
    }

    /// Run the probe and, if advertised, the schema fetch through `transport`.
    pub fn render_with<T: Transport>(&mut self, transport: &T) -> Result<(), ApiError> {
        let probe = self.render()?;
        if let Some(fetch) = self.on_probe(transport.execute(&probe))? {
            self.on_schema(transport.execute(&fetch))?;
        }
        Ok(())
    }

    /// Submit and deliver the outcome through `transport`.
    pub fn submit_with<T: Transport>(&mut self, transport: &T) -> Result<(), ApiError> {
        let request = self.submit()?;
        self.on_submit(transport.execute(&request))
    }

    fn mount_fallback(&mut self) {
        let editor = FallbackEditor::new(self.config.href.clone());
        self.mount(PayloadEditor::Fallback(editor), FormState::FallbackEditorReady);
    }

    fn mount(&mut self, editor: PayloadEditor, ready: FormState) {
        self.viewport.render(&self.config.template.render(&self.config.href));
        self.editor = Some(editor);
        self.transition(ready);
        self.viewport.show();
        self.transition(FormState::Open);
    }

    fn transition(&mut self, to: FormState) {
        debug!(from = self.state.as_str(), to = to.as_str(), "form transition");
        self.state = to;
        self.visited.push(to);
    }

    fn expect(&self, expected: FormState, action: &'static str) -> Result<(), ApiError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, action: &'static str) -> ApiError {
        ApiError::InvalidState {
            action,
            state: self.state.as_str(),
        }
    }
}

fn fail(response: Option<HttpResponse>, error: String) -> FormEvent {
    FormEvent::FailResponse { response, error }
}
