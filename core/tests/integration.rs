//! Full render/submit cycles against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `RequestForm` and
//! `HalClient` over real HTTP using ureq. Validates that the core's request
//! building and response handling work end-to-end with the actual server.

use std::net::SocketAddr;
use std::sync::mpsc;

use hal_form_core::{
    FormConfig, FormEvent, FormState, HalClient, HeadlessViewport, HttpMethod, HttpRequest,
    HttpResponse, NewPerson, PayloadEditor, RequestForm, Transport, TransportError,
};
use serde_json::json;

/// Executes requests with ureq.
///
/// Disables ureq's automatic status-code-as-error behavior so 4xx/5xx
/// responses are returned as data rather than `Err`, letting the core
/// handle status interpretation.
struct Ureq(ureq::Agent);

impl Ureq {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self(agent)
    }
}

impl Transport for Ureq {
    fn execute(&self, req: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let agent = &self.0;
        let body = req.body.clone().unwrap_or_default();
        let result = match req.method {
            HttpMethod::Get => with_headers(agent.get(&req.url), req).call(),
            HttpMethod::Head => with_headers(agent.head(&req.url), req).call(),
            HttpMethod::Delete => with_headers(agent.delete(&req.url), req).call(),
            HttpMethod::Post => with_headers(agent.post(&req.url), req).send(body.as_bytes()),
            HttpMethod::Put => with_headers(agent.put(&req.url), req).send(body.as_bytes()),
            HttpMethod::Patch => with_headers(agent.patch(&req.url), req).send(body.as_bytes()),
        };
        let mut response = result.map_err(|e| TransportError::new(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.as_str().to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response.body_mut().read_to_string().unwrap_or_default();

        Ok(HttpResponse { status, headers, body })
    }
}

fn with_headers<B>(mut builder: ureq::RequestBuilder<B>, req: &HttpRequest) -> ureq::RequestBuilder<B> {
    for (name, value) in &req.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn start_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn schema_driven_create_cycle() {
    let addr = start_server();
    let base = format!("http://{addr}");
    let transport = Ureq::new();
    let (tx, rx) = mpsc::channel();

    let mut form = RequestForm::new(
        HalClient::new(&base),
        FormConfig::new(&format!("{base}/people{{?page,size,sort}}")),
        tx,
        HeadlessViewport::default(),
    );

    // Step 1: probe, fetch schema, open.
    form.render_with(&transport).unwrap();
    assert_eq!(form.state(), FormState::Open);
    assert!(form.visited().contains(&FormState::SchemaEditorReady));

    // Step 2: relationship fields are gone; fill in the rest.
    match form.editor_mut().unwrap() {
        PayloadEditor::Schema(editor) => {
            let fields: Vec<&str> = editor.fields().collect();
            assert_eq!(fields, ["name"]);
            editor.set_field("name", json!("Frodo")).unwrap();
        }
        other => panic!("expected schema editor, got {}", other.kind()),
    }

    // Step 3: submit.
    form.submit_with(&transport).unwrap();
    assert_eq!(form.state(), FormState::Closed);

    let events: Vec<FormEvent> = rx.try_iter().collect();
    let names: Vec<&str> = events.iter().map(FormEvent::name).collect();
    assert_eq!(names, ["response", "response-headers"]);
    match &events[0] {
        FormEvent::Response { resource, response } => {
            assert_eq!(resource["name"], "Frodo");
            assert_eq!(response.status, 201);
        }
        other => panic!("unexpected {other:?}"),
    }
    match &events[1] {
        FormEvent::ResponseHeaders { response: Some(response) } => {
            assert!(response.header("location").is_some());
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(
        form.viewport().locations,
        vec![format!("NON-GET:{base}/people")]
    );
}

#[test]
fn item_without_link_header_uses_fallback_editor() {
    let addr = start_server();
    let base = format!("http://{addr}");
    let transport = Ureq::new();
    let client = HalClient::new(&base);

    let created = client
        .parse_create_person(
            transport
                .execute(
                    &client
                        .build_create_person(&NewPerson {
                            name: "Sam".to_string(),
                        })
                        .unwrap(),
                )
                .unwrap(),
        )
        .unwrap();
    let item = created.self_href().unwrap().to_string();

    let (tx, rx) = mpsc::channel();
    let mut form = RequestForm::new(
        client,
        FormConfig::new(&item).with_method(HttpMethod::Patch),
        tx,
        HeadlessViewport::default(),
    );
    form.render_with(&transport).unwrap();
    assert!(form.visited().contains(&FormState::FallbackEditorReady));
    assert!(!form.visited().contains(&FormState::SchemaEditorReady));

    if let Some(PayloadEditor::Fallback(editor)) = form.editor_mut() {
        editor.set_text(r#"{"name":"Samwise"}"#);
    }
    form.submit_with(&transport).unwrap();

    let events: Vec<FormEvent> = rx.try_iter().collect();
    match &events[0] {
        FormEvent::Response { resource, .. } => assert_eq!(resource["name"], "Samwise"),
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(form.viewport().location(), Some(format!("NON-GET:{item}").as_str()));
}

#[test]
fn failed_submission_publishes_fail_response() {
    let addr = start_server();
    let base = format!("http://{addr}");
    let transport = Ureq::new();
    let (tx, rx) = mpsc::channel();

    let mut form = RequestForm::new(
        HalClient::new(&base),
        FormConfig::new(&format!("{base}/people")),
        tx,
        HeadlessViewport::default(),
    );
    form.render_with(&transport).unwrap();
    form.set_url(format!("{base}/people/00000000-0000-0000-0000-000000000000"));
    form.set_method("DELETE");
    form.submit_with(&transport).unwrap();

    let events: Vec<FormEvent> = rx.try_iter().collect();
    let names: Vec<&str> = events.iter().map(FormEvent::name).collect();
    assert_eq!(names, ["fail-response", "response-headers"]);
    match &events[0] {
        FormEvent::FailResponse { response: Some(response), .. } => assert_eq!(response.status, 404),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unreachable_server_degrades_to_fallback() {
    // Bind then drop to get a port nothing listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let base = format!("http://127.0.0.1:{port}");
    let (tx, _rx) = mpsc::channel();

    let mut form = RequestForm::new(
        HalClient::new(&base),
        FormConfig::new(&format!("{base}/people")),
        tx,
        HeadlessViewport::default(),
    );
    form.render_with(&Ureq::new()).unwrap();

    assert_eq!(form.state(), FormState::Open);
    assert!(form.viewport().visible);
    assert_eq!(form.editor().unwrap().kind(), "fallback");
}
