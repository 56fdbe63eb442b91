//! Result events published by a request form after a submission.

use std::sync::mpsc::Sender;

use serde_json::Value;

use crate::http::HttpResponse;

/// One event on the host's event bus.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// The submission succeeded; `resource` is the decoded body.
    Response {
        resource: Value,
        response: HttpResponse,
    },
    /// The submission failed. `response` is absent when the transport never
    /// got one.
    FailResponse {
        response: Option<HttpResponse>,
        error: String,
    },
    /// Always published after `Response` or `FailResponse`.
    ResponseHeaders { response: Option<HttpResponse> },
}

impl FormEvent {
    /// The event name as hosts subscribe to it.
    pub fn name(&self) -> &'static str {
        match self {
            FormEvent::Response { .. } => "response",
            FormEvent::FailResponse { .. } => "fail-response",
            FormEvent::ResponseHeaders { .. } => "response-headers",
        }
    }
}

/// Fire-and-forget publisher injected into the form.
pub trait EventBus {
    fn trigger(&self, event: FormEvent);
}

/// Sending to a channel whose receiver is gone is a silent no-op.
impl EventBus for Sender<FormEvent> {
    fn trigger(&self, event: FormEvent) {
        let _ = self.send(event);
    }
}

impl<B: EventBus + ?Sized> EventBus for &B {
    fn trigger(&self, event: FormEvent) {
        (**self).trigger(event)
    }
}
