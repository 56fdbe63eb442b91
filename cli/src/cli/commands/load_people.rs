use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use hal_form_core::{HalClient, NewPerson, Transport};

use crate::config::ClientConfig;

/// Outcome of a load run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LoadSummary {
    pub created: usize,
    pub failed: usize,
}

/// POST `{"name": <line>}` to `/people` for every non-blank line of `file`,
/// one request at a time. Failures are logged and counted; nothing is
/// retried.
pub fn run_load_people<T: Transport>(cfg: &ClientConfig, transport: &T, file: &Path) -> Result<LoadSummary> {
    let contents = fs::read_to_string(file)
        .with_context(|| format!("failed to read names file {}", file.display()))?;
    let client = HalClient::new(&cfg.base_url);

    let summary = load_names(&client, transport, &contents)?;
    tracing::info!(created = summary.created, failed = summary.failed, "load finished");
    if summary.failed > 0 {
        bail!("{} of {} people failed to load", summary.failed, summary.created + summary.failed);
    }
    Ok(summary)
}

fn load_names<T: Transport>(client: &HalClient, transport: &T, contents: &str) -> Result<LoadSummary> {
    let mut summary = LoadSummary::default();

    for (index, line) in contents.lines().enumerate() {
        if line.trim().is_empty() {
            tracing::debug!(line = index + 1, "skipping blank line");
            continue;
        }

        let request = client.build_create_person(&NewPerson {
            name: line.to_string(),
        })?;
        let outcome = transport
            .execute(&request)
            .map_err(Into::into)
            .and_then(|response| client.parse_create_person(response));

        match outcome {
            Ok(person) => {
                summary.created += 1;
                tracing::debug!(name = %person.name, href = ?person.self_href(), "created");
            }
            Err(e) => {
                summary.failed += 1;
                tracing::warn!(line = index + 1, name = line, error = %e, "create failed");
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hal_form_core::{HttpMethod, HttpRequest, HttpResponse, TransportError};
    use std::cell::RefCell;

    /// Answers every request with a fixed status and records what was sent.
    struct Canned {
        status: u16,
        sent: RefCell<Vec<HttpRequest>>,
    }

    impl Canned {
        fn new(status: u16) -> Self {
            Self {
                status,
                sent: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for Canned {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.sent.borrow_mut().push(request.clone());
            let body = request.body.clone().unwrap_or_default();
            Ok(HttpResponse {
                status: self.status,
                headers: Vec::new(),
                body,
            })
        }
    }

    #[test]
    fn one_post_per_line_in_order() {
        let transport = Canned::new(201);
        let client = HalClient::new("http://h");
        let summary = load_names(&client, &transport, "Frodo\nSam\n\nMerry\n").unwrap();

        assert_eq!(summary, LoadSummary { created: 3, failed: 0 });
        let sent = transport.sent.borrow();
        let names: Vec<&str> = sent.iter().map(|r| r.body.as_deref().unwrap()).collect();
        assert_eq!(names, [r#"{"name":"Frodo"}"#, r#"{"name":"Sam"}"#, r#"{"name":"Merry"}"#]);
        assert!(sent.iter().all(|r| r.method == HttpMethod::Post && r.url == "http://h/people"));
        assert!(sent.iter().all(|r| r.header("content-type") == Some("application/json")));
    }

    #[test]
    fn failures_are_counted_not_retried() {
        let transport = Canned::new(500);
        let client = HalClient::new("http://h");
        let summary = load_names(&client, &transport, "Frodo\nSam").unwrap();

        assert_eq!(summary, LoadSummary { created: 0, failed: 2 });
        assert_eq!(transport.sent.borrow().len(), 2);
    }
}
