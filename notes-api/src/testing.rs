use crate::pipeline::{HttpFailure, Notifier, OutboundRequest, PipelineResult, RawResponse, Transport};
use futures::future::BoxFuture;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Transport double that replays queued responses and records every request
/// it receives. Clones share the same queue and log.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    responses: Arc<Mutex<VecDeque<PipelineResult>>>,
    requests: Arc<Mutex<Vec<OutboundRequest>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, result: PipelineResult) {
        self.responses.lock().unwrap().push_back(result);
    }

    /// Queue a response with the given status and raw body. Non-2xx statuses
    /// are queued as failures, the way the real transport reports them.
    pub fn push_raw(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap();
        let body = body.to_string();
        if status.is_success() {
            self.push(Ok(RawResponse { status, body }));
        } else {
            self.push(Err(HttpFailure::Status {
                status,
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            }));
        }
    }

    pub fn push_json(&self, status: u16, body: serde_json::Value) {
        self.push_raw(status, &body.to_string());
    }

    pub fn push_network_error(&self, message: &str) {
        self.push(Err(HttpFailure::Network {
            message: message.to_string(),
        }));
    }

    /// Delay every response, to simulate a slow server.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    pub fn requests(&self) -> Vec<OutboundRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: OutboundRequest) -> BoxFuture<'_, PipelineResult> {
        Box::pin(async move {
            self.requests.lock().unwrap().push(request);

            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| {
                    Err(HttpFailure::Network {
                        message: "no scripted response".to_string(),
                    })
                })
        })
    }
}

/// Notifier double that keeps every (title, message) pair.
#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, title: &str, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push((title.to_string(), message.to_string()));
    }
}
