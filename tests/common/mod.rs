//! Shared test doubles.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::{Arc, Mutex};

use serde_json::Value;
use zdesk::{ApiRequest, Transport, ZendeskError};

/// Transport that records every request and replays canned responses.
///
/// Responses are consumed in order; once they run out every call returns
/// `Value::Null`.
#[derive(Default)]
pub struct RecordingTransport {
    requests: Mutex<Vec<ApiRequest>>,
    responses: Mutex<VecDeque<Result<Value, ZendeskError>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response body.
    pub fn respond(self, body: Value) -> Self {
        self.responses.lock().unwrap().push_back(Ok(body));
        self
    }

    /// Queues a failure.
    pub fn fail(self, error: ZendeskError) -> Self {
        self.responses.lock().unwrap().push_back(Err(error));
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Everything `send` has received so far.
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Rendered relative paths (without `.json`) of the recorded requests.
    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|request| match request.path() {
                Some(path) => path.render(false),
                None => request.describe(),
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn send(
        &self,
        request: ApiRequest,
    ) -> impl Future<Output = Result<Value, ZendeskError>> + Send {
        self.requests.lock().unwrap().push(request);
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(Value::Null));
        std::future::ready(response)
    }
}
