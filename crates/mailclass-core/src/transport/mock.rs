//! Mock transport for testing.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::{ClassifyTransport, TransportFuture};
use crate::{ClassificationOptions, ClassificationResult, ClassifyError, SelectedFile};

/// A configurable mock response for [`MockTransport`].
#[derive(Clone, Debug)]
pub enum MockResponse {
    /// 2xx with a well-formed result.
    Success(ClassificationResult),
    /// Non-2xx with the given body.
    Rejected { status: u16, body: String },
    /// The host could not be reached.
    Unreachable(String),
    /// 2xx whose body is not a classification result.
    Malformed,
}

/// What the mock saw for one `classify` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecordedCall {
    pub file_name: String,
    pub body_len: usize,
    pub stemming: String,
    pub provider: String,
}

/// A hand-rolled mock implementing [`ClassifyTransport`] for tests.
///
/// Responses are served in order; the last one repeats once the sequence is
/// exhausted. Every call is recorded.
pub struct MockTransport {
    responses: Mutex<Vec<MockResponse>>,
    fallback: MockResponse,
    delay: Option<Duration>,
    calls: Mutex<Vec<RecordedCall>>,
    call_count: AtomicUsize,
}

impl MockTransport {
    /// Create a mock that always returns `response`.
    pub fn new(response: MockResponse) -> Self {
        Self {
            responses: Mutex::new(Vec::new()),
            fallback: response,
            delay: None,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Create a mock that returns responses in order, repeating the last one.
    pub fn with_sequence(mut responses: Vec<MockResponse>) -> Self {
        assert!(
            !responses.is_empty(),
            "sequence must have at least one response"
        );
        // Reverse so we can pop() from the front cheaply.
        responses.reverse();
        let fallback = responses.first().cloned().unwrap();
        Self {
            responses: Mutex::new(responses),
            fallback,
            delay: None,
            calls: Mutex::new(Vec::new()),
            call_count: AtomicUsize::new(0),
        }
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// How many times `classify()` has been called.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_response(&self) -> MockResponse {
        let mut seq = self.responses.lock().unwrap();
        seq.pop().unwrap_or_else(|| self.fallback.clone())
    }
}

impl ClassifyTransport for MockTransport {
    fn classify<'a>(
        &'a self,
        file: &'a SelectedFile,
        options: &'a ClassificationOptions,
    ) -> TransportFuture<'a, ClassificationResult> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        let response = self.next_response();
        let delay = self.delay;

        Box::pin(async move {
            let body = file.read_bytes().await?;
            self.calls.lock().unwrap().push(RecordedCall {
                file_name: file.name.clone(),
                body_len: body.len(),
                stemming: options.stemming_param().to_string(),
                provider: options.provider.as_str().to_string(),
            });

            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }

            match response {
                MockResponse::Success(result) => Ok(result),
                MockResponse::Rejected { status, body } => {
                    Err(ClassifyError::server_rejected(status, &body))
                }
                MockResponse::Unreachable(reason) => Err(ClassifyError::network(reason)),
                MockResponse::Malformed => Err(ClassifyError::network(
                    "Resposta inválida do servidor: expected value at line 1 column 1",
                )),
            }
        })
    }

    fn health(&self) -> TransportFuture<'_, String> {
        Box::pin(async { Ok("ok".to_string()) })
    }
}
