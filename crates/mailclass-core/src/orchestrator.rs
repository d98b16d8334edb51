//! Submission lifecycle: Idle -> Loading -> Success | Failure.
//!
//! A submission is split in two halves so the network call can run elsewhere
//! (a spawned task in the TUI) while the state stays with its owner:
//!
//! - [`RequestOrchestrator::begin_submit`] validates, clears the previous
//!   outcome, enters Loading and hands out a [`PendingSubmission`].
//! - [`RequestOrchestrator::complete`] applies the outcome, but only if the
//!   ticket's generation is still current. Anything that starts a newer
//!   submission or calls [`RequestOrchestrator::cancel`] makes older tickets
//!   stale, and their late responses are dropped.

use crate::selection::validate_file_name;
use crate::transport::ClassifyTransport;
use crate::{
    ClassificationOptions, ClassificationResult, ClassifyError, FileSelectionManager, Provider,
    SelectedFile,
};

/// Where the current submission stands. Exactly one holds at a time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestState {
    #[default]
    Idle,
    Loading {
        generation: u64,
    },
    Success(ClassificationResult),
    Failure(ClassifyError),
}

/// Everything needed to issue one request, captured when it began.
#[derive(Debug, Clone)]
pub struct PendingSubmission {
    pub generation: u64,
    pub file: SelectedFile,
    pub options: ClassificationOptions,
}

#[derive(Debug, Clone, Default)]
pub struct RequestOrchestrator {
    state: RequestState,
    generation: u64,
    requested_provider: Provider,
}

impl RequestOrchestrator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the selection and enter Loading.
    ///
    /// On a validation failure the state becomes `Failure` and no ticket is
    /// issued, so no network I/O can follow.
    pub fn begin_submit(
        &mut self,
        selection: &FileSelectionManager,
        options: &ClassificationOptions,
    ) -> Result<PendingSubmission, ClassifyError> {
        // Invalidate whatever may still be in flight.
        self.generation = self.generation.wrapping_add(1);

        let checked = match selection.selected() {
            None => Err(ClassifyError::NoFileSelected),
            Some(file) => validate_file_name(&file.name).map(|()| file.clone()),
        };
        let file = match checked {
            Ok(file) => file,
            Err(err) => {
                tracing::debug!(error = %err, "submission rejected before sending");
                self.state = RequestState::Failure(err.clone());
                return Err(err);
            }
        };

        self.requested_provider = options.provider;
        self.state = RequestState::Loading {
            generation: self.generation,
        };
        tracing::debug!(
            generation = self.generation,
            file = %file.name,
            "submission started"
        );

        Ok(PendingSubmission {
            generation: self.generation,
            file,
            options: *options,
        })
    }

    /// Apply the outcome of the request started with `generation`.
    ///
    /// Returns `false` (and changes nothing) if that submission is no longer
    /// current.
    pub fn complete(
        &mut self,
        generation: u64,
        outcome: Result<ClassificationResult, ClassifyError>,
    ) -> bool {
        let current = matches!(
            self.state,
            RequestState::Loading { generation: g } if g == generation
        );
        if !current {
            tracing::debug!(
                generation,
                current = self.generation,
                "discarding stale classification response"
            );
            return false;
        }

        self.state = match outcome {
            Ok(result) => {
                tracing::info!(category = %result.category, "classification succeeded");
                RequestState::Success(result)
            }
            Err(err) => {
                tracing::info!(error = %err, "classification failed");
                RequestState::Failure(err)
            }
        };
        true
    }

    /// Abandon the in-flight request, if any, and return to Idle.
    pub fn cancel(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.generation = self.generation.wrapping_add(1);
        self.state = RequestState::Idle;
        tracing::debug!(generation = self.generation, "submission cancelled");
        true
    }

    /// Run a whole submission against `transport`.
    ///
    /// If the returned future is dropped before the response arrives, the
    /// submission is cancelled and the state goes back to Idle.
    pub async fn submit<T: ClassifyTransport + ?Sized>(
        &mut self,
        selection: &FileSelectionManager,
        options: &ClassificationOptions,
        transport: &T,
    ) -> Result<ClassificationResult, ClassifyError> {
        let pending = self.begin_submit(selection, options)?;
        let guard = InFlight {
            orchestrator: self,
            generation: pending.generation,
        };
        let outcome = transport.classify(&pending.file, &pending.options).await;
        guard.finish(outcome.clone());
        outcome
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, RequestState::Loading { .. })
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.state {
            RequestState::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ClassifyError> {
        match &self.state {
            RequestState::Failure(err) => Some(err),
            _ => None,
        }
    }

    /// The message to show for the current failure, if any.
    pub fn error_message(&self) -> Option<String> {
        self.error().map(|e| e.to_string())
    }

    /// Provider option in effect when the latest request was issued.
    pub fn requested_provider(&self) -> Provider {
        self.requested_provider
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Leaves Loading when a running [`RequestOrchestrator::submit`] is dropped.
struct InFlight<'a> {
    orchestrator: &'a mut RequestOrchestrator,
    generation: u64,
}

impl InFlight<'_> {
    fn finish(mut self, outcome: Result<ClassificationResult, ClassifyError>) {
        self.orchestrator.complete(self.generation, outcome);
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let current = matches!(
            self.orchestrator.state,
            RequestState::Loading { generation } if generation == self.generation
        );
        if current {
            tracing::debug!(generation = self.generation, "submission dropped mid-flight");
            self.orchestrator.cancel();
        }
    }
}
