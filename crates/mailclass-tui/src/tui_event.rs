use mailclass_core::{ClassificationResult, ClassifyError, PendingSubmission};

/// Commands sent from the TUI to the backend listener.
#[derive(Debug)]
pub enum BackendCommand {
    /// Issue the request described by a pending submission.
    Classify(PendingSubmission),
    /// Abort the in-flight request, if any.
    Cancel,
}

/// Events flowing from the backend listener to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    /// A request finished. `generation` identifies the submission it belongs to.
    Classified {
        generation: u64,
        outcome: Result<ClassificationResult, ClassifyError>,
    },
}
