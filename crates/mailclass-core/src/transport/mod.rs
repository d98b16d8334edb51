//! The boundary between the orchestrator and the classification backend.

pub mod http;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

use crate::{ClassificationOptions, ClassificationResult, ClassifyError, SelectedFile};

/// Boxed future returned by transport calls.
pub type TransportFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, ClassifyError>> + Send + 'a>>;

/// Something that can carry one document to the backend and bring back a verdict.
pub trait ClassifyTransport: Send + Sync {
    /// Send `file` with `options` and map the outcome.
    ///
    /// Every failure is reported as a [`ClassifyError`]; implementations never
    /// retry.
    fn classify<'a>(
        &'a self,
        file: &'a SelectedFile,
        options: &'a ClassificationOptions,
    ) -> TransportFuture<'a, ClassificationResult>;

    /// Ask the backend whether it is up. Returns the reported status string.
    fn health(&self) -> TransportFuture<'_, String>;
}
