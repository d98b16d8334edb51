use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use mailclass_core::ClassifyTransport;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Receive commands from the UI and run each request on its own task.
///
/// A `Cancel`, a newer `Classify` or `shutdown` aborts the in-flight request;
/// its outcome is never reported.
pub async fn run_backend_listener<T: ClassifyTransport + 'static>(
    transport: Arc<T>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    shutdown: CancellationToken,
) {
    // Per-request token, replaced on every submission
    let mut request_cancel = CancellationToken::new();

    while let Some(cmd) = cmd_rx.recv().await {
        match cmd {
            BackendCommand::Classify(pending) => {
                request_cancel.cancel();
                request_cancel = shutdown.child_token();

                let transport = Arc::clone(&transport);
                let tx = event_tx.clone();
                let cancel = request_cancel.clone();
                tokio::spawn(async move {
                    let generation = pending.generation;
                    tokio::select! {
                        outcome = transport.classify(&pending.file, &pending.options) => {
                            let _ = tx.send(BackendEvent::Classified { generation, outcome });
                        }
                        _ = cancel.cancelled() => {
                            tracing::debug!(generation, "request aborted");
                        }
                    }
                });
            }
            BackendCommand::Cancel => {
                request_cancel.cancel();
            }
        }
    }
}
