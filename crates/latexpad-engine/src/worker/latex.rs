use std::time::Duration;

use anyhow::Context;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::task::JoinHandle;

use super::mirror::{Mirror, Update, UpdateHook};
use super::protocol::{WorkerEvent, WorkerRequest, WorkerResponse};
use crate::editing::{Document, ListenerId};

/// Quiet period the LaTeX worker waits for before re-parsing.
pub const LATEX_UPDATE_TIMEOUT: Duration = Duration::from_millis(200);

/// Parses the mirrored text and publishes the tree or the syntax error.
#[derive(Debug)]
pub struct LatexAnalyzer {
    responses: UnboundedSender<WorkerResponse>,
}

impl LatexAnalyzer {
    pub fn new(responses: UnboundedSender<WorkerResponse>) -> Self {
        Self { responses }
    }
}

impl UpdateHook for LatexAnalyzer {
    fn on_update(&mut self, update: &mut Update<'_>) -> anyhow::Result<()> {
        let value = update.value();
        if value.is_empty() {
            return Ok(());
        }

        let event = match latexpad_syntax::parse(&value) {
            Ok(tree) => {
                log::debug!("parsed {} elements", tree.elements.len());
                WorkerEvent::Parsed { data: tree }
            }
            Err(err) => {
                log::debug!("syntax error at {}:{}: {err}", err.line, err.column);
                WorkerEvent::SyntaxError { data: err }
            }
        };
        self.responses
            .send(WorkerResponse::Event { event })
            .context("response channel closed")?;
        Ok(())
    }
}

/// The two ends of a running LaTeX worker.
///
/// The worker stops, discarding any pending parse, once every request
/// sender is gone, including those handed to [`forward_changes`].
#[derive(Debug)]
pub struct WorkerHandle {
    pub requests: UnboundedSender<WorkerRequest>,
    pub responses: UnboundedReceiver<WorkerResponse>,
    pub join: JoinHandle<Mirror<LatexAnalyzer>>,
}

impl WorkerHandle {
    pub fn send(&self, request: WorkerRequest) -> anyhow::Result<()> {
        self.requests
            .send(request)
            .context("latex worker has stopped")
    }

    /// Closes the request channel and waits for the worker to finish.
    pub async fn shutdown(self) -> anyhow::Result<Mirror<LatexAnalyzer>> {
        drop(self.requests);
        let mirror = self.join.await.context("latex worker panicked")?;
        Ok(mirror)
    }
}

/// Starts a LaTeX worker on the current tokio runtime.
pub fn spawn_latex_worker(timeout: Duration) -> WorkerHandle {
    let (request_tx, request_rx) = unbounded_channel();
    let (response_tx, response_rx) = unbounded_channel();

    let mut mirror = Mirror::new(LatexAnalyzer::new(response_tx.clone()));
    mirror.set_timeout(timeout);
    log::debug!("spawning latex worker, timeout {timeout:?}");
    let join = tokio::spawn(mirror.run(request_rx, response_tx));

    WorkerHandle {
        requests: request_tx,
        responses: response_rx,
        join,
    }
}

/// Forwards every delta of `doc` to a worker as a `change` event.
pub fn forward_changes(
    doc: &mut Document,
    requests: UnboundedSender<WorkerRequest>,
) -> ListenerId {
    doc.on_change(move |event| {
        if requests.send(WorkerRequest::change(event.data.clone())).is_err() {
            log::trace!("worker gone, dropping {} delta", event.data.action());
        }
    })
}
