use std::time::Duration;

use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::time::{Instant, sleep_until};

use super::protocol::{EditorEvent, WorkerCall, WorkerRequest, WorkerResponse};
use crate::editing::{Delta, Document};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// The analysis a [`Mirror`] runs once its document has been quiet for the
/// configured timeout.
pub trait UpdateHook: Send {
    fn on_update(&mut self, update: &mut Update<'_>) -> anyhow::Result<()>;
}

/// What a hook sees while it runs.
pub struct Update<'a> {
    doc: &'a Document,
    rearm: bool,
}

impl<'a> Update<'a> {
    pub fn new(doc: &'a Document) -> Self {
        Self { doc, rearm: false }
    }

    pub fn document(&self) -> &'a Document {
        self.doc
    }

    pub fn value(&self) -> String {
        self.doc.value()
    }

    /// Runs the hook again after another full timeout.
    pub fn schedule(&mut self) {
        self.rearm = true;
    }
}

/// A replica of the primary document that debounces an analysis hook.
///
/// Every edit re-arms a single trailing-edge deadline; the hook fires once
/// the deadline passes without further edits.
pub struct Mirror<H> {
    doc: Document,
    timeout: Duration,
    deadline: Option<Instant>,
    hook: H,
}

impl<H: std::fmt::Debug> std::fmt::Debug for Mirror<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mirror")
            .field("lines", &self.doc.len())
            .field("timeout", &self.timeout)
            .field("scheduled", &self.deadline.is_some())
            .field("hook", &self.hook)
            .finish()
    }
}

impl<H: UpdateHook> Mirror<H> {
    pub fn new(hook: H) -> Self {
        Self {
            doc: Document::default(),
            timeout: DEFAULT_TIMEOUT,
            deadline: None,
            hook,
        }
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn value(&self) -> String {
        self.doc.value()
    }

    pub fn hook(&self) -> &H {
        &self.hook
    }

    pub fn hook_mut(&mut self) -> &mut H {
        &mut self.hook
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Changes the quiet period used by later schedules. A pending deadline
    /// keeps its original expiry.
    pub fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }

    pub fn is_scheduled(&self) -> bool {
        self.deadline.is_some()
    }

    pub fn apply_deltas(&mut self, deltas: &[Delta]) {
        self.doc.apply_deltas(deltas);
        self.schedule();
    }

    pub fn set_value(&mut self, text: &str) {
        self.doc.set_value(text);
        self.schedule();
    }

    /// Arms the deadline one timeout from now, replacing any pending one.
    pub fn schedule(&mut self) {
        let deadline = Instant::now() + self.timeout;
        log::trace!("update scheduled in {:?}", self.timeout);
        self.deadline = Some(deadline);
    }

    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            log::trace!("pending update cancelled");
        }
    }

    /// Waits for the pending deadline and runs the hook. Returns `false`
    /// without waiting when nothing is scheduled.
    pub async fn fire_when_due(&mut self) -> bool {
        let Some(deadline) = self.deadline else {
            return false;
        };
        sleep_until(deadline).await;
        self.fire();
        true
    }

    fn fire(&mut self) {
        self.deadline = None;
        let mut update = Update::new(&self.doc);
        if let Err(err) = self.hook.on_update(&mut update) {
            log::warn!("update hook failed: {err:#}");
        }
        let rearm = update.rearm;
        if rearm {
            self.schedule();
        }
    }

    /// Applies one request. Returns the answer to send back, if any.
    pub fn handle(&mut self, request: WorkerRequest) -> Option<WorkerResponse> {
        match request {
            WorkerRequest::Init { timeout_ms } => {
                if let Some(ms) = timeout_ms {
                    self.set_timeout(Duration::from_millis(ms));
                }
                log::debug!("mirror initialised, timeout {:?}", self.timeout);
                Some(WorkerResponse::Log {
                    data: format!("ready, update timeout {}ms", self.timeout.as_millis()),
                })
            }
            WorkerRequest::Call { id, call } => match call {
                WorkerCall::SetValue { text } => {
                    self.set_value(&text);
                    None
                }
                WorkerCall::GetValue => Some(WorkerResponse::Call {
                    id,
                    data: self.value(),
                }),
                WorkerCall::SetTimeout { ms } => {
                    self.set_timeout(Duration::from_millis(ms));
                    None
                }
            },
            WorkerRequest::Event {
                event: EditorEvent::Change { data },
            } => {
                self.apply_deltas(std::slice::from_ref(&data));
                None
            }
        }
    }

    /// Serves requests until the channel closes, running the hook whenever
    /// a deadline passes. Requests already queued are applied before a due
    /// deadline fires. A pending update is dropped on shutdown.
    pub async fn run(
        mut self,
        mut requests: UnboundedReceiver<WorkerRequest>,
        responses: UnboundedSender<WorkerResponse>,
    ) -> Self {
        log::debug!("mirror started");
        loop {
            let deadline = self.deadline;
            tokio::select! {
                biased;
                request = requests.recv() => {
                    let Some(request) = request else { break };
                    if let Some(response) = self.handle(request) {
                        if responses.send(response).is_err() {
                            log::debug!("response receiver dropped");
                        }
                    }
                }
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire();
                }
            }
        }
        self.cancel();
        log::debug!("mirror stopped");
        self
    }
}
