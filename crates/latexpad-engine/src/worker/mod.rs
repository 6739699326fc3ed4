/*!
 * # Background Worker
 *
 * Keeps a replica of the editor's document in its own tokio task and
 * re-analyses it once edits go quiet.
 *
 * - **`protocol`**: the typed request/response messages exchanged with the
 *   editing surface
 * - **`mirror`**: the replica document plus a trailing-edge debounce around
 *   an [`UpdateHook`]
 * - **`latex`**: the LaTeX hook, the worker spawner and [`forward_changes`]
 *
 * The primary [`Document`](crate::editing::Document) and the mirror share
 * nothing; they stay in sync only because the mirror replays the same
 * delta stream.
 *
 * ```rust
 * use latexpad_engine::editing::{Document, Position};
 * use latexpad_engine::worker::{
 *     LATEX_UPDATE_TIMEOUT, WorkerEvent, WorkerResponse, forward_changes, spawn_latex_worker,
 * };
 *
 * # #[tokio::main(flavor = "current_thread")]
 * # async fn main() -> anyhow::Result<()> {
 * let mut worker = spawn_latex_worker(LATEX_UPDATE_TIMEOUT);
 * let mut doc = Document::default();
 * let forwarding = forward_changes(&mut doc, worker.requests.clone());
 *
 * doc.insert(Position::new(0, 0), "\\emph{quiet} please");
 *
 * if let Some(WorkerResponse::Event { event: WorkerEvent::Parsed { data } }) =
 *     worker.responses.recv().await
 * {
 *     assert_eq!(data.commands().count(), 1);
 * }
 *
 * doc.remove_listener(forwarding);
 * worker.shutdown().await?;
 * # Ok(())
 * # }
 * ```
 */

pub mod latex;
pub mod mirror;
pub mod protocol;

pub use latex::{
    LATEX_UPDATE_TIMEOUT, LatexAnalyzer, WorkerHandle, forward_changes, spawn_latex_worker,
};
pub use mirror::{DEFAULT_TIMEOUT, Mirror, Update, UpdateHook};
pub use protocol::{EditorEvent, WorkerCall, WorkerEvent, WorkerRequest, WorkerResponse};
