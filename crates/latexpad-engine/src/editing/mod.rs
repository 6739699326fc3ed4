/*!
 * # Editing Core Module
 *
 * The document model shared by the editing surface and the background
 * worker.
 *
 * ## Architecture Overview
 *
 * ### 1. Lines as the Source of Truth
 * - A [`Document`] is an ordered list of lines without terminators, never
 *   fewer than one
 * - Rows and columns are zero-based; columns count chars
 * - Out-of-range positions are clamped, editing never fails
 *
 * ### 2. Every Edit is a Delta
 * - Each primitive edit emits exactly one [`Delta`] to the document's change
 *   listeners, synchronously, before the editing call returns
 * - Deltas are plain serde data (`{"action": "insertText", ...}`) so they can
 *   cross a channel into the worker
 * - `apply_deltas` on a second document replays them; `revert_deltas` undoes
 *   them
 *
 * ### 3. Anchors Follow Edits
 * - An [`Anchor`] is a position subscribed to one document's deltas
 * - The rebasing rules live in [`anchor::rebase`] as a pure function
 * - The document only holds a weak reference to each anchor
 *
 * ### 4. Explicit Emitters
 * - Listeners are registered on an [`EventEmitter`] owned by each document
 *   and anchor; there is no global event bus
 *
 * ## Module Structure
 *
 * - **`position`** / **`range`**: the point and span algebra
 * - **`delta`**: the edit record and its wire format
 * - **`events`**: listener lists with stop-propagation and default handlers
 * - **`document`**: the line buffer and all editing operations
 * - **`anchor`**: positions that survive edits
 *
 * ## Usage Pattern
 *
 * ```rust
 * use latexpad_engine::editing::{Document, Position, Range};
 *
 * let mut primary = Document::new("\\section{Intro}\nHello");
 * let mut replica = Document::new(&primary.value());
 *
 * // Collect deltas as they are emitted.
 * let (tx, rx) = std::sync::mpsc::channel();
 * primary.on_change(move |event| {
 *     let _ = tx.send(event.data.clone());
 * });
 *
 * let anchor = primary.create_anchor(1, 5);
 * primary.insert(Position::new(1, 0), "Well, ");
 * primary.remove(Range::new(0, 9, 0, 14));
 * assert_eq!(anchor.position(), Position::new(1, 11));
 *
 * // Replaying the same deltas keeps the replica in sync.
 * let deltas: Vec<_> = rx.try_iter().collect();
 * replica.apply_deltas(&deltas);
 * assert_eq!(replica.value(), primary.value());
 * ```
 */

pub mod anchor;
pub mod delta;
pub mod document;
pub mod events;
pub mod position;
pub mod range;

pub use anchor::{Anchor, AnchorChange};
pub use delta::Delta;
pub use document::{Document, NewLineMode, UnknownNewLineMode};
pub use events::{Event, EventEmitter, EventError, ListenerId};
pub use position::Position;
pub use range::{Range, RangeComparison};
