use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use super::{Delta, Document, Event, EventEmitter, ListenerId, Position};

/// Emitted by an [`Anchor`] whenever its position actually moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorChange {
    pub old: Position,
    pub value: Position,
}

/// A position that follows the edits of one [`Document`].
///
/// The document only holds a weak reference to the anchor's state, so
/// dropping every clone of an anchor is enough to stop tracking; a dropped
/// anchor's subscription stays behind as a no-op until [`Anchor::detach`] or
/// the document is dropped. Clones share the same position.
#[derive(Clone)]
pub struct Anchor {
    inner: Arc<AnchorState>,
}

struct AnchorState {
    position: Mutex<Position>,
    emitter: Mutex<EventEmitter<AnchorChange>>,
    subscription: Mutex<Option<ListenerId>>,
}

impl AnchorState {
    fn move_to(&self, value: Position) {
        let old = {
            let mut position = self.position.lock();
            if *position == value {
                return;
            }
            std::mem::replace(&mut *position, value)
        };
        self.emitter.lock().emit(AnchorChange { old, value });
    }
}

impl std::fmt::Debug for Anchor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Anchor")
            .field("position", &*self.inner.position.lock())
            .field("attached", &self.is_attached())
            .finish()
    }
}

impl Anchor {
    /// Creates an anchor at `(row, column)`, clipped to `doc`, and subscribes
    /// it to the document's changes.
    pub fn new(doc: &mut Document, row: usize, column: usize) -> Self {
        let position = doc.clip_position(Position::new(row, column));
        let inner = Arc::new(AnchorState {
            position: Mutex::new(position),
            emitter: Mutex::new(EventEmitter::new()),
            subscription: Mutex::new(None),
        });

        let weak: Weak<AnchorState> = Arc::downgrade(&inner);
        let id = doc.on_change(move |event: &mut Event<Delta>| {
            if let Some(state) = weak.upgrade() {
                let current = *state.position.lock();
                state.move_to(rebase(current, &event.data));
            }
        });
        *inner.subscription.lock() = Some(id);

        Self { inner }
    }

    pub fn position(&self) -> Position {
        *self.inner.position.lock()
    }

    pub fn row(&self) -> usize {
        self.position().row
    }

    pub fn column(&self) -> usize {
        self.position().column
    }

    /// Moves the anchor, clipping the target to `doc`.
    pub fn set_position(&self, doc: &Document, row: usize, column: usize) {
        self.inner
            .move_to(doc.clip_position(Position::new(row, column)));
    }

    /// Subscribes to the anchor's own moves.
    ///
    /// Listeners run while the anchor's listener list is locked, so they must
    /// not subscribe or unsubscribe on the same anchor.
    pub fn on_change(
        &self,
        listener: impl FnMut(&mut Event<AnchorChange>) + Send + 'static,
    ) -> ListenerId {
        self.inner.emitter.lock().on(listener)
    }

    pub fn remove_listener(&self, id: ListenerId) -> bool {
        self.inner.emitter.lock().off(id)
    }

    pub fn is_attached(&self) -> bool {
        self.inner.subscription.lock().is_some()
    }

    /// Stops following `doc`. Later edits leave the anchor where it is.
    ///
    /// Returns `false`, leaving the anchor attached, when `doc` is not the
    /// document the anchor was created on.
    pub fn detach(&self, doc: &mut Document) -> bool {
        let mut subscription = self.inner.subscription.lock();
        let detached = subscription.is_some_and(|id| doc.remove_listener(id));
        if detached {
            *subscription = None;
        }
        detached
    }
}

/// Where a point at `position` ends up after `delta`.
pub fn rebase(position: Position, delta: &Delta) -> Position {
    let range = delta.range();
    let (start, end) = (range.start, range.end);
    debug_assert!(start <= end, "malformed delta: {range}");

    let Position { mut row, mut column } = position;

    if start.row == end.row && start.row != row {
        return position;
    }
    if start.row > row {
        return position;
    }
    if start.row == row && start.column > column {
        return position;
    }

    let rows = end.row.saturating_sub(start.row);

    match delta {
        Delta::InsertText { .. } => {
            if start.row == row && start.column <= column {
                if rows == 0 {
                    column += end.column.saturating_sub(start.column);
                } else {
                    column = column.saturating_sub(start.column);
                    row += rows;
                }
            } else if rows != 0 && start.row < row {
                row += rows;
            }
        }
        Delta::InsertLines { .. } => {
            if start.row <= row {
                row += rows;
            }
        }
        Delta::RemoveText { .. } => {
            if start.row == row && start.column < column {
                let reaches_anchor = end.row > row || end.column >= column;
                if reaches_anchor {
                    column = start.column;
                } else {
                    column = column.saturating_sub(end.column - start.column);
                }
            } else if rows != 0 && start.row < row {
                if end.row > row {
                    return start;
                }
                if end.row == row {
                    column = column.saturating_sub(end.column) + start.column;
                }
                row -= rows;
            } else if end.row == row {
                row -= rows;
                column = column.saturating_sub(end.column) + start.column;
            }
        }
        Delta::RemoveLines { .. } => {
            if start.row <= row {
                if end.row <= row {
                    row -= rows;
                } else {
                    row = start.row;
                    column = 0;
                }
            }
        }
    }

    Position::new(row, column)
}
