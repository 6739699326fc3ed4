use serde::{Deserialize, Serialize};

use super::Range;

/// One atomic edit, as emitted by [`Document`](super::Document) and replayed
/// by [`Document::apply_deltas`](super::Document::apply_deltas).
///
/// On the wire a delta is a flat object tagged by `action`:
///
/// ```json
/// {"action": "insertText", "range": {"start": {"row": 0, "column": 1},
///  "end": {"row": 0, "column": 3}}, "text": "ab"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Delta {
    /// Text inserted into a line. `text` is a newline sequence when the
    /// edit split a line, in which case `range` spans two rows.
    InsertText { range: Range, text: String },
    /// Whole lines inserted before `range.start.row`.
    InsertLines { range: Range, lines: Vec<String> },
    /// Text removed from a line, or a line break joining two rows.
    RemoveText { range: Range, text: String },
    /// Whole rows `range.start.row..range.end.row` removed.
    RemoveLines { range: Range, lines: Vec<String> },
}

impl Delta {
    pub fn range(&self) -> Range {
        match self {
            Delta::InsertText { range, .. }
            | Delta::InsertLines { range, .. }
            | Delta::RemoveText { range, .. }
            | Delta::RemoveLines { range, .. } => *range,
        }
    }

    /// The wire name of the action.
    pub fn action(&self) -> &'static str {
        match self {
            Delta::InsertText { .. } => "insertText",
            Delta::InsertLines { .. } => "insertLines",
            Delta::RemoveText { .. } => "removeText",
            Delta::RemoveLines { .. } => "removeLines",
        }
    }

    pub fn is_insert(&self) -> bool {
        matches!(self, Delta::InsertText { .. } | Delta::InsertLines { .. })
    }

    /// The delta that undoes this one.
    pub fn inverted(&self) -> Delta {
        match self.clone() {
            Delta::InsertText { range, text } => Delta::RemoveText { range, text },
            Delta::InsertLines { range, lines } => Delta::RemoveLines { range, lines },
            Delta::RemoveText { range, text } => Delta::InsertText { range, text },
            Delta::RemoveLines { range, lines } => Delta::InsertLines { range, lines },
        }
    }
}
