use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{Anchor, Delta, Event, EventEmitter, ListenerId, Position, Range};

/// Line separator used when joining lines back into text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NewLineMode {
    /// Always `\n`.
    Unix,
    /// Always `\r\n`.
    Windows,
    /// Whatever the first inserted line break was, `\n` until then.
    #[default]
    Auto,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown newline mode {0:?}, expected unix, windows or auto")]
pub struct UnknownNewLineMode(pub String);

impl FromStr for NewLineMode {
    type Err = UnknownNewLineMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unix" => Ok(NewLineMode::Unix),
            "windows" => Ok(NewLineMode::Windows),
            "auto" => Ok(NewLineMode::Auto),
            other => Err(UnknownNewLineMode(other.to_string())),
        }
    }
}

impl fmt::Display for NewLineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NewLineMode::Unix => "unix",
            NewLineMode::Windows => "windows",
            NewLineMode::Auto => "auto",
        })
    }
}

fn line_break_regex() -> &'static Regex {
    static LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    LINE_BREAK.get_or_init(|| Regex::new(r"\r\n|\r|\n").expect("Invalid line break regex"))
}

fn first_line_break_regex() -> &'static Regex {
    static FIRST_LINE_BREAK: OnceLock<Regex> = OnceLock::new();
    FIRST_LINE_BREAK
        .get_or_init(|| Regex::new(r"^.*?(\r\n|\r|\n)").expect("Invalid line break regex"))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Byte index of char column `column`, clamped to the end of `s`.
fn byte_offset(s: &str, column: usize) -> usize {
    s.char_indices().nth(column).map_or(s.len(), |(index, _)| index)
}

fn char_slice(s: &str, start: usize, end: usize) -> &str {
    let start = byte_offset(s, start);
    let end = byte_offset(s, end).max(start);
    &s[start..end]
}

/// A line-oriented text buffer that reports every edit as a [`Delta`].
///
/// The document always holds at least one (possibly empty) line; lines never
/// contain their terminators. Rows and columns passed to the editing methods
/// are clamped into the document, never rejected.
///
/// Each primitive edit (`insert_in_line`, `insert_new_line`, `insert_lines`,
/// `remove_in_line`, `remove_new_line`, `remove_lines`) emits exactly one
/// delta to the change listeners before returning, or none when it changes
/// nothing. The composite edits (`insert`, `remove`, `replace`, `set_value`)
/// are built from the primitives, so replaying the emitted deltas on another
/// document in order reproduces the same lines.
///
/// ```
/// use latexpad_engine::editing::{Document, Position};
///
/// let mut doc = Document::new("abc\ndef");
/// let end = doc.insert(Position::new(0, 1), "\n");
/// assert_eq!(end, Position::new(1, 0));
/// assert_eq!(doc.all_lines(), ["a", "bc", "def"]);
/// ```
#[derive(Debug)]
pub struct Document {
    lines: Vec<String>,
    new_line_mode: NewLineMode,
    auto_new_line: &'static str,
    emitter: EventEmitter<Delta>,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            new_line_mode: NewLineMode::Auto,
            auto_new_line: "\n",
            emitter: EventEmitter::new(),
        }
    }
}

impl Document {
    pub fn new(text: &str) -> Self {
        let mut doc = Self::default();
        doc.insert(Position::new(0, 0), text);
        doc
    }

    /// Builds a document from pre-split lines. A line that still contains
    /// line breaks is split further, so no stored line ever holds one.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut doc = Self::default();
        if !lines.is_empty() {
            doc.lines = lines
                .iter()
                .flat_map(|line| line_break_regex().split(line.as_ref()))
                .map(str::to_string)
                .collect();
        }
        doc
    }

    // ============ Listeners ============

    /// Subscribes to the deltas of every subsequent edit.
    pub fn on_change(
        &mut self,
        listener: impl FnMut(&mut Event<Delta>) + Send + 'static,
    ) -> ListenerId {
        self.emitter.on(listener)
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    pub fn create_anchor(&mut self, row: usize, column: usize) -> Anchor {
        Anchor::new(self, row, column)
    }

    fn emit(&mut self, delta: Delta) {
        self.emitter.emit(delta);
    }

    // ============ Newlines ============

    pub fn new_line_mode(&self) -> NewLineMode {
        self.new_line_mode
    }

    pub fn set_new_line_mode(&mut self, mode: NewLineMode) {
        if self.new_line_mode == mode {
            return;
        }
        self.new_line_mode = mode;
    }

    /// The separator used by [`Document::value`] and multi-line text ranges.
    pub fn new_line_character(&self) -> &'static str {
        match self.new_line_mode {
            NewLineMode::Windows => "\r\n",
            NewLineMode::Unix => "\n",
            NewLineMode::Auto => self.auto_new_line,
        }
    }

    pub fn is_new_line(text: &str) -> bool {
        matches!(text, "\r\n" | "\r" | "\n")
    }

    fn detect_new_line(&mut self, text: &str) {
        let detected = first_line_break_regex()
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str());
        self.auto_new_line = match detected {
            Some("\r\n") => "\r\n",
            Some("\r") => "\r",
            Some(_) => "\n",
            None => return,
        };
    }

    // ============ Reading ============

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True when the document holds no text at all.
    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    /// The line at `row`, or `""` past the end.
    pub fn line(&self, row: usize) -> &str {
        self.lines.get(row).map_or("", String::as_str)
    }

    /// Rows `first..=last`, clamped to the document.
    pub fn lines(&self, first: usize, last: usize) -> &[String] {
        let end = last.saturating_add(1).min(self.lines.len());
        if first >= end {
            return &[];
        }
        &self.lines[first..end]
    }

    pub fn all_lines(&self) -> &[String] {
        &self.lines
    }

    pub fn value(&self) -> String {
        self.lines.join(self.new_line_character())
    }

    /// The text covered by `range`, lines joined by the active separator.
    pub fn text_range(&self, range: Range) -> String {
        let mut range = range;
        range.fix_orientation();
        let start = self.clip_position(range.start);
        let end = self.clip_position(range.end);

        if start.row == end.row {
            return char_slice(self.line(start.row), start.column, end.column).to_string();
        }

        let first = self.line(start.row);
        let mut parts = Vec::with_capacity(end.row - start.row + 1);
        parts.push(char_slice(first, start.column, char_len(first)));
        parts.extend(self.lines(start.row + 1, end.row - 1).iter().map(String::as_str));
        parts.push(char_slice(self.line(end.row), 0, end.column));
        parts.join(self.new_line_character())
    }

    /// Clamps a position into the document. A row past the end moves to the
    /// end of the last line.
    pub fn clip_position(&self, position: Position) -> Position {
        let last_row = self.lines.len() - 1;
        if position.row > last_row {
            return Position::new(last_row, char_len(&self.lines[last_row]));
        }
        let column = position.column.min(char_len(&self.lines[position.row]));
        Position::new(position.row, column)
    }

    // ============ Inserting ============

    /// Inserts `text` at `position` and returns the position after it.
    ///
    /// `\r\n`, `\r` and `\n` all break lines. Text without a break emits a
    /// single `insertText`; otherwise the line is split and any interior
    /// lines arrive as one `insertLines`.
    pub fn insert(&mut self, position: Position, text: &str) -> Position {
        let position = self.clip_position(position);
        if text.is_empty() {
            return position;
        }

        if self.lines.len() <= 1 {
            self.detect_new_line(text);
        }

        let mut fragments: Vec<&str> = line_break_regex().split(text).collect();
        let first = fragments.remove(0);
        let last = fragments.pop();

        let mut position = self.insert_in_line_unchecked(position, first);
        if let Some(last) = last {
            position = self.insert_new_line(position);
            let interior: Vec<String> = fragments.iter().map(|line| line.to_string()).collect();
            position = self.insert_lines(position.row, &interior);
            position = self.insert_in_line_unchecked(position, last);
        }
        position
    }

    /// Inserts whole lines before `row`. `row` may equal [`Document::len`]
    /// to append.
    pub fn insert_lines<S: AsRef<str>>(&mut self, row: usize, lines: &[S]) -> Position {
        let row = row.min(self.lines.len());
        if lines.is_empty() {
            return Position::new(row, 0);
        }

        let lines: Vec<String> = lines.iter().map(|line| line.as_ref().to_string()).collect();
        self.lines.splice(row..row, lines.iter().cloned());

        let range = Range::new(row, 0, row + lines.len(), 0);
        self.emit(Delta::InsertLines { range, lines });
        range.end
    }

    /// Splits the line at `position`.
    pub fn insert_new_line(&mut self, position: Position) -> Position {
        let position = self.clip_position(position);
        let at = byte_offset(&self.lines[position.row], position.column);
        let tail = self.lines[position.row].split_off(at);
        self.lines.insert(position.row + 1, tail);

        let end = Position::new(position.row + 1, 0);
        let text = self.new_line_character().to_string();
        self.emit(Delta::InsertText {
            range: Range::from_points(position, end),
            text,
        });
        end
    }

    /// Inserts text into a single line. Text containing a line break is
    /// handed to [`Document::insert`].
    pub fn insert_in_line(&mut self, position: Position, text: &str) -> Position {
        if line_break_regex().is_match(text) {
            return self.insert(position, text);
        }
        let position = self.clip_position(position);
        self.insert_in_line_unchecked(position, text)
    }

    fn insert_in_line_unchecked(&mut self, position: Position, text: &str) -> Position {
        if text.is_empty() {
            return position;
        }
        let at = byte_offset(&self.lines[position.row], position.column);
        self.lines[position.row].insert_str(at, text);

        let end = Position::new(position.row, position.column + char_len(text));
        self.emit(Delta::InsertText {
            range: Range::from_points(position, end),
            text: text.to_string(),
        });
        end
    }

    // ============ Removing ============

    /// Removes the text in `range` and returns its start.
    ///
    /// A multi-line removal is emitted as up to four primitive edits: the
    /// head of the last row, the fully covered rows, the tail of the first
    /// row and the line break joining what is left.
    pub fn remove(&mut self, range: Range) -> Position {
        let mut range = range;
        range.fix_orientation();
        let start = self.clip_position(range.start);
        let end = self.clip_position(range.end);
        if start == end {
            return start;
        }

        let first_row = start.row;
        let last_row = end.row;
        if first_row == last_row {
            self.remove_in_line(first_row, start.column, end.column);
            return start;
        }

        let first_full_row = if start.column == 0 { first_row } else { first_row + 1 };
        if end.column > 0 {
            self.remove_in_line(last_row, 0, end.column);
        }
        if last_row > first_full_row {
            self.remove_lines(first_full_row, last_row - 1);
        }
        if first_full_row != first_row {
            let len = char_len(self.line(first_row));
            self.remove_in_line(first_row, start.column, len);
            self.remove_new_line(first_row);
        }
        start
    }

    /// Removes columns `start_column..end_column` of one row.
    pub fn remove_in_line(
        &mut self,
        row: usize,
        start_column: usize,
        end_column: usize,
    ) -> Position {
        let row = row.min(self.lines.len() - 1);
        let len = char_len(&self.lines[row]);
        let (start_column, end_column) = {
            let a = start_column.min(len);
            let b = end_column.min(len);
            (a.min(b), a.max(b))
        };
        let start = Position::new(row, start_column);
        if start_column == end_column {
            return start;
        }

        let line = &mut self.lines[row];
        let byte_range = byte_offset(line, start_column)..byte_offset(line, end_column);
        let removed: String = line.drain(byte_range).collect();

        self.emit(Delta::RemoveText {
            range: Range::new(row, start_column, row, end_column),
            text: removed,
        });
        start
    }

    /// Removes rows `first_row..=last_row` and returns them.
    ///
    /// Removing every row leaves a single empty line behind.
    pub fn remove_lines(&mut self, first_row: usize, last_row: usize) -> Vec<String> {
        let last_row = last_row.min(self.lines.len() - 1);
        if first_row > last_row {
            return Vec::new();
        }

        let removed: Vec<String> = self.lines.drain(first_row..=last_row).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }

        self.emit(Delta::RemoveLines {
            range: Range::new(first_row, 0, last_row + 1, 0),
            lines: removed.clone(),
        });
        removed
    }

    /// Joins `row` with the row below it. No-op on the last row.
    pub fn remove_new_line(&mut self, row: usize) {
        if row + 1 >= self.lines.len() {
            return;
        }
        let second = self.lines.remove(row + 1);
        let first = &mut self.lines[row];
        let range = Range::new(row, char_len(first), row + 1, 0);
        first.push_str(&second);

        let text = self.new_line_character().to_string();
        self.emit(Delta::RemoveText { range, text });
    }

    /// Replaces `range` with `text` and returns the end of the new text.
    ///
    /// Replacing a range with the text it already holds changes nothing and
    /// returns `range.end`.
    pub fn replace(&mut self, range: Range, text: &str) -> Position {
        if text.is_empty() && range.is_empty() {
            return range.start;
        }
        if text == self.text_range(range) {
            return range.end;
        }

        let start = self.remove(range);
        if text.is_empty() {
            start
        } else {
            self.insert(start, text)
        }
    }

    /// Replaces the whole content.
    pub fn set_value(&mut self, text: &str) {
        let last_row = self.lines.len() - 1;
        let end_column = char_len(&self.lines[last_row]);
        self.remove(Range::new(0, 0, last_row, end_column));
        self.insert(Position::new(0, 0), text);
    }

    // ============ Replaying ============

    /// Replays deltas emitted by another document, in order.
    pub fn apply_deltas(&mut self, deltas: &[Delta]) {
        for delta in deltas {
            self.apply_delta(delta);
        }
    }

    /// Undoes deltas previously applied to this document, last first.
    pub fn revert_deltas(&mut self, deltas: &[Delta]) {
        for delta in deltas.iter().rev() {
            self.apply_delta(&delta.inverted());
        }
    }

    fn apply_delta(&mut self, delta: &Delta) {
        match delta {
            Delta::InsertLines { range, lines } => {
                self.insert_lines(range.start.row, lines);
            }
            Delta::InsertText { range, text } => {
                self.insert(range.start, text);
            }
            Delta::RemoveLines { range, .. } => {
                if range.end.row > range.start.row {
                    self.remove_lines(range.start.row, range.end.row - 1);
                }
            }
            Delta::RemoveText { range, .. } => {
                self.remove(*range);
            }
        }
    }
}
