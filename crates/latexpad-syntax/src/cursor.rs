/// A saved parser position.
///
/// `line` and `column` are 1-based. `seen_cr` remembers that the previous
/// character was a `\r` so that a following `\n` does not count as a second
/// line break.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checkpoint {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
    pub seen_cr: bool,
}

impl Checkpoint {
    pub const START: Checkpoint = Checkpoint {
        offset: 0,
        line: 1,
        column: 1,
        seen_cr: false,
    };
}

/// A cursor for character-by-character parsing with line/column tracking.
///
/// Operates over a slice of chars so that offsets and columns count Unicode
/// scalar values. Backtracking is done by taking a [`Checkpoint`] before an
/// alternative and restoring it when the alternative fails.
#[derive(Clone)]
pub struct Cursor<'a> {
    chars: &'a [char],
    pos: Checkpoint,
}

impl<'a> Cursor<'a> {
    pub fn new(chars: &'a [char]) -> Self {
        Self {
            chars,
            pos: Checkpoint::START,
        }
    }

    pub fn checkpoint(&self) -> Checkpoint {
        self.pos
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint;
    }

    pub fn offset(&self) -> usize {
        self.pos.offset
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn eof(&self) -> bool {
        self.pos.offset >= self.chars.len()
    }

    pub fn peek(&self) -> Option<char> {
        self.chars.get(self.pos.offset).copied()
    }

    /// Returns the char at an absolute offset.
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.chars.get(offset).copied()
    }

    /// Checks if the remaining input starts with the given pattern.
    pub fn starts_with(&self, pat: &str) -> bool {
        let mut rest = self.chars.iter().skip(self.pos.offset);
        pat.chars().all(|expected| rest.next() == Some(&expected))
    }

    /// Advances by one char, returning it.
    pub fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.advance(ch);
        Some(ch)
    }

    /// Advances by `n` chars, stopping at end of input.
    pub fn bump_n(&mut self, n: usize) {
        for _ in 0..n {
            if self.bump().is_none() {
                break;
            }
        }
    }

    fn advance(&mut self, ch: char) {
        match ch {
            '\n' => {
                if !self.pos.seen_cr {
                    self.pos.line += 1;
                }
                self.pos.column = 1;
                self.pos.seen_cr = false;
            }
            '\r' | '\u{2028}' | '\u{2029}' => {
                self.pos.line += 1;
                self.pos.column = 1;
                self.pos.seen_cr = true;
            }
            _ => {
                self.pos.column += 1;
                self.pos.seen_cr = false;
            }
        }
        self.pos.offset += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn cursor_basics() {
        let input = chars("hello");
        let mut cur = Cursor::new(&input);
        assert_eq!(cur.offset(), 0);
        assert!(!cur.eof());
        assert_eq!(cur.peek(), Some('h'));
        assert_eq!(cur.bump(), Some('h'));
        assert_eq!(cur.checkpoint().column, 2);
    }

    #[test]
    fn cursor_starts_with() {
        let input = chars("\\LaTeX\\ rocks");
        let cur = Cursor::new(&input);
        assert!(cur.starts_with("\\LaTeX\\"));
        assert!(!cur.starts_with("\\\\"));
    }

    #[test]
    fn starts_with_pattern_longer_than_remaining() {
        let input = chars("ab");
        let mut cur = Cursor::new(&input);
        assert!(!cur.starts_with("abcdef"));
        cur.bump();
        assert!(!cur.starts_with("bc"));
        assert!(cur.starts_with("b"));
    }

    #[test]
    fn empty_string_input() {
        let input = chars("");
        let cur = Cursor::new(&input);
        assert!(cur.eof());
        assert!(cur.is_empty());
        assert_eq!(cur.peek(), None);
        assert!(cur.starts_with(""));
    }

    #[test]
    fn newline_advances_line_and_resets_column() {
        let input = chars("ab\ncd");
        let mut cur = Cursor::new(&input);
        cur.bump_n(3);
        let pos = cur.checkpoint();
        assert_eq!((pos.line, pos.column), (2, 1));
        cur.bump();
        assert_eq!(cur.checkpoint().column, 2);
    }

    #[test]
    fn crlf_counts_as_a_single_line_break() {
        let input = chars("a\r\nb\rc");
        let mut cur = Cursor::new(&input);
        cur.bump_n(3);
        assert_eq!(cur.checkpoint().line, 2);
        cur.bump_n(2);
        assert_eq!(cur.checkpoint().line, 3);
    }

    #[test]
    fn unicode_line_separators_break_lines() {
        let input = chars("a\u{2028}b\u{2029}c");
        let mut cur = Cursor::new(&input);
        cur.bump_n(4);
        let pos = cur.checkpoint();
        assert_eq!((pos.line, pos.column), (3, 1));
    }

    #[test]
    fn restore_rewinds_position() {
        let input = chars("x\ny");
        let mut cur = Cursor::new(&input);
        let saved = cur.checkpoint();
        cur.bump_n(2);
        cur.restore(saved);
        assert_eq!(cur.checkpoint(), Checkpoint::START);
        assert_eq!(cur.peek(), Some('x'));
    }

    #[test]
    fn bump_at_eof_returns_none() {
        let input = chars("x");
        let mut cur = Cursor::new(&input);
        assert_eq!(cur.bump(), Some('x'));
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.bump(), None);
        assert_eq!(cur.offset(), 1);
    }
}
