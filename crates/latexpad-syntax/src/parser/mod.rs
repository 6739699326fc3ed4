//! # Parser - Backtracking Recursive Descent
//!
//! The grammar is a parsing expression grammar: every rule either matches at
//! the current position and advances the cursor, or fails and leaves the
//! cursor where it was. Alternatives are tried in order; a failed
//! alternative restores the [`Checkpoint`] taken before it.
//!
//! ## Failure Tracking
//!
//! Every failed terminal match reports what it expected. Only failures at
//! the right-most offset reached so far are kept, so that after a failed
//! parse the error points at the furthest position any alternative got to.
//! Lookahead predicates (`!x`) and the whitespace rules run *silenced* so
//! their internal failures do not pollute the expected set.
//!
//! The whole-input entry points ([`parse`], [`parse_rule`]) are
//! all-or-nothing: a rule that succeeds without consuming the whole input
//! is still reported as a [`SyntaxError`].

mod grammar;

use std::str::FromStr;

use crate::cursor::{Checkpoint, Cursor};
use crate::error::{SyntaxError, UnknownRule, quote};
use crate::tree::{Command, Element, ParseTree, Text};

/// Deepest brace group the parser will descend into. Deeper input is a
/// syntax error rather than unbounded recursion.
pub const MAX_NESTING: usize = 128;

/// Parses a complete document with the `start` rule.
pub fn parse(input: &str) -> Result<ParseTree, SyntaxError> {
    parse_whole(input, |p| Some(grammar::start(p)))
}

/// Runs a single named rule against the whole input.
pub fn parse_rule(input: &str, rule: Rule) -> Result<RuleMatch, SyntaxError> {
    parse_whole(input, |p| p.run(rule))
}

fn parse_whole<T>(
    input: &str,
    rule: impl FnOnce(&mut Parser) -> Option<T>,
) -> Result<T, SyntaxError> {
    let chars: Vec<char> = input.chars().collect();
    let mut parser = Parser::new(&chars);
    match rule(&mut parser) {
        Some(value) if parser.cursor.eof() => Ok(value),
        _ => Err(parser.syntax_error()),
    }
}

/// Named grammar rules that can be used as an entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Start,
    Document,
    SourceElements,
    SourceElement,
    SourceCharacter,
    TextCharacters,
    TextCharacter,
    EscapedCharacter,
    SingleLineComment,
    LineTerminator,
    Command,
    CommandArgument,
    CurlyBlock,
    SquareCharacters,
    SquareCharacter,
    CurlyCharacters,
    CurlyCharacter,
    CommandName,
    /// `_`: whitespace and comments on a single line.
    Blank,
    /// `__`: whitespace, line breaks and comments.
    Trivia,
    WhiteSpace,
    Zs,
    LineTerminatorSequence,
}

impl FromStr for Rule {
    type Err = UnknownRule;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let rule = match name {
            "start" => Rule::Start,
            "Document" => Rule::Document,
            "SourceElements" => Rule::SourceElements,
            "SourceElement" => Rule::SourceElement,
            "SourceCharacter" => Rule::SourceCharacter,
            "TextCharacters" => Rule::TextCharacters,
            "TextCharacter" => Rule::TextCharacter,
            "EscapedCharacter" => Rule::EscapedCharacter,
            "SingleLineComment" => Rule::SingleLineComment,
            "LineTerminator" => Rule::LineTerminator,
            "Command" => Rule::Command,
            "CommandArgument" => Rule::CommandArgument,
            "CurlyBlock" => Rule::CurlyBlock,
            "SquareCharacters" => Rule::SquareCharacters,
            "SquareCharacter" => Rule::SquareCharacter,
            "CurlyCharacters" => Rule::CurlyCharacters,
            "CurlyCharacter" => Rule::CurlyCharacter,
            "CommandName" => Rule::CommandName,
            "_" => Rule::Blank,
            "__" => Rule::Trivia,
            "WhiteSpace" => Rule::WhiteSpace,
            "Zs" => Rule::Zs,
            "LineTerminatorSequence" => Rule::LineTerminatorSequence,
            other => return Err(UnknownRule(other.to_string())),
        };
        Ok(rule)
    }
}

/// The value produced by a successful rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    Tree(ParseTree),
    Elements(Vec<Element>),
    Element(Element),
    Command(Command),
    Text(Text),
    /// Rules that produce a string: names, arguments, single characters.
    Chars(String),
    /// Rules whose match carries no value (whitespace, comments).
    Skipped,
}

/// Parser state: the cursor plus the right-most failure tracker.
pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
    silenced: u32,
    depth: usize,
    failure_pos: Checkpoint,
    expected: Vec<String>,
}

impl<'a> Parser<'a> {
    fn new(chars: &'a [char]) -> Self {
        Self {
            cursor: Cursor::new(chars),
            silenced: 0,
            depth: 0,
            failure_pos: Checkpoint::START,
            expected: Vec::new(),
        }
    }

    fn run(&mut self, rule: Rule) -> Option<RuleMatch> {
        use grammar as g;

        let chars = |s: Option<String>| s.map(RuleMatch::Chars);
        let skipped = |matched: bool| matched.then_some(RuleMatch::Skipped);

        match rule {
            Rule::Start => Some(RuleMatch::Tree(g::start(self))),
            Rule::Document => Some(RuleMatch::Tree(g::document(self))),
            Rule::SourceElements => g::source_elements(self).map(RuleMatch::Elements),
            Rule::SourceElement => g::source_element(self).map(RuleMatch::Element),
            Rule::SourceCharacter => chars(self.any_char().map(String::from)),
            Rule::TextCharacters => g::text_characters(self).map(RuleMatch::Text),
            Rule::TextCharacter => chars(g::text_character(self)),
            Rule::EscapedCharacter => chars(g::escaped_character(self).map(String::from)),
            Rule::SingleLineComment => skipped(g::single_line_comment(self)),
            Rule::LineTerminator => skipped(g::line_terminator(self)),
            Rule::Command => g::command(self).map(RuleMatch::Command),
            Rule::CommandArgument => chars(g::command_argument(self)),
            Rule::CurlyBlock => chars(g::curly_block(self)),
            Rule::SquareCharacters => chars(g::square_characters(self)),
            Rule::SquareCharacter => chars(g::square_character(self).map(String::from)),
            Rule::CurlyCharacters => chars(g::curly_characters(self)),
            Rule::CurlyCharacter => chars(g::curly_character(self)),
            Rule::CommandName => chars(g::command_name(self)),
            Rule::Blank => {
                g::blank(self);
                Some(RuleMatch::Skipped)
            }
            Rule::Trivia => {
                g::trivia(self);
                Some(RuleMatch::Skipped)
            }
            Rule::WhiteSpace => skipped(g::white_space(self)),
            Rule::Zs => chars(g::zs(self).map(String::from)),
            Rule::LineTerminatorSequence => skipped(g::line_terminator_sequence(self)),
        }
    }

    pub(crate) fn checkpoint(&self) -> Checkpoint {
        self.cursor.checkpoint()
    }

    pub(crate) fn restore(&mut self, checkpoint: Checkpoint) {
        self.cursor.restore(checkpoint);
    }

    /// Matches a literal string, reporting it quoted on failure.
    pub(crate) fn literal(&mut self, lit: &'static str) -> Option<&'static str> {
        if self.cursor.starts_with(lit) {
            self.cursor.bump_n(lit.chars().count());
            Some(lit)
        } else {
            self.fail(quote(lit));
            None
        }
    }

    /// Matches one character satisfying `pred`, reporting `description` on failure.
    pub(crate) fn class(&mut self, pred: fn(char) -> bool, description: &str) -> Option<char> {
        match self.cursor.peek() {
            Some(ch) if pred(ch) => {
                self.cursor.bump();
                Some(ch)
            }
            _ => {
                self.fail(description);
                None
            }
        }
    }

    pub(crate) fn any_char(&mut self) -> Option<char> {
        match self.cursor.bump() {
            Some(ch) => Some(ch),
            None => {
                self.fail("any character");
                None
            }
        }
    }

    /// `!rule`: succeeds without consuming input iff `rule` fails here.
    pub(crate) fn not_ahead<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> bool {
        let saved = self.checkpoint();
        let matched = self.silenced(rule).is_some();
        self.restore(saved);
        !matched
    }

    /// Runs `rule` without recording failures.
    pub(crate) fn silenced<T>(&mut self, rule: impl FnOnce(&mut Self) -> T) -> T {
        self.silenced += 1;
        let result = rule(self);
        self.silenced -= 1;
        result
    }

    /// Runs `rule` one brace level deeper, failing instead once
    /// [`MAX_NESTING`] levels are open.
    pub(crate) fn nested<T>(&mut self, rule: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        if self.depth >= MAX_NESTING {
            self.fail(format!("at most {MAX_NESTING} nested braces"));
            return None;
        }
        self.depth += 1;
        let result = rule(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn is_silenced(&self) -> bool {
        self.silenced > 0
    }

    pub(crate) fn fail(&mut self, expected: impl Into<String>) {
        if self.is_silenced() {
            return;
        }
        let pos = self.checkpoint();
        if pos.offset < self.failure_pos.offset {
            return;
        }
        if pos.offset > self.failure_pos.offset {
            self.failure_pos = pos;
            self.expected.clear();
        }
        self.expected.push(expected.into());
    }

    fn syntax_error(&mut self) -> SyntaxError {
        let pos = self.checkpoint();
        let offset = pos.offset.max(self.failure_pos.offset);
        let found = self.cursor.char_at(offset);
        let at = if pos.offset > self.failure_pos.offset {
            pos
        } else {
            self.failure_pos
        };
        SyntaxError::new(
            std::mem::take(&mut self.expected),
            found,
            offset,
            at.line,
            at.column,
        )
    }
}
