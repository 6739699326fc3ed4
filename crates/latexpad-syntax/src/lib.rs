//! # latexpad-syntax
//!
//! A backtracking parser for the small LaTeX command grammar the editor's
//! background worker uses to build a document outline.
//!
//! The grammar only knows two kinds of top-level elements:
//!
//! - **Commands**: `\name`, an optional `*` and any number of `[...]` /
//!   `{...}` arguments. Arguments are kept verbatim, nested brace groups
//!   included.
//! - **Text**: everything else. A backslash followed by anything other than
//!   a letter (`\{`, `\%`, `\&`, `\\`, ...) is an escape, as is `\LaTeX\`.
//!   Balanced brace groups are allowed inline, up to [`MAX_NESTING`] deep.
//!
//! Whitespace, line breaks and `%` comments between elements are skipped.
//!
//! ## Architecture Overview
//!
//! ```text
//! &str → Vec<char> → Cursor → grammar rules → ParseTree
//!                      │
//!                      └── right-most failure → SyntaxError
//! ```
//!
//! ### Cursor ([`cursor`] module)
//!
//! Walks the input one char at a time tracking 1-based line and column.
//! `\r\n` counts as a single line break; `\r`, U+2028 and U+2029 each start a
//! new line on their own.
//!
//! ### Parser ([`parser`] module)
//!
//! One free function per grammar rule. Alternatives backtrack by restoring
//! cursor checkpoints. Failed terminals feed a right-most failure tracker
//! that becomes the [`SyntaxError`] when the input is rejected.
//!
//! ## Module Structure
//!
//! ```text
//! latexpad-syntax/
//! ├── lib.rs           # This file - public API and outline snapshots
//! ├── cursor.rs        # Char cursor with line/column tracking
//! ├── tree.rs          # ParseTree, Element, Command, Text
//! ├── error.rs         # SyntaxError, UnknownRule, literal quoting
//! └── parser/
//!     ├── mod.rs       # Parser state, failure tracking, parse()/parse_rule()
//!     └── grammar.rs   # The grammar rules
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use latexpad_syntax::{Element, parse};
//!
//! let tree = parse("\\section{Intro}\nHello").unwrap();
//! assert_eq!(tree.elements.len(), 2);
//!
//! let Element::Command(section) = &tree.elements[0] else { panic!() };
//! assert_eq!(section.name, "section");
//! assert_eq!(section.args, "{Intro}");
//!
//! let err = parse("\\cmd{a{b}").unwrap_err();
//! assert!(err.expected.contains(&"\"}\"".to_string()));
//! ```

pub mod cursor;
pub mod error;
pub mod parser;
pub mod tree;

pub use error::{SyntaxError, UnknownRule};
pub use parser::{MAX_NESTING, Rule, RuleMatch, parse, parse_rule};
pub use tree::{Command, Element, ParseTree, Text};
