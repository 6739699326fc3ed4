use serde::{Deserialize, Serialize};

/// The result of a successful parse.
///
/// Serializes as `{"type": "Document", "elements": [...]}`. A tree is never
/// updated in place; every re-parse builds a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "Document")]
pub struct ParseTree {
    pub elements: Vec<Element>,
}

impl ParseTree {
    /// Iterates over the commands of the document in source order.
    pub fn commands(&self) -> impl Iterator<Item = &Command> {
        self.elements.iter().filter_map(|element| match element {
            Element::Command(command) => Some(command),
            Element::Text(_) => None,
        })
    }
}

/// A top-level element: either a command or a run of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Element {
    Command(Command),
    Text(Text),
}

impl Element {
    /// 1-based line of the first character of the element.
    pub fn line(&self) -> usize {
        match self {
            Element::Command(command) => command.line,
            Element::Text(text) => text.line,
        }
    }

    /// 1-based column of the first character of the element.
    pub fn column(&self) -> usize {
        match self {
            Element::Command(command) => command.column,
            Element::Text(text) => text.column,
        }
    }
}

/// A `\name*[opt]{arg}` command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Command name without the leading backslash or trailing star.
    pub name: String,
    /// Whether the name was followed by `*`.
    #[serde(default)]
    pub starred: bool,
    /// All bracket and brace arguments, concatenated verbatim.
    pub args: String,
    pub line: usize,
    pub column: usize,
}

/// A run of plain text, with escapes kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Text {
    pub content: String,
    pub line: usize,
    pub column: usize,
}
