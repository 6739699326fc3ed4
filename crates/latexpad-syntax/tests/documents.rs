use latexpad_syntax::{Element, Rule, RuleMatch, parse, parse_rule};
use pretty_assertions::assert_eq;
use rstest::rstest;

const PAPER: &str = r"\documentclass[11pt,twocolumn]{article}
\usepackage[utf8]{inputenc}
\title{On {Nested} Groups}

\begin{document}
\maketitle

\section{Introduction}
We study \textbf{bold} claims.% trailing comment
Line breaks \\ are text.

\subsection*{Details}
\end{document}
";

#[test]
fn paper_outline() {
    let tree = parse(PAPER).unwrap();
    let names: Vec<_> = tree.commands().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "documentclass",
            "usepackage",
            "title",
            "begin",
            "maketitle",
            "section",
            "textbf",
            "subsection",
            "end",
        ]
    );

    let title = tree.commands().find(|c| c.name == "title").unwrap();
    assert_eq!(title.args, "{On {Nested} Groups}");
    assert_eq!((title.line, title.column), (3, 1));

    let textbf = tree.commands().find(|c| c.name == "textbf").unwrap();
    assert_eq!((textbf.line, textbf.column), (9, 10));

    let subsection = tree.commands().find(|c| c.name == "subsection").unwrap();
    assert!(subsection.starred);
}

#[test]
fn text_between_commands() {
    let tree = parse(PAPER).unwrap();
    let texts: Vec<_> = tree
        .elements
        .iter()
        .filter_map(|element| match element {
            Element::Text(text) => Some(text.content.as_str()),
            Element::Command(_) => None,
        })
        .collect();
    assert_eq!(
        texts,
        vec!["We study ", "claims.", "Line breaks \\\\ are text.\n\n"]
    );
}

#[test]
fn error_position_on_later_line() {
    let err = parse("\\section{A}\n\\emph{unfinished").unwrap_err();
    assert_eq!((err.line, err.column), (2, 17));
    assert_eq!(err.found, None);
    assert!(err.expected.contains(&"\"}\"".to_string()));
}

#[rstest]
#[case("SourceCharacter", "x")]
#[case("EscapedCharacter", "]")]
#[case("SquareCharacters", "a{b")]
#[case("CurlyCharacters", "a{b}c")]
#[case("Zs", "\u{3000}")]
fn named_rules_match_whole_input(#[case] rule: &str, #[case] input: &str) {
    let rule: Rule = rule.parse().unwrap();
    assert_eq!(parse_rule(input, rule), Ok(RuleMatch::Chars(input.to_string())));
}

#[test]
fn named_rule_rejects_trailing_input() {
    let err = parse_rule("\\a b", Rule::Command).unwrap_err();
    assert_eq!(err.offset, 2);
    assert_eq!(err.found, Some(' '));
}
