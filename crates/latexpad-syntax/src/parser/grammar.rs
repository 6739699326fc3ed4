//! Grammar rules. Each rule is a free function over the [`Parser`]; on
//! failure it restores the position it started from and returns `None`.

use super::Parser;
use crate::tree::{Command, Element, ParseTree, Text};

pub(super) fn start(p: &mut Parser) -> ParseTree {
    trivia(p);
    let tree = document(p);
    trivia(p);
    tree
}

pub(super) fn document(p: &mut Parser) -> ParseTree {
    ParseTree {
        elements: source_elements(p).unwrap_or_default(),
    }
}

pub(super) fn source_elements(p: &mut Parser) -> Option<Vec<Element>> {
    let mut elements = vec![source_element(p)?];
    loop {
        let saved = p.checkpoint();
        trivia(p);
        match source_element(p) {
            Some(element) => elements.push(element),
            None => {
                p.restore(saved);
                return Some(elements);
            }
        }
    }
}

pub(super) fn source_element(p: &mut Parser) -> Option<Element> {
    if let Some(command) = command(p) {
        return Some(Element::Command(command));
    }
    text_characters(p).map(Element::Text)
}

pub(super) fn text_characters(p: &mut Parser) -> Option<Text> {
    let at = p.checkpoint();
    let mut content = text_character(p)?;
    while let Some(chunk) = text_character(p) {
        content.push_str(&chunk);
    }
    Some(Text {
        content,
        line: at.line,
        column: at.column,
    })
}

/// One unit of running text: a plain character, an escape kept verbatim or
/// a balanced brace group.
pub(super) fn text_character(p: &mut Parser) -> Option<String> {
    let saved = p.checkpoint();
    let plain = p.not_ahead(|p| {
        p.literal("\\")
            .or_else(|| p.literal("%"))
            .or_else(|| p.literal("{"))
            .or_else(|| p.literal("}"))
    });
    if plain {
        if let Some(ch) = p.any_char() {
            return Some(ch.to_string());
        }
        p.restore(saved);
    }

    if let Some(lit) = p.literal("\\LaTeX\\").or_else(|| p.literal("\\\\")) {
        return Some(lit.to_string());
    }
    if p.literal("\\").is_some() {
        match escaped_character(p) {
            Some(ch) => return Some(format!("\\{ch}")),
            None => p.restore(saved),
        }
    }
    curly_block(p)
}

/// The character after a backslash that does not start a command name:
/// `\{`, `\&`, `\%`, `\_`, `\ ` and so on.
pub(super) fn escaped_character(p: &mut Parser) -> Option<char> {
    p.class(|c| !c.is_ascii_alphabetic(), "escapable character")
}

pub(super) fn single_line_comment(p: &mut Parser) -> bool {
    if p.literal("%").is_none() {
        return false;
    }
    loop {
        let saved = p.checkpoint();
        if !p.not_ahead(line_terminator_char) || p.any_char().is_none() {
            p.restore(saved);
            return true;
        }
    }
}

pub(super) fn line_terminator(p: &mut Parser) -> bool {
    line_terminator_char(p).is_some()
}

fn line_terminator_char(p: &mut Parser) -> Option<&'static str> {
    p.literal("\n")
}

pub(super) fn command(p: &mut Parser) -> Option<Command> {
    let at = p.checkpoint();
    p.literal("\\")?;
    let Some(name) = command_name(p) else {
        p.restore(at);
        return None;
    };
    let starred = p.literal("*").is_some();
    let mut args = String::new();
    while let Some(arg) = command_argument(p) {
        args.push_str(&arg);
    }
    Some(Command {
        name,
        starred,
        args,
        line: at.line,
        column: at.column,
    })
}

pub(super) fn command_argument(p: &mut Parser) -> Option<String> {
    let saved = p.checkpoint();
    if p.literal("[").is_some() {
        let inner = square_characters(p).unwrap_or_default();
        if p.literal("]").is_some() {
            return Some(format!("[{inner}]"));
        }
        p.restore(saved);
    }
    curly_block(p)
}

pub(super) fn curly_block(p: &mut Parser) -> Option<String> {
    let saved = p.checkpoint();
    p.literal("{")?;
    let Some(inner) = p.nested(|p| Some(curly_characters(p).unwrap_or_default())) else {
        p.restore(saved);
        return None;
    };
    if p.literal("}").is_none() {
        p.restore(saved);
        return None;
    }
    Some(format!("{{{inner}}}"))
}

pub(super) fn square_characters(p: &mut Parser) -> Option<String> {
    let mut out = String::new();
    out.push(square_character(p)?);
    while let Some(ch) = square_character(p) {
        out.push(ch);
    }
    Some(out)
}

pub(super) fn square_character(p: &mut Parser) -> Option<char> {
    if !p.not_ahead(|p| p.literal("]")) {
        return None;
    }
    p.any_char()
}

pub(super) fn curly_characters(p: &mut Parser) -> Option<String> {
    let mut out = curly_character(p)?;
    while let Some(chunk) = curly_character(p) {
        out.push_str(&chunk);
    }
    Some(out)
}

pub(super) fn curly_character(p: &mut Parser) -> Option<String> {
    if p.not_ahead(|p| p.literal("{").or_else(|| p.literal("}"))) {
        if let Some(ch) = p.any_char() {
            return Some(ch.to_string());
        }
    }
    curly_block(p)
}

pub(super) fn command_name(p: &mut Parser) -> Option<String> {
    let mut name = String::new();
    name.push(p.class(|c| c.is_ascii_alphabetic(), "[a-zA-Z]")?);
    while let Some(ch) = p.class(|c| c.is_ascii_alphabetic(), "[a-zA-Z]") {
        name.push(ch);
    }
    Some(name)
}

/// `_`: never fails.
pub(super) fn blank(p: &mut Parser) {
    while white_space(p) || single_line_comment(p) {}
}

/// `__`: never fails.
pub(super) fn trivia(p: &mut Parser) {
    while white_space(p) || line_terminator_sequence(p) || single_line_comment(p) {}
}

pub(super) fn white_space(p: &mut Parser) -> bool {
    let matched = p
        .silenced(|p| {
            p.class(
                |c| matches!(c, '\t' | '\u{b}' | '\u{c}' | ' ' | '\u{a0}' | '\u{feff}'),
                "[\\t\\x0B\\f \\xA0\\uFEFF]",
            )
            .or_else(|| zs(p))
        })
        .is_some();
    if !matched {
        p.fail("whitespace");
    }
    matched
}

pub(super) fn zs(p: &mut Parser) -> Option<char> {
    p.class(
        is_space_separator,
        "[ \\xA0\\u1680\\u180E\\u2000-\\u200A\\u202F\\u205F\\u3000]",
    )
}

fn is_space_separator(c: char) -> bool {
    matches!(
        c,
        ' ' | '\u{a0}'
            | '\u{1680}'
            | '\u{180e}'
            | '\u{2000}'..='\u{200a}'
            | '\u{202f}'
            | '\u{205f}'
            | '\u{3000}'
    )
}

pub(super) fn line_terminator_sequence(p: &mut Parser) -> bool {
    let matched = p
        .silenced(|p| {
            p.literal("\n")
                .or_else(|| p.literal("\r\n"))
                .or_else(|| p.literal("\r"))
                .or_else(|| p.literal("\u{2028}"))
                .or_else(|| p.literal("\u{2029}"))
        })
        .is_some();
    if !matched {
        p.fail("end of line");
    }
    matched
}

#[cfg(test)]
mod tests {
    use crate::parser::{MAX_NESTING, Rule, RuleMatch, parse_rule};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn chars(input: &str, rule: Rule) -> String {
        match parse_rule(input, rule) {
            Ok(RuleMatch::Chars(s)) => s,
            other => panic!("expected chars, got {other:?}"),
        }
    }

    #[rstest]
    #[case("a", "a")]
    #[case("\\{", "\\{")]
    #[case("\\]", "\\]")]
    #[case("\\\\", "\\\\")]
    #[case("\\LaTeX\\", "\\LaTeX\\")]
    #[case("\\&", "\\&")]
    #[case("\\%", "\\%")]
    #[case("\\ ", "\\ ")]
    #[case("{x{y}}", "{x{y}}")]
    fn text_character_units(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(chars(input, Rule::TextCharacter), expected);
    }

    #[rstest]
    #[case("\\")]
    #[case("%")]
    #[case("}")]
    #[case("\\x")]
    fn text_character_rejects(#[case] input: &str) {
        assert!(parse_rule(input, Rule::TextCharacter).is_err());
    }

    #[test]
    fn command_arguments_are_verbatim() {
        assert_eq!(chars("[width=3cm]", Rule::CommandArgument), "[width=3cm]");
        assert_eq!(chars("{}", Rule::CommandArgument), "{}");
        assert_eq!(chars("[]", Rule::CommandArgument), "[]");
        assert_eq!(chars("{a{b}c}", Rule::CommandArgument), "{a{b}c}");
    }

    #[test]
    fn square_argument_may_contain_braces() {
        assert_eq!(chars("[{]", Rule::CommandArgument), "[{]");
    }

    #[test]
    fn starred_command() {
        let Ok(RuleMatch::Command(cmd)) = parse_rule("\\section*{Intro}", Rule::Command) else {
            panic!("expected a command");
        };
        assert_eq!(cmd.name, "section");
        assert!(cmd.starred);
        assert_eq!(cmd.args, "{Intro}");
    }

    #[rstest]
    #[case(" \t\u{a0}")]
    #[case("% comment")]
    #[case("\u{2003}% a")]
    #[case("")]
    fn blank_consumes_single_line_trivia(#[case] input: &str) {
        assert_eq!(parse_rule(input, Rule::Blank), Ok(RuleMatch::Skipped));
    }

    #[test]
    fn blank_stops_at_line_break() {
        let err = parse_rule(" \n", Rule::Blank).unwrap_err();
        assert_eq!(err.offset, 1);
        assert_eq!(err.found, Some('\n'));
        assert_eq!(err.expected, vec!["\"%\"", "whitespace"]);
    }

    #[test]
    fn trivia_spans_lines() {
        assert_eq!(
            parse_rule(" % one\r\n\t% two\n\u{2029}", Rule::Trivia),
            Ok(RuleMatch::Skipped)
        );
    }

    #[test]
    fn comment_stops_before_newline() {
        let err = parse_rule("% note\nx", Rule::SingleLineComment).unwrap_err();
        assert_eq!(err.offset, 6);
        assert_eq!((err.line, err.column), (1, 7));
    }

    #[test]
    fn escaped_character_rejects_letters() {
        let err = parse_rule("x", Rule::EscapedCharacter).unwrap_err();
        assert_eq!(err.expected, vec!["escapable character"]);
        assert_eq!(err.message, r#"Expected escapable character but "x" found."#);
    }

    // ============ Brace nesting ============

    fn nested_braces(depth: usize) -> String {
        format!("{}x{}", "{".repeat(depth), "}".repeat(depth))
    }

    #[test]
    fn curly_block_accepts_nesting_up_to_the_limit() {
        let input = nested_braces(MAX_NESTING);
        assert_eq!(chars(&input, Rule::CurlyBlock), input);
    }

    #[test]
    fn curly_block_rejects_nesting_past_the_limit() {
        let err = parse_rule(&nested_braces(MAX_NESTING + 1), Rule::CurlyBlock).unwrap_err();
        assert_eq!(err.offset, MAX_NESTING + 1);
        assert_eq!(err.found, Some('x'));
        assert_eq!(err.expected, vec![format!("at most {MAX_NESTING} nested braces")]);
    }
}
