use thiserror::Error;
use xmlsax_core::{Error as ReadError, Position};
use yansi::{Condition, Paint};

/// An error that happened while reading a document
#[derive(Error, Debug)]
pub enum ParseError {
    /// A rendered error message including a snippet of the document
    #[error("{0}")]
    Parse(String),

    /// An error that cannot be attributed to a location in the document
    #[error(transparent)]
    Other(ReadError),
}

/// Convert an error of the reader into a [ParseError]
pub trait IntoParseError {
    fn into_parse_error(self, document: &str) -> ParseError;
}

impl IntoParseError for ReadError {
    fn into_parse_error(self, document: &str) -> ParseError {
        let msg = match &self {
            ReadError::UnexpectedChar { found, .. } => {
                format!("Unexpected character `{}'.", found.escape_debug())
            }
            ReadError::Malformed { kind, .. } => format!("{}.", capitalize(&kind.to_string())),
            ReadError::Encoding { .. } => "Invalid UTF-8 sequence.".to_string(),
            _ => return ParseError::Other(self),
        };
        let Some(pos) = self.position() else {
            return ParseError::Other(self);
        };

        ParseError::Parse(render(
            document,
            pos,
            &msg,
            Condition::from(|| {
                Condition::stderr_is_tty() && Condition::clicolor() && Condition::no_color()
            }),
        ))
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Renders `msg` below the line of `document` that contains `pos` and marks
/// the column `pos` points to
fn render(document: &str, pos: Position, msg: &str, colored: Condition) -> String {
    // extract snippet
    let snippet = document
        .lines()
        .nth(pos.line.saturating_sub(1))
        .unwrap_or_default();
    let prefix = pos.column.saturating_sub(1);
    let start = snippet
        .char_indices()
        .nth(prefix)
        .map(|(i, _)| i)
        .unwrap_or(snippet.len());
    let end = snippet[start..]
        .chars()
        .next()
        .map(|c| start + c.len_utf8())
        .unwrap_or(start);

    // format message
    let prefix = snippet[..start].chars().count();
    format!(
        "Unable to parse document at {}\n\n{}{}{}\n{}{}\n{}{}{}",
        pos,
        &snippet[..start],
        snippet[start..end].red().whenever(colored),
        &snippet[end..],
        " ".repeat(prefix),
        (if end > start { "┬" } else { "│" }).red().whenever(colored),
        " ".repeat(prefix),
        "╰── ".red().whenever(colored),
        msg.red().bold().whenever(colored),
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use xmlsax_core::{Error, Position, Reader};
    use yansi::Condition;

    use super::{capitalize, render, IntoParseError, ParseError};

    fn parse(document: &str) -> ParseError {
        Reader::from_str(document)
            .run()
            .unwrap_err()
            .into_parse_error(document)
    }

    #[test]
    fn snippet() {
        let pos = Position {
            line: 2,
            column: 5,
            offset: 12,
        };
        assert_eq!(
            render("<a>\n  </b>\n</a>", pos, "Oops.", Condition::NEVER),
            "Unable to parse document at 2:5\n\n  </b>\n    ┬\n    ╰── Oops."
        );
    }

    #[test]
    fn snippet_at_end_of_line() {
        let pos = Position {
            line: 1,
            column: 4,
            offset: 3,
        };
        assert_eq!(
            render("<a ", pos, "Unexpected end of input.", Condition::NEVER),
            "Unable to parse document at 1:4\n\n<a \n   │\n   ╰── Unexpected end of input."
        );
    }

    #[test]
    fn multi_byte_characters() {
        let pos = Position {
            line: 1,
            column: 4,
            offset: 3,
        };
        assert_eq!(
            render("<ä>€</ä>", pos, "x", Condition::NEVER),
            "Unable to parse document at 1:4\n\n<ä>€</ä>\n   ┬\n   ╰── x"
        );
    }

    #[test]
    fn located_errors() {
        let ParseError::Parse(msg) = parse("<a x='1' x='2'/>") else {
            panic!("expected a rendered error");
        };
        assert!(msg.contains("Duplicated attribute `x'."), "{msg}");
    }

    #[test]
    fn other_errors() {
        assert!(matches!(
            Error::Aborted.into_parse_error(""),
            ParseError::Other(Error::Aborted)
        ));
    }

    #[test]
    fn capitalize_first() {
        assert_eq!(capitalize("element mismatched"), "Element mismatched");
        assert_eq!(capitalize(""), "");
    }
}
