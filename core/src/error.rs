use std::fmt::{Display, Formatter};

use thiserror::Error;

use crate::node::{Name, Node};

/// A location in the character stream. Lines and columns start at 1, the
/// offset counts characters (not bytes) from the start of the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Default for Position {
    fn default() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Structural violations of well-formedness
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Malformed {
    #[error("element mismatched (open `{open}', found `{found}')")]
    MismatchedEnd { open: Name, found: Name },

    #[error("closing tag `{0}' without open element")]
    UnbalancedEnd(Name),

    #[error("duplicated attribute `{0}'")]
    DuplicateAttribute(Name),

    #[error("`]]' can not appear in CDATA sections")]
    CdataTerminator,

    #[error("unexpected `{0}', want CDATA")]
    CdataKeyword(Name),

    #[error("unknown entity `&{0};'")]
    UnknownEntity(String),

    #[error("invalid numeric entity `&#{0};'")]
    InvalidNumericEntity(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("reached end of input with unclosed element `{0}'")]
    Unclosed(Name),
}

/// Errors that can occur while reading a document. Apart from
/// [`Error::Rejected`], all of them abort the parse.
#[derive(Error, Debug)]
pub enum Error {
    #[error("unexpected character `{found}' at {pos}")]
    UnexpectedChar { found: char, pos: Position },

    #[error("malformed document at {pos}: {kind}")]
    Malformed { kind: Malformed, pos: Position },

    #[error("listener failed: {0}")]
    Listener(anyhow::Error),

    #[error("filter rejected {} `{}': {reason}", .node.kind, .node.name)]
    Rejected { node: Box<Node>, reason: anyhow::Error },

    #[error("invalid UTF-8 sequence at {pos}")]
    Encoding { pos: Position },

    #[error("character pushed back twice or before reading")]
    InvalidUnread,

    #[error("reader was aborted by an earlier error")]
    Aborted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The position at which the error was detected, if known
    pub fn position(&self) -> Option<Position> {
        match self {
            Error::UnexpectedChar { pos, .. }
            | Error::Malformed { pos, .. }
            | Error::Encoding { pos } => Some(*pos),
            _ => None,
        }
    }

    /// Returns the kind of well-formedness violation if this is a
    /// malformed-document error
    pub fn malformed(&self) -> Option<&Malformed> {
        match self {
            Error::Malformed { kind, .. } => Some(kind),
            _ => None,
        }
    }

    /// `true` if the error leaves the reader in a usable state
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Rejected { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;
