use std::io::{BufRead, ErrorKind};

use utf8::{DecodeError, Incomplete};

use crate::error::{Error, Position, Result};

/// What the last call to [`Cursor::read`] returned
#[derive(Clone, Copy)]
enum Last {
    Char(char),
    Eof,
}

/// Wrapper around a `BufRead` object. Decodes UTF-8 into single characters
/// and allows exactly one character to be pushed back between two reads.
pub struct Cursor<R> {
    inner: R,

    /// A character pushed back by [`Cursor::unread`]
    pending: Option<char>,

    /// The result of the last read or [`None`] if there is nothing that
    /// could be pushed back
    last: Option<Last>,

    /// Position of the next character to read
    pos: Position,

    /// Position before the last read
    prev: Position,

    /// Leading bytes of a character that continues in the next buffer fill
    incomplete: Incomplete,
}

impl<R: BufRead> Cursor<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            pending: None,
            last: None,
            pos: Position::default(),
            prev: Position::default(),
            incomplete: Incomplete::empty(),
        }
    }

    /// Position of the next character to read
    pub fn position(&self) -> Position {
        self.pos
    }

    /// Position of the character returned by the last read
    pub fn last_position(&self) -> Position {
        self.prev
    }

    /// Reads the next character. Returns [`None`] at the end of input.
    pub fn read(&mut self) -> Result<Option<char>> {
        let c = match self.pending.take() {
            Some(c) => Some(c),
            None => self.decode()?,
        };

        self.prev = self.pos;
        match c {
            Some(c) => {
                self.pos.offset += 1;
                if c == '\n' {
                    self.pos.line += 1;
                    self.pos.column = 1;
                } else {
                    self.pos.column += 1;
                }
                self.last = Some(Last::Char(c));
            }
            None => self.last = Some(Last::Eof),
        }

        Ok(c)
    }

    /// Pushes back the character returned by the last read. Pushing back
    /// the end of input is a no-op. Calling this twice without a read in
    /// between, or before the first read, fails with
    /// [`Error::InvalidUnread`].
    pub fn unread(&mut self) -> Result<()> {
        match self.last.take() {
            Some(Last::Char(c)) => {
                self.pending = Some(c);
                self.pos = self.prev;
                Ok(())
            }
            Some(Last::Eof) => Ok(()),
            None => Err(Error::InvalidUnread),
        }
    }

    /// Returns the next character without consuming it
    pub fn peek(&mut self) -> Result<Option<char>> {
        let c = self.read()?;
        self.unread()?;
        Ok(c)
    }

    /// Decodes the next character from the inner reader. A character whose
    /// bytes span two buffer fills is collected in `incomplete`.
    fn decode(&mut self) -> Result<Option<char>> {
        loop {
            let buf = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if buf.is_empty() {
                if self.incomplete.is_empty() {
                    return Ok(None);
                }
                return Err(Error::Encoding { pos: self.pos });
            }

            let (c, consumed) = if self.incomplete.is_empty() {
                // a character has at most 4 bytes
                let window = &buf[..buf.len().min(4)];
                match utf8::decode(window) {
                    Ok(s) => first_char(s),
                    Err(DecodeError::Incomplete {
                        valid_prefix,
                        incomplete_suffix,
                    }) => {
                        if valid_prefix.is_empty() {
                            self.incomplete = incomplete_suffix;
                            (None, window.len())
                        } else {
                            first_char(valid_prefix)
                        }
                    }
                    Err(DecodeError::Invalid { valid_prefix, .. }) => {
                        if valid_prefix.is_empty() {
                            return Err(Error::Encoding { pos: self.pos });
                        }
                        first_char(valid_prefix)
                    }
                }
            } else {
                match self.incomplete.try_complete(buf) {
                    None => (None, buf.len()),
                    Some((Ok(s), rest)) => (first_char(s).0, buf.len() - rest.len()),
                    Some((Err(_), _)) => return Err(Error::Encoding { pos: self.pos }),
                }
            };

            self.inner.consume(consumed);
            if c.is_some() {
                return Ok(c);
            }
        }
    }
}

/// Returns the first character of `s` and its length in bytes
fn first_char(s: &str) -> (Option<char>, usize) {
    let c = s.chars().next();
    (c, c.map_or(0, char::len_utf8))
}
