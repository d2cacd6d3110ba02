use std::io::BufRead;

use tracing::trace;

use crate::{
    dispatch::Dispatcher,
    error::{Error, Malformed, Position, Result},
    input::entity::{self, Radix},
    node::{Attribute, Name, Node, NodeType},
    util::{
        chars::{
            is_blank, is_letter, is_name, is_quote, AMPERSAND, BANG, COLON, EQUAL, HYPHEN,
            LANGLE, LSQUARE, MARK, POUND, RANGLE, RSQUARE, SEMICOLON, SLASH,
        },
        cursor::Cursor,
    },
};

/// A recursive-descent scanner that recognizes one [`Node`] per call to
/// [`Scanner::next_node`]. It keeps track of open elements and notifies the
/// listeners registered with its [`Dispatcher`] while it scans.
pub struct Scanner<'l, R> {
    cursor: Cursor<R>,

    /// Names of the currently open elements
    stack: Vec<Name>,

    dispatcher: Dispatcher<'l>,

    /// `true` as soon as leading blanks of the document have been skipped
    started: bool,
}

impl<'l, R: BufRead> Scanner<'l, R> {
    pub fn new(inner: R) -> Self {
        Self {
            cursor: Cursor::new(inner),
            stack: Vec::new(),
            dispatcher: Dispatcher::default(),
            started: false,
        }
    }

    /// The number of currently open elements
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// The names of the currently open elements, outermost first
    pub fn stack(&self) -> &[Name] {
        &self.stack
    }

    /// Position of the next character to scan
    pub fn position(&self) -> Position {
        self.cursor.position()
    }

    pub fn dispatcher(&self) -> &Dispatcher<'l> {
        &self.dispatcher
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<'l> {
        &mut self.dispatcher
    }

    /// Scans the next node. Returns [`None`] at the end of input.
    pub fn next_node(&mut self) -> Result<Option<Node>> {
        if !self.started {
            self.skip_blanks()?;
            self.started = true;
        }

        let Some(c) = self.cursor.read()? else {
            if let Some(open) = self.stack.last() {
                return Err(self.malformed(Malformed::Unclosed(open.clone())));
            }
            return Ok(None);
        };

        let node = if c == LANGLE {
            self.parse_node()?
        } else {
            self.cursor.unread()?;
            self.parse_text()?
        };

        trace!(
            kind = %node.kind,
            name = %node.name,
            depth = self.depth(),
            pos = %self.cursor.position(),
            "scanned node"
        );

        Ok(Some(node))
    }

    /// Parses everything after a `<`
    fn parse_node(&mut self) -> Result<Node> {
        let node = match self.read_some()? {
            MARK => self.parse_instruction()?,
            BANG => match self.read_some()? {
                LSQUARE => self.parse_cdata()?,
                HYPHEN => self.parse_comment()?,
                c => return Err(self.unexpected(c)),
            },
            SLASH => {
                let start = self.cursor.position();
                let node = self.parse_end_element()?;
                self.pop(&node.name, start)?;
                node
            }
            c if is_letter(c) => {
                self.cursor.unread()?;
                let node = self.parse_open_element()?;
                if !node.self_closing {
                    self.stack.push(node.name.clone());
                }
                node
            }
            c => return Err(self.unexpected(c)),
        };
        self.skip_blanks()?;
        Ok(node)
    }

    fn pop(&mut self, name: &Name, pos: Position) -> Result<()> {
        match self.stack.last() {
            None => Err(Error::Malformed {
                kind: Malformed::UnbalancedEnd(name.clone()),
                pos,
            }),
            Some(open) if open != name => Err(Error::Malformed {
                kind: Malformed::MismatchedEnd {
                    open: open.clone(),
                    found: name.clone(),
                },
                pos,
            }),
            Some(_) => {
                self.stack.pop();
                Ok(())
            }
        }
    }

    /// Parses a CDATA section after `<![`
    fn parse_cdata(&mut self) -> Result<Node> {
        let mut n = Node::new(NodeType::CData);
        n.self_closing = true;

        let start = self.cursor.position();
        let name = self.parse_name()?;
        if name != Name::new("CDATA") {
            return Err(Error::Malformed {
                kind: Malformed::CdataKeyword(name),
                pos: start,
            });
        }
        self.want(LSQUARE)?;
        self.skip_blanks()?;

        let mut buf = String::new();
        loop {
            let c = self.read_some()?;
            if c == RSQUARE && self.cursor.peek()? == Some(RSQUARE) {
                self.cursor.read()?;
                if self.read_some()? == RANGLE {
                    break;
                }
                return Err(self.malformed(Malformed::CdataTerminator));
            }
            buf.push(c);
        }

        n.content = buf.trim().to_string();
        self.dispatcher.emit_text(&n.content)?;
        Ok(n)
    }

    /// Parses a comment after `<!-`
    fn parse_comment(&mut self) -> Result<Node> {
        self.want(HYPHEN)?;
        self.skip_blanks()?;

        let mut n = Node::new(NodeType::Comment);
        n.self_closing = true;

        let mut buf = String::new();
        loop {
            let c = self.read_some()?;
            if c == HYPHEN && self.cursor.peek()? == Some(HYPHEN) {
                self.cursor.read()?;
                if self.cursor.peek()? == Some(RANGLE) {
                    self.cursor.read()?;
                    break;
                }
                // `--` inside a comment is kept as is
                buf.push_str("--");
                continue;
            }
            if c == AMPERSAND {
                buf.push(self.parse_entity()?);
            } else {
                buf.push(c);
            }
        }

        n.content = buf.trim().to_string();
        self.dispatcher.emit_comment(&n.content)?;
        Ok(n)
    }

    /// Parses a text run up to the next `<` or the end of input
    fn parse_text(&mut self) -> Result<Node> {
        let mut n = Node::new(NodeType::Text);

        let mut buf = String::new();
        loop {
            match self.cursor.read()? {
                None => break,
                Some(LANGLE) => {
                    self.cursor.unread()?;
                    break;
                }
                Some(AMPERSAND) => buf.push(self.parse_entity()?),
                Some(c) => buf.push(c),
            }
        }

        n.content = buf.trim().to_string();
        self.dispatcher.emit_text(&n.content)?;
        Ok(n)
    }

    /// Parses a processing instruction after `<?`
    fn parse_instruction(&mut self) -> Result<Node> {
        let mut n = Node::new(NodeType::ProcInst);
        n.self_closing = true;
        n.name = self.parse_name()?;
        self.dispatcher.emit_inst(&n.name)?;

        self.skip_blanks()?;
        self.parse_attributes(&mut n)?;
        self.want(MARK)?;
        self.want(RANGLE)?;
        Ok(n)
    }

    /// Parses an end tag after `</`
    fn parse_end_element(&mut self) -> Result<Node> {
        let mut n = Node::new(NodeType::EndElement);
        n.name = self.parse_name()?;
        self.dispatcher.emit_end(&n.name)?;

        self.skip_blanks()?;
        self.want(RANGLE)?;
        Ok(n)
    }

    /// Parses a start tag or an empty-element tag after `<`
    fn parse_open_element(&mut self) -> Result<Node> {
        let mut n = Node::new(NodeType::BeginElement);
        n.name = self.parse_name()?;
        self.dispatcher.emit_begin(&n.name)?;

        self.skip_blanks()?;
        self.parse_attributes(&mut n)?;

        match self.read_some()? {
            RANGLE => Ok(n),
            SLASH => {
                n.self_closing = true;
                self.want(RANGLE)?;
                Ok(n)
            }
            c => Err(self.unexpected(c)),
        }
    }

    /// Parses a name with an optional prefix (`prefix:local`)
    fn parse_name(&mut self) -> Result<Name> {
        let first = self.parse_name_part()?;
        if self.cursor.peek()? != Some(COLON) {
            return Ok(Name::new(first));
        }
        self.cursor.read()?;
        let local = self.parse_name_part()?;
        Ok(Name::with_prefix(first, local))
    }

    fn parse_name_part(&mut self) -> Result<String> {
        let c = self.read_some()?;
        if !is_letter(c) {
            return Err(self.unexpected(c));
        }

        let mut buf = String::from(c);
        loop {
            match self.cursor.read()? {
                Some(c) if is_name(c) => buf.push(c),
                _ => {
                    self.cursor.unread()?;
                    return Ok(buf);
                }
            }
        }
    }

    /// Parses a quoted attribute value
    fn parse_value(&mut self) -> Result<String> {
        let quote = self.read_some()?;
        if !is_quote(quote) {
            return Err(self.unexpected(quote));
        }

        let mut buf = String::new();
        loop {
            match self.read_some()? {
                c if c == quote => break,
                AMPERSAND => buf.push(self.parse_entity()?),
                c => buf.push(c),
            }
        }
        Ok(buf.trim().to_string())
    }

    /// Parses attributes until a character is found that cannot start a
    /// name. This character is not consumed.
    fn parse_attributes(&mut self, n: &mut Node) -> Result<()> {
        loop {
            if !matches!(self.cursor.peek()?, Some(c) if is_letter(c)) {
                return Ok(());
            }

            let start = self.cursor.position();
            let name = self.parse_name()?;
            if n.attrs.iter().any(|a| a.name == name) {
                return Err(Error::Malformed {
                    kind: Malformed::DuplicateAttribute(name),
                    pos: start,
                });
            }

            self.skip_blanks()?;
            self.want(EQUAL)?;
            self.skip_blanks()?;
            let value = self.parse_value()?;
            self.dispatcher.emit_attr(&name, &value)?;
            n.attrs.push(Attribute::new(name, value));

            self.skip_blanks()?;
        }
    }

    /// Parses an entity reference after `&` up to and including the `;`
    fn parse_entity(&mut self) -> Result<char> {
        let start = self.cursor.last_position();

        if self.read_some()? != POUND {
            self.cursor.unread()?;
            let mut name = String::new();
            loop {
                match self.read_some()? {
                    SEMICOLON => break,
                    c if is_letter(c) => name.push(c),
                    c => return Err(self.unexpected(c)),
                }
            }
            return entity::named(&name).ok_or(Error::Malformed {
                kind: Malformed::UnknownEntity(name),
                pos: start,
            });
        }

        let mut digits = String::new();
        let radix = if self.read_some()? == 'x' {
            digits.push('x');
            Radix::Hexadecimal
        } else {
            self.cursor.unread()?;
            Radix::Decimal
        };
        let offset = digits.len();

        loop {
            let c = self.read_some()?;
            if c == SEMICOLON {
                break;
            }
            digits.push(c);
            if !radix.accepts(c) {
                // stop at the first bad digit instead of consuming text
                // until the next `;`
                break;
            }
        }

        entity::numeric(&digits[offset..], radix).ok_or(Error::Malformed {
            kind: Malformed::InvalidNumericEntity(digits),
            pos: start,
        })
    }

    fn skip_blanks(&mut self) -> Result<()> {
        loop {
            match self.cursor.read()? {
                Some(c) if is_blank(c) => {}
                _ => return self.cursor.unread(),
            }
        }
    }

    /// Reads the next character and fails if it is not `expected`
    fn want(&mut self, expected: char) -> Result<()> {
        let c = self.read_some()?;
        if c != expected {
            return Err(self.unexpected(c));
        }
        Ok(())
    }

    /// Reads the next character. The end of input is an error here because
    /// it only makes sense between two nodes.
    fn read_some(&mut self) -> Result<char> {
        match self.cursor.read()? {
            Some(c) => Ok(c),
            None => Err(self.malformed(Malformed::UnexpectedEof)),
        }
    }

    /// Creates an error for the character returned by the last read
    fn unexpected(&self, found: char) -> Error {
        Error::UnexpectedChar {
            found,
            pos: self.cursor.last_position(),
        }
    }

    fn malformed(&self, kind: Malformed) -> Error {
        Error::Malformed {
            kind,
            pos: self.cursor.last_position(),
        }
    }
}
