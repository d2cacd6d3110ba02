use std::{
    io::{BufRead, BufReader, Read},
    iter::FusedIterator,
};

use tracing::debug;

use crate::{
    dispatch::{Dispatcher, Flow},
    error::{Error, Position, Result},
    input::{
        filter::{Filter, KeepAll, Verdict},
        scanner::Scanner,
    },
    node::{Name, Node, NodeType},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Scanning,
    Exhausted,
    Failed,
}

/// Reads a document node by node. Every node the scanner recognizes is
/// announced to the registered listeners and then passed to a [`Filter`]
/// that decides if [`Reader::read`] returns it.
///
/// ```
/// use xmlsax_core::{NodeType, Reader};
///
/// let mut reader = Reader::from_str("<a><b>t</b></a>");
/// let mut kinds = Vec::new();
/// while let Some(node) = reader.read()? {
///     kinds.push((node.kind, reader.depth()));
/// }
/// assert_eq!(kinds[1], (NodeType::BeginElement, 2));
/// # Ok::<(), xmlsax_core::Error>(())
/// ```
pub struct Reader<'l, R> {
    scanner: Scanner<'l, R>,
    filter: Box<dyn Filter + 'l>,
    state: State,
}

impl<'l, S: Read> Reader<'l, BufReader<S>> {
    /// Creates a reader that returns all nodes of the given source
    pub fn new(source: S) -> Self {
        Self::with_filter(source, KeepAll)
    }

    /// Creates a reader that only returns the nodes `filter` keeps
    pub fn with_filter(source: S, filter: impl Filter + 'l) -> Self {
        Reader::from_buf_read(BufReader::new(source), filter)
    }
}

impl<'a, 'l> Reader<'l, &'a [u8]> {
    /// Creates a reader for a document held in memory
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &'a str) -> Self {
        Reader::from_buf_read(text.as_bytes(), KeepAll)
    }
}

impl<'l, R: BufRead> Reader<'l, R> {
    /// Creates a reader for a source that is already buffered
    pub fn from_buf_read(inner: R, filter: impl Filter + 'l) -> Self {
        Self {
            scanner: Scanner::new(inner),
            filter: Box::new(filter),
            state: State::Scanning,
        }
    }

    /// The number of currently open elements
    pub fn depth(&self) -> usize {
        self.scanner.depth()
    }

    /// The names of the currently open elements, outermost first
    pub fn stack(&self) -> &[Name] {
        self.scanner.stack()
    }

    /// Position of the next character to scan in the source
    pub fn source_position(&self) -> Position {
        self.scanner.position()
    }

    /// Returns the next node the filter keeps or [`None`] at the end of the
    /// document.
    ///
    /// If the filter rejects a node, [`Error::Rejected`] is returned and the
    /// reader can be used further. Any other error is final: subsequent
    /// calls return [`Error::Aborted`] without reading from the source again.
    pub fn read(&mut self) -> Result<Option<Node>> {
        match self.state {
            State::Scanning => {}
            State::Exhausted => return Ok(None),
            State::Failed => return Err(Error::Aborted),
        }

        let r = self.next_kept();
        match &r {
            Ok(None) => self.state = State::Exhausted,
            Err(e) if !e.is_recoverable() => self.state = State::Failed,
            _ => {}
        }
        r
    }

    /// Reads until the end of the document or the first error. Useful if the
    /// caller is only interested in listener callbacks.
    pub fn run(&mut self) -> Result<()> {
        while self.read()?.is_some() {}
        Ok(())
    }

    fn next_kept(&mut self) -> Result<Option<Node>> {
        loop {
            let Some(node) = self.scanner.next_node()? else {
                return Ok(None);
            };

            match self.filter.keep(node.kind, &node.name) {
                Verdict::Keep => return Ok(Some(node)),
                Verdict::Skip => {
                    debug!(kind = %node.kind, name = %node.name, "skipped node");
                }
                Verdict::Ignore => {
                    if node.opens_element() {
                        self.skip_subtree(&node)?;
                    }
                }
                Verdict::Reject(reason) => {
                    debug!(kind = %node.kind, name = %node.name, "rejected node");
                    return Err(Error::Rejected {
                        node: Box::new(node),
                        reason,
                    });
                }
            }
        }
    }

    /// Consumes everything up to and including the end tag matching `node`,
    /// which must be the begin-element node scanned last. Listeners are not
    /// called in the meantime.
    fn skip_subtree(&mut self, node: &Node) -> Result<()> {
        // the element has already been pushed
        let target = self.depth().saturating_sub(1);
        debug!(name = %node.name, depth = target, "skipping subtree");

        let prior = self.scanner.dispatcher_mut().set_silent(true);
        let r = self.skip_until(target, &node.name);
        self.scanner.dispatcher_mut().set_silent(prior);

        if r.is_ok() {
            debug!(name = %node.name, pos = %self.source_position(), "subtree skipped");
        }
        r
    }

    fn skip_until(&mut self, depth: usize, name: &Name) -> Result<()> {
        loop {
            // the scanner reports unclosed elements at the end of input
            let Some(n) = self.scanner.next_node()? else {
                return Ok(());
            };
            if n.kind == NodeType::EndElement && self.depth() == depth && n.name == *name {
                return Ok(());
            }
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher<'l> {
        self.scanner.dispatcher()
    }

    pub fn dispatcher_mut(&mut self) -> &mut Dispatcher<'l> {
        self.scanner.dispatcher_mut()
    }

    /// Registers a listener for element open tags
    pub fn on_begin_element(&mut self, f: impl FnMut(&Name) -> Flow + 'l) {
        self.dispatcher_mut().on_begin_element(f);
    }

    /// Registers a listener for element close tags. Empty-element tags
    /// announce a begin only.
    pub fn on_end_element(&mut self, f: impl FnMut(&Name) -> Flow + 'l) {
        self.dispatcher_mut().on_end_element(f);
    }

    /// Registers a listener for processing instruction targets
    pub fn on_instruction(&mut self, f: impl FnMut(&Name) -> Flow + 'l) {
        self.dispatcher_mut().on_instruction(f);
    }

    /// Registers a listener for attributes of elements and processing
    /// instructions. It is called after the owner was announced.
    pub fn on_attribute(&mut self, f: impl FnMut(&Name, &str) -> Flow + 'l) {
        self.dispatcher_mut().on_attribute(f);
    }

    /// Registers a listener for text runs and CDATA sections
    pub fn on_text(&mut self, f: impl FnMut(&str) -> Flow + 'l) {
        self.dispatcher_mut().on_text(f);
    }

    pub fn on_comment(&mut self, f: impl FnMut(&str) -> Flow + 'l) {
        self.dispatcher_mut().on_comment(f);
    }
}

impl<'l, R: BufRead> Iterator for Reader<'l, R> {
    type Item = Result<Node>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.read() {
            Ok(Some(node)) => Some(Ok(node)),
            Ok(None) | Err(Error::Aborted) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

impl<'l, R: BufRead> FusedIterator for Reader<'l, R> {}
