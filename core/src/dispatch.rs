use tracing::trace;

use crate::{
    error::{Error, Result},
    node::Name,
};

/// The outcome of a listener invocation
#[derive(Debug)]
pub enum Flow {
    /// Continue with the next listener
    Continue,

    /// Remove this listener and continue with the next one
    Unsubscribe,

    /// Do not call any further listeners for this event. This is not an
    /// error.
    Stop,

    /// Abort the parse with [`Error::Listener`]
    Fail(anyhow::Error),
}

type NameListener<'l> = Box<dyn FnMut(&Name) -> Flow + 'l>;
type AttrListener<'l> = Box<dyn FnMut(&Name, &str) -> Flow + 'l>;
type TextListener<'l> = Box<dyn FnMut(&str) -> Flow + 'l>;

/// Calls registered listeners whenever the scanner recognizes a token.
/// There is one ordered list of listeners per category.
#[derive(Default)]
pub struct Dispatcher<'l> {
    /// If `true`, nothing is dispatched
    silent: bool,

    begins: Vec<NameListener<'l>>,
    ends: Vec<NameListener<'l>>,
    insts: Vec<NameListener<'l>>,
    attrs: Vec<AttrListener<'l>>,
    texts: Vec<TextListener<'l>>,
    comments: Vec<TextListener<'l>>,
}

impl<'l> Dispatcher<'l> {
    pub fn on_begin_element(&mut self, f: impl FnMut(&Name) -> Flow + 'l) {
        self.begins.push(Box::new(f));
    }

    pub fn on_end_element(&mut self, f: impl FnMut(&Name) -> Flow + 'l) {
        self.ends.push(Box::new(f));
    }

    pub fn on_instruction(&mut self, f: impl FnMut(&Name) -> Flow + 'l) {
        self.insts.push(Box::new(f));
    }

    pub fn on_attribute(&mut self, f: impl FnMut(&Name, &str) -> Flow + 'l) {
        self.attrs.push(Box::new(f));
    }

    /// Text listeners receive the content of text runs and CDATA sections
    pub fn on_text(&mut self, f: impl FnMut(&str) -> Flow + 'l) {
        self.texts.push(Box::new(f));
    }

    pub fn on_comment(&mut self, f: impl FnMut(&str) -> Flow + 'l) {
        self.comments.push(Box::new(f));
    }

    pub fn is_silent(&self) -> bool {
        self.silent
    }

    /// Enables or disables silent mode and returns the previous setting
    pub fn set_silent(&mut self, silent: bool) -> bool {
        std::mem::replace(&mut self.silent, silent)
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.begins.len()
            + self.ends.len()
            + self.insts.len()
            + self.attrs.len()
            + self.texts.len()
            + self.comments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn emit_begin(&mut self, name: &Name) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        emit("begin-element", &mut self.begins, |f| f(name))
    }

    pub(crate) fn emit_end(&mut self, name: &Name) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        emit("end-element", &mut self.ends, |f| f(name))
    }

    pub(crate) fn emit_inst(&mut self, name: &Name) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        emit("instruction", &mut self.insts, |f| f(name))
    }

    pub(crate) fn emit_attr(&mut self, name: &Name, value: &str) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        emit("attribute", &mut self.attrs, |f| f(name, value))
    }

    pub(crate) fn emit_text(&mut self, text: &str) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        emit("text", &mut self.texts, |f| f(text))
    }

    pub(crate) fn emit_comment(&mut self, text: &str) -> Result<()> {
        if self.silent {
            return Ok(());
        }
        emit("comment", &mut self.comments, |f| f(text))
    }
}

/// Calls all `listeners` in order. Listeners may remove themselves while the
/// list is traversed, so iterate by index and only advance it if the current
/// listener stays.
fn emit<L: ?Sized>(
    category: &'static str,
    listeners: &mut Vec<Box<L>>,
    mut call: impl FnMut(&mut L) -> Flow,
) -> Result<()> {
    let mut i = 0;
    while i < listeners.len() {
        match call(&mut *listeners[i]) {
            Flow::Continue => i += 1,
            Flow::Unsubscribe => {
                trace!(category, index = i, "listener unsubscribed");
                listeners.remove(i);
            }
            Flow::Stop => {
                trace!(category, index = i, "listener stopped dispatch");
                break;
            }
            Flow::Fail(err) => return Err(Error::Listener(err)),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use anyhow::anyhow;
    use assertor::{assert_that, BooleanAssertion, EqualityAssertion};
    use pretty_assertions::assert_eq;

    use super::{Dispatcher, Flow};
    use crate::{error::Error, node::Name};

    #[test]
    fn order() {
        let calls = RefCell::new(Vec::new());
        let mut d = Dispatcher::default();
        d.on_begin_element(|n| {
            calls.borrow_mut().push(format!("1 {n}"));
            Flow::Continue
        });
        d.on_begin_element(|n| {
            calls.borrow_mut().push(format!("2 {n}"));
            Flow::Continue
        });
        d.emit_begin(&Name::new("a")).unwrap();
        d.emit_begin(&Name::with_prefix("p", "b")).unwrap();
        drop(d);

        assert_eq!(calls.into_inner(), vec!["1 a", "2 a", "1 p:b", "2 p:b"]);
    }

    #[test]
    fn unsubscribe() {
        let calls = RefCell::new(Vec::new());
        let mut d = Dispatcher::default();
        d.on_text(|t| {
            calls.borrow_mut().push(format!("once {t}"));
            Flow::Unsubscribe
        });
        d.on_text(|t| {
            calls.borrow_mut().push(format!("always {t}"));
            Flow::Continue
        });
        d.emit_text("x").unwrap();
        d.emit_text("y").unwrap();
        assert_that!(d.len()).is_equal_to(1);
        drop(d);

        // the listener after the removed one must not be skipped
        assert_eq!(
            calls.into_inner(),
            vec!["once x", "always x", "always y"]
        );
    }

    #[test]
    fn stop() {
        let calls = RefCell::new(Vec::new());
        let mut d = Dispatcher::default();
        d.on_comment(|_| Flow::Stop);
        d.on_comment(|c| {
            calls.borrow_mut().push(c.to_string());
            Flow::Continue
        });
        d.emit_comment("hidden").unwrap();
        d.emit_comment("hidden too").unwrap();
        assert_that!(d.len()).is_equal_to(2);
        drop(d);

        assert_that!(calls.into_inner().is_empty()).is_true();
    }

    #[test]
    fn fail() {
        let mut later = 0;
        let mut d = Dispatcher::default();
        d.on_attribute(|n, v| Flow::Fail(anyhow!("rejected {n}={v}")));
        d.on_attribute(|_, _| {
            later += 1;
            Flow::Continue
        });
        let err = d.emit_attr(&Name::new("id"), "1").unwrap_err();
        assert!(matches!(err, Error::Listener(_)));
        assert_that!(err.to_string()).is_equal_to("listener failed: rejected id=1".to_string());
        drop(d);

        assert_that!(later).is_equal_to(0);
    }

    #[test]
    fn silent() {
        let mut calls = 0;
        let mut d = Dispatcher::default();
        d.on_end_element(|_| {
            calls += 1;
            Flow::Unsubscribe
        });

        assert_that!(d.set_silent(true)).is_false();
        d.emit_end(&Name::new("a")).unwrap();
        assert_that!(d.is_silent()).is_true();
        assert_that!(d.len()).is_equal_to(1);

        assert_that!(d.set_silent(false)).is_true();
        d.emit_end(&Name::new("a")).unwrap();
        d.emit_end(&Name::new("a")).unwrap();
        assert_that!(d.is_empty()).is_true();
        drop(d);

        assert_that!(calls).is_equal_to(1);
    }
}
