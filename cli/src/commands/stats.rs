use std::{cell::RefCell, fmt::Display, io::Read};

use anyhow::{Context, Result};
use clap::Args;
use xmlsax_core::{Flow, Reader};

use super::open_document;

/// Count the nodes of a document
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// The document to read (`-` for stdin)
    pub file: String,
}

/// Node counts collected by listeners
#[derive(Debug, Default, PartialEq, Eq)]
struct Stats {
    elements: usize,
    attributes: usize,
    instructions: usize,
    texts: usize,
    comments: usize,
    max_depth: usize,
}

impl Display for Stats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "elements:     {}", self.elements)?;
        writeln!(f, "attributes:   {}", self.attributes)?;
        writeln!(f, "instructions: {}", self.instructions)?;
        writeln!(f, "texts:        {}", self.texts)?;
        writeln!(f, "comments:     {}", self.comments)?;
        write!(f, "max depth:    {}", self.max_depth)
    }
}

/// Collects [`Stats`] while streaming the given document
fn collect(source: impl Read) -> Result<Stats> {
    let stats = RefCell::new(Stats::default());

    let mut reader = Reader::new(source);
    reader.on_begin_element(|_| {
        stats.borrow_mut().elements += 1;
        Flow::Continue
    });
    reader.on_attribute(|_, _| {
        stats.borrow_mut().attributes += 1;
        Flow::Continue
    });
    reader.on_instruction(|_| {
        stats.borrow_mut().instructions += 1;
        Flow::Continue
    });
    reader.on_text(|_| {
        stats.borrow_mut().texts += 1;
        Flow::Continue
    });
    reader.on_comment(|_| {
        stats.borrow_mut().comments += 1;
        Flow::Continue
    });

    while reader
        .read()
        .context("Unable to parse document")?
        .is_some()
    {
        let mut s = stats.borrow_mut();
        s.max_depth = s.max_depth.max(reader.depth());
    }
    drop(reader);

    Ok(stats.into_inner())
}

/// Run the `stats` command
pub fn run_stats(args: StatsArgs) -> Result<()> {
    let stats = collect(open_document(&args.file)?)?;
    println!("{stats}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, EqualityAssertion, ResultAssertion};
    use pretty_assertions::assert_eq;

    use super::{collect, Stats};

    #[test]
    fn counts() {
        let stats = collect(
            r#"<?xml version="1.0"?>
            <!-- c -->
            <r a="1" b="2">
              <x><y k="v">t</y><y/></x>
              <![CDATA[raw]]>
            </r>"#
                .as_bytes(),
        )
        .unwrap();
        assert_eq!(
            stats,
            Stats {
                elements: 4,
                attributes: 4,
                instructions: 1,
                texts: 2,
                comments: 1,
                max_depth: 3,
            }
        );
    }

    #[test]
    fn malformed() {
        assert_that!(collect("<a><b></a>".as_bytes())).is_err();
    }

    #[test]
    fn display() {
        let stats = Stats {
            elements: 1,
            max_depth: 1,
            ..Default::default()
        };
        assert_that!(stats.to_string()).is_equal_to(
            "elements:     1\nattributes:   0\ninstructions: 0\ntexts:        0\ncomments:     0\nmax depth:    1"
                .to_string(),
        );
    }
}
