use std::io::{self, BufWriter, Write};

use anyhow::Result;
use clap::Args;
use xmlsax_core::{elements_only, ignore_elements, Name, Node, NodeType, Reader, Verdict};

use super::{parse_error::IntoParseError, read_document};

/// Print the nodes of a document one per line
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// The document to read (`-` for stdin)
    pub file: String,

    /// Only print begin-element and end-element nodes
    #[arg(long)]
    pub elements_only: bool,

    /// Do not print elements with this qualified name and everything they
    /// contain (may be given multiple times)
    #[arg(long, value_name = "NAME", value_parser = parse_name)]
    pub ignore: Vec<Name>,
}

/// Parses a qualified name given on the command line
pub fn parse_name(s: &str) -> Result<Name, String> {
    let name = match s.split_once(':') {
        Some((prefix, local)) => Name::with_prefix(prefix, local),
        None => Name::new(s),
    };
    if !name.is_valid() || name.prefix() == Some("") || name.local.contains(':') {
        return Err(format!("`{s}' is not a valid qualified name"));
    }
    Ok(name)
}

/// Formats a node the way the `dump` command prints it
fn format_node(index: usize, depth: usize, node: &Node) -> String {
    let attrs = node
        .attrs
        .iter()
        .map(|a| a.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    format!(
        "{} ({}): {} [{}] {} ({})",
        index, depth, node.name, attrs, node.content, node.kind
    )
}

/// Run the `dump` command
pub fn run_dump(args: DumpArgs) -> Result<()> {
    let document = read_document(&args.file)?;

    let only_elements = args.elements_only;
    let mut ignore = ignore_elements(args.ignore);
    let filter = move |kind: NodeType, name: &Name| match ignore(kind, name) {
        Verdict::Keep if only_elements => elements_only(kind, name),
        v => v,
    };
    let mut reader = Reader::with_filter(document.as_bytes(), filter);

    let stdout = io::stdout().lock();
    let mut writer = BufWriter::new(stdout);

    let mut index = 0;
    loop {
        match reader.read() {
            Ok(Some(node)) => {
                index += 1;
                writeln!(writer, "{}", format_node(index, reader.depth(), &node))?;
            }
            Ok(None) => break,
            Err(err) => {
                writer.flush()?;
                return Err(err.into_parse_error(&document).into());
            }
        }
    }

    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use assertor::{assert_that, ResultAssertion};
    use pretty_assertions::assert_eq;
    use xmlsax_core::{Name, Reader};

    use super::{format_node, parse_name};

    #[test]
    fn names() {
        assert_eq!(parse_name("a").unwrap(), Name::new("a"));
        assert_eq!(
            parse_name("gml:Envelope").unwrap(),
            Name::with_prefix("gml", "Envelope")
        );
        assert_that!(parse_name("")).is_err();
        assert_that!(parse_name(":a")).is_err();
        assert_that!(parse_name("a:")).is_err();
        assert_that!(parse_name("a:b:c")).is_err();
    }

    #[test]
    fn format() {
        let mut reader = Reader::from_str(r#"<sax:r a="1" b="x y">t</sax:r>"#);
        let begin = reader.read().unwrap().unwrap();
        assert_eq!(
            format_node(1, reader.depth(), &begin),
            r#"1 (1): sax:r [a="1" b="x y"]  (begin-element)"#
        );
        let text = reader.read().unwrap().unwrap();
        assert_eq!(format_node(2, reader.depth(), &text), "2 (1):  [] t (text)");
    }
}
