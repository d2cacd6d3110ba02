use crate::node::{Name, NodeType};

/// Decides what the [`Reader`](crate::Reader) does with a scanned node
#[derive(Debug)]
pub enum Verdict {
    /// Return the node to the caller
    Keep,

    /// Drop this node only
    Skip,

    /// Drop this node and, if it opens an element, everything up to and
    /// including the matching end tag. No listeners are called for the
    /// dropped content.
    Ignore,

    /// Return the node together with an error
    Reject(anyhow::Error),
}

/// Specifies which nodes a [`Reader`](crate::Reader) should return
pub trait Filter {
    /// Will be called for every node the reader scans outside of ignored
    /// subtrees
    fn keep(&mut self, kind: NodeType, name: &Name) -> Verdict;
}

impl<F> Filter for F
where
    F: FnMut(NodeType, &Name) -> Verdict,
{
    fn keep(&mut self, kind: NodeType, name: &Name) -> Verdict {
        self(kind, name)
    }
}

/// A filter that keeps every node
#[derive(Debug, Default, Clone, Copy)]
pub struct KeepAll;

impl Filter for KeepAll {
    fn keep(&mut self, _kind: NodeType, _name: &Name) -> Verdict {
        Verdict::Keep
    }
}

/// Keeps only begin-element and end-element nodes
pub fn elements_only(kind: NodeType, _name: &Name) -> Verdict {
    match kind {
        NodeType::BeginElement | NodeType::EndElement => Verdict::Keep,
        _ => Verdict::Skip,
    }
}

/// Returns a filter that ignores the subtrees of all elements with one of
/// the given names
pub fn ignore_elements(names: Vec<Name>) -> impl FnMut(NodeType, &Name) -> Verdict {
    move |kind, name| {
        if kind == NodeType::BeginElement && names.contains(name) {
            Verdict::Ignore
        } else {
            Verdict::Keep
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{elements_only, ignore_elements, Filter, KeepAll, Verdict};
    use crate::node::{Name, NodeType};

    #[test]
    fn keep_all() {
        assert!(matches!(
            KeepAll.keep(NodeType::Comment, &Name::default()),
            Verdict::Keep
        ));
    }

    #[test]
    fn closures_are_filters() {
        let mut calls = 0;
        let mut f = |kind: NodeType, _: &Name| {
            calls += 1;
            if kind == NodeType::Text {
                Verdict::Skip
            } else {
                Verdict::Keep
            }
        };
        assert!(matches!(
            Filter::keep(&mut f, NodeType::Text, &Name::default()),
            Verdict::Skip
        ));
        assert!(matches!(
            Filter::keep(&mut f, NodeType::BeginElement, &Name::new("a")),
            Verdict::Keep
        ));
        assert_eq!(calls, 2);
    }

    #[test]
    fn predefined() {
        assert!(matches!(
            elements_only(NodeType::EndElement, &Name::new("a")),
            Verdict::Keep
        ));
        assert!(matches!(
            elements_only(NodeType::ProcInst, &Name::new("xml")),
            Verdict::Skip
        ));

        let mut f = ignore_elements(vec![Name::with_prefix("gml", "Envelope")]);
        assert!(matches!(
            f(NodeType::BeginElement, &Name::with_prefix("gml", "Envelope")),
            Verdict::Ignore
        ));
        assert!(matches!(
            f(NodeType::BeginElement, &Name::new("Envelope")),
            Verdict::Keep
        ));
        assert!(matches!(
            f(NodeType::EndElement, &Name::with_prefix("gml", "Envelope")),
            Verdict::Keep
        ));
    }
}
