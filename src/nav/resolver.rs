use crate::ts::node_at;
use tree_sitter::Node;

/// Topmost node starting at the node covering `offset`.
///
/// Starts from the smallest node covering `offset` and climbs while the
/// parent begins at the same byte, so a wrapper and the form it wraps resolve
/// to the same (outermost) node. An empty buffer yields the root.
pub fn topmost_node_at(root: Node<'_>, offset: usize) -> Node<'_> {
    let mut node = node_at(root, offset);
    while let Some(parent) = node.parent() {
        if parent.start_byte() != node.start_byte() {
            break;
        }
        node = parent;
    }
    node
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ts::{language_from_name, SyntaxTree};

    fn parse(lang: &str, source: &str) -> SyntaxTree {
        SyntaxTree::parse(language_from_name(lang).unwrap(), source).unwrap()
    }

    #[test]
    fn climbs_through_same_start_wrappers() {
        let syntax = parse("rust", "fn main() {\n    foo();\n}");
        let node = topmost_node_at(syntax.root_node(), 16);
        assert_eq!(node.kind(), "expression_statement");
    }

    #[test]
    fn stops_below_differently_started_parent() {
        let syntax = parse("json", r#"["a", ["b", "c"], "d"]"#);
        let node = topmost_node_at(syntax.root_node(), 6);
        assert_eq!(node.kind(), "array");
        assert_eq!(node.byte_range(), 6..16);
    }

    #[test]
    fn offset_at_start_of_buffer_resolves_root() {
        let syntax = parse("json", r#"["a"]"#);
        let root = syntax.root_node();
        assert_eq!(topmost_node_at(root, 0), root);
    }

    #[test]
    fn empty_buffer_resolves_root() {
        let syntax = parse("json", "");
        let root = syntax.root_node();
        assert_eq!(topmost_node_at(root, 0), root);
    }
}
