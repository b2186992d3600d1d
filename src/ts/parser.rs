use crate::ts::errors::TreeSitterError;
use ast_grep_language::{LanguageExt, SupportLang};
use std::str::FromStr;
use tree_sitter::{InputEdit, Node, Parser, Tree};

/// Look up a grammar by name or alias (`rust`, `rs`, `json`, `py`, ...).
pub fn language_from_name(name: &str) -> Result<SupportLang, TreeSitterError> {
    SupportLang::from_str(name.trim()).map_err(|_| TreeSitterError::UnknownLanguage {
        name: name.to_string(),
    })
}

/// Every grammar this build can parse.
pub fn supported_languages() -> &'static [SupportLang] {
    SupportLang::all_langs()
}

/// A parser together with the latest tree it produced.
///
/// The tree is the snapshot every [`Node`] handed out by the buffer borrows
/// from. Edits go through [`SyntaxTree::edit`] followed by
/// [`SyntaxTree::reparse`], which lets tree-sitter reuse unchanged subtrees.
pub struct SyntaxTree {
    parser: Parser,
    tree: Tree,
    language: SupportLang,
}

impl SyntaxTree {
    /// Parse `source` from scratch with the given grammar.
    pub fn parse(language: SupportLang, source: &str) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        let ts_lang = language.get_ts_language();
        parser
            .set_language(&ts_lang)
            .map_err(|_| TreeSitterError::LanguageSet)?;

        let tree = parser
            .parse(source, None)
            .ok_or(TreeSitterError::ParseFailed)?;

        Ok(Self {
            parser,
            tree,
            language,
        })
    }

    /// Get the configured grammar.
    pub fn language(&self) -> SupportLang {
        self.language
    }

    /// Get the root node of the current snapshot.
    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    /// Record an edit on the old tree so the next reparse can be incremental.
    pub fn edit(&mut self, edit: &InputEdit) {
        self.tree.edit(edit);
    }

    /// Reparse `source`, reusing the edited old tree.
    pub fn reparse(&mut self, source: &str) -> Result<(), TreeSitterError> {
        let tree = self
            .parser
            .parse(source, Some(&self.tree))
            .ok_or(TreeSitterError::ParseFailed)?;
        self.tree = tree;
        Ok(())
    }

    /// Check if the tree contains any ERROR or MISSING nodes.
    pub fn has_errors(&self) -> bool {
        has_error_nodes(self.tree.root_node())
    }
}

fn has_error_nodes(node: Node<'_>) -> bool {
    if node.is_error() || node.is_missing() {
        return true;
    }

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if has_error_nodes(child) {
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_rust() {
        let lang = language_from_name("rust").unwrap();
        let syntax = SyntaxTree::parse(lang, "fn main() { println!(\"hello\"); }").unwrap();

        assert!(!syntax.has_errors());
        assert_eq!(syntax.root_node().kind(), "source_file");
    }

    #[test]
    fn parse_invalid_rust() {
        let lang = language_from_name("rust").unwrap();
        let syntax = SyntaxTree::parse(lang, "fn main( { }").unwrap();

        assert!(syntax.has_errors());
    }

    #[test]
    fn language_aliases() {
        assert_eq!(language_from_name("rs").unwrap(), SupportLang::Rust);
        assert_eq!(language_from_name("json").unwrap(), SupportLang::Json);
        assert!(matches!(
            language_from_name("klingon"),
            Err(TreeSitterError::UnknownLanguage { .. })
        ));
    }

    #[test]
    fn incremental_reparse_tracks_edit() {
        let lang = language_from_name("json").unwrap();
        let mut syntax = SyntaxTree::parse(lang, "[1, 2]").unwrap();

        syntax.edit(&InputEdit {
            start_byte: 5,
            old_end_byte: 5,
            new_end_byte: 8,
            start_position: tree_sitter::Point::new(0, 5),
            old_end_position: tree_sitter::Point::new(0, 5),
            new_end_position: tree_sitter::Point::new(0, 8),
        });
        syntax.reparse("[1, 2, 3]").unwrap();

        let array = syntax.root_node().named_child(0).unwrap();
        assert_eq!(array.named_child_count(), 3);
    }
}
