//! Test helpers for building WordprocessingML trees.
//!
//! Used by the unit tests of the substitution passes.

use crate::xml::{Kind, Names, XmlTree};
use crate::xml::names::{M, R, W};

/// Parse a `w:document` whose body holds `body`.
pub fn document(body: &str) -> XmlTree {
    let xml = format!(
        r#"<w:document xmlns:w="{W}" xmlns:r="{R}" xmlns:m="{M}"><w:body>{body}</w:body></w:document>"#
    );
    XmlTree::parse_str(&xml).expect("test document should parse")
}

/// Serialize the body's children, without the body tag itself.
pub fn body_xml(tree: &XmlTree) -> String {
    let names = Names::new();
    let body = tree
        .descendants(tree.root())
        .find(|&id| tree.kind(id, &names) == Kind::Body)
        .expect("document has a body");
    tree.children(body)
        .iter()
        .map(|&id| tree.to_xml_string(id).expect("fragment should serialize"))
        .collect()
}

/// Number of paragraphs anywhere in the tree.
pub fn paragraph_count(tree: &XmlTree) -> usize {
    let names = Names::new();
    tree.descendants(tree.root())
        .filter(|&id| tree.kind(id, &names) == Kind::Paragraph)
        .count()
}
