//! Relationship parts (`_rels/*.rels`) and part-name resolution.

use crate::error::Result;
use crate::xml::names::PACKAGE_RELATIONSHIPS;
use crate::xml::{Attribute, QName, XName, XmlTree};

const TRANSITIONAL_TYPES: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/";
const STRICT_TYPES: &str = "http://purl.oclc.org/ooxml/officeDocument/relationships/";

/// Relationship type of the package's main part.
pub const OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
/// Relationship type of an alternative format import part.
pub const AF_CHUNK: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/aFChunk";
pub const HEADER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/header";
pub const FOOTER: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footer";
pub const FOOTNOTES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/footnotes";
pub const ENDNOTES: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/endnotes";

const RELATIONSHIP: XName = XName::new(PACKAGE_RELATIONSHIPS, "", "Relationship");

/// One `<Relationship>` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    pub external: bool,
}

impl Relationship {
    /// Whether this relationship has the given type URI. Strict
    /// conformance documents spell the same types under another base.
    pub fn is(&self, rel_type: &str) -> bool {
        self.rel_type == rel_type
            || self
                .rel_type
                .strip_prefix(STRICT_TYPES)
                .zip(rel_type.strip_prefix(TRANSITIONAL_TYPES))
                .is_some_and(|(a, b)| a == b)
    }

    /// Part name of the target, resolved against the source part.
    pub fn target_part(&self, source: &str) -> Option<String> {
        (!self.external).then(|| resolve_target(source, &self.target))
    }
}

/// Name of the relationship part for `source`; `""` is the package itself.
pub fn rels_part_name(source: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, file)) => format!("{dir}/_rels/{file}.rels"),
        None if source.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{source}.rels"),
    }
}

/// Resolve a relationship target to a part name without a leading slash.
pub fn resolve_target(source: &str, target: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let relative = match target.strip_prefix('/') {
        Some(absolute) => absolute,
        None => {
            if let Some((dir, _)) = source.rsplit_once('/') {
                segments.extend(dir.split('/').filter(|s| !s.is_empty()));
            }
            target
        }
    };
    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }
    segments.join("/")
}

/// Target of `part` as seen from `source`, for writing into a rels part.
pub fn relative_target(source: &str, part: &str) -> String {
    match source.rsplit_once('/') {
        Some((dir, _)) => part
            .strip_prefix(dir)
            .and_then(|rest| rest.strip_prefix('/'))
            .map_or_else(|| format!("/{part}"), str::to_string),
        None => part.to_string(),
    }
}

/// Read every relationship in a rels part.
pub fn parse(tree: &XmlTree) -> Vec<Relationship> {
    let root = tree.root();
    tree.children(root)
        .iter()
        .filter(|&&id| tree.name(id).is_some_and(|n| n.is(RELATIONSHIP)))
        .filter_map(|&id| {
            Some(Relationship {
                id: tree.plain_attr(id, "Id")?.to_string(),
                rel_type: tree.plain_attr(id, "Type")?.to_string(),
                target: tree.plain_attr(id, "Target")?.to_string(),
                external: tree.plain_attr(id, "TargetMode") == Some("External"),
            })
        })
        .collect()
}

/// An empty rels part.
pub fn empty() -> Result<XmlTree> {
    XmlTree::parse_str(&format!(r#"<Relationships xmlns="{PACKAGE_RELATIONSHIPS}"/>"#))
}

/// Append a `<Relationship>` element.
pub fn append(tree: &mut XmlTree, rel: &Relationship) {
    let mut attrs = vec![
        Attribute::new(QName::local("Id"), rel.id.as_str()),
        Attribute::new(QName::local("Type"), rel.rel_type.as_str()),
        Attribute::new(QName::local("Target"), rel.target.as_str()),
    ];
    if rel.external {
        attrs.push(Attribute::new(QName::local("TargetMode"), "External"));
    }
    let element = tree.alloc_element(tree.qname(RELATIONSHIP), attrs);
    let root = tree.root();
    tree.append_child(root, element);
}
