//! `[Content_Types].xml` editing.

use crate::xml::names::CONTENT_TYPES;
use crate::xml::{Attribute, QName, XName, XmlTree};

pub const PART_NAME: &str = "[Content_Types].xml";

const OVERRIDE: XName = XName::new(CONTENT_TYPES, "", "Override");

/// Declare `content_type` for `part`, replacing an existing override.
pub fn set_override(tree: &mut XmlTree, part: &str, content_type: &str) {
    let part_name = format!("/{}", part.trim_start_matches('/'));
    let root = tree.root();
    let existing: Vec<_> = tree
        .children(root)
        .iter()
        .copied()
        .filter(|&id| {
            tree.name(id).is_some_and(|n| n.is(OVERRIDE))
                && tree
                    .plain_attr(id, "PartName")
                    .is_some_and(|p| p.eq_ignore_ascii_case(&part_name))
        })
        .collect();
    for id in existing {
        tree.detach(id);
    }

    let attrs = vec![
        Attribute::new(QName::local("PartName"), part_name),
        Attribute::new(QName::local("ContentType"), content_type),
    ];
    let element = tree.alloc_element(tree.qname(OVERRIDE), attrs);
    tree.append_child(root, element);
}

/// Content type declared for `part`, by override or by extension default.
pub fn content_type_of(tree: &XmlTree, part: &str) -> Option<String> {
    let part_name = format!("/{}", part.trim_start_matches('/'));
    let root = tree.root();
    let children = tree.children(root);

    let by_override = children.iter().find_map(|&id| {
        let name = tree.name(id)?;
        (name.local == "Override"
            && tree
                .plain_attr(id, "PartName")
                .is_some_and(|p| p.eq_ignore_ascii_case(&part_name)))
        .then(|| tree.plain_attr(id, "ContentType"))
        .flatten()
    });
    if let Some(content_type) = by_override {
        return Some(content_type.to_string());
    }

    let extension = part.rsplit_once('.')?.1;
    children
        .iter()
        .find_map(|&id| {
            let name = tree.name(id)?;
            (name.local == "Default"
                && tree
                    .plain_attr(id, "Extension")
                    .is_some_and(|e| e.eq_ignore_ascii_case(extension)))
            .then(|| tree.plain_attr(id, "ContentType"))
            .flatten()
        })
        .map(str::to_string)
}
