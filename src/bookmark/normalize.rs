//! Paragraph flattening and unflattening.
//!
//! In the flat form every `w:p` is replaced, in place, by its content lifted
//! to the paragraph's own level followed by an empty *paragraph marker*: a
//! `w:p` holding only the original attributes and `w:pPr`. A bookmark that
//! spans several paragraphs then appears as one run of siblings with
//! markers interspersed.
//!
//! ```text
//! body > [p > [pPr, r1, bookmarkStart, r2], p > [r3, bookmarkEnd]]
//! body > [r1, bookmarkStart, r2, p > [pPr], r3, bookmarkEnd, p]
//! ```
//!
//! [`unflatten`] regroups content into paragraphs by closing a group after
//! every block-level node.

use crate::xml::{Kind, Names, NodeId, XmlTree};

/// Lift paragraph content to sibling level.
///
/// The root element is treated as a container even if it is a paragraph.
pub fn flatten(tree: &XmlTree, names: &Names) -> XmlTree {
    let mut out = XmlTree::new();
    let root = flatten_container(tree, names, tree.root(), &mut out);
    out.set_root(root);
    out
}

fn flatten_node(src: &XmlTree, names: &Names, id: NodeId, out: &mut XmlTree) -> Vec<NodeId> {
    match src.kind(id, names) {
        Kind::Paragraph => {
            let mut lifted = Vec::new();
            let mut props = Vec::new();
            for &child in src.children(id) {
                if src.kind(child, names) == Kind::ParagraphProps {
                    props.push(out.import(src, child));
                } else {
                    lifted.extend(flatten_node(src, names, child, out));
                }
            }
            let marker = out.copy_element(src, id);
            out.set_children(marker, props);
            lifted.push(marker);
            lifted
        }
        Kind::CharData => vec![out.import(src, id)],
        _ => vec![flatten_container(src, names, id, out)],
    }
}

fn flatten_container(src: &XmlTree, names: &Names, id: NodeId, out: &mut XmlTree) -> NodeId {
    let mut children = Vec::new();
    for &child in src.children(id) {
        children.extend(flatten_node(src, names, child, out));
    }
    let copy = out.copy_element(src, id);
    out.set_children(copy, children);
    copy
}

/// Regroup flattened content into paragraphs.
pub fn unflatten(tree: &XmlTree, names: &Names) -> XmlTree {
    let mut out = XmlTree::new();
    let root = unflatten_node(tree, names, tree.root(), &mut out);
    out.set_root(root);
    out
}

fn unflatten_node(src: &XmlTree, names: &Names, id: NodeId, out: &mut XmlTree) -> NodeId {
    if src.kind(id, names) == Kind::CharData {
        return out.import(src, id);
    }

    let children = src.children(id);
    let rebuilt = if children
        .iter()
        .any(|&c| src.kind(c, names) == Kind::Paragraph)
    {
        regroup(src, names, children, out)
    } else {
        children
            .iter()
            .map(|&c| unflatten_node(src, names, c, out))
            .collect()
    };

    let copy = out.copy_element(src, id);
    out.set_children(copy, rebuilt);
    copy
}

/// Wrap every group that ends in a paragraph marker into a paragraph.
fn regroup(src: &XmlTree, names: &Names, children: &[NodeId], out: &mut XmlTree) -> Vec<NodeId> {
    let mut rebuilt = Vec::new();
    for group in paragraph_groups(src, names, children) {
        let Some((&last, members)) = group.split_last() else {
            continue;
        };
        if src.kind(last, names) != Kind::Paragraph {
            rebuilt.extend(group.iter().map(|&m| unflatten_node(src, names, m, out)));
            continue;
        }

        // The marker's own children are its w:pPr, which leads the paragraph.
        let paragraph = out.copy_element(src, last);
        let mut content: Vec<NodeId> = src
            .children(last)
            .iter()
            .map(|&c| out.import(src, c))
            .collect();
        content.extend(members.iter().map(|&m| unflatten_node(src, names, m, out)));
        out.set_children(paragraph, content);
        rebuilt.push(paragraph);
    }
    rebuilt
}

/// Split siblings into groups; a new group starts right after every
/// block-level node.
///
/// Only the previous sibling decides, so a paragraph marker directly after
/// another block-level node forms a group of its own (an empty paragraph).
fn paragraph_groups<'a>(src: &XmlTree, names: &Names, children: &'a [NodeId]) -> Vec<&'a [NodeId]> {
    let mut groups = Vec::new();
    let mut start = 0;
    for i in 1..children.len() {
        if is_block_level(src, names, children[i - 1]) {
            groups.push(&children[start..i]);
            start = i;
        }
    }
    if start < children.len() {
        groups.push(&children[start..]);
    }
    groups
}

fn is_block_level(src: &XmlTree, names: &Names, id: NodeId) -> bool {
    match src.kind(id, names) {
        Kind::Paragraph | Kind::Table | Kind::TableCellProps | Kind::AltChunk => true,
        Kind::StructuredTag => src
            .descendants(id)
            .any(|d| src.kind(d, names) == Kind::Paragraph),
        _ => false,
    }
}
