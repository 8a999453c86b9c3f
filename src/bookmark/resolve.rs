//! Turn placeholders into runs carrying the replacement text.

use crate::xml::{Attribute, Kind, Names, NodeId, XmlTree};

/// Rebuild `tree` with every placeholder replaced by a run of `text`.
///
/// A placeholder sitting directly in a block container (`w:body`, `w:tc`,
/// `w:txbxContent`) gets a paragraph around the run.
pub fn resolve_placeholders(tree: &XmlTree, names: &Names, text: &str) -> XmlTree {
    let mut out = XmlTree::new();
    let root = rebuild(tree, names, tree.root(), Kind::Generic, text, &mut out);
    out.set_root(root);
    out
}

fn rebuild(
    src: &XmlTree,
    names: &Names,
    id: NodeId,
    parent: Kind,
    text: &str,
    out: &mut XmlTree,
) -> NodeId {
    match src.kind(id, names) {
        Kind::CharData => out.import(src, id),
        Kind::Placeholder => {
            let run = text_run(src, names, id, text, out);
            match parent {
                Kind::Body | Kind::TableCell | Kind::TextBoxContent => {
                    let p = out.alloc_element(src.qname(names.p), Vec::new());
                    out.append_child(p, run);
                    p
                }
                _ => run,
            }
        }
        kind => {
            let copy = out.copy_element(src, id);
            let children: Vec<NodeId> = src
                .children(id)
                .iter()
                .map(|&c| rebuild(src, names, c, kind, text, out))
                .collect();
            out.set_children(copy, children);
            copy
        }
    }
}

/// `w:r > (captured formatting, w:t)` in the output tree.
fn text_run(src: &XmlTree, names: &Names, placeholder: NodeId, text: &str, out: &mut XmlTree) -> NodeId {
    let run = out.alloc_element(src.qname(names.r), Vec::new());
    for &props in src.children(placeholder) {
        let copy = out.import(src, props);
        out.append_child(run, copy);
    }

    let attrs = if needs_preserve(text) {
        vec![Attribute::new(src.qname(names.space), "preserve")]
    } else {
        Vec::new()
    };
    let t = out.alloc_element(src.qname(names.t), attrs);
    if !text.is_empty() {
        let content = out.alloc_text(text);
        out.append_child(t, content);
    }
    out.append_child(run, t);
    run
}

fn needs_preserve(text: &str) -> bool {
    text.starts_with(char::is_whitespace) || text.ends_with(char::is_whitespace)
}
