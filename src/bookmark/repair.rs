//! Final structural fix-up after a substitution.

use crate::xml::{Kind, Names, NodeId, XmlTree};

/// Wrap every run that sits directly in `w:body` in a new paragraph.
pub fn wrap_body_runs(tree: &XmlTree, names: &Names) -> XmlTree {
    let mut out = XmlTree::new();
    let root = rebuild(tree, names, tree.root(), &mut out);
    out.set_root(root);
    out
}

fn rebuild(src: &XmlTree, names: &Names, id: NodeId, out: &mut XmlTree) -> NodeId {
    let kind = src.kind(id, names);
    if kind == Kind::CharData {
        return out.import(src, id);
    }

    let copy = out.copy_element(src, id);
    let mut children = Vec::with_capacity(src.children(id).len());
    for &child in src.children(id) {
        let rebuilt = rebuild(src, names, child, out);
        if kind == Kind::Body && src.kind(child, names) == Kind::Run {
            let p = out.alloc_element(src.qname(names.p), Vec::new());
            out.append_child(p, rebuilt);
            children.push(p);
        } else {
            children.push(rebuilt);
        }
    }
    out.set_children(copy, children);
    copy
}
