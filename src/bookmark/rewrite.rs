//! Replace the content between a marker pair with a placeholder.

use crate::error::{Error, Result};
use crate::xml::{Kind, Names, NodeId, QName, XmlTree};

use super::locate::MarkerPair;

/// Rewrite the shared parent of `pair` in a flattened tree.
///
/// Runs, paragraph markers and tables between the markers are dropped.
/// Everything else in the range (nested bookmarks, proofing marks, comments
/// anchors) stays, after a new placeholder that carries the formatting of
/// the first dropped run. Returns the placeholder.
///
/// `pair` must come from [`locate_pair`](super::locate::locate_pair) on the
/// same tree, so the start precedes the end under `pair.parent`.
pub fn replace_range(flat: &mut XmlTree, names: &Names, pair: &MarkerPair) -> Result<NodeId> {
    let siblings = flat.children(pair.parent).to_vec();
    let position = |marker: NodeId| {
        siblings
            .iter()
            .position(|&c| c == marker)
            .ok_or_else(|| Error::MarkerIntegrity("marker moved before rewrite".to_string()))
    };
    let start_pos = position(pair.start)?;
    let end_pos = position(pair.end)?;
    let range = &siblings[start_pos + 1..end_pos];

    let placeholder = flat.alloc_element(QName::from(names.placeholder), Vec::new());
    let first_run_props = range
        .iter()
        .find(|&&id| flat.kind(id, names) == Kind::Run)
        .and_then(|&run| {
            flat.children(run)
                .iter()
                .copied()
                .find(|&c| flat.kind(c, names) == Kind::RunProps)
        });
    if let Some(props) = first_run_props {
        let copy = flat.duplicate(props);
        flat.append_child(placeholder, copy);
    }

    let mut children = Vec::with_capacity(siblings.len());
    children.extend_from_slice(&siblings[..=start_pos]);
    children.push(placeholder);
    children.extend(range.iter().copied().filter(|&id| {
        !matches!(
            flat.kind(id, names),
            Kind::Paragraph | Kind::Run | Kind::Table
        )
    }));
    children.extend_from_slice(&siblings[end_pos..]);
    flat.set_children(pair.parent, children);

    Ok(placeholder)
}
