//! Bookmark lookup and the checks that decide whether a rewrite is safe.

use crate::error::{Container, Error, Result};
use crate::xml::{Kind, Names, NodeId, XmlTree};

/// Facts about a document that are computed once, not per bookmark.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentChecks {
    pub tracked_revisions: bool,
}

/// A start/end marker pair located in a flattened tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPair {
    pub start: NodeId,
    pub end: NodeId,
    /// Shared parent of both markers.
    pub parent: NodeId,
}

/// First `w:bookmarkStart` named `name`, in document order.
pub fn find_start(tree: &XmlTree, names: &Names, name: &str) -> Option<NodeId> {
    tree.descendants(tree.root()).find(|&id| {
        tree.kind(id, names) == Kind::BookmarkStart && tree.attr(id, names.name) == Some(name)
    })
}

/// First `w:bookmarkEnd` carrying the numeric id `id`.
fn find_end(tree: &XmlTree, names: &Names, id: i64) -> Option<NodeId> {
    tree.descendants(tree.root()).find(|&node| {
        tree.kind(node, names) == Kind::BookmarkEnd && marker_id(tree, names, node) == Some(id)
    })
}

fn marker_id(tree: &XmlTree, names: &Names, id: NodeId) -> Option<i64> {
    tree.attr(id, names.id)?.trim().parse().ok()
}

/// Checks run on the document as stored, before flattening.
pub fn validate_target(
    tree: &XmlTree,
    names: &Names,
    checks: &DocumentChecks,
    name: &str,
) -> Result<()> {
    let start = find_start(tree, names, name).ok_or_else(|| Error::MarkerNotFound(name.to_string()))?;

    if tree
        .parent(start)
        .is_some_and(|parent| tree.kind(parent, names) == Kind::Math)
    {
        return Err(Error::MathFormulaTarget(name.to_string()));
    }
    if checks.tracked_revisions {
        return Err(Error::TrackedRevisionsPresent);
    }
    if tree
        .descendants(tree.root())
        .any(|id| tree.kind(id, names) == Kind::StructuredTag)
    {
        return Err(Error::StructuredContentPresent);
    }
    Ok(())
}

/// Locate both markers in a flattened tree and check they can be rewritten.
pub fn locate_pair(flat: &XmlTree, names: &Names, name: &str) -> Result<MarkerPair> {
    let (start, end) = find_markers(flat, names, name)?;

    for marker in [start, end] {
        if let Some(container) = unsupported_container(flat, names, marker) {
            return Err(Error::UnsupportedContainer {
                name: name.to_string(),
                container,
            });
        }
    }

    pair_under_parent(flat, name, start, end)
}

/// Locate both markers in a flattened tree without judging their containers.
///
/// Fails only when a marker is missing, the markers sit at different levels,
/// or the end comes first.
pub fn find_pair(flat: &XmlTree, names: &Names, name: &str) -> Result<MarkerPair> {
    let (start, end) = find_markers(flat, names, name)?;
    pair_under_parent(flat, name, start, end)
}

fn find_markers(flat: &XmlTree, names: &Names, name: &str) -> Result<(NodeId, NodeId)> {
    let start = find_start(flat, names, name)
        .ok_or_else(|| Error::MarkerIntegrity(format!("start of {name} lost while flattening")))?;
    let id = marker_id(flat, names, start)
        .ok_or_else(|| Error::MarkerIntegrity(format!("{name} has no numeric id")))?;
    let end = find_end(flat, names, id)
        .ok_or_else(|| Error::MarkerIntegrity(format!("no end marker for {name} (id {id})")))?;
    Ok((start, end))
}

fn pair_under_parent(flat: &XmlTree, name: &str, start: NodeId, end: NodeId) -> Result<MarkerPair> {
    let parent = match (flat.parent(start), flat.parent(end)) {
        (Some(a), Some(b)) if a == b => a,
        _ => return Err(Error::CrossLevelMarker(name.to_string())),
    };

    let siblings = flat.children(parent);
    let start_pos = siblings.iter().position(|&c| c == start);
    let end_pos = siblings.iter().position(|&c| c == end);
    if end_pos < start_pos {
        return Err(Error::MarkerIntegrity(format!("end of {name} precedes its start")));
    }

    Ok(MarkerPair { start, end, parent })
}

fn unsupported_container(tree: &XmlTree, names: &Names, id: NodeId) -> Option<Container> {
    tree.ancestors(id).find_map(|a| match tree.kind(a, names) {
        Kind::Hyperlink => Some(Container::Hyperlink),
        Kind::SimpleField => Some(Container::SimpleField),
        Kind::SmartTag => Some(Container::SmartTag),
        _ => None,
    })
}
