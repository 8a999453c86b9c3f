//! Bookmark substitution on a document tree.
//!
//! A substitution runs as a pipeline of tree passes:
//!
//! 1. [`locate::validate_target`] checks the document as stored.
//! 2. [`normalize::flatten`] lifts paragraph content so that a bookmark
//!    spanning paragraphs becomes a run of siblings.
//! 3. [`locate::locate_pair`] finds both markers under one parent.
//! 4. [`rewrite::replace_range`] swaps the content for a placeholder.
//! 5. [`normalize::unflatten`] regroups paragraphs.
//! 6. [`resolve::resolve_placeholders`] turns the placeholder into a run.
//! 7. [`repair::wrap_body_runs`] fixes runs left directly in the body.
//!
//! Every pass except the rewrite builds a new tree, so a failure part-way
//! leaves the caller's tree untouched.

pub mod locate;
pub mod normalize;
pub mod repair;
pub mod resolve;
pub mod rewrite;

use tracing::debug;

use crate::error::{Error, Result};
use crate::xml::{Kind, Names, XmlTree};

pub use locate::{DocumentChecks, MarkerPair};

/// Replace the content of bookmark `name` with `text`.
pub fn replace_bookmark_text(
    tree: &XmlTree,
    names: &Names,
    checks: &DocumentChecks,
    name: &str,
    text: &str,
) -> Result<XmlTree> {
    locate::validate_target(tree, names, checks, name)?;

    let mut flat = normalize::flatten(tree, names);
    let pair = locate::locate_pair(&flat, names, name)?;
    rewrite::replace_range(&mut flat, names, &pair)?;

    let grouped = normalize::unflatten(&flat, names);
    let resolved = resolve::resolve_placeholders(&grouped, names, text);
    let repaired = repair::wrap_body_runs(&resolved, names);

    debug!(bookmark = name, chars = text.chars().count(), "replaced bookmark");
    Ok(repaired)
}

/// Names of all bookmarks in document order, duplicates included.
pub fn bookmark_names(tree: &XmlTree, names: &Names) -> Vec<String> {
    tree.descendants(tree.root())
        .filter(|&id| tree.kind(id, names) == Kind::BookmarkStart)
        .filter_map(|id| tree.attr(id, names.name))
        .map(str::to_string)
        .collect()
}

/// Visible text of bookmark `name`.
///
/// Only runs and paragraph boundaries at the bookmark's own level count:
/// runs give their `w:t` text, boundaries give `\n`, and anything else
/// (a table between the markers, say) gives nothing. Bookmarks inside
/// hyperlinks, fields and smart tags are read like any other.
pub fn bookmark_text(tree: &XmlTree, names: &Names, name: &str) -> Result<String> {
    if locate::find_start(tree, names, name).is_none() {
        return Err(Error::MarkerNotFound(name.to_string()));
    }
    let flat = normalize::flatten(tree, names);
    let pair = locate::find_pair(&flat, names, name)?;

    let siblings = flat.children(pair.parent);
    let range = siblings
        .iter()
        .skip_while(|&&id| id != pair.start)
        .skip(1)
        .take_while(|&&id| id != pair.end);

    let mut text = String::new();
    for &node in range {
        match flat.kind(node, names) {
            Kind::Run => {
                for t in flat
                    .descendants(node)
                    .filter(|&id| flat.kind(id, names) == Kind::Text)
                {
                    text.push_str(&flat.text_content(t));
                }
            }
            Kind::Paragraph => text.push('\n'),
            _ => {}
        }
    }
    Ok(text)
}
