//! Embedding HTML values as alternative-format chunks.
//!
//! A value that looks like HTML is first substituted as plain text like any
//! other value. This pass then finds the paragraph holding exactly that text
//! and swaps it for a `w:altChunk` pointing at an XHTML part, which Word
//! renders as formatted content when the document is opened.

use tracing::{debug, warn};

use crate::error::Result;
use crate::package::Package;
use crate::xml::names::R;
use crate::xml::{Attribute, Kind, Names, NodeId, XmlTree};

/// HTML values waiting for the chunk pass, in substitution order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HtmlQueue {
    values: Vec<String>,
}

impl HtmlQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: impl Into<String>) {
        self.values.push(value.into());
    }

    /// Values paired with their 1-based chunk number.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.values
            .iter()
            .enumerate()
            .map(|(i, value)| (i + 1, value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Replace the paragraph showing each queued value with an altChunk.
///
/// Chunk `n` gets relationship id `{id_prefix}{n}`. A value with no matching
/// paragraph is skipped. Returns the number of chunks embedded.
pub fn embed_html_chunks(
    package: &mut Package,
    names: &Names,
    queue: &HtmlQueue,
    id_prefix: &str,
) -> Result<usize> {
    let main = package.main_document_part()?;
    let mut embedded = 0;

    for (n, html) in queue.iter() {
        let id = format!("{id_prefix}{n}");
        let mut tree = package.part_xml(&main)?;
        let Some(paragraph) = find_paragraph(&tree, names, html) else {
            warn!(chunk = id.as_str(), "no paragraph shows the HTML value, skipping");
            continue;
        };

        package.add_alternative_format_part(&main, &id, html.as_bytes())?;

        tree.ensure_namespace(R, "r");
        let attrs = vec![Attribute::new(tree.qname(names.r_id), id.as_str())];
        let chunk = tree.alloc_element(tree.qname(names.alt_chunk), attrs);
        tree.insert_after(paragraph, chunk);
        tree.detach(paragraph);
        package.put_part_xml(&main, &tree)?;

        debug!(chunk = id.as_str(), "embedded HTML chunk");
        embedded += 1;
    }
    Ok(embedded)
}

/// First paragraph directly in the body or a table cell whose visible text
/// equals `text`.
fn find_paragraph(tree: &XmlTree, names: &Names, text: &str) -> Option<NodeId> {
    tree.descendants(tree.root()).find(|&id| {
        tree.kind(id, names) == Kind::Paragraph
            && tree
                .parent(id)
                .is_some_and(|p| matches!(tree.kind(p, names), Kind::Body | Kind::TableCell))
            && visible_text(tree, names, id) == text
    })
}

fn visible_text(tree: &XmlTree, names: &Names, id: NodeId) -> String {
    tree.descendants(id)
        .filter(|&d| tree.kind(d, names) == Kind::Text)
        .map(|t| tree.text_content(t))
        .collect()
}
