//! Caller-supplied bookmark values.
//!
//! The data document can have any root; every element named `bookmark`
//! (unprefixed) with a `name` attribute contributes one entry:
//!
//! ```xml
//! <data>
//!   <bookmark name="Title">Quarterly report</bookmark>
//!   <bookmark name="Body"><![CDATA[<html><p>Hi</p></html>]]></bookmark>
//! </data>
//! ```

use std::collections::HashSet;

use tracing::warn;

use crate::error::Result;
use crate::xml::XmlTree;

/// Read `(name, value)` pairs from bookmark data XML, in document order.
///
/// The value is the element's own text; child elements are not part of it.
/// A name supplied twice keeps its first value.
pub fn parse_bookmark_data(xml: &str) -> Result<Vec<(String, String)>> {
    let tree = XmlTree::parse_str(xml)?;
    let root = tree.root();

    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    for id in std::iter::once(root).chain(tree.descendants(root)) {
        let Some(name) = tree.name(id) else {
            continue;
        };
        if name.prefix.is_some() || name.local != "bookmark" {
            continue;
        }
        let Some(key) = tree.plain_attr(id, "name") else {
            continue;
        };
        if !seen.insert(key.to_string()) {
            warn!(bookmark = key, "duplicate bookmark value ignored");
            continue;
        }
        let value: String = tree
            .children(id)
            .iter()
            .filter_map(|&c| tree.text(c))
            .collect();
        entries.push((key.to_string(), value));
    }
    Ok(entries)
}

/// Ordered `name -> value` map restricted to bookmarks the template has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubstitutionMap {
    entries: Vec<(String, String)>,
}

impl SubstitutionMap {
    /// Intersect the template's bookmark names with the data XML.
    ///
    /// Order follows the data; names missing on either side are dropped.
    pub fn build<S: AsRef<str>>(template_names: &[S], xml: &str) -> Result<Self> {
        Ok(Self::from_entries(template_names, parse_bookmark_data(xml)?))
    }

    pub fn from_entries<S: AsRef<str>>(
        template_names: &[S],
        entries: impl IntoIterator<Item = (String, String)>,
    ) -> Self {
        let known: HashSet<&str> = template_names.iter().map(|name| name.as_ref()).collect();
        let entries = entries
            .into_iter()
            .filter(|(name, _)| known.contains(name.as_str()))
            .collect();
        Self { entries }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
