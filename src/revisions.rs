//! Tracked-revision detection.

use crate::error::Result;
use crate::package::{Package, relationships};
use crate::xml::{Names, XmlTree};

/// Decides whether a package carries tracked changes.
///
/// `names` is the table of the run the check belongs to.
pub trait RevisionDetector {
    fn has_tracked_revisions(&self, package: &Package, names: &Names) -> Result<bool>;
}

/// Scans the main document and the story parts it references (headers,
/// footers, footnotes, endnotes) for revision markup.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRevisionDetector;

impl MarkupRevisionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a single part tree contains revision markup.
    pub fn tree_has_revisions(&self, tree: &XmlTree, names: &Names) -> bool {
        std::iter::once(tree.root())
            .chain(tree.descendants(tree.root()))
            .filter_map(|id| tree.name(id))
            .any(|name| names.is_revision(name))
    }
}

const STORY_RELATIONSHIPS: [&str; 4] = [
    relationships::HEADER,
    relationships::FOOTER,
    relationships::FOOTNOTES,
    relationships::ENDNOTES,
];

impl RevisionDetector for MarkupRevisionDetector {
    fn has_tracked_revisions(&self, package: &Package, names: &Names) -> Result<bool> {
        let main = package.main_document_part()?;
        let mut parts = vec![main.clone()];
        for rel_type in STORY_RELATIONSHIPS {
            parts.extend(package.related_parts(&main, rel_type)?);
        }

        for part in &parts {
            if self.tree_has_revisions(&package.part_xml(part)?, names) {
                tracing::debug!(part = part.as_str(), "found tracked revisions");
                return Ok(true);
            }
        }
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::names::{PACKAGE_RELATIONSHIPS, W};

    fn package(main: &str, header: Option<&str>) -> Package {
        let mut package = Package::default();
        package.set_part("word/document.xml", main.as_bytes().to_vec());
        if let Some(header) = header {
            package.set_part("word/header1.xml", header.as_bytes().to_vec());
            package.set_part(
                "word/_rels/document.xml.rels",
                format!(
                    r#"<Relationships xmlns="{PACKAGE_RELATIONSHIPS}"><Relationship Id="rId7" Type="{}" Target="header1.xml"/></Relationships>"#,
                    relationships::HEADER
                )
                .into_bytes(),
            );
        }
        package
    }

    fn clean() -> String {
        format!(r#"<w:document xmlns:w="{W}"><w:body><w:p><w:r><w:t>a</w:t></w:r></w:p></w:body></w:document>"#)
    }

    #[test]
    fn test_clean_document() {
        let detector = MarkupRevisionDetector::new();
        let names = Names::new();
        assert!(!detector.has_tracked_revisions(&package(&clean(), None), &names).unwrap());
    }

    #[test]
    fn test_insertion_in_main_part() {
        let main = format!(
            r#"<w:document xmlns:w="{W}"><w:body><w:p><w:ins w:id="1" w:author="a"><w:r><w:t>new</w:t></w:r></w:ins></w:p></w:body></w:document>"#
        );
        let detector = MarkupRevisionDetector::new();
        let names = Names::new();
        assert!(detector.has_tracked_revisions(&package(&main, None), &names).unwrap());
    }

    #[test]
    fn test_formatting_change_in_header() {
        let header = format!(
            r#"<w:hdr xmlns:w="{W}"><w:p><w:r><w:rPr><w:b/><w:rPrChange w:id="2" w:author="a"><w:rPr/></w:rPrChange></w:rPr></w:r></w:p></w:hdr>"#
        );
        let detector = MarkupRevisionDetector::new();
        let names = Names::new();
        assert!(
            detector
                .has_tracked_revisions(&package(&clean(), Some(&header)), &names)
                .unwrap()
        );
    }
}
