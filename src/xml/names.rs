//! Qualified-name table for the WordprocessingML vocabulary.
//!
//! [`Names`] is built once per generation run and handed to every pass by
//! reference. Passes never compare element names directly; they ask
//! [`Names::kind`] for a [`Kind`] and `match` on it.

use std::collections::{HashMap, HashSet};

use super::QName;

/// WordprocessingML main namespace.
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Office Math Markup Language namespace.
pub const M: &str = "http://schemas.openxmlformats.org/officeDocument/2006/math";
/// Officedocument relationships namespace (used for `r:id`).
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Package relationships part namespace.
pub const PACKAGE_RELATIONSHIPS: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships";
/// `[Content_Types].xml` namespace.
pub const CONTENT_TYPES: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// The implicit `xml:` namespace.
pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
/// Namespace of `xmlns` declarations.
pub const XMLNS: &str = "http://www.w3.org/2000/xmlns/";
/// Namespace of placeholder nodes. Never written to a part.
pub const PLACEHOLDER: &str = "urn:docx-bookmarks:placeholder";

/// A static (namespace, local-name) pair with the prefix conventionally
/// bound to the namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XName {
    pub ns: &'static str,
    pub prefix: &'static str,
    pub local: &'static str,
}

impl XName {
    pub const fn new(ns: &'static str, prefix: &'static str, local: &'static str) -> Self {
        Self { ns, prefix, local }
    }

    const fn w(local: &'static str) -> Self {
        Self::new(W, "w", local)
    }
}

/// Element kinds the substitution passes dispatch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Text or comment node (not an element).
    CharData,
    Body,
    Paragraph,
    ParagraphProps,
    Run,
    RunProps,
    /// `w:t`
    Text,
    Table,
    TableCell,
    TableCellProps,
    TextBoxContent,
    /// `w:sdt` content control.
    StructuredTag,
    BookmarkStart,
    BookmarkEnd,
    Hyperlink,
    SimpleField,
    SmartTag,
    AltChunk,
    /// Any element in the math namespace.
    Math,
    Placeholder,
    /// Everything else.
    Generic,
}

/// The element and attribute names the crate inspects or creates.
#[derive(Debug, Clone)]
pub struct Names {
    pub body: XName,
    pub p: XName,
    pub p_pr: XName,
    pub r: XName,
    pub r_pr: XName,
    pub t: XName,
    pub tbl: XName,
    pub tc: XName,
    pub tc_pr: XName,
    pub txbx_content: XName,
    pub sdt: XName,
    pub bookmark_start: XName,
    pub bookmark_end: XName,
    pub hyperlink: XName,
    pub fld_simple: XName,
    pub smart_tag: XName,
    pub alt_chunk: XName,
    pub placeholder: XName,

    /// `w:id`
    pub id: XName,
    /// `w:name`
    pub name: XName,
    /// `r:id`
    pub r_id: XName,
    /// `xml:space`
    pub space: XName,

    wordml: HashMap<&'static str, Kind>,
    revisions: HashSet<&'static str>,
}

/// Elements that only appear in documents carrying tracked changes.
const REVISION_ELEMENTS: &[&str] = &[
    "ins",
    "del",
    "moveFrom",
    "moveTo",
    "moveFromRangeStart",
    "moveFromRangeEnd",
    "moveToRangeStart",
    "moveToRangeEnd",
    "pPrChange",
    "rPrChange",
    "sectPrChange",
    "tblPrChange",
    "tblPrExChange",
    "tblGridChange",
    "tcPrChange",
    "trPrChange",
    "numberingChange",
    "cellIns",
    "cellDel",
    "cellMerge",
    "customXmlInsRangeStart",
    "customXmlInsRangeEnd",
    "customXmlDelRangeStart",
    "customXmlDelRangeEnd",
    "customXmlMoveFromRangeStart",
    "customXmlMoveFromRangeEnd",
    "customXmlMoveToRangeStart",
    "customXmlMoveToRangeEnd",
];

impl Default for Names {
    fn default() -> Self {
        Self::new()
    }
}

impl Names {
    pub fn new() -> Self {
        let mut names = Self {
            body: XName::w("body"),
            p: XName::w("p"),
            p_pr: XName::w("pPr"),
            r: XName::w("r"),
            r_pr: XName::w("rPr"),
            t: XName::w("t"),
            tbl: XName::w("tbl"),
            tc: XName::w("tc"),
            tc_pr: XName::w("tcPr"),
            txbx_content: XName::w("txbxContent"),
            sdt: XName::w("sdt"),
            bookmark_start: XName::w("bookmarkStart"),
            bookmark_end: XName::w("bookmarkEnd"),
            hyperlink: XName::w("hyperlink"),
            fld_simple: XName::w("fldSimple"),
            smart_tag: XName::w("smartTag"),
            alt_chunk: XName::w("altChunk"),
            placeholder: XName::new(PLACEHOLDER, "bm", "Placeholder"),
            id: XName::w("id"),
            name: XName::w("name"),
            r_id: XName::new(R, "r", "id"),
            space: XName::new(XML, "xml", "space"),
            wordml: HashMap::new(),
            revisions: REVISION_ELEMENTS.iter().copied().collect(),
        };

        let table = [
            (names.body, Kind::Body),
            (names.p, Kind::Paragraph),
            (names.p_pr, Kind::ParagraphProps),
            (names.r, Kind::Run),
            (names.r_pr, Kind::RunProps),
            (names.t, Kind::Text),
            (names.tbl, Kind::Table),
            (names.tc, Kind::TableCell),
            (names.tc_pr, Kind::TableCellProps),
            (names.txbx_content, Kind::TextBoxContent),
            (names.sdt, Kind::StructuredTag),
            (names.bookmark_start, Kind::BookmarkStart),
            (names.bookmark_end, Kind::BookmarkEnd),
            (names.hyperlink, Kind::Hyperlink),
            (names.fld_simple, Kind::SimpleField),
            (names.smart_tag, Kind::SmartTag),
            (names.alt_chunk, Kind::AltChunk),
        ];
        names.wordml = table.iter().map(|(name, kind)| (name.local, *kind)).collect();
        names
    }

    /// Classify an element name.
    pub fn kind(&self, name: &QName) -> Kind {
        match name.ns.as_deref() {
            Some(W) => self
                .wordml
                .get(name.local.as_str())
                .copied()
                .unwrap_or(Kind::Generic),
            Some(M) => Kind::Math,
            Some(PLACEHOLDER) if name.local == self.placeholder.local => Kind::Placeholder,
            _ => Kind::Generic,
        }
    }

    /// Check whether an element is tracked-change markup.
    pub fn is_revision(&self, name: &QName) -> bool {
        name.ns.as_deref() == Some(W) && self.revisions.contains(name.local.as_str())
    }
}
