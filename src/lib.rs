//! # docx-bookmarks
//!
//! Fill bookmark placeholders in WordprocessingML (`.docx`) templates.
//!
//! ## Features
//!
//! - Replace the content of a named bookmark with text, keeping the
//!   formatting of the first replaced run
//! - Bookmarks may span several paragraphs; the document stays valid
//! - Values that start with `<html>` are embedded as XHTML chunks
//! - Unsafe targets (tracked changes, content controls, fields, hyperlinks,
//!   math) are rejected instead of producing a broken document
//!
//! ## Quick Start
//!
//! ```no_run
//! use docx_bookmarks::generate_document;
//!
//! let data = r#"<data>
//!     <bookmark name="Customer">ACME Corp.</bookmark>
//!     <bookmark name="Notes"><![CDATA[<html><p><b>Urgent</b></p></html>]]></bookmark>
//! </data>"#;
//! let bytes = generate_document("template.docx", data, "/tmp/work.docx")?;
//! std::fs::write("letter.docx", bytes)?;
//! # Ok::<(), docx_bookmarks::Error>(())
//! ```
//!
//! ## Working with Trees
//!
//! The substitution itself is a pure function over an [`XmlTree`]:
//!
//! ```
//! use docx_bookmarks::{DocumentChecks, Names, XmlTree, replace_bookmark_text};
//!
//! let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:bookmarkStart w:id="0" w:name="Title"/><w:r><w:t>Title</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p></w:body></w:document>"#;
//! let tree = XmlTree::parse_str(xml)?;
//! let names = Names::new();
//! let filled = replace_bookmark_text(&tree, &names, &DocumentChecks::default(), "Title", "Hello")?;
//! assert_eq!(filled.text_content(filled.root()), "Hello");
//! # Ok::<(), docx_bookmarks::Error>(())
//! ```

pub mod alt_chunk;
pub mod bookmark;
pub mod error;
pub mod generate;
pub mod package;
pub mod revisions;
pub mod substitution;
pub mod xml;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use alt_chunk::{HtmlQueue, embed_html_chunks};
pub use bookmark::{DocumentChecks, bookmark_names, bookmark_text, replace_bookmark_text};
pub use error::{Container, Error, Result};
pub use generate::{FillOptions, FillOutcome, Generator, generate_document};
pub use package::Package;
pub use revisions::{MarkupRevisionDetector, RevisionDetector};
pub use substitution::{SubstitutionMap, parse_bookmark_data};
pub use xml::{Names, XmlTree};
