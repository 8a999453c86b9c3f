//! End-to-end tests for template filling.
//!
//! Templates are built on the fly into a temporary directory so every test
//! states exactly which markup it starts from.

use std::io::Write;
use std::path::{Path, PathBuf};

use docx_bookmarks::package::{content_types, relationships};
use docx_bookmarks::{Error, Generator, Package, XmlTree, generate_document};
use tempfile::TempDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

struct Fixture {
    dir: TempDir,
}

impl Fixture {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a template whose body is `body`.
    fn template(&self, body: &str) -> PathBuf {
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n<w:document xmlns:w=\"{W}\" xmlns:r=\"{R}\">\n  <w:body>\n    {body}\n    <w:sectPr/>\n  </w:body>\n</w:document>"
        );
        let path = self.path("template.docx");
        let file = std::fs::File::create(&path).unwrap();
        let mut zip = ZipWriter::new(file);
        let options = SimpleFileOptions::default();
        for (name, data) in [
            ("[Content_Types].xml", CONTENT_TYPES),
            ("_rels/.rels", PACKAGE_RELS),
            ("word/document.xml", document.as_str()),
        ] {
            zip.start_file(name, options).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
        path
    }
}

fn main_part(bytes: &[u8]) -> (Package, XmlTree) {
    let package = Package::from_bytes(bytes).unwrap();
    let tree = package.part_xml("word/document.xml").unwrap();
    (package, tree)
}

fn count_local(tree: &XmlTree, local: &str) -> usize {
    tree.descendants(tree.root())
        .filter(|&id| tree.name(id).is_some_and(|n| n.local == local))
        .count()
}

fn assert_gone(path: &Path) {
    assert!(!path.exists(), "{} should have been removed", path.display());
}

#[test]
fn test_text_substitution_keeps_paragraph_count() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="Title"/><w:r><w:rPr><w:b/></w:rPr><w:t>Title</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>
    <w:p><w:r><w:t>Body</w:t></w:r></w:p>"#,
    );
    let temp = fixture.path("work.docx");

    let bytes = generate_document(
        &template,
        r#"<data><bookmark name="Title">Hello</bookmark><bookmark name="Missing">x</bookmark></data>"#,
        &temp,
    )
    .unwrap();

    let (_, tree) = main_part(&bytes);
    assert_eq!(tree.text_content(tree.root()), "HelloBody");
    assert_eq!(count_local(&tree, "p"), 2);
    assert_eq!(count_local(&tree, "b"), 1, "run formatting is carried over");
    assert_gone(&temp);
}

#[test]
fn test_two_paragraph_bookmark_becomes_one_paragraph() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="1" w:name="Span"/><w:r><w:t>first</w:t></w:r></w:p>
    <w:p><w:r><w:t>second</w:t></w:r><w:bookmarkEnd w:id="1"/></w:p>"#,
    );
    let bytes = generate_document(
        &template,
        r#"<data><bookmark name="Span">X</bookmark></data>"#,
        fixture.path("work.docx"),
    )
    .unwrap();

    let (_, tree) = main_part(&bytes);
    assert_eq!(tree.text_content(tree.root()), "X");
    assert_eq!(count_local(&tree, "p"), 1);
    assert_eq!(count_local(&tree, "bookmarkStart"), 1);
    assert_eq!(count_local(&tree, "bookmarkEnd"), 1);
}

#[test]
fn test_html_value_becomes_alt_chunk() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:r><w:t>Before</w:t></w:r></w:p>
    <w:p><w:bookmarkStart w:id="0" w:name="Notes"/><w:r><w:t>notes</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
    );
    let html = "<html><body><p><b>Urgent</b></p></body></html>";
    let data = format!(r#"<data><bookmark name="Notes"><![CDATA[{html}]]></bookmark></data>"#);

    let outcome = Generator::new()
        .fill(&template, &data, fixture.path("work.docx"))
        .unwrap();
    assert_eq!(outcome.substituted, 1);
    assert_eq!(outcome.html_chunks, 1);

    let (package, tree) = main_part(&outcome.bytes);
    assert_eq!(count_local(&tree, "altChunk"), 1);
    assert_eq!(count_local(&tree, "p"), 1);
    assert!(!tree.text_content(tree.root()).contains("<html>"));

    let out = tree.to_xml_string(tree.root()).unwrap();
    assert!(out.contains(r#"<w:altChunk r:id="AltChunkId1"/>"#), "{out}");

    assert_eq!(package.part("word/afchunk1.xhtml"), Some(html.as_bytes()));
    let rels = package.relationships("word/document.xml").unwrap();
    let rel = rels.iter().find(|r| r.id == "AltChunkId1").unwrap();
    assert!(rel.is(relationships::AF_CHUNK));
    assert_eq!(rel.target, "afchunk1.xhtml");

    let types = package.part_xml(content_types::PART_NAME).unwrap();
    assert_eq!(
        content_types::content_type_of(&types, "word/afchunk1.xhtml").as_deref(),
        Some("application/xhtml+xml")
    );
}

#[test]
fn test_tracked_revisions_fail_before_any_output() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="Title"/><w:ins w:id="9" w:author="me"><w:r><w:t>new</w:t></w:r></w:ins><w:bookmarkEnd w:id="0"/></w:p>"#,
    );
    let temp = fixture.path("work.docx");

    let err = generate_document(&template, r#"<d><bookmark name="Title">x</bookmark></d>"#, &temp)
        .unwrap_err();
    assert!(matches!(err, Error::TrackedRevisionsPresent));
    assert_gone(&temp);
}

#[test]
fn test_failure_mid_pass_removes_working_copy() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="Ok"/><w:r><w:t>a</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>
    <w:p><w:hyperlink r:id="rId9"><w:bookmarkStart w:id="1" w:name="Link"/><w:r><w:t>b</w:t></w:r><w:bookmarkEnd w:id="1"/></w:hyperlink></w:p>"#,
    );
    let temp = fixture.path("work.docx");

    let err = generate_document(
        &template,
        r#"<d><bookmark name="Ok">fine</bookmark><bookmark name="Link">bad</bookmark></d>"#,
        &temp,
    )
    .unwrap_err();
    assert!(matches!(err, Error::UnsupportedContainer { ref name, .. } if name == "Link"));
    assert_gone(&temp);
}

#[test]
fn test_template_without_bookmarks() {
    let fixture = Fixture::new();
    let template = fixture.template(r#"<w:p><w:r><w:t>plain</w:t></w:r></w:p>"#);
    let err = generate_document(&template, "<d/>", fixture.path("work.docx")).unwrap_err();
    assert!(matches!(err, Error::NoBookmarks));
}

#[test]
fn test_unmatched_names_leave_document_unchanged() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="Title"/><w:r><w:t>Title</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
    );
    let bytes = generate_document(
        &template,
        r#"<d><bookmark name="Other">x</bookmark></d>"#,
        fixture.path("work.docx"),
    )
    .unwrap();

    let (_, before) = main_part(&std::fs::read(&template).unwrap());
    let (_, after) = main_part(&bytes);
    assert_eq!(
        after.to_xml_string(after.root()).unwrap(),
        before.to_xml_string(before.root()).unwrap()
    );
}

#[test]
fn test_stale_working_copy_is_replaced() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="Title"/><w:bookmarkEnd w:id="0"/></w:p>"#,
    );
    let temp = fixture.path("work.docx");
    std::fs::write(&temp, b"not a zip").unwrap();

    let bytes = generate_document(&template, r#"<d><bookmark name="Title">T</bookmark></d>"#, &temp)
        .unwrap();
    let (_, tree) = main_part(&bytes);
    assert_eq!(tree.text_content(tree.root()), "T");
    assert_gone(&temp);
}

#[test]
fn test_template_bookmarks_lists_names_in_order() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="B"/><w:bookmarkEnd w:id="0"/><w:bookmarkStart w:id="1" w:name="A"/><w:bookmarkEnd w:id="1"/></w:p>"#,
    );
    let package = Package::open(&template).unwrap();
    let names = Generator::new().template_bookmarks(&package).unwrap();
    assert_eq!(names, vec!["B", "A"]);
}

#[test]
fn test_working_copy_may_not_be_the_template() {
    let fixture = Fixture::new();
    let template = fixture.template(
        r#"<w:p><w:bookmarkStart w:id="0" w:name="Title"/><w:r><w:t>Title</w:t></w:r><w:bookmarkEnd w:id="0"/></w:p>"#,
    );
    let before = std::fs::read(&template).unwrap();

    let err = generate_document(&template, r#"<d><bookmark name="Title">x</bookmark></d>"#, &template)
        .unwrap_err();
    assert!(matches!(err, Error::WorkingCopyIsTemplate(_)));
    assert_eq!(std::fs::read(&template).unwrap(), before);
}
