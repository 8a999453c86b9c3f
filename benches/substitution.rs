//! Benchmarks for the bookmark substitution passes.
//!
//! Run with: cargo bench

use criterion::{Criterion, criterion_group, criterion_main};

use docx_bookmarks::bookmark::normalize::{flatten, unflatten};
use docx_bookmarks::{DocumentChecks, Names, XmlTree, bookmark_names, replace_bookmark_text};

const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

/// A document of `paragraphs` paragraphs, every tenth one a bookmark, with
/// a small table after every fifty.
fn sample_document(paragraphs: usize) -> String {
    let mut body = String::new();
    for i in 0..paragraphs {
        body.push_str(r#"<w:p><w:pPr><w:spacing w:after="120"/></w:pPr>"#);
        if i % 10 == 0 {
            body.push_str(&format!(r#"<w:bookmarkStart w:id="{i}" w:name="bm{i}"/>"#));
        }
        body.push_str(&format!(
            r#"<w:r><w:rPr><w:b/></w:rPr><w:t xml:space="preserve">Paragraph {i} </w:t></w:r><w:r><w:t>with more text</w:t></w:r>"#
        ));
        if i % 10 == 0 {
            body.push_str(&format!(r#"<w:bookmarkEnd w:id="{i}"/>"#));
        }
        body.push_str("</w:p>");
        if i % 50 == 49 {
            body.push_str(
                r#"<w:tbl><w:tr><w:tc><w:tcPr/><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
            );
        }
    }
    format!(r#"<w:document xmlns:w="{W}"><w:body>{body}<w:sectPr/></w:body></w:document>"#)
}

// ============================================================================
// Tree Benchmarks
// ============================================================================

fn bench_parse(c: &mut Criterion) {
    let xml = sample_document(1000);

    c.bench_function("parse_document", |b| {
        b.iter(|| XmlTree::parse_str(&xml).unwrap());
    });
}

fn bench_serialize(c: &mut Criterion) {
    let tree = XmlTree::parse_str(&sample_document(1000)).unwrap();

    c.bench_function("serialize_document", |b| {
        b.iter(|| tree.to_xml().unwrap());
    });
}

fn bench_flatten_unflatten(c: &mut Criterion) {
    let tree = XmlTree::parse_str(&sample_document(1000)).unwrap();
    let names = Names::new();

    c.bench_function("flatten_unflatten", |b| {
        b.iter(|| unflatten(&flatten(&tree, &names), &names));
    });
}

// ============================================================================
// Substitution Benchmarks
// ============================================================================

fn bench_replace_one(c: &mut Criterion) {
    let tree = XmlTree::parse_str(&sample_document(1000)).unwrap();
    let names = Names::new();
    let checks = DocumentChecks::default();

    c.bench_function("replace_bookmark_text", |b| {
        b.iter(|| replace_bookmark_text(&tree, &names, &checks, "bm500", "Replacement").unwrap());
    });
}

fn bench_replace_all(c: &mut Criterion) {
    let tree = XmlTree::parse_str(&sample_document(200)).unwrap();
    let names = Names::new();
    let checks = DocumentChecks::default();
    let bookmarks = bookmark_names(&tree, &names);

    c.bench_function("replace_all_bookmarks", |b| {
        b.iter(|| {
            bookmarks.iter().fold(tree.clone(), |tree, name| {
                replace_bookmark_text(&tree, &names, &checks, name, "x").unwrap()
            })
        });
    });
}

criterion_group!(
    benches,
    // Tree
    bench_parse,
    bench_serialize,
    bench_flatten_unflatten,
    // Substitution
    bench_replace_one,
    bench_replace_all,
);
criterion_main!(benches);
