//! Filling a template from bookmark data.
//!
//! [`Generator`] drives a whole run: template checks, a working copy on
//! disk, the text pass over every matched bookmark, and the HTML chunk pass.
//!
//! # Example
//!
//! ```no_run
//! use docx_bookmarks::{FillOptions, Generator};
//!
//! let data = r#"<data><bookmark name="Title">Hello</bookmark></data>"#;
//! let generator = Generator::with_options(FillOptions::default().with_html_prefix("<html"));
//! let outcome = generator.fill("template.docx", data, "/tmp/work.docx")?;
//! std::fs::write("out.docx", &outcome.bytes)?;
//! # Ok::<(), docx_bookmarks::Error>(())
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::alt_chunk::{self, HtmlQueue};
use crate::bookmark::{self, DocumentChecks};
use crate::error::{Error, Result};
use crate::package::Package;
use crate::revisions::{MarkupRevisionDetector, RevisionDetector};
use crate::substitution::SubstitutionMap;
use crate::xml::Names;

/// Settings for a fill run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FillOptions {
    /// Values starting with this are embedded as HTML.
    pub html_prefix: String,
    /// Relationship ids of HTML chunks are this followed by a number.
    pub chunk_id_prefix: String,
}

impl Default for FillOptions {
    fn default() -> Self {
        Self {
            html_prefix: "<html>".to_string(),
            chunk_id_prefix: "AltChunkId".to_string(),
        }
    }
}

impl FillOptions {
    pub fn with_html_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.html_prefix = prefix.into();
        self
    }

    pub fn with_chunk_id_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.chunk_id_prefix = prefix.into();
        self
    }
}

/// Result of a successful fill.
#[derive(Debug, Clone)]
pub struct FillOutcome {
    /// The finished `.docx`.
    pub bytes: Vec<u8>,
    /// Bookmarks whose content was replaced.
    pub substituted: usize,
    /// HTML values embedded as chunks.
    pub html_chunks: usize,
}

/// Working copy of the template that is removed when dropped.
struct TempCopy {
    path: PathBuf,
}

impl TempCopy {
    fn create(template: &Path, path: &Path) -> Result<Self> {
        if path.exists() {
            if std::fs::canonicalize(path)? == std::fs::canonicalize(template)? {
                return Err(Error::WorkingCopyIsTemplate(path.to_path_buf()));
            }
            std::fs::remove_file(path)?;
        }
        std::fs::copy(template, path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }
}

impl Drop for TempCopy {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            debug!(path = %self.path.display(), error = %e, "could not remove working copy");
        }
    }
}

/// Fills bookmark templates.
#[derive(Debug, Clone)]
pub struct Generator<D: RevisionDetector = MarkupRevisionDetector> {
    names: Names,
    options: FillOptions,
    detector: D,
}

impl Default for Generator {
    fn default() -> Self {
        Self::new()
    }
}

impl Generator {
    pub fn new() -> Self {
        Self::with_options(FillOptions::default())
    }

    pub fn with_options(options: FillOptions) -> Self {
        Self {
            names: Names::new(),
            options,
            detector: MarkupRevisionDetector::new(),
        }
    }
}

impl<D: RevisionDetector> Generator<D> {
    /// Swap the tracked-revision detector.
    pub fn with_detector<E: RevisionDetector>(self, detector: E) -> Generator<E> {
        Generator {
            names: self.names,
            options: self.options,
            detector,
        }
    }

    /// Bookmark names of a template, in document order.
    ///
    /// Fails on templates with tracked revisions or without any bookmark.
    pub fn template_bookmarks(&self, package: &Package) -> Result<Vec<String>> {
        if self.detector.has_tracked_revisions(package, &self.names)? {
            return Err(Error::TrackedRevisionsPresent);
        }
        let tree = package.part_xml(&package.main_document_part()?)?;
        let names = bookmark::bookmark_names(&tree, &self.names);
        if names.is_empty() {
            return Err(Error::NoBookmarks);
        }
        Ok(names)
    }

    /// Fill `template` with the values in `bookmark_xml`, working in a copy
    /// at `temp_path`. The copy is deleted before returning.
    pub fn fill(
        &self,
        template: impl AsRef<Path>,
        bookmark_xml: &str,
        temp_path: impl AsRef<Path>,
    ) -> Result<FillOutcome> {
        let template = template.as_ref();
        let template_names = self.template_bookmarks(&Package::open(template)?)?;
        let map = SubstitutionMap::build(&template_names, bookmark_xml)?;
        info!(
            template = %template.display(),
            bookmarks = template_names.len(),
            matched = map.len(),
            "filling template"
        );

        let copy = TempCopy::create(template, temp_path.as_ref())?;
        let (substituted, queue) = self.text_pass(&copy.path, &map)?;

        let html_chunks = if queue.is_empty() {
            0
        } else {
            let mut package = Package::open(&copy.path)?;
            let embedded = alt_chunk::embed_html_chunks(
                &mut package,
                &self.names,
                &queue,
                &self.options.chunk_id_prefix,
            )?;
            package.save(&copy.path)?;
            embedded
        };

        let bytes = std::fs::read(&copy.path)?;
        info!(substituted, html_chunks, size = bytes.len(), "template filled");
        Ok(FillOutcome {
            bytes,
            substituted,
            html_chunks,
        })
    }

    /// Like [`Generator::fill`], returning only the document bytes.
    pub fn generate(
        &self,
        template: impl AsRef<Path>,
        bookmark_xml: &str,
        temp_path: impl AsRef<Path>,
    ) -> Result<Vec<u8>> {
        self.fill(template, bookmark_xml, temp_path)
            .map(|outcome| outcome.bytes)
    }

    /// Substitute every value as text, committing the main part after each.
    fn text_pass(&self, path: &Path, map: &SubstitutionMap) -> Result<(usize, HtmlQueue)> {
        let mut package = Package::open(path)?;
        let main = package.main_document_part()?;
        let checks = DocumentChecks {
            tracked_revisions: self.detector.has_tracked_revisions(&package, &self.names)?,
        };

        let mut queue = HtmlQueue::new();
        let mut substituted = 0;
        for (name, value) in map.iter() {
            if value.starts_with(self.options.html_prefix.as_str()) {
                queue.push(value);
            }
            let tree = package.part_xml(&main)?;
            let tree = bookmark::replace_bookmark_text(&tree, &self.names, &checks, name, value)?;
            package.put_part_xml(&main, &tree)?;
            substituted += 1;
        }

        package.save(path)?;
        Ok((substituted, queue))
    }
}

/// Fill `template` with the values in `bookmark_xml` using default options.
pub fn generate_document(
    template: impl AsRef<Path>,
    bookmark_xml: &str,
    temp_path: impl AsRef<Path>,
) -> Result<Vec<u8>> {
    Generator::new().generate(template, bookmark_xml, temp_path)
}
