//! OPC package access: the zip container of a `.docx`.
//!
//! Every entry is read into memory on open and written back in the original
//! order on save. Parts are addressed by their zip entry name, without the
//! leading slash used inside relationship and content-type markup.
//!
//! # Example
//!
//! ```no_run
//! use docx_bookmarks::Package;
//!
//! let mut package = Package::open("template.docx")?;
//! let main = package.main_document_part()?;
//! let tree = package.part_xml(&main)?;
//! package.put_part_xml(&main, &tree)?;
//! package.save("copy.docx")?;
//! # Ok::<(), docx_bookmarks::Error>(())
//! ```

pub mod content_types;
pub mod relationships;

use std::io::{Cursor, Read, Seek, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::xml::XmlTree;

pub use relationships::Relationship;

/// Fallback location of the main document part.
const DEFAULT_MAIN_PART: &str = "word/document.xml";
const XHTML_CONTENT_TYPE: &str = "application/xhtml+xml";

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    data: Vec<u8>,
}

/// An in-memory `.docx` package.
#[derive(Debug, Clone, Default)]
pub struct Package {
    entries: Vec<Entry>,
}

impl Package {
    /// Read a package from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    /// Read a package from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }

    /// Read a package from any [`Read`] + [`Seek`] source.
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let mut data = Vec::with_capacity(file.size() as usize);
            file.read_to_end(&mut data)?;
            entries.push(Entry {
                name: file.name().to_string(),
                data,
            });
        }
        Ok(Self { entries })
    }

    /// Names of all parts, in archive order.
    pub fn part_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    fn find(&self, name: &str) -> Option<usize> {
        let name = name.trim_start_matches('/');
        self.entries
            .iter()
            .position(|e| e.name == name)
            .or_else(|| {
                // Part names are case-insensitive in OPC.
                self.entries
                    .iter()
                    .position(|e| e.name.eq_ignore_ascii_case(name))
            })
    }

    pub fn has_part(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    /// Raw bytes of a part.
    pub fn part(&self, name: &str) -> Option<&[u8]> {
        self.find(name).map(|i| self.entries[i].data.as_slice())
    }

    /// Replace a part's bytes, or append a new part.
    pub fn set_part(&mut self, name: &str, data: Vec<u8>) {
        match self.find(name) {
            Some(i) => self.entries[i].data = data,
            None => self.entries.push(Entry {
                name: name.trim_start_matches('/').to_string(),
                data,
            }),
        }
    }

    /// Parse a part as XML.
    pub fn part_xml(&self, name: &str) -> Result<XmlTree> {
        let data = self
            .part(name)
            .ok_or_else(|| Error::MissingPart(name.to_string()))?;
        XmlTree::parse(data)
    }

    /// Serialize `tree` into a part.
    pub fn put_part_xml(&mut self, name: &str, tree: &XmlTree) -> Result<()> {
        let data = tree.to_xml()?;
        self.set_part(name, data);
        Ok(())
    }

    /// Name of the main document part.
    pub fn main_document_part(&self) -> Result<String> {
        let from_rels = self
            .relationships("")?
            .iter()
            .find(|rel| rel.is(relationships::OFFICE_DOCUMENT))
            .and_then(|rel| rel.target_part(""))
            .filter(|part| self.has_part(part));
        match from_rels {
            Some(part) => Ok(part),
            None if self.has_part(DEFAULT_MAIN_PART) => Ok(DEFAULT_MAIN_PART.to_string()),
            None => Err(Error::MissingPart(DEFAULT_MAIN_PART.to_string())),
        }
    }

    /// Relationships whose source is `source` (`""` for the package).
    pub fn relationships(&self, source: &str) -> Result<Vec<Relationship>> {
        let rels_part = relationships::rels_part_name(source);
        if !self.has_part(&rels_part) {
            return Ok(Vec::new());
        }
        Ok(relationships::parse(&self.part_xml(&rels_part)?))
    }

    /// Parts that `source` refers to with relationship type `rel_type`.
    pub fn related_parts(&self, source: &str, rel_type: &str) -> Result<Vec<String>> {
        Ok(self
            .relationships(source)?
            .iter()
            .filter(|rel| rel.is(rel_type))
            .filter_map(|rel| rel.target_part(source))
            .filter(|part| self.has_part(part))
            .collect())
    }

    /// Add a relationship from `source`; the id must not be in use yet.
    pub fn add_relationship(&mut self, source: &str, rel: &Relationship) -> Result<()> {
        let rels_part = relationships::rels_part_name(source);
        let mut tree = if self.has_part(&rels_part) {
            self.part_xml(&rels_part)?
        } else {
            relationships::empty()?
        };
        if relationships::parse(&tree).iter().any(|r| r.id == rel.id) {
            return Err(Error::DuplicateRelationship(rel.id.clone()));
        }
        relationships::append(&mut tree, rel);
        self.put_part_xml(&rels_part, &tree)
    }

    /// Add an XHTML alternative-format import part next to `source`, related
    /// to it under relationship id `id`. Returns the new part's name.
    pub fn add_alternative_format_part(
        &mut self,
        source: &str,
        id: &str,
        content: &[u8],
    ) -> Result<String> {
        if self.relationships(source)?.iter().any(|r| r.id == id) {
            return Err(Error::DuplicateRelationship(id.to_string()));
        }

        let dir = source.rsplit_once('/').map_or("", |(dir, _)| dir);
        let part = (1..)
            .map(|n| match dir {
                "" => format!("afchunk{n}.xhtml"),
                dir => format!("{dir}/afchunk{n}.xhtml"),
            })
            .find(|name| !self.has_part(name))
            .unwrap_or_default();

        let mut types = self.part_xml(content_types::PART_NAME)?;
        content_types::set_override(&mut types, &part, XHTML_CONTENT_TYPE);
        self.put_part_xml(content_types::PART_NAME, &types)?;

        self.set_part(&part, content.to_vec());
        self.add_relationship(
            source,
            &Relationship {
                id: id.to_string(),
                rel_type: relationships::AF_CHUNK.to_string(),
                target: relationships::relative_target(source, &part),
                external: false,
            },
        )?;
        Ok(part)
    }

    /// Write the package to disk.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(file)
    }

    /// Serialize the package to bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut cursor = Cursor::new(Vec::new());
        self.write_to(&mut cursor)?;
        Ok(cursor.into_inner())
    }

    /// Write the package to any [`Write`] + [`Seek`] destination.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.data)?;
        }
        zip.finish()?;
        Ok(())
    }
}
