//! quick-xml event stream to [`XmlTree`].

use encoding_rs::Encoding;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::names::{XML, XMLNS};
use super::{Attribute, NodeData, NodeId, QName, XmlTree};
use crate::error::{Error, Result};

/// Decode part bytes. UTF-8 is the norm; UTF-16 parts carry a BOM.
pub(super) fn parse_bytes(bytes: &[u8]) -> Result<XmlTree> {
    match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => {
            let (content, malformed) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
            if malformed {
                return Err(Error::MalformedXml(format!(
                    "invalid {} byte sequence",
                    encoding.name()
                )));
            }
            parse_str(&content)
        }
        None => parse_str(utf8(bytes)?),
    }
}

pub(super) fn parse_str(content: &str) -> Result<XmlTree> {
    let mut reader = Reader::from_str(content);

    let mut tree = XmlTree::new();
    let mut root: Option<NodeId> = None;
    let mut open: Vec<NodeId> = Vec::new();
    let mut scopes = Scopes::default();

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                let id = open_element(&mut tree, &mut scopes, &e)?;
                attach(&mut tree, &open, &mut root, id)?;
                open.push(id);
            }
            Event::Empty(e) => {
                let id = open_element(&mut tree, &mut scopes, &e)?;
                attach(&mut tree, &open, &mut root, id)?;
                scopes.pop();
            }
            Event::End(_) => {
                let id = open
                    .pop()
                    .ok_or_else(|| Error::MalformedXml("unbalanced end tag".to_string()))?;
                scopes.pop();
                drop_formatting_whitespace(&mut tree, id);
            }
            Event::Text(e) => push_text(&mut tree, &open, utf8(e.as_ref())?),
            Event::CData(e) => push_text(&mut tree, &open, utf8(e.as_ref())?),
            Event::GeneralRef(e) => {
                let entity = utf8(e.as_ref())?;
                let resolved = resolve_entity(entity)
                    .ok_or_else(|| Error::MalformedXml(format!("unknown entity &{entity};")))?;
                push_text(&mut tree, &open, &resolved);
            }
            Event::Comment(e) => {
                if let Some(&parent) = open.last() {
                    let comment = tree.alloc_comment(utf8(e.as_ref())?);
                    tree.append_child(parent, comment);
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !open.is_empty() {
        return Err(Error::MalformedXml("unclosed element".to_string()));
    }
    let root = root.ok_or_else(|| Error::MalformedXml("no root element".to_string()))?;
    tree.set_root(root);
    Ok(tree)
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| Error::MalformedXml(e.to_string()))
}

fn open_element(tree: &mut XmlTree, scopes: &mut Scopes, e: &BytesStart<'_>) -> Result<NodeId> {
    let mut raw_attrs = Vec::new();
    let mut declarations = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| Error::MalformedXml(err.to_string()))?;
        let key = utf8(attr.key.as_ref())?.to_string();
        let value = quick_xml::escape::unescape(utf8(&attr.value)?)
            .map_err(|err| Error::MalformedXml(err.to_string()))?
            .into_owned();
        if key == "xmlns" {
            declarations.push((String::new(), value.clone()));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            declarations.push((prefix.to_string(), value.clone()));
        }
        raw_attrs.push((key, value));
    }
    scopes.push(declarations);

    let raw_name = e.name();
    let (prefix, local) = split_name(utf8(raw_name.as_ref())?);
    let name = QName::new(scopes.resolve(prefix.unwrap_or("")), prefix, local);

    let attrs = raw_attrs
        .into_iter()
        .map(|(key, value)| {
            let (prefix, local) = split_name(&key);
            let ns = match prefix {
                None if local == "xmlns" => Some(XMLNS),
                Some("xmlns") => Some(XMLNS),
                Some(p) => scopes.resolve(p),
                // Unprefixed attributes are in no namespace.
                None => None,
            };
            Attribute::new(QName::new(ns, prefix, local), value)
        })
        .collect();

    Ok(tree.alloc_element(name, attrs))
}

fn attach(tree: &mut XmlTree, open: &[NodeId], root: &mut Option<NodeId>, id: NodeId) -> Result<()> {
    match open.last() {
        Some(&parent) => tree.append_child(parent, id),
        None if root.is_none() => *root = Some(id),
        None => return Err(Error::MalformedXml("multiple root elements".to_string())),
    }
    Ok(())
}

/// Append text to the open element, merging with a preceding text node.
fn push_text(tree: &mut XmlTree, open: &[NodeId], text: &str) {
    let Some(&parent) = open.last() else {
        return;
    };
    let last = tree.children(parent).last().copied();
    if let Some(last) = last
        && let NodeData::Text(existing) = &mut tree.nodes[last.index()].data
    {
        existing.push_str(text);
        return;
    }
    let id = tree.alloc_text(text);
    tree.append_child(parent, id);
}

/// Whitespace-only text between element children is indentation, not content.
fn drop_formatting_whitespace(tree: &mut XmlTree, id: NodeId) {
    let children = tree.children(id);
    if !children.iter().any(|&c| tree.name(c).is_some()) {
        return;
    }
    let kept: Vec<NodeId> = children
        .iter()
        .copied()
        .filter(|&c| tree.text(c).is_none_or(|t| !t.trim().is_empty()))
        .collect();
    if kept.len() != tree.children(id).len() {
        tree.set_children(id, kept);
    }
}

fn split_name(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

/// Resolve XML entity references.
fn resolve_entity(entity: &str) -> Option<String> {
    match entity {
        "apos" => return Some("'".to_string()),
        "quot" => return Some("\"".to_string()),
        "lt" => return Some("<".to_string()),
        "gt" => return Some(">".to_string()),
        "amp" => return Some("&".to_string()),
        _ => {}
    }

    let code = if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        entity.strip_prefix('#')?.parse::<u32>().ok()?
    };
    char::from_u32(code).map(|c| c.to_string())
}

/// Stack of in-scope namespace declarations.
#[derive(Default)]
struct Scopes {
    frames: Vec<Vec<(String, String)>>,
}

impl Scopes {
    fn push(&mut self, declarations: Vec<(String, String)>) {
        self.frames.push(declarations);
    }

    fn pop(&mut self) {
        self.frames.pop();
    }

    /// Namespace bound to `prefix`; the empty prefix is the default namespace.
    fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML);
        }
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter())
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::names::W;

    #[test]
    fn test_resolves_prefixes_and_default_namespace() {
        let tree = XmlTree::parse_str(
            r#"<root xmlns="urn:a" xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:p w:rsidR="00A1" plain="1"/><child/></root>"#,
        )
        .unwrap();
        let root = tree.root();
        assert_eq!(tree.name(root).unwrap().ns.as_deref(), Some("urn:a"));

        let p = tree.children(root)[0];
        let p_name = tree.name(p).unwrap();
        assert_eq!(p_name.ns.as_deref(), Some(W));
        assert_eq!(p_name.prefix.as_deref(), Some("w"));

        let attrs = tree.attrs(p);
        assert_eq!(attrs[0].name.ns.as_deref(), Some(W));
        assert_eq!(attrs[1].name.ns, None);

        let child = tree.children(root)[1];
        assert_eq!(tree.name(child).unwrap().ns.as_deref(), Some("urn:a"));
    }

    #[test]
    fn test_inner_declaration_shadows_outer() {
        let tree = XmlTree::parse_str(r#"<a:x xmlns:a="urn:1"><a:y xmlns:a="urn:2"/><a:z/></a:x>"#)
            .unwrap();
        let root = tree.root();
        let y = tree.children(root)[0];
        let z = tree.children(root)[1];
        assert_eq!(tree.name(y).unwrap().ns.as_deref(), Some("urn:2"));
        assert_eq!(tree.name(z).unwrap().ns.as_deref(), Some("urn:1"));
    }

    #[test]
    fn test_entities_merge_into_one_text_node() {
        let tree = XmlTree::parse_str("<t>a &amp; b &lt;c&gt; &#65;&#x42;</t>").unwrap();
        let root = tree.root();
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.text_content(root), "a & b <c> AB");
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let tree = XmlTree::parse_str(r#"<a name="x &amp; &quot;y&quot;"/>"#).unwrap();
        assert_eq!(tree.plain_attr(tree.root(), "name"), Some("x & \"y\""));
    }

    #[test]
    fn test_formatting_whitespace_is_dropped() {
        let tree = XmlTree::parse_str("<a>\n  <b> kept </b>\n  <c/>\n</a>").unwrap();
        let root = tree.root();
        assert_eq!(tree.children(root).len(), 2);
        let b = tree.children(root)[0];
        assert_eq!(tree.text_content(b), " kept ");
    }

    #[test]
    fn test_cdata_becomes_text() {
        let tree = XmlTree::parse_str("<a><![CDATA[<html>x</html>]]></a>").unwrap();
        assert_eq!(tree.text_content(tree.root()), "<html>x</html>");
    }

    #[test]
    fn test_utf16_part_is_decoded() {
        let xml = "<a>é</a>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        let tree = XmlTree::parse(&bytes).unwrap();
        assert_eq!(tree.text_content(tree.root()), "é");
    }

    #[test]
    fn test_rejects_unclosed_and_empty_documents() {
        assert!(XmlTree::parse_str("<a><b></b>").is_err());
        assert!(XmlTree::parse_str("").is_err());
    }
}
