//! [`XmlTree`] to bytes through quick-xml's `Writer`.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::{NodeData, NodeId, XmlTree};
use crate::error::Result;

pub(super) fn write_tree(tree: &XmlTree) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    write_node(&mut writer, tree, tree.root())?;
    Ok(writer.into_inner())
}

pub(super) fn write_fragment(tree: &XmlTree, id: NodeId) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    write_node(&mut writer, tree, id)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node<W: Write>(writer: &mut Writer<W>, tree: &XmlTree, id: NodeId) -> Result<()> {
    match &tree.node(id).data {
        NodeData::Element { name, attrs } => {
            let qualified = name.qualified();
            let mut start = BytesStart::new(&*qualified);
            for attr in attrs {
                start.push_attribute((&*attr.name.qualified(), attr.value.as_str()));
            }

            let children = tree.children(id);
            if children.is_empty() {
                writer.write_event(Event::Empty(start))?;
                return Ok(());
            }

            writer.write_event(Event::Start(start))?;
            for &child in children {
                write_node(writer, tree, child)?;
            }
            writer.write_event(Event::End(BytesEnd::new(&*qualified)))?;
        }
        NodeData::Text(text) => {
            writer.write_event(Event::Text(BytesText::new(text)))?;
        }
        NodeData::Comment(comment) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
        }
    }
    Ok(())
}
