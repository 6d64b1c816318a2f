//! Loading and writing whole XML documents

use crate::error::{Error, Result};
use crate::xml::node::{Element, Node};
use quick_xml::events::{BytesEnd, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, BufReader, Read, Write};
use tracing::debug;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

/// An XML document: prolog, one root element and epilog
///
/// Writing an untouched document reproduces its input byte for byte,
/// including a leading byte order mark and whitespace inside end tags. The
/// one exception is a `<!DOCTYPE>` declaration, which is written back with
/// an upper case keyword followed by a single space.
#[derive(Debug, Clone)]
pub struct Document {
    bom: bool,
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl Document {
    /// Read a document from a byte stream
    pub fn load<R: Read>(input: R) -> Result<Self> {
        let mut input = BufReader::new(input);
        let bom = input.fill_buf()?.starts_with(UTF8_BOM);
        if bom {
            input.consume(UTF8_BOM.len());
        }

        let mut reader = Reader::from_reader(input);
        reader.config_mut().check_end_names = false;
        reader.config_mut().trim_markup_names_in_closing_tags = false;
        let mut buf = Vec::new();
        let mut builder = TreeBuilder::default();

        loop {
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| Error::malformed("XML document", e))?;
            match event {
                Event::Start(start) => builder.open.push(Element::open(start.into_owned())),
                Event::Empty(start) => {
                    builder.attach(Node::Element(Element::self_closing(start.into_owned())))?
                }
                Event::End(end) => {
                    let raw = end.name();
                    let raw = raw.as_ref();
                    let len = raw
                        .iter()
                        .rposition(|b| !b.is_ascii_whitespace())
                        .map_or(0, |last| last + 1);
                    let name = raw[..len].to_vec();
                    let mut element = builder
                        .open
                        .pop()
                        .filter(|open| open.start.name().as_ref() == name.as_slice())
                        .ok_or_else(|| {
                            Error::malformed(
                                "XML document",
                                format!("unexpected </{}>", String::from_utf8_lossy(&name)),
                            )
                        })?;
                    element.end = Some(end.into_owned());
                    builder.attach(Node::Element(element))?;
                }
                Event::Text(text) => builder.attach(Node::Text(text.into_owned()))?,
                Event::Eof => break,
                other => builder.attach(Node::Markup(other.into_owned()))?,
            }
            buf.clear();
        }

        let mut document = builder.finish()?;
        document.bom = bom;
        Ok(document)
    }

    pub fn from_str(xml: &str) -> Result<Self> {
        Self::load(xml.as_bytes())
    }

    /// Serialize the document, returning the number of bytes written
    pub fn write<W: Write>(&self, output: W) -> Result<usize> {
        let mut counter = CountingWriter::new(output);
        if self.bom {
            counter.write_all(UTF8_BOM)?;
        }
        {
            let mut writer = Writer::new(&mut counter);
            for node in &self.prolog {
                write_node(&mut writer, node)?;
            }
            write_element(&mut writer, &self.root)?;
            for node in &self.epilog {
                write_node(&mut writer, node)?;
            }
        }
        counter.flush()?;
        debug!("written {} bytes of XML", counter.count);
        Ok(counter.count)
    }

    pub fn to_string(&self) -> Result<String> {
        let mut out = Vec::new();
        self.write(&mut out)?;
        String::from_utf8(out).map_err(|e| Error::malformed("XML output", e))
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Take the root element, dropping prolog and epilog
    pub fn into_root(self) -> Element {
        self.root
    }
}

#[derive(Default)]
struct TreeBuilder {
    open: Vec<Element>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
}

impl TreeBuilder {
    fn attach(&mut self, node: Node) -> Result<()> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }
        match (node, self.root.is_some()) {
            (Node::Element(element), false) => self.root = Some(element),
            (Node::Element(element), true) => {
                return Err(Error::malformed(
                    "XML document",
                    format!("second root element <{}>", element.name()),
                ));
            }
            (other, false) => self.prolog.push(other),
            (other, true) => self.epilog.push(other),
        }
        Ok(())
    }

    fn finish(self) -> Result<Document> {
        if let Some(unclosed) = self.open.last() {
            return Err(Error::malformed(
                "XML document",
                format!("unclosed element <{}>", unclosed.name()),
            ));
        }
        let root = self
            .root
            .ok_or_else(|| Error::malformed("XML document", "no root element"))?;
        Ok(Document {
            bom: false,
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

fn write_node<W: Write>(writer: &mut Writer<W>, node: &Node) -> Result<()> {
    match node {
        Node::Element(element) => write_element(writer, element),
        Node::Text(text) => emit(writer, Event::Text(text.clone())),
        Node::Markup(event) => emit(writer, event.clone()),
    }
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    if element.self_closing && element.children.is_empty() {
        return emit(writer, Event::Empty(element.start.clone()));
    }
    emit(writer, Event::Start(element.start.clone()))?;
    for child in &element.children {
        write_node(writer, child)?;
    }
    let end = element
        .end
        .clone()
        .unwrap_or_else(|| BytesEnd::new(element.name()));
    emit(writer, Event::End(end))
}

fn emit<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|e| Error::Io(std::io::Error::new(std::io::ErrorKind::Other, e.to_string())))
}

/// Byte sink wrapper tracking how much was written
struct CountingWriter<W> {
    inner: W,
    count: usize,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, count: 0 }
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let written = self.inner.write(buf)?;
        self.count += written;
        Ok(written)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}
