use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::core::InvoiceError;

/// Deepest element nesting accepted. Invoice documents stay far below it.
pub(crate) const MAX_DEPTH: usize = 256;

/// An owned XML element with namespace prefixes stripped from its name.
///
/// Readers match on local names only, so `cbc:ID`, `ID` and `x:ID` are the
/// same element. Attribute keys keep their prefix so namespace
/// declarations stay visible.
///
/// Text of a leaf element is kept exactly as written. Elements with
/// children only keep their trimmed text, so indentation between child
/// elements never shows up as content.
#[derive(Debug, Default)]
pub(crate) struct Element {
    pub prefix: Option<String>,
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a complete document and return its root element.
    pub fn parse(input: &[u8]) -> Result<Self, InvoiceError> {
        let mut reader = Reader::from_reader(input);

        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let position = reader.buffer_position() as u64;
            let event = reader
                .read_event_into(&mut buf)
                .map_err(|e| InvoiceError::parse(position, e.to_string()))?;
            match event {
                Event::Start(e) => {
                    if root.is_some() {
                        return Err(InvoiceError::parse(position, "content after root element"));
                    }
                    if stack.len() >= MAX_DEPTH {
                        return Err(InvoiceError::parse(
                            position,
                            format!("elements nested deeper than {MAX_DEPTH} levels"),
                        ));
                    }
                    stack.push(Self::open(&e, position)?);
                }
                Event::Empty(e) => {
                    let element = Self::open(&e, position)?;
                    Self::attach(&mut stack, &mut root, element, position)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| InvoiceError::parse(position, "unbalanced end tag"))?;
                    Self::attach(&mut stack, &mut root, element, position)?;
                }
                Event::Text(t) => {
                    let text = t
                        .unescape()
                        .map_err(|e| InvoiceError::parse(position, e.to_string()))?;
                    match stack.last_mut() {
                        Some(current) => current.text.push_str(&text),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(InvoiceError::parse(position, "text outside root element"));
                        }
                    }
                }
                Event::CData(c) => {
                    let bytes = c.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|e| InvoiceError::parse(position, e.to_string()))?;
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(text);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        let end = reader.buffer_position() as u64;
        if !stack.is_empty() {
            return Err(InvoiceError::parse(end, "unexpected end of document"));
        }
        root.ok_or_else(|| InvoiceError::parse(end, "document has no root element"))
    }

    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, InvoiceError> {
        let qname = std::str::from_utf8(start.name().as_ref())
            .map_err(|e| InvoiceError::parse(position, e.to_string()))?
            .to_string();
        let (prefix, name) = match qname.split_once(':') {
            Some((p, n)) => (Some(p.to_string()), n.to_string()),
            None => (None, qname),
        };

        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| InvoiceError::parse(position, e.to_string()))?;
            let key = std::str::from_utf8(attr.key.as_ref())
                .map_err(|e| InvoiceError::parse(position, e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| InvoiceError::parse(position, e.to_string()))?
                .into_owned();
            attrs.push((key, value));
        }

        Ok(Self {
            prefix,
            name,
            attrs,
            ..Self::default()
        })
    }

    fn attach(
        stack: &mut [Element],
        root: &mut Option<Element>,
        mut element: Element,
        position: u64,
    ) -> Result<(), InvoiceError> {
        if !element.children.is_empty() {
            element.text = element.text.trim().to_string();
        }
        match stack.last_mut() {
            Some(parent) => parent.children.push(element),
            None if root.is_none() => *root = Some(element),
            None => return Err(InvoiceError::parse(position, "multiple root elements")),
        }
        Ok(())
    }

    /// Namespace URI bound to this element's prefix, looked up on the
    /// element itself.
    pub fn namespace(&self) -> Option<&str> {
        let key = match &self.prefix {
            Some(p) => format!("xmlns:{p}"),
            None => "xmlns".to_string(),
        };
        self.attrs
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attribute by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k.rsplit(':').next() == Some(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant along a path of local names.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Text of the first descendant along `path`.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path).map(|e| e.text.as_str())
    }
}
