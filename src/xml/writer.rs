use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use rust_decimal::Decimal;
use std::io::Cursor;

use crate::core::InvoiceError;

const INDENT: usize = 2;

fn xml_io(e: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::Xml(e.to_string())
}

/// Indenting XML writer over an in-memory buffer.
///
/// Tracks the element depth so that multi-line text blocks can be laid
/// out relative to the indentation of their enclosing element.
pub(crate) struct XmlWriter {
    writer: Writer<Cursor<Vec<u8>>>,
    depth: usize,
}

impl XmlWriter {
    pub fn new() -> Result<Self, InvoiceError> {
        let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', INDENT);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_io)?;
        Ok(Self { writer, depth: 0 })
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }

    pub fn start_element(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.start_element_with_attrs(name, &[])
    }

    pub fn start_element_with_attrs(
        &mut self,
        name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        let mut elem = BytesStart::new(name);
        for (k, v) in attrs {
            elem.push_attribute((*k, *v));
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(xml_io)?;
        self.depth += 1;
        Ok(self)
    }

    pub fn end_element(&mut self, name: &str) -> Result<&mut Self, InvoiceError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(xml_io)?;
        self.depth = self.depth.saturating_sub(1);
        Ok(self)
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, text, &[])
    }

    pub fn text_element_with_attrs(
        &mut self,
        name: &str,
        text: &str,
        attrs: &[(&str, &str)],
    ) -> Result<&mut Self, InvoiceError> {
        self.start_element_with_attrs(name, attrs)?;
        self.text(text)?;
        self.end_element(name)
    }

    /// Write `name` only when `text` is present.
    pub fn opt_text_element(
        &mut self,
        name: &str,
        text: Option<&str>,
    ) -> Result<&mut Self, InvoiceError> {
        if let Some(text) = text {
            self.text_element(name, text)?;
        }
        Ok(self)
    }

    /// Write a multi-line text element:
    ///
    /// ```text
    /// <cbc:Note>
    ///   first line
    ///   second line
    /// </cbc:Note>
    /// ```
    ///
    /// Opening and closing tag share the element's indentation, every line
    /// is indented one level deeper.
    pub fn block_text_element(
        &mut self,
        name: &str,
        lines: &[&str],
    ) -> Result<&mut Self, InvoiceError> {
        let pad = " ".repeat(self.depth * INDENT);
        let inner = " ".repeat((self.depth + 1) * INDENT);
        let mut text = String::new();
        for line in lines {
            text.push('\n');
            text.push_str(&inner);
            text.push_str(line);
        }
        text.push('\n');
        text.push_str(&pad);

        self.start_element(name)?;
        self.text(&text)?;
        self.end_element(name)
    }

    /// Write a decimal amount with currencyID attribute.
    pub fn amount_element(
        &mut self,
        name: &str,
        amount: Decimal,
        currency: &str,
    ) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, &decimal_text(amount), &[("currencyID", currency)])
    }

    /// Write a quantity with unitCode attribute.
    pub fn quantity_element(
        &mut self,
        name: &str,
        qty: Decimal,
        unit: &str,
    ) -> Result<&mut Self, InvoiceError> {
        self.text_element_with_attrs(name, &decimal_text(qty), &[("unitCode", unit)])
    }

    fn text(&mut self, text: &str) -> Result<(), InvoiceError> {
        self.writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(xml_io)?;
        Ok(())
    }
}

/// Lexical form of an amount, quantity or percentage: trailing zeros are
/// dropped, but never below two fraction digits.
pub(crate) fn decimal_text(d: Decimal) -> String {
    let mut v = d.normalize();
    if v.scale() < 2 {
        v.rescale(2);
    }
    v.to_string()
}
