//! Value extraction shared by the syntax readers.
//!
//! Every helper names the offending element path in its error, built from
//! the local name of the context element and the relative path.

use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::Format;
use crate::codes::{CodeList, parse_code};
use crate::core::InvoiceError;
use crate::xml::Element;

fn field(el: &Element, path: &[&str]) -> String {
    let mut field = el.name.clone();
    for p in path {
        field.push('/');
        field.push_str(p);
    }
    field
}

pub(crate) fn text(el: &Element, path: &[&str]) -> Option<String> {
    el.text_at(path).map(str::to_string)
}

pub(crate) fn required_text(el: &Element, path: &[&str]) -> Result<String, InvoiceError> {
    text(el, path).ok_or_else(|| InvoiceError::missing(field(el, path)))
}

pub(crate) fn decimal(el: &Element, path: &[&str]) -> Result<Option<Decimal>, InvoiceError> {
    el.text_at(path)
        .map(|t| {
            Decimal::from_str(t.trim())
                .map_err(|e| InvoiceError::invalid(field(el, path), format!("invalid amount '{t}': {e}")))
        })
        .transpose()
}

pub(crate) fn required_decimal(el: &Element, path: &[&str]) -> Result<Decimal, InvoiceError> {
    decimal(el, path)?.ok_or_else(|| InvoiceError::missing(field(el, path)))
}

pub(crate) fn date(
    el: &Element,
    path: &[&str],
    pattern: &str,
) -> Result<Option<NaiveDate>, InvoiceError> {
    el.text_at(path)
        .map(|t| {
            NaiveDate::parse_from_str(t.trim(), pattern)
                .map_err(|e| InvoiceError::invalid(field(el, path), format!("invalid date '{t}': {e}")))
        })
        .transpose()
}

pub(crate) fn code<C: CodeList>(
    el: &Element,
    path: &[&str],
    format: Format,
) -> Result<Option<C>, InvoiceError> {
    el.text_at(path)
        .map(|t| parse_code(t, format, &field(el, path)))
        .transpose()
}

pub(crate) fn required_code<C: CodeList>(
    el: &Element,
    path: &[&str],
    format: Format,
) -> Result<C, InvoiceError> {
    code(el, path, format)?.ok_or_else(|| InvoiceError::missing(field(el, path)))
}

/// Code carried in an attribute of the element at `path`.
pub(crate) fn attr_code<C: CodeList>(
    el: &Element,
    path: &[&str],
    attr: &str,
    format: Format,
) -> Result<Option<C>, InvoiceError> {
    el.find(path)
        .and_then(|e| e.attr(attr))
        .map(|v| parse_code(v, format, &format!("{}/@{attr}", field(el, path))))
        .transpose()
}

pub(crate) fn required_attr_code<C: CodeList>(
    el: &Element,
    path: &[&str],
    attr: &str,
    format: Format,
) -> Result<C, InvoiceError> {
    attr_code(el, path, attr, format)?
        .ok_or_else(|| InvoiceError::missing(format!("{}/@{attr}", field(el, path))))
}

/// Non-empty, trimmed lines of a (possibly block-formatted) text.
pub(crate) fn lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

pub(crate) fn attachment(el: &Element) -> Result<Vec<u8>, InvoiceError> {
    let compact: String = el.text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| InvoiceError::invalid(el.name.clone(), format!("invalid base64 content: {e}")))
}

pub(crate) fn indicator(el: &Element, path: &[&str]) -> Result<Option<bool>, InvoiceError> {
    el.text_at(path)
        .map(|t| match t.trim() {
            "true" | "1" => Ok(true),
            "false" | "0" => Ok(false),
            other => Err(InvoiceError::invalid(
                field(el, path),
                format!("invalid indicator '{other}'"),
            )),
        })
        .transpose()
}
