//! XML primitives shared by the syntax modules: an indenting writer and a
//! small owned element tree for reading.

mod tree;
mod writer;

pub(crate) use tree::Element;
pub(crate) use writer::{XmlWriter, decimal_text};
