//! Canonical invoice model, construction API and error types.
//!
//! Every syntax writer and reader maps to and from [`InvoiceDescriptor`].
//! Field documentation names the EN 16931 business terms (BT-xx / BG-xx).

mod builder;
mod error;
mod types;

pub use error::*;
pub use types::*;
