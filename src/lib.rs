//! # faktura-codec
//!
//! Reading and writing structured e-invoices: ZUGFeRD / Factur-X and
//! XRechnung in the UN/CEFACT CII syntax, XRechnung and Peppol in the
//! OASIS UBL 2.1 syntax.
//!
//! All monetary values use [`rust_decimal::Decimal`], never floating point.
//! One canonical [`InvoiceDescriptor`] is serialized to any supported
//! (version, profile, format) combination; the profile decides which
//! optional blocks are written.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use faktura_codec::codes::*;
//! use faktura_codec::profile::{Profile, Version};
//! use faktura_codec::syntax::Format;
//! use faktura_codec::*;
//! use rust_decimal_macros::dec;
//!
//! let mut invoice =
//!     InvoiceDescriptor::new("471102", NaiveDate::from_ymd_opt(2024, 6, 15), CurrencyCode::EUR);
//! invoice.set_seller(Party::new("Lieferant GmbH").with_city("München").with_country("DE"));
//! invoice.add_trade_line_item("Trennblätter A4", QuantityCode::Piece, dec!(20), dec!(9.90));
//! invoice.add_applicable_trade_tax(
//!     dec!(198.00),
//!     dec!(19),
//!     TaxType::ValueAddedTax,
//!     TaxCategoryCode::StandardRate,
//!     None,
//! );
//!
//! let xml = write(&invoice, Version::V23, Profile::XRechnung, Format::Ubl).unwrap();
//! let parsed = read(&xml).unwrap();
//! assert_eq!(parsed.invoice_no, "471102");
//! assert_eq!(parsed.trade_line_items[0].line_total, Some(dec!(198.00)));
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `cii` (default) | UN/CEFACT Cross Industry Invoice writer and reader |
//! | `ubl` (default) | OASIS UBL 2.1 writer and reader |
//! | `all` | Everything |

pub mod codes;
pub mod core;
mod dispatch;
pub mod profile;
pub mod syntax;
mod xml;

pub use dispatch::{DocumentInfo, inspect, read, supported_combinations, write};

// Re-export core types at crate root for convenience
pub use crate::core::*;
