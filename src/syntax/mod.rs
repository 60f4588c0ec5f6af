//! XML syntaxes: UN/CEFACT CII (ZUGFeRD / Factur-X) and OASIS UBL 2.1
//! (XRechnung, Peppol).
//!
//! Each syntax module holds a writer that serializes an already restricted
//! [`InvoiceDescriptor`](crate::core::InvoiceDescriptor) and a
//! profile-agnostic reader.

use serde::{Deserialize, Serialize};

#[cfg(feature = "cii")]
pub(crate) mod cii;
#[cfg(any(feature = "cii", feature = "ubl"))]
mod read;
#[cfg(feature = "ubl")]
pub(crate) mod ubl;

/// XML syntax of an e-invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Format {
    /// UN/CEFACT Cross Industry Invoice.
    Cii,
    /// OASIS Universal Business Language 2.1.
    Ubl,
}

impl Format {
    /// Whether support for this syntax is compiled in.
    pub fn is_enabled(self) -> bool {
        match self {
            Format::Cii => cfg!(feature = "cii"),
            Format::Ubl => cfg!(feature = "ubl"),
        }
    }

    /// Detect the syntax from the namespace of a document's root element.
    pub fn from_root_namespace(ns: &str) -> Option<Self> {
        match ns {
            cii_ns::RSM => Some(Format::Cii),
            ubl_ns::INVOICE | ubl_ns::CREDIT_NOTE => Some(Format::Ubl),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Format::Cii => "CII",
            Format::Ubl => "UBL",
        })
    }
}

/// Peppol BIS Billing 3.0 profile identifier (BT-23), written as the UBL
/// `cbc:ProfileID`.
pub const PEPPOL_PROFILE_ID: &str = "urn:fdc:peppol.eu:2017:poacc:billing:01:1.0";

/// UBL 2.1 namespace URIs.
pub mod ubl_ns {
    pub const INVOICE: &str = "urn:oasis:names:specification:ubl:schema:xsd:Invoice-2";
    pub const CREDIT_NOTE: &str = "urn:oasis:names:specification:ubl:schema:xsd:CreditNote-2";
    pub const CAC: &str =
        "urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2";
    pub const CBC: &str = "urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2";
}

/// CII namespace URIs.
pub mod cii_ns {
    pub const RSM: &str = "urn:un:unece:uncefact:data:standard:CrossIndustryInvoice:100";
    pub const RAM: &str =
        "urn:un:unece:uncefact:data:standard:ReusableAggregateBusinessInformationEntity:100";
    pub const QDT: &str = "urn:un:unece:uncefact:data:standard:QualifiedDataType:100";
    pub const UDT: &str = "urn:un:unece:uncefact:data:standard:UnqualifiedDataType:100";
}

/// ZUGFeRD 1.0 root namespace. Recognised only to reject it clearly.
pub(crate) const ZUGFERD1_NS: &str = "urn:ferd:CrossIndustryDocument:invoice:1p0";

/// Write payment-term lines into `name`: inline for one plain line, as an
/// indented block for several lines or any Skonto line, nothing for none.
#[cfg(any(feature = "cii", feature = "ubl"))]
fn write_term_lines(
    w: &mut crate::xml::XmlWriter,
    name: &str,
    lines: &[&str],
) -> Result<(), crate::core::InvoiceError> {
    let skonto = lines
        .iter()
        .any(|l| l.starts_with(crate::core::SKONTO_PREFIX));
    match lines {
        [] => {}
        [line] if !skonto => {
            w.text_element(name, line)?;
        }
        _ => {
            w.block_text_element(name, lines)?;
        }
    }
    Ok(())
}

/// Split a payment-terms text back into one term per line. The due date
/// belongs to the first line; a due date without text becomes a term with
/// an empty description.
#[cfg(any(feature = "cii", feature = "ubl"))]
fn split_payment_terms(
    text: &str,
    due_date: Option<chrono::NaiveDate>,
) -> Vec<crate::core::PaymentTerm> {
    use crate::core::PaymentTerm;

    let lines = read::lines(text);
    if lines.is_empty() {
        return due_date
            .map(|due| PaymentTerm {
                description: String::new(),
                due_date: Some(due),
            })
            .into_iter()
            .collect();
    }
    lines
        .into_iter()
        .enumerate()
        .map(|(i, description)| PaymentTerm {
            description,
            due_date: if i == 0 { due_date } else { None },
        })
        .collect()
}
