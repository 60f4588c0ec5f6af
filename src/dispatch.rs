//! Entry points: pick the syntax writer or reader for a document.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{InvoiceDescriptor, InvoiceError};
use crate::profile::{Profile, ProfileRules, Version};
use crate::syntax::{Format, ZUGFERD1_NS};
use crate::xml::Element;

/// Serialize `invoice` as (version, profile, format).
///
/// The invoice is first restricted to what the profile permits, so blocks
/// the profile forbids are silently left out. Unsupported combinations fail
/// with [`InvoiceError::Configuration`] before any output is produced;
/// derived amounts outside the decimal range fail with
/// [`InvoiceError::Validation`].
pub fn write(
    invoice: &InvoiceDescriptor,
    version: Version,
    profile: Profile,
    format: Format,
) -> Result<Vec<u8>, InvoiceError> {
    let rules = ProfileRules::lookup(version, profile, format)?;
    let restricted = rules.restrict(invoice, format)?;

    let bytes = match format {
        #[cfg(feature = "cii")]
        Format::Cii => crate::syntax::cii::write(&restricted, rules)?,
        #[cfg(feature = "ubl")]
        Format::Ubl => crate::syntax::ubl::write(&restricted, rules)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(InvoiceError::Configuration(format!(
                "{other} support is not compiled in"
            )));
        }
    };

    debug!(
        invoice_no = %invoice.invoice_no,
        ?version,
        ?profile,
        %format,
        bytes = bytes.len(),
        "invoice written"
    );
    Ok(bytes)
}

/// Parse a CII or UBL document into an [`InvoiceDescriptor`].
///
/// The syntax is detected from the root element's namespace. Profile
/// restrictions are not enforced while reading.
pub fn read(input: &[u8]) -> Result<InvoiceDescriptor, InvoiceError> {
    let root = Element::parse(input)?;
    let format = detect(&root)?;

    let invoice = match format {
        #[cfg(feature = "cii")]
        Format::Cii => crate::syntax::cii::read(&root)?,
        #[cfg(feature = "ubl")]
        Format::Ubl => crate::syntax::ubl::read(&root)?,
        #[allow(unreachable_patterns)]
        other => {
            return Err(InvoiceError::parse(0, format!("{other} support is not compiled in")));
        }
    };

    debug!(
        invoice_no = %invoice.invoice_no,
        %format,
        lines = invoice.trade_line_items.len(),
        "invoice read"
    );
    Ok(invoice)
}

/// What [`inspect`] found out about a document without reading it fully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    pub format: Format,
    /// Guideline identifier (BT-24) as found in the document.
    pub guideline_id: Option<String>,
    /// Version and profile, when the guideline identifier is a known one.
    pub version: Option<Version>,
    pub profile: Option<Profile>,
}

/// Detect syntax, version and profile of a document.
pub fn inspect(input: &[u8]) -> Result<DocumentInfo, InvoiceError> {
    let root = Element::parse(input)?;
    let format = detect(&root)?;

    let guideline_id = match format {
        #[cfg(feature = "cii")]
        Format::Cii => crate::syntax::cii::guideline_id(&root),
        #[cfg(feature = "ubl")]
        Format::Ubl => crate::syntax::ubl::guideline_id(&root),
        #[allow(unreachable_patterns)]
        _ => None,
    };
    let detected = guideline_id
        .as_deref()
        .map(str::trim)
        .and_then(Profile::from_urn);

    Ok(DocumentInfo {
        format,
        version: detected.map(|(v, _)| v),
        profile: detected.map(|(_, p)| p),
        guideline_id,
    })
}

/// Every (version, profile, format) triple [`write`] accepts.
pub fn supported_combinations() -> Vec<(Version, Profile, Format)> {
    crate::profile::supported()
}

fn detect(root: &Element) -> Result<Format, InvoiceError> {
    let ns = root.namespace().unwrap_or_default();
    if ns == ZUGFERD1_NS {
        return Err(InvoiceError::parse(
            0,
            "ZUGFeRD 1.0 documents are not supported",
        ));
    }
    let format = Format::from_root_namespace(ns).ok_or_else(|| {
        InvoiceError::parse(
            0,
            format!("unknown root element {} in namespace '{ns}'", root.name),
        )
    })?;
    if !format.is_enabled() {
        return Err(InvoiceError::parse(
            0,
            format!("{format} support is not compiled in"),
        ));
    }
    Ok(format)
}

impl InvoiceDescriptor {
    /// Serialize this invoice. See [`write`].
    pub fn save(
        &self,
        version: Version,
        profile: Profile,
        format: Format,
    ) -> Result<Vec<u8>, InvoiceError> {
        write(self, version, profile, format)
    }

    /// Parse a document. See [`read`].
    pub fn load(input: &[u8]) -> Result<InvoiceDescriptor, InvoiceError> {
        read(input)
    }
}
