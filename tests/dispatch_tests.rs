#![cfg(all(feature = "cii", feature = "ubl"))]

mod common;

use common::create_invoice;
use faktura_codec::codes::*;
use faktura_codec::core::{InvoiceDescriptor, Party};
use faktura_codec::profile::{Block, Profile, ProfileRules, Version, is_allowed};
use faktura_codec::syntax::Format;
use faktura_codec::{InvoiceError, inspect, read, supported_combinations, write};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn written(invoice: &InvoiceDescriptor, profile: Profile, format: Format) -> String {
    String::from_utf8(write(invoice, Version::V23, profile, format).unwrap()).unwrap()
}

/// Cut the first `<tag ...>...</tag>` element out of a document.
fn without_element(xml: &str, tag: &str) -> String {
    let start = xml.find(&format!("<{tag}")).unwrap();
    let close = format!("</{tag}>");
    let end = start + xml[start..].find(&close).unwrap() + close.len();
    format!("{}{}", &xml[..start], &xml[end..])
}

fn assert_missing(xml: &str, element: &str) {
    match read(xml.as_bytes()).unwrap_err() {
        InvoiceError::SchemaViolation(m) => assert!(m.contains(element), "{m}"),
        other => panic!("expected schema violation, got {other}"),
    }
}

#[test]
fn version_one_is_a_configuration_error() {
    let err = write(&create_invoice(), Version::V1, Profile::Comfort, Format::Cii).unwrap_err();
    assert!(matches!(err, InvoiceError::Configuration(_)), "{err}");
}

#[test]
fn ubl_below_basic_is_a_configuration_error() {
    for profile in [Profile::Minimum, Profile::BasicWL] {
        let err = write(&create_invoice(), Version::V23, profile, Format::Ubl).unwrap_err();
        assert!(matches!(err, InvoiceError::Configuration(_)), "{profile:?}");
    }
    let err = write(&create_invoice(), Version::V20, Profile::XRechnung, Format::Ubl).unwrap_err();
    assert!(matches!(err, InvoiceError::Configuration(_)));
}

#[test]
fn supported_combinations_match_the_rule_table() {
    let combos = supported_combinations();
    assert_eq!(combos.len(), 19);
    assert!(!combos.iter().any(|(v, _, _)| *v == Version::V1));
    for (version, profile, format) in combos {
        assert!(ProfileRules::lookup(version, profile, format).is_ok());
        assert!(
            write(&create_invoice(), version, profile, format).is_ok(),
            "{version:?} {profile:?} {format}"
        );
    }
}

#[test]
fn is_allowed_answers_per_profile() {
    assert!(!is_allowed(Version::V23, Profile::Minimum, Block::LineItems).unwrap());
    assert!(is_allowed(Version::V23, Profile::Extended, Block::Invoicee).unwrap());
    assert!(is_allowed(Version::V1, Profile::Extended, Block::Invoicee).is_err());
}

#[test]
fn malformed_xml_is_a_parse_error() {
    for input in [
        &b"<rsm:CrossIndustryInvoice><rsm:ExchangedDocument>"[..],
        b"not xml at all",
        b"",
        b"<a></b>",
    ] {
        let err = read(input).unwrap_err();
        assert!(matches!(err, InvoiceError::Parse { .. }), "{err}");
    }
}

#[test]
fn unknown_namespace_is_a_parse_error() {
    let err = read(br#"<Invoice xmlns="urn:example:not-an-invoice"><ID>1</ID></Invoice>"#)
        .unwrap_err();
    assert!(matches!(err, InvoiceError::Parse { .. }));
    assert!(err.to_string().contains("urn:example:not-an-invoice"));
}

#[test]
fn zugferd_1_is_rejected() {
    let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<rsm:CrossIndustryDocument xmlns:rsm="urn:ferd:CrossIndustryDocument:invoice:1p0">
  <rsm:HeaderExchangedDocument><ram:ID>1</ram:ID></rsm:HeaderExchangedDocument>
</rsm:CrossIndustryDocument>"#;
    let err = read(xml).unwrap_err();
    assert!(matches!(err, InvoiceError::Parse { .. }));
    assert!(inspect(xml).is_err());
}

#[test]
fn unknown_code_is_a_validation_error_naming_the_field() {
    let xml = String::from_utf8(
        write(&create_invoice(), Version::V23, Profile::Comfort, Format::Cii).unwrap(),
    )
    .unwrap();
    let broken = xml.replace(
        "<ram:InvoiceCurrencyCode>EUR</ram:InvoiceCurrencyCode>",
        "<ram:InvoiceCurrencyCode>XYZ</ram:InvoiceCurrencyCode>",
    );
    match read(broken.as_bytes()).unwrap_err() {
        InvoiceError::Validation(v) => {
            assert_eq!(v.field, "ApplicableHeaderTradeSettlement/InvoiceCurrencyCode");
            assert!(v.message.contains("XYZ"));
        }
        other => panic!("expected validation error, got {other}"),
    }
}

#[test]
fn unknown_ubl_tax_scheme_is_a_validation_error() {
    let xml = String::from_utf8(
        write(&create_invoice(), Version::V23, Profile::XRechnung, Format::Ubl).unwrap(),
    )
    .unwrap();
    let broken = xml.replacen("<cbc:ID>VAT</cbc:ID>", "<cbc:ID>XXX</cbc:ID>", 1);
    let err = read(broken.as_bytes()).unwrap_err();
    assert!(matches!(err, InvoiceError::Validation(ref v) if v.field.ends_with("TaxScheme/ID")));
}

#[test]
fn missing_seller_is_a_schema_violation() {
    let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
    xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:ID>1</cbc:ID>
  <cbc:InvoiceTypeCode>380</cbc:InvoiceTypeCode>
  <cbc:DocumentCurrencyCode>EUR</cbc:DocumentCurrencyCode>
</Invoice>"#;
    let err = read(xml).unwrap_err();
    assert!(matches!(err, InvoiceError::SchemaViolation(ref m) if m.contains("AccountingSupplierParty")));
}

#[test]
fn missing_document_id_is_a_schema_violation() {
    let xml = String::from_utf8(
        write(&create_invoice(), Version::V23, Profile::Comfort, Format::Cii).unwrap(),
    )
    .unwrap();
    let broken = xml.replacen("<ram:ID>471102</ram:ID>", "", 1);
    let err = read(broken.as_bytes()).unwrap_err();
    assert!(matches!(err, InvoiceError::SchemaViolation(ref m) if m.contains("ExchangedDocument/ID")));
}

#[test]
fn inspect_detects_format_version_and_profile() {
    let desc = create_invoice();
    for (version, profile, format) in supported_combinations() {
        let xml = write(&desc, version, profile, format).unwrap();
        let info = inspect(&xml).unwrap();
        assert_eq!(info.format, format);
        assert_eq!(info.guideline_id.as_deref(), profile.urn(version));
        assert_eq!(info.profile, Some(profile), "{version:?} {profile:?} {format}");
    }
}

#[test]
fn inspect_keeps_unknown_guideline_ids() {
    let xml = String::from_utf8(
        write(&create_invoice(), Version::V23, Profile::Comfort, Format::Ubl).unwrap(),
    )
    .unwrap()
    .replace("urn:cen.eu:en16931:2017<", "urn:example:custom<");
    let info = inspect(xml.as_bytes()).unwrap();
    assert_eq!(info.format, Format::Ubl);
    assert_eq!(info.guideline_id.as_deref(), Some("urn:example:custom"));
    assert_eq!(info.profile, None);
    assert_eq!(info.version, None);
}

#[test]
fn descriptor_serializes_to_json() {
    let desc = create_invoice();
    let json = serde_json::to_string(&desc).unwrap();
    assert!(json.contains("\"invoice_no\":\"471102\""));
    let back: faktura_codec::InvoiceDescriptor = serde_json::from_str(&json).unwrap();
    assert_eq!(back, desc);
}

#[test]
fn deeply_nested_input_is_a_parse_error() {
    let depth = 200_000;
    let mut xml = String::from(r#"<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2">"#);
    xml.push_str(&"<a>".repeat(depth));
    xml.push_str(&"</a>".repeat(depth));
    xml.push_str("</Invoice>");

    let err = read(xml.as_bytes()).unwrap_err();
    assert!(matches!(err, InvoiceError::Parse { .. }), "{err}");
    assert!(matches!(inspect(xml.as_bytes()), Err(InvoiceError::Parse { .. })));
}

#[test]
fn tax_amount_overflow_is_a_validation_error() {
    let mut desc = InvoiceDescriptor::new("OVF-1", None, CurrencyCode::EUR);
    desc.set_seller(Party::new("Lieferant GmbH"));
    desc.add_applicable_trade_tax(
        Decimal::MAX,
        dec!(19),
        TaxType::ValueAddedTax,
        TaxCategoryCode::StandardRate,
        None,
    );
    for format in [Format::Cii, Format::Ubl] {
        let err = write(&desc, Version::V23, Profile::Comfort, format).unwrap_err();
        assert!(matches!(err, InvoiceError::Validation(ref v) if v.field == "TaxAmount"), "{err}");
    }
}

#[test]
fn large_line_read_then_written_is_a_validation_error() {
    let xml = br#"<?xml version="1.0" encoding="UTF-8"?>
<Invoice xmlns="urn:oasis:names:specification:ubl:schema:xsd:Invoice-2"
    xmlns:cac="urn:oasis:names:specification:ubl:schema:xsd:CommonAggregateComponents-2"
    xmlns:cbc="urn:oasis:names:specification:ubl:schema:xsd:CommonBasicComponents-2">
  <cbc:ID>BIG-1</cbc:ID>
  <cbc:InvoiceTypeCode>380</cbc:InvoiceTypeCode>
  <cbc:DocumentCurrencyCode>EUR</cbc:DocumentCurrencyCode>
  <cac:AccountingSupplierParty>
    <cac:Party>
      <cac:PartyLegalEntity><cbc:RegistrationName>Lieferant GmbH</cbc:RegistrationName></cac:PartyLegalEntity>
    </cac:Party>
  </cac:AccountingSupplierParty>
  <cac:InvoiceLine>
    <cbc:ID>1</cbc:ID>
    <cbc:InvoicedQuantity unitCode="C62">10000000000000000000</cbc:InvoicedQuantity>
    <cac:Item>
      <cbc:Name>Posten</cbc:Name>
      <cac:ClassifiedTaxCategory>
        <cbc:ID>S</cbc:ID>
        <cbc:Percent>19</cbc:Percent>
        <cac:TaxScheme><cbc:ID>VAT</cbc:ID></cac:TaxScheme>
      </cac:ClassifiedTaxCategory>
    </cac:Item>
    <cac:Price><cbc:PriceAmount currencyID="EUR">10000000000000000000</cbc:PriceAmount></cac:Price>
  </cac:InvoiceLine>
</Invoice>"#;

    let invoice = read(xml).unwrap();
    assert_eq!(invoice.trade_line_items[0].line_total, None);
    for format in [Format::Cii, Format::Ubl] {
        let err = write(&invoice, Version::V23, Profile::Comfort, format).unwrap_err();
        assert!(
            matches!(err, InvoiceError::Validation(ref v) if v.field == "LineTotalAmount"),
            "{err}"
        );
    }
}

#[test]
fn missing_line_quantity_is_a_schema_violation() {
    let xml = written(&create_invoice(), Profile::Comfort, Format::Cii);
    assert_missing(&without_element(&xml, "ram:SpecifiedLineTradeDelivery"), "BilledQuantity");
    assert_missing(&without_element(&xml, "ram:LineID"), "LineID");
    assert_missing(&without_element(&xml, "ram:NetPriceProductTradePrice"), "NetPriceProductTradePrice");

    let xml = written(&create_invoice(), Profile::Comfort, Format::Ubl);
    assert_missing(&without_element(&xml, "cbc:InvoicedQuantity"), "InvoicedQuantity");
    assert_missing(&without_element(&xml, "cbc:PriceAmount"), "Price/PriceAmount");
}

#[test]
fn missing_referenced_document_id_is_a_schema_violation() {
    let mut desc = create_invoice();
    desc.add_additional_referenced_document(
        "ATT-1",
        AdditionalReferencedDocumentTypeCode::ReferenceDocument,
        Some("Anlage".into()),
        None,
        None,
    );

    let xml = written(&desc, Profile::Comfort, Format::Cii)
        .replacen("<ram:IssuerAssignedID>ATT-1</ram:IssuerAssignedID>", "", 1);
    assert_missing(&xml, "AdditionalReferencedDocument/IssuerAssignedID");

    let xml = written(&desc, Profile::Comfort, Format::Ubl).replacen("<cbc:ID>ATT-1</cbc:ID>", "", 1);
    assert_missing(&xml, "AdditionalDocumentReference/ID");
}

#[test]
fn mandatory_totals_are_written_when_unset() {
    let mut desc = InvoiceDescriptor::new("T-1", None, CurrencyCode::EUR);
    desc.set_seller(Party::new("Lieferant GmbH"));
    desc.add_trade_line_item("Beratung", QuantityCode::Hour, dec!(2), dec!(50));
    desc.add_applicable_trade_tax(
        dec!(100),
        dec!(19),
        TaxType::ValueAddedTax,
        TaxCategoryCode::StandardRate,
        None,
    );

    let ubl = written(&desc, Profile::XRechnung, Format::Ubl);
    assert!(ubl.contains(r#"<cbc:TaxAmount currencyID="EUR">19.00</cbc:TaxAmount>"#), "{ubl}");
    assert!(ubl.contains(r#"<cbc:LineExtensionAmount currencyID="EUR">100.00</cbc:LineExtensionAmount>"#));
    assert!(ubl.contains(r#"<cbc:TaxExclusiveAmount currencyID="EUR">100.00</cbc:TaxExclusiveAmount>"#));
    assert!(ubl.contains(r#"<cbc:TaxInclusiveAmount currencyID="EUR">119.00</cbc:TaxInclusiveAmount>"#));
    assert!(ubl.contains(r#"<cbc:PayableAmount currencyID="EUR">119.00</cbc:PayableAmount>"#));

    let cii = written(&desc, Profile::XRechnung, Format::Cii);
    assert!(cii.contains("<ram:TaxBasisTotalAmount>100.00</ram:TaxBasisTotalAmount>"), "{cii}");
    assert!(cii.contains(r#"<ram:TaxTotalAmount currencyID="EUR">19.00</ram:TaxTotalAmount>"#));
    assert!(cii.contains("<ram:GrandTotalAmount>119.00</ram:GrandTotalAmount>"));
    assert!(cii.contains("<ram:DuePayableAmount>119.00</ram:DuePayableAmount>"));

    let loaded = read(ubl.as_bytes()).unwrap();
    assert_eq!(loaded.totals.due_payable, Some(dec!(119)));
}

#[test]
fn invoice_without_taxes_still_carries_a_tax_total() {
    let mut desc = InvoiceDescriptor::new("T-2", None, CurrencyCode::EUR);
    desc.set_seller(Party::new("Lieferant GmbH"));
    let ubl = written(&desc, Profile::Comfort, Format::Ubl);
    assert!(ubl.contains(r#"<cbc:TaxAmount currencyID="EUR">0.00</cbc:TaxAmount>"#), "{ubl}");
    assert!(ubl.contains(r#"<cbc:PayableAmount currencyID="EUR">0.00</cbc:PayableAmount>"#));
}
