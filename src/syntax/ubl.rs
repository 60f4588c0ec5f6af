//! OASIS UBL 2.1 Invoice (XRechnung, Peppol BIS Billing 3.0).
//!
//! The writer always produces an `Invoice` root; the reader also accepts
//! `CreditNote` documents, with or without namespace prefixes.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rust_decimal::Decimal;

use super::read;
use super::{Format, PEPPOL_PROFILE_ID, ubl_ns};
use crate::codes::{AdditionalReferencedDocumentTypeCode, CurrencyCode, TaxType, render_code};
use crate::core::*;
use crate::profile::ProfileRules;
use crate::xml::{Element, XmlWriter, decimal_text};

const UBL: Format = Format::Ubl;
const DATE: &str = "%Y-%m-%d";

/// Serialize an invoice that has already been restricted to `rules`.
pub(crate) fn write(
    invoice: &InvoiceDescriptor,
    rules: &ProfileRules,
) -> Result<Vec<u8>, InvoiceError> {
    let urn = rules.profile.urn(rules.version).ok_or_else(|| {
        InvoiceError::Configuration(format!("no guideline identifier for {:?}", rules.version))
    })?;
    let currency = invoice.currency.code();
    let mut w = XmlWriter::new()?;

    w.start_element_with_attrs(
        "ubl:Invoice",
        &[
            ("xmlns:ubl", ubl_ns::INVOICE),
            ("xmlns:cac", ubl_ns::CAC),
            ("xmlns:cbc", ubl_ns::CBC),
        ],
    )?;

    // BT-24: CustomizationID
    w.text_element("cbc:CustomizationID", urn)?;
    // BT-23: ProfileID
    w.text_element("cbc:ProfileID", PEPPOL_PROFILE_ID)?;
    // BT-1: Invoice number
    w.text_element("cbc:ID", &invoice.invoice_no)?;
    // BT-2: Issue date
    if let Some(date) = &invoice.invoice_date {
        w.text_element("cbc:IssueDate", &date.format(DATE).to_string())?;
    }
    // BT-9: Due date, carried by the first payment term
    if let Some(due) = invoice.payment_terms.first().and_then(|t| t.due_date) {
        w.text_element("cbc:DueDate", &due.format(DATE).to_string())?;
    }
    // BT-3: Invoice type code
    w.text_element("cbc:InvoiceTypeCode", render_code(invoice.type_code, UBL))?;
    // BT-22: Notes
    for note in &invoice.notes {
        w.text_element("cbc:Note", note)?;
    }
    // BT-5: Currency
    w.text_element("cbc:DocumentCurrencyCode", currency)?;
    // BT-10: Buyer reference
    w.opt_text_element("cbc:BuyerReference", invoice.buyer_reference.as_deref())?;
    // BT-13: Purchase order reference
    if let Some(order_no) = &invoice.order_no {
        w.start_element("cac:OrderReference")?;
        w.text_element("cbc:ID", order_no)?;
        w.end_element("cac:OrderReference")?;
    }

    // BG-24: Additional supporting documents
    for doc in &invoice.additional_referenced_documents {
        w.start_element("cac:AdditionalDocumentReference")?;
        w.text_element("cbc:ID", &doc.id)?;
        w.text_element("cbc:DocumentTypeCode", render_code(doc.type_code, UBL))?;
        w.opt_text_element("cbc:DocumentDescription", doc.name.as_deref())?;
        if let Some(bytes) = &doc.attachment {
            let mut attrs = vec![("mimeCode", doc.mime_type())];
            if let Some(filename) = &doc.filename {
                attrs.push(("filename", filename.as_str()));
            }
            w.start_element("cac:Attachment")?;
            w.text_element_with_attrs(
                "cbc:EmbeddedDocumentBinaryObject",
                &STANDARD.encode(bytes),
                &attrs,
            )?;
            w.end_element("cac:Attachment")?;
        }
        w.end_element("cac:AdditionalDocumentReference")?;
    }

    // BG-4: Seller
    write_party(
        &mut w,
        "cac:AccountingSupplierParty",
        &invoice.seller,
        invoice.seller_contact.as_ref(),
        &invoice.seller_tax_registrations,
    )?;
    // BG-7: Buyer
    if let Some(buyer) = &invoice.buyer {
        write_party(
            &mut w,
            "cac:AccountingCustomerParty",
            buyer,
            invoice.buyer_contact.as_ref(),
            &invoice.buyer_tax_registrations,
        )?;
    }

    // BT-72: Actual delivery date
    if let Some(date) = &invoice.actual_delivery_date {
        w.start_element("cac:Delivery")?;
        w.text_element("cbc:ActualDeliveryDate", &date.format(DATE).to_string())?;
        w.end_element("cac:Delivery")?;
    }

    // BG-16: Payment instructions, one element per creditor account
    if let Some(means) = &invoice.payment_means {
        write_payment_means(&mut w, means)?;
    }

    // BT-20: Payment terms, all lines in one note
    let lines: Vec<&str> = invoice
        .payment_terms
        .iter()
        .map(|t| t.description.as_str())
        .filter(|d| !d.is_empty())
        .collect();
    if !lines.is_empty() {
        w.start_element("cac:PaymentTerms")?;
        super::write_term_lines(&mut w, "cbc:Note", &lines)?;
        w.end_element("cac:PaymentTerms")?;
    }

    // BG-20 / BG-21: Document level allowances and charges
    for ac in &invoice.trade_allowance_charges {
        write_allowance_charge(&mut w, ac)?;
    }

    let t = &invoice.totals;
    let required = |path: &str, value: Option<Decimal>| {
        value.ok_or_else(|| InvoiceError::missing(path.to_string()))
    };

    // BG-23: VAT breakdown
    w.start_element("cac:TaxTotal")?;
    w.amount_element(
        "cbc:TaxAmount",
        required("TaxTotal/TaxAmount", t.tax_total)?,
        currency,
    )?;
    for tax in &invoice.taxes {
        w.start_element("cac:TaxSubtotal")?;
        if let Some(basis) = tax.basis_amount {
            w.amount_element("cbc:TaxableAmount", basis, currency)?;
        }
        w.amount_element("cbc:TaxAmount", tax.tax_amount()?, currency)?;
        w.start_element("cac:TaxCategory")?;
        w.text_element("cbc:ID", render_code(tax.category, UBL))?;
        w.text_element("cbc:Percent", &decimal_text(tax.percent))?;
        w.opt_text_element("cbc:TaxExemptionReasonCode", tax.exemption_reason_code.as_deref())?;
        w.opt_text_element("cbc:TaxExemptionReason", tax.exemption_reason.as_deref())?;
        write_tax_scheme(&mut w, tax.tax_type)?;
        w.end_element("cac:TaxCategory")?;
        w.end_element("cac:TaxSubtotal")?;
    }
    w.end_element("cac:TaxTotal")?;

    // BG-22: Document totals
    let tax_basis = required("LegalMonetaryTotal/TaxExclusiveAmount", t.tax_basis)?;
    let grand_total = required("LegalMonetaryTotal/TaxInclusiveAmount", t.grand_total)?;
    let due_payable = required("LegalMonetaryTotal/PayableAmount", t.due_payable)?;
    w.start_element("cac:LegalMonetaryTotal")?;
    let amounts = [
        ("cbc:LineExtensionAmount", t.line_total),
        ("cbc:TaxExclusiveAmount", Some(tax_basis)),
        ("cbc:TaxInclusiveAmount", Some(grand_total)),
        ("cbc:AllowanceTotalAmount", t.allowance_total),
        ("cbc:ChargeTotalAmount", t.charge_total),
        ("cbc:PrepaidAmount", t.total_prepaid),
        ("cbc:PayableAmount", Some(due_payable)),
    ];
    for (name, value) in amounts {
        if let Some(v) = value {
            w.amount_element(name, v, currency)?;
        }
    }
    w.end_element("cac:LegalMonetaryTotal")?;

    // BG-25: Lines
    for line in &invoice.trade_line_items {
        write_line(&mut w, line, currency)?;
    }

    w.end_element("ubl:Invoice")?;
    Ok(w.into_bytes())
}

fn write_tax_scheme(w: &mut XmlWriter, tax_type: TaxType) -> Result<(), InvoiceError> {
    w.start_element("cac:TaxScheme")?;
    w.text_element("cbc:ID", render_code(tax_type, UBL))?;
    w.end_element("cac:TaxScheme")?;
    Ok(())
}

fn write_party(
    w: &mut XmlWriter,
    wrapper: &str,
    party: &Party,
    contact: Option<&Contact>,
    registrations: &[TaxRegistration],
) -> Result<(), InvoiceError> {
    w.start_element(wrapper)?;
    w.start_element("cac:Party")?;

    // BT-29 / BT-46: Party identifier
    if let Some(id) = &party.id {
        w.start_element("cac:PartyIdentification")?;
        w.text_element("cbc:ID", id)?;
        w.end_element("cac:PartyIdentification")?;
    }

    // BG-5 / BG-8: Postal address
    if party.street.is_some()
        || party.city.is_some()
        || party.postcode.is_some()
        || party.country.is_some()
    {
        w.start_element("cac:PostalAddress")?;
        w.opt_text_element("cbc:StreetName", party.street.as_deref())?;
        w.opt_text_element("cbc:CityName", party.city.as_deref())?;
        w.opt_text_element("cbc:PostalZone", party.postcode.as_deref())?;
        if let Some(country) = &party.country {
            w.start_element("cac:Country")?;
            w.text_element("cbc:IdentificationCode", country)?;
            w.end_element("cac:Country")?;
        }
        w.end_element("cac:PostalAddress")?;
    }

    // BT-31 / BT-32 / BT-48: Tax registrations
    for reg in registrations {
        w.start_element("cac:PartyTaxScheme")?;
        w.text_element("cbc:CompanyID", &reg.no)?;
        w.start_element("cac:TaxScheme")?;
        w.text_element("cbc:ID", render_code(reg.scheme, UBL))?;
        w.end_element("cac:TaxScheme")?;
        w.end_element("cac:PartyTaxScheme")?;
    }

    // BT-27 / BT-44: Legal name
    w.start_element("cac:PartyLegalEntity")?;
    w.text_element("cbc:RegistrationName", &party.name)?;
    w.end_element("cac:PartyLegalEntity")?;

    // BG-6 / BG-9: Contact
    if let Some(contact) = contact {
        w.start_element("cac:Contact")?;
        w.opt_text_element("cbc:Name", contact.name.as_deref())?;
        w.opt_text_element("cbc:Telephone", contact.phone.as_deref())?;
        w.opt_text_element("cbc:ElectronicMail", contact.email.as_deref())?;
        w.end_element("cac:Contact")?;
    }

    w.end_element("cac:Party")?;
    w.end_element(wrapper)?;
    Ok(())
}

fn write_payment_means(w: &mut XmlWriter, means: &PaymentMeans) -> Result<(), InvoiceError> {
    let accounts: Vec<Option<&BankAccount>> = if means.creditor_accounts.is_empty() {
        vec![None]
    } else {
        means.creditor_accounts.iter().map(Some).collect()
    };
    for account in accounts {
        w.start_element("cac:PaymentMeans")?;
        w.text_element("cbc:PaymentMeansCode", render_code(means.type_code, UBL))?;
        w.opt_text_element("cbc:InstructionNote", means.information.as_deref())?;
        if let Some(account) = account {
            w.start_element("cac:PayeeFinancialAccount")?;
            w.text_element("cbc:ID", &account.iban)?;
            w.opt_text_element("cbc:Name", account.name.as_deref())?;
            if let Some(bic) = &account.bic {
                w.start_element("cac:FinancialInstitutionBranch")?;
                w.text_element("cbc:ID", bic)?;
                w.end_element("cac:FinancialInstitutionBranch")?;
            }
            w.end_element("cac:PayeeFinancialAccount")?;
        }
        w.end_element("cac:PaymentMeans")?;
    }
    Ok(())
}

fn write_allowance_charge(
    w: &mut XmlWriter,
    ac: &TradeAllowanceCharge,
) -> Result<(), InvoiceError> {
    let currency = ac.currency.code();
    w.start_element("cac:AllowanceCharge")?;
    w.text_element(
        "cbc:ChargeIndicator",
        if ac.charge_indicator { "true" } else { "false" },
    )?;
    if let Some(code) = ac.reason_code {
        w.text_element("cbc:AllowanceChargeReasonCode", render_code(code, UBL))?;
    }
    w.opt_text_element("cbc:AllowanceChargeReason", ac.reason.as_deref())?;
    if let Some(pct) = ac.percentage {
        w.text_element("cbc:MultiplierFactorNumeric", &decimal_text(pct))?;
    }
    w.amount_element("cbc:Amount", ac.amount, currency)?;
    if let Some(base) = ac.basis_amount {
        w.amount_element("cbc:BaseAmount", base, currency)?;
    }
    w.start_element("cac:TaxCategory")?;
    w.text_element("cbc:ID", render_code(ac.tax.category, UBL))?;
    w.text_element("cbc:Percent", &decimal_text(ac.tax.percent))?;
    write_tax_scheme(w, ac.tax.tax_type)?;
    w.end_element("cac:TaxCategory")?;
    w.end_element("cac:AllowanceCharge")?;
    Ok(())
}

fn write_line(w: &mut XmlWriter, line: &TradeLineItem, currency: &str) -> Result<(), InvoiceError> {
    w.start_element("cac:InvoiceLine")?;
    // BT-126: Line ID
    w.text_element("cbc:ID", &line.line_id)?;
    // BT-127: Line note
    w.opt_text_element("cbc:Note", line.comment.as_deref())?;
    // BT-129 / BT-130: Quantity with unit
    w.quantity_element(
        "cbc:InvoicedQuantity",
        line.billed_quantity,
        render_code(line.unit, UBL),
    )?;
    // BT-131: Line net amount
    w.amount_element("cbc:LineExtensionAmount", line.effective_line_total()?, currency)?;

    w.start_element("cac:Item")?;
    w.opt_text_element("cbc:Description", line.description.as_deref())?;
    w.text_element("cbc:Name", &line.name)?;
    if let Some(id) = &line.buyer_assigned_id {
        w.start_element("cac:BuyersItemIdentification")?;
        w.text_element("cbc:ID", id)?;
        w.end_element("cac:BuyersItemIdentification")?;
    }
    if let Some(id) = &line.seller_assigned_id {
        w.start_element("cac:SellersItemIdentification")?;
        w.text_element("cbc:ID", id)?;
        w.end_element("cac:SellersItemIdentification")?;
    }
    if let Some(gid) = &line.global_id {
        w.start_element("cac:StandardItemIdentification")?;
        w.text_element_with_attrs("cbc:ID", &gid.id, &[("schemeID", gid.scheme_id.as_str())])?;
        w.end_element("cac:StandardItemIdentification")?;
    }
    w.start_element("cac:ClassifiedTaxCategory")?;
    w.text_element("cbc:ID", render_code(line.tax_category, UBL))?;
    w.text_element("cbc:Percent", &decimal_text(line.tax_percent))?;
    write_tax_scheme(w, line.tax_type)?;
    w.end_element("cac:ClassifiedTaxCategory")?;
    // BG-32: Item attributes
    for c in &line.characteristics {
        w.start_element("cac:AdditionalItemProperty")?;
        w.text_element("cbc:Name", &c.description)?;
        w.text_element("cbc:Value", &c.value)?;
        w.end_element("cac:AdditionalItemProperty")?;
    }
    w.end_element("cac:Item")?;

    // BG-29: Price details
    w.start_element("cac:Price")?;
    w.amount_element("cbc:PriceAmount", line.net_unit_price, currency)?;
    if let Some(gross) = line.gross_unit_price {
        // BT-147 / BT-148: Price discount relative to the gross price
        let discount = gross
            .checked_sub(line.net_unit_price)
            .ok_or_else(|| out_of_range("Price/AllowanceCharge/Amount", "gross − net price"))?
            .max(Decimal::ZERO);
        w.start_element("cac:AllowanceCharge")?;
        w.text_element("cbc:ChargeIndicator", "false")?;
        w.amount_element("cbc:Amount", discount, currency)?;
        w.amount_element("cbc:BaseAmount", gross, currency)?;
        w.end_element("cac:AllowanceCharge")?;
    }
    w.end_element("cac:Price")?;

    w.end_element("cac:InvoiceLine")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Guideline identifier (BT-24) of a UBL document.
pub(crate) fn guideline_id(root: &Element) -> Option<String> {
    read::text(root, &["CustomizationID"])
}

/// Read a UBL `Invoice` or `CreditNote` document.
pub(crate) fn read(root: &Element) -> Result<InvoiceDescriptor, InvoiceError> {
    let credit_note = root.name == "CreditNote";
    let (type_tag, line_tag, quantity_tag) = if credit_note {
        ("CreditNoteTypeCode", "CreditNoteLine", "CreditedQuantity")
    } else {
        ("InvoiceTypeCode", "InvoiceLine", "InvoicedQuantity")
    };

    let mut invoice = InvoiceDescriptor {
        invoice_no: read::required_text(root, &["ID"])?,
        invoice_date: read::date(root, &["IssueDate"], DATE)?,
        type_code: read::required_code(root, &[type_tag], UBL)?,
        currency: read::required_code(root, &["DocumentCurrencyCode"], UBL)?,
        notes: root.children("Note").map(|n| n.text.clone()).collect(),
        buyer_reference: read::text(root, &["BuyerReference"]),
        order_no: read::text(root, &["OrderReference", "ID"]),
        actual_delivery_date: read::date(root, &["Delivery", "ActualDeliveryDate"], DATE)?,
        ..InvoiceDescriptor::default()
    };

    for doc in root.children("AdditionalDocumentReference") {
        invoice
            .additional_referenced_documents
            .push(read_referenced_document(doc)?);
    }

    let seller = root
        .find(&["AccountingSupplierParty", "Party"])
        .ok_or_else(|| InvoiceError::missing("AccountingSupplierParty/Party"))?;
    invoice.seller = read_party(seller)?;
    invoice.seller_contact = read_contact(seller);
    invoice.seller_tax_registrations = read_registrations(seller)?;

    if let Some(buyer) = root.find(&["AccountingCustomerParty", "Party"]) {
        invoice.buyer = Some(read_party(buyer)?);
        invoice.buyer_contact = read_contact(buyer);
        invoice.buyer_tax_registrations = read_registrations(buyer)?;
    }

    invoice.payment_means = read_payment_means(root)?;

    let due = read::date(root, &["DueDate"], DATE)?;
    let notes: Vec<&str> = root
        .children("PaymentTerms")
        .flat_map(|t| t.children("Note"))
        .map(|n| n.text.as_str())
        .collect();
    invoice.payment_terms = super::split_payment_terms(&notes.join("\n"), due);

    for ac in root.children("AllowanceCharge") {
        invoice
            .trade_allowance_charges
            .push(read_allowance_charge(ac, invoice.currency)?);
    }

    for total in root.children("TaxTotal") {
        if invoice.totals.tax_total.is_none() {
            invoice.totals.tax_total = read::decimal(total, &["TaxAmount"])?;
        }
        for sub in total.children("TaxSubtotal") {
            let category = sub
                .child("TaxCategory")
                .ok_or_else(|| InvoiceError::missing("TaxSubtotal/TaxCategory"))?;
            invoice.taxes.push(Tax {
                tax_type: read::code(category, &["TaxScheme", "ID"], UBL)?
                    .unwrap_or(TaxType::ValueAddedTax),
                category: read::required_code(category, &["ID"], UBL)?,
                basis_amount: read::decimal(sub, &["TaxableAmount"])?,
                percent: read::required_decimal(category, &["Percent"])?,
                allowance_charge_basis_amount: None,
                exemption_reason: read::text(category, &["TaxExemptionReason"]),
                exemption_reason_code: read::text(category, &["TaxExemptionReasonCode"]),
            });
        }
    }

    if let Some(sum) = root.child("LegalMonetaryTotal") {
        invoice.totals.line_total = read::decimal(sum, &["LineExtensionAmount"])?;
        invoice.totals.tax_basis = read::decimal(sum, &["TaxExclusiveAmount"])?;
        invoice.totals.grand_total = read::decimal(sum, &["TaxInclusiveAmount"])?;
        invoice.totals.allowance_total = read::decimal(sum, &["AllowanceTotalAmount"])?;
        invoice.totals.charge_total = read::decimal(sum, &["ChargeTotalAmount"])?;
        invoice.totals.total_prepaid = read::decimal(sum, &["PrepaidAmount"])?;
        invoice.totals.due_payable = read::decimal(sum, &["PayableAmount"])?;
    }

    for line in root.children(line_tag) {
        invoice.trade_line_items.push(read_line(line, quantity_tag)?);
    }

    Ok(invoice)
}

fn read_party(el: &Element) -> Result<Party, InvoiceError> {
    let name = read::text(el, &["PartyLegalEntity", "RegistrationName"])
        .or_else(|| read::text(el, &["PartyName", "Name"]))
        .ok_or_else(|| InvoiceError::missing("Party/PartyLegalEntity/RegistrationName"))?;
    Ok(Party {
        id: read::text(el, &["PartyIdentification", "ID"]),
        name,
        street: read::text(el, &["PostalAddress", "StreetName"]),
        postcode: read::text(el, &["PostalAddress", "PostalZone"]),
        city: read::text(el, &["PostalAddress", "CityName"]),
        country: read::text(el, &["PostalAddress", "Country", "IdentificationCode"]),
    })
}

fn read_contact(party: &Element) -> Option<Contact> {
    let c = party.child("Contact")?;
    Some(Contact {
        name: read::text(c, &["Name"]),
        phone: read::text(c, &["Telephone"]),
        email: read::text(c, &["ElectronicMail"]),
    })
}

fn read_registrations(party: &Element) -> Result<Vec<TaxRegistration>, InvoiceError> {
    party
        .children("PartyTaxScheme")
        .map(|reg| {
            Ok(TaxRegistration {
                scheme: read::required_code(reg, &["TaxScheme", "ID"], UBL)?,
                no: read::required_text(reg, &["CompanyID"])?,
            })
        })
        .collect()
}

fn read_referenced_document(el: &Element) -> Result<AdditionalReferencedDocument, InvoiceError> {
    let binary = el.find(&["Attachment", "EmbeddedDocumentBinaryObject"]);
    Ok(AdditionalReferencedDocument {
        id: read::required_text(el, &["ID"])?,
        type_code: read::code(el, &["DocumentTypeCode"], UBL)?
            .unwrap_or(AdditionalReferencedDocumentTypeCode::ReferenceDocument),
        name: read::text(el, &["DocumentDescription"]),
        filename: binary.and_then(|b| b.attr("filename")).map(str::to_string),
        attachment: binary.map(read::attachment).transpose()?,
    })
}

fn read_payment_means(root: &Element) -> Result<Option<PaymentMeans>, InvoiceError> {
    let mut means: Option<PaymentMeans> = None;
    for el in root.children("PaymentMeans") {
        if means.is_none() {
            means = Some(PaymentMeans {
                type_code: read::required_code(el, &["PaymentMeansCode"], UBL)?,
                information: read::text(el, &["InstructionNote"]),
                creditor_accounts: Vec::new(),
            });
        }
        let account = el.child("PayeeFinancialAccount");
        if let (Some(entry), Some(account)) = (means.as_mut(), account) {
            entry.creditor_accounts.push(BankAccount {
                iban: read::required_text(account, &["ID"])?,
                bic: read::text(account, &["FinancialInstitutionBranch", "ID"]),
                name: read::text(account, &["Name"]),
            });
        }
    }
    Ok(means)
}

fn read_allowance_charge(
    el: &Element,
    document_currency: CurrencyCode,
) -> Result<TradeAllowanceCharge, InvoiceError> {
    let tax = el
        .child("TaxCategory")
        .ok_or_else(|| InvoiceError::missing("AllowanceCharge/TaxCategory"))?;
    let currency = read::attr_code(el, &["Amount"], "currencyID", UBL)?.unwrap_or(document_currency);
    Ok(TradeAllowanceCharge {
        charge_indicator: read::indicator(el, &["ChargeIndicator"])?
            .ok_or_else(|| InvoiceError::missing("AllowanceCharge/ChargeIndicator"))?,
        basis_amount: read::decimal(el, &["BaseAmount"])?,
        currency,
        amount: read::required_decimal(el, &["Amount"])?,
        percentage: read::decimal(el, &["MultiplierFactorNumeric"])?,
        reason: read::text(el, &["AllowanceChargeReason"]),
        reason_code: read::code(el, &["AllowanceChargeReasonCode"], UBL)?,
        tax: AllowanceChargeTax {
            tax_type: read::code(tax, &["TaxScheme", "ID"], UBL)?.unwrap_or(TaxType::ValueAddedTax),
            category: read::required_code(tax, &["ID"], UBL)?,
            percent: read::required_decimal(tax, &["Percent"])?,
        },
    })
}

fn read_line(el: &Element, quantity_tag: &str) -> Result<TradeLineItem, InvoiceError> {
    let item = el
        .child("Item")
        .ok_or_else(|| InvoiceError::missing(format!("{}/Item", el.name)))?;
    let tax = item
        .child("ClassifiedTaxCategory")
        .ok_or_else(|| InvoiceError::missing("Item/ClassifiedTaxCategory"))?;

    let global_id = item
        .find(&["StandardItemIdentification", "ID"])
        .map(|gid| {
            let scheme_id = gid
                .attr("schemeID")
                .ok_or_else(|| InvoiceError::missing("StandardItemIdentification/ID/@schemeID"))?;
            Ok::<_, InvoiceError>(GlobalId {
                scheme_id: scheme_id.to_string(),
                id: gid.text.clone(),
            })
        })
        .transpose()?;

    let characteristics = item
        .children("AdditionalItemProperty")
        .map(|p| {
            Ok(ProductCharacteristic {
                description: read::required_text(p, &["Name"])?,
                value: read::required_text(p, &["Value"])?,
            })
        })
        .collect::<Result<Vec<_>, InvoiceError>>()?;

    Ok(TradeLineItem {
        line_id: read::required_text(el, &["ID"])?,
        global_id,
        seller_assigned_id: read::text(item, &["SellersItemIdentification", "ID"]),
        buyer_assigned_id: read::text(item, &["BuyersItemIdentification", "ID"]),
        name: read::required_text(item, &["Name"])?,
        description: read::text(item, &["Description"]),
        comment: read::text(el, &["Note"]),
        unit: read::required_attr_code(el, &[quantity_tag], "unitCode", UBL)?,
        billed_quantity: read::required_decimal(el, &[quantity_tag])?,
        net_unit_price: read::required_decimal(el, &["Price", "PriceAmount"])?,
        gross_unit_price: read::decimal(el, &["Price", "AllowanceCharge", "BaseAmount"])?,
        line_total: read::decimal(el, &["LineExtensionAmount"])?,
        tax_type: read::code(tax, &["TaxScheme", "ID"], UBL)?.unwrap_or(TaxType::ValueAddedTax),
        tax_category: read::required_code(tax, &["ID"], UBL)?,
        tax_percent: read::required_decimal(tax, &["Percent"])?,
        characteristics,
    })
}
