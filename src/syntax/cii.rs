//! UN/CEFACT Cross Industry Invoice (ZUGFeRD 2.x / Factur-X).

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::NaiveDate;

use super::read;
use super::{Format, PEPPOL_PROFILE_ID, cii_ns};
use crate::codes::{
    AdditionalReferencedDocumentTypeCode, CurrencyCode, TaxRegistrationScheme, TaxType,
    render_code,
};
use crate::core::*;
use crate::profile::{Block, Profile, ProfileRules};
use crate::xml::{Element, XmlWriter, decimal_text};

const CII: Format = Format::Cii;
const DATE_102: &str = "%Y%m%d";

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
        "rsm:CrossIndustryInvoice",
        &[
            ("xmlns:rsm", cii_ns::RSM),
            ("xmlns:ram", cii_ns::RAM),
            ("xmlns:qdt", cii_ns::QDT),
            ("xmlns:udt", cii_ns::UDT),
        ],
    )?;

    // --- ExchangedDocumentContext ---
    w.start_element("rsm:ExchangedDocumentContext")?;
    if matches!(rules.profile, Profile::XRechnung | Profile::XRechnung1) {
        w.start_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
        w.text_element("ram:ID", PEPPOL_PROFILE_ID)?;
        w.end_element("ram:BusinessProcessSpecifiedDocumentContextParameter")?;
    }
    w.start_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.text_element("ram:ID", urn)?;
    w.end_element("ram:GuidelineSpecifiedDocumentContextParameter")?;
    w.end_element("rsm:ExchangedDocumentContext")?;

    // --- ExchangedDocument ---
    w.start_element("rsm:ExchangedDocument")?;
    w.text_element("ram:ID", &invoice.invoice_no)?;
    w.text_element("ram:TypeCode", render_code(invoice.type_code, CII))?;
    if let Some(date) = &invoice.invoice_date {
        write_date(&mut w, "ram:IssueDateTime", date)?;
    }
    for note in &invoice.notes {
        w.start_element("ram:IncludedNote")?;
        w.text_element("ram:Content", note)?;
        w.end_element("ram:IncludedNote")?;
    }
    w.end_element("rsm:ExchangedDocument")?;

    // --- SupplyChainTradeTransaction ---
    w.start_element("rsm:SupplyChainTradeTransaction")?;

    for line in &invoice.trade_line_items {
        write_line(&mut w, line)?;
    }

    // --- ApplicableHeaderTradeAgreement ---
    w.start_element("ram:ApplicableHeaderTradeAgreement")?;
    w.opt_text_element("ram:BuyerReference", invoice.buyer_reference.as_deref())?;
    write_party(
        &mut w,
        "ram:SellerTradeParty",
        &invoice.seller,
        invoice.seller_contact.as_ref(),
        &invoice.seller_tax_registrations,
    )?;
    if let Some(buyer) = &invoice.buyer {
        write_party(
            &mut w,
            "ram:BuyerTradeParty",
            buyer,
            invoice.buyer_contact.as_ref(),
            &invoice.buyer_tax_registrations,
        )?;
    }
    if let Some(order_no) = &invoice.order_no {
        w.start_element("ram:BuyerOrderReferencedDocument")?;
        w.text_element("ram:IssuerAssignedID", order_no)?;
        w.end_element("ram:BuyerOrderReferencedDocument")?;
    }
    // BG-24: Additional supporting documents
    for doc in &invoice.additional_referenced_documents {
        w.start_element("ram:AdditionalReferencedDocument")?;
        w.text_element("ram:IssuerAssignedID", &doc.id)?;
        w.text_element("ram:TypeCode", render_code(doc.type_code, CII))?;
        w.opt_text_element("ram:Name", doc.name.as_deref())?;
        if let Some(bytes) = &doc.attachment {
            let mime = doc.mime_type();
            let mut attrs = vec![("mimeCode", mime)];
            if let Some(filename) = &doc.filename {
                attrs.push(("filename", filename.as_str()));
            }
            w.text_element_with_attrs(
                "ram:AttachmentBinaryObject",
                &STANDARD.encode(bytes),
                &attrs,
            )?;
        }
        w.end_element("ram:AdditionalReferencedDocument")?;
    }
    w.end_element("ram:ApplicableHeaderTradeAgreement")?;

    // --- ApplicableHeaderTradeDelivery ---
    w.start_element("ram:ApplicableHeaderTradeDelivery")?;
    if let Some(date) = &invoice.actual_delivery_date {
        w.start_element("ram:ActualDeliverySupplyChainEvent")?;
        write_date(&mut w, "ram:OccurrenceDateTime", date)?;
        w.end_element("ram:ActualDeliverySupplyChainEvent")?;
    }
    w.end_element("ram:ApplicableHeaderTradeDelivery")?;

    // --- ApplicableHeaderTradeSettlement ---
    w.start_element("ram:ApplicableHeaderTradeSettlement")?;
    w.text_element("ram:InvoiceCurrencyCode", currency)?;
    if let Some(invoicee) = &invoice.invoicee {
        write_party(&mut w, "ram:InvoiceeTradeParty", invoicee, None, &[])?;
    }
    if let Some(means) = &invoice.payment_means {
        write_payment_means(&mut w, means)?;
    }

    // BG-23: VAT breakdown
    for tax in &invoice.taxes {
        w.start_element("ram:ApplicableTradeTax")?;
        w.text_element("ram:CalculatedAmount", &decimal_text(tax.tax_amount()?))?;
        w.text_element("ram:TypeCode", render_code(tax.tax_type, CII))?;
        w.opt_text_element("ram:ExemptionReason", tax.exemption_reason.as_deref())?;
        if let Some(basis) = tax.basis_amount {
            w.text_element("ram:BasisAmount", &decimal_text(basis))?;
        }
        if let Some(acba) = tax.allowance_charge_basis_amount {
            w.text_element("ram:AllowanceChargeBasisAmount", &decimal_text(acba))?;
        }
        w.text_element("ram:CategoryCode", render_code(tax.category, CII))?;
        w.opt_text_element("ram:ExemptionReasonCode", tax.exemption_reason_code.as_deref())?;
        w.text_element("ram:RateApplicablePercent", &decimal_text(tax.percent))?;
        w.end_element("ram:ApplicableTradeTax")?;
    }

    // BG-20 / BG-21: Document level allowances and charges
    for ac in &invoice.trade_allowance_charges {
        w.start_element("ram:SpecifiedTradeAllowanceCharge")?;
        w.start_element("ram:ChargeIndicator")?;
        w.text_element(
            "udt:Indicator",
            if ac.charge_indicator { "true" } else { "false" },
        )?;
        w.end_element("ram:ChargeIndicator")?;
        if let Some(pct) = ac.percentage {
            w.text_element("ram:CalculationPercent", &decimal_text(pct))?;
        }
        if let Some(basis) = ac.basis_amount {
            w.text_element("ram:BasisAmount", &decimal_text(basis))?;
        }
        w.text_element("ram:ActualAmount", &decimal_text(ac.amount))?;
        if let Some(code) = ac.reason_code {
            w.text_element("ram:ReasonCode", render_code(code, CII))?;
        }
        w.opt_text_element("ram:Reason", ac.reason.as_deref())?;
        w.start_element("ram:CategoryTradeTax")?;
        w.text_element("ram:TypeCode", render_code(ac.tax.tax_type, CII))?;
        w.text_element("ram:CategoryCode", render_code(ac.tax.category, CII))?;
        w.text_element("ram:RateApplicablePercent", &decimal_text(ac.tax.percent))?;
        w.end_element("ram:CategoryTradeTax")?;
        w.end_element("ram:SpecifiedTradeAllowanceCharge")?;
    }

    write_payment_terms(
        &mut w,
        &invoice.payment_terms,
        rules.allows(Block::SeparatePaymentTermBlocks, CII),
    )?;

    // BG-22: Document totals
    let t = &invoice.totals;
    let summation = "ram:SpecifiedTradeSettlementHeaderMonetarySummation";
    let required = |name: &str, value: Option<_>| {
        value.ok_or_else(|| InvoiceError::missing(format!("{summation}/{name}")))
    };
    let tax_basis = required("TaxBasisTotalAmount", t.tax_basis)?;
    let grand_total = required("GrandTotalAmount", t.grand_total)?;
    let due_payable = required("DuePayableAmount", t.due_payable)?;

    w.start_element(summation)?;
    let amounts = [
        ("ram:LineTotalAmount", t.line_total),
        ("ram:ChargeTotalAmount", t.charge_total),
        ("ram:AllowanceTotalAmount", t.allowance_total),
        ("ram:TaxBasisTotalAmount", Some(tax_basis)),
    ];
    for (name, value) in amounts {
        if let Some(v) = value {
            w.text_element(name, &decimal_text(v))?;
        }
    }
    if let Some(v) = t.tax_total {
        w.amount_element("ram:TaxTotalAmount", v, currency)?;
    }
    w.text_element("ram:GrandTotalAmount", &decimal_text(grand_total))?;
    if let Some(v) = t.total_prepaid {
        w.text_element("ram:TotalPrepaidAmount", &decimal_text(v))?;
    }
    w.text_element("ram:DuePayableAmount", &decimal_text(due_payable))?;
    w.end_element(summation)?;

    w.end_element("ram:ApplicableHeaderTradeSettlement")?;
    w.end_element("rsm:SupplyChainTradeTransaction")?;
    w.end_element("rsm:CrossIndustryInvoice")?;

    Ok(w.into_bytes())
}

fn write_date(w: &mut XmlWriter, element: &str, date: &NaiveDate) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    w.text_element_with_attrs(
        "udt:DateTimeString",
        &date.format(DATE_102).to_string(),
        &[("format", "102")],
    )?;
    w.end_element(element)?;
    Ok(())
}

fn write_party(
    w: &mut XmlWriter,
    element: &str,
    party: &Party,
    contact: Option<&Contact>,
    registrations: &[TaxRegistration],
) -> Result<(), InvoiceError> {
    w.start_element(element)?;
    w.opt_text_element("ram:ID", party.id.as_deref())?;
    w.text_element("ram:Name", &party.name)?;

    if let Some(contact) = contact {
        w.start_element("ram:DefinedTradeContact")?;
        w.opt_text_element("ram:PersonName", contact.name.as_deref())?;
        if let Some(phone) = &contact.phone {
            w.start_element("ram:TelephoneUniversalCommunication")?;
            w.text_element("ram:CompleteNumber", phone)?;
            w.end_element("ram:TelephoneUniversalCommunication")?;
        }
        if let Some(email) = &contact.email {
            w.start_element("ram:EmailURIUniversalCommunication")?;
            w.text_element("ram:URIID", email)?;
            w.end_element("ram:EmailURIUniversalCommunication")?;
        }
        w.end_element("ram:DefinedTradeContact")?;
    }

    if party.postcode.is_some()
        || party.street.is_some()
        || party.city.is_some()
        || party.country.is_some()
    {
        w.start_element("ram:PostalTradeAddress")?;
        w.opt_text_element("ram:PostcodeCode", party.postcode.as_deref())?;
        w.opt_text_element("ram:LineOne", party.street.as_deref())?;
        w.opt_text_element("ram:CityName", party.city.as_deref())?;
        w.opt_text_element("ram:CountryID", party.country.as_deref())?;
        w.end_element("ram:PostalTradeAddress")?;
    }

    for reg in registrations {
        w.start_element("ram:SpecifiedTaxRegistration")?;
        w.text_element_with_attrs(
            "ram:ID",
            &reg.no,
            &[("schemeID", render_code(reg.scheme, CII))],
        )?;
        w.end_element("ram:SpecifiedTaxRegistration")?;
    }

    w.end_element(element)?;
    Ok(())
}

fn write_line(w: &mut XmlWriter, line: &TradeLineItem) -> Result<(), InvoiceError> {
    w.start_element("ram:IncludedSupplyChainTradeLineItem")?;

    w.start_element("ram:AssociatedDocumentLineDocument")?;
    w.text_element("ram:LineID", &line.line_id)?;
    if let Some(comment) = &line.comment {
        w.start_element("ram:IncludedNote")?;
        w.text_element("ram:Content", comment)?;
        w.end_element("ram:IncludedNote")?;
    }
    w.end_element("ram:AssociatedDocumentLineDocument")?;

    w.start_element("ram:SpecifiedTradeProduct")?;
    if let Some(gid) = &line.global_id {
        w.text_element_with_attrs("ram:GlobalID", &gid.id, &[("schemeID", gid.scheme_id.as_str())])?;
    }
    w.opt_text_element("ram:SellerAssignedID", line.seller_assigned_id.as_deref())?;
    w.opt_text_element("ram:BuyerAssignedID", line.buyer_assigned_id.as_deref())?;
    w.text_element("ram:Name", &line.name)?;
    w.opt_text_element("ram:Description", line.description.as_deref())?;
    for c in &line.characteristics {
        w.start_element("ram:ApplicableProductCharacteristic")?;
        w.text_element("ram:Description", &c.description)?;
        w.text_element("ram:Value", &c.value)?;
        w.end_element("ram:ApplicableProductCharacteristic")?;
    }
    w.end_element("ram:SpecifiedTradeProduct")?;

    w.start_element("ram:SpecifiedLineTradeAgreement")?;
    if let Some(gross) = line.gross_unit_price {
        w.start_element("ram:GrossPriceProductTradePrice")?;
        w.text_element("ram:ChargeAmount", &decimal_text(gross))?;
        w.end_element("ram:GrossPriceProductTradePrice")?;
    }
    w.start_element("ram:NetPriceProductTradePrice")?;
    w.text_element("ram:ChargeAmount", &decimal_text(line.net_unit_price))?;
    w.end_element("ram:NetPriceProductTradePrice")?;
    w.end_element("ram:SpecifiedLineTradeAgreement")?;

    w.start_element("ram:SpecifiedLineTradeDelivery")?;
    w.quantity_element(
        "ram:BilledQuantity",
        line.billed_quantity,
        render_code(line.unit, CII),
    )?;
    w.end_element("ram:SpecifiedLineTradeDelivery")?;

    w.start_element("ram:SpecifiedLineTradeSettlement")?;
    w.start_element("ram:ApplicableTradeTax")?;
    w.text_element("ram:TypeCode", render_code(line.tax_type, CII))?;
    w.text_element("ram:CategoryCode", render_code(line.tax_category, CII))?;
    w.text_element("ram:RateApplicablePercent", &decimal_text(line.tax_percent))?;
    w.end_element("ram:ApplicableTradeTax")?;
    w.start_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.text_element(
        "ram:LineTotalAmount",
        &decimal_text(line.effective_line_total()?),
    )?;
    w.end_element("ram:SpecifiedTradeSettlementLineMonetarySummation")?;
    w.end_element("ram:SpecifiedLineTradeSettlement")?;

    w.end_element("ram:IncludedSupplyChainTradeLineItem")?;
    Ok(())
}

fn write_payment_means(w: &mut XmlWriter, means: &PaymentMeans) -> Result<(), InvoiceError> {
    // One element per creditor account, at least one for the type code.
    let accounts: Vec<Option<&BankAccount>> = if means.creditor_accounts.is_empty() {
        vec![None]
    } else {
        means.creditor_accounts.iter().map(Some).collect()
    };
    for account in accounts {
        w.start_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
        w.text_element("ram:TypeCode", render_code(means.type_code, CII))?;
        w.opt_text_element("ram:Information", means.information.as_deref())?;
        if let Some(account) = account {
            w.start_element("ram:PayeePartyCreditorFinancialAccount")?;
            w.text_element("ram:IBANID", &account.iban)?;
            w.opt_text_element("ram:AccountName", account.name.as_deref())?;
            w.end_element("ram:PayeePartyCreditorFinancialAccount")?;
            if let Some(bic) = &account.bic {
                w.start_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
                w.text_element("ram:BICID", bic)?;
                w.end_element("ram:PayeeSpecifiedCreditorFinancialInstitution")?;
            }
        }
        w.end_element("ram:SpecifiedTradeSettlementPaymentMeans")?;
    }
    Ok(())
}

fn write_payment_terms(
    w: &mut XmlWriter,
    terms: &[PaymentTerm],
    separate: bool,
) -> Result<(), InvoiceError> {
    if terms.is_empty() {
        return Ok(());
    }
    if separate {
        for term in terms {
            write_term_block(w, std::slice::from_ref(term))?;
        }
        Ok(())
    } else {
        write_term_block(w, terms)
    }
}

/// One `SpecifiedTradePaymentTerms` carrying `terms` as description lines
/// and the due date of the first term.
fn write_term_block(w: &mut XmlWriter, terms: &[PaymentTerm]) -> Result<(), InvoiceError> {
    let lines: Vec<&str> = terms
        .iter()
        .map(|t| t.description.as_str())
        .filter(|d| !d.is_empty())
        .collect();
    w.start_element("ram:SpecifiedTradePaymentTerms")?;
    super::write_term_lines(w, "ram:Description", &lines)?;
    if let Some(due) = terms.first().and_then(|t| t.due_date) {
        write_date(w, "ram:DueDateDateTime", &due)?;
    }
    w.end_element("ram:SpecifiedTradePaymentTerms")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Guideline identifier (BT-24) of a CII document.
pub(crate) fn guideline_id(root: &Element) -> Option<String> {
    read::text(
        root,
        &["ExchangedDocumentContext", "GuidelineSpecifiedDocumentContextParameter", "ID"],
    )
}

/// Read a CII document rooted at `rsm:CrossIndustryInvoice`.
pub(crate) fn read(root: &Element) -> Result<InvoiceDescriptor, InvoiceError> {
    let doc = root
        .child("ExchangedDocument")
        .ok_or_else(|| InvoiceError::missing("CrossIndustryInvoice/ExchangedDocument"))?;
    let tx = root
        .child("SupplyChainTradeTransaction")
        .ok_or_else(|| InvoiceError::missing("CrossIndustryInvoice/SupplyChainTradeTransaction"))?;
    let settlement = tx
        .child("ApplicableHeaderTradeSettlement")
        .ok_or_else(|| InvoiceError::missing("SupplyChainTradeTransaction/ApplicableHeaderTradeSettlement"))?;

    let mut invoice = InvoiceDescriptor {
        invoice_no: read::required_text(doc, &["ID"])?,
        type_code: read::required_code(doc, &["TypeCode"], CII)?,
        invoice_date: read::date(doc, &["IssueDateTime", "DateTimeString"], DATE_102)?,
        currency: read::required_code(settlement, &["InvoiceCurrencyCode"], CII)?,
        notes: doc
            .children("IncludedNote")
            .filter_map(|n| read::text(n, &["Content"]))
            .collect(),
        ..InvoiceDescriptor::default()
    };

    // --- Agreement ---
    let agreement = tx
        .child("ApplicableHeaderTradeAgreement")
        .ok_or_else(|| InvoiceError::missing("SupplyChainTradeTransaction/ApplicableHeaderTradeAgreement"))?;
    let seller = agreement
        .child("SellerTradeParty")
        .ok_or_else(|| InvoiceError::missing("ApplicableHeaderTradeAgreement/SellerTradeParty"))?;

    invoice.buyer_reference = read::text(agreement, &["BuyerReference"]);
    invoice.seller = read_party(seller)?;
    invoice.seller_contact = read_contact(seller);
    invoice.seller_tax_registrations = read_registrations(seller)?;
    if let Some(buyer) = agreement.child("BuyerTradeParty") {
        invoice.buyer = Some(read_party(buyer)?);
        invoice.buyer_contact = read_contact(buyer);
        invoice.buyer_tax_registrations = read_registrations(buyer)?;
    }
    invoice.order_no = read::text(agreement, &["BuyerOrderReferencedDocument", "IssuerAssignedID"]);
    for doc in agreement.children("AdditionalReferencedDocument") {
        invoice
            .additional_referenced_documents
            .push(read_referenced_document(doc)?);
    }

    // --- Delivery ---
    invoice.actual_delivery_date = match tx.child("ApplicableHeaderTradeDelivery") {
        Some(delivery) => read::date(
            delivery,
            &["ActualDeliverySupplyChainEvent", "OccurrenceDateTime", "DateTimeString"],
            DATE_102,
        )?,
        None => None,
    };

    // --- Settlement ---
    if let Some(invoicee) = settlement.child("InvoiceeTradeParty") {
        invoice.invoicee = Some(read_party(invoicee)?);
    }
    invoice.payment_means = read_payment_means(settlement)?;

    for tax in settlement.children("ApplicableTradeTax") {
        invoice.taxes.push(Tax {
            tax_type: read::code(tax, &["TypeCode"], CII)?.unwrap_or(TaxType::ValueAddedTax),
            category: read::required_code(tax, &["CategoryCode"], CII)?,
            basis_amount: read::decimal(tax, &["BasisAmount"])?,
            percent: read::required_decimal(tax, &["RateApplicablePercent"])?,
            allowance_charge_basis_amount: read::decimal(tax, &["AllowanceChargeBasisAmount"])?,
            exemption_reason: read::text(tax, &["ExemptionReason"]),
            exemption_reason_code: read::text(tax, &["ExemptionReasonCode"]),
        });
    }

    for ac in settlement.children("SpecifiedTradeAllowanceCharge") {
        invoice
            .trade_allowance_charges
            .push(read_allowance_charge(ac, invoice.currency)?);
    }

    for terms in settlement.children("SpecifiedTradePaymentTerms") {
        let due = read::date(terms, &["DueDateDateTime", "DateTimeString"], DATE_102)?;
        let description = terms.text_at(&["Description"]).unwrap_or_default();
        invoice
            .payment_terms
            .extend(super::split_payment_terms(description, due));
    }

    if let Some(sum) = settlement.child("SpecifiedTradeSettlementHeaderMonetarySummation") {
        invoice.totals = MonetarySummation {
            line_total: read::decimal(sum, &["LineTotalAmount"])?,
            charge_total: read::decimal(sum, &["ChargeTotalAmount"])?,
            allowance_total: read::decimal(sum, &["AllowanceTotalAmount"])?,
            tax_basis: read::decimal(sum, &["TaxBasisTotalAmount"])?,
            tax_total: read::decimal(sum, &["TaxTotalAmount"])?,
            grand_total: read::decimal(sum, &["GrandTotalAmount"])?,
            total_prepaid: read::decimal(sum, &["TotalPrepaidAmount"])?,
            due_payable: read::decimal(sum, &["DuePayableAmount"])?,
        };
    }

    // --- Lines ---
    for line in tx.children("IncludedSupplyChainTradeLineItem") {
        invoice.trade_line_items.push(read_line(line)?);
    }

    Ok(invoice)
}

fn read_party(el: &Element) -> Result<Party, InvoiceError> {
    let address = el.child("PostalTradeAddress");
    let addr = |name: &str| address.and_then(|a| read::text(a, &[name]));
    Ok(Party {
        id: read::text(el, &["ID"]),
        name: read::required_text(el, &["Name"])?,
        street: addr("LineOne"),
        postcode: addr("PostcodeCode"),
        city: addr("CityName"),
        country: addr("CountryID"),
    })
}

fn read_contact(party: &Element) -> Option<Contact> {
    let c = party.child("DefinedTradeContact")?;
    Some(Contact {
        name: read::text(c, &["PersonName"]),
        phone: read::text(c, &["TelephoneUniversalCommunication", "CompleteNumber"]),
        email: read::text(c, &["EmailURIUniversalCommunication", "URIID"]),
    })
}

fn read_registrations(party: &Element) -> Result<Vec<TaxRegistration>, InvoiceError> {
    party
        .children("SpecifiedTaxRegistration")
        .map(|reg| {
            let scheme: TaxRegistrationScheme = read::attr_code(reg, &["ID"], "schemeID", CII)?
                .ok_or_else(|| InvoiceError::missing("SpecifiedTaxRegistration/ID/@schemeID"))?;
            Ok(TaxRegistration {
                scheme,
                no: read::required_text(reg, &["ID"])?,
            })
        })
        .collect()
}

fn read_referenced_document(el: &Element) -> Result<AdditionalReferencedDocument, InvoiceError> {
    let binary = el.child("AttachmentBinaryObject");
    Ok(AdditionalReferencedDocument {
        id: read::required_text(el, &["IssuerAssignedID"])?,
        type_code: read::code(el, &["TypeCode"], CII)?
            .unwrap_or(AdditionalReferencedDocumentTypeCode::ReferenceDocument),
        name: read::text(el, &["Name"]),
        filename: binary.and_then(|b| b.attr("filename")).map(str::to_string),
        attachment: binary.map(read::attachment).transpose()?,
    })
}

fn read_payment_means(settlement: &Element) -> Result<Option<PaymentMeans>, InvoiceError> {
    let mut means: Option<PaymentMeans> = None;
    for el in settlement.children("SpecifiedTradeSettlementPaymentMeans") {
        if means.is_none() {
            means = Some(PaymentMeans {
                type_code: read::required_code(el, &["TypeCode"], CII)?,
                information: read::text(el, &["Information"]),
                creditor_accounts: Vec::new(),
            });
        }
        let iban = read::text(el, &["PayeePartyCreditorFinancialAccount", "IBANID"]);
        if let (Some(entry), Some(iban)) = (means.as_mut(), iban) {
            entry.creditor_accounts.push(BankAccount {
                iban,
                bic: read::text(el, &["PayeeSpecifiedCreditorFinancialInstitution", "BICID"]),
                name: read::text(el, &["PayeePartyCreditorFinancialAccount", "AccountName"]),
            });
        }
    }
    Ok(means)
}

fn read_allowance_charge(
    el: &Element,
    currency: CurrencyCode,
) -> Result<TradeAllowanceCharge, InvoiceError> {
    let tax = el
        .child("CategoryTradeTax")
        .ok_or_else(|| InvoiceError::missing("SpecifiedTradeAllowanceCharge/CategoryTradeTax"))?;
    Ok(TradeAllowanceCharge {
        charge_indicator: read::indicator(el, &["ChargeIndicator", "Indicator"])?
            .ok_or_else(|| InvoiceError::missing("SpecifiedTradeAllowanceCharge/ChargeIndicator"))?,
        basis_amount: read::decimal(el, &["BasisAmount"])?,
        currency,
        amount: read::required_decimal(el, &["ActualAmount"])?,
        percentage: read::decimal(el, &["CalculationPercent"])?,
        reason: read::text(el, &["Reason"]),
        reason_code: read::code(el, &["ReasonCode"], CII)?,
        tax: AllowanceChargeTax {
            tax_type: read::code(tax, &["TypeCode"], CII)?.unwrap_or(TaxType::ValueAddedTax),
            category: read::required_code(tax, &["CategoryCode"], CII)?,
            percent: read::required_decimal(tax, &["RateApplicablePercent"])?,
        },
    })
}

fn read_line(el: &Element) -> Result<TradeLineItem, InvoiceError> {
    let product = el
        .child("SpecifiedTradeProduct")
        .ok_or_else(|| InvoiceError::missing("IncludedSupplyChainTradeLineItem/SpecifiedTradeProduct"))?;
    let quantity = ["SpecifiedLineTradeDelivery", "BilledQuantity"];
    let tax = el
        .find(&["SpecifiedLineTradeSettlement", "ApplicableTradeTax"])
        .ok_or_else(|| InvoiceError::missing("SpecifiedLineTradeSettlement/ApplicableTradeTax"))?;

    let global_id = product
        .child("GlobalID")
        .map(|gid| {
            let scheme_id = gid
                .attr("schemeID")
                .ok_or_else(|| InvoiceError::missing("SpecifiedTradeProduct/GlobalID/@schemeID"))?;
            Ok::<_, InvoiceError>(GlobalId {
                scheme_id: scheme_id.to_string(),
                id: gid.text.clone(),
            })
        })
        .transpose()?;

    let characteristics = product
        .children("ApplicableProductCharacteristic")
        .map(|c| {
            Ok(ProductCharacteristic {
                description: read::required_text(c, &["Description"])?,
                value: read::required_text(c, &["Value"])?,
            })
        })
        .collect::<Result<Vec<_>, InvoiceError>>()?;

    Ok(TradeLineItem {
        line_id: read::required_text(el, &["AssociatedDocumentLineDocument", "LineID"])?,
        global_id,
        seller_assigned_id: read::text(product, &["SellerAssignedID"]),
        buyer_assigned_id: read::text(product, &["BuyerAssignedID"]),
        name: read::required_text(product, &["Name"])?,
        description: read::text(product, &["Description"]),
        comment: read::text(el, &["AssociatedDocumentLineDocument", "IncludedNote", "Content"]),
        unit: read::required_attr_code(el, &quantity, "unitCode", CII)?,
        billed_quantity: read::required_decimal(el, &quantity)?,
        net_unit_price: read::required_decimal(
            el,
            &["SpecifiedLineTradeAgreement", "NetPriceProductTradePrice", "ChargeAmount"],
        )?,
        gross_unit_price: read::decimal(
            el,
            &["SpecifiedLineTradeAgreement", "GrossPriceProductTradePrice", "ChargeAmount"],
        )?,
        line_total: read::decimal(
            el,
            &[
                "SpecifiedLineTradeSettlement",
                "SpecifiedTradeSettlementLineMonetarySummation",
                "LineTotalAmount",
            ],
        )?,
        tax_type: read::code(tax, &["TypeCode"], CII)?.unwrap_or(TaxType::ValueAddedTax),
        tax_category: read::required_code(tax, &["CategoryCode"], CII)?,
        tax_percent: read::required_decimal(tax, &["RateApplicablePercent"])?,
        characteristics,
    })
}
