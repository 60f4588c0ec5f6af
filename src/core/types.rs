use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use serde::{Deserialize, Serialize};

use super::InvoiceError;
use crate::codes::{
    AdditionalReferencedDocumentTypeCode, AllowanceChargeReasonCode, CurrencyCode, InvoiceType,
    PaymentMeansTypeCode, QuantityCode, TaxCategoryCode, TaxRegistrationScheme, TaxType,
};

/// BG-0: Invoice — the root aggregate every writer and reader maps to and from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvoiceDescriptor {
    /// BT-1: Invoice number.
    pub invoice_no: String,
    /// BT-2: Invoice issue date.
    pub invoice_date: Option<NaiveDate>,
    /// BT-3: Invoice type code (UNTDID 1001).
    pub type_code: InvoiceType,
    /// BT-5: Invoice currency code.
    pub currency: CurrencyCode,
    /// BT-22: Header notes.
    pub notes: Vec<String>,
    /// BT-10: Buyer reference (Leitweg-ID for XRechnung).
    pub buyer_reference: Option<String>,
    /// BT-13: Purchase order reference.
    pub order_no: Option<String>,
    /// BG-4: Seller.
    pub seller: Party,
    /// BG-6: Seller contact.
    pub seller_contact: Option<Contact>,
    /// BT-31 / BT-32: Seller tax registrations.
    pub seller_tax_registrations: Vec<TaxRegistration>,
    /// BG-7: Buyer.
    pub buyer: Option<Party>,
    /// BG-9: Buyer contact.
    pub buyer_contact: Option<Contact>,
    /// BT-48: Buyer tax registrations.
    pub buyer_tax_registrations: Vec<TaxRegistration>,
    /// Invoicee (Rechnungsempfänger), Extended only.
    pub invoicee: Option<Party>,
    /// BT-72: Actual delivery date.
    pub actual_delivery_date: Option<NaiveDate>,
    /// BG-25: Invoice lines.
    pub trade_line_items: Vec<TradeLineItem>,
    /// BG-23: VAT breakdown.
    pub taxes: Vec<Tax>,
    /// BG-20 / BG-21: Document-level allowances and charges.
    pub trade_allowance_charges: Vec<TradeAllowanceCharge>,
    /// BT-20 / BT-9: Payment terms.
    pub payment_terms: Vec<PaymentTerm>,
    /// BG-16: Payment instructions.
    pub payment_means: Option<PaymentMeans>,
    /// BG-24 / BT-17 / BT-18: Additional supporting documents.
    pub additional_referenced_documents: Vec<AdditionalReferencedDocument>,
    /// BG-22: Document totals.
    pub totals: MonetarySummation,
}

/// BG-4 / BG-7: Party (seller, buyer or invoicee).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Party {
    /// BT-29 / BT-46: Party identifier.
    pub id: Option<String>,
    /// BT-27 / BT-44: Name.
    pub name: String,
    /// BT-35 / BT-50: Street + house number.
    pub street: Option<String>,
    /// BT-38 / BT-53: Postal code.
    pub postcode: Option<String>,
    /// BT-37 / BT-52: City.
    pub city: Option<String>,
    /// BT-40 / BT-55: Country code (ISO 3166-1 alpha-2).
    pub country: Option<String>,
}

/// BG-6 / BG-9: Contact information.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// BT-41 / BT-56: Contact point name.
    pub name: Option<String>,
    /// BT-42 / BT-57: Telephone.
    pub phone: Option<String>,
    /// BT-43 / BT-58: Email.
    pub email: Option<String>,
}

impl Contact {
    pub(crate) fn is_empty(&self) -> bool {
        self.name.is_none() && self.phone.is_none() && self.email.is_none()
    }
}

/// A tax registration of a party.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxRegistration {
    pub scheme: TaxRegistrationScheme,
    pub no: String,
}

/// BT-157: Standard item identifier with its scheme (e.g. "0160" for GTIN).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GlobalId {
    pub scheme_id: String,
    pub id: String,
}

/// BG-32: Item attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCharacteristic {
    /// BT-160: Attribute name.
    pub description: String,
    /// BT-161: Attribute value.
    pub value: String,
}

/// BG-25: Invoice line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeLineItem {
    /// BT-126: Line identifier.
    pub line_id: String,
    /// BT-157: Standard item identifier.
    pub global_id: Option<GlobalId>,
    /// BT-155: Seller's item identifier.
    pub seller_assigned_id: Option<String>,
    /// BT-156: Buyer's item identifier.
    pub buyer_assigned_id: Option<String>,
    /// BT-153: Item name.
    pub name: String,
    /// BT-154: Item description.
    pub description: Option<String>,
    /// BT-127: Line note.
    pub comment: Option<String>,
    /// BT-130: Unit of measure.
    pub unit: QuantityCode,
    /// BT-129: Invoiced quantity.
    pub billed_quantity: Decimal,
    /// BT-146: Item net price.
    pub net_unit_price: Decimal,
    /// BT-148: Item gross price.
    pub gross_unit_price: Option<Decimal>,
    /// BT-131: Line net amount. When unset, writers derive it from
    /// quantity and net price.
    pub line_total: Option<Decimal>,
    /// Tax type of the line (normally VAT).
    pub tax_type: TaxType,
    /// BT-151: Tax category.
    pub tax_category: TaxCategoryCode,
    /// BT-152: Tax rate.
    pub tax_percent: Decimal,
    /// BG-32: Item attributes, in document order.
    pub characteristics: Vec<ProductCharacteristic>,
}

impl TradeLineItem {
    /// Line total as written: the explicit total or quantity × net price.
    ///
    /// Fails with a validation error when the product leaves the decimal
    /// range.
    pub fn effective_line_total(&self) -> Result<Decimal, InvoiceError> {
        match self.line_total {
            Some(total) => Ok(total),
            None => self
                .billed_quantity
                .checked_mul(self.net_unit_price)
                .map(round2)
                .ok_or_else(|| {
                    out_of_range(
                        "LineTotalAmount",
                        format!("line {}: quantity × net price", self.line_id),
                    )
                }),
        }
    }

    pub fn add_applicable_product_characteristic(
        &mut self,
        description: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.characteristics.push(ProductCharacteristic {
            description: description.into(),
            value: value.into(),
        });
        self
    }
}

/// BG-23: VAT breakdown entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tax {
    pub tax_type: TaxType,
    /// BT-118: Tax category.
    pub category: TaxCategoryCode,
    /// BT-116: Taxable amount.
    pub basis_amount: Option<Decimal>,
    /// BT-119: Tax rate.
    pub percent: Decimal,
    /// Basis amount for allowances/charges in this category. Only set when
    /// the source document supplied it.
    pub allowance_charge_basis_amount: Option<Decimal>,
    /// BT-120: Exemption reason text.
    pub exemption_reason: Option<String>,
    /// BT-121: Exemption reason code.
    pub exemption_reason_code: Option<String>,
}

impl Tax {
    /// BT-117: Tax amount, basis × rate rounded to cents.
    pub fn tax_amount(&self) -> Result<Decimal, InvoiceError> {
        self.basis_amount
            .unwrap_or_default()
            .checked_mul(self.percent)
            .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
            .map(round2)
            .ok_or_else(|| {
                out_of_range(
                    "TaxAmount",
                    format!("{}% of the basis amount", self.percent),
                )
            })
    }
}

/// Tax applied to a document-level allowance or charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllowanceChargeTax {
    pub tax_type: TaxType,
    /// BT-95 / BT-102: Tax category.
    pub category: TaxCategoryCode,
    /// BT-96 / BT-103: Tax rate.
    pub percent: Decimal,
}

/// BG-20 / BG-21: Document-level allowance or charge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeAllowanceCharge {
    /// `true` for a charge, `false` for an allowance (discount).
    pub charge_indicator: bool,
    /// BT-93 / BT-100: Base amount.
    pub basis_amount: Option<Decimal>,
    pub currency: CurrencyCode,
    /// BT-92 / BT-99: Amount.
    pub amount: Decimal,
    /// BT-94 / BT-101: Percentage.
    pub percentage: Option<Decimal>,
    /// BT-97 / BT-104: Reason text.
    pub reason: Option<String>,
    /// BT-98 / BT-105: Reason code.
    pub reason_code: Option<AllowanceChargeReasonCode>,
    pub tax: AllowanceChargeTax,
}

/// Prefix of a Skonto payment-term line.
pub const SKONTO_PREFIX: &str = "#SKONTO#";

/// BT-20: Payment term with an optional due date (BT-9).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentTerm {
    pub description: String,
    pub due_date: Option<NaiveDate>,
}

/// Decoded Skonto (early payment discount) term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Skonto {
    pub days: u32,
    pub percent: Decimal,
    pub basis_amount: Option<Decimal>,
}

impl PaymentTerm {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            due_date: None,
        }
    }

    /// Build a Skonto term: `#SKONTO#TAGE#14#PROZENT=2.00#BASISBETRAG=123.45#`.
    pub fn skonto(days: u32, percent: Decimal, basis_amount: Option<Decimal>) -> Self {
        let mut description = format!("{SKONTO_PREFIX}TAGE#{days}#PROZENT={}#", two_places(percent));
        if let Some(basis) = basis_amount {
            description.push_str(&format!("BASISBETRAG={}#", two_places(basis)));
        }
        Self::new(description)
    }

    pub fn is_skonto(&self) -> bool {
        self.description.trim_start().starts_with(SKONTO_PREFIX)
    }

    /// Decode a Skonto line. Returns `None` for free-text terms or
    /// malformed Skonto lines.
    pub fn parse_skonto(&self) -> Option<Skonto> {
        let body = self.description.trim().strip_prefix(SKONTO_PREFIX)?;
        let mut days = None;
        let mut percent = None;
        let mut basis_amount = None;

        let mut parts = body.split('#').filter(|p| !p.is_empty());
        while let Some(part) = parts.next() {
            if part == "TAGE" {
                days = parts.next()?.parse().ok();
            } else if let Some(v) = part.strip_prefix("TAGE=") {
                days = v.parse().ok();
            } else if let Some(v) = part.strip_prefix("PROZENT=") {
                percent = v.parse().ok();
            } else if let Some(v) = part.strip_prefix("BASISBETRAG=") {
                basis_amount = Some(v.parse().ok()?);
            }
        }

        Some(Skonto {
            days: days?,
            percent: percent?,
            basis_amount,
        })
    }
}

/// BG-16: Payment instructions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMeans {
    /// BT-81: Payment means type.
    pub type_code: PaymentMeansTypeCode,
    /// BT-82: Payment means text.
    pub information: Option<String>,
    /// BG-17: Credit transfer accounts.
    pub creditor_accounts: Vec<BankAccount>,
}

/// BG-17: Credit transfer account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    /// BT-84: IBAN.
    pub iban: String,
    /// BT-86: BIC.
    pub bic: Option<String>,
    /// BT-85: Account name.
    pub name: Option<String>,
}

/// BG-24: Additional supporting document, optionally with an embedded file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdditionalReferencedDocument {
    /// BT-122: Document reference.
    pub id: String,
    pub type_code: AdditionalReferencedDocumentTypeCode,
    /// BT-123: Description.
    pub name: Option<String>,
    /// BT-125-2: Attachment filename.
    pub filename: Option<String>,
    /// BT-125: Attachment content, base64 on the wire.
    pub attachment: Option<Vec<u8>>,
}

impl AdditionalReferencedDocument {
    /// MIME code for the attachment, derived from the filename extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = self
            .filename
            .as_deref()
            .and_then(|f| f.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("csv") => "text/csv",
            Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Some("ods") => "application/vnd.oasis.opendocument.spreadsheet",
            Some("xml") => "application/xml",
            _ => "application/octet-stream",
        }
    }
}

/// BG-22: Document totals. Amounts the caller sets are written as given;
/// the mandatory ones left unset are derived when the invoice is written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonetarySummation {
    /// BT-106: Sum of line net amounts.
    pub line_total: Option<Decimal>,
    /// BT-108: Sum of charges.
    pub charge_total: Option<Decimal>,
    /// BT-107: Sum of allowances.
    pub allowance_total: Option<Decimal>,
    /// BT-109: Total without VAT.
    pub tax_basis: Option<Decimal>,
    /// BT-110: Total VAT.
    pub tax_total: Option<Decimal>,
    /// BT-112: Total with VAT.
    pub grand_total: Option<Decimal>,
    /// BT-113: Paid amount.
    pub total_prepaid: Option<Decimal>,
    /// BT-115: Amount due for payment.
    pub due_payable: Option<Decimal>,
}

pub(crate) fn out_of_range(field: &str, what: impl std::fmt::Display) -> InvoiceError {
    InvoiceError::invalid(field, format!("{what} exceeds the decimal range"))
}

pub(crate) fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

fn two_places(value: Decimal) -> String {
    format!("{:.2}", round2(value))
}
