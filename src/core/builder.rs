use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::types::*;
use crate::codes::{
    AdditionalReferencedDocumentTypeCode, CurrencyCode, PaymentMeansTypeCode, QuantityCode,
    TaxCategoryCode, TaxRegistrationScheme, TaxType,
};

/// Construction API for [`InvoiceDescriptor`].
///
/// ```
/// use chrono::NaiveDate;
/// use faktura_codec::codes::*;
/// use faktura_codec::core::*;
/// use rust_decimal_macros::dec;
///
/// let mut invoice = InvoiceDescriptor::new(
///     "471102",
///     NaiveDate::from_ymd_opt(2024, 6, 15),
///     CurrencyCode::EUR,
/// );
/// invoice.set_seller(Party::new("Lieferant GmbH").with_city("München").with_country("DE"));
/// invoice
///     .add_trade_line_item("Trennblätter A4", QuantityCode::Piece, dec!(20), dec!(9.90))
///     .add_applicable_product_characteristic("Farbe", "blau");
/// invoice.add_applicable_trade_tax(
///     dec!(198.00),
///     dec!(19),
///     TaxType::ValueAddedTax,
///     TaxCategoryCode::StandardRate,
///     None,
/// );
/// assert_eq!(invoice.trade_line_items[0].line_id, "1");
/// assert_eq!(invoice.taxes[0].tax_amount().unwrap(), dec!(37.62));
/// ```
impl InvoiceDescriptor {
    pub fn new(
        invoice_no: impl Into<String>,
        invoice_date: Option<NaiveDate>,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            invoice_no: invoice_no.into(),
            invoice_date,
            currency,
            ..Self::default()
        }
    }

    pub fn add_note(&mut self, note: impl Into<String>) -> &mut Self {
        self.notes.push(note.into());
        self
    }

    pub fn set_seller(&mut self, seller: Party) -> &mut Self {
        self.seller = seller;
        self
    }

    pub fn set_seller_contact(&mut self, contact: Contact) -> &mut Self {
        self.seller_contact = Some(contact);
        self
    }

    pub fn add_seller_tax_registration(
        &mut self,
        no: impl Into<String>,
        scheme: TaxRegistrationScheme,
    ) -> &mut Self {
        self.seller_tax_registrations.push(TaxRegistration {
            scheme,
            no: no.into(),
        });
        self
    }

    pub fn set_buyer(&mut self, buyer: Party) -> &mut Self {
        self.buyer = Some(buyer);
        self
    }

    pub fn set_buyer_contact(&mut self, contact: Contact) -> &mut Self {
        self.buyer_contact = Some(contact);
        self
    }

    pub fn add_buyer_tax_registration(
        &mut self,
        no: impl Into<String>,
        scheme: TaxRegistrationScheme,
    ) -> &mut Self {
        self.buyer_tax_registrations.push(TaxRegistration {
            scheme,
            no: no.into(),
        });
        self
    }

    pub fn set_invoicee(&mut self, invoicee: Party) -> &mut Self {
        self.invoicee = Some(invoicee);
        self
    }

    /// Append a line item with a standard-rate VAT of 19 %. The line id is
    /// the next free position; tax and product details are adjusted through
    /// the returned reference.
    pub fn add_trade_line_item(
        &mut self,
        name: impl Into<String>,
        unit: QuantityCode,
        billed_quantity: Decimal,
        net_unit_price: Decimal,
    ) -> &mut TradeLineItem {
        let line_id = (self.trade_line_items.len() + 1).to_string();
        self.trade_line_items.push(TradeLineItem {
            line_id,
            global_id: None,
            seller_assigned_id: None,
            buyer_assigned_id: None,
            name: name.into(),
            description: None,
            comment: None,
            unit,
            billed_quantity,
            net_unit_price,
            gross_unit_price: None,
            line_total: None,
            tax_type: TaxType::ValueAddedTax,
            tax_category: TaxCategoryCode::StandardRate,
            tax_percent: Decimal::from(19),
            characteristics: Vec::new(),
        });
        let last = self.trade_line_items.len() - 1;
        &mut self.trade_line_items[last]
    }

    pub fn add_applicable_trade_tax(
        &mut self,
        basis_amount: Decimal,
        percent: Decimal,
        tax_type: TaxType,
        category: TaxCategoryCode,
        allowance_charge_basis_amount: Option<Decimal>,
    ) -> &mut Tax {
        self.taxes.push(Tax {
            tax_type,
            category,
            basis_amount: Some(basis_amount),
            percent,
            allowance_charge_basis_amount,
            exemption_reason: None,
            exemption_reason_code: None,
        });
        let last = self.taxes.len() - 1;
        &mut self.taxes[last]
    }

    /// Add a document-level allowance (`is_discount = true`) or charge.
    pub fn add_trade_allowance_charge(
        &mut self,
        is_discount: bool,
        basis_amount: Option<Decimal>,
        currency: CurrencyCode,
        amount: Decimal,
        reason: impl Into<String>,
        tax: AllowanceChargeTax,
    ) -> &mut TradeAllowanceCharge {
        self.trade_allowance_charges.push(TradeAllowanceCharge {
            charge_indicator: !is_discount,
            basis_amount,
            currency,
            amount,
            percentage: None,
            reason: Some(reason.into()),
            reason_code: None,
            tax,
        });
        let last = self.trade_allowance_charges.len() - 1;
        &mut self.trade_allowance_charges[last]
    }

    pub fn add_trade_payment_terms(
        &mut self,
        description: impl Into<String>,
        due_date: Option<NaiveDate>,
    ) -> &mut Self {
        self.payment_terms.push(PaymentTerm {
            description: description.into(),
            due_date,
        });
        self
    }

    pub fn clear_trade_payment_terms(&mut self) -> &mut Self {
        self.payment_terms.clear();
        self
    }

    pub fn set_payment_means(
        &mut self,
        type_code: PaymentMeansTypeCode,
        information: Option<String>,
    ) -> &mut Self {
        let accounts = self
            .payment_means
            .take()
            .map(|m| m.creditor_accounts)
            .unwrap_or_default();
        self.payment_means = Some(PaymentMeans {
            type_code,
            information,
            creditor_accounts: accounts,
        });
        self
    }

    /// Add a creditor account. Creates SEPA credit transfer payment means
    /// if none are set yet.
    pub fn add_creditor_financial_account(
        &mut self,
        iban: impl Into<String>,
        bic: Option<String>,
        name: Option<String>,
    ) -> &mut Self {
        let means = self.payment_means.get_or_insert_with(|| PaymentMeans {
            type_code: PaymentMeansTypeCode::SepaCreditTransfer,
            information: None,
            creditor_accounts: Vec::new(),
        });
        means.creditor_accounts.push(BankAccount {
            iban: iban.into(),
            bic,
            name,
        });
        self
    }

    pub fn add_additional_referenced_document(
        &mut self,
        id: impl Into<String>,
        type_code: AdditionalReferencedDocumentTypeCode,
        name: Option<String>,
        attachment: Option<Vec<u8>>,
        filename: Option<String>,
    ) -> &mut AdditionalReferencedDocument {
        self.additional_referenced_documents
            .push(AdditionalReferencedDocument {
                id: id.into(),
                type_code,
                name,
                filename,
                attachment,
            });
        let last = self.additional_referenced_documents.len() - 1;
        &mut self.additional_referenced_documents[last]
    }
}

impl Party {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn with_postcode(mut self, postcode: impl Into<String>) -> Self {
        self.postcode = Some(postcode.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }
}

impl Contact {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}
