#![allow(dead_code)]

use chrono::NaiveDate;
use faktura_codec::codes::*;
use faktura_codec::core::*;
use rust_decimal_macros::dec;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Comfort-level domestic invoice with two lines, two VAT rates, a
/// seller contact, one creditor account and one payment term. The buyer
/// has no contact.
pub fn create_invoice() -> InvoiceDescriptor {
    let mut desc = InvoiceDescriptor::new("471102", Some(date(2018, 3, 5)), CurrencyCode::EUR);
    desc.add_note("Rechnung gemäß Bestellung vom 01.03.2018.");
    desc.add_note("Lieferant GmbH\nLieferantenstraße 20\n80333 München");
    desc.buyer_reference = Some("04011000-12345-34".into());
    desc.order_no = Some("AB-312".into());

    let line = desc.add_trade_line_item(
        "Trennblätter A4",
        QuantityCode::Piece,
        dec!(20),
        dec!(9.90),
    );
    line.global_id = Some(GlobalId {
        scheme_id: "0160".into(),
        id: "4012345001235".into(),
    });
    line.seller_assigned_id = Some("TB100A4".into());
    line.gross_unit_price = Some(dec!(11.781));
    line.comment = Some("Vorab geliefert".into());
    line.tax_percent = dec!(19);

    let line = desc.add_trade_line_item("Joghurt Banane", QuantityCode::Piece, dec!(50), dec!(5.50));
    line.global_id = Some(GlobalId {
        scheme_id: "0160".into(),
        id: "4000050986428".into(),
    });
    line.seller_assigned_id = Some("ARNR2".into());
    line.description = Some("Becher 150 g".into());
    line.gross_unit_price = Some(dec!(5.50));
    line.tax_percent = dec!(7);

    desc.set_seller(
        Party::new("Lieferant GmbH")
            .with_id("549910")
            .with_street("Lieferantenstraße 20")
            .with_postcode("80333")
            .with_city("München")
            .with_country("DE"),
    );
    desc.set_seller_contact(
        Contact::new("Max Mustermann")
            .with_phone("+49 89 123456")
            .with_email("max@lieferant.de"),
    );
    desc.add_seller_tax_registration("201/113/40209", TaxRegistrationScheme::FiscalNumber);
    desc.add_seller_tax_registration("DE123456789", TaxRegistrationScheme::VatId);

    desc.set_buyer(
        Party::new("Kunde GmbH")
            .with_id("GE2020211")
            .with_street("Kundenstraße 15")
            .with_postcode("69876")
            .with_city("Frankfurt")
            .with_country("DE"),
    );

    desc.actual_delivery_date = Some(date(2018, 3, 5));

    desc.add_applicable_trade_tax(
        dec!(275.00),
        dec!(7),
        TaxType::ValueAddedTax,
        TaxCategoryCode::StandardRate,
        None,
    );
    desc.add_applicable_trade_tax(
        dec!(198.00),
        dec!(19),
        TaxType::ValueAddedTax,
        TaxCategoryCode::StandardRate,
        None,
    );

    desc.set_payment_means(PaymentMeansTypeCode::SepaCreditTransfer, Some("Überweisung".into()));
    desc.add_creditor_financial_account(
        "DE02120300000000202051",
        Some("BYLADEM1001".into()),
        Some("Kunden AG".into()),
    );
    desc.add_trade_payment_terms(
        "Zahlbar innerhalb 30 Tagen netto bis 04.04.2018",
        Some(date(2018, 4, 4)),
    );

    desc.totals = MonetarySummation {
        line_total: Some(dec!(473.00)),
        charge_total: Some(dec!(0.00)),
        allowance_total: Some(dec!(0.00)),
        tax_basis: Some(dec!(473.00)),
        tax_total: Some(dec!(56.87)),
        grand_total: Some(dec!(529.87)),
        total_prepaid: Some(dec!(0.00)),
        due_payable: Some(dec!(529.87)),
    };

    desc
}

/// Leading whitespace of a line.
pub fn indentation(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}
