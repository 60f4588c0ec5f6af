use chrono::NaiveDate;
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

use faktura_codec::codes::*;
use faktura_codec::core::*;
use faktura_codec::profile::{Profile, Version};
use faktura_codec::syntax::Format;

fn test_date() -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 6, 15)
}

fn build_invoice(lines: usize) -> InvoiceDescriptor {
    let mut invoice = InvoiceDescriptor::new("BENCH-001", test_date(), CurrencyCode::EUR);
    invoice.set_seller(
        Party::new("Benchmark GmbH")
            .with_street("Hauptstr. 1")
            .with_postcode("10115")
            .with_city("Berlin")
            .with_country("DE"),
    );
    invoice.add_seller_tax_registration("DE123456789", TaxRegistrationScheme::VatId);
    invoice.set_buyer(
        Party::new("Kunde AG")
            .with_street("Leopoldstr. 42")
            .with_postcode("80331")
            .with_city("München")
            .with_country("DE"),
    );

    for i in 1..=lines {
        invoice
            .add_trade_line_item(format!("Service item {i}"), QuantityCode::Hour, dec!(5), dec!(120))
            .add_applicable_product_characteristic("Stufe", "Senior");
    }
    let basis = dec!(600) * rust_decimal::Decimal::from(lines as u64);
    invoice.add_applicable_trade_tax(
        basis,
        dec!(19),
        TaxType::ValueAddedTax,
        TaxCategoryCode::StandardRate,
        None,
    );
    invoice.add_creditor_financial_account("DE89370400440532013000", Some("COBADEFFXXX".into()), None);
    invoice.payment_terms.push(PaymentTerm::skonto(14, dec!(2), None));
    invoice
}

fn bench_build_invoice(c: &mut Criterion) {
    c.bench_function("build_invoice_10_lines", |b| {
        b.iter(|| black_box(build_invoice(10)));
    });
}

fn bench_serialize(c: &mut Criterion) {
    let invoice = build_invoice(10);
    for format in [Format::Cii, Format::Ubl] {
        c.bench_function(&format!("{format}_serialize"), |b| {
            b.iter(|| {
                black_box(faktura_codec::write(
                    black_box(&invoice),
                    Version::V23,
                    Profile::XRechnung,
                    format,
                ))
            });
        });
    }
}

fn bench_parse(c: &mut Criterion) {
    let invoice = build_invoice(10);
    for format in [Format::Cii, Format::Ubl] {
        let xml = faktura_codec::write(&invoice, Version::V23, Profile::XRechnung, format).unwrap();
        c.bench_function(&format!("{format}_parse"), |b| {
            b.iter(|| black_box(faktura_codec::read(black_box(&xml))));
        });
    }
}

fn bench_inspect(c: &mut Criterion) {
    let xml = faktura_codec::write(&build_invoice(10), Version::V23, Profile::Extended, Format::Cii)
        .unwrap();
    c.bench_function("inspect", |b| {
        b.iter(|| black_box(faktura_codec::inspect(black_box(&xml))));
    });
}

fn bench_serialize_1000_lines(c: &mut Criterion) {
    let invoice = build_invoice(1000);
    c.bench_function("ubl_serialize_1000_lines", |b| {
        b.iter(|| {
            black_box(faktura_codec::write(
                black_box(&invoice),
                Version::V23,
                Profile::XRechnung,
                Format::Ubl,
            ))
        });
    });
}

fn bench_parse_1000_lines(c: &mut Criterion) {
    let xml = faktura_codec::write(&build_invoice(1000), Version::V23, Profile::Extended, Format::Cii)
        .unwrap();
    c.bench_function("cii_parse_1000_lines", |b| {
        b.iter(|| black_box(faktura_codec::read(black_box(&xml))));
    });
}

criterion_group!(
    benches,
    bench_build_invoice,
    bench_serialize,
    bench_parse,
    bench_inspect,
    bench_serialize_1000_lines,
    bench_parse_1000_lines,
);
criterion_main!(benches);
