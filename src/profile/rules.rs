//! Declarative rule table: which optional blocks and which code values a
//! (version, profile, syntax) combination may carry.
//!
//! Writers never consult profiles themselves. They serialize the copy
//! produced by [`ProfileRules::restrict`], so suppression and rewriting
//! happen in one place for both syntaxes.

use rust_decimal::Decimal;
use tracing::trace;

use super::{Profile, Version};
use crate::codes::{CurrencyCode, InvoiceType, TaxCategoryCode, TaxType};
use crate::core::{InvoiceDescriptor, InvoiceError, PaymentTerm, TradeLineItem, out_of_range};
use crate::syntax::Format;

/// An optional part of an invoice that a profile may permit or forbid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Block {
    HeaderNotes,
    OrderReference,
    DeliveryDate,
    LineItems,
    LineNotes,
    ProductIdentifiers,
    ProductDescription,
    ProductCharacteristics,
    GrossPrice,
    AllowanceCharges,
    PaymentMeans,
    PaymentTerms,
    /// One payment-terms element per term instead of one combined note.
    SeparatePaymentTermBlocks,
    TaxExemptionReason,
    TaxAllowanceChargeBasisAmount,
    SellerContact,
    BuyerContact,
    Invoicee,
    AdditionalReferencedDocuments,
    Attachments,
}

/// Set of [`Block`]s as a bit mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BlockSet(u32);

impl BlockSet {
    const EMPTY: BlockSet = BlockSet(0);

    const fn with(self, blocks: &[Block]) -> BlockSet {
        let mut bits = self.0;
        let mut i = 0;
        while i < blocks.len() {
            bits |= 1 << blocks[i] as u8;
            i += 1;
        }
        BlockSet(bits)
    }

    const fn contains(self, block: Block) -> bool {
        self.0 & (1 << block as u8) != 0
    }
}

const MINIMUM: BlockSet = BlockSet::EMPTY.with(&[Block::OrderReference]);

const BASIC_WL: BlockSet = MINIMUM.with(&[
    Block::HeaderNotes,
    Block::DeliveryDate,
    Block::AllowanceCharges,
    Block::PaymentMeans,
    Block::PaymentTerms,
    Block::TaxExemptionReason,
]);

const BASIC: BlockSet = BASIC_WL.with(&[Block::LineItems, Block::LineNotes, Block::GrossPrice]);

const COMFORT: BlockSet = BASIC.with(&[
    Block::ProductIdentifiers,
    Block::ProductDescription,
    Block::ProductCharacteristics,
    Block::SellerContact,
    Block::BuyerContact,
    Block::AdditionalReferencedDocuments,
    Block::Attachments,
]);

const EXTENDED: BlockSet = COMFORT.with(&[
    Block::SeparatePaymentTermBlocks,
    Block::TaxAllowanceChargeBasisAmount,
    Block::Invoicee,
]);

/// Blocks the UBL syntax has no element for.
const UBL_UNSUPPORTED: BlockSet = BlockSet::EMPTY.with(&[
    Block::Invoicee,
    Block::SeparatePaymentTermBlocks,
    Block::TaxAllowanceChargeBasisAmount,
]);

/// EN 16931 VAT category codes (UNTDID 5305 subset).
const EN16931_TAX_CATEGORIES: &[TaxCategoryCode] = &[
    TaxCategoryCode::StandardRate,
    TaxCategoryCode::ZeroRated,
    TaxCategoryCode::Exempt,
    TaxCategoryCode::ReverseCharge,
    TaxCategoryCode::IntraCommunitySupply,
    TaxCategoryCode::FreeExport,
    TaxCategoryCode::NotSubjectToVat,
    TaxCategoryCode::CanaryIslands,
    TaxCategoryCode::CeutaMelilla,
];

const VAT_ONLY: &[TaxType] = &[TaxType::ValueAddedTax];

const CII_ONLY: &[Format] = &[Format::Cii];
const CII_AND_UBL: &[Format] = &[Format::Cii, Format::Ubl];

/// Permissions of one (version, profile) combination.
#[derive(Debug)]
pub struct ProfileRules {
    pub version: Version,
    pub profile: Profile,
    formats: &'static [Format],
    blocks: BlockSet,
    /// `None` permits every code of the list.
    tax_categories: Option<&'static [TaxCategoryCode]>,
    tax_types: Option<&'static [TaxType]>,
    all_invoice_types: bool,
}

const fn entry(
    version: Version,
    profile: Profile,
    formats: &'static [Format],
    blocks: BlockSet,
) -> ProfileRules {
    let extended = matches!(profile, Profile::Extended);
    let xrechnung = matches!(profile, Profile::XRechnung | Profile::XRechnung1);
    ProfileRules {
        version,
        profile,
        formats,
        blocks,
        tax_categories: if extended {
            None
        } else {
            Some(EN16931_TAX_CATEGORIES)
        },
        tax_types: if extended || xrechnung {
            None
        } else {
            Some(VAT_ONLY)
        },
        all_invoice_types: extended,
    }
}

static RULES: &[ProfileRules] = &[
    entry(Version::V20, Profile::Minimum, CII_ONLY, MINIMUM),
    entry(Version::V20, Profile::BasicWL, CII_ONLY, BASIC_WL),
    entry(Version::V20, Profile::Basic, CII_ONLY, BASIC),
    entry(Version::V20, Profile::Comfort, CII_ONLY, COMFORT),
    entry(Version::V20, Profile::Extended, CII_ONLY, EXTENDED),
    entry(Version::V20, Profile::XRechnung1, CII_ONLY, COMFORT),
    entry(Version::V20, Profile::XRechnung, CII_ONLY, COMFORT),
    entry(Version::V23, Profile::Minimum, CII_ONLY, MINIMUM),
    entry(Version::V23, Profile::BasicWL, CII_ONLY, BASIC_WL),
    entry(Version::V23, Profile::Basic, CII_AND_UBL, BASIC),
    entry(Version::V23, Profile::Comfort, CII_AND_UBL, COMFORT),
    entry(Version::V23, Profile::Extended, CII_AND_UBL, EXTENDED),
    entry(Version::V23, Profile::XRechnung1, CII_AND_UBL, COMFORT),
    entry(Version::V23, Profile::XRechnung, CII_AND_UBL, COMFORT),
];

/// Every (version, profile, syntax) triple the rule table lists, restricted
/// to the syntaxes compiled in.
pub fn supported() -> Vec<(Version, Profile, Format)> {
    RULES
        .iter()
        .flat_map(|r| {
            r.formats
                .iter()
                .filter(|f| f.is_enabled())
                .map(move |f| (r.version, r.profile, *f))
        })
        .collect()
}

/// Whether `block` is permitted for (version, profile). Fails with a
/// configuration error for a combination the table does not list.
pub fn is_allowed(version: Version, profile: Profile, block: Block) -> Result<bool, InvoiceError> {
    let rules = RULES
        .iter()
        .find(|r| r.version == version && r.profile == profile)
        .ok_or_else(|| unsupported(version, profile, None))?;
    Ok(rules.blocks.contains(block))
}

fn unsupported(version: Version, profile: Profile, format: Option<Format>) -> InvoiceError {
    match format {
        Some(format) => InvoiceError::Configuration(format!(
            "unsupported combination: version {version:?}, profile {profile:?}, format {format}"
        )),
        None => InvoiceError::Configuration(format!(
            "unsupported combination: version {version:?}, profile {profile:?}"
        )),
    }
}

impl ProfileRules {
    /// Look up the rules for a (version, profile, syntax) triple.
    pub fn lookup(
        version: Version,
        profile: Profile,
        format: Format,
    ) -> Result<&'static ProfileRules, InvoiceError> {
        RULES
            .iter()
            .find(|r| {
                r.version == version
                    && r.profile == profile
                    && r.formats.contains(&format)
                    && format.is_enabled()
            })
            .ok_or_else(|| unsupported(version, profile, Some(format)))
    }

    /// Whether `block` may be written in `format` under these rules.
    pub fn allows(&self, block: Block, format: Format) -> bool {
        self.blocks.contains(block) && !(format == Format::Ubl && UBL_UNSUPPORTED.contains(block))
    }

    pub fn allows_tax_category(&self, category: TaxCategoryCode) -> bool {
        self.tax_categories.is_none_or(|list| list.contains(&category))
    }

    pub fn allows_tax_type(&self, tax_type: TaxType) -> bool {
        self.tax_types.is_none_or(|list| list.contains(&tax_type))
    }

    /// Invoice type as written: codes outside the profile's subset become
    /// a commercial invoice.
    pub fn invoice_type(&self, type_code: InvoiceType) -> InvoiceType {
        if self.all_invoice_types || type_code != InvoiceType::InvoiceInformation {
            type_code
        } else {
            InvoiceType::Invoice
        }
    }

    fn allows_tax(&self, tax_type: TaxType, category: TaxCategoryCode) -> bool {
        self.allows_tax_type(tax_type) && self.allows_tax_category(category)
    }

    /// The invoice as it will be written: forbidden blocks removed, records
    /// with codes outside the profile's subsets omitted, codes rewritten
    /// and values the syntax cannot express normalized. Mandatory totals the
    /// caller left unset are derived from the restricted content.
    ///
    /// Reading the written document yields exactly this value. Fails only
    /// when a derived amount leaves the decimal range.
    pub fn restrict(
        &self,
        invoice: &InvoiceDescriptor,
        format: Format,
    ) -> Result<InvoiceDescriptor, InvoiceError> {
        let allowed = |block: Block| {
            let ok = self.allows(block, format);
            if !ok {
                trace!(?block, profile = ?self.profile, %format, "block not permitted");
            }
            ok
        };
        let mut out = invoice.clone();

        out.type_code = self.invoice_type(invoice.type_code);
        if out.type_code != invoice.type_code {
            trace!(from = invoice.type_code.code(), to = out.type_code.code(), "invoice type rewritten");
        }

        if allowed(Block::HeaderNotes) {
            out.notes = invoice.notes.iter().map(|n| n.trim().to_string()).collect();
        } else {
            out.notes.clear();
        }
        if !allowed(Block::OrderReference) {
            out.order_no = None;
        }
        if !allowed(Block::DeliveryDate) {
            out.actual_delivery_date = None;
        }

        if !allowed(Block::SellerContact) {
            out.seller_contact = None;
        }
        out.seller_contact = out.seller_contact.filter(|c| !c.is_empty());
        if out.buyer.is_none() || !allowed(Block::BuyerContact) {
            out.buyer_contact = None;
        }
        out.buyer_contact = out.buyer_contact.filter(|c| !c.is_empty());
        if out.buyer.is_none() {
            out.buyer_tax_registrations.clear();
        }
        if !allowed(Block::Invoicee) {
            out.invoicee = None;
        }

        out.trade_line_items = if allowed(Block::LineItems) {
            invoice
                .trade_line_items
                .iter()
                .filter(|l| self.keep_record("line item", l.tax_type, l.tax_category))
                .map(|l| self.restrict_line(l, format))
                .collect::<Result<_, _>>()?
        } else {
            Vec::new()
        };

        let exemption = allowed(Block::TaxExemptionReason);
        let acba = allowed(Block::TaxAllowanceChargeBasisAmount);
        out.taxes = invoice
            .taxes
            .iter()
            .filter(|t| self.keep_record("tax", t.tax_type, t.category))
            .cloned()
            .map(|mut t| {
                if !exemption {
                    t.exemption_reason = None;
                    t.exemption_reason_code = None;
                }
                if !acba {
                    t.allowance_charge_basis_amount = None;
                }
                t
            })
            .collect();

        out.trade_allowance_charges = if allowed(Block::AllowanceCharges) {
            invoice
                .trade_allowance_charges
                .iter()
                .filter(|a| self.keep_record("allowance/charge", a.tax.tax_type, a.tax.category))
                .cloned()
                .map(|mut a| {
                    if format == Format::Cii {
                        a.currency = document_currency(invoice.currency, a.currency);
                    }
                    a
                })
                .collect()
        } else {
            Vec::new()
        };

        if !allowed(Block::PaymentMeans) {
            out.payment_means = None;
        }
        out.payment_terms = if allowed(Block::PaymentTerms) {
            normalize_payment_terms(
                &invoice.payment_terms,
                allowed(Block::SeparatePaymentTermBlocks),
            )
        } else {
            Vec::new()
        };

        if allowed(Block::AdditionalReferencedDocuments) {
            let attachments = allowed(Block::Attachments);
            for doc in &mut out.additional_referenced_documents {
                if !attachments {
                    doc.attachment = None;
                }
                if doc.attachment.is_none() {
                    doc.filename = None;
                }
            }
        } else {
            out.additional_referenced_documents.clear();
        }

        self.complete_totals(&mut out, format)?;
        Ok(out)
    }

    /// Fill the document totals every syntax requires (tax basis, tax
    /// total, grand total, amount due and, where lines are carried, the
    /// line total) when the caller left them unset.
    fn complete_totals(
        &self,
        invoice: &mut InvoiceDescriptor,
        format: Format,
    ) -> Result<(), InvoiceError> {
        let mut lines = Decimal::ZERO;
        for line in &invoice.trade_line_items {
            lines = add(lines, line.effective_line_total()?, "LineTotalAmount")?;
        }
        let mut allowances = Decimal::ZERO;
        let mut charges = Decimal::ZERO;
        for ac in &invoice.trade_allowance_charges {
            if ac.charge_indicator {
                charges = add(charges, ac.amount, "ChargeTotalAmount")?;
            } else {
                allowances = add(allowances, ac.amount, "AllowanceTotalAmount")?;
            }
        }
        let mut taxes = Decimal::ZERO;
        for tax in &invoice.taxes {
            taxes = add(taxes, tax.tax_amount()?, "TaxTotalAmount")?;
        }

        let t = &mut invoice.totals;
        if t.line_total.is_none() && self.allows(Block::LineItems, format) {
            t.line_total = Some(lines);
        }
        let tax_basis = match t.tax_basis {
            Some(basis) => basis,
            None => {
                let gross = add(
                    t.line_total.unwrap_or(lines),
                    t.charge_total.unwrap_or(charges),
                    "TaxBasisTotalAmount",
                )?;
                sub(gross, t.allowance_total.unwrap_or(allowances), "TaxBasisTotalAmount")?
            }
        };
        let tax_total = t.tax_total.unwrap_or(taxes);
        let grand_total = match t.grand_total {
            Some(total) => total,
            None => add(tax_basis, tax_total, "GrandTotalAmount")?,
        };
        let due_payable = match t.due_payable {
            Some(due) => due,
            None => sub(
                grand_total,
                t.total_prepaid.unwrap_or(Decimal::ZERO),
                "DuePayableAmount",
            )?,
        };
        t.tax_basis = Some(tax_basis);
        t.tax_total = Some(tax_total);
        t.grand_total = Some(grand_total);
        t.due_payable = Some(due_payable);
        Ok(())
    }

    fn keep_record(&self, what: &str, tax_type: TaxType, category: TaxCategoryCode) -> bool {
        let keep = self.allows_tax(tax_type, category);
        if !keep {
            trace!(
                record = what,
                tax_type = tax_type.code(),
                category = category.code(),
                profile = ?self.profile,
                "record omitted, tax code outside profile subset"
            );
        }
        keep
    }

    fn restrict_line(
        &self,
        line: &TradeLineItem,
        format: Format,
    ) -> Result<TradeLineItem, InvoiceError> {
        let mut out = line.clone();
        out.line_total = Some(line.effective_line_total()?);
        if !self.allows(Block::ProductIdentifiers, format) {
            out.global_id = None;
            out.seller_assigned_id = None;
            out.buyer_assigned_id = None;
        }
        if !self.allows(Block::ProductDescription, format) {
            out.description = None;
        }
        if !self.allows(Block::ProductCharacteristics, format) {
            out.characteristics.clear();
        }
        if !self.allows(Block::LineNotes, format) {
            out.comment = None;
        }
        if !self.allows(Block::GrossPrice, format) {
            out.gross_unit_price = None;
        }
        Ok(out)
    }
}

fn add(a: Decimal, b: Decimal, field: &str) -> Result<Decimal, InvoiceError> {
    a.checked_add(b).ok_or_else(|| out_of_range(field, "sum"))
}

fn sub(a: Decimal, b: Decimal, field: &str) -> Result<Decimal, InvoiceError> {
    a.checked_sub(b).ok_or_else(|| out_of_range(field, "difference"))
}

fn document_currency(document: CurrencyCode, own: CurrencyCode) -> CurrencyCode {
    if own != document {
        trace!(
            from = own.code(),
            to = document.code(),
            "allowance/charge currency rewritten to document currency"
        );
    }
    document
}

/// Payment terms as they travel on the wire.
///
/// Multi-line descriptions become one term per line. In the combined
/// layout the first due date is kept and moved to the first term.
fn normalize_payment_terms(terms: &[PaymentTerm], separate: bool) -> Vec<PaymentTerm> {
    let mut out = Vec::new();
    for term in terms {
        let lines: Vec<&str> = term
            .description
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        if lines.is_empty() {
            if term.due_date.is_some() {
                out.push(PaymentTerm {
                    description: String::new(),
                    due_date: term.due_date,
                });
            }
            continue;
        }
        for (i, line) in lines.into_iter().enumerate() {
            out.push(PaymentTerm {
                description: line.to_string(),
                due_date: if i == 0 { term.due_date } else { None },
            });
        }
    }

    if !separate {
        let due = out.iter().find_map(|t| t.due_date);
        out.retain(|t| !t.description.is_empty());
        for term in &mut out {
            term.due_date = None;
        }
        match out.first_mut() {
            Some(first) => first.due_date = due,
            None => {
                if let Some(due) = due {
                    out.push(PaymentTerm {
                        description: String::new(),
                        due_date: Some(due),
                    });
                }
            }
        }
    }
    out
}

#[cfg(all(test, feature = "cii", feature = "ubl"))]
mod tests {
    use super::*;
    use crate::core::{AllowanceChargeTax, Contact, Party};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn invoice() -> InvoiceDescriptor {
        let mut inv = InvoiceDescriptor::new("1", None, CurrencyCode::EUR);
        inv.set_seller(Party::new("Seller"));
        inv
    }

    #[test]
    fn profile_levels_are_cumulative() {
        assert!(is_allowed(Version::V23, Profile::Minimum, Block::OrderReference).unwrap());
        assert!(!is_allowed(Version::V23, Profile::Minimum, Block::LineItems).unwrap());
        assert!(!is_allowed(Version::V23, Profile::BasicWL, Block::LineItems).unwrap());
        assert!(is_allowed(Version::V23, Profile::Basic, Block::LineItems).unwrap());
        assert!(!is_allowed(Version::V23, Profile::Basic, Block::ProductCharacteristics).unwrap());
        assert!(is_allowed(Version::V23, Profile::Comfort, Block::ProductCharacteristics).unwrap());
        assert!(!is_allowed(Version::V23, Profile::XRechnung, Block::Invoicee).unwrap());
        assert!(is_allowed(Version::V23, Profile::Extended, Block::Invoicee).unwrap());
    }

    #[test]
    fn versions_share_block_sets() {
        for profile in Profile::ALL {
            for block in [Block::LineItems, Block::Attachments, Block::Invoicee] {
                assert_eq!(
                    is_allowed(Version::V20, profile, block).unwrap(),
                    is_allowed(Version::V23, profile, block).unwrap()
                );
            }
        }
    }

    #[test]
    fn version_one_is_unsupported() {
        let err = is_allowed(Version::V1, Profile::Comfort, Block::LineItems).unwrap_err();
        assert!(matches!(err, InvoiceError::Configuration(_)));
    }

    #[test]
    fn ubl_only_for_v23_and_basic_upwards() {
        assert!(ProfileRules::lookup(Version::V23, Profile::Minimum, Format::Ubl).is_err());
        assert!(ProfileRules::lookup(Version::V23, Profile::BasicWL, Format::Ubl).is_err());
        assert!(ProfileRules::lookup(Version::V20, Profile::XRechnung, Format::Ubl).is_err());
        assert!(ProfileRules::lookup(Version::V23, Profile::XRechnung, Format::Ubl).is_ok());
        assert!(ProfileRules::lookup(Version::V20, Profile::Minimum, Format::Cii).is_ok());
    }

    #[test]
    fn supported_matches_lookup() {
        let combos = supported();
        assert_eq!(combos.len(), 19);
        for (v, p, f) in combos {
            assert!(ProfileRules::lookup(v, p, f).is_ok());
        }
    }

    #[test]
    fn ubl_cannot_carry_extended_blocks() {
        let rules = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Ubl).unwrap();
        assert!(!rules.allows(Block::Invoicee, Format::Ubl));
        assert!(!rules.allows(Block::TaxAllowanceChargeBasisAmount, Format::Ubl));
        assert!(rules.allows(Block::Invoicee, Format::Cii));
    }

    #[test]
    fn tax_code_subsets() {
        let basic = ProfileRules::lookup(Version::V23, Profile::Basic, Format::Cii).unwrap();
        let xr = ProfileRules::lookup(Version::V23, Profile::XRechnung, Format::Cii).unwrap();
        let ext = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Cii).unwrap();

        assert!(!basic.allows_tax_type(TaxType::LocalSalesTax));
        assert!(xr.allows_tax_type(TaxType::LocalSalesTax));
        assert!(ext.allows_tax_type(TaxType::LocalSalesTax));

        assert!(xr.allows_tax_category(TaxCategoryCode::IntraCommunitySupply));
        assert!(!xr.allows_tax_category(TaxCategoryCode::LowerRate));
        assert!(ext.allows_tax_category(TaxCategoryCode::LowerRate));
    }

    #[test]
    fn invoice_information_rewritten_outside_extended() {
        let basic = ProfileRules::lookup(Version::V23, Profile::Basic, Format::Cii).unwrap();
        let ext = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Cii).unwrap();
        assert_eq!(basic.invoice_type(InvoiceType::InvoiceInformation), InvoiceType::Invoice);
        assert_eq!(basic.invoice_type(InvoiceType::CreditNote), InvoiceType::CreditNote);
        assert_eq!(
            ext.invoice_type(InvoiceType::InvoiceInformation),
            InvoiceType::InvoiceInformation
        );
    }

    #[test]
    fn restrict_drops_records_with_forbidden_tax_codes() {
        let mut inv = invoice();
        inv.add_applicable_trade_tax(dec!(100), dec!(19), TaxType::ValueAddedTax, TaxCategoryCode::StandardRate, None);
        inv.add_applicable_trade_tax(dec!(100), dec!(7), TaxType::ValueAddedTax, TaxCategoryCode::LowerRate, None);
        let rules = ProfileRules::lookup(Version::V23, Profile::Comfort, Format::Cii).unwrap();
        let out = rules.restrict(&inv, Format::Cii).unwrap();
        assert_eq!(out.taxes.len(), 1);
        assert_eq!(out.taxes[0].category, TaxCategoryCode::StandardRate);
    }

    #[test]
    fn restrict_clears_acba_unless_permitted() {
        let mut inv = invoice();
        inv.add_applicable_trade_tax(dec!(123), dec!(11), TaxType::LocalSalesTax, TaxCategoryCode::IntraCommunitySupply, Some(dec!(121)));

        let xr = ProfileRules::lookup(Version::V23, Profile::XRechnung, Format::Ubl).unwrap();
        let out = xr.restrict(&inv, Format::Ubl).unwrap();
        assert_eq!(out.taxes[0].allowance_charge_basis_amount, None);
        assert_eq!(out.taxes[0].basis_amount, Some(dec!(123)));

        let ext = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Cii).unwrap();
        let out = ext.restrict(&inv, Format::Cii).unwrap();
        assert_eq!(out.taxes[0].allowance_charge_basis_amount, Some(dec!(121)));
    }

    #[test]
    fn cii_allowance_currency_follows_document() {
        let mut inv = invoice();
        inv.add_trade_allowance_charge(
            true,
            None,
            CurrencyCode::USD,
            dec!(1),
            "Rabatt",
            AllowanceChargeTax {
                tax_type: TaxType::ValueAddedTax,
                category: TaxCategoryCode::StandardRate,
                percent: dec!(19),
            },
        );
        let rules = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Cii).unwrap();
        assert_eq!(rules.restrict(&inv, Format::Cii).unwrap().trade_allowance_charges[0].currency, CurrencyCode::EUR);
        let rules = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Ubl).unwrap();
        assert_eq!(rules.restrict(&inv, Format::Ubl).unwrap().trade_allowance_charges[0].currency, CurrencyCode::USD);
    }

    #[test]
    fn restrict_derives_unset_totals() {
        let mut inv = invoice();
        inv.add_trade_line_item("A", crate::codes::QuantityCode::Piece, dec!(2), dec!(50));
        inv.add_applicable_trade_tax(dec!(100), dec!(19), TaxType::ValueAddedTax, TaxCategoryCode::StandardRate, None);
        inv.add_trade_allowance_charge(
            true,
            None,
            CurrencyCode::EUR,
            dec!(10),
            "Rabatt",
            AllowanceChargeTax {
                tax_type: TaxType::ValueAddedTax,
                category: TaxCategoryCode::StandardRate,
                percent: dec!(19),
            },
        );
        inv.totals.total_prepaid = Some(dec!(5));

        let rules = ProfileRules::lookup(Version::V23, Profile::Comfort, Format::Ubl).unwrap();
        let t = rules.restrict(&inv, Format::Ubl).unwrap().totals;
        assert_eq!(t.line_total, Some(dec!(100)));
        assert_eq!(t.tax_basis, Some(dec!(90)));
        assert_eq!(t.tax_total, Some(dec!(19)));
        assert_eq!(t.grand_total, Some(dec!(109)));
        assert_eq!(t.due_payable, Some(dec!(104)));
        assert_eq!(t.allowance_total, None);

        let minimum = ProfileRules::lookup(Version::V23, Profile::Minimum, Format::Cii).unwrap();
        let t = minimum.restrict(&inv, Format::Cii).unwrap().totals;
        assert_eq!(t.line_total, None);
        assert_eq!(t.tax_basis, Some(dec!(0)));
        assert_eq!(t.grand_total, Some(dec!(19)));
    }

    #[test]
    fn restrict_keeps_supplied_totals() {
        let mut inv = invoice();
        inv.totals.tax_basis = Some(dec!(1));
        inv.totals.grand_total = Some(dec!(2));
        let rules = ProfileRules::lookup(Version::V23, Profile::Extended, Format::Cii).unwrap();
        let t = rules.restrict(&inv, Format::Cii).unwrap().totals;
        assert_eq!(t.tax_basis, Some(dec!(1)));
        assert_eq!(t.grand_total, Some(dec!(2)));
        assert_eq!(t.due_payable, Some(dec!(2)));
    }

    #[test]
    fn restrict_reports_overflowing_amounts() {
        let mut inv = invoice();
        inv.add_applicable_trade_tax(Decimal::MAX, dec!(19), TaxType::ValueAddedTax, TaxCategoryCode::StandardRate, None);
        let rules = ProfileRules::lookup(Version::V23, Profile::Comfort, Format::Cii).unwrap();
        let err = rules.restrict(&inv, Format::Cii).unwrap_err();
        assert!(matches!(err, InvoiceError::Validation(_)), "{err:?}");

        let mut inv = invoice();
        inv.add_trade_line_item("A", crate::codes::QuantityCode::Piece, Decimal::MAX, dec!(10));
        let err = rules.restrict(&inv, Format::Cii).unwrap_err();
        assert!(matches!(err, InvoiceError::Validation(ref v) if v.field == "LineTotalAmount"), "{err:?}");
    }

    #[test]
    fn empty_contact_is_dropped() {
        let mut inv = invoice();
        inv.set_seller_contact(Contact::default());
        let rules = ProfileRules::lookup(Version::V23, Profile::Comfort, Format::Cii).unwrap();
        assert_eq!(rules.restrict(&inv, Format::Cii).unwrap().seller_contact, None);
    }

    #[test]
    fn combined_terms_carry_first_due_date() {
        let d1 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
        let terms = vec![
            PaymentTerm { description: "A\nB".into(), due_date: None },
            PaymentTerm { description: "C".into(), due_date: Some(d1) },
            PaymentTerm { description: "D".into(), due_date: Some(d2) },
        ];
        let out = normalize_payment_terms(&terms, false);
        let lines: Vec<_> = out.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(lines, ["A", "B", "C", "D"]);
        assert_eq!(out[0].due_date, Some(d1));
        assert!(out[1..].iter().all(|t| t.due_date.is_none()));
    }

    #[test]
    fn separate_terms_keep_their_due_dates() {
        let d1 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let terms = vec![
            PaymentTerm { description: "A".into(), due_date: None },
            PaymentTerm { description: "B".into(), due_date: Some(d1) },
        ];
        let out = normalize_payment_terms(&terms, true);
        assert_eq!(out, terms);
    }

    #[test]
    fn due_date_without_text_survives() {
        let d1 = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let terms = vec![PaymentTerm { description: "  ".into(), due_date: Some(d1) }];
        let out = normalize_payment_terms(&terms, false);
        assert_eq!(out, vec![PaymentTerm { description: String::new(), due_date: Some(d1) }]);
    }
}
