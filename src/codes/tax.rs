//! Tax related code lists: UNTDID 5153 tax types, UNTDID 5305 tax
//! categories and the tax registration schemes.

use serde::{Deserialize, Serialize};

use super::CodeList;
use crate::syntax::Format;

code_list! {
    /// UNTDID 5153 — Duty or tax or fee type.
    pub enum TaxType: "UNTDID 5153 tax type" {
        /// AAA — Petroleum tax.
        PetroleumTax => "AAA",
        /// AAB — Provisional countervailing duty cash.
        ProvisionalCountervailingDutyCash => "AAB",
        /// AAC — Provisional countervailing duty bond.
        ProvisionalCountervailingDutyBond => "AAC",
        /// AAD — Tobacco tax.
        TobaccoTax => "AAD",
        /// ADD — Anti-dumping duty.
        AntiDumpingDuty => "ADD",
        /// BOL — Stamp duty (Imposta di Bollo).
        StampDuty => "BOL",
        /// ENV — Environmental tax.
        EnvironmentalTax => "ENV",
        /// EXC — Excise duty.
        ExciseDuty => "EXC",
        /// FRE — Free.
        Free => "FRE",
        /// GST — Goods and services tax.
        GoodsAndServicesTax => "GST",
        /// IMP — Import tax.
        ImportTax => "IMP",
        /// LOC — Local sales tax.
        LocalSalesTax => "LOC",
        /// OTH — Other taxes.
        OtherTaxes => "OTH",
        /// STT — State/provincial sales tax.
        StateSalesTax => "STT",
        /// VAT — Value added tax.
        ValueAddedTax => "VAT",
    }
}

code_list! {
    /// UNTDID 5305 — Duty or tax or fee category code.
    pub enum TaxCategoryCode: "UNTDID 5305 tax category" {
        /// A — Mixed tax rate.
        MixedTaxRate => "A",
        /// AA — Lower rate.
        LowerRate => "AA",
        /// AB — Exempt for resale.
        ExemptForResale => "AB",
        /// AC — VAT not now due for payment.
        NotNowDue => "AC",
        /// AD — VAT due from a previous invoice.
        DueFromPreviousInvoice => "AD",
        /// AE — VAT reverse charge.
        ReverseCharge => "AE",
        /// B — Transferred (VAT).
        Transferred => "B",
        /// C — Duty paid by supplier.
        DutyPaidBySupplier => "C",
        /// D — VAT margin scheme, travel agents.
        MarginSchemeTravelAgents => "D",
        /// E — Exempt from tax.
        Exempt => "E",
        /// F — VAT margin scheme, second-hand goods.
        MarginSchemeSecondHand => "F",
        /// G — Free export item, tax not charged.
        FreeExport => "G",
        /// H — Higher rate.
        HigherRate => "H",
        /// K — VAT exempt for EEA intra-community supply.
        IntraCommunitySupply => "K",
        /// L — Canary Islands general indirect tax.
        CanaryIslands => "L",
        /// M — Tax for production, services and importation in Ceuta and Melilla.
        CeutaMelilla => "M",
        /// O — Services outside scope of tax.
        NotSubjectToVat => "O",
        /// S — Standard rate.
        StandardRate => "S",
        /// Z — Zero rated goods.
        ZeroRated => "Z",
    }
}

/// Scheme of a party tax registration (BT-31 / BT-32).
///
/// CII carries the scheme as the `schemeID` attribute using the two-letter
/// codes, UBL carries it as `cac:TaxScheme/cbc:ID`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxRegistrationScheme {
    /// VAT identifier (USt-IdNr.). CII `VA`, UBL `VAT`.
    VatId,
    /// Fiscal number (Steuernummer). CII `FC`, UBL `ID`.
    FiscalNumber,
}

impl CodeList for TaxRegistrationScheme {
    const LIST: &'static str = "tax registration scheme";

    fn render(self, format: Format) -> &'static str {
        match (self, format) {
            (Self::VatId, Format::Cii) => "VA",
            (Self::VatId, Format::Ubl) => "VAT",
            (Self::FiscalNumber, Format::Cii) => "FC",
            (Self::FiscalNumber, Format::Ubl) => "ID",
        }
    }

    fn parse(wire: &str, _format: Format) -> Option<Self> {
        match wire {
            "VA" | "VAT" => Some(Self::VatId),
            "FC" | "ID" => Some(Self::FiscalNumber),
            _ => None,
        }
    }
}
