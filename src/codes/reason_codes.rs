//! UNTDID 5189 / 7161 allowance and charge reason codes.
//!
//! UNTDID 5189 defines allowance reason codes (numeric), UNTDID 7161
//! defines charge reason codes (alphabetic). The two ranges do not
//! overlap, so one list serves both kinds of record.

code_list! {
    /// Reason code of a document-level allowance or charge (BT-98, BT-105).
    pub enum AllowanceChargeReasonCode: "UNTDID 5189/7161 reason" {
        // UNTDID 5189 (allowances)
        BonusAheadOfSchedule => "41",
        OtherBonus => "42",
        ManufacturersConsumerDiscount => "60",
        MilitaryStatus => "62",
        WorkAccident => "63",
        SpecialAgreement => "64",
        ProductionErrorDiscount => "65",
        NewOutletDiscount => "66",
        SampleDiscount => "67",
        EndOfRangeDiscount => "68",
        IncotermDiscount => "70",
        PointOfSalesThreshold => "71",
        MaterialSurcharge => "88",
        Discount => "95",
        SpecialRebate => "100",
        FixedLongTerm => "102",
        Temporary => "103",
        Standard => "104",
        YearlyTurnover => "105",
        // UNTDID 7161 (charges)
        Advertising => "AA",
        Telecommunication => "AAA",
        TechnicalModification => "AAC",
        JobOrderProduction => "AAD",
        Outlays => "AAE",
        OffPremises => "AAF",
        Miscellaneous => "ABK",
        AdditionalPackaging => "ABL",
        OtherServices => "ADR",
        PickUp => "ADT",
        EnvironmentalProtection => "AEW",
        FreightService => "FC",
        Financing => "FI",
        FlatRate => "FL",
        Labelling => "LA",
        Packing => "PC",
        Testing => "TS",
    }
}

impl AllowanceChargeReasonCode {
    /// Whether the code belongs to the allowance list (UNTDID 5189).
    pub fn is_allowance_reason(&self) -> bool {
        self.code().bytes().all(|b| b.is_ascii_digit())
    }
}
