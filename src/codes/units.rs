//! UN/ECE Recommendation 20 quantity unit codes.
//!
//! The full list has ~2000 codes; this covers the subset most relevant to
//! European e-invoicing.

code_list! {
    /// Unit of measure of a billed quantity (BT-130).
    pub enum QuantityCode: "UN/ECE Rec 20 unit" {
        Year => "ANN",
        Box => "BX",
        /// C62 — One (piece, unit).
        One => "C62",
        Centimetre => "CMT",
        Day => "DAY",
        Dozen => "DZN",
        Each => "EA",
        Gram => "GRM",
        /// H87 — Piece.
        Piece => "H87",
        Hour => "HUR",
        Kilogram => "KGM",
        Kilometre => "KMT",
        KilowattHour => "KWH",
        /// LS — Lump sum.
        LumpSum => "LS",
        Litre => "LTR",
        Minute => "MIN",
        Millilitre => "MLT",
        Millimetre => "MMT",
        Month => "MON",
        SquareMetre => "MTK",
        CubicMetre => "MTQ",
        Metre => "MTR",
        Percent => "P1",
        Pair => "PR",
        Second => "SEC",
        Set => "SET",
        Tonne => "TNE",
        Week => "WEE",
        Package => "XPK",
        Pallet => "XPX",
    }
}
