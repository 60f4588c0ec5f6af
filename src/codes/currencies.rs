//! ISO 4217 currency codes.
//!
//! Covers the currencies relevant to European e-invoicing (EN 16931).
//! The list is closed: a document in any other currency fails to read
//! with a validation error naming the currency field.

code_list! {
    /// ISO 4217 currency code (BT-5, BT-6 and every `currencyID`).
    #[allow(clippy::upper_case_acronyms)]
    pub enum CurrencyCode: "ISO 4217 currency" {
        AED => "AED", // UAE Dirham
        AMD => "AMD", // Armenian Dram
        AUD => "AUD", // Australian Dollar
        BGN => "BGN", // Bulgarian Lev
        BRL => "BRL", // Brazilian Real
        CAD => "CAD", // Canadian Dollar
        CHF => "CHF", // Swiss Franc
        CNY => "CNY", // Chinese Yuan
        CZK => "CZK", // Czech Koruna
        DKK => "DKK", // Danish Krone
        EGP => "EGP", // Egyptian Pound
        EUR => "EUR", // Euro
        GBP => "GBP", // Pound Sterling
        GEL => "GEL", // Georgian Lari
        HKD => "HKD", // Hong Kong Dollar
        HUF => "HUF", // Hungarian Forint
        IDR => "IDR", // Indonesian Rupiah
        ILS => "ILS", // Israeli Shekel
        INR => "INR", // Indian Rupee
        ISK => "ISK", // Icelandic Krona
        JPY => "JPY", // Japanese Yen
        KES => "KES", // Kenyan Shilling
        KRW => "KRW", // South Korean Won
        KZT => "KZT", // Kazakhstani Tenge
        MXN => "MXN", // Mexican Peso
        MYR => "MYR", // Malaysian Ringgit
        NGN => "NGN", // Nigerian Naira
        NOK => "NOK", // Norwegian Krone
        NZD => "NZD", // New Zealand Dollar
        PHP => "PHP", // Philippine Peso
        PLN => "PLN", // Polish Zloty
        RON => "RON", // Romanian Leu
        RSD => "RSD", // Serbian Dinar
        SAR => "SAR", // Saudi Riyal
        SEK => "SEK", // Swedish Krona
        SGD => "SGD", // Singapore Dollar
        THB => "THB", // Thai Baht
        TRY => "TRY", // Turkish Lira
        TWD => "TWD", // New Taiwan Dollar
        UAH => "UAH", // Ukrainian Hryvnia
        USD => "USD", // US Dollar
        VND => "VND", // Vietnamese Dong
        ZAR => "ZAR", // South African Rand
    }
}

impl Default for CurrencyCode {
    fn default() -> Self {
        CurrencyCode::EUR
    }
}
