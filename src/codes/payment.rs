//! UNTDID 4461 payment means codes.

code_list! {
    /// Payment means type code (BT-81).
    pub enum PaymentMeansTypeCode: "UNTDID 4461 payment means" {
        /// 1 — Instrument not defined.
        NotDefined => "1",
        /// 10 — In cash.
        InCash => "10",
        /// 20 — Cheque.
        Cheque => "20",
        /// 30 — Credit transfer.
        CreditTransfer => "30",
        /// 31 — Debit transfer.
        DebitTransfer => "31",
        /// 42 — Payment to bank account.
        PaymentToBankAccount => "42",
        /// 48 — Bank card.
        BankCard => "48",
        /// 49 — Direct debit.
        DirectDebit => "49",
        /// 57 — Standing agreement.
        StandingAgreement => "57",
        /// 58 — SEPA credit transfer.
        SepaCreditTransfer => "58",
        /// 59 — SEPA direct debit.
        SepaDirectDebit => "59",
        /// 97 — Clearing between partners.
        ClearingBetweenPartners => "97",
        /// ZZZ — Mutually defined.
        MutuallyDefined => "ZZZ",
    }
}
