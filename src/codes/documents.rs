//! UNTDID 1001 document name codes: invoice types and the types of
//! additional referenced documents.

code_list! {
    /// Invoice type code (BT-3).
    pub enum InvoiceType: "UNTDID 1001 invoice type" {
        /// 326 — Partial invoice.
        Partial => "326",
        /// 380 — Commercial invoice.
        Invoice => "380",
        /// 381 — Credit note.
        CreditNote => "381",
        /// 383 — Debit note.
        DebitNote => "383",
        /// 384 — Corrected invoice.
        Correction => "384",
        /// 386 — Prepayment invoice.
        Prepayment => "386",
        /// 389 — Self-billed invoice.
        SelfBilled => "389",
        /// 751 — Invoice information for accounting purposes.
        InvoiceInformation => "751",
        /// 875 — Partial construction invoice.
        PartialConstruction => "875",
        /// 876 — Partial final construction invoice.
        PartialFinalConstruction => "876",
        /// 877 — Final construction invoice.
        FinalConstruction => "877",
    }
}

impl Default for InvoiceType {
    fn default() -> Self {
        InvoiceType::Invoice
    }
}

code_list! {
    /// Type of an additional referenced document (BT-17, BT-18, BG-24).
    pub enum AdditionalReferencedDocumentTypeCode: "UNTDID 1001 referenced document type" {
        /// 50 — Validated priced tender (tender or lot reference).
        ValidatedPricedTender => "50",
        /// 130 — Invoicing data sheet (invoiced object identifier).
        InvoiceDataSheet => "130",
        /// 916 — Related document (supporting document, attachment).
        ReferenceDocument => "916",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invoice_type_codes() {
        assert_eq!(InvoiceType::Invoice.code(), "380");
        assert_eq!(InvoiceType::CreditNote.code(), "381");
        assert_eq!(InvoiceType::from_code("751"), Some(InvoiceType::InvoiceInformation));
        assert_eq!(InvoiceType::from_code("999"), None);
    }

    #[test]
    fn reference_document_code() {
        assert_eq!(AdditionalReferencedDocumentTypeCode::ReferenceDocument.code(), "916");
    }
}
