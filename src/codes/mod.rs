//! Closed code lists with syntax-specific wire spellings.
//!
//! Every code list implements [`CodeList`], so writers render and readers
//! parse codes through one entry point ([`render_code`] / [`parse_code`])
//! instead of scattering literals over the syntax modules. Most lists are
//! spelled identically in CII and UBL; [`TaxRegistrationScheme`] is the one
//! that differs.

use crate::core::InvoiceError;
use crate::syntax::Format;

/// A closed enumeration of standardized code values.
pub trait CodeList: Sized + Copy + 'static {
    /// Name of the list, used in error messages (e.g. "UNTDID 5305 tax category").
    const LIST: &'static str;

    /// Wire spelling of this code in the given syntax.
    fn render(self, format: Format) -> &'static str;

    /// Parse a wire value. Accepts every spelling the registry knows for
    /// the code, not only the one `format` renders.
    fn parse(wire: &str, format: Format) -> Option<Self>;
}

/// Render a code for the given syntax.
pub fn render_code<C: CodeList>(code: C, format: Format) -> &'static str {
    code.render(format)
}

/// Parse a code read from `field`, failing with a validation error that
/// names the field when the value is not in the list.
pub fn parse_code<C: CodeList>(wire: &str, format: Format, field: &str) -> Result<C, InvoiceError> {
    C::parse(wire.trim(), format).ok_or_else(|| {
        InvoiceError::invalid(field, format!("unknown {} code '{}'", C::LIST, wire.trim()))
    })
}

/// Declares a code list whose spelling is the same in every syntax.
macro_rules! code_list {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $list:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $code:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// Every code of the list, in declaration order.
            pub const ALL: &'static [$name] = &[ $( $name::$variant, )+ ];

            /// Wire code.
            pub fn code(&self) -> &'static str {
                match self {
                    $( $name::$variant => $code, )+
                }
            }

            /// Parse from the wire code.
            pub fn from_code(code: &str) -> Option<Self> {
                match code {
                    $( $code => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl $crate::codes::CodeList for $name {
            const LIST: &'static str = $list;

            fn render(self, _format: $crate::syntax::Format) -> &'static str {
                self.code()
            }

            fn parse(wire: &str, _format: $crate::syntax::Format) -> Option<Self> {
                Self::from_code(wire)
            }
        }
    };
}

mod currencies;
mod documents;
mod payment;
mod reason_codes;
mod tax;
mod units;

pub use currencies::CurrencyCode;
pub use documents::{AdditionalReferencedDocumentTypeCode, InvoiceType};
pub use payment::PaymentMeansTypeCode;
pub use reason_codes::AllowanceChargeReasonCode;
pub use tax::{TaxCategoryCode, TaxRegistrationScheme, TaxType};
pub use units::QuantityCode;
