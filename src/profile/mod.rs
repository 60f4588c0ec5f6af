//! Format versions, conformance profiles and the profile rule table.
//!
//! # Profiles
//!
//! | Profile | Use case |
//! |---------|----------|
//! | Minimum | Booking aid, header data only |
//! | BasicWL | Header data, allowances and payment details, no line items |
//! | Basic | Line items without product details |
//! | Comfort | Full EN 16931 |
//! | Extended | Beyond EN 16931 (invoicee, separate payment terms, ...) |
//! | XRechnung1 | German public sector, XRechnung 1.2 |
//! | XRechnung | German public sector, current XRechnung |

use serde::{Deserialize, Serialize};

mod rules;

pub use rules::{Block, ProfileRules, is_allowed, supported};

/// Revision of the ZUGFeRD / Factur-X standard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Version {
    /// ZUGFeRD 1.0 (CrossIndustryDocument schema, not supported for writing
    /// or reading).
    V1,
    /// ZUGFeRD 2.0.
    V20,
    /// ZUGFeRD 2.1 to 2.3, Factur-X 1.0.
    V23,
}

/// Conformance profile of an e-invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Profile {
    Minimum,
    BasicWL,
    Basic,
    /// EN 16931 core ("Comfort" in ZUGFeRD 1.0 terms).
    Comfort,
    Extended,
    /// XRechnung 1.2.
    XRechnung1,
    XRechnung,
}

impl Profile {
    pub const ALL: [Profile; 7] = [
        Profile::Minimum,
        Profile::BasicWL,
        Profile::Basic,
        Profile::Comfort,
        Profile::Extended,
        Profile::XRechnung1,
        Profile::XRechnung,
    ];

    /// Guideline identifier (BT-24) written into the document context.
    ///
    /// Returns `None` for ZUGFeRD 1.0, which has no supported combination.
    pub fn urn(&self, version: Version) -> Option<&'static str> {
        let urn = match (version, self) {
            (Version::V1, _) => return None,
            (_, Profile::Comfort) => "urn:cen.eu:en16931:2017",
            (_, Profile::XRechnung1) => {
                "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_1.2"
            }
            (Version::V20, Profile::Minimum) => "urn:zugferd.de:2p0:minimum",
            (Version::V20, Profile::BasicWL) => "urn:zugferd.de:2p0:basicwl",
            (Version::V20, Profile::Basic) => {
                "urn:cen.eu:en16931:2017#compliant#urn:zugferd.de:2p0:basic"
            }
            (Version::V20, Profile::Extended) => {
                "urn:cen.eu:en16931:2017#conformant#urn:zugferd.de:2p0:extended"
            }
            (Version::V20, Profile::XRechnung) => {
                "urn:cen.eu:en16931:2017#compliant#urn:xoev-de:kosit:standard:xrechnung_2.0"
            }
            (Version::V23, Profile::Minimum) => "urn:factur-x.eu:1p0:minimum",
            (Version::V23, Profile::BasicWL) => "urn:factur-x.eu:1p0:basicwl",
            (Version::V23, Profile::Basic) => {
                "urn:cen.eu:en16931:2017#compliant#urn:factur-x.eu:1p0:basic"
            }
            (Version::V23, Profile::Extended) => {
                "urn:cen.eu:en16931:2017#conformant#urn:factur-x.eu:1p0:extended"
            }
            (Version::V23, Profile::XRechnung) => {
                "urn:cen.eu:en16931:2017#compliant#urn:xeinkauf.de:kosit:xrechnung_3.0"
            }
        };
        Some(urn)
    }

    /// Recognise a guideline identifier. Identifiers shared by several
    /// versions resolve to the newest one.
    pub fn from_urn(urn: &str) -> Option<(Version, Profile)> {
        let urn = urn.trim();
        [Version::V23, Version::V20].into_iter().find_map(|version| {
            Profile::ALL
                .into_iter()
                .find(|p| p.urn(version) == Some(urn))
                .map(|p| (version, p))
        })
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Profile::Minimum => "MINIMUM",
            Profile::BasicWL => "BASIC WL",
            Profile::Basic => "BASIC",
            Profile::Comfort => "EN 16931",
            Profile::Extended => "EXTENDED",
            Profile::XRechnung1 => "XRECHNUNG 1.2",
            Profile::XRechnung => "XRECHNUNG",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urns_differ_per_version() {
        assert_eq!(
            Profile::Minimum.urn(Version::V20),
            Some("urn:zugferd.de:2p0:minimum")
        );
        assert_eq!(
            Profile::Minimum.urn(Version::V23),
            Some("urn:factur-x.eu:1p0:minimum")
        );
        assert_eq!(Profile::Comfort.urn(Version::V1), None);
    }

    #[test]
    fn from_urn_round_trips() {
        for version in [Version::V20, Version::V23] {
            for profile in Profile::ALL {
                let urn = profile.urn(version).unwrap();
                let (_, detected) = Profile::from_urn(urn).unwrap();
                assert_eq!(detected, profile, "{urn}");
            }
        }
    }

    #[test]
    fn shared_urn_prefers_newest_version() {
        assert_eq!(
            Profile::from_urn("urn:cen.eu:en16931:2017"),
            Some((Version::V23, Profile::Comfort))
        );
        assert_eq!(
            Profile::from_urn("urn:zugferd.de:2p0:basicwl"),
            Some((Version::V20, Profile::BasicWL))
        );
        assert_eq!(Profile::from_urn("urn:unknown"), None);
    }
}
