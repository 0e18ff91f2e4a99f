//! Insurer catalogue.
//!
//! Every master table carries one nullable text column per insurer it maps
//! to. The value is usually a JSON payload in the insurer's own vocabulary,
//! occasionally a bare code. The set of columns differs per table, see
//! [`crate::master::MasterTable::insurers`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::csv::normalize_header;

/// A single insurer known to the portal.
///
/// Serialized with its canonical camelCase key (`royalSundaram`, `tataAIA`),
/// which is also the CSV header used by the import files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Insurer {
    Icici,
    Digit,
    Reliance,
    Hdfc,
    Bajaj,
    Tata,
    Sbi,
    Future,
    Iffco,
    Chola,
    Kotak,
    Acko,
    Magma,
    Zuno,
    RoyalSundaram,
    United,
    Shriram,
    Care,
    Cigna,
    HdfcLife,
    #[serde(rename = "tataAIA")]
    TataAia,
    HdfcHealth,
    CareCashless,
    NivaBupa,
    #[serde(rename = "cholaPA")]
    CholaPa,
    Oic,
    TataMhg,
    IciciHealth,
}

impl Insurer {
    /// Every insurer, in the order the portal lists them.
    pub const ALL: [Insurer; 28] = [
        Insurer::Icici,
        Insurer::Digit,
        Insurer::Reliance,
        Insurer::Hdfc,
        Insurer::Bajaj,
        Insurer::Tata,
        Insurer::Sbi,
        Insurer::Future,
        Insurer::Iffco,
        Insurer::Chola,
        Insurer::Kotak,
        Insurer::Acko,
        Insurer::Magma,
        Insurer::Zuno,
        Insurer::RoyalSundaram,
        Insurer::United,
        Insurer::Shriram,
        Insurer::Care,
        Insurer::Cigna,
        Insurer::HdfcLife,
        Insurer::TataAia,
        Insurer::HdfcHealth,
        Insurer::CareCashless,
        Insurer::NivaBupa,
        Insurer::CholaPa,
        Insurer::Oic,
        Insurer::TataMhg,
        Insurer::IciciHealth,
    ];

    /// Canonical camelCase key, as used in CSV headers and JSON.
    pub fn key(self) -> &'static str {
        match self {
            Self::Icici => "icici",
            Self::Digit => "digit",
            Self::Reliance => "reliance",
            Self::Hdfc => "hdfc",
            Self::Bajaj => "bajaj",
            Self::Tata => "tata",
            Self::Sbi => "sbi",
            Self::Future => "future",
            Self::Iffco => "iffco",
            Self::Chola => "chola",
            Self::Kotak => "kotak",
            Self::Acko => "acko",
            Self::Magma => "magma",
            Self::Zuno => "zuno",
            Self::RoyalSundaram => "royalSundaram",
            Self::United => "united",
            Self::Shriram => "shriram",
            Self::Care => "care",
            Self::Cigna => "cigna",
            Self::HdfcLife => "hdfcLife",
            Self::TataAia => "tataAIA",
            Self::HdfcHealth => "hdfcHealth",
            Self::CareCashless => "careCashless",
            Self::NivaBupa => "nivaBupa",
            Self::CholaPa => "cholaPA",
            Self::Oic => "oic",
            Self::TataMhg => "tataMhg",
            Self::IciciHealth => "iciciHealth",
        }
    }

    /// Database column holding this insurer's mapping.
    pub fn column(self) -> &'static str {
        match self {
            Self::RoyalSundaram => "royal_sundaram",
            Self::HdfcLife => "hdfc_life",
            Self::TataAia => "tata_aia",
            Self::HdfcHealth => "hdfc_health",
            Self::CareCashless => "care_cashless",
            Self::NivaBupa => "niva_bupa",
            Self::CholaPa => "chola_pa",
            Self::TataMhg => "tata_mhg",
            Self::IciciHealth => "icici_health",
            other => other.key(),
        }
    }

    /// Header aliases accepted for this insurer in import files, already
    /// normalized with [`normalize_header`].
    pub fn header_aliases(self) -> Vec<String> {
        let mut aliases = vec![normalize_header(self.key())];
        if self == Self::RoyalSundaram {
            aliases.push("royal".to_string());
        }
        aliases
    }

    /// Parse an insurer name leniently.
    ///
    /// Matching ignores case, `_`, `-` and spaces, so `royalSundaram`,
    /// `royal_sundaram` and `ROYALSUNDARAM` all resolve. The legacy name
    /// `royal` resolves to [`Insurer::RoyalSundaram`].
    pub fn parse(name: &str) -> Option<Self> {
        let wanted = normalize_header(name);
        if wanted == "royal" {
            return Some(Self::RoyalSundaram);
        }
        Self::ALL
            .into_iter()
            .find(|insurer| normalize_header(insurer.key()) == wanted)
    }
}

impl fmt::Display for Insurer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
