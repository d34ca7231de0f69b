//! Referring-specialty groups.
//!
//! Historical admission data records the referring specialty as a numeric
//! code; the simulator works with seven groups.  [`Specialty::from_code`]
//! folds the numeric codes into their group.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::IcuError;

/// The specialty group a patient is referred from.  Departments declare
/// which groups they serve.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub enum Specialty {
    #[serde(rename = "CAPU")]
    Capu,
    #[serde(rename = "CARD")]
    Card,
    #[serde(rename = "INT")]
    Int,
    #[serde(rename = "Other")]
    Other,
    #[serde(rename = "CHIR")]
    Chir,
    #[serde(rename = "NEC")]
    Nec,
    #[serde(rename = "NEU")]
    Neu,
}

impl Specialty {
    /// All groups, in the order the default single department lists them.
    pub const ALL: [Specialty; 7] = [
        Specialty::Capu,
        Specialty::Card,
        Specialty::Int,
        Specialty::Other,
        Specialty::Chir,
        Specialty::Nec,
        Specialty::Neu,
    ];

    /// The short code used in configuration files and output tables.
    pub fn code(self) -> &'static str {
        match self {
            Specialty::Capu  => "CAPU",
            Specialty::Card  => "CARD",
            Specialty::Int   => "INT",
            Specialty::Other => "Other",
            Specialty::Chir  => "CHIR",
            Specialty::Nec   => "NEC",
            Specialty::Neu   => "NEU",
        }
    }

    /// Numeric referring-specialty codes that fold into this group.
    pub fn numeric_codes(self) -> &'static [u16] {
        match self {
            Specialty::Nec   => &[12],
            Specialty::Int   => &[2, 4, 7, 41, 47],
            Specialty::Card  => &[3],
            Specialty::Chir  => &[9, 10, 11, 13, 39],
            Specialty::Neu   => &[21],
            Specialty::Capu  => &[29, 50],
            Specialty::Other => &[15, 18, 19, 20, 23, 36, 48, 98],
        }
    }

    /// Group for a numeric referring-specialty code, if it belongs to one.
    pub fn from_code(code: u16) -> Option<Specialty> {
        Specialty::ALL
            .into_iter()
            .find(|s| s.numeric_codes().contains(&code))
    }
}

impl fmt::Display for Specialty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Specialty {
    type Err = IcuError;

    /// Accepts either a group code (`"CARD"`) or a numeric code (`"3"`, `"3.0"`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(found) = Specialty::ALL.into_iter().find(|sp| sp.code() == s) {
            return Ok(found);
        }
        let numeric = s
            .parse::<f64>()
            .map_err(|_| IcuError::Parse(format!("unknown specialty {s:?}")))?;
        if numeric.fract() != 0.0 || !(0.0..=u16::MAX as f64).contains(&numeric) {
            return Err(IcuError::Parse(format!("unknown specialty code {s:?}")));
        }
        Specialty::from_code(numeric as u16)
            .ok_or_else(|| IcuError::Parse(format!("specialty code {s:?} belongs to no group")))
    }
}
