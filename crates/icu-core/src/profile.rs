//! Patient profiles drawn from historical data.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{IcuError, Specialty};

#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Gender::Male   => "M",
            Gender::Female => "F",
        })
    }
}

impl FromStr for Gender {
    type Err = IcuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "M" | "m" => Ok(Gender::Male),
            "F" | "f" => Ok(Gender::Female),
            other => Err(IcuError::Parse(format!("unknown gender {other:?}"))),
        }
    }
}

/// The attributes a new patient is instantiated with.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PatientProfile {
    pub specialty: Specialty,
    pub age:       u16,
    pub gender:    Gender,
    /// ICU length of stay in simulated seconds.
    pub los_secs:  u64,
}
