use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CalcError;
use crate::types::Rate;

/// Display locale of the calling page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Ko,
    #[default]
    En,
}

/// Tax and lending jurisdiction whose statutory tables apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Jurisdiction {
    Kr,
    Us,
}

/// Everything a locale decides about the calculations themselves.
/// Currency symbols and number formatting stay with the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleProfile {
    pub locale: Locale,
    pub jurisdiction: Jurisdiction,
    /// Debt-to-income ceiling lenders apply (Korean banks commonly 40%,
    /// US qualified mortgages 43%).
    pub max_dti_ratio: Rate,
}

impl Locale {
    pub fn profile(self) -> LocaleProfile {
        match self {
            Locale::Ko => LocaleProfile {
                locale: self,
                jurisdiction: Jurisdiction::Kr,
                max_dti_ratio: dec!(0.40),
            },
            Locale::En => LocaleProfile {
                locale: self,
                jurisdiction: Jurisdiction::Us,
                max_dti_ratio: dec!(0.43),
            },
        }
    }
}

impl FromStr for Locale {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ko" | "ko-kr" => Ok(Locale::Ko),
            "en" | "en-us" => Ok(Locale::En),
            other => Err(CalcError::InvalidInput {
                field: "locale".into(),
                reason: format!("Unsupported locale '{other}' (expected ko or en)"),
            }),
        }
    }
}

impl FromStr for Jurisdiction {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kr" | "ko" | "korea" => Ok(Jurisdiction::Kr),
            "us" | "en" | "usa" => Ok(Jurisdiction::Us),
            other => Err(CalcError::InvalidInput {
                field: "jurisdiction".into(),
                reason: format!("Unsupported jurisdiction '{other}' (expected KR or US)"),
            }),
        }
    }
}

impl fmt::Display for Jurisdiction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Jurisdiction::Kr => write!(f, "KR"),
            Jurisdiction::Us => write!(f, "US"),
        }
    }
}
