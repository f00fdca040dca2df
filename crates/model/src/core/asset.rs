use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

const MAX_PRECISION: u8 = 18;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssetError {
    #[error("Asset '{0}' is not of the form '<amount> <SYMBOL>'")]
    Format(String),

    #[error("Invalid amount in asset '{0}'")]
    Amount(String),

    #[error("Invalid symbol in asset '{0}'")]
    Symbol(String),

    #[error("Cannot add {left} and {right}: symbol or precision differs")]
    Mismatch { left: String, right: String },

    #[error("Asset amount overflow")]
    Overflow,
}

/// A token quantity such as `22465.0000 SEEDS`, held as integer units at a
/// fixed decimal precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Asset {
    pub units: i64,
    pub precision: u8,
    pub symbol: String,
}

impl Asset {
    pub fn checked_add(&self, other: &Asset) -> Result<Asset, AssetError> {
        if self.symbol != other.symbol || self.precision != other.precision {
            return Err(AssetError::Mismatch {
                left: self.to_string(),
                right: other.to_string(),
            });
        }

        let units = self
            .units
            .checked_add(other.units)
            .ok_or(AssetError::Overflow)?;

        Ok(Asset {
            units,
            precision: self.precision,
            symbol: self.symbol.clone(),
        })
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (amount, symbol) = trimmed
            .split_once(' ')
            .ok_or_else(|| AssetError::Format(s.to_string()))?;

        if symbol.is_empty()
            || symbol.len() > 7
            || !symbol.chars().all(|c| c.is_ascii_uppercase())
        {
            return Err(AssetError::Symbol(s.to_string()));
        }

        let (negative, digits) = match amount.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, amount),
        };

        let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
        let valid_digits = |part: &str| part.chars().all(|c| c.is_ascii_digit());
        if whole.is_empty() || !valid_digits(whole) || !valid_digits(fraction) {
            return Err(AssetError::Amount(s.to_string()));
        }

        let precision =
            u8::try_from(fraction.len()).map_err(|_| AssetError::Amount(s.to_string()))?;
        if precision > MAX_PRECISION {
            return Err(AssetError::Amount(s.to_string()));
        }

        let magnitude: i64 = format!("{whole}{fraction}")
            .parse()
            .map_err(|_| AssetError::Overflow)?;

        Ok(Asset {
            units: if negative { -magnitude } else { magnitude },
            precision,
            symbol: symbol.to_string(),
        })
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.units < 0 { "-" } else { "" };
        let magnitude = self.units.unsigned_abs();

        if self.precision == 0 {
            return write!(f, "{sign}{magnitude} {}", self.symbol);
        }

        let scale = 10u64.pow(u32::from(self.precision));
        write!(
            f,
            "{sign}{}.{:0width$} {}",
            magnitude / scale,
            magnitude % scale,
            self.symbol,
            width = usize::from(self.precision)
        )
    }
}
