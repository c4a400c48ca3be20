use serde_with::DeserializeFromStr;
use thiserror::Error;

use std::{
    fmt::{Debug, Display},
    str::FromStr,
};

/// Represents an amount of money in USD currency.
///
/// The amount is stored internally as an integer number of cents, but the
/// [`Display`] implementation formats it for display as dollars to 2 decimal
/// places.
///
/// Parsing is exact: the decimal text is rounded to the nearest cent, with
/// halves rounded away from zero, so `"100.005"` becomes `100.01`. Exponent
/// notation such as `"1.2345678E7"` is accepted, since that is how the
/// upstream job writes large totals.
#[derive(Clone, Copy, Default, DeserializeFromStr, Eq, PartialEq, Ord, PartialOrd)]
pub struct Usd(i64);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UsdError {
    #[error("not a decimal number: {0:?}")]
    Invalid(String),
    #[error("amount out of range: {0:?}")]
    Overflow(String),
}

impl Usd {
    #[must_use]
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    #[must_use]
    pub const fn cents(self) -> i64 {
        self.0
    }

    /// Adds `rhs`, returning `None` if the result does not fit.
    #[must_use]
    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(cents) => Some(Self(cents)),
            None => None,
        }
    }

    /// Adds up `amounts`, returning `None` if the total does not fit.
    pub fn checked_sum(amounts: impl IntoIterator<Item = Self>) -> Option<Self> {
        amounts
            .into_iter()
            .try_fold(Self::default(), Self::checked_add)
    }
}

impl Debug for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(self, f)
    }
}

impl Display for Usd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        f.pad(&format!("{sign}{}.{:02}", abs / 100, abs % 100))
    }
}

impl FromStr for Usd {
    type Err = UsdError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let invalid = || UsdError::Invalid(s.to_string());
        let overflow = || UsdError::Overflow(s.to_string());

        let text = s.trim();
        let (negative, unsigned) = match text.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, text.strip_prefix('+').unwrap_or(text)),
        };
        let (mantissa, exponent) = match unsigned.split_once(['e', 'E']) {
            Some((m, e)) => (m, e.parse::<i32>().map_err(|_| invalid())?),
            None => (unsigned, 0),
        };
        let (int, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !int.bytes().chain(frac.bytes()).all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }

        let digits: Vec<u8> = int.bytes().chain(frac.bytes()).map(|b| b - b'0').collect();
        let Some(first) = digits.iter().position(|&d| d != 0) else {
            return Ok(Self(0));
        };
        let digits = &digits[first..];
        // Index into `digits` one past the hundredths place.
        let end = int.len() as i64 + i64::from(exponent) - first as i64 + 2;
        if end > 18 {
            return Err(overflow());
        }

        let digit = |i: i64| -> i64 {
            usize::try_from(i)
                .ok()
                .and_then(|i| digits.get(i))
                .map_or(0, |&d| i64::from(d))
        };
        let mut cents = (0..end.max(0)).fold(0i64, |acc, i| acc * 10 + digit(i));
        if digit(end) >= 5 {
            cents += 1;
        }
        Ok(Self(if negative { -cents } else { cents }))
    }
}
