//! Amount type
//!
//! Domain primitive for transaction amounts. Amounts behave like a
//! `DECIMAL(10, 2)` column: at most ten digits, exactly two of them after
//! the decimal point. The sign carries meaning (income vs. outcome) but is
//! not restricted.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Maximum number of digits
const MAX_DIGITS: u32 = 10;

/// Digits after the decimal point
const DECIMAL_PLACES: u32 = 2;

/// Amount represents a validated monetary value stored in minor units.
///
/// # Invariants
/// - At most 10 significant digits
/// - Exactly 2 decimal places
///
/// # Example
/// ```
/// use user_ledger::domain::Amount;
///
/// let amount: Amount = "-10.0".parse().unwrap();
/// assert_eq!(amount.minor_units(), -1000);
/// assert_eq!(amount.to_string(), "-10.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(i64);

/// Errors that can occur when creating an Amount
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("A valid number is required.")]
    NotANumber,

    #[error("Ensure that there are no more than {} digits in total.", MAX_DIGITS)]
    TooManyDigits,

    #[error("Ensure that there are no more than {} decimal places.", DECIMAL_PLACES)]
    TooManyDecimals,

    #[error("Ensure that there are no more than {} digits before the decimal point.", MAX_DIGITS - DECIMAL_PLACES)]
    TooManyWholeDigits,
}

impl Amount {
    /// Create a new Amount with validation.
    ///
    /// The digit count is taken from the value as written, so `1.000`
    /// has three decimal places and is rejected.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let scale = value.scale();
        let mantissa_digits = count_digits(value.mantissa().unsigned_abs());

        let (total, decimals) = if scale == 0 {
            (mantissa_digits, 0)
        } else if mantissa_digits > scale {
            (mantissa_digits, scale)
        } else {
            (scale, scale)
        };
        let whole = total - decimals;

        if total > MAX_DIGITS {
            return Err(AmountError::TooManyDigits);
        }
        if decimals > DECIMAL_PLACES {
            return Err(AmountError::TooManyDecimals);
        }
        if whole > MAX_DIGITS - DECIMAL_PLACES {
            return Err(AmountError::TooManyWholeDigits);
        }

        let mut value = value;
        value.rescale(DECIMAL_PLACES);
        let minor = i64::try_from(value.mantissa()).map_err(|_| AmountError::TooManyDigits)?;
        Ok(Self(minor))
    }

    /// Rebuild an amount from stored minor units (hundredths).
    pub fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// Value in minor units (hundredths)
    pub fn minor_units(&self) -> i64 {
        self.0
    }

    /// Get the decimal value with two decimal places.
    pub fn value(&self) -> Decimal {
        Decimal::new(self.0, DECIMAL_PLACES)
    }

    /// Strictly positive amounts count as income
    pub fn is_income(&self) -> bool {
        self.0 > 0
    }

    /// Strictly negative amounts count as outcome
    pub fn is_outcome(&self) -> bool {
        self.0 < 0
    }
}

fn count_digits(mut n: u128) -> u32 {
    let mut digits = 1;
    while n >= 10 {
        n /= 10;
        digits += 1;
    }
    digits
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.value())
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let decimal = Decimal::from_str(s)
            .or_else(|_| Decimal::from_scientific(s))
            .map_err(|_| AmountError::NotANumber)?;
        Amount::new(decimal)
    }
}

impl TryFrom<&serde_json::Value> for Amount {
    type Error = AmountError;

    /// Accept both JSON strings and JSON numbers.
    fn try_from(value: &serde_json::Value) -> Result<Self, Self::Error> {
        match value {
            serde_json::Value::String(s) => s.parse(),
            serde_json::Value::Number(n) => n.to_string().parse(),
            _ => Err(AmountError::NotANumber),
        }
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
