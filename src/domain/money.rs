use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;
use std::str::FromStr;

/// A non-negative monetary value in the currency's major unit.
///
/// Construction clamps into `0..=Amount::MAX`, so an `Amount` can be handed
/// to any fee formula without further checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Amount(Decimal);

impl Amount {
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Largest amount a payer can enter.
    pub const MAX: Self = Self(dec!(999999999.99));

    pub fn new(value: Decimal) -> Self {
        if value <= Decimal::ZERO {
            Self::ZERO
        } else if value >= Self::MAX.0 {
            Self::MAX
        } else {
            Self(value)
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The amount rounded to display precision (two decimals).
    pub fn rounded(&self) -> Decimal {
        self.0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl Add for Amount {
    type Output = Self;
    /// Totals may exceed `MAX` by the fee; the sum saturates instead of
    /// overflowing.
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_amount(*self))
    }
}

/// Renders an amount with exactly two decimals, e.g. `10.59`.
pub fn format_amount(amount: Amount) -> String {
    format!("{:.2}", amount.rounded())
}

/// Renders an amount with the dollar sign used across the checkout screens.
pub fn format_currency(amount: Amount) -> String {
    format!("${}", format_amount(amount))
}

/// Parses free-text amount entry.
///
/// Reads the longest leading decimal number (`"12.5abc"` gives 12.5). Empty,
/// non-numeric and negative input all normalize to zero; anything above
/// [`Amount::MAX`], however many digits, becomes `MAX`.
pub fn parse_amount(raw: &str) -> Amount {
    let trimmed = raw.trim_start();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in trimmed.char_indices() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                end = idx + 1;
            }
            '.' if !seen_dot => {
                seen_dot = true;
                if seen_digit {
                    end = idx + 1;
                }
            }
            '+' | '-' if idx == 0 => {}
            _ => break,
        }
    }
    if !seen_digit {
        return Amount::ZERO;
    }

    let number = trimmed[..end]
        .trim_start_matches('+')
        .trim_end_matches('.');
    let number = if number.starts_with('.') || number.starts_with("-.") {
        number.replacen('.', "0.", 1)
    } else {
        number.to_string()
    };
    match Decimal::from_str(&number) {
        Ok(value) => Amount::new(value),
        // The literal is well formed, so only its magnitude can be rejected.
        Err(_) if number.starts_with('-') => Amount::ZERO,
        Err(_) => Amount::MAX,
    }
}
