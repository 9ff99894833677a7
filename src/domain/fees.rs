use super::method::PaymentMethod;
use super::money::Amount;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;

/// Subtotal, fee and total for one method. Always derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Totals {
    pub subtotal: Amount,
    pub fee: Amount,
    pub total: Amount,
}

/// Percentage plus fixed surcharge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeSchedule {
    pub rate: Decimal,
    pub fixed: Decimal,
}

impl FeeSchedule {
    pub fn for_method(method: PaymentMethod) -> Self {
        match method {
            // Express wallets settle over card rails.
            PaymentMethod::Card | PaymentMethod::ExpressApple | PaymentMethod::ExpressGoogle => {
                Self {
                    rate: dec!(0.029),
                    fixed: dec!(0.30),
                }
            }
            PaymentMethod::Bank => Self {
                rate: dec!(0.01),
                fixed: Decimal::ZERO,
            },
            PaymentMethod::Crypto => Self {
                rate: dec!(0.005),
                fixed: Decimal::ZERO,
            },
        }
    }

    pub fn fee(&self, subtotal: Amount) -> Amount {
        Amount::new(self.rate * subtotal.value() + self.fixed)
    }
}

/// Computes the exact, unrounded totals for `subtotal` paid with `method`.
pub fn compute_totals(subtotal: Amount, method: PaymentMethod) -> Totals {
    let fee = FeeSchedule::for_method(method).fee(subtotal);
    Totals {
        subtotal,
        fee,
        total: subtotal + fee,
    }
}
