//! Runtime settings for a checkout session and its simulated collaborators.

use crate::domain::money::Amount;
use chrono::{Local, NaiveDate};
use rust_decimal_macros::dec;
use std::time::Duration;

/// Whether the simulated processor settles or declines every payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessorMode {
    #[default]
    Approve,
    Decline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub presets: Vec<Amount>,
    pub initial_amount: Amount,
    /// Expiry dates are compared against this day.
    pub reference_date: NaiveDate,
    pub processor_latency: (Duration, Duration),
    pub processor_mode: ProcessorMode,
    pub wallet_latency: Duration,
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            presets: vec![
                Amount::new(dec!(10)),
                Amount::new(dec!(25)),
                Amount::new(dec!(50)),
            ],
            initial_amount: Amount::new(dec!(10)),
            reference_date: Local::now().date_naive(),
            processor_latency: (Duration::from_millis(1200), Duration::from_millis(1800)),
            processor_mode: ProcessorMode::Approve,
            wallet_latency: Duration::from_millis(1200),
        }
    }
}

impl CheckoutConfig {
    /// Pins the processor latency to a single value.
    pub fn with_fixed_latency(mut self, latency: Duration) -> Self {
        self.processor_latency = (latency, latency);
        self
    }
}
