use crate::domain::method::PaymentMethod;
use crate::domain::money::{Amount, format_currency};
use crate::domain::settlement::SettlementOutcome;
use crate::error::{CheckoutError, Result};
use chrono::{DateTime, Utc};
use rust_decimal_macros::dec;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Selection,
    CardForm,
    BankForm,
    CryptoForm,
    Success,
    Receipt,
}

impl Screen {
    /// The form screen a method is entered through. Express methods have none.
    pub fn form_for(method: PaymentMethod) -> Option<Screen> {
        match method {
            PaymentMethod::Card => Some(Screen::CardForm),
            PaymentMethod::Bank => Some(Screen::BankForm),
            PaymentMethod::Crypto => Some(Screen::CryptoForm),
            PaymentMethod::ExpressApple | PaymentMethod::ExpressGoogle => None,
        }
    }

    pub fn is_form(&self) -> bool {
        matches!(self, Screen::CardForm | Screen::BankForm | Screen::CryptoForm)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Selection => "selection",
            Screen::CardForm => "card_form",
            Screen::BankForm => "bank_form",
            Screen::CryptoForm => "crypto_form",
            Screen::Success => "success",
            Screen::Receipt => "receipt",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Receipt generated when the payer opens it from the success screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub id: String,
    pub issued_at: DateTime<Utc>,
    pub method: PaymentMethod,
    pub amount: Amount,
    pub fee: Amount,
    pub total: Amount,
    pub recipient: String,
}

impl Receipt {
    fn new(outcome: &SettlementOutcome, issued_at: DateTime<Utc>) -> Self {
        Self {
            id: receipt_id(issued_at),
            issued_at,
            method: outcome.method,
            amount: outcome.amount,
            fee: outcome.fee(),
            total: outcome.total,
            recipient: outcome.receipt_recipient().to_string(),
        }
    }
}

/// `RCP-` followed by the last eight base-36 digits of the millisecond clock.
pub fn receipt_id(at: DateTime<Utc>) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    let mut millis = at.timestamp_millis().unsigned_abs();
    let mut encoded = Vec::new();
    loop {
        encoded.push(DIGITS[(millis % 36) as usize]);
        millis /= 36;
        if millis == 0 {
            break;
        }
    }
    let tail: String = encoded.iter().take(8).rev().map(|b| *b as char).collect();
    format!("RCP-{tail}")
}

/// Owns which screen is shown, the chosen amount and the settled outcome.
///
/// The machine is cyclic: closing the success or receipt screen returns to
/// `Selection` and clears the outcome, ready for another payment. `outcome`
/// is `Some` exactly when the screen is `Success` or `Receipt`.
#[derive(Debug, Clone)]
pub struct CheckoutStateMachine {
    screen: Screen,
    amount: Amount,
    outcome: Option<SettlementOutcome>,
    receipt: Option<Receipt>,
}

impl Default for CheckoutStateMachine {
    fn default() -> Self {
        Self::new(Amount::new(dec!(10)))
    }
}

impl CheckoutStateMachine {
    pub fn new(initial_amount: Amount) -> Self {
        Self {
            screen: Screen::Selection,
            amount: initial_amount,
            outcome: None,
            receipt: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn outcome(&self) -> Option<&SettlementOutcome> {
        self.outcome.as_ref()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.receipt.as_ref()
    }

    fn invalid(&self, action: &'static str) -> CheckoutError {
        CheckoutError::InvalidTransition {
            action,
            screen: self.screen,
        }
    }

    /// The amount is picked on the selection screen only.
    pub fn set_amount(&mut self, amount: Amount) -> Result<()> {
        if self.screen != Screen::Selection {
            return Err(self.invalid("change the amount"));
        }
        self.amount = amount;
        Ok(())
    }

    pub fn select_method(&mut self, method: PaymentMethod) -> Result<Screen> {
        if self.screen != Screen::Selection {
            return Err(self.invalid("select a payment method"));
        }
        let next = Screen::form_for(method).ok_or_else(|| self.invalid("open a form for express checkout"))?;
        tracing::info!(%method, amount = %self.amount, "payment method selected");
        self.screen = next;
        Ok(next)
    }

    pub fn back(&mut self) -> Result<()> {
        if !self.screen.is_form() {
            return Err(self.invalid("go back"));
        }
        tracing::info!(from = %self.screen, "returning to payment selection");
        self.screen = Screen::Selection;
        Ok(())
    }

    /// Moves to `Success` once a submission has settled.
    ///
    /// Form payments settle from their own form screen; express payments
    /// settle straight from `Selection`.
    pub fn settle(&mut self, outcome: SettlementOutcome) -> Result<()> {
        let allowed = match Screen::form_for(outcome.method) {
            Some(form) => self.screen == form,
            None => self.screen == Screen::Selection,
        };
        if !allowed {
            return Err(self.invalid("settle a payment"));
        }
        tracing::info!(
            method = %outcome.method,
            amount = %format_currency(outcome.amount),
            total = %format_currency(outcome.total),
            recipient = outcome.success_recipient(),
            "payment settled"
        );
        self.outcome = Some(outcome);
        self.receipt = None;
        self.screen = Screen::Success;
        Ok(())
    }

    pub fn view_receipt(&mut self) -> Result<&Receipt> {
        self.view_receipt_at(Utc::now())
    }

    pub fn view_receipt_at(&mut self, now: DateTime<Utc>) -> Result<&Receipt> {
        if self.screen != Screen::Success {
            return Err(self.invalid("view the receipt"));
        }
        let outcome = self.outcome.as_ref().ok_or_else(|| self.invalid("view the receipt"))?;
        let receipt = Receipt::new(outcome, now);
        tracing::info!(receipt = %receipt.id, "receipt issued");
        self.screen = Screen::Receipt;
        Ok(self.receipt.insert(receipt))
    }

    pub fn done(&mut self) -> Result<()> {
        self.finish("finish")
    }

    pub fn close(&mut self) -> Result<()> {
        self.finish("close")
    }

    fn finish(&mut self, action: &'static str) -> Result<()> {
        if !matches!(self.screen, Screen::Success | Screen::Receipt) {
            return Err(self.invalid(action));
        }
        self.outcome = None;
        self.receipt = None;
        self.screen = Screen::Selection;
        Ok(())
    }
}
