//! One form per payment method. Each owns its fields, touched state and
//! submission lifecycle; nothing is shared between them.

pub mod bank;
pub mod card;
pub mod crypto;

use crate::application::lifecycle::PaymentForm;
use crate::domain::method::PaymentMethod;
use bank::BankForm;
use card::CardForm;
use chrono::NaiveDate;
use crypto::CryptoForm;

/// The form currently mounted on screen.
#[derive(Debug, Clone)]
pub enum ActiveForm {
    Card(CardForm),
    Bank(BankForm),
    Crypto(CryptoForm),
}

impl ActiveForm {
    /// A freshly mounted, empty form. `None` for express methods.
    pub fn mount(method: PaymentMethod, reference_date: NaiveDate) -> Option<Self> {
        match method {
            PaymentMethod::Card => Some(ActiveForm::Card(CardForm::new(reference_date))),
            PaymentMethod::Bank => Some(ActiveForm::Bank(BankForm::new())),
            PaymentMethod::Crypto => Some(ActiveForm::Crypto(CryptoForm::new())),
            PaymentMethod::ExpressApple | PaymentMethod::ExpressGoogle => None,
        }
    }

    pub fn as_form(&self) -> &dyn PaymentForm {
        match self {
            ActiveForm::Card(form) => form,
            ActiveForm::Bank(form) => form,
            ActiveForm::Crypto(form) => form,
        }
    }

    pub fn as_form_mut(&mut self) -> &mut dyn PaymentForm {
        match self {
            ActiveForm::Card(form) => form,
            ActiveForm::Bank(form) => form,
            ActiveForm::Crypto(form) => form,
        }
    }

    pub fn method(&self) -> PaymentMethod {
        self.as_form().method()
    }
}
