use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Every input a payment-method form can hold.
///
/// Ordering follows the on-screen order, which is also the order in which the
/// first invalid field is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Field {
    CardNumber,
    Expiry,
    Cvc,
    Email,
    NameOnCard,
    Address,
    BankType,
    Routing,
    Account,
    ConnectedWallet,
    SelectedAsset,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::CardNumber => "cardNumber",
            Field::Expiry => "expiry",
            Field::Cvc => "cvc",
            Field::Email => "email",
            Field::NameOnCard => "nameOnCard",
            Field::Address => "address",
            Field::BankType => "bankType",
            Field::Routing => "routing",
            Field::Account => "account",
            Field::ConnectedWallet => "connectedWalletId",
            Field::SelectedAsset => "selectedAsset",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cardNumber" => Ok(Field::CardNumber),
            "expiry" => Ok(Field::Expiry),
            "cvc" => Ok(Field::Cvc),
            "email" => Ok(Field::Email),
            "nameOnCard" => Ok(Field::NameOnCard),
            "address" => Ok(Field::Address),
            "bankType" => Ok(Field::BankType),
            "routing" => Ok(Field::Routing),
            "account" => Ok(Field::Account),
            "connectedWalletId" => Ok(Field::ConnectedWallet),
            "selectedAsset" => Ok(Field::SelectedAsset),
            other => Err(format!("unknown field '{other}'")),
        }
    }
}

/// The reason a single field is invalid. `Display` is the message shown
/// next to the field.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    #[error("Enter a valid card number")]
    InvalidCardNumber,
    #[error("Enter expiry as MM/YY")]
    InvalidExpiry,
    #[error("Card has expired")]
    ExpiredCard,
    #[error("CVC must be 3 or 4 digits")]
    InvalidCvc,
    #[error("Enter a valid email address")]
    InvalidEmail,
    #[error("Name on card is required")]
    MissingName,
    #[error("Billing address is required")]
    MissingAddress,
    #[error("Routing number must be 9 digits")]
    InvalidUsRouting,
    #[error("Sort code must be at least 6 digits")]
    InvalidSortCode,
    #[error("BIC / SWIFT must be at least 8 characters")]
    InvalidBic,
    #[error("Account number must be 4 to 34 characters")]
    InvalidAccount,
    #[error("Connect a wallet to continue")]
    MissingWallet,
    #[error("Select an asset to pay with")]
    MissingAsset,
}

/// Field name to first failing reason. Empty means the form can be submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult(BTreeMap<Field, FieldError>);

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    /// Records `error` for `field` unless `valid` holds.
    pub fn check(&mut self, field: Field, valid: bool, error: FieldError) {
        if !valid {
            self.insert(field, error);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: Field) -> Option<FieldError> {
        self.0.get(&field).copied()
    }

    /// The invalid field the payer should be taken to first.
    pub fn first_invalid(&self) -> Option<Field> {
        self.0.keys().next().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, FieldError)> + '_ {
        self.0.iter().map(|(f, e)| (*f, *e))
    }
}

/// Raw, already formatted input values keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormFields(BTreeMap<Field, String>);

impl FormFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> &str {
        self.0.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.0.insert(field, value.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(|v| v.is_empty())
    }
}

pub type TouchedSet = BTreeSet<Field>;

/// Decides which validation errors are shown.
///
/// Validity is always computed; an error only becomes visible once its field
/// was blurred or a submission was attempted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorVisibility {
    touched: TouchedSet,
    submit_attempted: bool,
}

impl ErrorVisibility {
    pub fn touch(&mut self, field: Field) {
        self.touched.insert(field);
    }

    pub fn mark_submit_attempted(&mut self) {
        self.submit_attempted = true;
    }

    pub fn reset(&mut self) {
        self.touched.clear();
        self.submit_attempted = false;
    }

    pub fn touched(&self) -> &TouchedSet {
        &self.touched
    }

    pub fn submit_attempted(&self) -> bool {
        self.submit_attempted
    }

    pub fn is_visible(&self, field: Field) -> bool {
        self.submit_attempted || self.touched.contains(&field)
    }

    pub fn error_for(&self, field: Field, result: &ValidationResult) -> Option<FieldError> {
        if self.is_visible(field) {
            result.get(field)
        } else {
            None
        }
    }

    pub fn visible(&self, result: &ValidationResult) -> ValidationResult {
        let mut shown = ValidationResult::new();
        for (field, error) in result.iter().filter(|(f, _)| self.is_visible(*f)) {
            shown.insert(field, error);
        }
        shown
    }
}
