use crate::application::lifecycle::{PaymentForm, SubmissionLifecycle};
use crate::domain::fields::{ErrorVisibility, Field, FieldError, FormFields, ValidationResult};
use crate::domain::method::{CardBrand, PaymentMethod};
use crate::domain::ports::ProfileStore;
use crate::domain::settlement::{MethodPayload, SavedProfile};
use crate::domain::validators::{
    cvc_valid, email_valid, expiry_not_expired, format_card_number, format_expiry, luhn_valid,
    normalize_card_number, normalize_cvc, parse_expiry,
};
use crate::error::{CheckoutError, Result};
use chrono::NaiveDate;

const CARD_FIELDS: [Field; 6] = [
    Field::CardNumber,
    Field::Expiry,
    Field::Cvc,
    Field::Email,
    Field::NameOnCard,
    Field::Address,
];

/// Card details form.
///
/// Expiry is judged against `reference_date`, fixed when the form mounts.
#[derive(Debug, Clone)]
pub struct CardForm {
    fields: FormFields,
    visibility: ErrorVisibility,
    lifecycle: SubmissionLifecycle,
    reference_date: NaiveDate,
    save_info: bool,
}

impl CardForm {
    pub fn new(reference_date: NaiveDate) -> Self {
        Self {
            fields: FormFields::new(),
            visibility: ErrorVisibility::default(),
            lifecycle: SubmissionLifecycle::default(),
            reference_date,
            save_info: true,
        }
    }

    pub fn fields(&self) -> &FormFields {
        &self.fields
    }

    pub fn field(&self, field: Field) -> &str {
        self.fields.get(field)
    }

    pub fn card_digits(&self) -> String {
        normalize_card_number(self.fields.get(Field::CardNumber))
    }

    pub fn brand(&self) -> CardBrand {
        CardBrand::detect(&self.card_digits())
    }

    pub fn save_info(&self) -> bool {
        self.save_info
    }

    pub fn set_save_info(&mut self, save: bool) {
        self.save_info = save;
    }

    fn format(field: Field, raw: &str) -> String {
        match field {
            Field::CardNumber => format_card_number(&normalize_card_number(raw)),
            Field::Expiry => format_expiry(raw),
            Field::Cvc => normalize_cvc(raw),
            _ => raw.to_string(),
        }
    }

    /// Stores a keystroke's worth of input, reshaped for display.
    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<()> {
        if !CARD_FIELDS.contains(&field) {
            return Err(CheckoutError::FieldNotOnForm {
                method: PaymentMethod::Card,
                field,
            });
        }
        let value = Self::format(field, raw);
        tracing::debug!(%field, "card field edited");
        self.fields.set(field, value);
        Ok(())
    }

    pub fn touch(&mut self, field: Field) -> Result<()> {
        if !CARD_FIELDS.contains(&field) {
            return Err(CheckoutError::FieldNotOnForm {
                method: PaymentMethod::Card,
                field,
            });
        }
        self.visibility.touch(field);
        Ok(())
    }

    /// Replaces every field with the saved profile and clears touched state
    /// in one step.
    pub fn apply_profile(&mut self, profile: &SavedProfile) {
        let mut fields = FormFields::new();
        fields.set(Field::CardNumber, Self::format(Field::CardNumber, &profile.card_number));
        fields.set(Field::Expiry, Self::format(Field::Expiry, &profile.expiry));
        fields.set(Field::Cvc, Self::format(Field::Cvc, &profile.cvc));
        fields.set(Field::Email, profile.email.clone());
        fields.set(Field::NameOnCard, profile.name_on_card.clone());
        fields.set(Field::Address, profile.address.clone());

        self.fields = fields;
        self.visibility.reset();
    }

    pub async fn select_profile(&mut self, store: &dyn ProfileStore, key: &str) -> Result<()> {
        self.lifecycle.ensure_editable()?;
        let profile = store
            .find(key)
            .await?
            .ok_or_else(|| CheckoutError::UnknownProfile(key.to_string()))?;
        self.apply_profile(&profile);
        tracing::info!(profile = key, "saved card profile applied");
        Ok(())
    }
}

impl PaymentForm for CardForm {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Card
    }

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();

        result.check(
            Field::CardNumber,
            luhn_valid(&self.card_digits()),
            FieldError::InvalidCardNumber,
        );

        match parse_expiry(self.fields.get(Field::Expiry)) {
            None => result.insert(Field::Expiry, FieldError::InvalidExpiry),
            Some(expiry) => result.check(
                Field::Expiry,
                expiry_not_expired(expiry, self.reference_date),
                FieldError::ExpiredCard,
            ),
        }

        result.check(Field::Cvc, cvc_valid(self.fields.get(Field::Cvc)), FieldError::InvalidCvc);
        result.check(
            Field::Email,
            email_valid(self.fields.get(Field::Email).trim()),
            FieldError::InvalidEmail,
        );
        result.check(
            Field::NameOnCard,
            !self.fields.get(Field::NameOnCard).trim().is_empty(),
            FieldError::MissingName,
        );
        result.check(
            Field::Address,
            !self.fields.get(Field::Address).trim().is_empty(),
            FieldError::MissingAddress,
        );
        result
    }

    fn payload(&self) -> Result<MethodPayload> {
        Ok(MethodPayload::Card {
            card_number: self.card_digits(),
            brand: self.brand(),
            expiry: self.fields.get(Field::Expiry).to_string(),
            cvc: self.fields.get(Field::Cvc).to_string(),
            email: self.fields.get(Field::Email).trim().to_string(),
            name_on_card: self.fields.get(Field::NameOnCard).trim().to_string(),
            address: self.fields.get(Field::Address).trim().to_string(),
            save_info: self.save_info,
        })
    }

    fn payer_email(&self) -> Option<String> {
        Some(self.fields.get(Field::Email).trim().to_string())
    }

    fn lifecycle(&self) -> &SubmissionLifecycle {
        &self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut SubmissionLifecycle {
        &mut self.lifecycle
    }

    fn visibility(&self) -> &ErrorVisibility {
        &self.visibility
    }

    fn visibility_mut(&mut self) -> &mut ErrorVisibility {
        &mut self.visibility
    }
}
