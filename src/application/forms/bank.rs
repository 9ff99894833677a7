use crate::application::lifecycle::{PaymentForm, SubmissionLifecycle};
use crate::domain::fields::{ErrorVisibility, Field, FieldError, FormFields, ValidationResult};
use crate::domain::method::{BankType, PaymentMethod};
use crate::domain::settlement::MethodPayload;
use crate::domain::validators::{account_valid, normalize_account, normalize_routing, routing_valid};
use crate::error::{CheckoutError, Result};

#[derive(Debug, Clone, Default)]
pub struct BankForm {
    bank_type: BankType,
    fields: FormFields,
    visibility: ErrorVisibility,
    lifecycle: SubmissionLifecycle,
}

impl BankForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bank_type(&self) -> BankType {
        self.bank_type
    }

    pub fn field(&self, field: Field) -> &str {
        match field {
            Field::BankType => self.bank_type_str(),
            other => self.fields.get(other),
        }
    }

    fn bank_type_str(&self) -> &'static str {
        match self.bank_type {
            BankType::Us => "us",
            BankType::Euro => "euro",
            BankType::Uk => "uk",
        }
    }

    /// Existing input is kept; its validity is re-judged under the new type.
    pub fn set_bank_type(&mut self, bank_type: BankType) {
        tracing::debug!(bank_type = bank_type.label(), "bank type changed");
        self.bank_type = bank_type;
    }

    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<()> {
        match field {
            Field::BankType => {
                let bank_type = raw.parse().map_err(|reason| CheckoutError::InvalidArgument {
                    action: "set_field".to_string(),
                    reason,
                })?;
                self.set_bank_type(bank_type);
            }
            Field::Routing => {
                let value = normalize_routing(raw, self.bank_type);
                self.fields.set(field, value);
            }
            Field::Account => {
                let value = normalize_account(raw, self.bank_type);
                self.fields.set(field, value);
            }
            other => {
                return Err(CheckoutError::FieldNotOnForm {
                    method: PaymentMethod::Bank,
                    field: other,
                });
            }
        }
        tracing::debug!(%field, "bank field edited");
        Ok(())
    }

    pub fn touch(&mut self, field: Field) -> Result<()> {
        if !matches!(field, Field::BankType | Field::Routing | Field::Account) {
            return Err(CheckoutError::FieldNotOnForm {
                method: PaymentMethod::Bank,
                field,
            });
        }
        self.visibility.touch(field);
        Ok(())
    }
}

impl PaymentForm for BankForm {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Bank
    }

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        let routing_error = match self.bank_type {
            BankType::Us => FieldError::InvalidUsRouting,
            BankType::Uk => FieldError::InvalidSortCode,
            BankType::Euro => FieldError::InvalidBic,
        };
        result.check(
            Field::Routing,
            routing_valid(self.fields.get(Field::Routing), self.bank_type),
            routing_error,
        );
        result.check(
            Field::Account,
            account_valid(self.fields.get(Field::Account)),
            FieldError::InvalidAccount,
        );
        result
    }

    fn payload(&self) -> Result<MethodPayload> {
        Ok(MethodPayload::Bank {
            bank_type: self.bank_type,
            routing: self.fields.get(Field::Routing).to_string(),
            account: self.fields.get(Field::Account).to_string(),
        })
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
