use crate::application::lifecycle::{PaymentForm, SubmissionLifecycle};
use crate::domain::fields::{ErrorVisibility, ValidationResult};
use crate::domain::method::PaymentMethod;
use crate::domain::settlement::MethodPayload;
use crate::error::{CheckoutError, Result};

/// One-tap confirmation sheet for device wallets, shown over the selection
/// screen. It has no fields; confirming submits straight to the processor.
#[derive(Debug, Clone, Default)]
pub struct ExpressSheet {
    open: Option<PaymentMethod>,
    visibility: ErrorVisibility,
    lifecycle: SubmissionLifecycle,
}

impl ExpressSheet {
    pub fn open_method(&self) -> Option<PaymentMethod> {
        self.open
    }

    pub fn is_open(&self) -> bool {
        self.open.is_some()
    }

    pub fn open(&mut self, method: PaymentMethod) -> Result<()> {
        if !method.is_express() {
            return Err(CheckoutError::InvalidArgument {
                action: "open_express".to_string(),
                reason: format!("{method} is not an express method"),
            });
        }
        if self.lifecycle.is_submitting() {
            return Err(CheckoutError::SubmissionInProgress);
        }
        tracing::debug!(%method, "express sheet opened");
        self.open = Some(method);
        self.lifecycle = SubmissionLifecycle::default();
        self.visibility.reset();
        Ok(())
    }

    /// Closes the sheet unless a payment is in flight.
    pub fn cancel(&mut self) -> Result<()> {
        if self.lifecycle.is_submitting() {
            return Err(CheckoutError::SubmissionInProgress);
        }
        self.open = None;
        Ok(())
    }

    /// Called once the payment settled and the checkout moved on.
    pub fn dismiss(&mut self) {
        self.lifecycle.abandon();
        self.open = None;
    }
}

impl PaymentForm for ExpressSheet {
    /// Fee schedule and logging only. Both express wallets share the card
    /// schedule, and submissions check the sheet is open before reading this.
    fn method(&self) -> PaymentMethod {
        self.open.unwrap_or(PaymentMethod::ExpressApple)
    }

    fn validate(&self) -> ValidationResult {
        ValidationResult::new()
    }

    fn precondition(&self) -> Result<()> {
        self.open.map(|_| ()).ok_or(CheckoutError::ExpressNotOpen)
    }

    fn payload(&self) -> Result<MethodPayload> {
        self.open
            .map(|method| MethodPayload::Express { method })
            .ok_or(CheckoutError::ExpressNotOpen)
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use rust_decimal_macros::dec;

    #[test]
    fn test_only_express_methods_open() {
        let mut sheet = ExpressSheet::default();
        assert!(sheet.open(PaymentMethod::Card).is_err());
        sheet.open(PaymentMethod::ExpressGoogle).unwrap();
        assert_eq!(sheet.open_method(), Some(PaymentMethod::ExpressGoogle));
    }

    #[test]
    fn test_cancel_refused_while_paying() {
        let mut sheet = ExpressSheet::default();
        sheet.open(PaymentMethod::ExpressApple).unwrap();
        let pending = sheet.begin_submission(Amount::new(dec!(25))).unwrap();
        assert_eq!(pending.request.totals.fee, Amount::new(dec!(1.025)));
        assert!(matches!(sheet.cancel(), Err(CheckoutError::SubmissionInProgress)));
        assert!(sheet.is_open());
    }

    #[test]
    fn test_confirm_requires_open_sheet() {
        let mut sheet = ExpressSheet::default();
        assert!(matches!(
            sheet.begin_submission(Amount::new(dec!(10))),
            Err(CheckoutError::ExpressNotOpen)
        ));
        assert!(matches!(sheet.payload(), Err(CheckoutError::ExpressNotOpen)));
    }

    #[test]
    fn test_payload_names_opened_wallet() {
        let mut sheet = ExpressSheet::default();
        sheet.open(PaymentMethod::ExpressGoogle).unwrap();
        let pending = sheet.begin_submission(Amount::new(dec!(10))).unwrap();
        assert_eq!(pending.request.method, PaymentMethod::ExpressGoogle);
        assert_eq!(
            pending.request.payload,
            MethodPayload::Express {
                method: PaymentMethod::ExpressGoogle
            }
        );
    }

    #[test]
    fn test_reopens_after_settling() {
        let mut sheet = ExpressSheet::default();
        sheet.open(PaymentMethod::ExpressApple).unwrap();
        let pending = sheet.begin_submission(Amount::new(dec!(10))).unwrap();
        let outcome = crate::domain::settlement::SettlementOutcome::from_request(&pending.request);
        sheet.complete_submission(pending.ticket, Ok(outcome)).unwrap();
        sheet.dismiss();

        sheet.open(PaymentMethod::ExpressGoogle).unwrap();
        assert!(sheet.can_submit());
    }
}
