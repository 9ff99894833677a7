//! Submission lifecycle shared by every payment form.
//!
//! `Editing -> Submitting -> (Settled | Editing)`. Starting a submission hands
//! out a ticket; only the ticket of the current attempt can complete it, so a
//! result that comes back after the form was abandoned is discarded instead of
//! mutating state that no longer belongs to it.

use crate::domain::fees::{Totals, compute_totals};
use crate::domain::fields::{ErrorVisibility, ValidationResult};
use crate::domain::method::PaymentMethod;
use crate::domain::money::Amount;
use crate::domain::ports::PaymentProcessor;
use crate::domain::settlement::{MethodPayload, PaymentRequest, SettlementOutcome};
use crate::error::{CheckoutError, ProcessorFailure, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SubmissionState {
    #[default]
    Editing,
    Submitting,
    Settled,
}

/// Proof of which attempt a processor result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmissionTicket(u64);

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionLifecycle {
    state: SubmissionState,
    attempt: u64,
    last_failure: Option<ProcessorFailure>,
}

impl SubmissionLifecycle {
    pub fn state(&self) -> SubmissionState {
        self.state
    }

    pub fn is_submitting(&self) -> bool {
        self.state == SubmissionState::Submitting
    }

    /// Failure from the most recent attempt, cleared when a new one starts.
    pub fn last_failure(&self) -> Option<&ProcessorFailure> {
        self.last_failure.as_ref()
    }

    pub fn ensure_editable(&self) -> Result<()> {
        match self.state {
            SubmissionState::Editing => Ok(()),
            SubmissionState::Submitting => Err(CheckoutError::SubmissionInProgress),
            SubmissionState::Settled => Err(CheckoutError::AlreadySettled),
        }
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self, validation: &ValidationResult) -> bool {
        self.state == SubmissionState::Editing && validation.is_empty()
    }

    pub fn begin(&mut self, validation: &ValidationResult) -> Result<SubmissionTicket> {
        self.ensure_editable()?;
        if let Some(first) = validation.first_invalid() {
            return Err(CheckoutError::FormInvalid {
                first,
                count: validation.len(),
            });
        }
        self.attempt += 1;
        self.state = SubmissionState::Submitting;
        self.last_failure = None;
        Ok(SubmissionTicket(self.attempt))
    }

    pub fn complete(
        &mut self,
        ticket: SubmissionTicket,
        result: std::result::Result<SettlementOutcome, ProcessorFailure>,
    ) -> Result<SettlementOutcome> {
        if self.state != SubmissionState::Submitting || ticket.0 != self.attempt {
            return Err(CheckoutError::StaleSubmission);
        }
        match result {
            Ok(outcome) => {
                self.state = SubmissionState::Settled;
                Ok(outcome)
            }
            Err(failure) => {
                self.state = SubmissionState::Editing;
                self.last_failure = Some(failure.clone());
                Err(failure.into())
            }
        }
    }

    /// Drops any in-flight attempt; its result will be rejected as stale.
    pub fn abandon(&mut self) {
        self.attempt += 1;
        if self.state == SubmissionState::Submitting {
            self.state = SubmissionState::Editing;
        }
    }
}

/// A started submission waiting for the processor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub ticket: SubmissionTicket,
    pub request: PaymentRequest,
}

/// The shape every payment-method form shares.
pub trait PaymentForm {
    fn method(&self) -> PaymentMethod;

    /// Per-field validity of the current input.
    fn validate(&self) -> ValidationResult;

    /// What the processor receives. Fails if the form lacks something the
    /// payload needs, such as a connected wallet.
    fn payload(&self) -> Result<MethodPayload>;

    fn lifecycle(&self) -> &SubmissionLifecycle;

    fn lifecycle_mut(&mut self) -> &mut SubmissionLifecycle;

    fn visibility(&self) -> &ErrorVisibility;

    fn visibility_mut(&mut self) -> &mut ErrorVisibility;

    /// Checked before field validity.
    fn precondition(&self) -> Result<()> {
        Ok(())
    }

    fn payer_email(&self) -> Option<String> {
        None
    }

    fn totals(&self, subtotal: Amount) -> Totals {
        compute_totals(subtotal, self.method())
    }

    fn visible_errors(&self) -> ValidationResult {
        self.visibility().visible(&self.validate())
    }

    fn can_submit(&self) -> bool {
        self.precondition().is_ok() && self.lifecycle().can_submit(&self.validate())
    }

    fn begin_submission(&mut self, subtotal: Amount) -> Result<PendingSubmission> {
        self.lifecycle().ensure_editable()?;
        self.visibility_mut().mark_submit_attempted();
        self.precondition().inspect_err(|e| {
            tracing::warn!(error = %e, "submission precondition not met");
        })?;
        let method = self.method();
        let validation = self.validate();
        let ticket = self.lifecycle_mut().begin(&validation).inspect_err(|e| {
            tracing::warn!(%method, error = %e, "submission blocked");
        })?;
        let payload = match self.payload() {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(%method, error = %e, "submission blocked");
                self.lifecycle_mut().abandon();
                return Err(e);
            }
        };
        let request = PaymentRequest {
            method,
            payload,
            totals: self.totals(subtotal),
            payer_email: self.payer_email(),
        };
        tracing::info!(method = %request.method, total = %request.totals.total, "submitting payment");
        Ok(PendingSubmission { ticket, request })
    }

    fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: std::result::Result<SettlementOutcome, ProcessorFailure>,
    ) -> Result<SettlementOutcome> {
        let method = self.method();
        self.lifecycle_mut().complete(ticket, result).inspect_err(|e| {
            tracing::warn!(%method, error = %e, "submission did not settle");
        })
    }
}

/// Runs one attempt end to end against `processor`.
pub async fn submit_form<F>(
    form: &mut F,
    subtotal: Amount,
    processor: &dyn PaymentProcessor,
) -> Result<SettlementOutcome>
where
    F: PaymentForm + ?Sized,
{
    let pending = form.begin_submission(subtotal)?;
    let result = processor.submit(pending.request).await;
    form.complete_submission(pending.ticket, result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::{Field, FieldError};
    use rust_decimal_macros::dec;

    fn outcome() -> SettlementOutcome {
        SettlementOutcome {
            method: PaymentMethod::Bank,
            amount: Amount::new(dec!(10)),
            total: Amount::new(dec!(10.10)),
            payer_email: None,
        }
    }

    #[test]
    fn test_begin_blocked_by_invalid_fields() {
        let mut lifecycle = SubmissionLifecycle::default();
        let mut validation = ValidationResult::new();
        validation.insert(Field::Account, FieldError::InvalidAccount);

        let err = lifecycle.begin(&validation).unwrap_err();
        assert!(matches!(
            err,
            CheckoutError::FormInvalid {
                first: Field::Account,
                count: 1
            }
        ));
        assert_eq!(lifecycle.state(), SubmissionState::Editing);
    }

    #[test]
    fn test_no_double_submit() {
        let mut lifecycle = SubmissionLifecycle::default();
        lifecycle.begin(&ValidationResult::new()).unwrap();
        assert!(matches!(
            lifecycle.begin(&ValidationResult::new()),
            Err(CheckoutError::SubmissionInProgress)
        ));
        assert!(!lifecycle.can_submit(&ValidationResult::new()));
    }

    #[test]
    fn test_failure_returns_to_editing() {
        let mut lifecycle = SubmissionLifecycle::default();
        let ticket = lifecycle.begin(&ValidationResult::new()).unwrap();
        let err = lifecycle
            .complete(ticket, Err(ProcessorFailure::Timeout))
            .unwrap_err();
        assert!(matches!(err, CheckoutError::Processor(ProcessorFailure::Timeout)));
        assert_eq!(lifecycle.state(), SubmissionState::Editing);
        assert_eq!(lifecycle.last_failure(), Some(&ProcessorFailure::Timeout));

        // retry is possible and clears the failure
        lifecycle.begin(&ValidationResult::new()).unwrap();
        assert_eq!(lifecycle.last_failure(), None);
    }

    #[test]
    fn test_success_settles() {
        let mut lifecycle = SubmissionLifecycle::default();
        let ticket = lifecycle.begin(&ValidationResult::new()).unwrap();
        assert_eq!(lifecycle.complete(ticket, Ok(outcome())).unwrap(), outcome());
        assert_eq!(lifecycle.state(), SubmissionState::Settled);
        assert!(matches!(
            lifecycle.begin(&ValidationResult::new()),
            Err(CheckoutError::AlreadySettled)
        ));
    }

    #[test]
    fn test_abandoned_attempt_is_stale() {
        let mut lifecycle = SubmissionLifecycle::default();
        let ticket = lifecycle.begin(&ValidationResult::new()).unwrap();
        lifecycle.abandon();
        assert!(matches!(
            lifecycle.complete(ticket, Ok(outcome())),
            Err(CheckoutError::StaleSubmission)
        ));
        assert_eq!(lifecycle.state(), SubmissionState::Editing);

        let fresh = lifecycle.begin(&ValidationResult::new()).unwrap();
        assert!(matches!(
            lifecycle.complete(ticket, Ok(outcome())),
            Err(CheckoutError::StaleSubmission)
        ));
        assert!(lifecycle.complete(fresh, Ok(outcome())).is_ok());
    }
}
