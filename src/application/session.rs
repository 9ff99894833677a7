use crate::application::action::Action;
use crate::application::amount::AmountSelector;
use crate::application::checkout::{CheckoutStateMachine, Receipt, Screen};
use crate::application::express::ExpressSheet;
use crate::application::forms::ActiveForm;
use crate::application::forms::bank::BankForm;
use crate::application::forms::card::CardForm;
use crate::application::forms::crypto::CryptoForm;
use crate::application::lifecycle::{PaymentForm, PendingSubmission};
use crate::config::CheckoutConfig;
use crate::domain::fees::Totals;
use crate::domain::fields::{Field, ValidationResult};
use crate::domain::method::{BankType, CryptoAsset, PaymentMethod, WalletId};
use crate::domain::money::Amount;
use crate::domain::ports::{PaymentProcessorBox, ProfileStoreBox, WalletAuthorizerBox};
use crate::domain::settlement::SettlementOutcome;
use crate::error::{CheckoutError, ProcessorFailure, Result};
use chrono::NaiveDate;
use serde::Serialize;

/// One settled payment, as reported at the end of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SettlementRecord {
    pub method: PaymentMethod,
    pub subtotal: Amount,
    pub fee: Amount,
    pub total: Amount,
    pub email: Option<String>,
    pub receipt_id: Option<String>,
}

/// A submission started by the session, tagged with the mount it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSubmission {
    mount: u64,
    pub pending: PendingSubmission,
}

/// Drives a whole checkout: amount selection, the mounted method form, the
/// express sheet and the screen state machine, wired to the external
/// collaborators.
///
/// Every mount of a form (or opening of the express sheet) gets a new mount
/// number. A processor result is only applied if its mount is still current,
/// so abandoning a form mid-submission can never settle it later.
pub struct CheckoutSession {
    machine: CheckoutStateMachine,
    amount: AmountSelector,
    express: ExpressSheet,
    form: Option<ActiveForm>,
    mount: u64,
    reference_date: NaiveDate,
    profiles: ProfileStoreBox,
    processor: PaymentProcessorBox,
    wallets: WalletAuthorizerBox,
    history: Vec<SettlementRecord>,
}

impl CheckoutSession {
    pub fn new(
        config: &CheckoutConfig,
        profiles: ProfileStoreBox,
        processor: PaymentProcessorBox,
        wallets: WalletAuthorizerBox,
    ) -> Self {
        let amount = AmountSelector::new(config.presets.clone(), config.initial_amount);
        Self {
            machine: CheckoutStateMachine::new(amount.value()),
            amount,
            express: ExpressSheet::default(),
            form: None,
            mount: 0,
            reference_date: config.reference_date,
            profiles,
            processor,
            wallets,
            history: Vec::new(),
        }
    }

    pub fn screen(&self) -> Screen {
        self.machine.screen()
    }

    pub fn amount(&self) -> Amount {
        self.machine.amount()
    }

    pub fn amount_selector(&self) -> &AmountSelector {
        &self.amount
    }

    pub fn outcome(&self) -> Option<&SettlementOutcome> {
        self.machine.outcome()
    }

    pub fn receipt(&self) -> Option<&Receipt> {
        self.machine.receipt()
    }

    pub fn form(&self) -> Option<&ActiveForm> {
        self.form.as_ref()
    }

    pub fn express(&self) -> &ExpressSheet {
        &self.express
    }

    pub fn history(&self) -> &[SettlementRecord] {
        &self.history
    }

    /// Totals for whatever is being paid right now: the mounted form, or the
    /// open express sheet.
    pub fn totals(&self) -> Option<Totals> {
        let subtotal = self.amount();
        if let Some(form) = &self.form {
            return Some(form.as_form().totals(subtotal));
        }
        self.express
            .is_open()
            .then(|| self.express.totals(subtotal))
    }

    /// Errors the payer should currently see on the mounted form.
    pub fn visible_errors(&self) -> ValidationResult {
        self.form
            .as_ref()
            .map(|f| f.as_form().visible_errors())
            .unwrap_or_default()
    }

    fn remount(&mut self, form: Option<ActiveForm>) {
        self.form = form;
        self.mount += 1;
    }

    fn update_amount(&mut self, change: impl FnOnce(&mut AmountSelector) -> Amount) -> Result<Amount> {
        let mut selector = self.amount.clone();
        let value = change(&mut selector);
        self.machine.set_amount(value)?;
        self.amount = selector;
        tracing::debug!(amount = %value, "amount changed");
        Ok(value)
    }

    pub fn pick_amount(&mut self, amount: Amount) -> Result<Amount> {
        self.update_amount(|s| s.pick_preset(amount))
    }

    pub fn enter_custom_amount(&mut self, raw: &str) -> Result<Amount> {
        self.update_amount(|s| s.enter_custom(raw))
    }

    pub fn focus_custom_amount(&mut self) -> Result<Amount> {
        self.update_amount(|s| s.focus_custom())
    }

    pub fn select_method(&mut self, method: PaymentMethod) -> Result<Screen> {
        self.express.cancel()?;
        let screen = self.machine.select_method(method)?;
        self.remount(ActiveForm::mount(method, self.reference_date));
        Ok(screen)
    }

    /// Leaves the form; everything typed into it is discarded.
    pub fn back(&mut self) -> Result<()> {
        self.machine.back()?;
        self.remount(None);
        Ok(())
    }

    fn card_mut(&mut self) -> Result<&mut CardForm> {
        match self.form.as_mut() {
            Some(ActiveForm::Card(form)) => Ok(form),
            _ => Err(CheckoutError::FormNotOpen {
                method: PaymentMethod::Card,
            }),
        }
    }

    fn bank_mut(&mut self) -> Result<&mut BankForm> {
        match self.form.as_mut() {
            Some(ActiveForm::Bank(form)) => Ok(form),
            _ => Err(CheckoutError::FormNotOpen {
                method: PaymentMethod::Bank,
            }),
        }
    }

    fn crypto_mut(&mut self) -> Result<&mut CryptoForm> {
        match self.form.as_mut() {
            Some(ActiveForm::Crypto(form)) => Ok(form),
            _ => Err(CheckoutError::FormNotOpen {
                method: PaymentMethod::Crypto,
            }),
        }
    }

    pub fn set_field(&mut self, field: Field, raw: &str) -> Result<()> {
        let screen = self.screen();
        match self.form.as_mut() {
            Some(ActiveForm::Card(form)) => form.set_field(field, raw),
            Some(ActiveForm::Bank(form)) => form.set_field(field, raw),
            Some(ActiveForm::Crypto(form)) => match field {
                Field::SelectedAsset => form.select_asset(parse_arg("set_field", raw)?),
                Field::ConnectedWallet => form.select_wallet(parse_arg("set_field", raw)?),
                other => Err(CheckoutError::FieldNotOnForm {
                    method: PaymentMethod::Crypto,
                    field: other,
                }),
            },
            None => Err(CheckoutError::InvalidTransition {
                action: "edit a field",
                screen,
            }),
        }
    }

    pub fn touch(&mut self, field: Field) -> Result<()> {
        let screen = self.screen();
        match self.form.as_mut() {
            Some(ActiveForm::Card(form)) => form.touch(field),
            Some(ActiveForm::Bank(form)) => form.touch(field),
            Some(ActiveForm::Crypto(form)) => form.touch(field),
            None => Err(CheckoutError::InvalidTransition {
                action: "leave a field",
                screen,
            }),
        }
    }

    pub fn set_bank_type(&mut self, bank_type: BankType) -> Result<()> {
        self.bank_mut()?.set_bank_type(bank_type);
        Ok(())
    }

    pub async fn select_profile(&mut self, key: &str) -> Result<()> {
        let Some(ActiveForm::Card(form)) = self.form.as_mut() else {
            return Err(CheckoutError::FormNotOpen {
                method: PaymentMethod::Card,
            });
        };
        form.select_profile(self.profiles.as_ref(), key).await
    }

    pub fn set_save_info(&mut self, save: bool) -> Result<()> {
        self.card_mut()?.set_save_info(save);
        Ok(())
    }

    pub fn select_wallet(&mut self, wallet: WalletId) -> Result<()> {
        self.crypto_mut()?.select_wallet(wallet)
    }

    pub async fn approve_wallet(&mut self) -> Result<WalletId> {
        let Some(ActiveForm::Crypto(form)) = self.form.as_mut() else {
            return Err(CheckoutError::FormNotOpen {
                method: PaymentMethod::Crypto,
            });
        };
        form.approve(self.wallets.as_ref()).await
    }

    pub fn cancel_wallet(&mut self) -> Result<()> {
        self.crypto_mut()?.cancel_authorization()
    }

    pub fn disconnect_wallet(&mut self) -> Result<()> {
        self.crypto_mut()?.disconnect()
    }

    pub fn select_asset(&mut self, asset: CryptoAsset) -> Result<()> {
        self.crypto_mut()?.select_asset(asset)
    }

    pub fn open_express(&mut self, method: PaymentMethod) -> Result<()> {
        if self.screen() != Screen::Selection {
            return Err(CheckoutError::InvalidTransition {
                action: "open express checkout",
                screen: self.screen(),
            });
        }
        self.express.open(method)?;
        self.mount += 1;
        Ok(())
    }

    pub fn cancel_express(&mut self) -> Result<()> {
        self.express.cancel()?;
        self.mount += 1;
        Ok(())
    }

    /// Starts a submission on the mounted form, or on the express sheet when
    /// it is open over the selection screen.
    pub fn begin_submit(&mut self) -> Result<SessionSubmission> {
        let subtotal = self.amount();
        let screen = self.screen();
        let pending = match (screen, self.form.as_mut()) {
            (Screen::Selection, None) if self.express.is_open() => {
                self.express.begin_submission(subtotal)?
            }
            (s, Some(form)) if s.is_form() => form.as_form_mut().begin_submission(subtotal)?,
            _ => {
                return Err(CheckoutError::InvalidTransition {
                    action: "submit a payment",
                    screen,
                });
            }
        };
        Ok(SessionSubmission {
            mount: self.mount,
            pending,
        })
    }

    /// Applies a processor result to the submission it belongs to.
    pub fn complete_submit(
        &mut self,
        submission: SessionSubmission,
        result: std::result::Result<SettlementOutcome, ProcessorFailure>,
    ) -> Result<&SettlementOutcome> {
        if submission.mount != self.mount {
            tracing::warn!(
                method = %submission.pending.request.method,
                "discarding result of an abandoned submission"
            );
            return Err(CheckoutError::StaleSubmission);
        }

        let ticket = submission.pending.ticket;
        let outcome = if submission.pending.request.method.is_express() {
            self.express.complete_submission(ticket, result)?
        } else {
            let form = self.form.as_mut().ok_or(CheckoutError::StaleSubmission)?;
            form.as_form_mut().complete_submission(ticket, result)?
        };

        self.machine.settle(outcome.clone())?;
        self.history.push(SettlementRecord {
            method: outcome.method,
            subtotal: outcome.amount,
            fee: outcome.fee(),
            total: outcome.total,
            email: outcome.payer_email.clone(),
            receipt_id: None,
        });
        self.express.dismiss();
        self.remount(None);
        self.machine.outcome().ok_or(CheckoutError::StaleSubmission)
    }

    pub async fn submit(&mut self) -> Result<&SettlementOutcome> {
        let submission = self.begin_submit()?;
        let result = self.processor.submit(submission.pending.request.clone()).await;
        self.complete_submit(submission, result)
    }

    pub fn view_receipt(&mut self) -> Result<&Receipt> {
        let receipt = self.machine.view_receipt()?;
        if let Some(record) = self.history.last_mut() {
            record.receipt_id = Some(receipt.id.clone());
        }
        Ok(receipt)
    }

    pub fn done(&mut self) -> Result<()> {
        self.machine.done()
    }

    pub fn close(&mut self) -> Result<()> {
        self.machine.close()
    }

    pub async fn apply(&mut self, action: Action) -> Result<()> {
        tracing::debug!(?action, screen = %self.screen(), "applying action");
        match action {
            Action::PickAmount(amount) => self.pick_amount(amount).map(drop),
            Action::EnterCustomAmount(raw) => self.enter_custom_amount(&raw).map(drop),
            Action::FocusCustomAmount => self.focus_custom_amount().map(drop),
            Action::SelectMethod(method) => self.select_method(method).map(drop),
            Action::Back => self.back(),
            Action::SetField(field, raw) => self.set_field(field, &raw),
            Action::Touch(field) => self.touch(field),
            Action::SetBankType(bank_type) => self.set_bank_type(bank_type),
            Action::SelectProfile(key) => self.select_profile(&key).await,
            Action::SetSaveInfo(save) => self.set_save_info(save),
            Action::SelectWallet(wallet) => self.select_wallet(wallet),
            Action::ApproveWallet => self.approve_wallet().await.map(drop),
            Action::CancelWallet => self.cancel_wallet(),
            Action::DisconnectWallet => self.disconnect_wallet(),
            Action::SelectAsset(asset) => self.select_asset(asset),
            Action::OpenExpress(method) => self.open_express(method),
            Action::CancelExpress => self.cancel_express(),
            Action::Submit => self.submit().await.map(drop),
            Action::ViewReceipt => self.view_receipt().map(drop),
            Action::Done => self.done(),
            Action::Close => self.close(),
        }
    }
}

fn parse_arg<T>(action: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    raw.parse().map_err(|reason| CheckoutError::InvalidArgument {
        action: action.to_string(),
        reason,
    })
}
