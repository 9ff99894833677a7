use crate::application::checkout::Screen;
use crate::domain::fields::Field;
use crate::domain::method::PaymentMethod;
use miette::Diagnostic;
use thiserror::Error;

/// Why the payment processor refused or could not complete a submission.
///
/// Every variant leaves the form editable so the payer can retry.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ProcessorFailure {
    #[error("payment declined: {0}")]
    #[diagnostic(code(checkout::processor::declined))]
    Declined(String),
    #[error("payment processor timed out")]
    #[diagnostic(code(checkout::processor::timeout))]
    Timeout,
    #[error("payment processor unavailable: {0}")]
    #[diagnostic(code(checkout::processor::unavailable))]
    Unavailable(String),
}

#[derive(Error, Diagnostic, Debug)]
pub enum CheckoutError {
    #[error("cannot {action} while on the {screen} screen")]
    #[diagnostic(code(checkout::invalid_transition))]
    InvalidTransition {
        action: &'static str,
        screen: Screen,
    },

    #[error("form has {count} invalid field(s), first is {first}")]
    #[diagnostic(
        code(checkout::form_invalid),
        help("fix the highlighted fields and submit again")
    )]
    FormInvalid { first: Field, count: usize },

    #[error("connect a wallet before paying")]
    #[diagnostic(code(checkout::wallet_not_connected))]
    WalletNotConnected,

    #[error("a submission is already in progress")]
    #[diagnostic(code(checkout::submission_in_progress))]
    SubmissionInProgress,

    #[error("this payment has already settled")]
    #[diagnostic(code(checkout::already_settled))]
    AlreadySettled,

    #[error("the {method} form has no {field} field")]
    #[diagnostic(code(checkout::field_not_on_form))]
    FieldNotOnForm { method: PaymentMethod, field: Field },

    #[error("no {method} form is open")]
    #[diagnostic(code(checkout::form_not_open))]
    FormNotOpen { method: PaymentMethod },

    #[error("no express checkout is open")]
    #[diagnostic(code(checkout::express_not_open))]
    ExpressNotOpen,

    #[error("cannot {action} while the wallet is {state}")]
    #[diagnostic(code(checkout::wallet_transition))]
    WalletTransition {
        action: &'static str,
        state: &'static str,
    },

    #[error("submission result arrived for a form that is no longer active")]
    #[diagnostic(code(checkout::stale_submission))]
    StaleSubmission,

    #[error(transparent)]
    #[diagnostic(transparent)]
    Processor(#[from] ProcessorFailure),

    #[error("wallet authorization failed: {0}")]
    #[diagnostic(code(checkout::wallet_authorization))]
    WalletAuthorization(String),

    #[error("no saved profile named '{0}'")]
    #[diagnostic(code(checkout::unknown_profile))]
    UnknownProfile(String),

    #[error("unknown script action '{0}'")]
    #[diagnostic(code(checkout::script::unknown_action))]
    UnknownAction(String),

    #[error("invalid argument for '{action}': {reason}")]
    #[diagnostic(code(checkout::script::invalid_argument))]
    InvalidArgument { action: String, reason: String },

    #[error("CSV error: {0}")]
    #[diagnostic(code(checkout::csv))]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(checkout::io))]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    #[diagnostic(code(checkout::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, CheckoutError>;
