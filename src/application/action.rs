use crate::domain::fields::Field;
use crate::domain::method::{BankType, CryptoAsset, PaymentMethod, WalletId};
use crate::domain::money::Amount;

/// A single payer interaction with the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    PickAmount(Amount),
    EnterCustomAmount(String),
    FocusCustomAmount,
    SelectMethod(PaymentMethod),
    Back,
    SetField(Field, String),
    Touch(Field),
    SetBankType(BankType),
    SelectProfile(String),
    SetSaveInfo(bool),
    SelectWallet(WalletId),
    ApproveWallet,
    CancelWallet,
    DisconnectWallet,
    SelectAsset(CryptoAsset),
    OpenExpress(PaymentMethod),
    CancelExpress,
    Submit,
    ViewReceipt,
    Done,
    Close,
}
