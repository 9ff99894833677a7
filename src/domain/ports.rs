use super::method::WalletId;
use super::settlement::{PaymentRequest, SavedProfile, SettlementOutcome};
use crate::error::{ProcessorFailure, Result};
use async_trait::async_trait;

/// Read-only lookup of saved card profiles.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn find(&self, key: &str) -> Result<Option<SavedProfile>>;
    async fn keys(&self) -> Result<Vec<String>>;
}

/// Settles a payment. Implementations may take arbitrarily long and may fail.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    async fn submit(
        &self,
        request: PaymentRequest,
    ) -> std::result::Result<SettlementOutcome, ProcessorFailure>;
}

/// Performs the wallet-side authorization once the payer approves a connection.
#[async_trait]
pub trait WalletAuthorizer: Send + Sync {
    async fn authorize(&self, wallet: WalletId) -> Result<()>;
}

pub type ProfileStoreBox = Box<dyn ProfileStore>;
pub type PaymentProcessorBox = Box<dyn PaymentProcessor>;
pub type WalletAuthorizerBox = Box<dyn WalletAuthorizer>;
