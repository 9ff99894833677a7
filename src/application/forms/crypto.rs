use crate::application::lifecycle::{PaymentForm, SubmissionLifecycle};
use crate::domain::fields::{ErrorVisibility, Field, FieldError, ValidationResult};
use crate::domain::method::{CryptoAsset, PaymentMethod, WalletId};
use crate::domain::ports::WalletAuthorizer;
use crate::domain::settlement::MethodPayload;
use crate::error::{CheckoutError, Result};

/// Wallet connection sub-lifecycle.
///
/// `AuthPending` only becomes `Connected` through an explicit approval;
/// `Connecting` is the approval in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WalletConnection {
    #[default]
    Disconnected,
    AuthPending(WalletId),
    Connecting(WalletId),
    Connected(WalletId),
}

impl WalletConnection {
    fn name(&self) -> &'static str {
        match self {
            WalletConnection::Disconnected => "disconnected",
            WalletConnection::AuthPending(_) => "awaiting authorization",
            WalletConnection::Connecting(_) => "connecting",
            WalletConnection::Connected(_) => "connected",
        }
    }

    pub fn connected_wallet(&self) -> Option<WalletId> {
        match self {
            WalletConnection::Connected(wallet) => Some(*wallet),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CryptoForm {
    connection: WalletConnection,
    selected_asset: Option<CryptoAsset>,
    visibility: ErrorVisibility,
    lifecycle: SubmissionLifecycle,
}

impl CryptoForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn connection(&self) -> WalletConnection {
        self.connection
    }

    pub fn selected_asset(&self) -> Option<CryptoAsset> {
        self.selected_asset
    }

    fn refuse(&self, action: &'static str) -> CheckoutError {
        CheckoutError::WalletTransition {
            action,
            state: self.connection.name(),
        }
    }

    /// Opens the authorization prompt for `wallet`. Picking another wallet
    /// while a prompt is open replaces it.
    pub fn select_wallet(&mut self, wallet: WalletId) -> Result<()> {
        match self.connection {
            WalletConnection::Disconnected | WalletConnection::AuthPending(_) => {
                tracing::debug!(%wallet, "wallet authorization requested");
                self.connection = WalletConnection::AuthPending(wallet);
                Ok(())
            }
            _ => Err(self.refuse("select a wallet")),
        }
    }

    pub fn cancel_authorization(&mut self) -> Result<()> {
        match self.connection {
            WalletConnection::AuthPending(_) => {
                self.connection = WalletConnection::Disconnected;
                Ok(())
            }
            _ => Err(self.refuse("cancel authorization")),
        }
    }

    /// Approves the pending prompt and waits for the wallet to authorize.
    ///
    /// On failure the prompt stays open so the payer can retry or cancel.
    pub async fn approve(&mut self, authorizer: &dyn WalletAuthorizer) -> Result<WalletId> {
        let WalletConnection::AuthPending(wallet) = self.connection else {
            return Err(self.refuse("approve a connection"));
        };
        self.connection = WalletConnection::Connecting(wallet);
        match authorizer.authorize(wallet).await {
            Ok(()) => {
                tracing::info!(%wallet, "wallet connected");
                self.connection = WalletConnection::Connected(wallet);
                self.selected_asset = Some(CryptoAsset::Usdc);
                Ok(wallet)
            }
            Err(e) => {
                tracing::warn!(%wallet, error = %e, "wallet authorization failed");
                self.connection = WalletConnection::AuthPending(wallet);
                Err(e)
            }
        }
    }

    /// Drops the connection and the asset chosen with it.
    pub fn disconnect(&mut self) -> Result<()> {
        self.lifecycle.ensure_editable()?;
        match self.connection {
            WalletConnection::Connected(wallet) => {
                tracing::info!(%wallet, "wallet disconnected");
                self.connection = WalletConnection::Disconnected;
                self.selected_asset = None;
                Ok(())
            }
            _ => Err(self.refuse("disconnect")),
        }
    }

    pub fn select_asset(&mut self, asset: CryptoAsset) -> Result<()> {
        if self.connection.connected_wallet().is_none() {
            return Err(CheckoutError::WalletNotConnected);
        }
        self.selected_asset = Some(asset);
        Ok(())
    }

    pub fn touch(&mut self, field: Field) -> Result<()> {
        if !matches!(field, Field::ConnectedWallet | Field::SelectedAsset) {
            return Err(CheckoutError::FieldNotOnForm {
                method: PaymentMethod::Crypto,
                field,
            });
        }
        self.visibility.touch(field);
        Ok(())
    }
}

impl PaymentForm for CryptoForm {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Crypto
    }

    fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::new();
        result.check(
            Field::ConnectedWallet,
            self.connection.connected_wallet().is_some(),
            FieldError::MissingWallet,
        );
        result.check(
            Field::SelectedAsset,
            self.selected_asset.is_some(),
            FieldError::MissingAsset,
        );
        result
    }

    fn precondition(&self) -> Result<()> {
        self.connection
            .connected_wallet()
            .map(|_| ())
            .ok_or(CheckoutError::WalletNotConnected)
    }

    fn payload(&self) -> Result<MethodPayload> {
        let wallet = self
            .connection
            .connected_wallet()
            .ok_or(CheckoutError::WalletNotConnected)?;
        let asset = self.selected_asset.ok_or(CheckoutError::FormInvalid {
            first: Field::SelectedAsset,
            count: 1,
        })?;
        Ok(MethodPayload::Crypto { wallet, asset })
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
