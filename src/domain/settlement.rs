use super::fees::Totals;
use super::method::{BankType, CardBrand, CryptoAsset, PaymentMethod, WalletId};
use super::money::Amount;
use serde::{Deserialize, Serialize};

/// Method-specific data handed to the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MethodPayload {
    Card {
        card_number: String,
        brand: CardBrand,
        expiry: String,
        cvc: String,
        email: String,
        name_on_card: String,
        address: String,
        save_info: bool,
    },
    Bank {
        bank_type: BankType,
        routing: String,
        account: String,
    },
    Crypto {
        wallet: WalletId,
        asset: CryptoAsset,
    },
    Express {
        method: PaymentMethod,
    },
}

/// Everything the processor needs for one submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentRequest {
    pub method: PaymentMethod,
    pub payload: MethodPayload,
    pub totals: Totals,
    pub payer_email: Option<String>,
}

/// Result of a successful submission, shown on the success and receipt screens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementOutcome {
    pub method: PaymentMethod,
    pub amount: Amount,
    pub total: Amount,
    pub payer_email: Option<String>,
}

impl SettlementOutcome {
    pub fn from_request(request: &PaymentRequest) -> Self {
        Self {
            method: request.method,
            amount: request.totals.subtotal,
            total: request.totals.total,
            payer_email: request.payer_email.clone(),
        }
    }

    pub fn fee(&self) -> Amount {
        Amount::new(self.total.value() - self.amount.value())
    }

    fn email(&self) -> Option<&str> {
        self.payer_email
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Who the success screen says the receipt was sent to.
    pub fn success_recipient(&self) -> &str {
        self.email().unwrap_or("you")
    }

    /// Recipient line on the receipt itself.
    pub fn receipt_recipient(&self) -> &str {
        self.email().unwrap_or("—")
    }
}

/// Stored card details a payer can pick instead of typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProfile {
    pub card_number: String,
    pub expiry: String,
    pub cvc: String,
    pub email: String,
    pub name_on_card: String,
    pub address: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn outcome(email: Option<&str>) -> SettlementOutcome {
        SettlementOutcome {
            method: PaymentMethod::Card,
            amount: Amount::new(dec!(10)),
            total: Amount::new(dec!(10.59)),
            payer_email: email.map(str::to_string),
        }
    }

    #[test]
    fn test_fee_is_total_minus_amount() {
        assert_eq!(outcome(None).fee(), Amount::new(dec!(0.59)));
    }

    #[test]
    fn test_recipient_placeholders() {
        assert_eq!(outcome(None).success_recipient(), "you");
        assert_eq!(outcome(Some("   ")).receipt_recipient(), "—");
        assert_eq!(outcome(Some(" a@b.co ")).success_recipient(), "a@b.co");
    }
}
