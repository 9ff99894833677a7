use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the payer chose to pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Card,
    Bank,
    Crypto,
    ExpressApple,
    ExpressGoogle,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Card => "card",
            PaymentMethod::Bank => "bank",
            PaymentMethod::Crypto => "crypto",
            PaymentMethod::ExpressApple => "express_apple",
            PaymentMethod::ExpressGoogle => "express_google",
        }
    }

    pub fn is_express(&self) -> bool {
        matches!(self, PaymentMethod::ExpressApple | PaymentMethod::ExpressGoogle)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "card" => Ok(PaymentMethod::Card),
            "bank" => Ok(PaymentMethod::Bank),
            "crypto" => Ok(PaymentMethod::Crypto),
            "express_apple" | "apple" => Ok(PaymentMethod::ExpressApple),
            "express_google" | "google" => Ok(PaymentMethod::ExpressGoogle),
            other => Err(format!("unknown payment method '{other}'")),
        }
    }
}

/// Bank rails offered by the bank form. Decides how routing is validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BankType {
    #[default]
    Us,
    Euro,
    Uk,
}

impl BankType {
    pub fn label(&self) -> &'static str {
        match self {
            BankType::Us => "US wire transfer",
            BankType::Euro => "Euro bank",
            BankType::Uk => "UK bank",
        }
    }

    pub fn routing_label(&self) -> &'static str {
        match self {
            BankType::Us => "Routing number",
            BankType::Euro => "BIC / SWIFT",
            BankType::Uk => "Sort code",
        }
    }

    pub fn settlement_hint(&self) -> &'static str {
        match self {
            BankType::Us => "ACH / Wire. Funds typically arrive in 1-3 business days.",
            BankType::Euro => "SEPA transfer. Funds typically arrive in 1-2 business days.",
            BankType::Uk => "Faster Payment or BACS. Funds typically arrive within 1 business day.",
        }
    }
}

impl FromStr for BankType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" => Ok(BankType::Us),
            "euro" | "eu" => Ok(BankType::Euro),
            "uk" => Ok(BankType::Uk),
            other => Err(format!("unknown bank type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CryptoAsset {
    Usdc,
    Sol,
    Eth,
}

impl CryptoAsset {
    pub const ALL: [CryptoAsset; 3] = [CryptoAsset::Usdc, CryptoAsset::Sol, CryptoAsset::Eth];

    pub fn label(&self) -> &'static str {
        match self {
            CryptoAsset::Usdc => "USDC",
            CryptoAsset::Sol => "SOL",
            CryptoAsset::Eth => "ETH",
        }
    }

    pub fn network(&self) -> &'static str {
        match self {
            CryptoAsset::Usdc | CryptoAsset::Sol => "Solana",
            CryptoAsset::Eth => "Ethereum",
        }
    }
}

impl FromStr for CryptoAsset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "usdc" => Ok(CryptoAsset::Usdc),
            "sol" => Ok(CryptoAsset::Sol),
            "eth" => Ok(CryptoAsset::Eth),
            other => Err(format!("unknown crypto asset '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletId {
    MetaMask,
    WalletConnect,
    Phantom,
    Coinbase,
}

impl WalletId {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletId::MetaMask => "metamask",
            WalletId::WalletConnect => "walletconnect",
            WalletId::Phantom => "phantom",
            WalletId::Coinbase => "coinbase",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            WalletId::MetaMask => "MetaMask",
            WalletId::WalletConnect => "WalletConnect",
            WalletId::Phantom => "Phantom",
            WalletId::Coinbase => "Coinbase Wallet",
        }
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WalletId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metamask" => Ok(WalletId::MetaMask),
            "walletconnect" => Ok(WalletId::WalletConnect),
            "phantom" => Ok(WalletId::Phantom),
            "coinbase" => Ok(WalletId::Coinbase),
            other => Err(format!("unknown wallet '{other}'")),
        }
    }
}

/// Card network inferred from the leading digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardBrand {
    Visa,
    Mastercard,
    Amex,
    Discover,
    Unknown,
}

impl CardBrand {
    pub fn detect(digits: &str) -> Self {
        let prefix = |n: usize| digits.get(..n).and_then(|p| p.parse::<u32>().ok());
        if digits.starts_with('4') {
            return CardBrand::Visa;
        }
        if matches!(prefix(2), Some(34 | 37)) {
            return CardBrand::Amex;
        }
        if matches!(prefix(2), Some(51..=55)) || matches!(prefix(4), Some(2221..=2720)) {
            return CardBrand::Mastercard;
        }
        if digits.starts_with("6011")
            || digits.starts_with("65")
            || matches!(prefix(3), Some(644..=649))
        {
            return CardBrand::Discover;
        }
        CardBrand::Unknown
    }
}
