use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Supported payment methods
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    BankTransfer,
    EWallet,
    Cod,
}

impl PaymentMethod {
    /// Parse a method string (case-insensitive). Returns None for
    /// anything outside the supported set.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_uppercase().as_str() {
            "CREDIT_CARD" => Some(Self::CreditCard),
            "BANK_TRANSFER" => Some(Self::BankTransfer),
            "E_WALLET" => Some(Self::EWallet),
            "COD" => Some(Self::Cod),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreditCard => "CREDIT_CARD",
            Self::BankTransfer => "BANK_TRANSFER",
            Self::EWallet => "E_WALLET",
            Self::Cod => "COD",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    Completed,
    Failed,
    Refunded,
}

/// Settlement seam for the external payment gateway.
///
/// The production stand-in simulates gateway behavior; tests inject
/// deterministic outcomes.
pub trait SettlementGateway: Send + Sync {
    /// Attempt settlement. Returns true when the charge clears.
    fn settle(&self, method: PaymentMethod, amount: Decimal) -> bool;
}
