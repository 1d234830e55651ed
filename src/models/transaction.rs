use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Id;

/// Canonical transaction kind.
///
/// The two backing collections use overlapping but inconsistent
/// vocabularies ("withdraw" vs "withdrawal"); every stored type string maps
/// onto this closed set, with unrecognized strings falling back to
/// `Transfer` so schema drift never breaks the read path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    Send,
    Receive,
    Transfer,
}

impl TransactionKind {
    /// Map a stored type string onto the canonical set. Total: anything
    /// unrecognized becomes `Transfer`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "deposit" => Self::Deposit,
            "withdraw" | "withdrawal" => Self::Withdrawal,
            "send" => Self::Send,
            "receive" => Self::Receive,
            _ => Self::Transfer,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Send => "send",
            Self::Receive => "receive",
            Self::Transfer => "transfer",
        }
    }

    /// The vocabulary the backing collections store. Legacy records spell
    /// withdrawal as "withdraw", and the dual-writer keeps doing so.
    pub fn wire_str(&self) -> &'static str {
        match self {
            Self::Withdrawal => "withdraw",
            other => other.as_str(),
        }
    }

    /// Derived category: fiat rails for deposits/withdrawals, crypto for
    /// the on-chain kinds.
    pub fn category(&self) -> Category {
        match self {
            Self::Deposit | Self::Withdrawal => Category::Fiat,
            Self::Send | Self::Receive | Self::Transfer => Category::Crypto,
        }
    }

    pub fn sub_type(&self) -> SubType {
        match self {
            Self::Deposit => SubType::Deposit,
            Self::Withdrawal => SubType::Withdraw,
            Self::Send => SubType::Send,
            Self::Receive => SubType::Receive,
            Self::Transfer => SubType::Send,
        }
    }

    /// True for the transfer-like kinds counted together in stats.
    pub fn is_transfer_like(&self) -> bool {
        matches!(self, Self::Send | Self::Receive | Self::Transfer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Processing,
}

impl TransactionStatus {
    /// Map a stored status string. Total: unknown strings default to
    /// `Completed`, mirroring the type mapping's defaulting design.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => Self::Pending,
            "failed" => Self::Failed,
            "processing" => Self::Processing,
            _ => Self::Completed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Processing => "processing",
        }
    }
}

/// Derived grouping of a transaction by the rail it moved on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Crypto,
    Fiat,
    Internal,
}

/// Finer-grained derived label used by the app's activity views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubType {
    Buy,
    Sell,
    Swap,
    Withdraw,
    Deposit,
    Send,
    Receive,
}

/// A normalized transaction: the unit the history layer operates on.
///
/// Reconstructed from either backing collection on the read path, or built
/// from a [`TransactionDraft`] on the write path. Records are never mutated
/// in place; corrections are modeled as new records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Assigned by whichever collection persisted the record; absent for
    /// not-yet-persisted records.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Id>,
    pub user_id: String,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    /// Signed amount; the sign convention is the caller's.
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub status: TransactionStatus,
    pub timestamp: DateTime<Utc>,
    /// On-chain transaction hash, when one exists. Doubles as the dedup
    /// identity key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_hash: Option<String>,
    /// Payment-order correlation id from the payment gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// Payment-charge correlation id from the payment gateway.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_id: Option<String>,
    pub category: Category,
    pub sub_type: SubType,
}

/// A logical transaction before it is persisted: no id, no timestamp.
///
/// The dual-write logger normalizes the draft, stamps one timestamp, and
/// writes the result to both collections.
#[derive(Debug, Clone)]
pub struct TransactionDraft {
    pub user_id: String,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub currency: String,
    pub description: String,
    pub status: Option<TransactionStatus>,
    pub tx_hash: Option<String>,
    pub order_id: Option<String>,
    pub payment_id: Option<String>,
    pub category: Option<Category>,
    pub sub_type: Option<SubType>,
}

impl TransactionDraft {
    pub fn new(
        user_id: impl Into<String>,
        kind: TransactionKind,
        amount: Decimal,
        currency: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            kind,
            amount,
            currency: currency.into(),
            description: description.into(),
            status: None,
            tx_hash: None,
            order_id: None,
            payment_id: None,
            category: None,
            sub_type: None,
        }
    }

    pub fn with_status(mut self, status: TransactionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_tx_hash(mut self, tx_hash: impl Into<String>) -> Self {
        self.tx_hash = Some(tx_hash.into());
        self
    }

    pub fn with_order_id(mut self, order_id: impl Into<String>) -> Self {
        self.order_id = Some(order_id.into());
        self
    }

    pub fn with_payment_id(mut self, payment_id: impl Into<String>) -> Self {
        self.payment_id = Some(payment_id.into());
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_sub_type(mut self, sub_type: SubType) -> Self {
        self.sub_type = Some(sub_type);
        self
    }
}
