use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of ledger mutation recorded by a [`Transaction`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Recharge,
    Spend,
    Reward,
    Withdraw,
}

impl TransactionKind {
    /// Credit kinds increase the balance; Spend and Withdraw decrease it.
    pub fn is_credit(self) -> bool {
        matches!(self, TransactionKind::Recharge | TransactionKind::Reward)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Recharge => "recharge",
            TransactionKind::Spend => "spend",
            TransactionKind::Reward => "reward",
            TransactionKind::Withdraw => "withdraw",
        }
    }
}

/// Per-user coin account.
///
/// Invariant: `balance == total_recharge + total_reward - total_spend`,
/// and `balance` never goes negative.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub user_id: i64,
    pub balance: i64,
    pub total_recharge: i64,
    pub total_spend: i64,
    pub total_reward: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    pub fn new(user_id: i64) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            balance: 0,
            total_recharge: 0,
            total_spend: 0,
            total_reward: 0,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Immutable record of a single ledger mutation.
///
/// `amount` is signed: positive for credit kinds, negative for Spend and
/// Withdraw. `balance_after == balance_before + amount` always holds, so a
/// user's transaction log replayed in creation order reconstructs the
/// balance from zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub kind: TransactionKind,
    pub amount: i64,
    pub balance_before: i64,
    pub balance_after: i64,
    /// Contest or other entity that caused this mutation, if any.
    pub related_id: Option<i64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
