use chrono::{DateTime, Utc};
use engine::entity::{Account, Transaction};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for a coin recharge.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct RechargeRequest {
    /// Coins to add; must be positive.
    #[schema(example = 500)]
    pub amount: i64,
    /// Free-form note stored on the transaction.
    pub description: Option<String>,
}

pub fn validate_recharge_request(payload: &RechargeRequest) -> Result<(), AppError> {
    if let Some(ref description) = payload.description
        && description.chars().count() > 256
    {
        return Err(AppError::Validation(
            "Description must be at most 256 characters".into(),
        ));
    }
    Ok(())
}

/// Request body for a withdrawal.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct WithdrawRequest {
    /// Coins to exchange; must be a positive multiple of 100.
    #[schema(example = 300)]
    pub coin_amount: i64,
}

/// Query parameters for the transaction listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct TransactionsQuery {
    /// Maximum number of records to return (1-100, default 10).
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct AccountResponse {
    pub user_id: i64,
    pub balance: i64,
    pub total_recharge: i64,
    pub total_spend: i64,
    pub total_reward: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            user_id: account.user_id,
            balance: account.balance,
            total_recharge: account.total_recharge,
            total_spend: account.total_spend,
            total_reward: account.total_reward,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TransactionResponse {
    pub id: i64,
    #[schema(example = "recharge")]
    pub kind: String,
    /// Signed amount: positive for credits, negative for spend/withdraw.
    pub amount: i64,
    pub balance_before: i64,
    pub balance_after: i64,
    pub related_id: Option<i64>,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Transaction> for TransactionResponse {
    fn from(tx: Transaction) -> Self {
        Self {
            id: tx.id,
            kind: tx.kind.as_str().to_string(),
            amount: tx.amount,
            balance_before: tx.balance_before,
            balance_after: tx.balance_after,
            related_id: tx.related_id,
            description: tx.description,
            created_at: tx.created_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct WithdrawResponse {
    pub account: AccountResponse,
    /// External-currency units paid out (100 coins each).
    pub cash_units: i64,
}
