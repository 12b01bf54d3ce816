use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::one::RefMut;
use tracing::info;

use crate::entity::{Account, Transaction, TransactionKind};
use crate::error::{EngineError, Result};

/// Coins per unit of external currency.
pub const COINS_PER_CASH_UNIT: i64 = 100;

/// Per-user account plus its append-only transaction log. The two always
/// mutate together under the same map entry.
struct UserLedger {
    account: Account,
    log: Vec<Transaction>,
}

impl UserLedger {
    fn new(user_id: i64) -> Self {
        Self {
            account: Account::new(user_id),
            log: Vec::new(),
        }
    }
}

/// Subsystem of record for coin balances and transaction history.
///
/// Each mutating operation runs as one indivisible step under the owning
/// user's map entry: balance read, invariant check, balance write, and log
/// append. Operations on different users never block each other; operations
/// on the same user are serialized by the entry lock.
pub struct Ledger {
    accounts: DashMap<i64, UserLedger>,
    transaction_ids: AtomicI64,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

impl Ledger {
    pub fn new() -> Self {
        Self {
            accounts: DashMap::new(),
            transaction_ids: AtomicI64::new(1),
        }
    }

    /// Add coins to a user's balance.
    ///
    /// `kind` must be a credit kind (`Recharge` or `Reward`); it decides
    /// which lifetime total the amount is attributed to.
    pub fn credit(
        &self,
        user_id: i64,
        amount: i64,
        related_id: Option<i64>,
        description: &str,
        kind: TransactionKind,
    ) -> Result<Account> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "credit amount must be positive".into(),
            ));
        }
        if !kind.is_credit() {
            return Err(EngineError::InvalidAmount(format!(
                "{} is not a credit kind",
                kind.as_str()
            )));
        }

        let mut entry = self.entry(user_id);
        let before = entry.account.balance;
        let after = before + amount;
        entry.account.balance = after;
        match kind {
            TransactionKind::Recharge => entry.account.total_recharge += amount,
            TransactionKind::Reward => entry.account.total_reward += amount,
            _ => unreachable!("checked above"),
        }
        entry.account.updated_at = Utc::now();
        self.append(&mut entry, kind, amount, before, after, related_id, description);

        info!(user_id, amount, kind = kind.as_str(), balance = after, "credited coins");
        Ok(entry.account.clone())
    }

    /// Remove coins from a user's balance, recorded as a Spend.
    ///
    /// Fails with [`EngineError::InsufficientFunds`] rather than ever
    /// letting the balance go negative.
    pub fn debit(
        &self,
        user_id: i64,
        amount: i64,
        related_id: Option<i64>,
        description: &str,
    ) -> Result<Account> {
        if amount <= 0 {
            return Err(EngineError::InvalidAmount(
                "debit amount must be positive".into(),
            ));
        }

        let mut entry = self.entry(user_id);
        if entry.account.balance < amount {
            return Err(EngineError::InsufficientFunds {
                balance: entry.account.balance,
                required: amount,
            });
        }

        let before = entry.account.balance;
        let after = before - amount;
        entry.account.balance = after;
        entry.account.total_spend += amount;
        entry.account.updated_at = Utc::now();
        self.append(
            &mut entry,
            TransactionKind::Spend,
            -amount,
            before,
            after,
            related_id,
            description,
        );

        info!(user_id, amount, balance = after, "debited coins");
        Ok(entry.account.clone())
    }

    /// Exchange coins for external currency.
    ///
    /// The amount must be a positive multiple of [`COINS_PER_CASH_UNIT`].
    /// Returns the updated account and the number of cash units paid out.
    pub fn withdraw(&self, user_id: i64, coin_amount: i64) -> Result<(Account, i64)> {
        if coin_amount <= 0 || coin_amount % COINS_PER_CASH_UNIT != 0 {
            return Err(EngineError::InvalidAmount(format!(
                "withdrawal must be a positive multiple of {COINS_PER_CASH_UNIT} coins"
            )));
        }

        let mut entry = self.entry(user_id);
        if entry.account.balance < coin_amount {
            return Err(EngineError::InsufficientFunds {
                balance: entry.account.balance,
                required: coin_amount,
            });
        }

        let cash_units = coin_amount / COINS_PER_CASH_UNIT;
        let before = entry.account.balance;
        let after = before - coin_amount;
        entry.account.balance = after;
        entry.account.total_spend += coin_amount;
        entry.account.updated_at = Utc::now();
        let description = format!("withdraw {coin_amount} coins ({cash_units} cash units)");
        self.append(
            &mut entry,
            TransactionKind::Withdraw,
            -coin_amount,
            before,
            after,
            None,
            &description,
        );

        info!(user_id, coin_amount, cash_units, balance = after, "withdrew coins");
        Ok((entry.account.clone(), cash_units))
    }

    /// Current account state, lazily materializing a zero-balance account on
    /// first access. Idempotent.
    pub fn account(&self, user_id: i64) -> Account {
        self.entry(user_id).account.clone()
    }

    /// Current balance; 0 for users without an account, without creating one.
    pub fn balance(&self, user_id: i64) -> i64 {
        self.accounts
            .get(&user_id)
            .map(|e| e.account.balance)
            .unwrap_or(0)
    }

    /// Most-recent-first transaction history, truncated to `limit`.
    pub fn transactions(&self, user_id: i64, limit: usize) -> Vec<Transaction> {
        self.accounts
            .get(&user_id)
            .map(|e| e.log.iter().rev().take(limit).cloned().collect())
            .unwrap_or_default()
    }

    fn entry(&self, user_id: i64) -> RefMut<'_, i64, UserLedger> {
        self.accounts
            .entry(user_id)
            .or_insert_with(|| UserLedger::new(user_id))
    }

    #[allow(clippy::too_many_arguments)]
    fn append(
        &self,
        entry: &mut UserLedger,
        kind: TransactionKind,
        amount: i64,
        balance_before: i64,
        balance_after: i64,
        related_id: Option<i64>,
        description: &str,
    ) {
        let id = self.transaction_ids.fetch_add(1, Ordering::Relaxed);
        entry.log.push(Transaction {
            id,
            user_id: entry.account.user_id,
            kind,
            amount,
            balance_before,
            balance_after,
            related_id,
            description: description.to_string(),
            created_at: Utc::now(),
        });
    }
}
