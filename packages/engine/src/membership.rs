use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use serde::Serialize;
use tracing::info;

use crate::entity::{Membership, MembershipLevel, MembershipStatus};
use crate::error::Result;

/// One purchasable plan, for presentation.
#[derive(Debug, Clone, Serialize)]
pub struct MembershipPlan {
    pub level: u8,
    pub name: &'static str,
    pub days: i64,
    pub price: f64,
    pub gift_coins: i64,
}

/// Subsystem tracking paid access-tier validity.
///
/// Owns one membership record per user; per-user serialization comes from
/// the map entry. Expiry is evaluated lazily: `is_valid` and `membership`
/// flip a lapsed record to `Expired` as a side effect of the read. This
/// component never touches the ledger; `purchase` returns the gift-coin
/// amount and leaves crediting to the caller, keeping gating and currency
/// concerns separated.
pub struct MembershipGate {
    members: DashMap<i64, Membership>,
}

impl Default for MembershipGate {
    fn default() -> Self {
        Self::new()
    }
}

impl MembershipGate {
    pub fn new() -> Self {
        Self {
            members: DashMap::new(),
        }
    }

    /// Purchase or renew a membership. Returns the gift-coin amount for the
    /// purchased level.
    ///
    /// A still-active membership is extended: the new term starts at the
    /// current expiry rather than now, and the level is overwritten. An
    /// absent or lapsed membership is replaced by a fresh term starting now.
    pub fn purchase(&self, user_id: i64, level_code: u8) -> Result<i64> {
        let level = MembershipLevel::from_code(level_code)?;
        let now = Utc::now();

        match self.members.entry(user_id) {
            Entry::Occupied(mut occupied) => {
                let membership = occupied.get_mut();
                expire_if_lapsed(membership, now);
                if membership.status == MembershipStatus::Active {
                    let start = membership.expire_time;
                    membership.level = level;
                    membership.start_time = start;
                    membership.expire_time = start + Duration::days(level.duration_days());
                    info!(
                        user_id,
                        level = level.as_str(),
                        expire_time = %membership.expire_time,
                        "membership renewed"
                    );
                } else {
                    *membership = Membership::starting_at(user_id, level, now);
                    info!(
                        user_id,
                        level = level.as_str(),
                        expire_time = %membership.expire_time,
                        "membership repurchased after lapse"
                    );
                }
            }
            Entry::Vacant(vacant) => {
                let membership = vacant.insert(Membership::starting_at(user_id, level, now));
                info!(
                    user_id,
                    level = level.as_str(),
                    expire_time = %membership.expire_time,
                    "membership purchased"
                );
            }
        }

        Ok(level.gift_coins())
    }

    /// Whether the user holds a currently valid membership.
    ///
    /// Reading may mutate: a record whose expiry has passed is flipped to
    /// `Expired` here, even if no purchase happened in between.
    pub fn is_valid(&self, user_id: i64) -> bool {
        let now = Utc::now();
        match self.members.get_mut(&user_id) {
            Some(mut membership) => {
                expire_if_lapsed(&mut membership, now);
                membership.status == MembershipStatus::Active
            }
            None => false,
        }
    }

    /// Current membership record, lazily expired, or `None`.
    pub fn membership(&self, user_id: i64) -> Option<Membership> {
        let now = Utc::now();
        self.members.get_mut(&user_id).map(|mut membership| {
            expire_if_lapsed(&mut membership, now);
            membership.clone()
        })
    }

    /// The fixed three-level catalog.
    pub fn plans() -> Vec<MembershipPlan> {
        vec![
            MembershipPlan {
                level: 1,
                name: "month",
                days: 30,
                price: 30.0,
                gift_coins: 1000,
            },
            MembershipPlan {
                level: 2,
                name: "season",
                days: 90,
                price: 80.0,
                gift_coins: 3500,
            },
            MembershipPlan {
                level: 3,
                name: "year",
                days: 365,
                price: 298.0,
                gift_coins: 15000,
            },
        ]
    }

    /// Test hook: rewrite a stored record's window to simulate the passage
    /// of time.
    #[cfg(test)]
    pub(crate) fn rewind_window(
        &self,
        user_id: i64,
        start_time: DateTime<Utc>,
        expire_time: DateTime<Utc>,
    ) {
        if let Some(mut membership) = self.members.get_mut(&user_id) {
            membership.start_time = start_time;
            membership.expire_time = expire_time;
        }
    }
}

fn expire_if_lapsed(membership: &mut Membership, now: DateTime<Utc>) {
    if membership.status == MembershipStatus::Active && membership.expire_time <= now {
        membership.status = MembershipStatus::Expired;
    }
}
