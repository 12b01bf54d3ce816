use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Paid membership tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipLevel {
    Month,
    Season,
    Year,
}

impl MembershipLevel {
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            1 => Ok(MembershipLevel::Month),
            2 => Ok(MembershipLevel::Season),
            3 => Ok(MembershipLevel::Year),
            other => Err(EngineError::InvalidLevel(other)),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            MembershipLevel::Month => 1,
            MembershipLevel::Season => 2,
            MembershipLevel::Year => 3,
        }
    }

    pub fn duration_days(self) -> i64 {
        match self {
            MembershipLevel::Month => 30,
            MembershipLevel::Season => 90,
            MembershipLevel::Year => 365,
        }
    }

    /// Coins gifted to the buyer on purchase.
    pub fn gift_coins(self) -> i64 {
        match self {
            MembershipLevel::Month => 1000,
            MembershipLevel::Season => 3500,
            MembershipLevel::Year => 15000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MembershipLevel::Month => "month",
            MembershipLevel::Season => "season",
            MembershipLevel::Year => "year",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MembershipStatus {
    Active,
    Expired,
}

impl MembershipStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MembershipStatus::Active => "active",
            MembershipStatus::Expired => "expired",
        }
    }
}

/// One membership record per user.
///
/// `Active` implies `now < expire_time`. The flip to `Expired` happens
/// lazily on the next read after the expiry passes; there is no background
/// sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: i64,
    pub level: MembershipLevel,
    pub status: MembershipStatus,
    pub start_time: DateTime<Utc>,
    pub expire_time: DateTime<Utc>,
}

impl Membership {
    pub fn starting_at(user_id: i64, level: MembershipLevel, start: DateTime<Utc>) -> Self {
        Self {
            user_id,
            level,
            status: MembershipStatus::Active,
            start_time: start,
            expire_time: start + Duration::days(level.duration_days()),
        }
    }
}
