use chrono::{DateTime, Utc};
use engine::entity::Membership;
use engine::membership::MembershipPlan;
use serde::{Deserialize, Serialize};

/// Request body for a membership purchase or renewal.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PurchaseRequest {
    /// Membership level: 1 = month, 2 = season, 3 = year.
    #[schema(example = 1)]
    pub level: u8,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MembershipResponse {
    #[schema(example = "month")]
    pub level: String,
    #[schema(example = "active")]
    pub status: String,
    pub start_time: DateTime<Utc>,
    pub expire_time: DateTime<Utc>,
}

impl From<Membership> for MembershipResponse {
    fn from(membership: Membership) -> Self {
        Self {
            level: membership.level.as_str().to_string(),
            status: membership.status.as_str().to_string(),
            start_time: membership.start_time,
            expire_time: membership.expire_time,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PurchaseResponse {
    pub membership: MembershipResponse,
    /// Coins gifted for this purchase, already credited to the wallet.
    pub gift_coins: i64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MembershipStatusResponse {
    pub valid: bool,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PlanResponse {
    pub level: u8,
    #[schema(example = "month")]
    pub name: String,
    pub days: i64,
    /// Price in external currency units.
    pub price: f64,
    pub gift_coins: i64,
}

impl From<MembershipPlan> for PlanResponse {
    fn from(plan: MembershipPlan) -> Self {
        Self {
            level: plan.level,
            name: plan.name.to_string(),
            days: plan.days,
            price: plan.price,
            gift_coins: plan.gift_coins,
        }
    }
}
