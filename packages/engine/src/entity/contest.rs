use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contest lifecycle. Transitions are strictly forward; this engine keeps a
/// contest in `Registering` for its whole open window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContestStatus {
    NotStarted,
    Registering,
    InProgress,
    Finished,
}

impl ContestStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ContestStatus::NotStarted => "not_started",
            ContestStatus::Registering => "registering",
            ContestStatus::InProgress => "in_progress",
            ContestStatus::Finished => "finished",
        }
    }
}

/// A timed, multi-question competition with an entry fee and a pooled,
/// ranked payout.
///
/// `prize_pool` only grows while the contest is open; the three prize tiers
/// are recomputed from it on every registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contest {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub entry_fee: i64,
    pub prize_pool: i64,
    pub first_prize: i64,
    pub second_prize: i64,
    pub third_prize: i64,
    /// Fixed ordered question sequence.
    pub question_ids: Vec<i64>,
    pub duration_minutes: i64,
    pub status: ContestStatus,
    pub max_participants: u32,
    pub current_participants: u32,
    pub registration_start_time: DateTime<Utc>,
    pub registration_end_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
