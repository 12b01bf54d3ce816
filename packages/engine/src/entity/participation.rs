use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Participation lifecycle: Registered, then InProgress on the first answer
/// (or an explicit start), then Finished exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipationStatus {
    Registered,
    InProgress,
    Finished,
}

impl ParticipationStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            ParticipationStatus::Registered => "registered",
            ParticipationStatus::InProgress => "in_progress",
            ParticipationStatus::Finished => "finished",
        }
    }
}

/// One user's registration and progress record within one contest.
///
/// At most one participation exists per `(contest, user)` pair. `rank` and
/// `reward_coins` stay 0 until the ranking step writes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participation {
    pub id: i64,
    pub contest_id: i64,
    pub user_id: i64,
    pub username: String,
    pub total_score: i64,
    pub correct_count: u32,
    pub total_questions: u32,
    /// Accumulated answering time in milliseconds.
    pub total_duration: i64,
    pub rank: u32,
    pub reward_coins: i64,
    pub status: ParticipationStatus,
    pub registered_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl Participation {
    pub fn new(id: i64, contest_id: i64, user_id: i64, username: String, total_questions: u32) -> Self {
        Self {
            id,
            contest_id,
            user_id,
            username,
            total_score: 0,
            correct_count: 0,
            total_questions,
            total_duration: 0,
            rank: 0,
            reward_coins: 0,
            status: ParticipationStatus::Registered,
            registered_at: Utc::now(),
            started_at: None,
            finished_at: None,
        }
    }
}
