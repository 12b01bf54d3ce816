use chrono::{DateTime, Utc};
use engine::entity::{Contest, Participation};
use serde::{Deserialize, Serialize};

use super::question::QuestionResponse;
use crate::error::AppError;

/// Request body for submitting one contest answer.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitAnswerRequest {
    pub question_id: i64,
    #[schema(example = "C")]
    pub answer: String,
    /// Time spent on this question, in milliseconds.
    pub duration_ms: Option<i64>,
}

pub fn validate_submit_answer(payload: &SubmitAnswerRequest) -> Result<(), AppError> {
    if payload.answer.trim().is_empty() {
        return Err(AppError::Validation("Answer must not be empty".into()));
    }
    if payload.answer.chars().count() > 256 {
        return Err(AppError::Validation(
            "Answer must be at most 256 characters".into(),
        ));
    }
    if payload.duration_ms.is_some_and(|d| d < 0) {
        return Err(AppError::Validation(
            "duration_ms must not be negative".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize, utoipa::ToSchema)]
pub struct ContestResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub entry_fee: i64,
    pub prize_pool: i64,
    pub first_prize: i64,
    pub second_prize: i64,
    pub third_prize: i64,
    pub question_ids: Vec<i64>,
    pub duration_minutes: i64,
    #[schema(example = "registering")]
    pub status: String,
    pub max_participants: u32,
    pub current_participants: u32,
    pub registration_start_time: DateTime<Utc>,
    pub registration_end_time: DateTime<Utc>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Contest> for ContestResponse {
    fn from(contest: Contest) -> Self {
        Self {
            id: contest.id,
            name: contest.name,
            description: contest.description,
            entry_fee: contest.entry_fee,
            prize_pool: contest.prize_pool,
            first_prize: contest.first_prize,
            second_prize: contest.second_prize,
            third_prize: contest.third_prize,
            question_ids: contest.question_ids,
            duration_minutes: contest.duration_minutes,
            status: contest.status.as_str().to_string(),
            max_participants: contest.max_participants,
            current_participants: contest.current_participants,
            registration_start_time: contest.registration_start_time,
            registration_end_time: contest.registration_end_time,
            start_time: contest.start_time,
            end_time: contest.end_time,
            created_at: contest.created_at,
            updated_at: contest.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ParticipationResponse {
    pub id: i64,
    pub contest_id: i64,
    pub user_id: i64,
    pub username: String,
    pub total_score: i64,
    pub correct_count: u32,
    pub total_questions: u32,
    pub total_duration: i64,
    /// 0 until the ranking step assigns a place.
    pub rank: u32,
    pub reward_coins: i64,
    #[schema(example = "registered")]
    pub status: String,
    pub registered_at: DateTime<Utc>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl From<Participation> for ParticipationResponse {
    fn from(p: Participation) -> Self {
        Self {
            id: p.id,
            contest_id: p.contest_id,
            user_id: p.user_id,
            username: p.username,
            total_score: p.total_score,
            correct_count: p.correct_count,
            total_questions: p.total_questions,
            total_duration: p.total_duration,
            rank: p.rank,
            reward_coins: p.reward_coins,
            status: p.status.as_str().to_string(),
            registered_at: p.registered_at,
            started_at: p.started_at,
            finished_at: p.finished_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct SubmitAnswerResponse {
    pub correct: bool,
}

/// Returned when a participant starts a contest.
#[derive(Serialize, utoipa::ToSchema)]
pub struct StartContestResponse {
    pub participation: ParticipationResponse,
    /// The contest's questions in their fixed order, answers redacted.
    pub questions: Vec<QuestionResponse>,
}
