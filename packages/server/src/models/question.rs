use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::questions::{AttemptRecord, PracticeOutcome, Question};

/// Query parameters for the question listing.
#[derive(Deserialize, utoipa::IntoParams)]
pub struct QuestionsQuery {
    /// Number of random questions to return (1-20, default 5).
    pub count: Option<usize>,
}

/// Request body for a practice answer.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PracticeRequest {
    #[schema(example = "B")]
    pub answer: String,
    /// Time spent answering, in milliseconds.
    pub duration_ms: Option<i64>,
}

pub fn validate_practice_request(payload: &PracticeRequest) -> Result<(), AppError> {
    if payload.answer.trim().is_empty() {
        return Err(AppError::Validation("Answer must not be empty".into()));
    }
    if payload.answer.chars().count() > 256 {
        return Err(AppError::Validation(
            "Answer must be at most 256 characters".into(),
        ));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Response DTOs
// ---------------------------------------------------------------------------

/// A question as served to clients: the answer never appears here.
#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestionResponse {
    pub id: i64,
    pub content: String,
    #[schema(example = "choice")]
    pub kind: String,
    pub options: Vec<String>,
    /// 1 (easiest) to 5 (hardest).
    pub difficulty: u8,
    pub points: i64,
}

impl From<Question> for QuestionResponse {
    fn from(question: Question) -> Self {
        Self {
            id: question.id,
            content: question.content,
            kind: question.kind,
            options: question.options,
            difficulty: question.difficulty,
            points: question.points,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct PracticeResponse {
    pub correct: bool,
    pub score: i64,
    /// Revealed after answering, unlike in contests.
    pub correct_answer: String,
}

impl From<PracticeOutcome> for PracticeResponse {
    fn from(outcome: PracticeOutcome) -> Self {
        Self {
            correct: outcome.correct,
            score: outcome.score,
            correct_answer: outcome.correct_answer,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttemptResponse {
    pub id: i64,
    pub question_id: i64,
    pub answer: String,
    pub correct: bool,
    pub score: i64,
    pub duration_ms: i64,
    pub submitted_at: DateTime<Utc>,
}

impl From<AttemptRecord> for AttemptResponse {
    fn from(attempt: AttemptRecord) -> Self {
        Self {
            id: attempt.id,
            question_id: attempt.question_id,
            answer: attempt.answer,
            correct: attempt.correct,
            score: attempt.score,
            duration_ms: attempt.duration_ms,
            submitted_at: attempt.submitted_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct AttemptHistoryResponse {
    pub attempts: Vec<AttemptResponse>,
    /// Lifetime practice score.
    pub total_score: i64,
}
