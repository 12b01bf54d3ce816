use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use engine::{AnswerKey, EngineError, QuestionSource};
use rand::seq::SliceRandom;
use tracing::info;

/// A bank question. The `answer` field never leaves this module unredacted;
/// handlers serve questions through answer-free DTOs.
#[derive(Debug, Clone)]
pub struct Question {
    pub id: i64,
    pub content: String,
    pub kind: String,
    pub options: Vec<String>,
    pub answer: String,
    pub difficulty: u8,
    pub points: i64,
    pub created_at: DateTime<Utc>,
}

/// One practice answer.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    pub id: i64,
    pub user_id: i64,
    pub question_id: i64,
    pub answer: String,
    pub correct: bool,
    pub score: i64,
    pub duration_ms: i64,
    pub submitted_at: DateTime<Utc>,
}

/// Outcome of a practice answer, answer key included.
#[derive(Debug, Clone)]
pub struct PracticeOutcome {
    pub correct: bool,
    pub score: i64,
    pub correct_answer: String,
}

/// In-memory question bank with practice-attempt history.
///
/// Implements the engine's question contract; everything else here is
/// presentation-side convenience.
pub struct QuestionBank {
    bank: DashMap<i64, Question>,
    attempts: DashMap<i64, AttemptRecord>,
    attempt_ids: AtomicI64,
}

impl Default for QuestionBank {
    fn default() -> Self {
        Self::new()
    }
}

impl QuestionBank {
    pub fn new() -> Self {
        Self {
            bank: DashMap::new(),
            attempts: DashMap::new(),
            attempt_ids: AtomicI64::new(1),
        }
    }

    pub fn insert(&self, question: Question) {
        self.bank.insert(question.id, question);
    }

    pub fn is_empty(&self) -> bool {
        self.bank.is_empty()
    }

    pub fn len(&self) -> usize {
        self.bank.len()
    }

    pub fn question(&self, question_id: i64) -> Option<Question> {
        self.bank.get(&question_id).map(|q| q.clone())
    }

    /// Up to `count` random questions.
    pub fn sample(&self, count: usize) -> Vec<Question> {
        self.question_ids(count)
            .into_iter()
            .filter_map(|id| self.question(id))
            .collect()
    }

    pub fn random(&self) -> Option<Question> {
        self.sample(1).pop()
    }

    /// Grade a practice answer and record the attempt.
    ///
    /// Unlike contest grading, the correct answer is revealed in the
    /// outcome.
    pub fn practice(
        &self,
        user_id: i64,
        question_id: i64,
        answer: &str,
        duration_ms: i64,
    ) -> Result<PracticeOutcome, EngineError> {
        let question = self
            .question(question_id)
            .ok_or(EngineError::QuestionNotFound(question_id))?;

        let normalized = answer.trim().to_uppercase();
        let correct = normalized == question.answer.trim().to_uppercase();
        let score = if correct { question.points } else { 0 };

        let id = self.attempt_ids.fetch_add(1, Ordering::Relaxed);
        self.attempts.insert(
            id,
            AttemptRecord {
                id,
                user_id,
                question_id,
                answer: normalized,
                correct,
                score,
                duration_ms,
                submitted_at: Utc::now(),
            },
        );

        info!(user_id, question_id, correct, score, "practice answer graded");
        Ok(PracticeOutcome {
            correct,
            score,
            correct_answer: question.answer,
        })
    }

    /// A user's practice history, most recent first.
    pub fn attempts_for(&self, user_id: i64) -> Vec<AttemptRecord> {
        let mut attempts: Vec<AttemptRecord> = self
            .attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.clone())
            .collect();
        attempts.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at).then(b.id.cmp(&a.id)));
        attempts
    }

    /// Lifetime practice score across all attempts.
    pub fn total_score(&self, user_id: i64) -> i64 {
        self.attempts
            .iter()
            .filter(|a| a.user_id == user_id)
            .map(|a| a.score)
            .sum()
    }
}

impl QuestionSource for QuestionBank {
    fn answer_key(&self, question_id: i64) -> engine::Result<AnswerKey> {
        self.bank
            .get(&question_id)
            .map(|q| AnswerKey {
                answer: q.answer.clone(),
                points: q.points,
            })
            .ok_or(EngineError::QuestionNotFound(question_id))
    }

    fn question_ids(&self, count: usize) -> Vec<i64> {
        let mut ids: Vec<i64> = self.bank.iter().map(|q| q.id).collect();
        ids.shuffle(&mut rand::rng());
        ids.truncate(count);
        ids
    }
}
