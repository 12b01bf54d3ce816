use chrono::Utc;
use engine::QuestionSource;
use tracing::info;

use crate::questions::{Question, QuestionBank};
use crate::state::AppState;

/// Seed the question bank and the default contest. Both steps are
/// idempotent, so calling this on every startup is fine.
pub fn seed(state: &AppState) {
    seed_question_bank(&state.questions);
    seed_default_contest(state);
}

/// The built-in question set. Answers are exposed here for seeding and for
/// tests; the API never serves them.
pub fn default_questions() -> Vec<Question> {
    let now = Utc::now();
    let question = |id: i64, content: &str, options: &[&str], answer: &str, difficulty: u8, points: i64| {
        Question {
            id,
            content: content.to_string(),
            kind: "choice".into(),
            options: options.iter().map(|o| o.to_string()).collect(),
            answer: answer.to_string(),
            difficulty,
            points,
            created_at: now,
        }
    };

    vec![
        question(
            1,
            "Which planet in the solar system has the shortest day?",
            &["A. Mercury", "B. Jupiter", "C. Earth", "D. Mars"],
            "B",
            2,
            10,
        ),
        question(
            2,
            "Two runners start together on a 400 m circular track, moving the same way at 6 m/s and 4 m/s. After how many seconds does the faster runner first lap the slower one?",
            &["A. 100", "B. 150", "C. 200", "D. 250"],
            "C",
            3,
            15,
        ),
        question(
            3,
            "Which of these sorting algorithms has O(n log n) worst-case time complexity?",
            &["A. Quicksort", "B. Mergesort", "C. Bubble sort", "D. Insertion sort"],
            "B",
            4,
            20,
        ),
        question(
            4,
            "Workshop A has 2/3 as many workers as workshop B, and workshop B has 3/4 as many as workshop C. If workshop C has 80 workers, how many does workshop A have?",
            &["A. 40", "B. 50", "C. 60", "D. 70"],
            "A",
            3,
            15,
        ),
        question(
            5,
            "\"All ravens are black; this bird on the tree is black; therefore it is a raven.\" Which option shares the same logical flaw?",
            &[
                "A. All squares are rectangles; this shape is a square; therefore it is a rectangle",
                "B. All fish swim; this animal does not swim; therefore it is not a fish",
                "C. Happy people smile a lot; he smiles a lot; therefore he must be happy",
                "D. All planets orbit a star; Mars is a planet; therefore Mars orbits a star",
            ],
            "C",
            5,
            25,
        ),
    ]
}

pub fn seed_question_bank(bank: &QuestionBank) {
    if !bank.is_empty() {
        return;
    }
    for question in default_questions() {
        bank.insert(question);
    }
    info!(count = bank.len(), "question bank seeded");
}

pub fn seed_default_contest(state: &AppState) {
    if !state.contests.list_contests().is_empty() {
        return;
    }
    let question_ids = state.questions.question_ids(5);
    let contest = state.contests.create_contest(
        "General Knowledge Sprint",
        "Five quick questions to test your all-round knowledge.",
        question_ids,
        30,
    );
    info!(contest_id = contest.id, "default contest seeded");
}
