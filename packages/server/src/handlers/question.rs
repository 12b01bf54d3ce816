use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::question::{
    AttemptHistoryResponse, AttemptResponse, PracticeRequest, PracticeResponse, QuestionResponse,
    QuestionsQuery, validate_practice_request,
};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Questions",
    operation_id = "listQuestions",
    summary = "A random selection of questions, answers redacted",
    params(QuestionsQuery),
    responses(
        (status = 200, description = "Questions", body = Vec<QuestionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, query), fields(user_id = auth_user.user_id))]
pub async fn list_questions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<QuestionsQuery>,
) -> Json<Vec<QuestionResponse>> {
    let count = query.count.unwrap_or(5).clamp(1, 20);
    Json(
        state
            .questions
            .sample(count)
            .into_iter()
            .map(QuestionResponse::from)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/random",
    tag = "Questions",
    operation_id = "getRandomQuestion",
    summary = "One random question",
    responses(
        (status = 200, description = "Question", body = QuestionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Empty bank (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn random_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<QuestionResponse>, AppError> {
    let question = state
        .questions
        .random()
        .ok_or_else(|| AppError::NotFound("The question bank is empty".into()))?;
    Ok(Json(question.into()))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Questions",
    operation_id = "getQuestion",
    summary = "One question by ID, answer redacted",
    params(("id" = i64, Path, description = "Question ID")),
    responses(
        (status = 200, description = "Question", body = QuestionResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown question (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, question_id = id))]
pub async fn get_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<QuestionResponse>, AppError> {
    let question = state
        .questions
        .question(id)
        .ok_or_else(|| AppError::NotFound("Question not found".into()))?;
    Ok(Json(question.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/attempts",
    tag = "Questions",
    operation_id = "practiceQuestion",
    summary = "Answer a question in practice mode",
    description = "Grades the answer, records the attempt, and reveals the correct answer.",
    params(("id" = i64, Path, description = "Question ID")),
    request_body = PracticeRequest,
    responses(
        (status = 200, description = "Graded attempt", body = PracticeResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown question (QUESTION_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, payload), fields(user_id = auth_user.user_id, question_id = id))]
pub async fn practice_question(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<PracticeRequest>,
) -> Result<Json<PracticeResponse>, AppError> {
    validate_practice_request(&payload)?;

    let outcome = state.questions.practice(
        auth_user.user_id,
        id,
        &payload.answer,
        payload.duration_ms.unwrap_or(0),
    )?;
    Ok(Json(outcome.into()))
}

#[utoipa::path(
    get,
    path = "/attempts",
    tag = "Questions",
    operation_id = "listAttempts",
    summary = "The caller's practice history, newest first",
    responses(
        (status = 200, description = "Attempts and lifetime score", body = AttemptHistoryResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn list_attempts(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Json<AttemptHistoryResponse> {
    let attempts = state
        .questions
        .attempts_for(auth_user.user_id)
        .into_iter()
        .map(AttemptResponse::from)
        .collect();
    Json(AttemptHistoryResponse {
        attempts,
        total_score: state.questions.total_score(auth_user.user_id),
    })
}
