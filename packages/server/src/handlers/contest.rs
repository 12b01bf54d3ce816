use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::contest::{
    ContestResponse, ParticipationResponse, StartContestResponse, SubmitAnswerRequest,
    SubmitAnswerResponse, validate_submit_answer,
};
use crate::models::question::QuestionResponse;
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/",
    tag = "Contests",
    operation_id = "listContests",
    summary = "All contests",
    responses(
        (status = 200, description = "Contests", body = Vec<ContestResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn list_contests(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<ContestResponse>> {
    Json(
        state
            .contests
            .list_contests()
            .into_iter()
            .map(ContestResponse::from)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Contests",
    operation_id = "getContest",
    summary = "One contest by ID",
    params(("id" = i64, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Contest", body = ContestResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown contest (CONTEST_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn get_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ContestResponse>, AppError> {
    Ok(Json(state.contests.contest(id)?.into()))
}

#[utoipa::path(
    post,
    path = "/{id}/register",
    tag = "Contests",
    operation_id = "registerForContest",
    summary = "Register for a contest",
    description = "Requires a valid membership and enough coins for the entry fee. The fee feeds the prize pool net of the platform commission.",
    params(("id" = i64, Path, description = "Contest ID")),
    responses(
        (status = 201, description = "Registered", body = ParticipationResponse),
        (status = 400, description = "Cannot pay the fee (INSUFFICIENT_FUNDS)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Membership gate (MEMBERSHIP_REQUIRED, MEMBERSHIP_EXPIRED)", body = ErrorBody),
        (status = 404, description = "Unknown contest (CONTEST_NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Lifecycle conflict (CONTEST_NOT_OPEN, CONTEST_FULL, ALREADY_REGISTERED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn register_for_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, AppError> {
    let participation = state.contests.register(id, auth_user.user_id)?;
    Ok((
        StatusCode::CREATED,
        Json(ParticipationResponse::from(participation)),
    ))
}

#[utoipa::path(
    post,
    path = "/{id}/start",
    tag = "Contests",
    operation_id = "startContest",
    summary = "Start answering and fetch the contest's questions",
    params(("id" = i64, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Participation and questions", body = StartContestResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown contest or not registered (CONTEST_NOT_FOUND, NOT_REGISTERED)", body = ErrorBody),
        (status = 409, description = "Already finished (ALREADY_FINISHED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn start_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<StartContestResponse>, AppError> {
    let participation = state.contests.start(id, auth_user.user_id)?;

    let questions = state
        .contests
        .contest_question_ids(id)?
        .into_iter()
        .filter_map(|question_id| state.questions.question(question_id))
        .map(QuestionResponse::from)
        .collect();

    Ok(Json(StartContestResponse {
        participation: participation.into(),
        questions,
    }))
}

#[utoipa::path(
    post,
    path = "/{id}/answers",
    tag = "Contests",
    operation_id = "submitAnswer",
    summary = "Submit one answer",
    description = "Grading is whitespace-trimmed and case-insensitive. The first answer marks the participation in progress.",
    params(("id" = i64, Path, description = "Contest ID")),
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Graded", body = SubmitAnswerResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown contest, question, or registration (CONTEST_NOT_FOUND, QUESTION_NOT_FOUND, NOT_REGISTERED)", body = ErrorBody),
        (status = 409, description = "Already finished (ALREADY_FINISHED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, payload), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn submit_answer(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    AppJson(payload): AppJson<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, AppError> {
    validate_submit_answer(&payload)?;

    let correct = state.contests.submit_answer(
        id,
        auth_user.user_id,
        payload.question_id,
        &payload.answer,
        payload.duration_ms.unwrap_or(0),
    )?;
    Ok(Json(SubmitAnswerResponse { correct }))
}

#[utoipa::path(
    post,
    path = "/{id}/finish",
    tag = "Contests",
    operation_id = "finishContest",
    summary = "Finish the contest and trigger ranking",
    description = "Marks the participation finished, re-ranks every finished participant, and pays prize tiers that have not been paid yet.",
    params(("id" = i64, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Final participation", body = ParticipationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown contest or not registered (CONTEST_NOT_FOUND, NOT_REGISTERED)", body = ErrorBody),
        (status = 409, description = "Already finished (ALREADY_FINISHED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn finish_contest(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ParticipationResponse>, AppError> {
    let participation = state.contests.finish(id, auth_user.user_id)?;
    Ok(Json(participation.into()))
}

#[utoipa::path(
    get,
    path = "/{id}/ranking",
    tag = "Contests",
    operation_id = "getRanking",
    summary = "Finished participants in rank order",
    params(("id" = i64, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Ranking", body = Vec<ParticipationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown contest (CONTEST_NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn get_ranking(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ParticipationResponse>>, AppError> {
    let ranking = state
        .contests
        .ranking(id)?
        .into_iter()
        .map(ParticipationResponse::from)
        .collect();
    Ok(Json(ranking))
}

#[utoipa::path(
    get,
    path = "/{id}/participation",
    tag = "Contests",
    operation_id = "getMyParticipation",
    summary = "The caller's record in one contest",
    params(("id" = i64, Path, description = "Contest ID")),
    responses(
        (status = 200, description = "Participation", body = ParticipationResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Unknown contest or not registered (CONTEST_NOT_FOUND, NOT_REGISTERED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id, contest_id = id))]
pub async fn get_my_participation(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ParticipationResponse>, AppError> {
    let participation = state.contests.participation(id, auth_user.user_id)?;
    Ok(Json(participation.into()))
}

#[utoipa::path(
    get,
    path = "/participations",
    tag = "Contests",
    operation_id = "listMyParticipations",
    summary = "All of the caller's participations, most recent first",
    responses(
        (status = 200, description = "Participations", body = Vec<ParticipationResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn list_my_participations(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Json<Vec<ParticipationResponse>> {
    Json(
        state
            .contests
            .participations_for(auth_user.user_id)
            .into_iter()
            .map(ParticipationResponse::from)
            .collect(),
    )
}
