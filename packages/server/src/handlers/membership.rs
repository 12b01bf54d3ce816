use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use engine::MembershipGate;
use engine::entity::TransactionKind;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::membership::{
    MembershipResponse, MembershipStatusResponse, PlanResponse, PurchaseRequest, PurchaseResponse,
};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/purchase",
    tag = "Membership",
    operation_id = "purchaseMembership",
    summary = "Purchase or renew a membership",
    description = "Renewing while still active extends the term from the current expiry. The level's gift coins are credited to the wallet.",
    request_body = PurchaseRequest,
    responses(
        (status = 201, description = "Membership purchased", body = PurchaseResponse),
        (status = 400, description = "Bad level (INVALID_LEVEL)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, payload), fields(user_id = auth_user.user_id, level = payload.level))]
pub async fn purchase(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<PurchaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let gift_coins = state.memberships.purchase(auth_user.user_id, payload.level)?;

    // The gate stays out of the ledger; crediting the gift is on us.
    if gift_coins > 0 {
        state.ledger.credit(
            auth_user.user_id,
            gift_coins,
            None,
            "membership gift coins",
            TransactionKind::Reward,
        )?;
    }

    let membership = state
        .memberships
        .membership(auth_user.user_id)
        .ok_or_else(|| AppError::Internal("membership missing right after purchase".into()))?;

    Ok((
        StatusCode::CREATED,
        Json(PurchaseResponse {
            membership: membership.into(),
            gift_coins,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Membership",
    operation_id = "getMembership",
    summary = "Current membership record",
    description = "Reading may flip a lapsed record to expired.",
    responses(
        (status = 200, description = "Membership", body = MembershipResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No membership (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn get_membership(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MembershipResponse>, AppError> {
    let membership = state
        .memberships
        .membership(auth_user.user_id)
        .ok_or_else(|| AppError::NotFound("No membership".into()))?;
    Ok(Json(membership.into()))
}

#[utoipa::path(
    get,
    path = "/status",
    tag = "Membership",
    operation_id = "getMembershipStatus",
    summary = "Whether the caller's membership is currently valid",
    description = "Reading may flip a lapsed record to expired.",
    responses(
        (status = 200, description = "Validity", body = MembershipStatusResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn get_status(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Json<MembershipStatusResponse> {
    Json(MembershipStatusResponse {
        valid: state.memberships.is_valid(auth_user.user_id),
    })
}

#[utoipa::path(
    get,
    path = "/plans",
    tag = "Membership",
    operation_id = "listMembershipPlans",
    summary = "The purchasable membership plans",
    responses(
        (status = 200, description = "Plans", body = Vec<PlanResponse>),
    ),
)]
#[instrument]
pub async fn list_plans() -> Json<Vec<PlanResponse>> {
    Json(
        MembershipGate::plans()
            .into_iter()
            .map(PlanResponse::from)
            .collect(),
    )
}
