use axum::{
    Json,
    extract::{Query, State},
};
use engine::entity::TransactionKind;
use tracing::instrument;

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::wallet::{
    AccountResponse, RechargeRequest, TransactionResponse, TransactionsQuery, WithdrawRequest,
    WithdrawResponse, validate_recharge_request,
};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/recharge",
    tag = "Wallet",
    operation_id = "recharge",
    summary = "Add coins to the caller's wallet",
    request_body = RechargeRequest,
    responses(
        (status = 200, description = "Updated account", body = AccountResponse),
        (status = 400, description = "Bad amount (INVALID_AMOUNT, VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, payload), fields(user_id = auth_user.user_id, amount = payload.amount))]
pub async fn recharge(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<RechargeRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    validate_recharge_request(&payload)?;

    let description = payload
        .description
        .unwrap_or_else(|| "wallet recharge".to_string());
    let account = state.ledger.credit(
        auth_user.user_id,
        payload.amount,
        None,
        &description,
        TransactionKind::Recharge,
    )?;
    Ok(Json(account.into()))
}

#[utoipa::path(
    post,
    path = "/withdraw",
    tag = "Wallet",
    operation_id = "withdraw",
    summary = "Exchange coins for external currency",
    description = "The amount must be a positive multiple of 100 coins; 100 coins buy one cash unit.",
    request_body = WithdrawRequest,
    responses(
        (status = 200, description = "Updated account and cash paid out", body = WithdrawResponse),
        (status = 400, description = "Bad amount (INVALID_AMOUNT, INSUFFICIENT_FUNDS)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, payload), fields(user_id = auth_user.user_id, coin_amount = payload.coin_amount))]
pub async fn withdraw(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<WithdrawRequest>,
) -> Result<Json<WithdrawResponse>, AppError> {
    let (account, cash_units) = state.ledger.withdraw(auth_user.user_id, payload.coin_amount)?;
    Ok(Json(WithdrawResponse {
        account: account.into(),
        cash_units,
    }))
}

#[utoipa::path(
    get,
    path = "/account",
    tag = "Wallet",
    operation_id = "getAccount",
    summary = "Current account state",
    description = "A zero-balance account is created on first access.",
    responses(
        (status = 200, description = "Account", body = AccountResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state), fields(user_id = auth_user.user_id))]
pub async fn get_account(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Json<AccountResponse> {
    Json(state.ledger.account(auth_user.user_id).into())
}

#[utoipa::path(
    get,
    path = "/transactions",
    tag = "Wallet",
    operation_id = "listTransactions",
    summary = "Recent transactions, newest first",
    params(TransactionsQuery),
    responses(
        (status = 200, description = "Transactions", body = Vec<TransactionResponse>),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(auth_user, state, query), fields(user_id = auth_user.user_id))]
pub async fn list_transactions(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TransactionsQuery>,
) -> Json<Vec<TransactionResponse>> {
    let limit = query.limit.unwrap_or(10).clamp(1, 100);
    let transactions = state
        .ledger
        .transactions(auth_user.user_id, limit)
        .into_iter()
        .map(TransactionResponse::from)
        .collect();
    Json(transactions)
}
