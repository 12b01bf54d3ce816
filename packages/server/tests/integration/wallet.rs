use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn recharge_updates_the_account() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app.recharge(&token, 500).await;
    assert_eq!(res.body["balance"], 500);
    assert_eq!(res.body["total_recharge"], 500);

    let account = app.get_with_token(routes::ACCOUNT, &token).await;
    assert_eq!(account.status, 200);
    assert_eq!(account.body["balance"], 500);
}

#[tokio::test]
async fn the_account_materializes_lazily() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let account = app.get_with_token(routes::ACCOUNT, &token).await;
    assert_eq!(account.status, 200);
    assert_eq!(account.body["balance"], 0);
}

#[tokio::test]
async fn non_positive_recharges_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_with_token(routes::RECHARGE, &json!({ "amount": 0 }), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_AMOUNT");
}

#[tokio::test]
async fn withdrawals_must_be_whole_cash_units() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    app.recharge(&token, 500).await;

    let res = app
        .post_with_token(routes::WITHDRAW, &json!({ "coin_amount": 150 }), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_AMOUNT");

    // The failed withdrawal left the balance untouched.
    let account = app.get_with_token(routes::ACCOUNT, &token).await;
    assert_eq!(account.body["balance"], 500);

    let res = app
        .post_with_token(routes::WITHDRAW, &json!({ "coin_amount": 300 }), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["cash_units"], 3);
    assert_eq!(res.body["account"]["balance"], 200);
}

#[tokio::test]
async fn overdrawing_withdrawals_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    app.recharge(&token, 200).await;

    let res = app
        .post_with_token(routes::WITHDRAW, &json!({ "coin_amount": 300 }), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INSUFFICIENT_FUNDS");
}

#[tokio::test]
async fn transactions_are_newest_first_and_limited() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    for amount in [100, 200, 300] {
        app.recharge(&token, amount).await;
    }

    let res = app
        .get_with_token(&format!("{}?limit=2", routes::TRANSACTIONS), &token)
        .await;
    assert_eq!(res.status, 200);
    let transactions = res.body.as_array().unwrap();
    assert_eq!(transactions.len(), 2);
    assert_eq!(transactions[0]["amount"], 300);
    assert_eq!(transactions[1]["amount"], 200);
    assert_eq!(transactions[0]["kind"], "recharge");
}
