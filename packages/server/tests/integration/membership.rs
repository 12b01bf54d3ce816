use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn purchase_activates_and_credits_gift_coins() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let status = app.get_with_token(routes::MEMBERSHIP_STATUS, &token).await;
    assert_eq!(status.body["valid"], false);

    let res = app.purchase_membership(&token, 1).await;
    assert_eq!(res.body["gift_coins"], 1000);
    assert_eq!(res.body["membership"]["level"], "month");
    assert_eq!(res.body["membership"]["status"], "active");

    let status = app.get_with_token(routes::MEMBERSHIP_STATUS, &token).await;
    assert_eq!(status.body["valid"], true);

    // The gift landed in the wallet as a reward.
    let account = app.get_with_token(routes::ACCOUNT, &token).await;
    assert_eq!(account.body["balance"], 1000);
    assert_eq!(account.body["total_reward"], 1000);
}

#[tokio::test]
async fn membership_record_is_absent_until_purchased() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app.get_with_token(routes::MEMBERSHIP, &token).await;
    assert_eq!(res.status, 404);

    app.purchase_membership(&token, 2).await;

    let res = app.get_with_token(routes::MEMBERSHIP, &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["level"], "season");
}

#[tokio::test]
async fn invalid_levels_are_rejected() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_with_token(routes::MEMBERSHIP_PURCHASE, &json!({ "level": 9 }), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INVALID_LEVEL");
}

#[tokio::test]
async fn plans_catalog_lists_all_three_levels() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::MEMBERSHIP_PLANS).await;
    assert_eq!(res.status, 200);
    let plans = res.body.as_array().unwrap();
    assert_eq!(plans.len(), 3);
    assert_eq!(plans[0]["name"], "month");
    assert_eq!(plans[2]["gift_coins"], 15000);
}
