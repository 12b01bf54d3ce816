use std::collections::HashMap;

use serde_json::json;

use crate::common::{TestApp, routes};

/// The seeded contest is always ID 1.
const CONTEST_ID: i64 = 1;

/// Answer key for the seeded question bank.
fn answer_key() -> HashMap<i64, String> {
    server::seed::default_questions()
        .into_iter()
        .map(|q| (q.id, q.answer))
        .collect()
}

#[tokio::test]
async fn the_default_contest_is_seeded_and_open() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app.get_with_token(routes::CONTESTS, &token).await;
    assert_eq!(res.status, 200);
    let contests = res.body.as_array().unwrap();
    assert_eq!(contests.len(), 1);
    assert_eq!(contests[0]["status"], "registering");
    assert_eq!(contests[0]["entry_fee"], 100);
    assert_eq!(contests[0]["question_ids"].as_array().unwrap().len(), 5);

    let res = app.get_with_token(&routes::contest(99), &token).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "CONTEST_NOT_FOUND");
}

#[tokio::test]
async fn registration_is_membership_gated() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_with_token(&routes::contest_register(CONTEST_ID), &json!({}), &token)
        .await;
    assert_eq!(res.status, 403);
    assert_eq!(res.body["code"], "MEMBERSHIP_REQUIRED");
}

#[tokio::test]
async fn registration_charges_the_fee_once() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    app.purchase_membership(&token, 1).await; // 1000 gift coins

    let res = app
        .post_with_token(&routes::contest_register(CONTEST_ID), &json!({}), &token)
        .await;
    assert_eq!(res.status, 201);
    assert_eq!(res.body["status"], "registered");
    assert_eq!(res.body["username"], "alice");
    assert_eq!(res.body["total_questions"], 5);

    let dup = app
        .post_with_token(&routes::contest_register(CONTEST_ID), &json!({}), &token)
        .await;
    assert_eq!(dup.status, 409);
    assert_eq!(dup.body["code"], "ALREADY_REGISTERED");

    let account = app.get_with_token(routes::ACCOUNT, &token).await;
    assert_eq!(account.body["balance"], 900);

    let contest = app.get_with_token(&routes::contest(CONTEST_ID), &token).await;
    assert_eq!(contest.body["prize_pool"], 80);
    assert_eq!(contest.body["current_participants"], 1);
}

#[tokio::test]
async fn registration_fails_without_funds_for_the_fee() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;
    app.purchase_membership(&token, 1).await;
    // Drain the gift coins below the entry fee.
    let res = app
        .post_with_token(routes::WITHDRAW, &json!({ "coin_amount": 1000 }), &token)
        .await;
    assert_eq!(res.status, 200);

    let res = app
        .post_with_token(&routes::contest_register(CONTEST_ID), &json!({}), &token)
        .await;
    assert_eq!(res.status, 400);
    assert_eq!(res.body["code"], "INSUFFICIENT_FUNDS");

    let contest = app.get_with_token(&routes::contest(CONTEST_ID), &token).await;
    assert_eq!(contest.body["prize_pool"], 0);
    assert_eq!(contest.body["current_participants"], 0);
}

#[tokio::test]
async fn answers_require_a_registration() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_with_token(
            &routes::contest_answers(CONTEST_ID),
            &json!({ "question_id": 1, "answer": "A" }),
            &token,
        )
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_REGISTERED");

    let res = app
        .post_with_token(&routes::contest_finish(CONTEST_ID), &json!({}), &token)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_REGISTERED");
}

#[tokio::test]
async fn full_contest_flow_ranks_and_pays() {
    let app = TestApp::spawn().await;
    let alice = app.create_authenticated_user("alice").await;
    let bob = app.create_authenticated_user("bob").await;
    app.purchase_membership(&alice, 1).await;
    app.purchase_membership(&bob, 1).await;

    for token in [&alice, &bob] {
        let res = app
            .post_with_token(&routes::contest_register(CONTEST_ID), &json!({}), token)
            .await;
        assert_eq!(res.status, 201, "registration failed: {}", res.text);
    }

    let answers = answer_key();

    // Alice starts, sees the questions, and answers everything correctly.
    let start = app
        .post_with_token(&routes::contest_start(CONTEST_ID), &json!({}), &alice)
        .await;
    assert_eq!(start.status, 200);
    assert_eq!(start.body["participation"]["status"], "in_progress");
    let questions = start.body["questions"].as_array().unwrap().clone();
    assert_eq!(questions.len(), 5);
    assert!(questions.iter().all(|q| q.get("answer").is_none()));

    for question in &questions {
        let id = question["id"].as_i64().unwrap();
        let res = app
            .post_with_token(
                &routes::contest_answers(CONTEST_ID),
                &json!({ "question_id": id, "answer": answers[&id], "duration_ms": 1_000 }),
                &alice,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["correct"], true);
    }

    // Bob only gets the first question right and is slower.
    let bob_score = questions[0]["points"].as_i64().unwrap();
    for (index, question) in questions.iter().enumerate() {
        let id = question["id"].as_i64().unwrap();
        let answer = if index == 0 { answers[&id].clone() } else { "Z".to_string() };
        let res = app
            .post_with_token(
                &routes::contest_answers(CONTEST_ID),
                &json!({ "question_id": id, "answer": answer, "duration_ms": 5_000 }),
                &bob,
            )
            .await;
        assert_eq!(res.status, 200);
        assert_eq!(res.body["correct"], index == 0);
    }

    let alice_finish = app
        .post_with_token(&routes::contest_finish(CONTEST_ID), &json!({}), &alice)
        .await;
    assert_eq!(alice_finish.status, 200);
    assert_eq!(alice_finish.body["rank"], 1);
    assert_eq!(alice_finish.body["total_score"], 85);
    assert_eq!(alice_finish.body["correct_count"], 5);

    let bob_finish = app
        .post_with_token(&routes::contest_finish(CONTEST_ID), &json!({}), &bob)
        .await;
    assert_eq!(bob_finish.status, 200);
    assert_eq!(bob_finish.body["rank"], 2);
    assert_eq!(bob_finish.body["total_score"], bob_score);
    assert_eq!(bob_finish.body["correct_count"], 1);

    // Pool 160 pays 80 to rank 1 and 53 to rank 2.
    let ranking = app
        .get_with_token(&routes::contest_ranking(CONTEST_ID), &alice)
        .await;
    let entries = ranking.body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["username"], "alice");
    assert_eq!(entries[0]["reward_coins"], 80);
    assert_eq!(entries[1]["username"], "bob");
    assert_eq!(entries[1]["reward_coins"], 53);

    let alice_account = app.get_with_token(routes::ACCOUNT, &alice).await;
    assert_eq!(alice_account.body["balance"], 1000 - 100 + 80);
    let bob_account = app.get_with_token(routes::ACCOUNT, &bob).await;
    assert_eq!(bob_account.body["balance"], 1000 - 100 + 53);

    // Finishing twice is rejected.
    let res = app
        .post_with_token(&routes::contest_finish(CONTEST_ID), &json!({}), &alice)
        .await;
    assert_eq!(res.status, 409);
    assert_eq!(res.body["code"], "ALREADY_FINISHED");

    // Participation records reflect the final state.
    let mine = app
        .get_with_token(&routes::contest_participation(CONTEST_ID), &bob)
        .await;
    assert_eq!(mine.status, 200);
    assert_eq!(mine.body["rank"], 2);
    assert_eq!(mine.body["status"], "finished");

    let all_mine = app.get_with_token(routes::PARTICIPATIONS, &bob).await;
    assert_eq!(all_mine.body.as_array().unwrap().len(), 1);
}
