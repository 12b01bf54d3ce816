use serde_json::json;

use crate::common::{TestApp, routes};

#[tokio::test]
async fn served_questions_never_include_the_answer() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app.get_with_token(&routes::question(1), &token).await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["id"], 1);
    assert!(res.body.get("answer").is_none());
    assert!(res.body["options"].as_array().unwrap().len() >= 2);

    let res = app
        .get_with_token(&format!("{}?count=3", routes::QUESTIONS), &token)
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn practice_grades_and_builds_history() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    // Question 1's seeded answer is B.
    let res = app
        .post_with_token(
            &routes::question_attempts(1),
            &json!({ "answer": " b ", "duration_ms": 1200 }),
            &token,
        )
        .await;
    assert_eq!(res.status, 200);
    assert_eq!(res.body["correct"], true);
    assert_eq!(res.body["score"], 10);
    assert_eq!(res.body["correct_answer"], "B");

    let res = app
        .post_with_token(
            &routes::question_attempts(1),
            &json!({ "answer": "D" }),
            &token,
        )
        .await;
    assert_eq!(res.body["correct"], false);

    let history = app.get_with_token(routes::ATTEMPTS, &token).await;
    assert_eq!(history.status, 200);
    assert_eq!(history.body["attempts"].as_array().unwrap().len(), 2);
    assert_eq!(history.body["attempts"][0]["correct"], false); // newest first
    assert_eq!(history.body["total_score"], 10);
}

#[tokio::test]
async fn practicing_an_unknown_question_is_a_not_found() {
    let app = TestApp::spawn().await;
    let token = app.create_authenticated_user("alice").await;

    let res = app
        .post_with_token(&routes::question_attempts(99), &json!({ "answer": "A" }), &token)
        .await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "QUESTION_NOT_FOUND");
}
