mod common;

use axum::http::{Method, StatusCode};
use axum::Router;
use serde_json::{json, Value};

use common::app::spawn_test_server;
use common::auth::login_and_get_token;
use common::fixtures::{meaning_of, word_for};
use common::http::{assert_json_error, call, call_ok};

async fn select(app: &Router, token: &str, unit_id: &str) -> Value {
    call_ok(
        app,
        Method::POST,
        "/api/study/select",
        Some(json!({ "textbookId": "book", "unitId": unit_id })),
        token,
    )
    .await
}

/// Walks the deck to its last card and completes it.
async fn finish_flashcards(app: &Router, token: &str) -> Value {
    let mut card = call_ok(app, Method::POST, "/api/study/flashcard/start", None, token).await["card"].clone();
    while card["isLast"] == false {
        card = call_ok(app, Method::POST, "/api/study/flashcard/next", None, token).await["card"].clone();
    }
    call_ok(app, Method::POST, "/api/study/flashcard/complete", None, token).await
}

async fn answer_recall_correctly(app: &Router, token: &str) -> Value {
    loop {
        let question = call_ok(app, Method::GET, "/api/study/recall", None, token).await["question"].clone();
        let word = question["word"].as_str().expect("recall word");
        let step = call_ok(
            app,
            Method::POST,
            "/api/study/recall/answer",
            Some(json!({ "index": question["index"], "answer": meaning_of(word) })),
            token,
        )
        .await;
        if step["finished"] == true {
            return step;
        }
    }
}

/// Spells every word, substituting `typo` for banana when given.
async fn answer_spelling(app: &Router, token: &str, typo: Option<&str>) -> Value {
    loop {
        let question = call_ok(app, Method::GET, "/api/study/spelling", None, token).await["question"].clone();
        let target = word_for(question["meaning"].as_str().expect("meaning"));
        let typed = match typo {
            Some(typo) if target == "banana" => typo,
            _ => target,
        };
        let step = call_ok(
            app,
            Method::POST,
            "/api/study/spelling/answer",
            Some(json!({ "index": question["index"], "answer": typed })),
            token,
        )
        .await;
        if step["finished"] == true {
            return step;
        }
    }
}

#[tokio::test]
async fn it_study_full_pass_then_retry() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app, "mina").await;

    let selection = select(&app.app, &token, "fruit").await;
    assert_eq!(selection["wordCount"], 3);
    assert_eq!(selection["textbookTitle"], "Fixture Book");

    let started = call_ok(&app.app, Method::POST, "/api/study/flashcard/start", None, &token).await;
    assert_eq!(started["stage"], "flashcardActive");
    assert_eq!(started["card"]["word"]["word"], "apple");
    assert_eq!(started["card"]["isLast"], false);

    let (status, body) = call(&app.app, Method::POST, "/api/study/flashcard/complete", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "DECK_UNFINISHED");

    let flipped = call_ok(&app.app, Method::POST, "/api/study/flashcard/flip", None, &token).await;
    assert_eq!(flipped["card"]["flipped"], true);
    let toggled = call_ok(&app.app, Method::POST, "/api/study/flashcard/toggle-order", None, &token).await;
    assert_eq!(toggled["card"]["meaningFirst"], true);
    assert_eq!(toggled["card"]["flipped"], false);

    call_ok(&app.app, Method::POST, "/api/study/flashcard/next", None, &token).await;
    let last = call_ok(&app.app, Method::POST, "/api/study/flashcard/next", None, &token).await;
    assert_eq!(last["card"]["index"], 2);
    assert_eq!(last["card"]["isLast"], true);
    let clamped = call_ok(&app.app, Method::POST, "/api/study/flashcard/next", None, &token).await;
    assert_eq!(clamped["card"]["index"], 2);

    let spoken = call_ok(&app.app, Method::POST, "/api/study/flashcard/pronounce", None, &token).await;
    assert_eq!(spoken["text"], "banana");

    let completed = call_ok(&app.app, Method::POST, "/api/study/flashcard/complete", None, &token).await;
    assert_eq!(completed["stage"], "recallActive");

    // Locked and invalid recall answers leave the question open.
    let question = call_ok(&app.app, Method::GET, "/api/study/recall", None, &token).await["question"].clone();
    assert_eq!(question["index"], 0);
    assert_eq!(question["total"], 3);
    assert_eq!(question["options"].as_array().unwrap().len(), 3);
    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/study/recall/answer",
        Some(json!({ "index": 1, "answer": "사과" })),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "ANSWER_LOCKED");
    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/study/recall/answer",
        Some(json!({ "index": 0, "answer": "not offered" })),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "UNKNOWN_OPTION");

    let last_recall = answer_recall_correctly(&app.app, &token).await;
    assert_eq!(last_recall["stage"], "spellingActive");
    assert_eq!(last_recall["record"]["testType"], "recall");

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/study/spelling/answer",
        Some(json!({ "index": 0, "answer": "   " })),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "BLANK_ANSWER");

    let last_spell = answer_spelling(&app.app, &token, Some("bannana")).await;
    assert_eq!(last_spell["stage"], "resultReady");

    let result = call_ok(&app.app, Method::GET, "/api/study/result", None, &token).await;
    assert_eq!(result["totalWords"], 6);
    assert_eq!(result["score"], 83);
    assert_eq!(result["isRetryResult"], false);
    assert_eq!(result["recallResults"].as_array().unwrap().len(), 3);
    assert_eq!(result["spellResults"].as_array().unwrap().len(), 3);

    let report = call_ok(&app.app, Method::POST, "/api/study/report", None, &token).await;
    assert_eq!(report["total"], 6);
    assert_eq!(report["correct"], 5);
    assert_eq!(report["score"], 83);
    assert_eq!(report["wrongByType"]["kind"], "separated");
    assert!(report["wrongByType"]["recall"].as_array().unwrap().is_empty());
    let spell_wrong = report["wrongByType"]["spell"].as_array().unwrap();
    assert_eq!(spell_wrong.len(), 1);
    assert_eq!(spell_wrong[0]["id"], 7);
    assert_eq!(spell_wrong[0]["userAnswer"], "bannana");
    assert_eq!(report["retryCandidates"], json!([{
        "id": 7, "word": "banana", "meaning": "바나나", "example": "", "exampleMeaning": ""
    }]));

    let progress = call_ok(&app.app, Method::GET, "/api/progress", None, &token).await;
    assert_eq!(progress["progress"]["fruit"], json!({ "flashcard": true, "recall": true, "spelling": true }));
    assert_eq!(progress["stats"]["fruit"]["repetition"], 1);

    let retry = call_ok(&app.app, Method::POST, "/api/study/retry", None, &token).await;
    assert_eq!(retry["stage"], "retrySpellingActive");
    assert_eq!(retry["question"]["isRetry"], true);
    assert_eq!(retry["question"]["total"], 1);
    assert_eq!(retry["question"]["meaning"], "바나나");

    let fixed = call_ok(
        &app.app,
        Method::POST,
        "/api/study/spelling/answer",
        Some(json!({ "index": 0, "answer": " Banana " })),
        &token,
    )
    .await;
    assert_eq!(fixed["record"]["isCorrect"], true);
    assert_eq!(fixed["stage"], "retryResultReady");

    let retry_result = call_ok(&app.app, Method::GET, "/api/study/result", None, &token).await;
    assert_eq!(retry_result["isRetryResult"], true);
    assert_eq!(retry_result["score"], 100);
    assert_eq!(retry_result["totalWords"], 1);
    assert!(retry_result["recallResults"].is_null());

    // The retry pass leaves progress and repetition alone.
    let progress = call_ok(&app.app, Method::GET, "/api/progress", None, &token).await;
    assert_eq!(progress["stats"]["fruit"]["repetition"], 1);

    let (status, body) = call(&app.app, Method::POST, "/api/study/retry", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "NOTHING_TO_RETRY");

    let (status, body) = call(&app.app, Method::POST, "/api/study/flashcard/start", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "INVALID_TRANSITION");

    let reset = call_ok(&app.app, Method::POST, "/api/study/reset", None, &token).await;
    assert_eq!(reset["stage"], "idle");
    assert_eq!(reset["selection"]["unitId"], "fruit");
}

#[tokio::test]
async fn it_study_requires_selection() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app, "mina").await;

    let (status, body) = call(&app.app, Method::POST, "/api/study/flashcard/start", None, &token).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_json_error(&body, "NO_SELECTION");

    for path in ["/api/study/recall", "/api/study/spelling"] {
        let (status, body) = call(&app.app, Method::GET, path, None, &token).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_json_error(&body, "NO_SELECTION");
    }

    let (status, body) = call(
        &app.app,
        Method::POST,
        "/api/study/select",
        Some(json!({ "textbookId": "book", "unitId": "missing" })),
        &token,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_json_error(&body, "UNIT_NOT_FOUND");

    let state = call_ok(&app.app, Method::GET, "/api/study/state", None, &token).await;
    assert_eq!(state["stage"], "idle");
    assert!(state["selection"].is_null());
    assert_eq!(state["user"]["name"], "mina");
}

#[tokio::test]
async fn it_study_rejects_out_of_order_steps() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app, "mina").await;
    select(&app.app, &token, "fruit").await;

    let (status, body) = call(&app.app, Method::POST, "/api/study/report", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "INVALID_TRANSITION");

    let (status, body) = call(&app.app, Method::GET, "/api/study/spelling", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "WRONG_STAGE");

    call_ok(&app.app, Method::POST, "/api/study/flashcard/start", None, &token).await;
    let (status, body) = call(&app.app, Method::GET, "/api/study/result", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "WRONG_STAGE");
}

#[tokio::test]
async fn it_study_empty_unit_completes_immediately() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app, "mina").await;
    select(&app.app, &token, "empty").await;

    let started = call_ok(&app.app, Method::POST, "/api/study/flashcard/start", None, &token).await;
    assert!(started["card"].is_null());
    let completed = call_ok(&app.app, Method::POST, "/api/study/flashcard/complete", None, &token).await;
    assert_eq!(completed["stage"], "resultReady");

    let result = call_ok(&app.app, Method::GET, "/api/study/result", None, &token).await;
    assert_eq!(result["totalWords"], 0);
    assert_eq!(result["score"], 0);

    let (status, body) = call(&app.app, Method::POST, "/api/study/retry", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "NOTHING_TO_RETRY");
}

#[tokio::test]
async fn it_study_single_word_unit_offers_one_option() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app, "mina").await;
    select(&app.app, &token, "solo").await;
    let completed = finish_flashcards(&app.app, &token).await;
    assert_eq!(completed["stage"], "recallActive");

    let question = call_ok(&app.app, Method::GET, "/api/study/recall", None, &token).await["question"].clone();
    assert_eq!(question["options"], json!(["혼자"]));
}

#[tokio::test]
async fn it_study_perfect_run_has_nothing_to_retry() {
    let app = spawn_test_server().await;
    let token = login_and_get_token(&app.app, "mina").await;
    select(&app.app, &token, "fruit").await;
    finish_flashcards(&app.app, &token).await;
    answer_recall_correctly(&app.app, &token).await;
    answer_spelling(&app.app, &token, None).await;

    let report = call_ok(&app.app, Method::POST, "/api/study/report", None, &token).await;
    assert_eq!(report["score"], 100);
    assert!(report["retryCandidates"].as_array().unwrap().is_empty());

    // Viewing the report again is allowed.
    let again = call_ok(&app.app, Method::POST, "/api/study/report", None, &token).await;
    assert_eq!(again["score"], 100);

    let (status, body) = call(&app.app, Method::POST, "/api/study/retry", None, &token).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_json_error(&body, "NOTHING_TO_RETRY");
}

#[tokio::test]
async fn it_study_routes_require_auth() {
    let app = spawn_test_server().await;
    let (status, body) = call(&app.app, Method::GET, "/api/study/state", None, "bogus").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_json_error(&body, "AUTH_UNAUTHORIZED");
}
