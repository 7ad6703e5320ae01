use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use confusion_estimator::{
    api::{router, AppState},
    config::Settings,
};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, body.to_vec())
}

fn post_estimate(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/estimate")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_history() -> Request<Body> {
    Request::builder()
        .uri("/history")
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn estimate_returns_ranked_candidates_and_records_history() {
    let app = router(AppState::new(Settings::default()));
    let (status, body) = call(
        &app,
        post_estimate(json!({
            "sample_size": 4,
            "sensitivity": 0.5,
            "specificity": 0.5,
            "threshold": 1e-6
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["kind"], "estimate");
    assert_eq!(json["labels"], json!(["Sensitivity", "Specificity"]));
    assert_eq!(json["top"].as_array().unwrap().len(), 10);
    assert_eq!(json["top"][0]["TP"], 1);
    assert_eq!(json["top"][0]["exact_match"], true);
    assert_eq!(json["summary"]["candidates"], 35);

    let (status, body) = call(&app, get_history()).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_runs"], 1);
    assert_eq!(json["entries"][0]["run"], 1);
    assert_eq!(json["entries"][0]["kind"], "estimate");
    assert_eq!(json["entries"][0]["best"]["TN"], 1);
}

#[tokio::test]
async fn counts_are_converted_to_metrics() {
    let app = router(AppState::new(Settings::default()));
    let (status, body) = call(
        &app,
        post_estimate(json!({"tp": 0, "tn": 5, "fp": 0, "fn": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["kind"], "metrics");
    assert_eq!(json["metrics"]["sensitivity"], 0.0);
    assert_eq!(json["metrics"]["specificity"], 1.0);
    assert!(json["metrics"]["positive_lr"].is_null());
}

#[tokio::test]
async fn ambiguous_input_is_unprocessable() {
    let app = router(AppState::new(Settings::default()));
    let (status, body) = call(
        &app,
        post_estimate(json!({
            "sample_size": 10,
            "sensitivity": 0.5,
            "specificity": 0.5,
            "ppv": 0.5,
            "npv": 0.5
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(String::from_utf8(body).unwrap().contains("only one input group"));
}

#[tokio::test]
async fn empty_result_sets_are_not_recorded() {
    let app = router(AppState::new(Settings::default()));
    let (status, body) = call(
        &app,
        post_estimate(json!({
            "sample_size": 10,
            "diseased": 15,
            "ppv": 0.9,
            "npv": 0.9
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert!(json["top"].as_array().unwrap().is_empty());
    assert!(json["summary"].is_null());

    let (_, body) = call(&app, get_history()).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_runs"], 0);
}

#[tokio::test]
async fn history_limit_defaults_to_settings() {
    let settings = Settings {
        history_limit: 2,
        ..Settings::default()
    };
    let app = router(AppState::new(settings));
    for tp in 1..=3 {
        let (status, _) = call(
            &app,
            post_estimate(json!({"tp": tp, "tn": 1, "fp": 1, "fn": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
    let (_, body) = call(&app, get_history()).await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_runs"], 3);
    let runs: Vec<u64> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["run"].as_u64().unwrap())
        .collect();
    assert_eq!(runs, [3, 2]);
}

#[tokio::test]
async fn server_history_is_bounded_by_retention() {
    let settings = Settings {
        history_retention: 2,
        ..Settings::default()
    };
    let app = router(AppState::new(settings));
    for tp in 1..=4 {
        call(
            &app,
            post_estimate(json!({"tp": tp, "tn": 1, "fp": 1, "fn": 1})),
        )
        .await;
    }
    let request = Request::builder()
        .uri("/history?limit=10")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["total_runs"], 4);
    let runs: Vec<u64> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["run"].as_u64().unwrap())
        .collect();
    assert_eq!(runs, [4, 3]);
}
