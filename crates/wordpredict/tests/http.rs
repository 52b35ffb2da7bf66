use std::sync::{Arc, RwLock};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use tower::util::ServiceExt;
use wordfreq_table::WordTable;

use wordpredict::handlers::{AppState, DEFAULT_LIMIT, Session, router};
use wordpredict::registry::WordlistRegistry;

fn make_state() -> AppState {
    let table = WordTable::parse("word,count\nthe,100\nthen,50\ntherefore,10\n").unwrap();
    AppState {
        registry: Arc::new(WordlistRegistry::builtin()),
        session: Arc::new(RwLock::new(Session {
            wordlist: "333k".to_string(),
            table: Arc::new(table),
            prefix: String::new(),
            limit: DEFAULT_LIMIT,
        })),
        disable_cache: false,
    }
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&body_bytes).unwrap();
    (status, body)
}

async fn post_json(app: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body = serde_json::from_slice(&body_bytes).unwrap();
    (status, body)
}

#[tokio::test]
async fn healthz_ok() {
    let app = router(make_state());
    let response = app
        .oneshot(
            Request::builder()
                .uri("/healthz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn predictions_are_ranked_with_shares() {
    let app = router(make_state());
    let (status, body) = get_json(app, "/v1/predictions?prefix=the&limit=2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["words"], serde_json::json!(["the", "then"]));
    assert_eq!(body["counts"], serde_json::json!([100, 50]));
    assert_eq!(body["shares"], serde_json::json!([62.5, 31.25]));
    assert_eq!(body["total_count"], 160);
    assert_eq!(body["match_count"], 3);
}

#[tokio::test]
async fn empty_prefix_returns_empty_predictions() {
    let app = router(make_state());
    let (status, body) = get_json(app, "/v1/predictions?prefix=&limit=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["words"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_count"], 0);
}

#[tokio::test]
async fn no_match_prefix_has_no_nan_shares() {
    let app = router(make_state());
    let (status, body) = get_json(app, "/v1/predictions?prefix=zzznotfound").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["words"].as_array().unwrap().len(), 0);
    assert_eq!(body["total_count"], 0);
    // serde_json has no NaN; an unguarded divide would have poisoned the body
    assert!(body["shares"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn prefix_is_lowercased_before_matching() {
    let app = router(make_state());
    let (status, body) = get_json(app, "/v1/predictions?prefix=THE&limit=1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["prefix"], "the");
    assert_eq!(body["words"], serde_json::json!(["the"]));
}

#[tokio::test]
async fn limit_is_clamped_into_bounds() {
    let state = make_state();
    let (_, body) = get_json(router(state.clone()), "/v1/predictions?prefix=the&limit=99").await;
    assert_eq!(body["limit"], 10);
    let (_, body) = get_json(router(state), "/v1/predictions?prefix=the&limit=0").await;
    assert_eq!(body["limit"], 1);
}

#[tokio::test]
async fn wordlists_lists_builtin_ids() {
    let app = router(make_state());
    let (status, body) = get_json(app, "/v1/wordlists").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["active"], "333k");
    assert_eq!(body["available"], serde_json::json!(["333k", "100k", "10k"]));
}

#[tokio::test]
async fn switching_wordlists_replays_the_current_query() {
    let state = make_state();
    let (_, before) = get_json(router(state.clone()), "/v1/predictions?prefix=the&limit=2").await;
    assert_eq!(before["total_count"], 160);

    let (status, after) = post_json(router(state.clone()), "/v1/wordlists/10k").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["wordlist"], "10k");
    // Replayed with the stored prefix and limit, computed from the new table only.
    assert_eq!(after["prefix"], "the");
    assert_eq!(after["limit"], 2);
    assert!(!after["words"].as_array().unwrap().is_empty());
    assert_ne!(after["total_count"], 160);

    let (_, listed) = get_json(router(state), "/v1/wordlists").await;
    assert_eq!(listed["active"], "10k");
}

#[tokio::test]
async fn unknown_wordlist_is_not_found() {
    let app = router(make_state());
    let (status, body) = post_json(app, "/v1/wordlists/1M").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(
        body["error"]
            .as_str()
            .unwrap_or_default()
            .contains("unknown wordlist")
    );
}

#[tokio::test]
async fn frontend_serves_widgets() {
    let app = router(make_state());
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body_bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let html = String::from_utf8(body_bytes.to_vec()).unwrap();
    assert!(html.contains(r#"type="range""#));
    assert!(html.contains(r#"max="10""#));
    assert!(html.contains("Type something"));
}
