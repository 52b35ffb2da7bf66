use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;
use tracing::warn;
use wordfreq_table::WordTable;

use crate::engine::{self, MAX_PREDICTIONS, QueryResult};
use crate::registry::WordlistRegistry;

/// Predictions returned when the request does not name a limit; matches the
/// slider's initial position.
pub const DEFAULT_LIMIT: usize = 3;

#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<WordlistRegistry>,
    pub session: Arc<RwLock<Session>>,
    pub disable_cache: bool,
}

/// The caller-held query state: active table plus the prefix and limit of
/// the most recent request. The engine itself never holds state, so a
/// wordlist switch can replay the current query against the new table.
#[derive(Debug, Clone)]
pub struct Session {
    pub wordlist: String,
    pub table: Arc<WordTable>,
    pub prefix: String,
    pub limit: usize,
}

#[derive(Deserialize)]
pub struct PredictionsQuery {
    pub prefix: String,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct PredictionsResponse {
    prefix: String,
    limit: usize,
    wordlist: String,
    words: Vec<String>,
    counts: Vec<u64>,
    shares: Vec<f64>,
    total_count: u64,
    match_count: usize,
}

#[derive(Serialize)]
pub struct WordlistsResponse {
    active: String,
    available: Vec<&'static str>,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(frontend))
        .route("/robots.txt", get(robots))
        .route("/healthz", get(healthz))
        .route("/v1/predictions", get(predictions))
        .route("/v1/wordlists", get(wordlists))
        .route("/v1/wordlists/{id}", post(select_wordlist))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    "ok"
}

async fn robots(State(state): State<AppState>) -> Response {
    let body = "User-agent: *\nDisallow: /";
    if state.disable_cache {
        return body.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400, immutable"),
        )],
        body,
    )
        .into_response()
}

async fn frontend(State(state): State<AppState>) -> Response {
    let html = Html(predict_html());
    if state.disable_cache {
        return html.into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600, immutable"),
        )],
        html,
    )
        .into_response()
}

async fn predictions(
    State(state): State<AppState>,
    axum::extract::Query(params): axum::extract::Query<PredictionsQuery>,
) -> Result<Response, ApiError> {
    // The frontend lowercases as the user types; lowercase again here so the
    // API contract does not depend on well-behaved callers.
    let prefix = params.prefix.to_lowercase();
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_PREDICTIONS);

    let mut session = state.session.write().map_err(|_| ApiError::Internal)?;
    session.prefix = prefix;
    session.limit = limit;
    let response = predict(&session);
    drop(session);

    Ok(json_response(response, state.disable_cache))
}

async fn wordlists(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session.read().map_err(|_| ApiError::Internal)?;
    let response = WordlistsResponse {
        active: session.wordlist.clone(),
        available: state.registry.ids(),
    };
    drop(session);
    Ok(Json(response).into_response())
}

async fn select_wordlist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ApiError> {
    let Some(parsed) = state.registry.load(&id) else {
        return Err(ApiError::NotFound(format!("unknown wordlist: {id}")));
    };
    // A parse failure leaves the previously active table serving.
    let table = parsed.map_err(|e| {
        warn!("wordlist {id} failed to parse: {e}");
        ApiError::Unavailable(format!("wordlist {id} is unavailable"))
    })?;

    let mut session = state.session.write().map_err(|_| ApiError::Internal)?;
    session.wordlist = id;
    session.table = table;
    // Switching must replay the in-flight query so the displayed predictions
    // always come from the newly active table.
    let response = predict(&session);
    drop(session);

    Ok(json_response(response, state.disable_cache))
}

fn predict(session: &Session) -> PredictionsResponse {
    // An empty input box never triggers a table scan.
    let result = if session.prefix.is_empty() {
        QueryResult::default()
    } else {
        engine::query(&session.table, &session.prefix, session.limit)
    };
    let shares = result
        .counts
        .iter()
        .map(|&c| engine::share_percent(c, result.total_count))
        .collect();
    PredictionsResponse {
        prefix: session.prefix.clone(),
        limit: session.limit,
        wordlist: session.wordlist.clone(),
        words: result.words,
        counts: result.counts,
        shares,
        total_count: result.total_count,
        match_count: result.match_count,
    }
}

fn json_response<T: Serialize>(body: T, disable_cache: bool) -> Response {
    if disable_cache {
        return Json(body).into_response();
    }
    (
        [(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=300"),
        )],
        Json(body),
    )
        .into_response()
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Unavailable(String),
    #[error("internal server error")]
    Internal,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::NOT_FOUND, body).into_response()
            }
            ApiError::Unavailable(msg) => {
                let body = Json(ErrorResponse { error: msg });
                (StatusCode::SERVICE_UNAVAILABLE, body).into_response()
            }
            ApiError::Internal => {
                let body = Json(json!({ "error": "internal server error" }));
                (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
            }
        }
    }
}

const BASE_HTML: &str = include_str!("../templates/base.html");
const STYLE_HTML: &str = include_str!("../templates/style.html");
const HEADER_HTML: &str = include_str!("../templates/header.html");
const FOOTER_HTML: &str = include_str!("../templates/footer.html");
const PREDICT_BODY_HTML: &str = include_str!("../templates/predict_body.html");
const PREDICT_SCRIPT: &str = include_str!("../templates/predict_script.js");

fn render_page(title: &str, body: &str, script: &str) -> String {
    let header = HEADER_HTML.replace("{{title}}", title);
    let base = BASE_HTML
        .replace("{{title}}", title)
        .replace("{{style}}", STYLE_HTML)
        .replace("{{header}}", &header)
        .replace("{{body}}", body)
        .replace("{{footer}}", FOOTER_HTML)
        .replace("{{scripts}}", &format!(r#"<script>{}</script>"#, script));
    base.replace("__MAX_LIMIT__", &MAX_PREDICTIONS.to_string())
        .replace("__DEFAULT_LIMIT__", &DEFAULT_LIMIT.to_string())
}

fn predict_html() -> String {
    render_page("Word Prediction", PREDICT_BODY_HTML, PREDICT_SCRIPT)
}
