//! Leaderboard API routes.

use crate::database::{Leaderboard, ScoreStore, SubmitStatus};
use axum::Router;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

/// Query values stay strings so that junk falls back to defaults instead of
/// failing extraction.
#[derive(Debug, Default, Deserialize)]
struct LimitParams {
    limit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ScoreParams {
    score: Option<String>,
}

pub fn router<S: ScoreStore + 'static>(board: Arc<Leaderboard<S>>) -> Router {
    Router::new()
        .route(
            "/api/leaderboard",
            get(top_scores::<S>).post(submit::<S>),
        )
        .route("/api/rival", get(rival::<S>))
        .fallback(not_found)
        .with_state(board)
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}

fn parse_number(value: Option<&String>) -> Option<i64> {
    value.and_then(|value| value.trim().parse::<i64>().ok())
}

async fn top_scores<S: ScoreStore>(
    State(board): State<Arc<Leaderboard<S>>>,
    Query(params): Query<LimitParams>,
) -> Response {
    let limit = parse_number(params.limit.as_ref());
    axum::Json(board.top_scores(limit).await).into_response()
}

async fn submit<S: ScoreStore>(State(board): State<Arc<Leaderboard<S>>>, body: Bytes) -> Response {
    let Ok(body) = serde_json::from_slice::<Value>(&body) else {
        return error(StatusCode::BAD_REQUEST, "Invalid input");
    };
    // integers only: 12.5 or "12" are rejected like a missing score
    let (Some(name), Some(score)) = (body["name"].as_str(), body["score"].as_i64()) else {
        return error(StatusCode::BAD_REQUEST, "Invalid input");
    };

    match board.submit(name, score).await {
        Ok(SubmitStatus::Stored) => axum::Json(json!({ "success": true })).into_response(),
        Ok(SubmitStatus::Dropped) => {
            error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to submit score")
        }
        Err(e) => {
            log::debug!("HTTP: rejected submission: {}", e);
            error(StatusCode::BAD_REQUEST, "Invalid input")
        }
    }
}

async fn rival<S: ScoreStore>(
    State(board): State<Arc<Leaderboard<S>>>,
    Query(params): Query<ScoreParams>,
) -> Response {
    let score = parse_number(params.score.as_ref()).unwrap_or(0);
    axum::Json(board.rival(score).await).into_response()
}

async fn not_found() -> Response {
    error(StatusCode::NOT_FOUND, "Not found")
}
