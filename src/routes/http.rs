//! HTTP endpoint handlers. These are thin wrappers that forward to the
//! backlog manager and orchestrator. Each handler is instrumented and logs
//! parameters and basic result info.

use std::sync::Arc;
use axum::{
  Json,
  extract::State,
  http::{HeaderMap, header::AUTHORIZATION},
};
use tracing::{info, instrument};

use crate::error::AppError;
use crate::protocol::*;
use crate::quiz::fixture_quiz;
use crate::state::AppState;

#[instrument(level = "info")]
pub async fn http_health() -> Json<HealthOut> {
  Json(HealthOut { ok: true })
}

/// `GET /daily-quiz/cached` — today's quizzes in the frontend shape.
/// 404 when nothing has been generated for the current UTC day.
#[instrument(level = "info", skip(state))]
pub async fn http_get_cached(
  State(state): State<Arc<AppState>>,
) -> Result<Json<CachedQuizzesOut>, AppError> {
  let Some(record) = state.quizzes.get_cached().await? else {
    return Err(AppError::NotFound("no cached quiz for today".into()));
  };

  let quizzes: Vec<FrontendQuizConfig> = record.quizzes.iter().map(to_frontend).collect();
  let count = quizzes.len();
  info!(target: "quiz", count, "HTTP cached quizzes served");
  Ok(Json(CachedQuizzesOut { success: true, quizzes, count }))
}

/// `POST /backlog/add` — enqueue a topic. 400 on empty trimmed topic.
#[instrument(level = "info", skip(state, body), fields(topic_len = body.topic.len()))]
pub async fn http_add_backlog(
  State(state): State<Arc<AppState>>,
  Json(body): Json<AddBacklogIn>,
) -> Result<Json<AddBacklogOut>, AppError> {
  let item = state.backlog.enqueue(&body.topic, &body.added_by).await?;
  info!(target: "backlog", id = %item.id, "HTTP topic enqueued");
  Ok(Json(AddBacklogOut {
    success: true,
    item,
    message: "Topic added to backlog".into(),
  }))
}

/// `GET /backlog` — full pending-topics list, oldest first.
#[instrument(level = "info", skip(state))]
pub async fn http_get_backlog(
  State(state): State<Arc<AppState>>,
) -> Result<Json<BacklogOut>, AppError> {
  let list = state.backlog.list().await?;
  Ok(Json(BacklogOut {
    success: true,
    count: list.total_count,
    items: list.items,
  }))
}

/// `GET /cron/daily-quiz` — the scheduled trigger. When CRON_SECRET is
/// configured the request must carry `Authorization: Bearer <secret>`.
#[instrument(level = "info", skip(state, headers))]
pub async fn http_cron_daily_quiz(
  State(state): State<Arc<AppState>>,
  headers: HeaderMap,
) -> Result<Json<CronOut>, AppError> {
  if let Some(secret) = &state.cron_secret {
    let bearer = headers
      .get(AUTHORIZATION)
      .and_then(|v| v.to_str().ok())
      .and_then(|v| v.strip_prefix("Bearer "));
    if bearer != Some(secret.as_str()) {
      return Err(AppError::Unauthorized("invalid cron secret"));
    }
  }

  let (quiz, source) = state.quizzes.generate_scheduled().await?;
  info!(target: "quiz", quiz_id = %quiz.id, source = source.as_str(), "HTTP cron generation finished");
  Ok(Json(CronOut { success: true, source, quiz_count: 1 }))
}

/// `GET /test/insert-quiz` — insert the fixture quiz into today's record.
/// Exercises cache plumbing without touching generation.
#[instrument(level = "info", skip(state))]
pub async fn http_test_insert_quiz(
  State(state): State<Arc<AppState>>,
) -> Result<Json<InsertQuizOut>, AppError> {
  state.quizzes.insert_manual(fixture_quiz()).await?;
  Ok(Json(InsertQuizOut {
    success: true,
    message: "Fixture quiz inserted into today's cache".into(),
  }))
}

#[cfg(test)]
mod tests {
  use super::*;
  use axum::http::{HeaderValue, StatusCode};
  use axum::response::IntoResponse;
  use crate::test_utils::test_state;

  #[tokio::test]
  async fn cached_endpoint_is_404_before_generation() {
    let state = test_state(None);
    let err = http_get_cached(State(state)).await.err().unwrap();
    assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn cron_then_cached_round_trip() {
    let state = test_state(None);

    let out = http_cron_daily_quiz(State(state.clone()), HeaderMap::new())
      .await
      .unwrap();
    assert!(out.0.success);
    assert_eq!(out.0.quiz_count, 1);

    let cached = http_get_cached(State(state)).await.unwrap();
    assert_eq!(cached.0.count, 1);
    assert_eq!(cached.0.quizzes[0].questions.len(), 3);
  }

  #[tokio::test]
  async fn cron_secret_gates_the_endpoint() {
    let state = test_state(Some("s3cret"));

    let err = http_cron_daily_quiz(State(state.clone()), HeaderMap::new())
      .await
      .err()
      .unwrap();
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer wrong"));
    let err = http_cron_daily_quiz(State(state.clone()), headers)
      .await
      .err()
      .unwrap();
    assert_eq!(err.into_response().status(), StatusCode::UNAUTHORIZED);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer s3cret"));
    assert!(http_cron_daily_quiz(State(state), headers).await.is_ok());
  }

  #[tokio::test]
  async fn add_backlog_rejects_empty_topics_with_400() {
    let state = test_state(None);
    let body = AddBacklogIn { topic: "   ".into(), added_by: "alice".into(), priority: None };
    let err = http_add_backlog(State(state), Json(body)).await.err().unwrap();
    assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn add_then_list_backlog() {
    let state = test_state(None);

    let body = AddBacklogIn { topic: "Bitcoin".into(), added_by: "alice".into(), priority: None };
    let added = http_add_backlog(State(state.clone()), Json(body)).await.unwrap();
    assert!(added.0.success);
    assert_eq!(added.0.item.topic, "Bitcoin");

    let list = http_get_backlog(State(state)).await.unwrap();
    assert_eq!(list.0.count, 1);
    assert_eq!(list.0.items[0].added_by, "alice");
  }

  #[tokio::test]
  async fn test_insert_endpoint_populates_the_cache() {
    let state = test_state(None);

    http_test_insert_quiz(State(state.clone())).await.unwrap();
    let cached = http_get_cached(State(state)).await.unwrap();
    assert_eq!(cached.0.count, 1);
    assert_eq!(cached.0.quizzes[0].id, "manual-test-quiz");
  }
}
