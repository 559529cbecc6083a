use crate::error::ApiError;
use axum::extract::{DefaultBodyLimit, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use scsc_core::config::ServiceConfig;
use scsc_core::model::{EvaluationReport, LogRecord, NewLogRecord};
use scsc_core::pipeline::EvaluationPipeline;
use scsc_core::providers::llm::gemini::GeminiClient;
use scsc_core::providers::llm::LlmClient;
use scsc_core::storage::Store;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_LOG_LIMIT: u32 = 50;
pub const MAX_LOG_LIMIT: u32 = 500;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: EvaluationPipeline,
    pub store: Store,
}

impl AppState {
    /// Builds the Gemini clients and opens the store (schema created if
    /// absent).
    pub fn from_config(cfg: &ServiceConfig) -> anyhow::Result<Self> {
        let classifier: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(
            cfg.model.clone(),
            cfg.api_key.clone(),
            cfg.gemini_base_url.clone(),
            cfg.model_timeout(),
        )?);
        let rewriter: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(
            cfg.model.clone(),
            cfg.api_key.clone(),
            cfg.gemini_base_url.clone(),
            cfg.model_timeout(),
        )?);

        let store = Store::open(&cfg.db_path)?;
        store.init_schema()?;

        Ok(Self {
            pipeline: EvaluationPipeline::new(classifier, rewriter, cfg.extract_mode),
            store,
        })
    }
}

/// Request bodies are unbounded: `/evaluate` accepts text of any length.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/evaluate", post(evaluate))
        .route("/logs", get(logs))
        .layer(DefaultBodyLimit::disable())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct Health {
    ok: bool,
    service: &'static str,
}

async fn healthz() -> Json<Health> {
    Json(Health {
        ok: true,
        service: "scsc-server",
    })
}

#[derive(Debug, Deserialize)]
pub struct EvalRequest {
    pub text: String,
}

async fn evaluate(
    State(state): State<AppState>,
    Json(req): Json<EvalRequest>,
) -> Result<Json<EvaluationReport>, ApiError> {
    let report = state.pipeline.evaluate(&req.text).await.render();

    let record = NewLogRecord::from_report(&req.text, &report).map_err(ApiError::Internal)?;
    let store = state.store.clone();
    let id = tokio::task::spawn_blocking(move || store.insert(&record))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Store)?;

    tracing::info!(
        event = "scsc.evaluate.logged",
        id,
        ok = report.ok,
        risk = report.result.risk,
    );

    Ok(Json(report))
}

#[derive(Debug, Deserialize)]
pub struct LogsQuery {
    pub limit: Option<u32>,
}

async fn logs(
    State(state): State<AppState>,
    Query(q): Query<LogsQuery>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    let limit = q.limit.unwrap_or(DEFAULT_LOG_LIMIT).min(MAX_LOG_LIMIT);
    let store = state.store.clone();
    let rows = tokio::task::spawn_blocking(move || store.list_recent(limit))
        .await
        .map_err(|e| ApiError::Internal(e.into()))?
        .map_err(ApiError::Store)?;
    Ok(Json(rows))
}
