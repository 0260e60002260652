use crate::cache::InsightCache;
use crate::fetcher::Fetcher;
use crate::llm_adapter::LlmAdapter;
use crate::retry::RetryPolicy;
use crate::topics;
use crate::types::{InsightBundle, InsightError, InsightView, Paper, Result, TopicAnalysis};
use axum::extract::{Json, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[derive(Clone)]
pub struct AppState {
    fetcher: Arc<Fetcher>,
    adapter: Arc<dyn LlmAdapter>,
    insights: Arc<InsightCache>,
}

impl AppState {
    pub fn new(fetcher: Fetcher, adapter: Arc<dyn LlmAdapter>, policy: RetryPolicy) -> Self {
        let insights = Arc::new(InsightCache::new(adapter.clone(), policy));
        Self {
            fetcher: Arc::new(fetcher),
            adapter,
            insights,
        }
    }

    pub fn insights(&self) -> &InsightCache {
        &self.insights
    }
}

#[derive(Debug, Deserialize)]
struct PapersQuery {
    category: Option<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retryable: Option<bool>,
}

fn error_response(status: StatusCode, message: impl Into<String>, retryable: Option<bool>) -> Response {
    let body = ErrorBody {
        error: message.into(),
        retryable,
    };
    (status, Json(body)).into_response()
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/papers", get(list_papers))
        .route("/api/insights", post(insights))
        .route("/api/insights/retry", post(retry_insights))
        .route("/api/topics", post(topic_scores))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("Server running on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}

async fn health() -> &'static str {
    "OK"
}

/// `GET /api/papers?category=cs.AI`
async fn list_papers(State(state): State<AppState>, Query(query): Query<PapersQuery>) -> Response {
    let Some(category) = query.category.filter(|c| !c.is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "Category is required", None);
    };

    match state.fetcher.fetch_category(&category).await {
        Ok(papers) => Json(papers).into_response(),
        Err(e) => {
            error!("Error fetching papers for {}: {}", category, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch papers", None)
        }
    }
}

// Clients get a fixed message; the underlying error only goes to the log.
fn insight_response(paper_id: &str, result: Result<Arc<InsightBundle>>) -> Response {
    match result {
        Ok(bundle) => Json::<InsightView>(bundle.view()).into_response(),
        Err(e @ InsightError::InsightsUnavailable { .. }) => {
            warn!("{}", e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to generate insights", Some(true))
        }
        Err(e) => {
            error!("Insight request for {} failed: {}", paper_id, e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate insights", None)
        }
    }
}

async fn insights(State(state): State<AppState>, Json(paper): Json<Paper>) -> Response {
    insight_response(&paper.id, state.insights.get_or_generate(&paper).await)
}

async fn retry_insights(State(state): State<AppState>, Json(paper): Json<Paper>) -> Response {
    insight_response(&paper.id, state.insights.retry(&paper).await)
}

/// Regenerated on every request; topic analyses are not memoized.
async fn topic_scores(State(state): State<AppState>, Json(paper): Json<Paper>) -> Response {
    match topics::score_topics(state.adapter.as_ref(), &paper).await {
        Ok(analysis) => Json::<TopicAnalysis>(analysis).into_response(),
        Err(e) => {
            warn!("Topic scoring failed for {}: {}", paper.id, e);
            error_response(StatusCode::BAD_GATEWAY, "Failed to analyze topics", None)
        }
    }
}
