use std::sync::Arc;

use action_center::{build_plan, list_actions, run_scenario, ActionFilter, PlanFormat, Selection};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use client_core::{
    load_insights, load_results, render, ActionsPage, FetchError, PageState,
};
use serde::Deserialize;
use shared::{
    domain::{CalculationId, CalculationResult, ScenarioResult},
    error::{ApiError, ErrorCode},
    protocol::{ActionsQuery, ActionsResponse, AiInsightsResponse, ScenarioRequest},
};
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing::warn;

use crate::app_state::AppState;

const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const TEXT_MARKDOWN: &str = "text/markdown; charset=utf-8";

type ApiResult<T> = Result<T, (StatusCode, Json<ApiError>)>;

#[derive(Debug, Deserialize)]
struct ExportQuery {
    format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ActionsPageQuery {
    category: Option<String>,
    complexity: Option<String>,
    q: Option<String>,
    /// Comma-separated action ids.
    selected: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResultsPageQuery {
    #[serde(default)]
    insights: bool,
}

pub(crate) fn build_router(state: Arc<AppState>, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/api/actions", get(http_list_actions))
        .route("/api/scenario", post(http_run_scenario))
        .route("/api/scenario/export", post(http_export_plan))
        .route("/api/results/:calculation_id", get(http_get_results))
        .route(
            "/api/results/:calculation_id/ai-insights",
            post(http_generate_insights),
        )
        .route("/actions", get(actions_page))
        .route("/resultats/:calculation_id", get(results_page))
        .layer(RequestBodyLimitLayer::new(max_request_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn http_list_actions(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ActionsQuery>,
) -> Json<ActionsResponse> {
    Json(ActionsResponse {
        actions: Some(list_actions(&state.catalog, &q)),
    })
}

async fn http_run_scenario(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ScenarioRequest>,
) -> ApiResult<Json<ScenarioResult>> {
    run_scenario(&state.catalog, &req)
        .map(Json)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))
}

async fn http_export_plan(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ExportQuery>,
    Json(req): Json<ScenarioRequest>,
) -> ApiResult<Response> {
    let format = match q.format.as_deref() {
        Some(raw) => raw.parse::<PlanFormat>().map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiError::new(ErrorCode::Validation, e)),
            )
        })?,
        None => PlanFormat::default(),
    };

    let plan = build_plan(&state.catalog, &req).map_err(|e| (StatusCode::BAD_REQUEST, Json(e)))?;
    let body = plan.render(format).map_err(|e| {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiError::new(ErrorCode::Internal, e.to_string())),
        )
    })?;
    let content_type = match format {
        PlanFormat::Json => "application/json",
        PlanFormat::Markdown => TEXT_MARKDOWN,
    };
    Ok(([(header::CONTENT_TYPE, content_type)], body).into_response())
}

async fn http_get_results(
    State(state): State<Arc<AppState>>,
    Path(calculation_id): Path<String>,
) -> ApiResult<Json<CalculationResult>> {
    let id = CalculationId(calculation_id);
    state
        .calculations
        .fetch_calculation(&id)
        .await
        .map(Json)
        .map_err(|e| upstream_error(&id, e))
}

async fn http_generate_insights(
    State(state): State<Arc<AppState>>,
    Path(calculation_id): Path<String>,
) -> ApiResult<Json<AiInsightsResponse>> {
    let id = CalculationId(calculation_id);
    let ai_insights = state
        .calculations
        .generate_ai_insights(&id)
        .await
        .map_err(|e| {
            warn!(calculation_id = %id, error = %e, "ai insights request failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new(ErrorCode::Upstream, e.to_string())),
            )
        })?;
    Ok(Json(AiInsightsResponse {
        calculation_id: Some(id),
        ai_insights,
        generated_at: None,
    }))
}

fn upstream_error(id: &CalculationId, err: FetchError) -> (StatusCode, Json<ApiError>) {
    match err {
        FetchError::Status { .. } => (StatusCode::NOT_FOUND, Json(ApiError::results_not_found())),
        other => {
            warn!(calculation_id = %id, error = %other, "calculation service unavailable");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiError::new(ErrorCode::Upstream, other.to_string())),
            )
        }
    }
}

async fn actions_page(
    State(state): State<Arc<AppState>>,
    Query(q): Query<ActionsPageQuery>,
) -> Response {
    let mut page = ActionsPage::new(state.catalog.clone());
    page.filter = ActionFilter::new()
        .category_str(q.category.as_deref().unwrap_or_default())
        .complexity_str(q.complexity.as_deref().unwrap_or_default())
        .search(q.q.as_deref().unwrap_or_default());
    page.selection = q
        .selected
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .collect::<Selection>();

    let mut body = render::render_actions(&page.visible(), &page.selection);
    if !page.selection.is_empty() {
        if let Ok(result) = page.run_scenario() {
            body.push('\n');
            body.push_str(&render::render_scenario(result));
        }
    }
    ([(header::CONTENT_TYPE, TEXT_PLAIN)], body).into_response()
}

async fn results_page(
    State(state): State<Arc<AppState>>,
    Path(calculation_id): Path<String>,
    Query(q): Query<ResultsPageQuery>,
) -> Response {
    let id = CalculationId(calculation_id);
    let mut page = load_results(state.calculations.as_ref(), &id).await;
    if q.insights {
        if let PageState::Ready(view) = &mut page {
            view.insights = load_insights(state.calculations.as_ref(), &id).await;
        }
    }

    let status = match &page {
        PageState::Ready(_) => StatusCode::OK,
        PageState::NotFound => StatusCode::NOT_FOUND,
        PageState::Loading | PageState::Failed(_) => StatusCode::BAD_GATEWAY,
    };
    (
        status,
        [(header::CONTENT_TYPE, TEXT_PLAIN)],
        render::render_results_page(&page),
    )
        .into_response()
}

#[cfg(test)]
#[path = "tests/mod_tests.rs"]
mod tests;
