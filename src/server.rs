use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;

use crate::api::{
    ApiAnalyticsRequest, ApiBatchRequest, ApiContextResponse, ApiError, ApiInsightsRequest,
    ApiInsightsResponse, ApiRepurposeRequest, ApiScoreRequest,
};
use content_intel::analytics::PerformanceAnalytics;
use content_intel::insight::InsightMetrics;
use content_intel::repurpose::{BatchItemResult, RepurposingReport};
use content_intel::{ContentEngine, ScoreReport};

#[derive(Clone)]
struct AppState {
    engine: Arc<ContentEngine>,
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

fn api_error(status: StatusCode, error: impl Into<String>) -> (StatusCode, Json<ApiError>) {
    (status, Json(ApiError { error: error.into() }))
}

pub async fn serve(args: crate::ServeArgs, engine: Arc<ContentEngine>) -> Result<(), String> {
    let state = AppState { engine };

    let web_root = args.web_root;
    let index_path = format!("{}/index.html", web_root.trim_end_matches('/'));
    let static_service = ServeDir::new(web_root).not_found_service(ServeFile::new(index_path));

    let app = Router::new()
        .route("/api/health", get(health))
        .route("/api/score", post(score_handler))
        .route("/api/repurpose", post(repurpose_handler))
        .route("/api/repurpose/batch", post(batch_handler))
        .route("/api/analytics", post(analytics_handler))
        .route("/api/insights", post(insights_handler))
        .route("/api/context/refresh", post(refresh_handler))
        .nest_service("/", static_service)
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", args.host, args.port)
        .parse()
        .map_err(|err| format!("invalid bind address: {}", err))?;

    info!(%addr, "dashboard server listening");
    axum::serve(tokio::net::TcpListener::bind(addr).await.map_err(|err| {
        format!("failed to bind server: {}", err)
    })?, app)
    .await
    .map_err(|err| format!("server error: {}", err))?;

    Ok(())
}

async fn health() -> impl IntoResponse {
    StatusCode::OK
}

async fn score_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiScoreRequest>,
) -> ApiResult<ScoreReport> {
    let (text, options) = request
        .into_parts(state.engine.default_options())
        .map_err(|err| api_error(StatusCode::BAD_REQUEST, err))?;
    Ok(Json(state.engine.score_post(&text, &options).await))
}

async fn repurpose_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiRepurposeRequest>,
) -> ApiResult<RepurposingReport> {
    let (item, metrics) = request.into_item();
    state
        .engine
        .analyze_and_repurpose_blog_content(&item, metrics.as_ref())
        .await
        .map(Json)
        .map_err(|err| api_error(StatusCode::UNPROCESSABLE_ENTITY, err.to_string()))
}

async fn batch_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiBatchRequest>,
) -> ApiResult<Vec<BatchItemResult>> {
    let results = state
        .engine
        .repurpose_corpus(&request.items, request.metrics.as_ref())
        .await;
    Ok(Json(results))
}

async fn analytics_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiAnalyticsRequest>,
) -> ApiResult<PerformanceAnalytics> {
    Ok(Json(
        state
            .engine
            .get_performance_analytics(&request.corpus, request.metrics.as_ref()),
    ))
}

async fn insights_handler(
    State(state): State<AppState>,
    Json(request): Json<ApiInsightsRequest>,
) -> ApiResult<ApiInsightsResponse> {
    let category = request
        .category()
        .map_err(|err| api_error(StatusCode::BAD_REQUEST, err))?;

    let metrics = match (&request.metrics, &request.corpus) {
        (Some(metrics), _) => metrics.clone(),
        (None, Some(corpus)) => {
            let analytics = state
                .engine
                .get_performance_analytics(corpus, request.account.as_ref());
            InsightMetrics::from_analytics(&analytics, request.account.as_ref())
        }
        (None, None) => InsightMetrics::default(),
    };

    let insight = state.engine.generate_insights(category, &metrics).await;
    Ok(Json(ApiInsightsResponse {
        category,
        available: state.engine.insights_available(),
        insight,
    }))
}

async fn refresh_handler(State(state): State<AppState>) -> ApiResult<ApiContextResponse> {
    let context = state.engine.refresh_context().await;
    Ok(Json(ApiContextResponse::from_context(&context)))
}
