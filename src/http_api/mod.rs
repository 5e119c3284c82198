use std::{net::SocketAddr, sync::Arc};

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};

use crate::{
    ApplyOutcome, DeckConfigStore, DeckEntry, DeckNode, DeckRecord, LimitUpdate, PersistenceError,
    PlanError, PlanRequest, PlanResult, SchedulePlanner, apply_limit_with_confirmation,
    flatten_tree,
};

pub type SharedDeckStore = Arc<dyn DeckConfigStore + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    planner: SchedulePlanner,
    decks: SharedDeckStore,
}

impl AppState {
    pub fn new(planner: SchedulePlanner, decks: SharedDeckStore) -> Self {
        Self { planner, decks }
    }

    fn decks(&self) -> SharedDeckStore {
        self.decks.clone()
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

#[derive(Debug)]
enum ApiError {
    NotFound(String),
    Conflict(String),
    Invalid(String),
    Internal(String),
}

impl ApiError {
    fn invalid(message: impl Into<String>) -> Self {
        ApiError::Invalid(message.into())
    }

    fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }
}

impl From<PlanError> for ApiError {
    fn from(value: PlanError) -> Self {
        match value {
            PlanError::InvalidInput(message) => ApiError::Invalid(message),
            PlanError::Internal(message) => ApiError::Internal(message),
        }
    }
}

impl From<PersistenceError> for ApiError {
    fn from(value: PersistenceError) -> Self {
        match value {
            PersistenceError::DeckNotFound(id) => ApiError::NotFound(format!("deck {id} not found")),
            PersistenceError::InvalidData(message) => ApiError::Invalid(message),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error, message) = match self {
            ApiError::NotFound(message) => (StatusCode::NOT_FOUND, "not_found", message),
            ApiError::Conflict(message) => (StatusCode::CONFLICT, "conflict", message),
            ApiError::Invalid(message) => (StatusCode::BAD_REQUEST, "invalid_request", message),
            ApiError::Internal(message) => {
                warn!(%message, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", message)
            }
        };
        (status, Json(ErrorBody { error, message })).into_response()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlanReport {
    pub summary: String,
    pub report: String,
}

#[derive(Debug, Deserialize)]
struct DailyLimitPayload {
    new_limit: u32,
    #[serde(default)]
    confirm: bool,
}

#[derive(Debug, Deserialize)]
struct ApplyPlanPayload {
    request: PlanRequest,
    #[serde(default)]
    confirm: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApplyPlanResponse {
    pub plan: PlanResult,
    pub outcome: ApplyOutcome,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/plan", post(create_plan))
        .route("/plan/report", post(create_plan_report))
        .route("/decks", get(list_decks))
        .route("/decks/:id", get(get_deck))
        .route("/decks/:id/daily_limit", put(update_daily_limit))
        .route("/decks/:id/apply_plan", post(apply_plan))
        .with_state(state)
}

pub async fn serve(addr: SocketAddr, state: AppState) -> std::io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "study-pacer HTTP API listening");
    axum::serve(listener, app).await
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

async fn create_plan(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanResult>, ApiError> {
    let result = state.planner.plan(&request)?;
    Ok(Json(result))
}

async fn create_plan_report(
    State(state): State<AppState>,
    Json(request): Json<PlanRequest>,
) -> Result<Json<PlanReport>, ApiError> {
    let result = state.planner.plan(&request)?;
    Ok(Json(PlanReport {
        summary: result.to_summary(),
        report: result.to_report(),
    }))
}

async fn list_decks(State(state): State<AppState>) -> Result<Json<Vec<DeckEntry>>, ApiError> {
    let records = state.decks().list_decks()?;
    let tree = DeckNode::build_tree(&records);
    Ok(Json(flatten_tree(&tree)))
}

async fn get_deck(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
) -> Result<Json<DeckRecord>, ApiError> {
    match state.decks().find_deck(deck_id)? {
        Some(deck) => Ok(Json(deck)),
        None => Err(ApiError::NotFound(format!("deck {deck_id} not found"))),
    }
}

async fn update_daily_limit(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<DailyLimitPayload>,
) -> Result<Json<ApplyOutcome>, ApiError> {
    let update = LimitUpdate {
        deck_id,
        new_limit: payload.new_limit,
    };
    let outcome = confirmed_apply(&state, update, payload.confirm)?;
    Ok(Json(outcome))
}

async fn apply_plan(
    State(state): State<AppState>,
    Path(deck_id): Path<i64>,
    Json(payload): Json<ApplyPlanPayload>,
) -> Result<Json<ApplyPlanResponse>, ApiError> {
    let plan = state.planner.plan(&payload.request)?;
    let update = LimitUpdate::from_result(&plan, deck_id).ok_or_else(|| {
        ApiError::invalid("only rate_from_duration plans can be applied to a deck")
    })?;
    let outcome = confirmed_apply(&state, update, payload.confirm)?;
    Ok(Json(ApplyPlanResponse { plan, outcome }))
}

fn confirmed_apply(
    state: &AppState,
    update: LimitUpdate,
    confirm: bool,
) -> Result<ApplyOutcome, ApiError> {
    let store = state.decks();
    match apply_limit_with_confirmation(store.as_ref(), update, |_, _| confirm)? {
        ApplyOutcome::Declined => Err(ApiError::conflict(format!(
            "changing deck {} requires \"confirm\": true",
            update.deck_id
        ))),
        outcome => Ok(outcome),
    }
}
